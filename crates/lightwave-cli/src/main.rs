//! Lightwave CLI - stream system audio to an LED controller.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "lightwave")]
#[command(author, version, about = "Audio-reactive LED host", long_about = None)]
struct Cli {
    /// Rig file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture system audio and drive the controller
    Run(commands::run::RunArgs),

    /// Run the full chain against an in-process controller
    Simulate(commands::simulate::SimulateArgs),

    /// Show, create or check the rig file
    Config(commands::config::ConfigArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Run(args) => commands::run::run(args, config),
        Commands::Simulate(args) => commands::simulate::run(args, config),
        Commands::Config(args) => commands::config::run(args, config),
    }
}
