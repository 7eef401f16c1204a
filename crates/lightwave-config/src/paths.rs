//! Platform-specific configuration paths.
//!
//! - Linux: `~/.config/lightwave/rig.toml`
//! - macOS: `~/Library/Application Support/lightwave/rig.toml`
//! - Windows: `%APPDATA%\lightwave\rig.toml`

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
const APP_NAME: &str = "lightwave";

/// File name of the rig configuration.
pub const RIG_FILE: &str = "rig.toml";

/// Returns the user-specific configuration directory.
///
/// Falls back to the current directory if the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default rig file location.
pub fn default_rig_path() -> PathBuf {
    user_config_dir().join(RIG_FILE)
}

/// Pick the rig file to load.
///
/// An explicit path always wins, existing or not, so a typo surfaces as a read
/// error. Otherwise the default location is used if a file exists there.
pub fn resolve_rig_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(default_rig_path()).filter(|p| p.is_file()),
    }
}
