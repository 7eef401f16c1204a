//! Byte transports carrying packets to the controller.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use lightwave_protocol::LinkSettings;

use crate::{Error, Result};

/// Ordered byte sink between the host and the controller.
///
/// `write` may accept fewer bytes than offered; callers treat a short write
/// as a dropped packet rather than retrying, so the link never falls behind
/// the audio.
pub trait Transport: Send {
    /// Write as much of `bytes` as the link accepts, returning the count.
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize>;

    /// Push buffered bytes onto the wire.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        (**self).write(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Serial link opened as a character device.
///
/// The port must already be configured for `settings` (the controller's
/// bootloader and most USB CDC adapters accept any rate). On Windows, bare
/// `COMn` names are rewritten to the `\\.\COMn` device namespace.
#[derive(Debug)]
pub struct SerialTransport {
    file: File,
    path: PathBuf,
    settings: LinkSettings,
}

impl SerialTransport {
    /// Open `port` for writing.
    pub fn open(port: impl AsRef<Path>, settings: LinkSettings) -> Result<Self> {
        let path = device_path(port.as_ref());
        let file = OpenOptions::new()
            .write(true)
            .open(&path)
            .map_err(|source| Error::Transport {
                port: port.as_ref().display().to_string(),
                source,
            })?;

        tracing::info!(
            port = %path.display(),
            baud_rate = settings.baud_rate,
            "serial transport opened"
        );
        Ok(Self {
            file,
            path,
            settings,
        })
    }

    /// Resolved device path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Link parameters the controller expects.
    pub fn settings(&self) -> &LinkSettings {
        &self.settings
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.file.write(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(windows)]
fn device_path(port: &Path) -> PathBuf {
    match port.to_str() {
        Some(name) if name.to_ascii_uppercase().starts_with("COM") => {
            PathBuf::from(format!(r"\\.\{name}"))
        }
        _ => port.to_path_buf(),
    }
}

#[cfg(not(windows))]
fn device_path(port: &Path) -> PathBuf {
    port.to_path_buf()
}

/// In-memory transport for tests and simulation.
///
/// Collects written bytes in order. A per-write limit models a congested
/// link that accepts only part of a packet, and [`fail_writes`](Self::fail_writes)
/// models a disconnected one.
#[derive(Debug, Default, Clone)]
pub struct MemoryTransport {
    bytes: Vec<u8>,
    write_limit: Option<usize>,
    failing: bool,
    writes: u64,
}

impl MemoryTransport {
    /// Create an empty transport that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept at most `limit` bytes per write.
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&mut self, failing: bool) {
        self.failing = failing;
    }

    /// Bytes written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of write calls, failed ones included.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Take the written bytes, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

impl Transport for MemoryTransport {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.writes += 1;
        if self.failing {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "link down"));
        }
        let accepted = self.write_limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        self.bytes.extend_from_slice(&bytes[..accepted]);
        Ok(accepted)
    }
}
