//! Error types for configuration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading, saving or checking a rig file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The file parsed but describes an unusable rig
    #[error("invalid rig: {0}")]
    Validation(#[from] crate::validation::ValidationError),
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ValidationError;
    use std::error::Error;
    use std::path::Path;

    fn mock_io_err() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::NotFound, "mock")
    }

    #[test]
    fn constructors_carry_path() {
        let err = ConfigError::read_file("/etc/rig.toml", mock_io_err());
        assert!(matches!(err, ConfigError::ReadFile { ref path, .. } if path == Path::new("/etc/rig.toml")));

        let err = ConfigError::write_file("/out/rig.toml", mock_io_err());
        assert!(matches!(err, ConfigError::WriteFile { ref path, .. } if path == Path::new("/out/rig.toml")));

        let err = ConfigError::create_dir("/out", mock_io_err());
        assert!(matches!(err, ConfigError::CreateDir { ref path, .. } if path == Path::new("/out")));
    }

    #[test]
    fn io_variants_expose_source() {
        for err in [
            ConfigError::read_file("/x", mock_io_err()),
            ConfigError::write_file("/x", mock_io_err()),
            ConfigError::create_dir("/x", mock_io_err()),
        ] {
            assert!(err.source().is_some(), "{err} must expose its I/O source");
        }
    }

    #[test]
    fn display_messages() {
        let msg = ConfigError::read_file("/a/rig.toml", mock_io_err()).to_string();
        assert!(msg.contains("failed to read file"), "got: {msg}");
        assert!(msg.contains("/a/rig.toml"), "got: {msg}");

        let err = ConfigError::from(ValidationError::BaudRate);
        assert_eq!(err.to_string(), "invalid rig: baud rate must be positive");
    }
}
