//! Error types for xsearch configuration.

use std::{io, path::PathBuf};

use thiserror::Error;
use toml::de;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path to the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to parse TOML configuration.
    #[error("failed to parse config file {path}: {source}")]
    ParseToml {
        /// Path to the file that could not be parsed.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: de::Error,
    },

    /// A field entry has an empty name.
    #[error("field with empty name in {path}")]
    EmptyFieldName {
        /// Config file holding the entry.
        path: PathBuf,
    },

    /// Failed to render the effective configuration.
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}
