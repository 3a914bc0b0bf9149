//! Error types for datagrid.
//!
//! The derivation pipeline itself never fails. Errors only arise at the
//! edges: loading records or configuration from JSON, validating a
//! configuration, and locating the mount target.

use std::io;

use thiserror::Error;

/// Errors reported by the loading and mounting paths.
///
/// | Variant | Typical cause |
/// |---------|---------------|
/// | [`MountNotFound`](DatagridError::MountNotFound) | Container id missing from the host |
/// | [`InvalidJson`](DatagridError::InvalidJson) | Malformed records or config document |
/// | [`InvalidConfig`](DatagridError::InvalidConfig) | Config failed validation |
/// | [`Io`](DatagridError::Io) | Reading or writing a file failed |
#[derive(Error, Debug)]
pub enum DatagridError {
    /// The mount target could not be located on the host.
    ///
    /// The table still constructs; it simply never renders.
    #[error("mount target not found: #{0}")]
    MountNotFound(String),

    /// A JSON document could not be parsed.
    #[error("invalid json: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The table configuration is inconsistent.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error while reading input or writing output.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl DatagridError {
    /// Creates a configuration error with the given message.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// A specialized [`Result`] type for datagrid operations.
pub type Result<T> = std::result::Result<T, DatagridError>;
