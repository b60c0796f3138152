use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the core: loading, lookup, resolution and
/// dimensional checks. Every failure is terminal for the current
/// operation only; the loaded table is never left half-modified, so a
/// failed call may be retried with different arguments.
#[derive(Error, Debug)]
pub enum ThermoLogError {
    #[error("unknown identifier '{name}'")]
    UnknownIdentifier { name: String },

    #[error("cannot resolve '{name}': {reason}")]
    UnresolvableQuantity { name: String, reason: String },

    #[error("dimensionality mismatch: expected {wanted}, got {got}")]
    DimensionalityMismatch { wanted: String, got: String },

    #[error("failed to read {path}: {message}")]
    FileReadError { path: PathBuf, message: String },

    #[error("name table error: {0}")]
    NameTable(String),

    #[error("plot request error: {0}")]
    PlotSpec(String),
}

impl ThermoLogError {
    pub fn unknown(name: impl Into<String>) -> Self {
        Self::UnknownIdentifier { name: name.into() }
    }

    pub fn unresolvable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvableQuantity {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn dimensionality(wanted: impl Into<String>, got: impl Into<String>) -> Self {
        Self::DimensionalityMismatch {
            wanted: wanted.into(),
            got: got.into(),
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::FileReadError {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThermoLogError>;
