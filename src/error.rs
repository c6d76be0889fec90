//! Error types for lrcput
//!
//! `Access` is the only fatal error: it stops a run before any file is touched.
//! Everything else is scoped to a single audio file and ends up in the
//! run's failed list.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Root directory missing, not a directory, or unreadable
    #[error("Cannot access directory {}: {reason}", path.display())]
    Access { path: PathBuf, reason: String },

    /// Audio file is not a valid container of its stated format
    #[error("Failed to read tags from {}: {reason}", path.display())]
    TagRead { path: PathBuf, reason: String },

    /// Tag container could not be persisted
    #[error("Failed to write tags to {}: {reason}", path.display())]
    TagWrite { path: PathBuf, reason: String },

    /// LRC file is not valid UTF-8
    #[error("LRC file is not valid UTF-8: {}", path.display())]
    Encoding { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file unreadable or malformed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience Result type using lrcput Error
pub type Result<T> = std::result::Result<T, Error>;
