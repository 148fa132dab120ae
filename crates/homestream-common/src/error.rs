//! Common error types used throughout homestream.
//!
//! This module provides a unified error type for the catalog and storage
//! layers: missing records, rejected input, oversized uploads, database
//! failures, and I/O failures.

/// Common error type for homestream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record or file was not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A request that is well-formed but not allowed; the message is shown as is.
    #[error("{0}")]
    Rejected(String),

    /// An upload exceeded the configured size limit.
    #[error("Upload exceeds the limit of {limit} bytes")]
    PayloadTooLarge {
        /// Configured maximum in bytes.
        limit: u64,
    },

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error naming the missing thing.
    pub fn not_found<S: Into<String>>(what: S) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Rejected error.
    pub fn rejected<S: Into<String>>(msg: S) -> Self {
        Self::Rejected(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code this error maps to.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) | Self::Rejected(_) => 400,
            Self::PayloadTooLarge { .. } => 413,
            Self::Database(_) | Self::Io(_) | Self::Internal(_) => 500,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
