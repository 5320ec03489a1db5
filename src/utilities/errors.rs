//! Error types for the warden core.
//!
//! Validation errors are raised synchronously, before anything is written
//! to the event log. Storage errors surface from the persistence backends;
//! the event log itself degrades gracefully instead of propagating them
//! (see `events::event_log`).

use thiserror::Error;

/// Errors raised by event storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying filesystem failure while reading or writing the log.
    #[error("event storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The event sequence could not be encoded for persistence.
    #[error("event serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Persisted state exists but could not be decoded.
    #[error("persisted event log is corrupt: {message}")]
    Corrupt { message: String },
}

/// Errors from constraint store operations.
#[derive(Debug, Error)]
pub enum ConstraintError {
    /// Operation arguments were rejected; nothing was appended to the log.
    #[error("invalid constraint: {message}")]
    Validation { message: String },

    /// A constraint payload could not be encoded for the event log.
    #[error("constraint payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Errors from mood tracker operations.
#[derive(Debug, Error)]
pub enum MoodError {
    #[error("invalid mood observation: {message}")]
    Validation { message: String },

    #[error("mood payload encoding failed: {0}")]
    Payload(#[from] serde_json::Error),
}
