//! Error types for the reconciler and its transport.
//!
//! # Design
//! `TransportError` is what a `TodoStore` returns; it never reaches the
//! presentation layer. The reconciler downgrades every failure to one of the
//! closed `TodoError` kinds, whose `Display` text is the banner message.

use thiserror::Error;
use todo_core::ApiError;

/// A failed round trip to the todos collection.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint answered, but not with what the operation expects.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The request never produced a response (connection, DNS, I/O).
    #[error("transport failed: {0}")]
    Http(String),

    /// The blocking task that ran the request did not complete.
    #[error("request task failed: {0}")]
    Join(String),
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        TransportError::Http(err.to_string())
    }
}

impl From<tokio::task::JoinError> for TransportError {
    fn from(err: tokio::task::JoinError) -> Self {
        TransportError::Join(err.to_string())
    }
}

/// User-visible failure kinds. At most one is shown at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Unable to load todos")]
    Load,
    #[error("Title should not be empty")]
    EmptyTitle,
    #[error("Unable to add a todo")]
    Add,
    #[error("Unable to delete a todo")]
    Delete,
    #[error("Unable to update a todo")]
    Update,
}
