//! Shared error types for the services crate.

use thiserror::Error;

pub use reqwest::StatusCode;

/// Errors emitted by the backend API client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("backend returned {status}: {message}")]
    Backend { status: StatusCode, message: String },

    #[error("request failed with status {0}")]
    HttpStatus(StatusCode),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Errors emitted by the learning session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The deck has nothing due. Not a failure: callers show a
    /// "nothing to learn" state instead of starting a session.
    #[error("no cards due for learning")]
    Empty,

    /// A rating arrived while no card was awaiting one. This is a bug in the
    /// presentation layer; session state is left untouched.
    #[error("no card is awaiting a rating")]
    NoCurrentCard,

    #[error("session already completed")]
    Completed,

    #[error(transparent)]
    Api(#[from] ApiError),
}
