//! Error types for the tutoring API client.
//!
//! # Design
//! `Validation` failures happen before a request is built — invalid input
//! never reaches the gateway. `Unauthorized` gets a dedicated variant because
//! callers route it differently (back to the login screen) from every other
//! backend rejection, which lands in `Backend` with the human-readable
//! message the server put in its `erro` field.

use std::fmt;

/// Errors returned by `ApiClient` build and parse methods.
#[derive(Debug)]
pub enum ApiError {
    /// Local input validation failed; no request was issued.
    Validation(String),

    /// The server returned 401: the bearer token is missing or no longer
    /// accepted.
    Unauthorized,

    /// The server returned a non-success status other than 401. `message` is
    /// the server's `erro` field when present, a generic fallback otherwise.
    Backend { status: u16, message: String },

    /// The request payload could not be serialized to JSON.
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    Deserialization(String),

    /// The session file could not be written or removed.
    Session(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "{msg}"),
            ApiError::Unauthorized => write!(f, "sessão expirada, faça login novamente"),
            ApiError::Backend { status, message } => {
                write!(f, "HTTP {status}: {message}")
            }
            ApiError::Serialization(msg) => {
                write!(f, "serialization failed: {msg}")
            }
            ApiError::Deserialization(msg) => {
                write!(f, "deserialization failed: {msg}")
            }
            ApiError::Session(msg) => {
                write!(f, "session store failure: {msg}")
            }
        }
    }
}

impl std::error::Error for ApiError {}
