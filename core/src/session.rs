//! File-backed store for the server-issued credential.
//!
//! # Design
//! The token and the profile it belongs to are written as one JSON document,
//! so they are always set and cleared as a unit. Nothing is cached in memory:
//! `token()` re-reads the file on every call, which means a logout that races
//! an in-flight request can never leak a stale token into the next one.
//!
//! A missing or unreadable file is simply "no session" — requests then go out
//! unauthenticated and the backend's 401 drives the user back to login.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::User;

/// The bearer token plus the authenticated profile for the current login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub usuario: User,
}

/// Durable mirror of the server-issued credential, scoped to one file path.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist a new session, replacing any prior one. Written to a sibling
    /// temp file first and renamed, so readers never observe a half-written
    /// document.
    pub fn set(&self, token: &str, usuario: &User) -> Result<(), ApiError> {
        let session = Session {
            token: token.to_string(),
            usuario: usuario.clone(),
        };
        let json =
            serde_json::to_vec(&session).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &json).map_err(|e| ApiError::Session(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ApiError::Session(e.to_string()))?;
        Ok(())
    }

    /// Current session, or `None` when logged out. Read failures degrade to
    /// `None` (logged) rather than erroring: the caller proceeds as if
    /// unauthenticated.
    pub fn get(&self) -> Option<Session> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(error = %e, "session file unreadable, treating as logged out");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "session file corrupt, treating as logged out");
                None
            }
        }
    }

    /// Token sampled fresh from disk, for attaching to a single request.
    pub fn token(&self) -> Option<String> {
        self.get().map(|session| session.token)
    }

    /// Remove all session state. Idempotent; the store ends in the same
    /// state as a fresh install.
    pub fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Session(e.to_string())),
        }
    }
}
