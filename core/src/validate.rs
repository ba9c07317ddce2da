//! Local input validation, run before any request is built.
//!
//! The checks are shape-only on purpose: `99:99` is a "valid" time and
//! `2026-02-31` a "valid" date as far as the client is concerned, matching
//! the backend's contract. Whether an offer's start precedes its end, or a
//! requested date falls on an offered day, is left to the server.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::ApiError;

static TIME_RE: OnceLock<Regex> = OnceLock::new();
static DATE_RE: OnceLock<Regex> = OnceLock::new();

fn time_regex() -> &'static Regex {
    TIME_RE.get_or_init(|| {
        Regex::new(r"^\d{2}:\d{2}$").unwrap_or_else(|error| panic!("time regex failed to compile: {error}"))
    })
}

fn date_regex() -> &'static Regex {
    DATE_RE.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap_or_else(|error| panic!("date regex failed to compile: {error}"))
    })
}

/// Reject blank required fields.
pub fn require_filled(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::Validation(format!("preencha o campo {field}")));
    }
    Ok(())
}

/// Reject times not in `HH:MM` shape.
pub fn require_time(field: &str, value: &str) -> Result<(), ApiError> {
    require_filled(field, value)?;
    if !time_regex().is_match(value) {
        return Err(ApiError::Validation(format!(
            "use o formato HH:MM no campo {field} (ex: 14:00)"
        )));
    }
    Ok(())
}

/// Reject dates not in `YYYY-MM-DD` shape.
pub fn require_date(field: &str, value: &str) -> Result<(), ApiError> {
    require_filled(field, value)?;
    if !date_regex().is_match(value) {
        return Err(ApiError::Validation(format!(
            "use o formato AAAA-MM-DD no campo {field} (ex: 2026-12-20)"
        )));
    }
    Ok(())
}
