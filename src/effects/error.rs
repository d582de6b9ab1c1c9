//! Platform API error types.
//!
//! Errors are categorized for the two decisions the core has to make:
//!
//! - **NotFound** - the referenced thing does not exist. The lookup fan-out
//!   collapses this into the shadowbanned status; the cleanup sweep treats it
//!   as "already gone" and still removes the ticket.
//! - **Transient** - worth seeing again (5xx, rate limits, network faults).
//!   The core does not retry in place; redelivery and the next sweep pass are
//!   the retry mechanisms.
//! - **Permanent** - everything else.

use thiserror::Error;

use super::ErrorClass;

/// The kind of platform API error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedditErrorKind {
    /// The referenced thing does not exist (HTTP 404).
    NotFound,

    /// Transient failure (HTTP 5xx, 429, network fault).
    Transient,

    /// Permanent failure (other 4xx, malformed response).
    Permanent,
}

/// A platform API error with categorization.
#[derive(Debug, Error)]
#[error("platform API error{}: {message}", status_code.map(|c| format!(" (HTTP {})", c)).unwrap_or_default())]
pub struct RedditApiError {
    /// The kind of error.
    pub kind: RedditErrorKind,

    /// The HTTP status code, if one was received.
    pub status_code: Option<u16>,

    /// A human-readable description.
    pub message: String,
}

impl RedditApiError {
    /// Creates a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        RedditApiError {
            kind: RedditErrorKind::NotFound,
            status_code: Some(404),
            message: message.into(),
        }
    }

    /// Creates a transient error.
    pub fn transient(message: impl Into<String>) -> Self {
        RedditApiError {
            kind: RedditErrorKind::Transient,
            status_code: None,
            message: message.into(),
        }
    }

    /// Creates a permanent error.
    pub fn permanent(message: impl Into<String>) -> Self {
        RedditApiError {
            kind: RedditErrorKind::Permanent,
            status_code: None,
            message: message.into(),
        }
    }

    /// Categorizes an HTTP status code.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            404 => RedditErrorKind::NotFound,
            429 => RedditErrorKind::Transient,
            s if s >= 500 => RedditErrorKind::Transient,
            _ => RedditErrorKind::Permanent,
        };
        RedditApiError {
            kind,
            status_code: Some(status),
            message: message.into(),
        }
    }
}

impl ErrorClass for RedditApiError {
    fn is_not_found(&self) -> bool {
        self.kind == RedditErrorKind::NotFound
    }
}
