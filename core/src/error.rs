//! Error types for the lookup flow.
//!
//! # Design
//! `NotFound` and `Domain` are both answers from the backend (an `error`
//! field in a 2xx body); they are split because the page shows a friendly
//! message for the former and echoes the raw text for the latter. Everything
//! that kept the body from arriving or being read is a `TransportFailure`.
//! None of these leave `LookupController`: they end up as a `StatusMessage`.

use thiserror::Error;

/// Reasons a lookup ended without member stats.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The submitted name was empty after trimming.
    #[error("a name is required")]
    InputRequired,

    /// Another lookup is still in flight on this controller.
    #[error("a lookup is already in flight")]
    Busy,

    /// The backend reported that no member matches the name.
    #[error("no member found: {0}")]
    NotFound(String),

    /// The backend reported some other error.
    #[error("backend error: {0}")]
    Domain(String),

    #[error(transparent)]
    Transport(#[from] TransportFailure),
}

/// The request did not produce a usable response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    /// The server answered with a non-2xx status.
    #[error("HTTPエラー: {status}")]
    HttpStatus { status: u16 },

    /// The host could not complete the round-trip.
    #[error("{0}")]
    Network(String),

    /// No response arrived within the configured request timeout.
    #[error("タイムアウト: {millis}ms")]
    Timeout { millis: u128 },

    /// The body was not a JSON object.
    #[error("invalid response body: {0}")]
    Body(String),
}
