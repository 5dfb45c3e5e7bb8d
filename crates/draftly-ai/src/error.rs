//! Error types for the chat client

use thiserror::Error;

/// Chat client error taxonomy
///
/// Classification is by variant, never by matching on rendered text. The
/// first two variants are surfaced to the user with their own notice and
/// must not be retried automatically; everything else gets a single
/// generic failure notice at the call site.
#[derive(Error, Debug)]
pub enum ChatError {
    /// The completion service answered 429 before any body byte was read.
    #[error("rate limited by the completion service")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The completion service answered 402. Recoverable only by an
    /// out-of-band account action.
    #[error("payment required by the completion service")]
    PaymentRequired,

    /// Any other non-success status.
    #[error("transport failure: status {status}: {message}")]
    Transport { status: u16, message: String },

    /// A read error after the stream opened. Deltas already published
    /// stay published; partial content is not discarded.
    #[error("stream decode failure: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;
