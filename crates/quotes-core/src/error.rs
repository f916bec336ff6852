//! Error types for quote operations.
//!
//! This module defines [`QuoteError`], the failure reason an adapter reports
//! when it cannot produce a quote. The resolver absorbs every one of these;
//! none of them reach the caller of a resolution.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while fetching or parsing a quote.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// The symbol was empty or whitespace only.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Network-related errors (connection failures, non-success statuses, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limit exceeded by a source.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The source that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<Duration>,
    },

    /// The requested symbol was not found.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The upstream answered but reported a non-success status.
    #[error("Upstream {provider} reported status {status:?}")]
    Upstream {
        /// The source that reported the status.
        provider: String,
        /// The status string the upstream returned.
        status: String,
    },

    /// Error parsing data from a source.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The source refuses this kind of request.
    #[error("Not supported: {0}")]
    NotSupported(String),
}

/// Result type alias using [`QuoteError`].
pub type Result<T> = std::result::Result<T, QuoteError>;
