#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockr/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core traits and types for stock quote sources.
//!
//! This crate provides the foundational abstractions for resolving quotes:
//!
//! - [`QuoteSource`](provider::QuoteSource) - Adapter trait implemented by every source
//! - [`Quote`](types::Quote) - Fully populated quote handed to callers
//! - [`QuoteFields`](types::QuoteFields) - What a source actually observed
//! - [`Symbol`](types::Symbol) - Normalized ticker symbol

/// Error types for quote operations.
pub mod error;
/// Source trait for fetching quotes.
pub mod provider;
/// Core data types (Symbol, Quote, QuoteFields).
pub mod types;

// Re-export commonly used items at crate root
pub use error::{QuoteError, Result};
pub use provider::QuoteSource;
pub use types::{Quote, QuoteFields, Symbol, round_price};
