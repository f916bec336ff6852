//! Source trait for fetching quotes.
//!
//! A [`QuoteSource`] is one strategy for obtaining quote data: a structured
//! HTTP service, a scraped web page, or a static fallback table. Sources are
//! ordered by the resolver and tried until one succeeds.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::Result,
    types::{QuoteFields, Symbol},
};

/// Adapter trait for all quote sources.
///
/// `fetch_quote` reports success with whatever fields the source observed,
/// or a [`QuoteError`](crate::QuoteError) describing why it could not.
/// Implementations must not panic on malformed upstream data.
#[async_trait]
pub trait QuoteSource: Send + Sync + Debug {
    /// Returns the name of this source (e.g., "Yahoo Finance").
    fn name(&self) -> &str;

    /// Returns a description of this source.
    fn description(&self) -> &str;

    /// Fetches the latest observation for a symbol.
    ///
    /// The symbol is already normalized. Timeouts and cancellation are
    /// applied by the caller.
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<QuoteFields>;
}
