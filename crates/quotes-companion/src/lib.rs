#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockr/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Companion service quote source.
//!
//! This crate implements [`QuoteSource`] for the companion quote service.
//! The service is the highest-priority source: when it is up it returns
//! structured data for every field.
//!
//! # Usage
//!
//! ```rust,ignore
//! use quotes_companion::CompanionServiceSource;
//! use quotes_core::{QuoteSource, Symbol};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source = CompanionServiceSource::new("http://localhost:8000");
//!     let fields = source.fetch_quote(&Symbol::parse("AAPL")?).await?;
//!     println!("{}", fields.current_price);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use quotes_core::{QuoteError, QuoteFields, QuoteSource, Result, Symbol};
use reqwest::Client;
use serde::Deserialize;

/// Default address of the companion service.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Status value the service uses for a usable answer.
const SUCCESS_STATUS: &str = "success";

/// Source name used in errors and logs.
const PROVIDER_NAME: &str = "Companion Service";

/// Quote source for the companion JSON service.
#[derive(Clone, Debug)]
pub struct CompanionServiceSource {
    client: Client,
    base_url: String,
}

impl CompanionServiceSource {
    /// Create a new companion source for the service at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self::with_client(client, base_url)
    }

    /// Create a new companion source with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns the service base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the quote URL for a symbol.
    fn url(&self, symbol: &Symbol) -> String {
        format!("{}/stock/{}", self.base_url, symbol.as_str())
    }
}

impl Default for CompanionServiceSource {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait]
impl QuoteSource for CompanionServiceSource {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn description(&self) -> &str {
        "Structured JSON quotes from the companion quote service"
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<QuoteFields> {
        let url = self.url(symbol);
        tracing::debug!("Companion request: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after: None,
            });
        }

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(QuoteError::SymbolNotFound(symbol.to_string()));
        }

        if !response.status().is_success() {
            return Err(QuoteError::Network(format!(
                "HTTP {} for {}",
                response.status(),
                symbol
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        let body: ServiceQuote =
            serde_json::from_str(&text).map_err(|e| QuoteError::Parse(format!("{e}: {text}")))?;

        body.into_fields()
    }
}

// ============================================================================
// Companion Service Response Types
// ============================================================================

/// Quote payload returned by the companion service.
#[derive(Debug, Deserialize)]
struct ServiceQuote {
    status: String,
    price: Option<f64>,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    #[serde(alias = "previousClose")]
    previous_close: Option<f64>,
    volume: Option<f64>,
}

impl ServiceQuote {
    fn into_fields(self) -> Result<QuoteFields> {
        if !self.status.eq_ignore_ascii_case(SUCCESS_STATUS) {
            return Err(QuoteError::Upstream {
                provider: PROVIDER_NAME.to_string(),
                status: self.status,
            });
        }

        let price = self
            .price
            .ok_or_else(|| QuoteError::Parse("missing price".to_string()))?;

        let fields = QuoteFields {
            current_price: price,
            open: self.open,
            high: self.high,
            low: self.low,
            previous_close: self.previous_close,
            volume: self
                .volume
                .filter(|v| v.is_finite() && *v >= 0.0)
                .map(|v| v.round() as u64),
        };
        fields.validate()?;
        Ok(fields)
    }
}
