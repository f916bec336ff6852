#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockr/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Resilient multi-source stock quote resolution.
//!
//! This crate provides a single entry point for fetching stock quotes from
//! several sources. It re-exports the core types and source implementations,
//! and provides a [`QuoteResolver`] that tries sources in priority order and
//! fans batch lookups out concurrently.
//!
//! # Features
//!
//! - `companion` - Companion JSON quote service
//! - `yahoo` - Yahoo Finance quote page scraping
//! - `synthetic` - Static fallback table with synthetic prices
//!
//! # Example
//!
//! ```rust,ignore
//! use quotes::{QuoteResolver, ResolverConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let resolver = QuoteResolver::with_config(ResolverConfig::default())
//!         .with_companion("http://localhost:8000")
//!         .with_yahoo()
//!         .with_synthetic();
//!
//!     match resolver.get_quote("aapl").await {
//!         Some(quote) => println!("{} {}", quote.symbol, quote.current_price),
//!         None => println!("N/A"),
//!     }
//!
//!     let quotes = resolver.get_quotes(&["AAPL", "NVDA", "TSLA"]).await;
//!     println!("{} quotes", quotes.len());
//! }
//! ```

// Core types and traits
pub use quotes_core::*;

// Sources
#[cfg(feature = "companion")]
pub use quotes_companion::{CompanionServiceSource, DEFAULT_BASE_URL as DEFAULT_COMPANION_URL};
#[cfg(feature = "synthetic")]
pub use quotes_synthetic::{BasePriceTable, SyntheticSource};
#[cfg(feature = "yahoo")]
pub use quotes_yahoo::YahooScrapeSource;

pub use tokio_util::sync::CancellationToken;

mod config;
mod resolver;
pub use config::ResolverConfig;
pub use resolver::QuoteResolver;
