#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockr/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Static fallback quote source.
//!
//! [`SyntheticSource`] never touches the network. It picks a base price for
//! the symbol from a [`BasePriceTable`] and derives a full quote from it:
//!
//! | Field           | Value                                   |
//! |-----------------|-----------------------------------------|
//! | `open`          | `base * 0.99`                           |
//! | `high`          | `base * 1.03`                           |
//! | `low`           | `base * 0.97`                           |
//! | `previous_close`| `base`                                  |
//! | `current_price` | `base + base * U(-0.05, 0.05)`          |
//! | `volume`        | `U[10_000_000, 100_000_000)`            |
//!
//! All prices are rounded to two decimals.
//!
//! # Example
//!
//! ```
//! use quotes_synthetic::{BasePriceTable, synthesize};
//! use rand::SeedableRng;
//!
//! let table = BasePriceTable::default();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let fields = synthesize(table.base_price("AAPL"), &mut rng);
//! assert_eq!(fields.open, Some(173.25));
//! ```

use std::collections::HashMap;
use std::ops::Range;

use async_trait::async_trait;
use quotes_core::{QuoteError, QuoteFields, QuoteSource, Result, Symbol, round_price};
use rand::Rng;
use tracing::debug;

/// Base price for symbols missing from the table.
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Maximum relative deviation of the synthetic current price from the base.
pub const MAX_VARIATION: f64 = 0.05;

/// Range the synthetic volume is drawn from.
pub const VOLUME_RANGE: Range<u64> = 10_000_000..100_000_000;

const OPEN_FACTOR: f64 = 0.99;
const HIGH_FACTOR: f64 = 1.03;
const LOW_FACTOR: f64 = 0.97;

/// Built-in base prices.
const DEFAULT_BASE_PRICES: &[(&str, f64)] = &[
    ("AAPL", 175.0),
    ("NVDA", 485.0),
    ("TSLA", 245.0),
    ("MSFT", 410.0),
];

/// Lookup table of base prices keyed by normalized symbol.
#[derive(Clone, Debug)]
pub struct BasePriceTable {
    prices: HashMap<String, f64>,
    default_price: f64,
}

impl BasePriceTable {
    /// Creates an empty table where every symbol gets `default_price`.
    #[must_use]
    pub fn empty(default_price: f64) -> Self {
        Self {
            prices: HashMap::new(),
            default_price,
        }
    }

    /// Sets the base price for a symbol.
    #[must_use]
    pub fn with_price(mut self, symbol: &Symbol, price: f64) -> Self {
        self.prices.insert(symbol.as_str().to_string(), price);
        self
    }

    /// Sets the base price used for unknown symbols.
    #[must_use]
    pub const fn with_default_price(mut self, price: f64) -> Self {
        self.default_price = price;
        self
    }

    /// Returns the base price for a normalized symbol.
    #[must_use]
    pub fn base_price(&self, symbol: &str) -> f64 {
        self.prices
            .get(symbol)
            .copied()
            .unwrap_or(self.default_price)
    }

    /// Returns true if the symbol has its own entry.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.prices.contains_key(symbol)
    }
}

impl Default for BasePriceTable {
    fn default() -> Self {
        Self {
            prices: DEFAULT_BASE_PRICES
                .iter()
                .map(|(symbol, price)| ((*symbol).to_string(), *price))
                .collect(),
            default_price: DEFAULT_BASE_PRICE,
        }
    }
}

/// Derives a complete synthetic observation from a base price.
pub fn synthesize<R: Rng>(base: f64, rng: &mut R) -> QuoteFields {
    let variation = base * rng.gen_range(-MAX_VARIATION..MAX_VARIATION);

    QuoteFields::new(round_price(base + variation))
        .with_open(round_price(base * OPEN_FACTOR))
        .with_high(round_price(base * HIGH_FACTOR))
        .with_low(round_price(base * LOW_FACTOR))
        .with_previous_close(round_price(base))
        .with_volume(rng.gen_range(VOLUME_RANGE))
}

/// Quote source backed by a static table of base prices.
///
/// Always succeeds for well-formed symbols. Malformed tickers are refused so
/// that garbage input is never answered with fabricated data.
#[derive(Clone, Debug, Default)]
pub struct SyntheticSource {
    table: BasePriceTable,
}

impl SyntheticSource {
    /// Create a synthetic source with the built-in base price table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a synthetic source with a custom base price table.
    #[must_use]
    pub const fn with_table(table: BasePriceTable) -> Self {
        Self { table }
    }

    /// Returns the base price table.
    #[must_use]
    pub const fn table(&self) -> &BasePriceTable {
        &self.table
    }
}

#[async_trait]
impl QuoteSource for SyntheticSource {
    fn name(&self) -> &str {
        "Synthetic"
    }

    fn description(&self) -> &str {
        "Static fallback table with synthetic price variation"
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<QuoteFields> {
        if !symbol.is_well_formed() {
            return Err(QuoteError::NotSupported(format!(
                "no synthetic data for malformed symbol {symbol}"
            )));
        }

        let base = self.table.base_price(symbol.as_str());
        debug!(
            symbol = %symbol,
            base,
            known = self.table.contains(symbol.as_str()),
            "Synthesizing quote"
        );

        Ok(synthesize(base, &mut rand::thread_rng()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn assert_synthetic_invariants(fields: &QuoteFields, base: f64) {
        assert_eq!(fields.open, Some(round_price(base * 0.99)));
        assert_eq!(fields.high, Some(round_price(base * 1.03)));
        assert_eq!(fields.low, Some(round_price(base * 0.97)));
        assert_eq!(fields.previous_close, Some(round_price(base)));
        assert!(fields.current_price >= round_price(base * 0.95));
        assert!(fields.current_price <= round_price(base * 1.05));
        let volume = fields.volume.unwrap();
        assert!(VOLUME_RANGE.contains(&volume));
        assert!(!fields.is_degraded());
    }

    #[test]
    fn test_default_table() {
        let table = BasePriceTable::default();
        assert_eq!(table.base_price("AAPL"), 175.0);
        assert_eq!(table.base_price("NVDA"), 485.0);
        assert_eq!(table.base_price("TSLA"), 245.0);
        assert_eq!(table.base_price("MSFT"), 410.0);
        assert_eq!(table.base_price("ZZZZ"), DEFAULT_BASE_PRICE);
        assert!(!table.contains("ZZZZ"));
    }

    #[test]
    fn test_custom_table() {
        let table = BasePriceTable::empty(50.0).with_price(&Symbol::parse("amd").unwrap(), 160.0);
        assert_eq!(table.base_price("AMD"), 160.0);
        assert_eq!(table.base_price("AAPL"), 50.0);

        let table = table.with_default_price(1.0);
        assert_eq!(table.base_price("AAPL"), 1.0);
    }

    #[test]
    fn test_synthesize_known_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let fields = synthesize(175.0, &mut rng);
        assert_eq!(fields.open, Some(173.25));
        assert_eq!(fields.high, Some(180.25));
        assert_eq!(fields.low, Some(169.75));
        assert_eq!(fields.previous_close, Some(175.0));
    }

    #[test]
    fn test_synthesize_invariants_many_draws() {
        let mut rng = StdRng::seed_from_u64(7);
        for base in [175.0, 485.0, 245.0, 410.0, DEFAULT_BASE_PRICE, 0.37] {
            for _ in 0..200 {
                assert_synthetic_invariants(&synthesize(base, &mut rng), base);
            }
        }
    }

    #[tokio::test]
    async fn test_fetch_unknown_symbol_uses_default() {
        let source = SyntheticSource::new();
        let fields = source
            .fetch_quote(&Symbol::parse("unknown").unwrap())
            .await
            .unwrap();
        assert_synthetic_invariants(&fields, DEFAULT_BASE_PRICE);
    }

    #[tokio::test]
    async fn test_fetch_known_symbol() {
        let source = SyntheticSource::new();
        let fields = source
            .fetch_quote(&Symbol::parse("nvda").unwrap())
            .await
            .unwrap();
        assert_synthetic_invariants(&fields, 485.0);
    }

    #[tokio::test]
    async fn test_fetch_refuses_malformed_symbol() {
        let source = SyntheticSource::new();
        let result = source
            .fetch_quote(&Symbol::parse("BADSYMBOL!").unwrap())
            .await;
        assert!(matches!(result, Err(QuoteError::NotSupported(_))));
    }

    #[test]
    fn test_provider_info() {
        let source = SyntheticSource::default();
        assert_eq!(source.name(), "Synthetic");
        assert!(!source.description().is_empty());
        assert_eq!(source.table().base_price("AAPL"), 175.0);
    }
}
