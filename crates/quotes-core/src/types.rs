//! Core data types for stock quotes.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Symbol`] - Normalized ticker symbol
//! - [`QuoteFields`] - Partial observation reported by a single source
//! - [`Quote`] - Complete quote returned to callers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{QuoteError, Result};

/// Longest ticker accepted by [`Symbol::is_well_formed`].
const MAX_SYMBOL_LEN: usize = 12;

/// A trading symbol/ticker.
///
/// Symbols are trimmed and uppercased on creation and are never empty.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    /// Parses a symbol, trimming whitespace and converting to uppercase.
    ///
    /// Returns [`QuoteError::InvalidSymbol`] for empty or whitespace-only input.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(QuoteError::InvalidSymbol(s.to_string()));
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol looks like a real ticker.
    ///
    /// Accepts 1 to 12 ASCII alphanumerics, `.`, `-`, `^` or `=`
    /// (covers `BRK.B`, `^GSPC`, `EURUSD=X`).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.0.len() <= MAX_SYMBOL_LEN
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Symbol {
    type Error = QuoteError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Rounds a price to two decimal places, half away from zero.
#[must_use]
pub fn round_price(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A complete quote for one symbol at resolution time.
///
/// Serialized with camelCase field names. Every field is always populated;
/// fields a source could not observe are derived by [`QuoteFields::complete`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Normalized symbol.
    pub symbol: Symbol,
    /// Latest traded price.
    pub current_price: f64,
    /// Opening price of the session.
    pub open_price: f64,
    /// Session high.
    pub high_price: f64,
    /// Session low.
    pub low_price: f64,
    /// Previous session close.
    pub previous_close: f64,
    /// Session volume.
    pub volume: u64,
    /// Seconds since the Unix epoch (UTC) at which the quote was resolved.
    pub timestamp: i64,
}

/// The fields a single source managed to observe.
///
/// Only `current_price` is mandatory. A source that recovers nothing but a
/// price (a scraped page, for instance) reports a degraded observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuoteFields {
    /// Latest traded price.
    pub current_price: f64,
    /// Opening price, if observed.
    pub open: Option<f64>,
    /// Session high, if observed.
    pub high: Option<f64>,
    /// Session low, if observed.
    pub low: Option<f64>,
    /// Previous close, if observed.
    pub previous_close: Option<f64>,
    /// Volume, if observed.
    pub volume: Option<u64>,
}

impl QuoteFields {
    /// Creates an observation with only the current price.
    #[must_use]
    pub const fn new(current_price: f64) -> Self {
        Self {
            current_price,
            open: None,
            high: None,
            low: None,
            previous_close: None,
            volume: None,
        }
    }

    /// Sets the opening price.
    #[must_use]
    pub const fn with_open(mut self, open: f64) -> Self {
        self.open = Some(open);
        self
    }

    /// Sets the session high.
    #[must_use]
    pub const fn with_high(mut self, high: f64) -> Self {
        self.high = Some(high);
        self
    }

    /// Sets the session low.
    #[must_use]
    pub const fn with_low(mut self, low: f64) -> Self {
        self.low = Some(low);
        self
    }

    /// Sets the previous close.
    #[must_use]
    pub const fn with_previous_close(mut self, previous_close: f64) -> Self {
        self.previous_close = Some(previous_close);
        self
    }

    /// Sets the volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Returns true if any field other than the current price is missing.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.open.is_none()
            || self.high.is_none()
            || self.low.is_none()
            || self.previous_close.is_none()
            || self.volume.is_none()
    }

    /// Checks that every observed price is a finite, positive number.
    pub fn validate(&self) -> Result<()> {
        let prices = [
            Some(self.current_price),
            self.open,
            self.high,
            self.low,
            self.previous_close,
        ];
        match prices
            .into_iter()
            .flatten()
            .find(|p| !p.is_finite() || *p <= 0.0)
        {
            Some(bad) => Err(QuoteError::Parse(format!("implausible price {bad}"))),
            None => Ok(()),
        }
    }

    /// Builds a complete [`Quote`], deriving whatever was not observed.
    ///
    /// Missing open, high, low and previous close take the current price;
    /// missing volume becomes zero.
    #[must_use]
    pub fn complete(self, symbol: Symbol, timestamp: i64) -> Quote {
        let price = self.current_price;
        Quote {
            symbol,
            current_price: price,
            open_price: self.open.unwrap_or(price),
            high_price: self.high.unwrap_or(price),
            low_price: self.low.unwrap_or(price),
            previous_close: self.previous_close.unwrap_or(price),
            volume: self.volume.unwrap_or(0),
            timestamp,
        }
    }
}
