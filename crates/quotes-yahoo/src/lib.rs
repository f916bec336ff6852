#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/stockr/quotes/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Yahoo Finance scraping quote source.
//!
//! This crate provides a [`QuoteSource`] that fetches
//! `https://finance.yahoo.com/quote/{SYMBOL}` and extracts quote fields from
//! the page's `fin-streamer` elements.
//!
//! # Features
//!
//! - Current price from `regularMarketPrice`, with a fallback selector
//! - Open, day range, previous close and volume when the page carries them
//! - Tolerant number parsing (`1,234.50`, `+0.5`, surrounding markup)
//!
//! # Example
//!
//! ```no_run
//! use quotes_yahoo::YahooScrapeSource;
//! use quotes_core::{QuoteSource, Symbol};
//!
//! # async fn example() -> quotes_core::Result<()> {
//! let source = YahooScrapeSource::new();
//! let fields = source.fetch_quote(&Symbol::parse("AAPL")?).await?;
//! println!("Last price {}", fields.current_price);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use quotes_core::{QuoteError, QuoteFields, QuoteSource, Result, Symbol};
use scraper::{Html, Selector};
use tracing::debug;

/// Yahoo Finance quote page base URL.
pub const QUOTE_PAGE_URL: &str = "https://finance.yahoo.com/quote";

/// User agent for HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Selectors tried in order for the current price.
const PRICE_SELECTORS: &[&str] = &[
    r#"fin-streamer[data-field="regularMarketPrice"]"#,
    r#"[data-testid="qsp-price"]"#,
];

const OPEN_SELECTOR: &str = r#"fin-streamer[data-field="regularMarketOpen"]"#;
const HIGH_SELECTOR: &str = r#"fin-streamer[data-field="regularMarketDayHigh"]"#;
const LOW_SELECTOR: &str = r#"fin-streamer[data-field="regularMarketDayLow"]"#;
const PREVIOUS_CLOSE_SELECTOR: &str = r#"fin-streamer[data-field="regularMarketPreviousClose"]"#;
const VOLUME_SELECTOR: &str = r#"fin-streamer[data-field="regularMarketVolume"]"#;

/// Yahoo Finance scraping source.
#[derive(Clone, Debug)]
pub struct YahooScrapeSource {
    client: reqwest::Client,
    base_url: String,
}

impl YahooScrapeSource {
    /// Create a new Yahoo Finance scraping source with default settings.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self::with_client(client)
    }

    /// Create a new Yahoo Finance scraping source with a custom HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: QUOTE_PAGE_URL.to_string(),
        }
    }

    /// Point the source at a different quote page host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build the quote page URL for a symbol.
    fn build_page_url(&self, symbol: &Symbol) -> String {
        format!("{}/{}", self.base_url, symbol.as_str())
    }
}

impl Default for YahooScrapeSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for YahooScrapeSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    fn description(&self) -> &str {
        "Prices scraped from the public Yahoo Finance quote page"
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<QuoteFields> {
        let url = self.build_page_url(symbol);
        debug!("Fetching quote page: {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(QuoteError::RateLimited {
                provider: "Yahoo Finance".to_string(),
                retry_after: Some(Duration::from_secs(60)),
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

        let html = response
            .text()
            .await
            .map_err(|e| QuoteError::Network(e.to_string()))?;

        parse_quote_page(&html)
    }
}

/// Extract quote fields from a Yahoo Finance quote page.
///
/// Fails with [`QuoteError::Parse`] when no price can be found.
pub fn parse_quote_page(html: &str) -> Result<QuoteFields> {
    let document = Html::parse_document(html);

    let price = PRICE_SELECTORS
        .iter()
        .find_map(|css| select_with(&document, css, parse_price))
        .ok_or_else(|| QuoteError::Parse("price element not found".to_string()))?;

    let fields = QuoteFields {
        current_price: price,
        open: select_with(&document, OPEN_SELECTOR, parse_price),
        high: select_with(&document, HIGH_SELECTOR, parse_price),
        low: select_with(&document, LOW_SELECTOR, parse_price),
        previous_close: select_with(&document, PREVIOUS_CLOSE_SELECTOR, parse_price),
        volume: select_with(&document, VOLUME_SELECTOR, parse_volume),
    };
    fields.validate()?;
    Ok(fields)
}

/// Read the first element matching `css` with `parse`.
///
/// The `value` attribute wins over the element text.
fn select_with<T>(document: &Html, css: &str, parse: fn(&str) -> Option<T>) -> Option<T> {
    let selector = Selector::parse(css).ok()?;
    let element = document.select(&selector).next()?;

    element
        .value()
        .attr("value")
        .and_then(parse)
        .or_else(|| parse(&element.text().collect::<String>()))
}

/// Parse a price from display text, keeping only digits, `.` and `-`.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

/// Parse a share volume such as `51,234,567` or `51.23M`.
///
/// `K`, `M`, `B` and `T` suffixes scale the number. Any other text, or a
/// negative count, yields `None`.
#[must_use]
pub fn parse_volume(text: &str) -> Option<u64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    let (number, scale) = match cleaned.chars().last()? {
        'k' | 'K' => (&cleaned[..cleaned.len() - 1], 1e3),
        'm' | 'M' => (&cleaned[..cleaned.len() - 1], 1e6),
        'b' | 'B' => (&cleaned[..cleaned.len() - 1], 1e9),
        't' | 'T' => (&cleaned[..cleaned.len() - 1], 1e12),
        _ => (cleaned.as_str(), 1.0),
    };

    let value = number.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0).then(|| (value * scale).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FULL_PAGE: &str = r#"
        <html><body>
          <section data-testid="quote-price">
            <fin-streamer data-symbol="AAPL" data-field="regularMarketPrice" value="187.44">187.44</fin-streamer>
          </section>
          <table>
            <tr><td>Previous Close</td><td><fin-streamer data-field="regularMarketPreviousClose">186.90</fin-streamer></td></tr>
            <tr><td>Open</td><td><fin-streamer data-field="regularMarketOpen">186.50</fin-streamer></td></tr>
            <tr><td>Day's Range</td><td>
              <fin-streamer data-field="regularMarketDayLow" value="185.8">185.80</fin-streamer> -
              <fin-streamer data-field="regularMarketDayHigh" value="188.1">188.10</fin-streamer>
            </td></tr>
            <tr><td>Volume</td><td><fin-streamer data-field="regularMarketVolume">51,234,567</fin-streamer></td></tr>
          </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("187.44"), Some(187.44));
        assert_eq!(parse_price("1,234.50"), Some(1234.5));
        assert_eq!(parse_price(" $42 "), Some(42.0));
        assert_eq!(parse_price("-0.75"), Some(-0.75));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("N/A"), None);
        assert_eq!(parse_price("1.2.3"), None);
    }

    #[test]
    fn test_parse_volume() {
        assert_eq!(parse_volume("51,234,567"), Some(51_234_567));
        assert_eq!(parse_volume("51.23M"), Some(51_230_000));
        assert_eq!(parse_volume("812.4k"), Some(812_400));
        assert_eq!(parse_volume("1.2B"), Some(1_200_000_000));
        assert_eq!(parse_volume(" 0 "), Some(0));
        assert_eq!(parse_volume("51.23 Mil"), None);
        assert_eq!(parse_volume("-5"), None);
        assert_eq!(parse_volume("N/A"), None);
        assert_eq!(parse_volume(""), None);
    }

    #[test]
    fn test_parse_abbreviated_volume_on_page() {
        let html = r#"
            <fin-streamer data-field="regularMarketPrice" value="187.44">187.44</fin-streamer>
            <fin-streamer data-field="regularMarketVolume">51.23M</fin-streamer>
        "#;
        assert_eq!(parse_quote_page(html).unwrap().volume, Some(51_230_000));
    }

    #[test]
    fn test_parse_full_page() {
        let fields = parse_quote_page(FULL_PAGE).unwrap();
        assert_eq!(fields.current_price, 187.44);
        assert_eq!(fields.open, Some(186.5));
        assert_eq!(fields.high, Some(188.1));
        assert_eq!(fields.low, Some(185.8));
        assert_eq!(fields.previous_close, Some(186.9));
        assert_eq!(fields.volume, Some(51_234_567));
        assert!(!fields.is_degraded());
    }

    #[test]
    fn test_parse_price_only_page() {
        let html = r#"<div><span data-testid="qsp-price">2,450.10</span></div>"#;
        let fields = parse_quote_page(html).unwrap();
        assert_eq!(fields.current_price, 2450.1);
        assert!(fields.is_degraded());
        assert_eq!(fields.volume, None);
    }

    #[test]
    fn test_value_attribute_preferred() {
        let html = r#"<fin-streamer data-field="regularMarketPrice" value="99.5">stale 98.00</fin-streamer>"#;
        assert_eq!(parse_quote_page(html).unwrap().current_price, 99.5);
    }

    #[test]
    fn test_parse_page_without_price() {
        let html = "<html><body><h1>Symbol lookup</h1></body></html>";
        assert!(matches!(parse_quote_page(html), Err(QuoteError::Parse(_))));
    }

    #[test]
    fn test_parse_page_with_garbage_price() {
        let html = r#"<fin-streamer data-field="regularMarketPrice">--</fin-streamer>"#;
        assert!(matches!(parse_quote_page(html), Err(QuoteError::Parse(_))));
    }

    #[test]
    fn test_build_page_url() {
        let source = YahooScrapeSource::new();
        let url = source.build_page_url(&Symbol::parse("brk.b").unwrap());
        assert_eq!(url, "https://finance.yahoo.com/quote/BRK.B");

        let source = source.with_base_url("http://127.0.0.1:1234/quote/");
        let url = source.build_page_url(&Symbol::parse("AAPL").unwrap());
        assert_eq!(url, "http://127.0.0.1:1234/quote/AAPL");
    }

    #[test]
    fn test_provider_info() {
        let source = YahooScrapeSource::default();
        assert_eq!(source.name(), "Yahoo Finance");
        assert!(!source.description().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_quote_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/AAPL"))
            .and(header_exists("user-agent"))
            .respond_with(ResponseTemplate::new(200).set_body_string(FULL_PAGE))
            .expect(1)
            .mount(&server)
            .await;

        let source = YahooScrapeSource::new().with_base_url(format!("{}/quote", server.uri()));
        let fields = source
            .fetch_quote(&Symbol::parse("aapl").unwrap())
            .await
            .unwrap();
        assert_eq!(fields.current_price, 187.44);
    }

    #[tokio::test]
    async fn test_fetch_quote_page_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote/GONE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/quote/EMPTY"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let source = YahooScrapeSource::new().with_base_url(format!("{}/quote", server.uri()));
        let gone = source.fetch_quote(&Symbol::parse("GONE").unwrap()).await;
        assert!(matches!(gone, Err(QuoteError::SymbolNotFound(_))));

        let empty = source.fetch_quote(&Symbol::parse("EMPTY").unwrap()).await;
        assert!(matches!(empty, Err(QuoteError::Parse(_))));
    }
}
