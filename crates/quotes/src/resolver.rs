//! Quote resolver that tries multiple sources in priority order.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use quotes_core::{Quote, QuoteSource, Symbol};

use crate::config::ResolverConfig;

/// Resolver for stock quotes with ordered fallback across sources.
///
/// Sources are tried in registration order until one produces a usable
/// observation. Failures and timeouts are logged and absorbed; a symbol
/// nobody can answer for resolves to `None` rather than an error.
///
/// # Example
///
/// ```rust,ignore
/// use std::sync::Arc;
/// use quotes::{QuoteResolver, SyntheticSource};
///
/// let mut resolver = QuoteResolver::new();
/// resolver.register(Arc::new(SyntheticSource::new()));
///
/// let quote = resolver.get_quote("msft").await;
/// assert_eq!(quote.unwrap().symbol.as_str(), "MSFT");
/// ```
#[derive(Clone, Default)]
pub struct QuoteResolver {
    sources: Vec<Arc<dyn QuoteSource>>,
    config: ResolverConfig,
}

impl std::fmt::Debug for QuoteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteResolver")
            .field(
                "sources",
                &self.sources.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .field("config", &self.config)
            .finish()
    }
}

impl QuoteResolver {
    /// Create a new resolver with no sources and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new resolver with no sources and the given configuration.
    #[must_use]
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            sources: Vec::new(),
            config,
        }
    }

    /// Returns the resolver configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the names of the registered sources in priority order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Register a source after every source already registered.
    pub fn register(&mut self, source: Arc<dyn QuoteSource>) {
        debug!(provider = source.name(), "Registering quote source");
        self.sources.push(source);
    }

    /// Register a source, builder style.
    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn QuoteSource>) -> Self {
        self.register(source);
        self
    }

    /// Resolve a single symbol.
    ///
    /// Returns `None` for blank symbols (without touching any source) and
    /// when every source fails. Errors, timeouts and panics inside a source
    /// all count as that source failing.
    pub async fn get_quote(&self, symbol: &str) -> Option<Quote> {
        self.get_quote_with_cancel(symbol, &CancellationToken::new())
            .await
    }

    /// Resolve a single symbol, giving up as soon as `cancel` fires.
    pub async fn get_quote_with_cancel(
        &self,
        symbol: &str,
        cancel: &CancellationToken,
    ) -> Option<Quote> {
        let symbol = match Symbol::parse(symbol) {
            Ok(symbol) => symbol,
            Err(e) => {
                debug!(error = %e, "Rejecting symbol");
                return None;
            }
        };

        if self.sources.is_empty() {
            warn!(symbol = %symbol, "No quote sources registered");
            return None;
        }

        for source in &self.sources {
            if cancel.is_cancelled() {
                debug!(symbol = %symbol, "Resolution cancelled");
                return None;
            }

            debug!(provider = source.name(), symbol = %symbol, "Fetching quote");

            // A panicking source counts as a failed attempt.
            let attempt = AssertUnwindSafe(async {
                tokio::time::timeout(self.config.source_timeout, source.fetch_quote(&symbol)).await
            })
            .catch_unwind();
            let outcome = tokio::select! {
                () = cancel.cancelled() => {
                    debug!(provider = source.name(), symbol = %symbol, "Resolution cancelled");
                    return None;
                }
                outcome = attempt => outcome,
            };

            let Ok(outcome) = outcome else {
                warn!(
                    provider = source.name(),
                    symbol = %symbol,
                    "Source panicked, trying next"
                );
                continue;
            };

            match outcome {
                Ok(Ok(fields)) => match fields.validate() {
                    Ok(()) => {
                        if fields.is_degraded() {
                            debug!(
                                provider = source.name(),
                                symbol = %symbol,
                                "Source returned partial data, deriving missing fields"
                            );
                        }
                        return Some(fields.complete(symbol, Utc::now().timestamp()));
                    }
                    Err(e) => {
                        warn!(
                            provider = source.name(),
                            symbol = %symbol,
                            error = %e,
                            "Source returned unusable data, trying next"
                        );
                    }
                },
                Ok(Err(e)) => {
                    warn!(
                        provider = source.name(),
                        symbol = %symbol,
                        error = %e,
                        "Source failed, trying next"
                    );
                }
                Err(_) => {
                    warn!(
                        provider = source.name(),
                        symbol = %symbol,
                        timeout_ms = self.config.source_timeout.as_millis() as u64,
                        "Source timed out, trying next"
                    );
                }
            }
        }

        warn!(symbol = %symbol, "All quote sources exhausted");
        None
    }

    /// Resolve many symbols concurrently.
    ///
    /// The result keeps input order and leaves out symbols that could not be
    /// resolved. Repeated symbols are resolved independently.
    pub async fn get_quotes<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<Quote> {
        self.get_quotes_with_cancel(symbols, &CancellationToken::new())
            .await
    }

    /// Resolve many symbols concurrently, giving up as soon as `cancel` fires.
    pub async fn get_quotes_with_cancel<S: AsRef<str>>(
        &self,
        symbols: &[S],
        cancel: &CancellationToken,
    ) -> Vec<Quote> {
        if symbols.is_empty() {
            return Vec::new();
        }

        debug!(symbol_count = symbols.len(), "Fetching batch quotes");

        let limiter = self
            .config
            .max_concurrency
            .map(|limit| Semaphore::new(limit.max(1)));

        let tasks = symbols.iter().map(|symbol| {
            let symbol = symbol.as_ref();
            let limiter = limiter.as_ref();
            async move {
                let _permit = match limiter {
                    Some(limiter) => tokio::select! {
                        () = cancel.cancelled() => return None,
                        permit = limiter.acquire() => permit.ok(),
                    },
                    None => None,
                };

                self.get_quote_with_cancel(symbol, cancel).await
            }
        });

        let quotes: Vec<Quote> = join_all(tasks).await.into_iter().flatten().collect();

        debug!(
            requested = symbols.len(),
            resolved = quotes.len(),
            "Batch quotes resolved"
        );
        quotes
    }

    // Builder methods for easy setup with specific sources

    /// Add the companion quote service source.
    #[cfg(feature = "companion")]
    #[must_use]
    pub fn with_companion(self, base_url: &str) -> Self {
        self.with_source(Arc::new(quotes_companion::CompanionServiceSource::new(
            base_url,
        )))
    }

    /// Add the Yahoo Finance scraping source.
    #[cfg(feature = "yahoo")]
    #[must_use]
    pub fn with_yahoo(self) -> Self {
        self.with_source(Arc::new(quotes_yahoo::YahooScrapeSource::new()))
    }

    /// Add the synthetic fallback source.
    #[cfg(feature = "synthetic")]
    #[must_use]
    pub fn with_synthetic(self) -> Self {
        self.with_source(Arc::new(quotes_synthetic::SyntheticSource::new()))
    }

    /// Build the standard chain: companion service, Yahoo Finance, synthetic.
    #[cfg(all(feature = "companion", feature = "yahoo", feature = "synthetic"))]
    #[must_use]
    pub fn default_chain(config: ResolverConfig, companion_url: &str) -> Self {
        Self::with_config(config)
            .with_companion(companion_url)
            .with_yahoo()
            .with_synthetic()
    }
}
