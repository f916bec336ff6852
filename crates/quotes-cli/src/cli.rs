use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use quotes::{
    CompanionServiceSource, DEFAULT_COMPANION_URL, QuoteResolver, ResolverConfig,
    SyntheticSource, YahooScrapeSource,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Look up stock quotes with graceful fallback")]
pub(crate) struct Cli {
    /// Symbols to look up (comma-separated lists are accepted)
    #[arg(required = true, value_name = "SYMBOL")]
    symbols: Vec<String>,

    /// Base URL of the companion quote service
    #[arg(long, env = "QUOTES_SERVICE_URL", default_value = DEFAULT_COMPANION_URL)]
    service_url: String,

    /// Time budget for each source attempt, in milliseconds
    #[arg(long, env = "QUOTES_TIMEOUT_MS", default_value_t = 5000)]
    timeout_ms: u64,

    /// Maximum number of symbols resolved at once
    #[arg(long, env = "QUOTES_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Skip the companion quote service
    #[arg(long)]
    no_companion: bool,

    /// Skip scraping the Yahoo Finance quote page
    #[arg(long)]
    no_scrape: bool,

    /// Skip the synthetic fallback, so unreachable quotes print N/A
    #[arg(long)]
    no_synthetic: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub(crate) pretty: bool,
}

impl Cli {
    /// Symbols after splitting on commas, trimmed, blanks removed.
    pub(crate) fn symbols(&self) -> Vec<String> {
        self.symbols
            .iter()
            .flat_map(|arg| arg.split(','))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub(crate) fn config(&self) -> ResolverConfig {
        let config =
            ResolverConfig::default().with_source_timeout(Duration::from_millis(self.timeout_ms));
        match self.max_concurrency {
            Some(limit) => config.with_max_concurrency(limit),
            None => config,
        }
    }

    /// Build the resolver chain the flags ask for.
    pub(crate) fn resolver(&self) -> QuoteResolver {
        let mut resolver = QuoteResolver::with_config(self.config());
        if !self.no_companion {
            resolver.register(Arc::new(CompanionServiceSource::new(
                self.service_url.as_str(),
            )));
        }
        if !self.no_scrape {
            resolver.register(Arc::new(YahooScrapeSource::new()));
        }
        if !self.no_synthetic {
            resolver.register(Arc::new(SyntheticSource::new()));
        }
        resolver
    }
}
