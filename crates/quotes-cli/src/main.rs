//! `quotes` - look up stock quotes from the command line.
//!
//! One symbol prints a single JSON quote, or `N/A` with exit code 1 when no
//! source could answer. Several symbols print a JSON array of the quotes that
//! resolved.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::Parser;
use quotes::{CancellationToken, QuoteResolver};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let symbols = cli.symbols();
    if symbols.is_empty() {
        bail!("Symbols cannot be empty");
    }

    let resolver = cli.resolver();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding lookups");
            trigger.cancel();
        }
    });

    let (output, code) = lookup(&resolver, &symbols, cli.pretty, &cancel).await?;
    println!("{output}");
    Ok(code)
}

/// Resolve `symbols` and render what should be printed, with the exit code.
async fn lookup(
    resolver: &QuoteResolver,
    symbols: &[String],
    pretty: bool,
    cancel: &CancellationToken,
) -> anyhow::Result<(String, ExitCode)> {
    if let [symbol] = symbols {
        return match resolver.get_quote_with_cancel(symbol, cancel).await {
            Some(quote) => Ok((render(&quote, pretty)?, ExitCode::SUCCESS)),
            None => Ok(("N/A".to_string(), ExitCode::FAILURE)),
        };
    }

    let quotes = resolver.get_quotes_with_cancel(symbols, cancel).await;
    Ok((render(&quotes, pretty)?, ExitCode::SUCCESS))
}

fn render<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.context("failed to encode quotes as JSON")
}
