//! Resolver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time budget for a single source attempt.
const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning knobs for a [`QuoteResolver`](crate::QuoteResolver).
///
/// Deserializes from `{ "source_timeout_ms": 5000, "max_concurrency": 8 }`;
/// both keys are optional.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Time budget for each individual source attempt.
    #[serde(rename = "source_timeout_ms", with = "millis")]
    pub source_timeout: Duration,
    /// Upper bound on symbols resolved at once in a batch. `None` is unbounded.
    pub max_concurrency: Option<usize>,
}

impl ResolverConfig {
    /// Sets the per-source timeout.
    #[must_use]
    pub const fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    /// Caps how many symbols a batch resolves concurrently.
    ///
    /// A limit of zero is treated as one.
    #[must_use]
    pub const fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.max_concurrency = Some(limit);
        self
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
            max_concurrency: None,
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(
        value: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ResolverConfig::default();
        assert_eq!(config.source_timeout, Duration::from_secs(5));
        assert_eq!(config.max_concurrency, None);
    }

    #[test]
    fn test_builder() {
        let config = ResolverConfig::default()
            .with_source_timeout(Duration::from_millis(250))
            .with_max_concurrency(4);
        assert_eq!(config.source_timeout, Duration::from_millis(250));
        assert_eq!(config.max_concurrency, Some(4));
    }

    #[test]
    fn test_deserialize() {
        let config: ResolverConfig =
            serde_json::from_str(r#"{ "source_timeout_ms": 1500, "max_concurrency": 3 }"#).unwrap();
        assert_eq!(config.source_timeout, Duration::from_millis(1500));
        assert_eq!(config.max_concurrency, Some(3));

        let config: ResolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ResolverConfig::default());
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let json = serde_json::to_value(ResolverConfig::default()).unwrap();
        assert_eq!(json["source_timeout_ms"], 5000);
        assert!(json["max_concurrency"].is_null());
    }
}
