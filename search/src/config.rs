//! Configuration for semantic search.

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;
use crate::template::DescriptionTemplate;

/// Configuration for the search orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of results when the caller does not ask for a count.
    pub default_limit: usize,

    /// How a book is described to the embedding model.
    #[serde(with = "template_string")]
    pub description_template: DescriptionTemplate,

    /// Retries for the query embedding.
    pub query_retry: RetryPolicy,

    /// Backfill configuration.
    pub backfill: BackfillConfig,
}

impl SearchConfig {
    /// Set the backfill configuration.
    pub fn with_backfill(mut self, backfill: BackfillConfig) -> Self {
        self.backfill = backfill;
        self
    }

    /// Set the retry policy for query embeddings.
    pub fn with_query_retry(mut self, retry: RetryPolicy) -> Self {
        self.query_retry = retry;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: 5,
            description_template: DescriptionTemplate::default(),
            query_retry: RetryPolicy::none(),
            backfill: BackfillConfig::default(),
        }
    }
}

/// Configuration for embedding backfill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackfillConfig {
    /// Embedding requests allowed in flight at once. One means sequential.
    pub concurrency: usize,

    /// Retries for each book's embedding.
    pub retry: RetryPolicy,
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            concurrency: 1,
            retry: RetryPolicy::none(),
        }
    }
}

mod template_string {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::template::DescriptionTemplate;

    pub(super) fn serialize<S: Serializer>(
        template: &DescriptionTemplate,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(template.as_str())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<DescriptionTemplate, D::Error> {
        let source = String::deserialize(deserializer)?;
        DescriptionTemplate::parse(source).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_do_not_retry() {
        let config = SearchConfig::default();
        assert_eq!(config.default_limit, 5);
        assert_eq!(config.query_retry, RetryPolicy::none());
        assert_eq!(config.backfill.concurrency, 1);
        assert_eq!(config.backfill.retry, RetryPolicy::none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SearchConfig = serde_json::from_value(serde_json::json!({
            "description_template": "{{ title }} ({{ author }})",
            "backfill": { "retry": { "max_attempts": 3 } }
        }))
        .unwrap();

        assert_eq!(config.default_limit, 5);
        assert_eq!(
            config.description_template.as_str(),
            "{{ title }} ({{ author }})"
        );
        assert_eq!(config.backfill.concurrency, 1);
        assert_eq!(config.backfill.retry.max_attempts, 3);
        assert_eq!(config.backfill.retry.backoff_ms, 0);
    }

    #[test]
    fn test_bad_template_fails_deserialization() {
        let result: Result<SearchConfig, _> = serde_json::from_value(serde_json::json!({
            "description_template": "{{ isbn }}"
        }));
        assert!(result.is_err());
    }
}
