//! Search configuration

use serde::{Deserialize, Serialize};

/// Search service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Results per entity type when the request does not say
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Upper bound on results per entity type
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,

    /// Longest accepted query, in characters
    #[serde(default = "default_max_query_length")]
    pub max_query_length: usize,

    /// Related records attached to each hit when previews are requested
    #[serde(default = "default_related_preview_limit")]
    pub related_preview_limit: usize,
}

fn default_limit() -> usize {
    20
}

fn default_max_limit() -> usize {
    50
}

fn default_max_query_length() -> usize {
    100
}

fn default_related_preview_limit() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            max_query_length: default_max_query_length(),
            related_preview_limit: default_related_preview_limit(),
        }
    }
}

/// Builder for SearchConfig
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    pub fn default_limit(mut self, limit: usize) -> Self {
        self.config.default_limit = limit;
        self
    }

    pub fn max_limit(mut self, limit: usize) -> Self {
        self.config.max_limit = limit;
        self
    }

    pub fn max_query_length(mut self, length: usize) -> Self {
        self.config.max_query_length = length;
        self
    }

    pub fn related_preview_limit(mut self, limit: usize) -> Self {
        self.config.related_preview_limit = limit;
        self
    }

    pub fn build(self) -> SearchConfig {
        self.config
    }
}

impl Default for SearchConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
