//! Search request building and parsing

use crate::models::EntityType;
use crate::search::config::SearchConfig;
use crate::search::error::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use validator::Validate;

/// Raw query-string parameters of the search endpoint
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SearchParams {
    /// Free-text query
    #[validate(length(min = 1, max = 100))]
    pub q: String,

    /// Comma-separated entity types; all searchable types when absent
    #[serde(default)]
    pub types: Option<String>,

    /// Results per entity type
    #[serde(default)]
    pub limit: Option<usize>,

    /// Attach related-record previews to each hit
    #[serde(default)]
    pub include_related: bool,
}

impl SearchParams {
    /// Validate and normalise into a request
    pub fn into_request(self, config: &SearchConfig) -> SearchResult<SearchRequest> {
        self.validate()?;

        let query = self.q.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidRequest(
                "query must not be blank".to_string(),
            ));
        }
        if query.chars().count() > config.max_query_length {
            return Err(SearchError::InvalidRequest(format!(
                "query must be at most {} characters",
                config.max_query_length
            )));
        }

        let entity_types = match self.types.as_deref() {
            Some(types) if !types.trim().is_empty() => parse_entity_types(types)?,
            _ => EntityType::SEARCHABLE.to_vec(),
        };

        let limit = self
            .limit
            .unwrap_or(config.default_limit)
            .clamp(1, config.max_limit.max(1));

        Ok(SearchRequest {
            query: query.to_string(),
            entity_types,
            limit,
            include_related: self.include_related,
        })
    }
}

/// Parse a comma-separated list of entity types.
///
/// Unknown and non-searchable names are dropped and duplicates collapse; an
/// empty result is an error.
pub fn parse_entity_types(csv: &str) -> SearchResult<Vec<EntityType>> {
    let mut types = Vec::new();
    for name in csv.split(',') {
        if let Ok(entity_type) = EntityType::from_str(name.trim()) {
            if entity_type.is_searchable() && !types.contains(&entity_type) {
                types.push(entity_type);
            }
        }
    }

    if types.is_empty() {
        return Err(SearchError::InvalidRequest(format!(
            "no searchable entity types in `{csv}`"
        )));
    }
    Ok(types)
}

/// A normalised multi-entity search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The search text
    pub query: String,

    /// Entity types to search, each producing one bucket
    pub entity_types: Vec<EntityType>,

    /// Results per entity type
    pub limit: usize,

    /// Attach related-record previews
    pub include_related: bool,
}

impl SearchRequest {
    /// Search every searchable entity type with the default limit
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            entity_types: EntityType::SEARCHABLE.to_vec(),
            limit: SearchConfig::default().default_limit,
            include_related: false,
        }
    }

    pub fn with_types(mut self, entity_types: Vec<EntityType>) -> Self {
        self.entity_types = entity_types;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_related(mut self, include_related: bool) -> Self {
        self.include_related = include_related;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(q: &str) -> SearchParams {
        SearchParams {
            q: q.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_cover_all_searchable_types() {
        let request = params("acme").into_request(&SearchConfig::default()).unwrap();
        assert_eq!(request.entity_types, EntityType::SEARCHABLE.to_vec());
        assert_eq!(request.limit, 20);
        assert!(!request.include_related);
    }

    #[test]
    fn test_unknown_types_are_dropped() {
        let request = SearchParams {
            types: Some("deals, invoices,Deal,patients,contacts".to_string()),
            ..params("acme")
        }
        .into_request(&SearchConfig::default())
        .unwrap();
        assert_eq!(
            request.entity_types,
            vec![EntityType::Deal, EntityType::Contact]
        );
    }

    #[test]
    fn test_no_valid_types_is_an_error() {
        let err = SearchParams {
            types: Some("invoices,patients".to_string()),
            ..params("acme")
        }
        .into_request(&SearchConfig::default())
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidRequest(_)));
    }

    #[test]
    fn test_limit_is_clamped() {
        let config = SearchConfig::default();
        let high = SearchParams {
            limit: Some(500),
            ..params("acme")
        };
        assert_eq!(high.into_request(&config).unwrap().limit, 50);

        let zero = SearchParams {
            limit: Some(0),
            ..params("acme")
        };
        assert_eq!(zero.into_request(&config).unwrap().limit, 1);
    }

    #[test]
    fn test_query_length_is_checked() {
        let config = SearchConfig::default();
        assert!(params("").into_request(&config).is_err());
        assert!(params("   ").into_request(&config).is_err());
        assert!(params(&"x".repeat(101)).into_request(&config).is_err());
        assert!(params(&"x".repeat(100)).into_request(&config).is_ok());
    }
}
