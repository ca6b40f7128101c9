//! Multi-entity search orchestration

use crate::models::{EntityType, Record, RecordSummary};
use crate::search::config::SearchConfig;
use crate::search::error::{SearchError, SearchResult};
use crate::search::query::SearchRequest;
use crate::search::scorer::relevance_score;
use crate::state::RecordRepository;
use futures::future::join_all;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// A single search result hit
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub entity_type: EntityType,

    /// The matched record
    pub record: Record,

    /// Additive relevance score
    pub relevance_score: u32,

    /// Linked records, when previews were requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related: Option<Vec<RecordSummary>>,
}

/// An entity type whose bucket could not be produced
#[derive(Debug, Clone, Serialize)]
pub struct EntityFailure {
    pub entity_type: EntityType,
    pub error: String,
}

/// Search response with per-entity buckets and metadata
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    /// Query that was executed
    pub query: String,

    /// Ranked hits keyed by entity type, one bucket per succeeded type
    pub results: BTreeMap<EntityType, Vec<SearchHit>>,

    /// Sum of bucket sizes
    pub total_results: usize,

    /// Entity types that failed, with the reason
    pub failed: Vec<EntityFailure>,

    /// Search execution time in milliseconds
    pub search_time_ms: u64,
}

impl SearchResponse {
    /// Hits for one entity type, empty when the type was not searched
    pub fn bucket(&self, entity_type: EntityType) -> &[SearchHit] {
        self.results
            .get(&entity_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Main search service
pub struct SearchService {
    repository: Arc<dyn RecordRepository>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(repository: Arc<dyn RecordRepository>, config: SearchConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search every requested entity type concurrently.
    ///
    /// Each entity type runs in its own task. A failing or panicking task
    /// only removes its own bucket and is reported under `failed`.
    pub async fn search(&self, request: &SearchRequest) -> SearchResult<SearchResponse> {
        let query = request.query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidRequest(
                "query must not be blank".to_string(),
            ));
        }
        if request.entity_types.is_empty() {
            return Err(SearchError::InvalidRequest(
                "at least one entity type is required".to_string(),
            ));
        }

        let start_time = Instant::now();
        let preview_limit = request
            .include_related
            .then_some(self.config.related_preview_limit);

        let (entity_types, tasks): (Vec<_>, Vec<_>) = request
            .entity_types
            .iter()
            .map(|&entity_type| {
                let repository = Arc::clone(&self.repository);
                let query = query.to_string();
                let limit = request.limit;
                let task = tokio::spawn(async move {
                    search_entity(repository, entity_type, query, limit, preview_limit).await
                });
                (entity_type, task)
            })
            .unzip();

        let outcomes = join_all(tasks).await;

        let mut results = BTreeMap::new();
        let mut failed = Vec::new();
        for (entity_type, outcome) in entity_types.into_iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|e| {
                Err(SearchError::TaskFailed {
                    entity_type,
                    message: e.to_string(),
                })
            });

            match outcome {
                Ok(hits) => {
                    results.insert(entity_type, hits);
                }
                Err(err) => {
                    tracing::warn!(
                        entity_type = %entity_type,
                        error = %err,
                        "Entity search failed"
                    );
                    failed.push(EntityFailure {
                        entity_type,
                        error: err.to_string(),
                    });
                }
            }
        }

        let total_results = results.values().map(Vec::len).sum();
        let search_time_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            query = %query,
            total_results,
            failed = failed.len(),
            elapsed_ms = search_time_ms,
            "Search completed"
        );

        Ok(SearchResponse {
            query: query.to_string(),
            results,
            total_results,
            failed,
            search_time_ms,
        })
    }
}

/// Fetch, score and rank one entity bucket
async fn search_entity(
    repository: Arc<dyn RecordRepository>,
    entity_type: EntityType,
    query: String,
    limit: usize,
    preview_limit: Option<usize>,
) -> SearchResult<Vec<SearchHit>> {
    let repository_error = |e: crate::error::AppError| SearchError::Repository {
        entity_type,
        message: e.to_string(),
    };

    let candidates = repository
        .search_candidates(entity_type, &query, limit)
        .await
        .map_err(repository_error)?;

    let mut hits = Vec::with_capacity(candidates.len());
    for record in candidates {
        let relevance_score = relevance_score(&query, &record.searchable_fields());
        let related = match preview_limit {
            Some(n) => Some(
                repository
                    .related(&record, n)
                    .await
                    .map_err(repository_error)?,
            ),
            None => None,
        };

        hits.push(SearchHit {
            entity_type,
            record,
            relevance_score,
            related,
        });
    }

    hits.sort_by(|a, b| {
        b.relevance_score
            .cmp(&a.relevance_score)
            .then_with(|| a.record.secondary_cmp(&b.record))
    });

    tracing::debug!(
        entity_type = %entity_type,
        hits = hits.len(),
        "Entity bucket ranked"
    );
    Ok(hits)
}
