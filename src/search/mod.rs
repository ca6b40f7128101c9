//! Multi-entity relevance search
//!
//! A search runs one task per requested entity type. Each task fetches
//! candidate records from the repository, scores them with the additive
//! relevance scorer and ranks them into that entity's bucket:
//!
//! ```text
//!            SearchService::search()
//!                     │
//!     ┌───────────┬───┴───────┬────────────┐
//!     ▼           ▼           ▼            ▼
//! companies   contacts      deals     activities     (tokio tasks)
//!     │           │           │            │
//!     └───────────┴─────┬─────┴────────────┘
//!                       ▼
//!        results{entity → hits} + failed[]
//! ```
//!
//! A failing entity type never sinks the others; it is reported in
//! `SearchResponse::failed`.
//!
//! # Example
//!
//! ```no_run
//! use records_manager::search::{SearchConfig, SearchRequest, SearchService};
//! use records_manager::state::InMemoryRecordStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryRecordStore::new());
//!     let search = SearchService::new(store, SearchConfig::default());
//!
//!     let results = search.search(&SearchRequest::new("acme").with_limit(10)).await?;
//!     println!("Found {} records", results.total_results);
//!
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod query;
mod scorer;
mod service;

pub use config::{SearchConfig, SearchConfigBuilder};
pub use error::{SearchError, SearchResult};
pub use query::{parse_entity_types, SearchParams, SearchRequest};
pub use scorer::{relevance_score, EXACT_MATCH, PREFIX_MATCH, SUBSTRING_MATCH, WORD_MATCH};
pub use service::{EntityFailure, SearchHit, SearchResponse, SearchService};
