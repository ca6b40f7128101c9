pub mod store;

pub use store::*;

use crate::error::Result;
use crate::filters::Predicate;
use crate::models::{EntityType, Record, RecordSummary};
use async_trait::async_trait;
use uuid::Uuid;

/// Storage operations the search and listing layers depend on
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Save or replace a record
    async fn save_record(&self, record: Record) -> Result<()>;

    /// Get a record by ID
    async fn get_record(&self, id: &Uuid) -> Result<Option<Record>>;

    /// Records of one kind whose searchable fields contain `query`
    /// (case-insensitive), in secondary order, at most `limit`
    async fn search_candidates(
        &self,
        entity_type: EntityType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Record>>;

    /// Short previews of records linked to `record`
    async fn related(&self, record: &Record, limit: usize) -> Result<Vec<RecordSummary>>;

    /// Records of one kind matching a compiled predicate, one page at a time
    async fn list_records(
        &self,
        entity_type: EntityType,
        predicate: &Predicate,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Record>>;

    /// Count records of one kind matching a compiled predicate
    async fn count_records(&self, entity_type: EntityType, predicate: &Predicate) -> Result<u64>;
}
