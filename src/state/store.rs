use crate::error::Result;
use crate::filters::{Filterable, Predicate, Scalar};
use crate::models::{EntityType, Record, RecordSummary};
use crate::state::RecordRepository;
use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// In-memory record store (for development and testing)
#[derive(Clone)]
pub struct InMemoryRecordStore {
    records: Arc<DashMap<Uuid, Record>>,
}

/// A record whose dotted relationship keys (`company.name`) are looked up
/// on the linked record
struct Resolved<'a> {
    record: &'a Record,
    records: &'a DashMap<Uuid, Record>,
}

impl Filterable for Resolved<'_> {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match key.split_once('.') {
            Some((relation, field)) => {
                let id = self.record.relation_id(relation)?;
                self.records
                    .get(&id)
                    .and_then(|target| target.value().field_value(field))
            }
            None => self.record.field_value(key),
        }
    }
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
        }
    }

    /// Insert a record of any kind, returning its id
    pub fn insert(&self, record: impl Into<Record>) -> Uuid {
        let record = record.into();
        let id = record.id();
        self.records.insert(id, record);
        id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Copy out every record of one kind so no shard lock is held while
    /// relationship lookups run
    fn snapshot(&self, entity_type: EntityType) -> Vec<Record> {
        self.records
            .iter()
            .filter(|entry| entry.value().entity_type() == entity_type)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn matching(
        &self,
        entity_type: EntityType,
        predicate: &Predicate,
        today: NaiveDate,
    ) -> Vec<Record> {
        self.snapshot(entity_type)
            .into_iter()
            .filter(|record| {
                let view = Resolved {
                    record,
                    records: &self.records,
                };
                predicate.evaluate(&view, today)
            })
            .collect()
    }

    fn summary_of(&self, id: Option<Uuid>) -> Option<RecordSummary> {
        let id = id?;
        self.records.get(&id).map(|entry| entry.value().summary())
    }

    /// Records pointing at `id` through `relation`
    fn referencing(&self, relation: &str, id: Uuid, kind: EntityType) -> Vec<Record> {
        let mut found: Vec<Record> = self
            .snapshot(kind)
            .into_iter()
            .filter(|r| r.relation_id(relation) == Some(id))
            .collect();
        found.sort_by(|a, b| a.secondary_cmp(b));
        found
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordStore {
    async fn save_record(&self, record: Record) -> Result<()> {
        let id = record.id();
        let entity_type = record.entity_type();
        self.records.insert(id, record);

        tracing::debug!(record_id = %id, entity_type = %entity_type, "Record saved");
        Ok(())
    }

    async fn get_record(&self, id: &Uuid) -> Result<Option<Record>> {
        Ok(self.records.get(id).map(|entry| entry.clone()))
    }

    async fn search_candidates(
        &self,
        entity_type: EntityType,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Record>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut candidates: Vec<Record> = self
            .snapshot(entity_type)
            .into_iter()
            .filter(|record| {
                record
                    .searchable_fields()
                    .into_iter()
                    .flatten()
                    .any(|value| value.to_lowercase().contains(&needle))
            })
            .collect();

        candidates.sort_by(|a, b| a.secondary_cmp(b));
        candidates.truncate(limit);
        Ok(candidates)
    }

    async fn related(&self, record: &Record, limit: usize) -> Result<Vec<RecordSummary>> {
        let id = record.id();
        let mut related: Vec<RecordSummary> = match record {
            Record::Company(_) => self
                .referencing("company", id, EntityType::Contact)
                .into_iter()
                .chain(self.referencing("company", id, EntityType::Deal))
                .map(|r| r.summary())
                .collect(),
            Record::Contact(c) => self
                .summary_of(c.company_id)
                .into_iter()
                .chain(
                    self.referencing("contact", id, EntityType::Deal)
                        .into_iter()
                        .map(|r| r.summary()),
                )
                .collect(),
            Record::Deal(d) => [d.company_id, d.contact_id]
                .into_iter()
                .filter_map(|link| self.summary_of(link))
                .collect(),
            Record::Activity(a) => [a.company_id, a.contact_id, a.deal_id]
                .into_iter()
                .filter_map(|link| self.summary_of(link))
                .collect(),
            Record::Patient(_) => Vec::new(),
        };

        related.truncate(limit);
        Ok(related)
    }

    async fn list_records(
        &self,
        entity_type: EntityType,
        predicate: &Predicate,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Record>> {
        let mut records = self.matching(entity_type, predicate, Local::now().date_naive());

        // Secondary order, then id so pages are stable
        records.sort_by(|a, b| a.secondary_cmp(b).then_with(|| a.id().cmp(&b.id())));

        let start = (page as usize).saturating_mul(page_size as usize);
        Ok(records
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect())
    }

    async fn count_records(&self, entity_type: EntityType, predicate: &Predicate) -> Result<u64> {
        let count = self
            .matching(entity_type, predicate, Local::now().date_naive())
            .len();
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{compile, FilterCondition, FilterConfig, FilterOperator, FilterValue};
    use crate::models::{Activity, ActivityType, Company, Contact, Deal, DealStage};

    fn seeded() -> (InMemoryRecordStore, Uuid) {
        let store = InMemoryRecordStore::new();
        let acme = Company::new("Acme").with_industry("Technology");
        let acme_id = store.insert(acme);
        store.insert(Company::new("Globex").with_industry("Energy"));
        store.insert(Contact::new("Ada", "Lovelace").at_company(acme_id));
        store.insert(Contact::new("Grace", "Hopper"));
        store.insert(Deal::new("Acme renewal", 12_000.0).for_company(acme_id));
        (store, acme_id)
    }

    #[tokio::test]
    async fn test_save_and_get_record() {
        let store = InMemoryRecordStore::new();
        let company = Company::new("Initech");
        let id = company.id;

        store.save_record(company.into()).await.unwrap();

        let retrieved = store.get_record(&id).await.unwrap();
        assert_eq!(retrieved.map(|r| r.label()), Some("Initech".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_search_candidates_is_case_insensitive() {
        let (store, _) = seeded();

        let companies = store
            .search_candidates(EntityType::Company, "ACME", 10)
            .await
            .unwrap();
        assert_eq!(companies.len(), 1);

        let deals = store
            .search_candidates(EntityType::Deal, "acme", 10)
            .await
            .unwrap();
        assert_eq!(deals.len(), 1);

        let none = store
            .search_candidates(EntityType::Contact, "acme", 10)
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_search_candidates_respects_limit() {
        let store = InMemoryRecordStore::new();
        for i in 0..5 {
            store.insert(Company::new(format!("Widget {i}")));
        }

        let found = store
            .search_candidates(EntityType::Company, "widget", 3)
            .await
            .unwrap();
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].label(), "Widget 0");
    }

    #[tokio::test]
    async fn test_related_previews() {
        let (store, acme_id) = seeded();
        let acme = store.get_record(&acme_id).await.unwrap().unwrap();

        let related = store.related(&acme, 10).await.unwrap();
        let labels: Vec<&str> = related.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Ada Lovelace", "Acme renewal"]);

        let limited = store.related(&acme, 1).await.unwrap();
        assert_eq!(limited.len(), 1);
    }

    #[tokio::test]
    async fn test_activity_related_follows_links() {
        let (store, acme_id) = seeded();
        let mut call = Activity::new(ActivityType::Call, "Kickoff");
        call.company_id = Some(acme_id);
        call.deal_id = Some(Uuid::new_v4());

        let related = store.related(&Record::from(call), 10).await.unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].entity_type, EntityType::Company);
    }

    #[tokio::test]
    async fn test_list_records_with_relationship_filter() {
        let (store, _) = seeded();
        let config = FilterConfig::from_conditions(vec![FilterCondition::on(
            "company.name",
            FilterOperator::Equals,
            FilterValue::single("acme"),
        )]);
        let predicate = compile(&config, EntityType::Contact).unwrap();

        let contacts = store
            .list_records(EntityType::Contact, &predicate, 0, 10)
            .await
            .unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].label(), "Ada Lovelace");

        let count = store
            .count_records(EntityType::Contact, &predicate)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_list_records_pagination() {
        let store = InMemoryRecordStore::new();
        for i in 0..7 {
            store.insert(Deal::new(format!("Deal {i}"), f64::from(i)).with_stage(DealStage::Proposal));
        }

        let page0 = store
            .list_records(EntityType::Deal, &Predicate::All, 0, 5)
            .await
            .unwrap();
        let page1 = store
            .list_records(EntityType::Deal, &Predicate::All, 1, 5)
            .await
            .unwrap();

        assert_eq!(page0.len(), 5);
        assert_eq!(page1.len(), 2);
        assert_eq!(page0[0].label(), "Deal 6");
        assert_eq!(
            store
                .count_records(EntityType::Deal, &Predicate::All)
                .await
                .unwrap(),
            7
        );
    }
}
