use crate::error::{AppError, Result};
use crate::filters::{Filterable, Scalar};
use crate::models::{Activity, Company, Contact, Deal, EntityType, Patient};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cmp::Ordering;
use uuid::Uuid;
use validator::Validate;

/// Any stored record
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Record {
    Company(Company),
    Contact(Contact),
    Deal(Deal),
    Activity(Activity),
    Patient(Patient),
}

/// Short reference to a record, used for related previews
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub entity_type: EntityType,
    pub id: Uuid,
    pub label: String,
}

fn parse<T: DeserializeOwned + Validate>(body: serde_json::Value) -> Result<T> {
    let value: T =
        serde_json::from_value(body).map_err(|e| AppError::Validation(e.to_string()))?;
    value.validate()?;
    Ok(value)
}

impl Record {
    /// Parse and validate a JSON body as a record of the given kind
    pub fn from_json(entity_type: EntityType, body: serde_json::Value) -> Result<Self> {
        Ok(match entity_type {
            EntityType::Company => Record::Company(parse(body)?),
            EntityType::Contact => Record::Contact(parse(body)?),
            EntityType::Deal => Record::Deal(parse(body)?),
            EntityType::Activity => Record::Activity(parse(body)?),
            EntityType::Patient => Record::Patient(parse(body)?),
        })
    }

    pub fn entity_type(&self) -> EntityType {
        match self {
            Record::Company(_) => EntityType::Company,
            Record::Contact(_) => EntityType::Contact,
            Record::Deal(_) => EntityType::Deal,
            Record::Activity(_) => EntityType::Activity,
            Record::Patient(_) => EntityType::Patient,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Record::Company(c) => c.id,
            Record::Contact(c) => c.id,
            Record::Deal(d) => d.id,
            Record::Activity(a) => a.id,
            Record::Patient(p) => p.id,
        }
    }

    /// Human-readable name
    pub fn label(&self) -> String {
        match self {
            Record::Company(c) => c.name.clone(),
            Record::Contact(c) => c.full_name(),
            Record::Deal(d) => d.title.clone(),
            Record::Activity(a) => a.subject.clone(),
            Record::Patient(p) => format!("{} {}", p.first_name, p.last_name),
        }
    }

    pub fn summary(&self) -> RecordSummary {
        RecordSummary {
            entity_type: self.entity_type(),
            id: self.id(),
            label: self.label(),
        }
    }

    /// Fixed per-entity field set used for free-text matching and scoring
    pub fn searchable_fields(&self) -> Vec<Option<&str>> {
        match self {
            Record::Company(c) => c.searchable_fields(),
            Record::Contact(c) => c.searchable_fields(),
            Record::Deal(d) => d.searchable_fields(),
            Record::Activity(a) => a.searchable_fields(),
            Record::Patient(p) => p.searchable_fields(),
        }
    }

    /// Id of the record reached through a named relation (`company`, `contact`, `deal`)
    pub fn relation_id(&self, relation: &str) -> Option<Uuid> {
        match (self, relation) {
            (Record::Contact(c), "company") => c.company_id,
            (Record::Deal(d), "company") => d.company_id,
            (Record::Deal(d), "contact") => d.contact_id,
            (Record::Activity(a), "company") => a.company_id,
            (Record::Activity(a), "contact") => a.contact_id,
            (Record::Activity(a), "deal") => a.deal_id,
            _ => None,
        }
    }

    /// Secondary ordering used to break relevance ties.
    ///
    /// Companies by name, contacts by last then first name, patients likewise,
    /// deals by value descending and activities newest first. Records of
    /// different kinds compare equal.
    pub fn secondary_cmp(&self, other: &Record) -> Ordering {
        match (self, other) {
            (Record::Company(a), Record::Company(b)) => cmp_text(&a.name, &b.name),
            (Record::Contact(a), Record::Contact(b)) => cmp_text(&a.last_name, &b.last_name)
                .then_with(|| cmp_text(&a.first_name, &b.first_name)),
            (Record::Deal(a), Record::Deal(b)) => b.value.total_cmp(&a.value),
            (Record::Activity(a), Record::Activity(b)) => b.created_at.cmp(&a.created_at),
            (Record::Patient(a), Record::Patient(b)) => cmp_text(&a.last_name, &b.last_name)
                .then_with(|| cmp_text(&a.first_name, &b.first_name)),
            _ => Ordering::Equal,
        }
    }
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

impl Filterable for Record {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match self {
            Record::Company(c) => c.field_value(key),
            Record::Contact(c) => c.field_value(key),
            Record::Deal(d) => d.field_value(key),
            Record::Activity(a) => a.field_value(key),
            Record::Patient(p) => p.field_value(key),
        }
    }
}

impl From<Company> for Record {
    fn from(company: Company) -> Self {
        Record::Company(company)
    }
}

impl From<Contact> for Record {
    fn from(contact: Contact) -> Self {
        Record::Contact(contact)
    }
}

impl From<Deal> for Record {
    fn from(deal: Deal) -> Self {
        Record::Deal(deal)
    }
}

impl From<Activity> for Record {
    fn from(activity: Activity) -> Self {
        Record::Activity(activity)
    }
}

impl From<Patient> for Record {
    fn from(patient: Patient) -> Self {
        Record::Patient(patient)
    }
}
