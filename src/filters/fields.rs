//! Field registry
//!
//! Per-entity list of filterable attributes. Relationship fields traverse to
//! an attribute of another entity and behave like that attribute's type.

use crate::models::EntityType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString};

/// Semantic type of a filterable field
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
    Select,
    Relationship,
}

/// One filterable attribute of one entity
#[derive(Debug, Clone, Serialize)]
pub struct FilterField {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<&'static [&'static str]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_entity: Option<EntityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_field: Option<&'static str>,
}

impl FilterField {
    const fn new(key: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            key,
            label,
            field_type,
            options: None,
            related_entity: None,
            related_field: None,
        }
    }

    const fn select(
        key: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            label,
            field_type: FieldType::Select,
            options: Some(options),
            related_entity: None,
            related_field: None,
        }
    }

    const fn related(
        key: &'static str,
        label: &'static str,
        entity: EntityType,
        field: &'static str,
    ) -> Self {
        Self {
            key,
            label,
            field_type: FieldType::Relationship,
            options: None,
            related_entity: Some(entity),
            related_field: Some(field),
        }
    }

    /// Type used for operator compatibility and value coercion.
    ///
    /// Relationship fields resolve to the type of the attribute they
    /// traverse to; an unresolvable target is treated as an identity match.
    pub fn effective_type(&self) -> FieldType {
        match (self.field_type, self.related_entity, self.related_field) {
            (FieldType::Relationship, Some(entity), Some(target)) => find_field(entity, target)
                .filter(|f| f.field_type != FieldType::Relationship)
                .map(|f| f.field_type)
                .unwrap_or(FieldType::Relationship),
            (field_type, _, _) => field_type,
        }
    }

    /// Select options of the field, following relationships
    pub fn effective_options(&self) -> Option<&'static [&'static str]> {
        match (self.related_entity, self.related_field) {
            (Some(entity), Some(target)) => find_field(entity, target).and_then(|f| f.options),
            _ => self.options,
        }
    }
}

pub const COMPANY_STATUSES: &[&str] = &["ACTIVE", "INACTIVE", "PROSPECT", "CHURNED"];
pub const CONTACT_STATUSES: &[&str] = &["ACTIVE", "INACTIVE", "LEAD"];
pub const DEAL_STAGES: &[&str] = &[
    "PROSPECTING",
    "QUALIFICATION",
    "PROPOSAL",
    "NEGOTIATION",
    "CLOSED_WON",
    "CLOSED_LOST",
];
pub const ACTIVITY_TYPES: &[&str] = &["CALL", "EMAIL", "MEETING", "NOTE", "TASK"];
pub const GENDERS: &[&str] = &["FEMALE", "MALE", "OTHER", "UNDISCLOSED"];
pub const BLOOD_TYPES: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

static COMPANY_FIELDS: &[FilterField] = &[
    FilterField::new("name", "Name", FieldType::Text),
    FilterField::new("industry", "Industry", FieldType::Text),
    FilterField::select("status", "Status", COMPANY_STATUSES),
    FilterField::new("email", "Email", FieldType::Text),
    FilterField::new("website", "Website", FieldType::Text),
    FilterField::new("phone", "Phone", FieldType::Text),
    FilterField::new("city", "City", FieldType::Text),
    FilterField::new("country", "Country", FieldType::Text),
    FilterField::new("employee_count", "Employees", FieldType::Number),
    FilterField::new("annual_revenue", "Annual Revenue", FieldType::Number),
    FilterField::new("is_customer", "Customer", FieldType::Boolean),
    FilterField::new("created_at", "Created", FieldType::Date),
    FilterField::new("updated_at", "Updated", FieldType::Date),
];

static CONTACT_FIELDS: &[FilterField] = &[
    FilterField::new("first_name", "First Name", FieldType::Text),
    FilterField::new("last_name", "Last Name", FieldType::Text),
    FilterField::new("email", "Email", FieldType::Text),
    FilterField::new("phone", "Phone", FieldType::Text),
    FilterField::new("job_title", "Job Title", FieldType::Text),
    FilterField::select("status", "Status", CONTACT_STATUSES),
    FilterField::new("is_primary", "Primary Contact", FieldType::Boolean),
    FilterField::related("company.name", "Company", EntityType::Company, "name"),
    FilterField::related(
        "company.industry",
        "Company Industry",
        EntityType::Company,
        "industry",
    ),
    FilterField::new("last_contacted_at", "Last Contacted", FieldType::Date),
    FilterField::new("created_at", "Created", FieldType::Date),
];

static DEAL_FIELDS: &[FilterField] = &[
    FilterField::new("title", "Title", FieldType::Text),
    FilterField::new("description", "Description", FieldType::Text),
    FilterField::select("stage", "Stage", DEAL_STAGES),
    FilterField::new("value", "Value", FieldType::Number),
    FilterField::new("probability", "Probability (%)", FieldType::Number),
    FilterField::new("expected_close_date", "Expected Close", FieldType::Date),
    FilterField::related("company.name", "Company", EntityType::Company, "name"),
    FilterField::related(
        "contact.last_name",
        "Contact Last Name",
        EntityType::Contact,
        "last_name",
    ),
    FilterField::new("created_at", "Created", FieldType::Date),
];

static ACTIVITY_FIELDS: &[FilterField] = &[
    FilterField::select("activity_type", "Type", ACTIVITY_TYPES),
    FilterField::new("subject", "Subject", FieldType::Text),
    FilterField::new("description", "Description", FieldType::Text),
    FilterField::new("due_date", "Due Date", FieldType::Date),
    FilterField::new("completed", "Completed", FieldType::Boolean),
    FilterField::related("company.name", "Company", EntityType::Company, "name"),
    FilterField::related("deal.stage", "Deal Stage", EntityType::Deal, "stage"),
    FilterField::new("created_at", "Created", FieldType::Date),
];

static PATIENT_FIELDS: &[FilterField] = &[
    FilterField::new("first_name", "First Name", FieldType::Text),
    FilterField::new("last_name", "Last Name", FieldType::Text),
    FilterField::new("medical_record_number", "MRN", FieldType::Text),
    FilterField::new("email", "Email", FieldType::Text),
    FilterField::new("phone", "Phone", FieldType::Text),
    FilterField::select("gender", "Gender", GENDERS),
    FilterField::select("blood_type", "Blood Type", BLOOD_TYPES),
    FilterField::new("date_of_birth", "Date of Birth", FieldType::Date),
    FilterField::new("insurance_provider", "Insurance Provider", FieldType::Text),
    FilterField::new("is_active", "Active", FieldType::Boolean),
    FilterField::new("created_at", "Created", FieldType::Date),
];

/// Filterable fields of an entity
pub fn fields_for(entity: EntityType) -> &'static [FilterField] {
    match entity {
        EntityType::Company => COMPANY_FIELDS,
        EntityType::Contact => CONTACT_FIELDS,
        EntityType::Deal => DEAL_FIELDS,
        EntityType::Activity => ACTIVITY_FIELDS,
        EntityType::Patient => PATIENT_FIELDS,
    }
}

/// Filterable fields by entity name; unknown names yield an empty list
pub fn fields_for_name(name: &str) -> &'static [FilterField] {
    EntityType::from_str(name.trim())
        .map(fields_for)
        .unwrap_or(&[])
}

/// Look up one field of an entity by key
pub fn find_field(entity: EntityType, key: &str) -> Option<&'static FilterField> {
    fields_for(entity).iter().find(|f| f.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_unknown_entity_is_empty() {
        assert!(fields_for_name("invoices").is_empty());
        assert!(fields_for_name("").is_empty());
        assert!(!fields_for_name("companies").is_empty());
        assert!(!fields_for_name("patient").is_empty());
    }

    #[test]
    fn test_keys_unique_per_entity() {
        for entity in EntityType::iter() {
            let fields = fields_for(entity);
            let mut keys: Vec<_> = fields.iter().map(|f| f.key).collect();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), fields.len(), "duplicate key in {entity}");
        }
    }

    #[test]
    fn test_relationship_resolves_target_type() {
        let field = find_field(EntityType::Contact, "company.name").unwrap();
        assert_eq!(field.field_type, FieldType::Relationship);
        assert_eq!(field.effective_type(), FieldType::Text);

        let stage = find_field(EntityType::Activity, "deal.stage").unwrap();
        assert_eq!(stage.effective_type(), FieldType::Select);
        assert_eq!(stage.effective_options(), Some(DEAL_STAGES));
    }

    #[test]
    fn test_select_fields_carry_options() {
        for entity in EntityType::iter() {
            for field in fields_for(entity) {
                if field.field_type == FieldType::Select {
                    assert!(field.options.is_some_and(|o| !o.is_empty()));
                }
            }
        }
    }
}
