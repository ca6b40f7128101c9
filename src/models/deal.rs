use crate::filters::{Filterable, Scalar};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A sales opportunity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Deal {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[validate(length(min = 1, max = 255))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub stage: DealStage,

    /// Monetary value
    #[validate(range(min = 0.0))]
    pub value: f64,

    /// Win probability in percent
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0))]
    pub probability: f64,

    #[serde(default)]
    pub expected_close_date: Option<NaiveDate>,

    #[serde(default)]
    pub company_id: Option<Uuid>,

    #[serde(default)]
    pub contact_id: Option<Uuid>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Deal {
    /// Create a new deal in the prospecting stage
    pub fn new(title: impl Into<String>, value: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: None,
            stage: DealStage::Prospecting,
            value,
            probability: 0.0,
            expected_close_date: None,
            company_id: None,
            contact_id: None,
            created_at: Utc::now(),
        }
    }

    /// Attach to a company
    pub fn for_company(mut self, company_id: Uuid) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Attach to a contact
    pub fn with_contact(mut self, contact_id: Uuid) -> Self {
        self.contact_id = Some(contact_id);
        self
    }

    pub fn with_stage(mut self, stage: DealStage) -> Self {
        self.stage = stage;
        self
    }

    /// Fields matched by free-text search
    pub fn searchable_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.title.as_str()), self.description.as_deref()]
    }
}

impl Filterable for Deal {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match key {
            "title" => Some(Scalar::from(self.title.as_str())),
            "description" => self.description.as_deref().map(Scalar::from),
            "stage" => Some(Scalar::Text(self.stage.to_string())),
            "value" => Some(Scalar::Number(self.value)),
            "probability" => Some(Scalar::Number(self.probability)),
            "expected_close_date" => self.expected_close_date.map(Scalar::Date),
            "created_at" => Some(Scalar::local_date(&self.created_at)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DealStage {
    #[default]
    Prospecting,
    Qualification,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    /// Whether the deal is no longer in the pipeline
    pub fn is_closed(&self) -> bool {
        matches!(self, DealStage::ClosedWon | DealStage::ClosedLost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_tokens() {
        assert_eq!(DealStage::ClosedWon.to_string(), "CLOSED_WON");
        assert!(DealStage::ClosedLost.is_closed());
        assert!(!DealStage::Proposal.is_closed());
    }

    #[test]
    fn test_deal_field_values() {
        let deal = Deal::new("Renewal", 12_500.0).with_stage(DealStage::Negotiation);
        assert_eq!(deal.field_value("value"), Some(Scalar::Number(12_500.0)));
        assert_eq!(
            deal.field_value("stage"),
            Some(Scalar::Text("NEGOTIATION".to_string()))
        );
        assert_eq!(deal.field_value("expected_close_date"), None);
    }
}
