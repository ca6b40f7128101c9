use crate::filters::{Filterable, Scalar};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A logged interaction or task
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Activity {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    pub activity_type: ActivityType,

    #[validate(length(min = 1, max = 500))]
    pub subject: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub completed: bool,

    #[serde(default)]
    pub company_id: Option<Uuid>,

    #[serde(default)]
    pub contact_id: Option<Uuid>,

    #[serde(default)]
    pub deal_id: Option<Uuid>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Activity {
    /// Create a new open activity
    pub fn new(activity_type: ActivityType, subject: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            activity_type,
            subject: subject.into(),
            description: None,
            due_date: None,
            completed: false,
            company_id: None,
            contact_id: None,
            deal_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark the activity as done
    pub fn complete(&mut self) {
        self.completed = true;
    }

    /// Fields matched by free-text search
    pub fn searchable_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.subject.as_str()), self.description.as_deref()]
    }
}

impl Filterable for Activity {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match key {
            "activity_type" => Some(Scalar::Text(self.activity_type.to_string())),
            "subject" => Some(Scalar::from(self.subject.as_str())),
            "description" => self.description.as_deref().map(Scalar::from),
            "due_date" => self.due_date.map(Scalar::Date),
            "completed" => Some(Scalar::Boolean(self.completed)),
            "created_at" => Some(Scalar::local_date(&self.created_at)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    Note,
    Task,
}
