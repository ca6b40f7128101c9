use crate::filters::{Filterable, Scalar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// A person, optionally attached to a company
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Contact {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub job_title: Option<String>,

    #[serde(default)]
    pub status: ContactStatus,

    /// Main point of contact for the company
    #[serde(default)]
    pub is_primary: bool,

    /// Employer
    #[serde(default)]
    pub company_id: Option<Uuid>,

    #[serde(default)]
    pub last_contacted_at: Option<DateTime<Utc>>,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Contact {
    /// Create a new contact
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            job_title: None,
            status: ContactStatus::Active,
            is_primary: false,
            company_id: None,
            last_contacted_at: None,
            created_at: Utc::now(),
        }
    }

    /// Attach to a company
    pub fn at_company(mut self, company_id: Uuid) -> Self {
        self.company_id = Some(company_id);
        self
    }

    /// Set the email address
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Fields matched by free-text search
    pub fn searchable_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            self.email.as_deref(),
            self.phone.as_deref(),
        ]
    }
}

impl Filterable for Contact {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match key {
            "first_name" => Some(Scalar::from(self.first_name.as_str())),
            "last_name" => Some(Scalar::from(self.last_name.as_str())),
            "email" => self.email.as_deref().map(Scalar::from),
            "phone" => self.phone.as_deref().map(Scalar::from),
            "job_title" => self.job_title.as_deref().map(Scalar::from),
            "status" => Some(Scalar::Text(self.status.to_string())),
            "is_primary" => Some(Scalar::Boolean(self.is_primary)),
            "last_contacted_at" => self.last_contacted_at.as_ref().map(Scalar::local_date),
            "created_at" => Some(Scalar::local_date(&self.created_at)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    #[default]
    Active,
    Inactive,
    Lead,
}
