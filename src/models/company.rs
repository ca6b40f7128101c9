use crate::filters::{Filterable, Scalar};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// An organisation tracked in the system
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Company {
    /// Unique identifier
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Company name
    #[validate(length(min = 1, max = 255))]
    pub name: String,

    /// Industry or sector
    #[serde(default)]
    pub industry: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: CompanyStatus,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub website: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub country: Option<String>,

    /// Headcount
    #[serde(default)]
    pub employee_count: Option<u32>,

    /// Yearly revenue in the account currency
    #[serde(default)]
    pub annual_revenue: Option<f64>,

    /// Whether the company has purchased anything
    #[serde(default)]
    pub is_customer: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,

    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Create a new company
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            industry: None,
            status: CompanyStatus::Active,
            email: None,
            website: None,
            phone: None,
            city: None,
            country: None,
            employee_count: None,
            annual_revenue: None,
            is_customer: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the industry
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    /// Set the status
    pub fn with_status(mut self, status: CompanyStatus) -> Self {
        self.status = status;
        self
    }

    /// Fields matched by free-text search
    pub fn searchable_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.name.as_str()),
            self.industry.as_deref(),
            self.email.as_deref(),
            self.website.as_deref(),
        ]
    }
}

impl Filterable for Company {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match key {
            "name" => Some(Scalar::from(self.name.as_str())),
            "industry" => self.industry.as_deref().map(Scalar::from),
            "status" => Some(Scalar::Text(self.status.to_string())),
            "email" => self.email.as_deref().map(Scalar::from),
            "website" => self.website.as_deref().map(Scalar::from),
            "phone" => self.phone.as_deref().map(Scalar::from),
            "city" => self.city.as_deref().map(Scalar::from),
            "country" => self.country.as_deref().map(Scalar::from),
            "employee_count" => self.employee_count.map(|n| Scalar::Number(f64::from(n))),
            "annual_revenue" => self.annual_revenue.map(Scalar::Number),
            "is_customer" => Some(Scalar::Boolean(self.is_customer)),
            "created_at" => Some(Scalar::local_date(&self.created_at)),
            "updated_at" => Some(Scalar::local_date(&self.updated_at)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum CompanyStatus {
    #[default]
    Active,
    Inactive,
    Prospect,
    Churned,
}
