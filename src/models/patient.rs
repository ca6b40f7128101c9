use crate::filters::{Filterable, Scalar};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

/// Patient record of the healthcare variant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Patient {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    /// Medical record number
    #[validate(length(min = 1, max = 64))]
    pub medical_record_number: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub gender: Option<Gender>,

    /// ABO/Rh token such as `O+`
    #[serde(default)]
    pub blood_type: Option<String>,

    pub date_of_birth: NaiveDate,

    #[serde(default)]
    pub insurance_provider: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

fn default_active() -> bool {
    true
}

impl Patient {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        medical_record_number: impl Into<String>,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            medical_record_number: medical_record_number.into(),
            email: None,
            phone: None,
            gender: None,
            blood_type: None,
            date_of_birth,
            insurance_provider: None,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    /// Fields matched by free-text search
    pub fn searchable_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.medical_record_number.as_str()),
            self.email.as_deref(),
        ]
    }
}

impl Filterable for Patient {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        match key {
            "first_name" => Some(Scalar::from(self.first_name.as_str())),
            "last_name" => Some(Scalar::from(self.last_name.as_str())),
            "medical_record_number" => Some(Scalar::from(self.medical_record_number.as_str())),
            "email" => self.email.as_deref().map(Scalar::from),
            "phone" => self.phone.as_deref().map(Scalar::from),
            "gender" => self.gender.map(|g| Scalar::Text(g.to_string())),
            "blood_type" => self.blood_type.as_deref().map(Scalar::from),
            "date_of_birth" => Some(Scalar::Date(self.date_of_birth)),
            "insurance_provider" => self.insurance_provider.as_deref().map(Scalar::from),
            "is_active" => Some(Scalar::Boolean(self.is_active)),
            "created_at" => Some(Scalar::local_date(&self.created_at)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, EnumString, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Female,
    Male,
    Other,
    Undisclosed,
}
