use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Record kinds managed by the system
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EntityType {
    #[serde(rename = "companies", alias = "company")]
    #[strum(to_string = "companies", serialize = "company")]
    Company,

    #[serde(rename = "contacts", alias = "contact")]
    #[strum(to_string = "contacts", serialize = "contact")]
    Contact,

    #[serde(rename = "deals", alias = "deal")]
    #[strum(to_string = "deals", serialize = "deal")]
    Deal,

    #[serde(rename = "activities", alias = "activity")]
    #[strum(to_string = "activities", serialize = "activity")]
    Activity,

    #[serde(rename = "patients", alias = "patient")]
    #[strum(to_string = "patients", serialize = "patient")]
    Patient,
}

impl EntityType {
    /// Entity types covered by free-text search, in response order
    pub const SEARCHABLE: [EntityType; 4] = [
        EntityType::Company,
        EntityType::Contact,
        EntityType::Deal,
        EntityType::Activity,
    ];

    /// Whether free-text search covers this entity type
    pub fn is_searchable(&self) -> bool {
        Self::SEARCHABLE.contains(self)
    }

    /// Singular display name
    pub fn singular(&self) -> &'static str {
        match self {
            EntityType::Company => "company",
            EntityType::Contact => "contact",
            EntityType::Deal => "deal",
            EntityType::Activity => "activity",
            EntityType::Patient => "patient",
        }
    }
}
