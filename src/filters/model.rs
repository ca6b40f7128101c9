//! Condition / group / config tree a user builds

use crate::filters::compiler::check_operand;
use crate::filters::error::FilterError;
use crate::filters::fields::FilterField;
use crate::filters::operators::FilterOperator;
use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// A single typed filter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scalar {
    Text(String),
    Number(#[serde(with = "number_repr")] f64),
    Date(NaiveDate),
    Boolean(bool),
}

/// Non-finite numbers travel as the strings `Infinity`, `-Infinity` and `NaN`
mod number_repr {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if value.is_sign_positive() {
            serializer.serialize_str("Infinity")
        } else {
            serializer.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(n) => Ok(n),
            Repr::Text(s) => match s.as_str() {
                "Infinity" => Ok(f64::INFINITY),
                "-Infinity" => Ok(f64::NEG_INFINITY),
                "NaN" => Ok(f64::NAN),
                other => Err(de::Error::invalid_value(
                    de::Unexpected::Str(other),
                    &"a number",
                )),
            },
        }
    }
}

impl Scalar {
    /// Calendar date of a timestamp in the local time zone
    pub fn local_date(at: &DateTime<Utc>) -> Self {
        Scalar::Date(at.with_timezone(&Local).date_naive())
    }

    /// Short type name used in messages
    pub fn kind(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Number(_) => "number",
            Scalar::Date(_) => "date",
            Scalar::Boolean(_) => "boolean",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; numeric text is accepted
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            _ => None,
        }
    }

    /// Calendar-date view; `YYYY-MM-DD` and RFC 3339 text are accepted
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Scalar::Date(d) => Some(*d),
            Scalar::Text(s) => {
                let s = s.trim();
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| {
                    chrono::DateTime::parse_from_rfc3339(s)
                        .ok()
                        .map(|dt| dt.date_naive())
                })
            }
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Blank text counts as no value
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<NaiveDate> for Scalar {
    fn from(value: NaiveDate) -> Self {
        Scalar::Date(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Boolean(value)
    }
}

/// Operand of a condition; its shape carries the value count
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    #[default]
    None,
    Single(Scalar),
    Pair(Scalar, Scalar),
}

impl FilterValue {
    pub fn single(value: impl Into<Scalar>) -> Self {
        FilterValue::Single(value.into())
    }

    pub fn pair(low: impl Into<Scalar>, high: impl Into<Scalar>) -> Self {
        FilterValue::Pair(low.into(), high.into())
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FilterValue::None)
    }

    /// Number of values actually supplied; blank text counts as none
    pub fn supplied(&self) -> usize {
        match self {
            FilterValue::None => 0,
            FilterValue::Single(v) if v.is_blank() => 0,
            FilterValue::Single(_) => 1,
            FilterValue::Pair(..) => 2,
        }
    }
}

/// Connector joining an item to the next one
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogicalOperator {
    #[default]
    And,
    Or,
}

fn new_id() -> Uuid {
    Uuid::now_v7()
}

/// One field/operator/value triple plus the connector to the next condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    #[serde(default = "new_id")]
    pub id: Uuid,

    /// Key into the field registry
    #[serde(default)]
    pub field: String,

    #[serde(default)]
    pub operator: Option<FilterOperator>,

    #[serde(default)]
    pub value: FilterValue,

    /// Ignored on the last condition of a group
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterCondition {
    /// Empty condition with a fresh id and `equals` preselected
    pub fn new() -> Self {
        Self {
            id: new_id(),
            field: String::new(),
            operator: Some(FilterOperator::Equals),
            value: FilterValue::None,
            logical_operator: LogicalOperator::And,
        }
    }

    /// Unchecked condition, as a UI would produce it
    pub fn on(field: impl Into<String>, operator: FilterOperator, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            operator: Some(operator),
            value,
            ..Self::new()
        }
    }

    /// Condition checked against a registry field.
    ///
    /// Fails when the operator does not apply to the field's type or the
    /// value does not fit the operator. Text values for number and date
    /// fields are coerced.
    pub fn typed(
        field: &FilterField,
        operator: FilterOperator,
        value: FilterValue,
    ) -> Result<Self, FilterError> {
        let value = check_operand(field, operator, &value)?;
        Ok(Self::on(field.key, operator, value))
    }

    pub fn with_connector(mut self, connector: LogicalOperator) -> Self {
        self.logical_operator = connector;
        self
    }

    /// Field and operator are both set
    pub fn is_complete(&self) -> bool {
        !self.field.trim().is_empty() && self.operator.is_some()
    }

    fn same_shape(&self, other: &Self) -> bool {
        self.field == other.field
            && self.operator == other.operator
            && self.value == other.value
            && self.logical_operator == other.logical_operator
    }
}

impl Default for FilterCondition {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered conditions combined left to right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    #[serde(default = "new_id")]
    pub id: Uuid,

    #[serde(default)]
    pub conditions: Vec<FilterCondition>,

    /// Ignored on the last group of a config
    #[serde(default)]
    pub logical_operator: LogicalOperator,
}

impl FilterGroup {
    /// Group holding one fresh condition
    pub fn new() -> Self {
        Self::with_conditions(vec![FilterCondition::new()])
    }

    pub fn with_conditions(conditions: Vec<FilterCondition>) -> Self {
        Self {
            id: new_id(),
            conditions,
            logical_operator: LogicalOperator::And,
        }
    }

    pub fn with_connector(mut self, connector: LogicalOperator) -> Self {
        self.logical_operator = connector;
        self
    }

    /// Conditions with both field and operator set
    pub fn complete_conditions(&self) -> impl Iterator<Item = &FilterCondition> {
        self.conditions.iter().filter(|c| c.is_complete())
    }
}

impl Default for FilterGroup {
    fn default() -> Self {
        Self::new()
    }
}

/// Full filter tree: the unit that is validated, compiled and shared
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub groups: Vec<FilterGroup>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
}

impl FilterConfig {
    /// One empty group containing one empty condition
    pub fn new() -> Self {
        Self::with_groups(vec![FilterGroup::new()])
    }

    pub fn with_groups(groups: Vec<FilterGroup>) -> Self {
        Self {
            groups,
            name: None,
            is_public: None,
        }
    }

    /// Single group of the given conditions
    pub fn from_conditions(conditions: Vec<FilterCondition>) -> Self {
        Self::with_groups(vec![FilterGroup::with_conditions(conditions)])
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Equality ignoring condition and group ids
    pub fn structurally_eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.is_public == other.is_public
            && self.groups.len() == other.groups.len()
            && self.groups.iter().zip(&other.groups).all(|(a, b)| {
                a.logical_operator == b.logical_operator
                    && a.conditions.len() == b.conditions.len()
                    && a.conditions
                        .iter()
                        .zip(&b.conditions)
                        .all(|(x, y)| x.same_shape(y))
            })
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}
