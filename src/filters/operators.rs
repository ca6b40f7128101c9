//! Operator catalog
//!
//! Static metadata for every comparison operator: label, how many values it
//! consumes and which field types it may be paired with.

use crate::filters::fields::FieldType;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

/// Comparison operator token
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FilterOperator {
    // Text / select
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    IsEmpty,
    IsNotEmpty,

    // Number
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Between,
    NotBetween,

    // Date
    Before,
    After,
    OnOrBefore,
    OnOrAfter,
    DateIs,
    DateBetween,
    IsToday,
    IsYesterday,
    IsThisWeek,
    IsLastWeek,
    IsThisMonth,
    IsLastMonth,
    IsThisYear,
    IsLastYear,

    // Boolean
    IsTrue,
    IsFalse,
}

/// Number of values an operator consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueArity {
    None,
    Single,
    Double,
}

impl ValueArity {
    /// Exact number of values required
    pub fn count(&self) -> usize {
        match self {
            ValueArity::None => 0,
            ValueArity::Single => 1,
            ValueArity::Double => 2,
        }
    }
}

/// Catalog entry describing an operator
#[derive(Debug, Clone, Serialize)]
pub struct OperatorInfo {
    pub operator: FilterOperator,
    pub label: &'static str,
    pub requires_value: bool,
    pub value_type: ValueArity,
    pub supported_types: &'static [FieldType],
}

const TEXTUAL: &[FieldType] = &[FieldType::Text, FieldType::Select];
const EQUATABLE: &[FieldType] = &[
    FieldType::Text,
    FieldType::Select,
    FieldType::Number,
    FieldType::Relationship,
];
const PRESENCE: &[FieldType] = &[
    FieldType::Text,
    FieldType::Select,
    FieldType::Number,
    FieldType::Date,
    FieldType::Relationship,
];
const NUMERIC: &[FieldType] = &[FieldType::Number];
const TEMPORAL: &[FieldType] = &[FieldType::Date];
const BOOLEAN: &[FieldType] = &[FieldType::Boolean];

impl FilterOperator {
    /// Catalog metadata for this operator
    pub fn info(&self) -> OperatorInfo {
        let (label, value_type, supported_types) = match self {
            FilterOperator::Equals => ("equals", ValueArity::Single, EQUATABLE),
            FilterOperator::NotEquals => ("does not equal", ValueArity::Single, EQUATABLE),
            FilterOperator::Contains => ("contains", ValueArity::Single, TEXTUAL),
            FilterOperator::NotContains => ("does not contain", ValueArity::Single, TEXTUAL),
            FilterOperator::StartsWith => ("starts with", ValueArity::Single, TEXTUAL),
            FilterOperator::EndsWith => ("ends with", ValueArity::Single, TEXTUAL),
            FilterOperator::IsEmpty => ("is empty", ValueArity::None, PRESENCE),
            FilterOperator::IsNotEmpty => ("is not empty", ValueArity::None, PRESENCE),

            FilterOperator::GreaterThan => ("greater than", ValueArity::Single, NUMERIC),
            FilterOperator::LessThan => ("less than", ValueArity::Single, NUMERIC),
            FilterOperator::GreaterThanOrEqual => {
                ("greater than or equal to", ValueArity::Single, NUMERIC)
            }
            FilterOperator::LessThanOrEqual => {
                ("less than or equal to", ValueArity::Single, NUMERIC)
            }
            FilterOperator::Between => ("between", ValueArity::Double, NUMERIC),
            FilterOperator::NotBetween => ("not between", ValueArity::Double, NUMERIC),

            FilterOperator::Before => ("before", ValueArity::Single, TEMPORAL),
            FilterOperator::After => ("after", ValueArity::Single, TEMPORAL),
            FilterOperator::OnOrBefore => ("on or before", ValueArity::Single, TEMPORAL),
            FilterOperator::OnOrAfter => ("on or after", ValueArity::Single, TEMPORAL),
            FilterOperator::DateIs => ("is", ValueArity::Single, TEMPORAL),
            FilterOperator::DateBetween => ("is between", ValueArity::Double, TEMPORAL),
            FilterOperator::IsToday => ("is today", ValueArity::None, TEMPORAL),
            FilterOperator::IsYesterday => ("is yesterday", ValueArity::None, TEMPORAL),
            FilterOperator::IsThisWeek => ("is this week", ValueArity::None, TEMPORAL),
            FilterOperator::IsLastWeek => ("is last week", ValueArity::None, TEMPORAL),
            FilterOperator::IsThisMonth => ("is this month", ValueArity::None, TEMPORAL),
            FilterOperator::IsLastMonth => ("is last month", ValueArity::None, TEMPORAL),
            FilterOperator::IsThisYear => ("is this year", ValueArity::None, TEMPORAL),
            FilterOperator::IsLastYear => ("is last year", ValueArity::None, TEMPORAL),

            FilterOperator::IsTrue => ("is true", ValueArity::None, BOOLEAN),
            FilterOperator::IsFalse => ("is false", ValueArity::None, BOOLEAN),
        };

        OperatorInfo {
            operator: *self,
            label,
            requires_value: value_type != ValueArity::None,
            value_type,
            supported_types,
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Number of values this operator consumes
    pub fn arity(&self) -> ValueArity {
        self.info().value_type
    }

    /// Whether this operator may be paired with a field of the given type
    pub fn supports(&self, field_type: FieldType) -> bool {
        self.info().supported_types.contains(&field_type)
    }

    /// Relative date buckets evaluated against the current date
    pub fn is_relative_date(&self) -> bool {
        matches!(
            self,
            FilterOperator::IsToday
                | FilterOperator::IsYesterday
                | FilterOperator::IsThisWeek
                | FilterOperator::IsLastWeek
                | FilterOperator::IsThisMonth
                | FilterOperator::IsLastMonth
                | FilterOperator::IsThisYear
                | FilterOperator::IsLastYear
        )
    }
}

/// Operators applicable to a field type, in catalog order
pub fn operators_for(field_type: FieldType) -> Vec<FilterOperator> {
    FilterOperator::iter()
        .filter(|op| op.supports(field_type))
        .collect()
}

/// Catalog entries applicable to a field type
pub fn operator_catalog(field_type: FieldType) -> Vec<OperatorInfo> {
    operators_for(field_type)
        .into_iter()
        .map(|op| op.info())
        .collect()
}
