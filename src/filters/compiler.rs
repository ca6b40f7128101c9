//! Filter compiler
//!
//! Turns a [`FilterConfig`] into a [`Predicate`]. Incomplete conditions and
//! groups left empty are pruned; every surviving condition goes through a
//! check pass (known field, operator/type compatibility, value count, value
//! coercion) before any predicate is built.

use crate::filters::error::{FilterError, Position};
use crate::filters::fields::{fields_for, FieldType, FilterField};
use crate::filters::model::{FilterConfig, FilterValue, Scalar};
use crate::filters::operators::{FilterOperator, ValueArity};
use crate::filters::predicate::{Comparison, Predicate};
use crate::models::EntityType;

/// Compiles filter configurations against one entity's field registry
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler {
    fields: &'static [FilterField],
}

impl FilterCompiler {
    pub fn for_entity(entity: EntityType) -> Self {
        Self::with_fields(fields_for(entity))
    }

    pub fn with_fields(fields: &'static [FilterField]) -> Self {
        Self { fields }
    }

    fn field(&self, key: &str) -> Option<&'static FilterField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Every configuration issue among the complete conditions
    pub fn check(&self, config: &FilterConfig) -> Vec<FilterError> {
        match self.build(config) {
            Ok(_) => Vec::new(),
            Err(issues) => issues,
        }
    }

    /// Compile to a predicate, or reject with all issues found
    pub fn compile(&self, config: &FilterConfig) -> Result<Predicate, FilterError> {
        let predicate = self.build(config).map_err(|mut issues| {
            if issues.len() == 1 {
                issues.remove(0)
            } else {
                FilterError::Rejected(issues)
            }
        })?;

        tracing::debug!(
            groups = config.groups.len(),
            leaves = predicate.leaf_count(),
            "Compiled filter"
        );
        Ok(predicate)
    }

    fn build(&self, config: &FilterConfig) -> Result<Predicate, Vec<FilterError>> {
        let mut issues = Vec::new();
        let mut groups = Vec::new();

        for (g, group) in config.groups.iter().enumerate() {
            let mut leaves = Vec::new();

            for (c, condition) in group.conditions.iter().enumerate() {
                let Some(operator) = condition.operator.filter(|_| condition.is_complete()) else {
                    continue;
                };
                let position = Position::from_indexes(g, c);

                match self.comparison(condition.field.trim(), operator, &condition.value) {
                    Ok(comparison) => {
                        leaves.push((Predicate::leaf(comparison), condition.logical_operator))
                    }
                    Err(err) => issues.push(err.at(position)),
                }
            }

            if !leaves.is_empty() {
                groups.push((Predicate::chain(leaves), group.logical_operator));
            }
        }

        if issues.is_empty() {
            Ok(Predicate::chain(groups))
        } else {
            Err(issues)
        }
    }

    fn comparison(
        &self,
        key: &str,
        operator: FilterOperator,
        value: &FilterValue,
    ) -> Result<Comparison, FilterError> {
        let field = self.field(key).ok_or_else(|| FilterError::UnknownField {
            position: None,
            field: key.to_string(),
        })?;
        let value = check_operand(field, operator, value)?;

        Ok(Comparison {
            field: field.key.to_string(),
            field_type: field.effective_type(),
            operator,
            value,
        })
    }
}

/// Compile a configuration for an entity
pub fn compile(config: &FilterConfig, entity: EntityType) -> Result<Predicate, FilterError> {
    FilterCompiler::for_entity(entity).compile(config)
}

/// Check one operator/value pairing against a field and normalise the value.
///
/// Operators without operands accept a missing or blank value; `is_empty`
/// and `is_not_empty` ignore whatever was supplied.
pub(crate) fn check_operand(
    field: &FilterField,
    operator: FilterOperator,
    value: &FilterValue,
) -> Result<FilterValue, FilterError> {
    let field_type = field.effective_type();
    if !operator.supports(field_type) {
        return Err(FilterError::OperatorMismatch {
            position: None,
            field: field.key.to_string(),
            field_type,
            operator,
        });
    }

    let arity = operator.arity();
    if matches!(operator, FilterOperator::IsEmpty | FilterOperator::IsNotEmpty) {
        return Ok(FilterValue::None);
    }
    if value.supplied() != arity.count() {
        return Err(FilterError::ArityMismatch {
            position: None,
            operator,
            expected: arity.count(),
            actual: value.supplied(),
        });
    }

    let invalid = |reason: String| FilterError::InvalidValue {
        position: None,
        field: field.key.to_string(),
        reason,
    };

    match (arity, value) {
        (ValueArity::None, _) => Ok(FilterValue::None),
        (ValueArity::Single, FilterValue::Single(v)) => {
            let v = coerce(field, field_type, operator, v).map_err(invalid)?;
            Ok(FilterValue::Single(v))
        }
        (ValueArity::Double, FilterValue::Pair(lo, hi)) => {
            let lo = coerce(field, field_type, operator, lo).map_err(invalid)?;
            let hi = coerce(field, field_type, operator, hi).map_err(invalid)?;
            if out_of_order(&lo, &hi) {
                return Err(invalid("range start is after range end".to_string()));
            }
            Ok(FilterValue::Pair(lo, hi))
        }
        _ => Err(FilterError::ArityMismatch {
            position: None,
            operator,
            expected: arity.count(),
            actual: value.supplied(),
        }),
    }
}

fn coerce(
    field: &FilterField,
    field_type: FieldType,
    operator: FilterOperator,
    value: &Scalar,
) -> Result<Scalar, String> {
    match field_type {
        FieldType::Number => value
            .as_number()
            .filter(|n| n.is_finite())
            .map(Scalar::Number)
            .ok_or_else(|| format!("expected a number, got {}", value.kind())),
        FieldType::Date => value
            .as_date()
            .map(Scalar::Date)
            .ok_or_else(|| format!("expected a YYYY-MM-DD date, got {}", value.kind())),
        FieldType::Boolean => value
            .as_bool()
            .map(Scalar::Boolean)
            .ok_or_else(|| format!("expected a boolean, got {}", value.kind())),
        FieldType::Select
            if matches!(operator, FilterOperator::Equals | FilterOperator::NotEquals) =>
        {
            let text = value
                .as_text()
                .ok_or_else(|| format!("expected text, got {}", value.kind()))?;
            let options = field.effective_options().unwrap_or(&[]);
            options
                .iter()
                .find(|o| o.eq_ignore_ascii_case(text.trim()))
                .map(|o| Scalar::Text(o.to_string()))
                .ok_or_else(|| format!("`{text}` is not one of {}", options.join(", ")))
        }
        FieldType::Text | FieldType::Select | FieldType::Relationship => value
            .as_text()
            .map(|t| Scalar::Text(t.to_string()))
            .ok_or_else(|| format!("expected text, got {}", value.kind())),
    }
}

fn out_of_order(lo: &Scalar, hi: &Scalar) -> bool {
    match (lo, hi) {
        (Scalar::Number(lo), Scalar::Number(hi)) => lo > hi,
        (Scalar::Date(lo), Scalar::Date(hi)) => lo > hi,
        _ => false,
    }
}
