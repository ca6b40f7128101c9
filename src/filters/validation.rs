//! Structural validation of a filter configuration
//!
//! Reports missing pieces a user still has to fill in. Type and value checks
//! belong to the compiler.

use crate::filters::model::FilterConfig;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}

/// Collect every structural problem, in group then condition order
pub fn validate(config: &FilterConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.groups.is_empty() {
        errors.push("Filter must contain at least one group".to_string());
    }

    for (g, group) in config.groups.iter().enumerate() {
        let g = g + 1;
        if group.conditions.is_empty() {
            errors.push(format!("Group {g} must contain at least one condition"));
            continue;
        }

        for (c, condition) in group.conditions.iter().enumerate() {
            let c = c + 1;
            if condition.field.trim().is_empty() {
                errors.push(format!("Group {g}, condition {c}: field is required"));
            }
            if condition.operator.is_none() {
                errors.push(format!("Group {g}, condition {c}: operator is required"));
            }
        }
    }

    ValidationResult::from_errors(errors)
}
