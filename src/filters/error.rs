//! Error types for filter compilation and token decoding

use crate::error::AppError;
use crate::filters::fields::FieldType;
use crate::filters::operators::FilterOperator;
use std::fmt;

/// 1-based location of a condition inside a filter configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub group: usize,
    pub condition: usize,
}

impl Position {
    /// Build from 0-based indexes
    pub fn from_indexes(group: usize, condition: usize) -> Self {
        Self {
            group: group + 1,
            condition: condition + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group {}, condition {}", self.group, self.condition)
    }
}

fn at(position: &Option<Position>) -> String {
    position.map(|p| format!("{p}: ")).unwrap_or_default()
}

fn join(issues: &[FilterError]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration errors found before a predicate is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown entity `{0}`")]
    UnknownEntity(String),

    #[error("{}unknown field `{field}`", at(.position))]
    UnknownField {
        position: Option<Position>,
        field: String,
    },

    #[error("{}operator `{operator}` cannot be used with {field_type} field `{field}`", at(.position))]
    OperatorMismatch {
        position: Option<Position>,
        field: String,
        field_type: FieldType,
        operator: FilterOperator,
    },

    #[error("{}operator `{operator}` expects {expected} value(s), got {actual}", at(.position))]
    ArityMismatch {
        position: Option<Position>,
        operator: FilterOperator,
        expected: usize,
        actual: usize,
    },

    #[error("{}invalid value for `{field}`: {reason}", at(.position))]
    InvalidValue {
        position: Option<Position>,
        field: String,
        reason: String,
    },

    #[error("filter rejected: {}", join(.0))]
    Rejected(Vec<FilterError>),
}

impl FilterError {
    /// Attach a condition location
    pub fn at(self, location: Position) -> Self {
        match self {
            FilterError::UnknownField { field, .. } => FilterError::UnknownField {
                position: Some(location),
                field,
            },
            FilterError::OperatorMismatch {
                field,
                field_type,
                operator,
                ..
            } => FilterError::OperatorMismatch {
                position: Some(location),
                field,
                field_type,
                operator,
            },
            FilterError::ArityMismatch {
                operator,
                expected,
                actual,
                ..
            } => FilterError::ArityMismatch {
                position: Some(location),
                operator,
                expected,
                actual,
            },
            FilterError::InvalidValue { field, reason, .. } => FilterError::InvalidValue {
                position: Some(location),
                field,
                reason,
            },
            other => other,
        }
    }

    /// Individual issues, flattening a rejection
    pub fn issues(&self) -> Vec<String> {
        match self {
            FilterError::Rejected(issues) => issues.iter().map(ToString::to_string).collect(),
            other => vec![other.to_string()],
        }
    }
}

impl From<FilterError> for AppError {
    fn from(err: FilterError) -> Self {
        match err {
            FilterError::UnknownEntity(name) => AppError::NotFound(format!("entity `{name}`")),
            other => AppError::InvalidFilter(other.to_string()),
        }
    }
}

/// Errors from strict decoding of a shared filter token
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("token is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("token payload is malformed: {0}")]
    MalformedPayload(String),

    #[error("unsupported filter schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

impl From<CodecError> for AppError {
    fn from(err: CodecError) -> Self {
        AppError::InvalidToken(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_includes_position() {
        let err = FilterError::ArityMismatch {
            position: None,
            operator: FilterOperator::Between,
            expected: 2,
            actual: 1,
        }
        .at(Position::from_indexes(0, 1));

        assert_eq!(
            err.to_string(),
            "group 1, condition 2: operator `between` expects 2 value(s), got 1"
        );
    }

    #[test]
    fn test_rejected_flattens_issues() {
        let err = FilterError::Rejected(vec![
            FilterError::UnknownField {
                position: None,
                field: "colour".to_string(),
            },
            FilterError::UnknownEntity("invoices".to_string()),
        ]);
        assert_eq!(err.issues().len(), 2);
        assert!(err.to_string().starts_with("filter rejected: unknown field `colour`"));
    }
}
