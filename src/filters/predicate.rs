//! Compiled predicate tree
//!
//! The compiler's output is a plain value: `and`/`or` combinators over
//! `(field, operator, value)` leaves. A persistence layer is free to
//! translate it into a native query; [`Predicate::evaluate`] executes it in
//! memory against anything implementing [`Filterable`].

use crate::filters::fields::FieldType;
use crate::filters::model::{FilterValue, LogicalOperator, Scalar};
use crate::filters::operators::FilterOperator;
use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Record whose attributes can be looked up by field key
pub trait Filterable {
    /// Current value of a field; `None` when absent or null
    fn field_value(&self, key: &str) -> Option<Scalar>;
}

impl Filterable for HashMap<String, Scalar> {
    fn field_value(&self, key: &str) -> Option<Scalar> {
        self.get(key).cloned()
    }
}

/// Leaf comparison with an already type-checked operand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub field: String,
    /// Effective type the operator semantics are chosen for
    pub field_type: FieldType,
    pub operator: FilterOperator,
    #[serde(default, skip_serializing_if = "FilterValue::is_none")]
    pub value: FilterValue,
}

/// Boolean tree over comparisons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// No filtering
    All,
    And { children: Vec<Predicate> },
    Or { children: Vec<Predicate> },
    Leaf(Comparison),
}

impl Predicate {
    pub fn leaf(comparison: Comparison) -> Self {
        Predicate::Leaf(comparison)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Predicate::All)
    }

    /// Join `self` and `next` with a connector, keeping left-to-right order.
    ///
    /// Consecutive uses of the same connector are flattened into one node.
    pub fn combine(self, connector: LogicalOperator, next: Predicate) -> Predicate {
        match (connector, self) {
            (_, Predicate::All) => next,
            (LogicalOperator::And, Predicate::And { mut children }) => {
                children.push(next);
                Predicate::And { children }
            }
            (LogicalOperator::Or, Predicate::Or { mut children }) => {
                children.push(next);
                Predicate::Or { children }
            }
            (LogicalOperator::And, left) => Predicate::And {
                children: vec![left, next],
            },
            (LogicalOperator::Or, left) => Predicate::Or {
                children: vec![left, next],
            },
        }
    }

    /// Left fold of `(predicate, connector-to-next)` pairs
    pub fn chain(items: impl IntoIterator<Item = (Predicate, LogicalOperator)>) -> Predicate {
        let mut acc = Predicate::All;
        let mut pending = LogicalOperator::And;
        for (predicate, connector) in items {
            acc = acc.combine(pending, predicate);
            pending = connector;
        }
        acc
    }

    /// Evaluate against the local calendar date
    pub fn matches<R: Filterable + ?Sized>(&self, record: &R) -> bool {
        self.evaluate(record, Local::now().date_naive())
    }

    /// Evaluate with an explicit "today" for relative date buckets
    pub fn evaluate<R: Filterable + ?Sized>(&self, record: &R, today: NaiveDate) -> bool {
        match self {
            Predicate::All => true,
            Predicate::And { children } => children.iter().all(|c| c.evaluate(record, today)),
            Predicate::Or { children } => children.iter().any(|c| c.evaluate(record, today)),
            Predicate::Leaf(comparison) => {
                comparison.test(record.field_value(&comparison.field).as_ref(), today)
            }
        }
    }

    /// Number of leaf comparisons
    pub fn leaf_count(&self) -> usize {
        match self {
            Predicate::All => 0,
            Predicate::Leaf(_) => 1,
            Predicate::And { children } | Predicate::Or { children } => {
                children.iter().map(Predicate::leaf_count).sum()
            }
        }
    }
}

impl Comparison {
    /// Apply the operator to a record value.
    ///
    /// Absent values fail positive tests and pass negated ones.
    pub fn test(&self, actual: Option<&Scalar>, today: NaiveDate) -> bool {
        use FilterOperator::*;

        let actual = actual.filter(|v| !v.is_blank());
        match self.operator {
            IsEmpty => actual.is_none(),
            IsNotEmpty => actual.is_some(),
            Equals => actual.is_some_and(|a| self.equals(a)),
            NotEquals => !actual.is_some_and(|a| self.equals(a)),
            Contains => self.text_test(actual, |a, v| a.contains(v)),
            NotContains => !self.text_test(actual, |a, v| a.contains(v)),
            StartsWith => self.text_test(actual, |a, v| a.starts_with(v)),
            EndsWith => self.text_test(actual, |a, v| a.ends_with(v)),

            GreaterThan => self.number_test(actual, |a, v| a > v),
            LessThan => self.number_test(actual, |a, v| a < v),
            GreaterThanOrEqual => self.number_test(actual, |a, v| a >= v),
            LessThanOrEqual => self.number_test(actual, |a, v| a <= v),
            Between => self.number_range(actual).unwrap_or(false),
            NotBetween => self.number_range(actual).is_some_and(|inside| !inside),

            Before => self.date_test(actual, |a, v| a < v),
            After => self.date_test(actual, |a, v| a > v),
            OnOrBefore => self.date_test(actual, |a, v| a <= v),
            OnOrAfter => self.date_test(actual, |a, v| a >= v),
            DateIs => self.date_test(actual, |a, v| a == v),
            DateBetween => match (actual.and_then(Scalar::as_date), &self.value) {
                (Some(a), FilterValue::Pair(lo, hi)) => match (lo.as_date(), hi.as_date()) {
                    (Some(lo), Some(hi)) => lo <= a && a <= hi,
                    _ => false,
                },
                _ => false,
            },
            IsToday | IsYesterday | IsThisWeek | IsLastWeek | IsThisMonth | IsLastMonth
            | IsThisYear | IsLastYear => match (
                actual.and_then(Scalar::as_date),
                relative_range(self.operator, today),
            ) {
                (Some(a), Some((start, end))) => start <= a && a <= end,
                _ => false,
            },

            IsTrue => actual.and_then(Scalar::as_bool) == Some(true),
            IsFalse => actual.and_then(Scalar::as_bool) == Some(false),
        }
    }

    fn operand(&self) -> Option<&Scalar> {
        match &self.value {
            FilterValue::Single(v) => Some(v),
            _ => None,
        }
    }

    fn equals(&self, actual: &Scalar) -> bool {
        let Some(expected) = self.operand() else {
            return false;
        };
        match self.field_type {
            FieldType::Number => actual
                .as_number()
                .zip(expected.as_number())
                .is_some_and(|(a, e)| a == e),
            FieldType::Date => actual
                .as_date()
                .zip(expected.as_date())
                .is_some_and(|(a, e)| a == e),
            FieldType::Boolean => actual
                .as_bool()
                .zip(expected.as_bool())
                .is_some_and(|(a, e)| a == e),
            _ => match (actual, expected) {
                (Scalar::Text(a), Scalar::Text(e)) => a.to_lowercase() == e.to_lowercase(),
                (a, e) => a == e,
            },
        }
    }

    fn text_test(&self, actual: Option<&Scalar>, test: impl Fn(&str, &str) -> bool) -> bool {
        match (actual.and_then(Scalar::as_text), self.operand().and_then(Scalar::as_text)) {
            (Some(a), Some(v)) => test(&a.to_lowercase(), &v.to_lowercase()),
            _ => false,
        }
    }

    fn number_test(&self, actual: Option<&Scalar>, test: impl Fn(f64, f64) -> bool) -> bool {
        match (actual.and_then(Scalar::as_number), self.operand().and_then(Scalar::as_number)) {
            (Some(a), Some(v)) => test(a, v),
            _ => false,
        }
    }

    /// `Some(inside)` when both the value and the bounds are numeric
    fn number_range(&self, actual: Option<&Scalar>) -> Option<bool> {
        let a = actual.and_then(Scalar::as_number)?;
        match &self.value {
            FilterValue::Pair(lo, hi) => {
                let (lo, hi) = (lo.as_number()?, hi.as_number()?);
                Some(lo <= a && a <= hi)
            }
            _ => None,
        }
    }

    fn date_test(
        &self,
        actual: Option<&Scalar>,
        test: impl Fn(NaiveDate, NaiveDate) -> bool,
    ) -> bool {
        match (actual.and_then(Scalar::as_date), self.operand().and_then(Scalar::as_date)) {
            (Some(a), Some(v)) => test(a, v),
            _ => false,
        }
    }
}

/// Inclusive calendar range covered by a relative date operator.
///
/// Weeks start on Monday; months and years follow calendar boundaries.
pub fn relative_range(
    operator: FilterOperator,
    today: NaiveDate,
) -> Option<(NaiveDate, NaiveDate)> {
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let month_start = today.with_day(1)?;

    match operator {
        FilterOperator::IsToday => Some((today, today)),
        FilterOperator::IsYesterday => {
            let yesterday = today.pred_opt()?;
            Some((yesterday, yesterday))
        }
        FilterOperator::IsThisWeek => Some((week_start, week_start + Duration::days(6))),
        FilterOperator::IsLastWeek => {
            let start = week_start - Duration::days(7);
            Some((start, start + Duration::days(6)))
        }
        FilterOperator::IsThisMonth => Some((month_start, month_end(month_start)?)),
        FilterOperator::IsLastMonth => {
            let last_month_end = month_start.pred_opt()?;
            Some((last_month_end.with_day(1)?, last_month_end))
        }
        FilterOperator::IsThisYear => Some((
            NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
            NaiveDate::from_ymd_opt(today.year(), 12, 31)?,
        )),
        FilterOperator::IsLastYear => Some((
            NaiveDate::from_ymd_opt(today.year() - 1, 1, 1)?,
            NaiveDate::from_ymd_opt(today.year() - 1, 12, 31)?,
        )),
        _ => None,
    }
}

fn month_end(month_start: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if month_start.month() == 12 {
        (month_start.year() + 1, 1)
    } else {
        (month_start.year(), month_start.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
