//! Individual expectations and their evaluation

use crate::transform::{EnergyConsumption, Feature};
use chrono::Timelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single rule the feature rows must satisfy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expectation_type", rename_all = "snake_case")]
pub enum Expectation {
    /// At least `min_value` rows
    ExpectTableRowCountToBeAtLeast { min_value: usize },
    /// Every value of `column` is one of `value_set`
    ExpectColumnDistinctValuesToBeInSet { column: Feature, value_set: Vec<i64> },
    /// Every value of `column` lies within the bounds; `strict_min` excludes
    /// the lower bound itself
    ExpectColumnValuesToBeBetween {
        column: Feature,
        min_value: Option<f64>,
        max_value: Option<f64>,
        #[serde(default)]
        strict_min: bool,
    },
    /// Every timestamp of `column` falls on a full hour. Only meaningful for
    /// `datetime_utc`; every row fails for other columns.
    ExpectColumnValuesToBeFullHours { column: Feature },
}

impl Expectation {
    /// Number of rows (or, for table-level expectations, 0 or 1) violating
    /// the expectation
    pub fn unexpected_count(&self, rows: &[EnergyConsumption]) -> usize {
        match self {
            Self::ExpectTableRowCountToBeAtLeast { min_value } => {
                usize::from(rows.len() < *min_value)
            }
            Self::ExpectColumnDistinctValuesToBeInSet { column, value_set } => rows
                .iter()
                .filter(|row| {
                    let value = column.value(row);
                    !value_set.iter().any(|allowed| *allowed as f64 == value)
                })
                .count(),
            Self::ExpectColumnValuesToBeBetween {
                column,
                min_value,
                max_value,
                strict_min,
            } => rows
                .iter()
                .filter(|row| {
                    let value = column.value(row);
                    let above_min = match (min_value, strict_min) {
                        (Some(min), true) => value > *min,
                        (Some(min), false) => value >= *min,
                        (None, _) => true,
                    };
                    let below_max = max_value.is_none_or(|max| value <= max);
                    !(above_min && below_max) || value.is_nan()
                })
                .count(),
            Self::ExpectColumnValuesToBeFullHours { column } => rows
                .iter()
                .filter(|row| {
                    *column != Feature::DatetimeUtc
                        || row.datetime_utc.minute() != 0
                        || row.datetime_utc.second() != 0
                        || row.datetime_utc.nanosecond() != 0
                })
                .count(),
        }
    }
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpectTableRowCountToBeAtLeast { min_value } => {
                write!(f, "row count >= {}", min_value)
            }
            Self::ExpectColumnDistinctValuesToBeInSet { column, value_set } => {
                write!(f, "{} in {:?}", column, value_set)
            }
            Self::ExpectColumnValuesToBeBetween {
                column,
                min_value,
                max_value,
                strict_min,
            } => {
                let lower = match (min_value, strict_min) {
                    (Some(min), true) => format!("{} < ", min),
                    (Some(min), false) => format!("{} <= ", min),
                    (None, _) => String::new(),
                };
                let upper = max_value.map(|max| format!(" <= {}", max)).unwrap_or_default();
                write!(f, "{}{}{}", lower, column, upper)
            }
            Self::ExpectColumnValuesToBeFullHours { column } => {
                write!(f, "{} on full hours", column)
            }
        }
    }
}
