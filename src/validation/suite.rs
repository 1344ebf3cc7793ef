//! Expectation suites and validation reports

use super::Expectation;
use crate::transform::{EnergyConsumption, Feature};
use serde::{Deserialize, Serialize};

/// Name of the suite attached to the energy consumption feature group
pub const ENERGY_CONSUMPTION_SUITE: &str = "energy_consumption_suite";

/// Named collection of expectations, stored alongside the feature group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectationSuite {
    pub name: String,
    pub expectations: Vec<Expectation>,
}

/// Outcome of one expectation
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationResult {
    pub expectation: Expectation,
    pub unexpected_count: usize,
}

impl ExpectationResult {
    pub fn success(&self) -> bool {
        self.unexpected_count == 0
    }
}

/// Outcome of validating rows against a suite
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub suite: String,
    pub evaluated_rows: usize,
    pub results: Vec<ExpectationResult>,
}

impl ValidationReport {
    pub fn success(&self) -> bool {
        self.results.iter().all(ExpectationResult::success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExpectationResult> {
        self.results.iter().filter(|r| !r.success())
    }
}

impl ExpectationSuite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
        }
    }

    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Evaluate every expectation against `rows`
    pub fn validate(&self, rows: &[EnergyConsumption]) -> ValidationReport {
        let results = self
            .expectations
            .iter()
            .map(|expectation| {
                let unexpected_count = expectation.unexpected_count(rows);
                if unexpected_count > 0 {
                    log::debug!("Expectation '{}' failed for {} row(s)", expectation, unexpected_count);
                }
                ExpectationResult {
                    expectation: expectation.clone(),
                    unexpected_count,
                }
            })
            .collect();

        ValidationReport {
            suite: self.name.clone(),
            evaluated_rows: rows.len(),
            results,
        }
    }
}

/// Expectations for the energy consumption feature group
///
/// - area: 0 (DK), 1 (DK1) or 2 (DK2)
/// - consumer_type: > 0
/// - energy_consumption: >= 0
/// - datetime_utc: always full hours
pub fn build_expectation_suite() -> ExpectationSuite {
    ExpectationSuite::new(ENERGY_CONSUMPTION_SUITE)
        .with_expectation(Expectation::ExpectTableRowCountToBeAtLeast { min_value: 1 })
        .with_expectation(Expectation::ExpectColumnDistinctValuesToBeInSet {
            column: Feature::Area,
            value_set: vec![0, 1, 2],
        })
        .with_expectation(Expectation::ExpectColumnValuesToBeBetween {
            column: Feature::ConsumerType,
            min_value: Some(0.0),
            max_value: None,
            strict_min: true,
        })
        .with_expectation(Expectation::ExpectColumnValuesToBeBetween {
            column: Feature::EnergyConsumption,
            min_value: Some(0.0),
            max_value: None,
            strict_min: false,
        })
        .with_expectation(Expectation::ExpectColumnValuesToBeFullHours {
            column: Feature::DatetimeUtc,
        })
}
