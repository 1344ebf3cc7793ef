//! Validation of cleaned feature rows
//!
//! An [`ExpectationSuite`] is a serializable list of [`Expectation`]s. The
//! suite is stored with the feature group and evaluated before every insert.

mod expectation;
mod suite;

pub use expectation::Expectation;
pub use suite::{
    ENERGY_CONSUMPTION_SUITE, ExpectationResult, ExpectationSuite, ValidationReport,
    build_expectation_suite,
};
