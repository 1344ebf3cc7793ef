//! Audit metadata attached to every extraction

use super::{DatetimeFormat, ExtractionWindow};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scalar descriptors of one extraction run
///
/// Built once per run and kept next to the records for logging and auditing.
/// It is never part of the record schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub days_delay: u32,
    pub days_export: u32,
    pub url: String,
    pub export_datetime_utc_start: String,
    pub export_datetime_utc_end: String,
    pub datetime_format: String,
    /// Distinct timestamps among the extracted rows
    pub num_unique_samples_per_time_series: usize,
}

impl ExtractionMetadata {
    pub fn new<'a>(
        window: &ExtractionWindow,
        days_delay: u32,
        days_export: u32,
        url: &str,
        datetime_format: &DatetimeFormat,
        timestamps: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self {
            days_delay,
            days_export,
            url: url.to_string(),
            export_datetime_utc_start: datetime_format.format(&window.start()),
            export_datetime_utc_end: datetime_format.format(&window.end()),
            datetime_format: datetime_format.to_string(),
            num_unique_samples_per_time_series: count_unique(timestamps),
        }
    }
}

/// Cardinality of the distinct values in `timestamps`
pub fn count_unique<'a>(timestamps: impl IntoIterator<Item = &'a str>) -> usize {
    timestamps.into_iter().collect::<HashSet<_>>().len()
}
