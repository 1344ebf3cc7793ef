//! Extraction core
//!
//! This module computes the delayed extraction window and resolves the rows
//! of that window from either a cached file download or a remote API:
//! - [`compute_window`] derives `[start, end]` from a reference instant
//! - [`FileSource`] implements the download-once cache protocol
//! - [`ApiSource`] queries the API through a pluggable [`ApiAdapter`]
//! - [`EnergyConsumptionExtractor`] wraps a source as an ETL [`Extractor`](crate::etl::Extractor)

mod api;
mod cache;
mod config;
mod extractor;
mod format;
mod metadata;
mod records;
mod source;
mod window;

pub use api::{ApiAdapter, ApiSource, EnergiDataServiceAdapter};
pub use cache::{CACHE_FILE_NAME, DEFAULT_CACHE_DIR, FIELD_DELIMITER, FileSource};
pub use config::{
    DEFAULT_DAYS_DELAY, DEFAULT_DAYS_EXPORT, DEFAULT_SOURCE_URL, ExtractionConfig, SourceKind,
};
pub use extractor::EnergyConsumptionExtractor;
pub use format::{API_DATETIME_FORMAT, DatetimeFormat, FILE_DATETIME_FORMAT};
pub use metadata::{ExtractionMetadata, count_unique};
pub use records::{RawRecord, RawRecordSet, TIMESTAMP_COLUMN, TimestampComparison};
pub use source::RecordSource;
pub use window::{ExtractionWindow, compute_window, compute_window_at, parse_reference_datetime};
