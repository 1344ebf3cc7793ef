//! Extraction configuration, built once at startup and passed by reference

use super::{DatetimeFormat, TimestampComparison};
use crate::client::DEFAULT_TIMEOUT;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Dataset the pipeline reads by default
pub const DEFAULT_SOURCE_URL: &str = "https://api.energidataservice.dk/dataset/ConsumptionDE35Hour";

/// Days the upstream source lags behind real time
pub const DEFAULT_DAYS_DELAY: u32 = 15;

/// Days of data exported per run
pub const DEFAULT_DAYS_EXPORT: u32 = 30;

/// Where records are read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Download a `;`-separated file once and serve it from the local cache
    #[default]
    File,
    /// Query the JSON API on every run
    Api,
}

impl SourceKind {
    /// Datetime format the source writes its timestamps in
    pub fn default_datetime_format(&self) -> DatetimeFormat {
        match self {
            Self::File => DatetimeFormat::file_default(),
            Self::Api => DatetimeFormat::api_default(),
        }
    }
}

/// Knobs of one extraction
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    pub source: SourceKind,
    /// Anchor of the window; `None` means "now"
    pub reference: Option<DateTime<Utc>>,
    pub days_delay: u32,
    pub days_export: u32,
    pub url: Url,
    pub datetime_format: DatetimeFormat,
    /// Cache directory for [`SourceKind::File`]; `None` uses the default
    pub cache_dir: Option<PathBuf>,
    pub comparison: TimestampComparison,
    pub timeout: Duration,
}

impl ExtractionConfig {
    /// Configuration with the default offsets and the source's datetime format
    pub fn new(source: SourceKind, url: Url) -> Self {
        Self {
            source,
            reference: None,
            days_delay: DEFAULT_DAYS_DELAY,
            days_export: DEFAULT_DAYS_EXPORT,
            url,
            datetime_format: source.default_datetime_format(),
            cache_dir: None,
            comparison: TimestampComparison::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_source() {
        let url = Url::parse(DEFAULT_SOURCE_URL).unwrap();

        let file = ExtractionConfig::new(SourceKind::File, url.clone());
        assert_eq!(file.datetime_format.as_str(), "%Y-%m-%d %H:%M");
        assert_eq!(file.days_delay, 15);
        assert_eq!(file.days_export, 30);
        assert!(file.reference.is_none());

        let api = ExtractionConfig::new(SourceKind::Api, url);
        assert_eq!(api.datetime_format.as_str(), "%Y-%m-%dT%H:%M:%SZ");
    }
}
