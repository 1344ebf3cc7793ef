//! Extractor that ties window computation, a record source and metadata
//! assembly together

use super::{
    ExtractionConfig, ExtractionMetadata, RawRecord, RecordSource, compute_window,
};
use crate::etl::{Extraction, Extractor};
use chrono::{DateTime, Utc};
use eyre::Result;

/// Extracts the hourly energy consumption rows of the configured window
///
/// # Example
/// ```no_run
/// use energy_feature_pipeline::client::{DEFAULT_TIMEOUT, SourceClient};
/// use energy_feature_pipeline::etl::Extractor;
/// use energy_feature_pipeline::extract::{
///     DEFAULT_SOURCE_URL, EnergyConsumptionExtractor, ExtractionConfig, FileSource, SourceKind,
/// };
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let config = ExtractionConfig::new(SourceKind::File, Url::parse(DEFAULT_SOURCE_URL)?);
/// let client = SourceClient::try_new(config.timeout)?;
/// let source = FileSource::new(client, config.url.clone(), config.datetime_format.clone());
///
/// let extractor = EnergyConsumptionExtractor::new(source, &config);
/// if let Some(extraction) = extractor.extract().await? {
///     println!("{:?}", extraction.metadata);
/// }
/// # Ok(())
/// # }
/// ```
pub struct EnergyConsumptionExtractor<S> {
    source: S,
    reference: Option<DateTime<Utc>>,
    days_delay: u32,
    days_export: u32,
}

impl<S: RecordSource> EnergyConsumptionExtractor<S> {
    pub fn new(source: S, config: &ExtractionConfig) -> Self {
        Self {
            source,
            reference: config.reference,
            days_delay: config.days_delay,
            days_export: config.days_export,
        }
    }
}

impl<S: RecordSource> Extractor for EnergyConsumptionExtractor<S> {
    type Item = RawRecord;

    async fn extract(&self) -> Result<Option<Extraction<Self::Item>>> {
        let window = compute_window(self.reference, self.days_delay, self.days_export);
        let format = self.source.datetime_format();

        if window.is_degenerate() {
            log::warn!(
                "Extraction window has zero width (days_export = {}), only rows at {} can match",
                self.days_export,
                format.format(&window.end())
            );
        }
        log::info!(
            "Extracting records between {} and {}",
            format.format(&window.start()),
            format.format(&window.end())
        );

        let Some(records) = self.source.fetch(&window).await? else {
            return Ok(None);
        };

        let metadata = ExtractionMetadata::new(
            &window,
            self.days_delay,
            self.days_export,
            self.source.url().as_str(),
            format,
            records.timestamps(),
        );
        log::info!(
            "Extracted {} row(s) with {} unique timestamp(s)",
            records.len(),
            metadata.num_unique_samples_per_time_series
        );

        Ok(Some(Extraction::new(records.into_records(), metadata)))
    }
}
