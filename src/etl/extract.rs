//! Extractor trait for pulling records out of a source

use crate::extract::ExtractionMetadata;
use eyre::Result;

/// Records pulled from a source together with the metadata describing the pull.
#[derive(Debug, Clone)]
pub struct Extraction<T> {
    pub records: Vec<T>,
    pub metadata: ExtractionMetadata,
}

impl<T> Extraction<T> {
    pub fn new(records: Vec<T>, metadata: ExtractionMetadata) -> Self {
        Self { records, metadata }
    }
}

/// Extractor trait for extracting data from a source
///
/// Implementors define how to extract records from sources like:
/// - A cached flat file downloaded over HTTP
/// - A remote JSON API
///
/// Returning `Ok(None)` signals a recoverable failure (e.g. the source was
/// unreachable). The pipeline treats that as a graceful abort rather than an
/// error.
///
/// # Example
/// ```no_run
/// use energy_feature_pipeline::etl::{Extraction, Extractor};
/// use energy_feature_pipeline::extract::{DatetimeFormat, ExtractionMetadata, compute_window};
/// use eyre::Result;
///
/// struct StaticExtractor;
///
/// impl Extractor for StaticExtractor {
///     type Item = String;
///
///     async fn extract(&self) -> Result<Option<Extraction<Self::Item>>> {
///         let window = compute_window(None, 15, 30);
///         let format = DatetimeFormat::new("%Y-%m-%d %H:%M")?;
///         let records = vec!["2023-06-01 00:00".to_string()];
///         let timestamps = records.iter().map(String::as_str);
///         let metadata =
///             ExtractionMetadata::new(&window, 15, 30, "file:///data.csv", &format, timestamps);
///         Ok(Some(Extraction::new(records, metadata)))
///     }
/// }
/// ```
pub trait Extractor: Send + Sync {
    /// The type of records extracted
    type Item: Send;

    /// Extract records from the source
    ///
    /// # Errors
    /// Returns an error for unrecoverable failures (bad status, corrupt data, I/O)
    fn extract(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Extraction<Self::Item>>>> + Send;
}
