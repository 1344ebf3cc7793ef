//! Record sources the extractor can pull from

use super::{DatetimeFormat, ExtractionWindow, RawRecordSet};
use eyre::Result;
use url::Url;

/// A source that resolves the rows of an extraction window.
///
/// Implementations must only return rows whose timestamp lies inside the
/// window, bounds included.
pub trait RecordSource: Send + Sync {
    /// Where the records come from
    fn url(&self) -> &Url;

    /// Format used to stringify window bounds and read timestamps
    fn datetime_format(&self) -> &DatetimeFormat;

    /// Fetch the rows of `window`
    ///
    /// Returns `Ok(None)` when the source could not be reached.
    fn fetch(
        &self,
        window: &ExtractionWindow,
    ) -> impl std::future::Future<Output = Result<Option<RawRecordSet>>> + Send;
}
