//! API source
//!
//! Queries a remote JSON API for the rows of the window. Nothing is cached;
//! every extraction issues one request. How the window becomes a request and
//! how the response becomes rows is delegated to an [`ApiAdapter`].

use super::{
    DatetimeFormat, ExtractionWindow, RawRecord, RawRecordSet, RecordSource,
    TimestampComparison,
};
use crate::client::SourceClient;
use chrono::TimeDelta;
use eyre::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use url::Url;

/// Converts between the extraction window and a concrete API's wire format
pub trait ApiAdapter: Send + Sync {
    /// Query parameters requesting the rows of `window`
    fn query(&self, window: &ExtractionWindow) -> Vec<(&'static str, String)>;

    /// Turn a response body into rows
    ///
    /// # Errors
    /// Returns an error if the body does not have the expected shape
    fn parse(&self, body: &[u8]) -> Result<RawRecordSet>;
}

/// Adapter for the Energi Data Service dataset API
///
/// Requests `?start=..&end=..` with minute precision and reads the
/// `records` array of the response. The upstream `end` bound is exclusive,
/// so the request runs one hour past the window and the post-filter restores
/// the inclusive bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnergiDataServiceAdapter;

const QUERY_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct DatasetResponse {
    records: Vec<Map<String, Value>>,
}

impl ApiAdapter for EnergiDataServiceAdapter {
    fn query(&self, window: &ExtractionWindow) -> Vec<(&'static str, String)> {
        let end = window.end() + TimeDelta::hours(1);
        vec![
            ("start", window.start().format(QUERY_DATETIME_FORMAT).to_string()),
            ("end", end.format(QUERY_DATETIME_FORMAT).to_string()),
            ("sort", "HourUTC asc".to_string()),
        ]
    }

    fn parse(&self, body: &[u8]) -> Result<RawRecordSet> {
        let response: DatasetResponse =
            serde_json::from_slice(body).with_context(|| "Failed to parse API response")?;

        let mut columns: Vec<String> = Vec::new();
        let mut records = Vec::with_capacity(response.records.len());
        for object in response.records {
            let mut record = RawRecord::new();
            for (column, value) in object {
                if !columns.contains(&column) {
                    columns.push(column.clone());
                }
                record.insert(column, value_to_string(value));
            }
            records.push(record);
        }

        Ok(RawRecordSet::new(columns, records))
    }
}

fn value_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Source that queries a remote API for every extraction
pub struct ApiSource<A = EnergiDataServiceAdapter> {
    client: SourceClient,
    url: Url,
    datetime_format: DatetimeFormat,
    comparison: TimestampComparison,
    adapter: A,
}

impl ApiSource {
    pub fn new(client: SourceClient, url: Url, datetime_format: DatetimeFormat) -> Self {
        Self {
            client,
            url,
            datetime_format,
            comparison: TimestampComparison::default(),
            adapter: EnergiDataServiceAdapter,
        }
    }
}

impl<A: ApiAdapter> ApiSource<A> {
    /// Swap in a different response adapter
    pub fn with_adapter<B: ApiAdapter>(self, adapter: B) -> ApiSource<B> {
        ApiSource {
            client: self.client,
            url: self.url,
            datetime_format: self.datetime_format,
            comparison: self.comparison,
            adapter,
        }
    }

    pub fn with_comparison(self, comparison: TimestampComparison) -> Self {
        Self { comparison, ..self }
    }
}

impl<A: ApiAdapter> RecordSource for ApiSource<A> {
    fn url(&self) -> &Url {
        &self.url
    }

    fn datetime_format(&self) -> &DatetimeFormat {
        &self.datetime_format
    }

    async fn fetch(&self, window: &ExtractionWindow) -> Result<Option<RawRecordSet>> {
        log::info!("Requesting records from API {}...", self.url);

        let query = self.adapter.query(window);
        let Some(body) = self.client.fetch(&self.url, &query).await? else {
            return Ok(None);
        };

        let mut records = self
            .adapter
            .parse(&body)
            .with_context(|| format!("Unexpected response from {}", self.url))?;
        log::info!("Received {} row(s) from API", records.len());

        let rewritten = records.normalize_timestamps(&self.datetime_format);
        if rewritten > 0 {
            log::debug!(
                "Rewrote {} timestamp(s) to '{}'",
                rewritten,
                self.datetime_format
            );
        }

        Ok(Some(records.filter_window(
            window,
            &self.datetime_format,
            self.comparison,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::compute_window_at;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_query_covers_inclusive_end() {
        let reference = Utc.with_ymd_and_hms(2023, 6, 30, 21, 0, 0).unwrap();
        let window = compute_window_at(reference, 15, 30);

        let query = EnergiDataServiceAdapter.query(&window);
        assert_eq!(query[0], ("start", "2023-05-16T21:00".to_string()));
        assert_eq!(query[1], ("end", "2023-06-15T22:00".to_string()));
    }

    #[test]
    fn test_parse_records_array() {
        let body = br#"{
            "total": 2,
            "records": [
                {"HourUTC": "2023-06-01T00:00:00", "PriceArea": "DK1", "ConsumerType_DE35": 111, "TotalCon": 4523.5},
                {"HourUTC": "2023-06-01T01:00:00", "PriceArea": "DK2", "ConsumerType_DE35": 111, "TotalCon": null}
            ]
        }"#;

        let set = EnergiDataServiceAdapter.parse(body).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.columns().iter().any(|c| c == "TotalCon"));
        assert_eq!(set.records()[0].get("ConsumerType_DE35"), Some("111"));
        assert_eq!(set.records()[0].get("TotalCon"), Some("4523.5"));
        assert_eq!(set.records()[1].get("TotalCon"), Some(""));
        assert_eq!(set.records()[1].timestamp(), Some("2023-06-01T01:00:00"));
    }

    #[test]
    fn test_parse_rejects_unexpected_shape() {
        assert!(EnergiDataServiceAdapter.parse(b"[1, 2, 3]").is_err());
        assert!(EnergiDataServiceAdapter.parse(b"not json").is_err());
    }
}
