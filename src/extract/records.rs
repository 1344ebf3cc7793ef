//! Raw tabular records as delivered by the source, before any cleaning

use super::{DatetimeFormat, ExtractionWindow, parse_reference_datetime};
use clap::ValueEnum;
use eyre::{Context, Result};
use std::collections::BTreeMap;

/// Mandatory timestamp column of every source row
pub const TIMESTAMP_COLUMN: &str = "HourUTC";

/// How row timestamps are compared against the window bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum TimestampComparison {
    /// Compare the raw strings against the bounds formatted with the datetime
    /// format. Requires a zero-padded, lexically sortable format.
    #[default]
    Lexical,
    /// Parse each timestamp with the datetime format and compare instants.
    /// Rows that fail to parse are dropped.
    Parsed,
}

/// A single source row: column name to raw string value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: BTreeMap<String, String>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.fields.remove(column)
    }

    /// Move the value of `from` to `to`. Returns false if `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) -> bool {
        match self.fields.remove(from) {
            Some(value) => {
                self.fields.insert(to.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Value of the [`TIMESTAMP_COLUMN`]
    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_COLUMN)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered rows plus the column header they were read with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecordSet {
    columns: Vec<String>,
    records: Vec<RawRecord>,
}

impl RawRecordSet {
    pub fn new(columns: Vec<String>, records: Vec<RawRecord>) -> Self {
        Self { columns, records }
    }

    /// Parse delimited text with a header row.
    ///
    /// # Errors
    /// Fails when the content is empty, has no header, cannot be parsed, or
    /// lacks the [`TIMESTAMP_COLUMN`].
    pub fn from_delimited(content: &[u8], delimiter: u8) -> Result<Self> {
        if content.iter().all(u8::is_ascii_whitespace) {
            eyre::bail!("No columns to parse from empty content");
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let columns: Vec<String> = reader
            .headers()
            .with_context(|| "Failed to read header row")?
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').to_string())
            .collect();

        if columns.iter().all(String::is_empty) {
            eyre::bail!("Header row has no column names");
        }
        if !columns.iter().any(|c| c == TIMESTAMP_COLUMN) {
            eyre::bail!(
                "Missing mandatory column '{}' (found: {})",
                TIMESTAMP_COLUMN,
                columns.join(", ")
            );
        }

        let mut records: Vec<RawRecord> = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            // +2: one for the header row, one for 1-based line numbers
            let row = row.with_context(|| format!("Failed to parse line {}", idx + 2))?;
            records.push(
                columns
                    .iter()
                    .zip(row.iter())
                    .map(|(column, value)| (column.clone(), value))
                    .collect(),
            );
        }

        Ok(Self { columns, records })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<RawRecord> {
        self.records
    }

    /// Timestamp value of every row, in order
    pub fn timestamps(&self) -> impl Iterator<Item = &str> {
        self.records.iter().filter_map(RawRecord::timestamp)
    }

    /// Rewrite timestamps that do not match `format` but read as ISO 8601
    /// (`2023-06-01T00:00:00`) into `format`, so they compare correctly
    /// against window bounds rendered with it. Returns the number of rows
    /// rewritten; unreadable timestamps are left alone.
    pub fn normalize_timestamps(&mut self, format: &DatetimeFormat) -> usize {
        let mut rewritten = 0;
        for record in &mut self.records {
            let Some(raw) = record.timestamp() else {
                continue;
            };
            if format.parse(raw).is_some() {
                continue;
            }
            if let Ok(instant) = parse_reference_datetime(raw) {
                record.insert(TIMESTAMP_COLUMN, format.format(&instant));
                rewritten += 1;
            }
        }
        rewritten
    }

    /// Keep only the rows whose timestamp lies within the window, bounds
    /// included. Rows without a timestamp are dropped.
    pub fn filter_window(
        self,
        window: &ExtractionWindow,
        format: &DatetimeFormat,
        comparison: TimestampComparison,
    ) -> Self {
        let total = self.records.len();
        let records: Vec<RawRecord> = match comparison {
            TimestampComparison::Lexical => {
                let start = format.format(&window.start());
                let end = format.format(&window.end());
                self.records
                    .into_iter()
                    .filter(|record| {
                        record
                            .timestamp()
                            .is_some_and(|ts| ts >= start.as_str() && ts <= end.as_str())
                    })
                    .collect()
            }
            TimestampComparison::Parsed => {
                let mut unparseable = 0usize;
                let kept = self
                    .records
                    .into_iter()
                    .filter(|record| {
                        match record.timestamp().and_then(|ts| format.parse(ts)) {
                            Some(instant) => window.contains(&instant),
                            None => {
                                unparseable += 1;
                                false
                            }
                        }
                    })
                    .collect();
                if unparseable > 0 {
                    log::warn!(
                        "Dropped {} row(s) whose {} does not match '{}'",
                        unparseable,
                        TIMESTAMP_COLUMN,
                        format
                    );
                }
                kept
            }
        };

        log::debug!(
            "Kept {} of {} row(s) inside [{}, {}]",
            records.len(),
            total,
            format.format(&window.start()),
            format.format(&window.end())
        );

        Self {
            columns: self.columns,
            records,
        }
    }
}
