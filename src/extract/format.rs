//! Validated strftime patterns used to stringify window bounds and parse
//! source timestamps

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use eyre::Result;
use std::fmt;
use std::str::FromStr;

/// Datetime format of the flat-file source (`2023-06-30 21:00`)
pub const FILE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Datetime format of the API source (`2023-06-30T21:00:00Z`)
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// A strftime pattern that is known to be well formed.
///
/// chrono panics when formatting with an invalid pattern, so patterns are
/// checked once at construction and formatting is infallible afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatetimeFormat(String);

impl DatetimeFormat {
    /// Validate and wrap a strftime pattern
    ///
    /// # Errors
    /// Returns an error if the pattern contains an unknown specifier
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
            eyre::bail!("Invalid datetime format '{}'", pattern);
        }
        Ok(Self(pattern))
    }

    pub fn file_default() -> Self {
        Self(FILE_DATETIME_FORMAT.to_string())
    }

    pub fn api_default() -> Self {
        Self(API_DATETIME_FORMAT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render an instant with this pattern
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        instant.format(&self.0).to_string()
    }

    /// Parse a timestamp written with this pattern, interpreting it as UTC.
    ///
    /// Date-only patterns resolve to midnight.
    pub fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();
        NaiveDateTime::parse_from_str(value, &self.0)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, &self.0)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
            .map(|naive| naive.and_utc())
    }
}

impl fmt::Display for DatetimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DatetimeFormat {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
