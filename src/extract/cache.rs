//! File-cache source
//!
//! Downloads the source file once into a cache directory and serves every
//! later extraction from that copy. Existence of the cache file is the only
//! validity signal: there is no freshness, ETag or hash check, and the cache
//! is not keyed by URL or window.
//!
//! The cache assumes a single writer. Concurrent runs sharing a cache
//! directory are not supported.

use super::{
    DatetimeFormat, ExtractionWindow, RawRecordSet, RecordSource, TimestampComparison,
};
use crate::client::SourceClient;
use eyre::{Context, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Name of the cache file inside the cache directory
pub const CACHE_FILE_NAME: &str = "ConsumptionDE35Hour.csv";

/// Cache directory used when none is configured
pub const DEFAULT_CACHE_DIR: &str = "output/data";

/// Field separator of the source file
pub const FIELD_DELIMITER: u8 = b';';

/// Source that reads records from a cached download of a flat file
///
/// # Example
/// ```no_run
/// use energy_feature_pipeline::client::{DEFAULT_TIMEOUT, SourceClient};
/// use energy_feature_pipeline::extract::{DatetimeFormat, FileSource, RecordSource, compute_window};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = SourceClient::try_new(DEFAULT_TIMEOUT)?;
/// let url = Url::parse("https://example.com/ConsumptionDE35Hour.csv")?;
/// let source = FileSource::new(client, url, DatetimeFormat::file_default())
///     .with_cache_dir("output/data");
///
/// let window = compute_window(None, 15, 30);
/// if let Some(records) = source.fetch(&window).await? {
///     println!("{} rows in window", records.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileSource {
    client: SourceClient,
    url: Url,
    datetime_format: DatetimeFormat,
    cache_dir: Option<PathBuf>,
    cache_file_name: String,
    comparison: TimestampComparison,
}

impl FileSource {
    pub fn new(client: SourceClient, url: Url, datetime_format: DatetimeFormat) -> Self {
        Self {
            client,
            url,
            datetime_format,
            cache_dir: None,
            cache_file_name: CACHE_FILE_NAME.to_string(),
            comparison: TimestampComparison::default(),
        }
    }

    pub fn with_cache_dir(self, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: Some(cache_dir.into()),
            ..self
        }
    }

    pub fn with_cache_file_name(self, cache_file_name: impl Into<String>) -> Self {
        Self {
            cache_file_name: cache_file_name.into(),
            ..self
        }
    }

    pub fn with_comparison(self, comparison: TimestampComparison) -> Self {
        Self { comparison, ..self }
    }

    /// Directory the cache file lives in
    pub fn cache_dir(&self) -> &Path {
        self.cache_dir
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_CACHE_DIR))
    }

    /// Full path of the cache file
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir().join(&self.cache_file_name)
    }

    /// Download the source file to `path`, unless the download fails softly.
    ///
    /// The body goes to a sibling `.part` file first so a failed write never
    /// leaves a truncated cache entry behind.
    async fn download(&self, path: &Path) -> Result<bool> {
        log::info!("Downloading file from {}...", self.url);

        let Some(body) = self.client.fetch(&self.url, &[]).await? else {
            return Ok(false);
        };

        write_cache_file(path, &body)?;

        log::info!(
            "Successfully downloaded {} bytes to {}",
            body.len(),
            path.display()
        );
        Ok(true)
    }
}

/// Write `body` to a sibling `.part` file, then move it to `path`.
/// The `.part` file is removed again if either step fails.
fn write_cache_file(path: &Path, body: &[u8]) -> Result<()> {
    let partial = path.with_extension("part");
    let result = std::fs::write(&partial, body)
        .with_context(|| format!("Failed to write download to {}", partial.display()))
        .and_then(|()| {
            std::fs::rename(&partial, path)
                .with_context(|| format!("Failed to move download to {}", path.display()))
        });

    if result.is_err()
        && let Err(e) = std::fs::remove_file(&partial)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        log::warn!("Failed to remove {}: {}", partial.display(), e);
    }
    result
}

/// Parse the cache file, deleting it if it turns out to be empty or corrupt
/// so the next run downloads a fresh copy.
fn read_cache_file(path: &Path) -> Result<RawRecordSet> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read cache file {}", path.display()))?;

    match RawRecordSet::from_delimited(&content, FIELD_DELIMITER) {
        Ok(records) => Ok(records),
        Err(e) => {
            if let Err(remove_err) = std::fs::remove_file(path) {
                if remove_err.kind() != std::io::ErrorKind::NotFound {
                    log::warn!(
                        "Failed to remove corrupt cache file {}: {}",
                        path.display(),
                        remove_err
                    );
                }
            }
            Err(e.wrap_err(format!(
                "Downloaded file at {} is empty or corrupt and was removed",
                path.display()
            )))
        }
    }
}

impl RecordSource for FileSource {
    fn url(&self) -> &Url {
        &self.url
    }

    fn datetime_format(&self) -> &DatetimeFormat {
        &self.datetime_format
    }

    async fn fetch(&self, window: &ExtractionWindow) -> Result<Option<RawRecordSet>> {
        let cache_dir = self.cache_dir();
        std::fs::create_dir_all(cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;

        let path = self.cache_path();
        if path.exists() {
            log::info!(
                "File already exists at {}. Skipping download.",
                path.display()
            );
        } else if !self.download(&path).await? {
            return Ok(None);
        }

        let records = read_cache_file(&path)?;
        log::debug!("Parsed {} row(s) from {}", records.len(), path.display());

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
    use crate::client::DEFAULT_TIMEOUT;
    use tempfile::TempDir;

    fn source() -> FileSource {
        let client = SourceClient::try_new(DEFAULT_TIMEOUT).unwrap();
        let url = Url::parse("http://localhost:9/ConsumptionDE35Hour.csv").unwrap();
        FileSource::new(client, url, DatetimeFormat::file_default())
    }

    #[test]
    fn test_default_cache_location() {
        let source = source();
        assert_eq!(source.cache_dir(), Path::new(DEFAULT_CACHE_DIR));
        assert_eq!(
            source.cache_path(),
            Path::new("output/data/ConsumptionDE35Hour.csv")
        );
    }

    #[test]
    fn test_custom_cache_location() {
        let source = source()
            .with_cache_dir("/tmp/cache")
            .with_cache_file_name("copy.csv");
        assert_eq!(source.cache_path(), Path::new("/tmp/cache/copy.csv"));
    }

    #[test]
    fn test_read_cache_file_removes_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let err = read_cache_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("empty or corrupt"));
        assert!(!path.exists());
    }

    #[test]
    fn test_write_cache_file_replaces_part_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);

        write_cache_file(&path, b"HourUTC\n").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"HourUTC\n");
        assert!(!path.with_extension("part").exists());
    }

    #[test]
    fn test_failed_move_removes_part_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        // A non-empty directory in the way makes the rename fail
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("blocker"), "").unwrap();

        assert!(write_cache_file(&path, b"HourUTC\n").is_err());
        assert!(!path.with_extension("part").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn test_read_cache_file_keeps_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        std::fs::write(&path, "HourUTC;TotalCon\n2023-06-01 00:00;1.5\n").unwrap();

        let records = read_cache_file(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert!(path.exists());
    }
}
