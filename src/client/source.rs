//! Source client module
//!
//! Provides `SourceClient` for downloading files and querying the API.

use eyre::{Context, Result};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for the energy data source.
///
/// Requests are plain GETs without authentication. Failures fall into two
/// classes:
/// - **Transport failures** (connection refused, DNS, timeout, truncated
///   body) are logged and reported as `Ok(None)` so the caller can abort
///   gracefully.
/// - **Any status other than 200** is an error.
///
/// # Example
/// ```no_run
/// use energy_feature_pipeline::client::{DEFAULT_TIMEOUT, SourceClient};
/// use url::Url;
///
/// # async fn example() -> eyre::Result<()> {
/// let client = SourceClient::try_new(DEFAULT_TIMEOUT)?;
/// let url = Url::parse("https://api.energidataservice.dk/dataset/ConsumptionDE35Hour")?;
///
/// match client.fetch(&url, &[]).await? {
///     Some(body) => println!("Downloaded {} bytes", body.len()),
///     None => println!("Source unreachable"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct SourceClient {
    client: Client,
    timeout: Duration,
}

impl SourceClient {
    /// Create a new client whose requests give up after `timeout`
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn try_new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .with_context(|| "Failed to build HTTP client")?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with the given query parameters and return the body.
    ///
    /// # Returns
    /// - `Ok(Some(body))` on `200 OK`
    /// - `Ok(None)` if the request could not be completed
    ///
    /// # Errors
    /// Returns an error naming the status code for any non-200 response
    pub async fn fetch(&self, url: &Url, query: &[(&str, String)]) -> Result<Option<Vec<u8>>> {
        log::debug!("GET {} {:?}", url, query);

        let response = match self.client.get(url.clone()).query(query).send().await {
            Ok(response) => response,
            Err(e) => {
                log::error!("Could not download from {}: {}", url, e);
                return Ok(None);
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            eyre::bail!(
                "Response status: {}. Could not download from {}",
                status,
                url
            );
        }

        match response.bytes().await {
            Ok(body) => Ok(Some(body.to_vec())),
            Err(e) => {
                log::error!(
                    "Response status: {}. Could not read the body from {}: {}",
                    status,
                    url,
                    e
                );
                Ok(None)
            }
        }
    }
}
