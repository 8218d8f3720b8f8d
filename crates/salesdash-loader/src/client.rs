//! HTTP client for the sales API.
//!
//! Wraps `reqwest` with the retry policy, optional region/year filters and
//! validation of the JSON payload. A response only counts as a success when
//! it holds at least one record and every purchase date is `DD/MM/YYYY`.

use std::time::Duration;

use reqwest::{Client, Url};
use salesdash_core::{AppConfig, Dataset, RawSalesRecord, SalesQuery};

use crate::error::{FetchError, LoadFailure, LoaderError};
use crate::retry::{retry_with_backoff, FetchReport, RetryPolicy};

pub use salesdash_core::config::DEFAULT_API_URL;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = "salesdash/0.1 (sales-analytics)";

/// A live dataset together with the attempts it took to get it.
#[derive(Debug)]
pub struct Fetched {
    pub dataset: Dataset,
    pub report: FetchReport,
}

/// Client for the sales API.
///
/// Use [`SalesApiClient::new`] for the production endpoint or
/// [`SalesApiClient::with_base_url`] to point at a mock server in tests.
pub struct SalesApiClient {
    client: Client,
    base_url: Url,
    policy: RetryPolicy,
}

impl SalesApiClient {
    /// Creates a client for the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(policy: RetryPolicy) -> Result<Self, LoaderError> {
        Self::with_base_url(DEFAULT_API_URL, policy, DEFAULT_USER_AGENT)
    }

    /// Creates a client for an arbitrary endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidUrl`] if `base_url` does not parse, or
    /// [`LoaderError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        base_url: &str,
        policy: RetryPolicy,
        user_agent: &str,
    ) -> Result<Self, LoaderError> {
        let base_url = Url::parse(base_url).map_err(|e| LoaderError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(policy.request_timeout())
            .connect_timeout(CONNECT_TIMEOUT.min(policy.request_timeout()))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url,
            policy,
        })
    }

    /// Builds a client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::InvalidPolicy`] if the retry settings are out of
    /// range, plus anything [`Self::with_base_url`] can return.
    pub fn from_config(config: &AppConfig) -> Result<Self, LoaderError> {
        let policy = RetryPolicy::new(
            config.max_attempts,
            config.request_timeout(),
            config.backoff_base,
        )?
        .with_backoff_unit(config.backoff_unit());
        Self::with_base_url(&config.api_url, policy, &config.user_agent)
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches the sales list, retrying failed attempts with exponential
    /// back-off.
    ///
    /// # Errors
    ///
    /// Returns [`LoadFailure`] with the last [`FetchError`] once
    /// `max_attempts` attempts have failed.
    pub async fn fetch_with_retry(&self, query: &SalesQuery) -> Result<Fetched, LoadFailure> {
        let url = self.build_url(query);
        let (dataset, report) = retry_with_backoff(&self.policy, |attempt| {
            let url = url.clone();
            async move {
                tracing::debug!(attempt, url = %url, "requesting sales data");
                self.fetch_once(&url).await
            }
        })
        .await?;

        Ok(Fetched { dataset, report })
    }

    /// Performs a single request without retrying.
    ///
    /// # Errors
    ///
    /// - [`FetchError::Http`] on network failure or timeout.
    /// - [`FetchError::UnexpectedStatus`] for any non-2xx status.
    /// - [`FetchError::EmptyPayload`] for a blank body or empty list.
    /// - [`FetchError::Deserialize`] if the body is not a list of records.
    /// - [`FetchError::InvalidRecord`] if a purchase date is malformed.
    pub async fn fetch_once(&self, url: &Url) -> Result<Dataset, FetchError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        parse_payload(&body, url.as_str())
    }

    /// Appends the query's filters to the endpoint URL. With no filters the
    /// URL is returned untouched (no trailing `?`).
    fn build_url(&self, query: &SalesQuery) -> Url {
        let mut url = self.base_url.clone();
        let pairs = query.query_pairs();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (k, v) in &pairs {
                serializer.append_pair(k, v);
            }
        }
        url
    }
}

/// Validates and converts a response body into a live dataset.
fn parse_payload(body: &str, url: &str) -> Result<Dataset, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::EmptyPayload {
            url: url.to_owned(),
        });
    }

    let raw: Vec<RawSalesRecord> =
        serde_json::from_str(body).map_err(|e| FetchError::Deserialize {
            context: url.to_owned(),
            source: e,
        })?;

    let records = raw
        .into_iter()
        .map(RawSalesRecord::into_strict)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| FetchError::InvalidRecord {
            context: url.to_owned(),
            source: e,
        })?;

    Dataset::live(records).map_err(|_| FetchError::EmptyPayload {
        url: url.to_owned(),
    })
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
