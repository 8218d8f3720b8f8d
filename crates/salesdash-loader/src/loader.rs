//! The single place where loading failures are absorbed.
//!
//! [`ResilientLoader::load_with_fallback`] never fails: it returns a
//! [`Dataset`] tagged live, degraded or unavailable, along with notices the
//! caller is expected to show.
//!
//! ```text
//! Idle -> Attempting(i) -> Success
//!                       -> Attempting(i + 1)
//!                       -> ExhaustedRetries -> FallbackCheck -> FallbackLoaded
//!                                                            -> Unavailable
//! ```

use std::path::Path;

use salesdash_core::{Dataset, SalesQuery, UnavailableReason};

use crate::client::{Fetched, SalesApiClient};
use crate::error::LoadFailure;
use crate::fallback::read_fallback;
use crate::retry::FetchReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Error => write!(f, "error"),
        }
    }
}

/// A status message for the user, e.g. "using fallback data".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub notices: Vec<Notice>,
    /// Attempts made against the API during this load.
    pub report: FetchReport,
}

pub struct ResilientLoader {
    client: SalesApiClient,
}

impl ResilientLoader {
    #[must_use]
    pub fn new(client: SalesApiClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &SalesApiClient {
        &self.client
    }

    /// Fetches from the API only; see [`SalesApiClient::fetch_with_retry`].
    ///
    /// # Errors
    ///
    /// Returns [`LoadFailure`] once every attempt has failed.
    pub async fn fetch_with_retry(&self, query: &SalesQuery) -> Result<Fetched, LoadFailure> {
        self.client.fetch_with_retry(query).await
    }

    /// Loads from the API, falling back to the CSV at `fallback_path` when
    /// every attempt fails.
    pub async fn load_with_fallback(&self, query: &SalesQuery, fallback_path: &Path) -> LoadOutcome {
        let failure = match self.client.fetch_with_retry(query).await {
            Ok(Fetched { dataset, report }) => {
                tracing::info!(
                    records = dataset.len(),
                    attempts = report.attempts,
                    "loaded live sales data"
                );
                let notices = vec![Notice::info(format!(
                    "using live data: {} records",
                    dataset.len()
                ))];
                return LoadOutcome {
                    dataset,
                    notices,
                    report,
                };
            }
            Err(failure) => failure,
        };

        let mut notices = vec![Notice::warning(format!(
            "failed to load data from the API: {failure}"
        ))];
        let LoadFailure { report, .. } = failure;

        let dataset = Self::load_fallback(fallback_path, &mut notices).await;
        if dataset.is_empty() {
            notices.push(Notice::warning("no data available; try loading again"));
        }

        LoadOutcome {
            dataset,
            notices,
            report,
        }
    }

    async fn load_fallback(path: &Path, notices: &mut Vec<Notice>) -> Dataset {
        let unreadable = |reason: String| {
            Dataset::unavailable(UnavailableReason::FallbackUnreadable {
                path: path.to_path_buf(),
                reason,
            })
        };

        match read_fallback(path).await {
            Ok(Some(records)) => {
                notices.push(Notice::info(format!(
                    "loading local fallback: {}",
                    path.display()
                )));
                match Dataset::degraded(records, path) {
                    Ok(dataset) => {
                        tracing::warn!(
                            path = %path.display(),
                            records = dataset.len(),
                            "API unavailable; using local fallback"
                        );
                        notices.push(Notice::warning(format!(
                            "using fallback data ({} records), not live",
                            dataset.len()
                        )));
                        dataset
                    }
                    Err(e) => unreadable(e.to_string()),
                }
            }
            Ok(None) => {
                tracing::warn!(path = %path.display(), "API unavailable and no local fallback");
                notices.push(Notice::info(format!(
                    "no local fallback found; save a CSV at {} to use it when the API is down",
                    path.display()
                )));
                Dataset::unavailable(UnavailableReason::FallbackMissing {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "local fallback unreadable");
                notices.push(Notice::error(format!("failed to load local fallback: {e}")));
                unreadable(e.to_string())
            }
        }
    }
}
