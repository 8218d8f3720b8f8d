use salesdash_core::CoreError;
use thiserror::Error;

use crate::retry::FetchReport;

/// Failure of a single request to the sales API. Every variant counts as a
/// failed attempt and is retried while the attempt budget lasts.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Blank body or an empty JSON list.
    #[error("empty payload from {url}")]
    EmptyPayload { url: String },

    /// The body is not a JSON list of sales records.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record parsed but failed validation, e.g. a malformed purchase date.
    #[error("invalid record from {context}: {source}")]
    InvalidRecord {
        context: String,
        #[source]
        source: CoreError,
    },
}

/// Every attempt in the budget failed.
#[derive(Debug, Error)]
#[error("sales API failed after {} attempt(s): {last_error}", .report.attempts)]
pub struct LoadFailure {
    pub report: FetchReport,
    #[source]
    pub last_error: FetchError,
}

/// The local fallback file exists but could not be turned into records.
#[derive(Debug, Error)]
pub enum FallbackError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {path} as sales CSV: {source}")]
    Parse {
        path: String,
        #[source]
        source: CoreError,
    },

    #[error("{path} contains no records")]
    Empty { path: String },
}

/// Problems building a client, surfaced before any request is made.
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid retry policy: {0}")]
    InvalidPolicy(String),
}
