pub mod cache;
pub mod client;
pub mod error;
pub mod fallback;
pub mod loader;
pub mod retry;

pub use cache::{CachedLoad, DatasetCache};
pub use client::{Fetched, SalesApiClient};
pub use error::{FallbackError, FetchError, LoadFailure, LoaderError};
pub use fallback::read_fallback;
pub use loader::{LoadOutcome, Notice, NoticeLevel, ResilientLoader};
pub use retry::{FetchReport, RetryPolicy};
