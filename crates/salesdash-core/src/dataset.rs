//! The loaded sales table and where it came from.
//!
//! A [`Dataset`] is either populated (`Live` or `Degraded`) or empty and
//! `Unavailable`. The constructors enforce this, so consumers only need to
//! check [`Dataset::is_empty`] before reading records.

use std::path::PathBuf;

use crate::records::SalesRecord;
use crate::CoreError;

/// Coarse label for a dataset's origin, used in status messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetTag {
    Live,
    Degraded,
    Unavailable,
}

impl std::fmt::Display for DatasetTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetTag::Live => write!(f, "live"),
            DatasetTag::Degraded => write!(f, "degraded"),
            DatasetTag::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Why no records could be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No local copy exists at `path`.
    FallbackMissing { path: PathBuf },
    /// A local copy exists but could not be read as a sales table.
    FallbackUnreadable { path: PathBuf, reason: String },
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnavailableReason::FallbackMissing { path } => {
                write!(f, "no local fallback at {}", path.display())
            }
            UnavailableReason::FallbackUnreadable { path, reason } => {
                write!(f, "local fallback {} is unreadable: {reason}", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Fetched from the remote API.
    Live,
    /// Read from a local fallback file after the API was unreachable.
    Degraded { path: PathBuf },
    Unavailable(UnavailableReason),
}

impl DatasetSource {
    #[must_use]
    pub fn tag(&self) -> DatasetTag {
        match self {
            DatasetSource::Live => DatasetTag::Live,
            DatasetSource::Degraded { .. } => DatasetTag::Degraded,
            DatasetSource::Unavailable(_) => DatasetTag::Unavailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<SalesRecord>,
    source: DatasetSource,
}

impl Dataset {
    /// Builds a dataset from a successful API response.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyDataset`] if `records` is empty.
    pub fn live(records: Vec<SalesRecord>) -> Result<Self, CoreError> {
        Self::populated(records, DatasetSource::Live)
    }

    /// Builds a dataset read from the local fallback file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyDataset`] if `records` is empty.
    pub fn degraded(records: Vec<SalesRecord>, path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        Self::populated(records, DatasetSource::Degraded { path: path.into() })
    }

    #[must_use]
    pub fn unavailable(reason: UnavailableReason) -> Self {
        Self {
            records: Vec::new(),
            source: DatasetSource::Unavailable(reason),
        }
    }

    fn populated(records: Vec<SalesRecord>, source: DatasetSource) -> Result<Self, CoreError> {
        if records.is_empty() {
            return Err(CoreError::EmptyDataset(source.tag()));
        }
        Ok(Self { records, source })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    #[must_use]
    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    #[must_use]
    pub fn tag(&self) -> DatasetTag {
        self.source.tag()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<SalesRecord> {
        self.records
    }
}
