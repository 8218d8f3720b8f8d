pub mod app_config;
pub mod config;
pub mod csv_codec;
pub mod dataset;
pub mod filter;
pub mod format;
pub mod metrics;
pub mod query;
pub mod records;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use csv_codec::{read_csv, write_csv, Column};
pub use dataset::{Dataset, DatasetSource, DatasetTag, UnavailableReason};
pub use filter::{Range, SalesFilter};
pub use format::format_number;
pub use query::{Region, SalesQuery};
pub use records::{parse_date_lenient, parse_date_strict, RawSalesRecord, SalesRecord};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("a {0} dataset must contain at least one record")]
    EmptyDataset(DatasetTag),

    #[error("invalid purchase date {value:?}: expected DD/MM/YYYY")]
    InvalidDate { value: String },

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
