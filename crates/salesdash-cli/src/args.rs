//! Arguments shared by every subcommand: where to load from and how to
//! filter what was loaded.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use salesdash_core::{parse_date_lenient, Column, Range, Region, SalesFilter, SalesQuery};

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Region sent to the API (brasil, centro-oeste, nordeste, norte, sudeste, sul)
    #[arg(long, default_value = "brasil")]
    pub region: Region,
    /// Restrict the API query to a single year
    #[arg(long)]
    pub year: Option<i32>,
    /// Local CSV used when the API is down (overrides `SALESDASH_FALLBACK_PATH`)
    #[arg(long)]
    pub fallback: Option<PathBuf>,
}

impl SourceArgs {
    pub fn query(&self) -> SalesQuery {
        SalesQuery::new(self.region, self.year)
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Keep only these products (repeatable)
    #[arg(long = "product")]
    pub products: Vec<String>,
    #[arg(long = "category")]
    pub categories: Vec<String>,
    #[arg(long = "seller")]
    pub sellers: Vec<String>,
    /// Purchase location, e.g. SP
    #[arg(long = "location")]
    pub locations: Vec<String>,
    #[arg(long = "payment")]
    pub payment_types: Vec<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub min_freight: Option<f64>,
    #[arg(long)]
    pub max_freight: Option<f64>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub min_rating: Option<u8>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub max_rating: Option<u8>,
    #[arg(long)]
    pub min_installments: Option<u32>,
    #[arg(long)]
    pub max_installments: Option<u32>,
    /// First purchase date to keep (DD/MM/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub from: Option<NaiveDate>,
    /// Last purchase date to keep (DD/MM/YYYY)
    #[arg(long, value_parser = parse_date_arg)]
    pub to: Option<NaiveDate>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> SalesFilter {
        fn set(values: &[String]) -> HashSet<String> {
            values.iter().cloned().collect()
        }

        SalesFilter {
            products: set(&self.products),
            categories: set(&self.categories),
            sellers: set(&self.sellers),
            locations: set(&self.locations),
            payment_types: set(&self.payment_types),
            price: Range::new(self.min_price, self.max_price),
            freight: Range::new(self.min_freight, self.max_freight),
            rating: Range::new(self.min_rating, self.max_rating),
            installments: Range::new(self.min_installments, self.max_installments),
            purchase_date: Range::new(self.from, self.to),
        }
    }
}

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date_lenient(value).ok_or_else(|| format!("'{value}' is not a date; use DD/MM/YYYY"))
}

pub(crate) fn parse_column_arg(value: &str) -> Result<Column, String> {
    Column::from_header(value).ok_or_else(|| {
        let known: Vec<&str> = Column::ALL.iter().map(|c| c.header()).collect();
        format!("unknown column '{value}'; expected one of: {}", known.join(", "))
    })
}
