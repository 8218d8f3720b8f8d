//! Aggregations behind the dashboard views: revenue and sale counts by
//! state, month, category and seller.

use std::collections::HashMap;

use chrono::Datelike;

use crate::records::SalesRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct LocationTotal {
    pub location: String,
    pub lat: f64,
    pub lon: f64,
    pub revenue: f64,
    pub sales: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub sales: usize,
}

/// Revenue and sale count for one grouping key (category or seller).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub key: String,
    pub revenue: f64,
    pub sales: usize,
}

/// Which figure to rank groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankBy {
    Revenue,
    Sales,
}

#[must_use]
pub fn total_revenue<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> f64 {
    records.into_iter().map(|r| r.price).sum()
}

/// Totals per purchase location, coordinates taken from the first record
/// seen for each location.
#[must_use]
pub fn by_location<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    rank: RankBy,
) -> Vec<LocationTotal> {
    let mut order: Vec<String> = Vec::new();
    let mut totals: HashMap<String, LocationTotal> = HashMap::new();
    for record in records {
        let entry = totals
            .entry(record.purchase_location.clone())
            .or_insert_with(|| {
                order.push(record.purchase_location.clone());
                LocationTotal {
                    location: record.purchase_location.clone(),
                    lat: record.lat,
                    lon: record.lon,
                    revenue: 0.0,
                    sales: 0,
                }
            });
        entry.revenue += record.price;
        entry.sales += 1;
    }

    let mut rows: Vec<LocationTotal> = order
        .into_iter()
        .filter_map(|loc| totals.remove(&loc))
        .collect();
    match rank {
        RankBy::Revenue => rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue)),
        RankBy::Sales => rows.sort_by(|a, b| b.sales.cmp(&a.sales)),
    }
    rows
}

/// Totals per calendar month in chronological order. Undated records are
/// skipped.
#[must_use]
pub fn monthly<'a>(records: impl IntoIterator<Item = &'a SalesRecord>) -> Vec<MonthlyTotal> {
    let mut totals: HashMap<(i32, u32), (f64, usize)> = HashMap::new();
    for record in records {
        let Some(date) = record.purchase_date else {
            continue;
        };
        let entry = totals.entry((date.year(), date.month())).or_default();
        entry.0 += record.price;
        entry.1 += 1;
    }

    let mut rows: Vec<MonthlyTotal> = totals
        .into_iter()
        .map(|((year, month), (revenue, sales))| MonthlyTotal {
            year,
            month,
            revenue,
            sales,
        })
        .collect();
    rows.sort_by_key(|m| (m.year, m.month));
    rows
}

fn grouped<'a, F>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    key: F,
    rank: RankBy,
) -> Vec<GroupTotal>
where
    F: Fn(&SalesRecord) -> &str,
{
    let mut totals: HashMap<String, (f64, usize)> = HashMap::new();
    for record in records {
        let entry = totals.entry(key(record).to_owned()).or_default();
        entry.0 += record.price;
        entry.1 += 1;
    }

    let mut rows: Vec<GroupTotal> = totals
        .into_iter()
        .map(|(key, (revenue, sales))| GroupTotal {
            key,
            revenue,
            sales,
        })
        .collect();
    // Ties broken by key so output is stable across runs.
    match rank {
        RankBy::Revenue => rows.sort_by(|a, b| {
            b.revenue
                .total_cmp(&a.revenue)
                .then_with(|| a.key.cmp(&b.key))
        }),
        RankBy::Sales => rows.sort_by(|a, b| b.sales.cmp(&a.sales).then_with(|| a.key.cmp(&b.key))),
    }
    rows
}

#[must_use]
pub fn by_category<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    rank: RankBy,
) -> Vec<GroupTotal> {
    grouped(records, |r| r.category.as_str(), rank)
}

/// The `limit` best sellers ranked by revenue or by number of sales.
#[must_use]
pub fn top_sellers<'a>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    rank: RankBy,
    limit: usize,
) -> Vec<GroupTotal> {
    let mut rows = grouped(records, |r| r.seller.as_str(), rank);
    rows.truncate(limit);
    rows
}
