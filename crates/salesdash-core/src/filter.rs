//! In-memory filtering of loaded sales records.
//!
//! Every criterion is optional. Multi-select sets restrict only when
//! non-empty, and ranges are inclusive with open ends when a bound is unset.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::records::SalesRecord;

/// Inclusive range with optional bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Range<T> {
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T: PartialOrd + Copy> Range<T> {
    #[must_use]
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    #[must_use]
    pub fn contains(&self, value: T) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SalesFilter {
    pub products: HashSet<String>,
    pub categories: HashSet<String>,
    pub sellers: HashSet<String>,
    pub locations: HashSet<String>,
    pub payment_types: HashSet<String>,
    pub price: Range<f64>,
    pub freight: Range<f64>,
    pub rating: Range<u8>,
    pub installments: Range<u32>,
    pub purchase_date: Range<NaiveDate>,
}

fn allowed(set: &HashSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

impl SalesFilter {
    #[must_use]
    pub fn matches(&self, record: &SalesRecord) -> bool {
        let date_ok = if self.purchase_date.is_unbounded() {
            true
        } else {
            record
                .purchase_date
                .is_some_and(|date| self.purchase_date.contains(date))
        };

        allowed(&self.products, &record.product)
            && allowed(&self.categories, &record.category)
            && allowed(&self.sellers, &record.seller)
            && allowed(&self.locations, &record.purchase_location)
            && allowed(&self.payment_types, &record.payment_type)
            && self.price.contains(record.price)
            && self.freight.contains(record.freight)
            && self.rating.contains(record.rating)
            && self.installments.contains(record.installments)
            && date_ok
    }

    /// Returns the matching records in their original order.
    #[must_use]
    pub fn apply<'a>(&self, records: &'a [SalesRecord]) -> Vec<&'a SalesRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(seller: &str, price: f64, day: Option<u32>) -> SalesRecord {
        SalesRecord {
            product: "Iphone 6".to_owned(),
            category: "eletronicos".to_owned(),
            price,
            freight: 40.0,
            purchase_date: day.and_then(|d| NaiveDate::from_ymd_opt(2021, 5, d)),
            seller: seller.to_owned(),
            purchase_location: "RJ".to_owned(),
            rating: 5,
            payment_type: "cartao_credito".to_owned(),
            installments: 10,
            lat: -22.25,
            lon: -42.66,
        }
    }

    #[test]
    fn default_filter_keeps_everything() {
        let records = vec![record("Ana", 10.0, None), record("Bia", 20.0, Some(3))];
        assert_eq!(SalesFilter::default().apply(&records).len(), 2);
    }

    #[test]
    fn seller_set_restricts() {
        let records = vec![record("Ana", 10.0, None), record("Bia", 20.0, None)];
        let filter = SalesFilter {
            sellers: HashSet::from(["Bia".to_owned()]),
            ..SalesFilter::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].seller, "Bia");
    }

    #[test]
    fn price_range_is_inclusive() {
        let records = vec![
            record("Ana", 10.0, None),
            record("Ana", 20.0, None),
            record("Ana", 30.0, None),
        ];
        let filter = SalesFilter {
            price: Range::new(Some(10.0), Some(20.0)),
            ..SalesFilter::default()
        };
        assert_eq!(filter.apply(&records).len(), 2);
    }

    #[test]
    fn date_range_drops_undated_rows_only_when_bounded() {
        let records = vec![record("Ana", 10.0, None), record("Ana", 10.0, Some(10))];
        let filter = SalesFilter {
            purchase_date: Range::new(NaiveDate::from_ymd_opt(2021, 5, 1), None),
            ..SalesFilter::default()
        };
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 1);
        assert!(kept[0].purchase_date.is_some());
    }

    #[test]
    fn rating_and_installments_ranges_apply() {
        let records = vec![record("Ana", 10.0, None)];
        let filter = SalesFilter {
            rating: Range::new(Some(1), Some(4)),
            ..SalesFilter::default()
        };
        assert!(filter.apply(&records).is_empty());

        let filter = SalesFilter {
            installments: Range::new(Some(10), None),
            ..SalesFilter::default()
        };
        assert_eq!(filter.apply(&records).len(), 1);
    }
}
