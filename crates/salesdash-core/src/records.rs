use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

use crate::CoreError;

/// Wire format of `Data da Compra`, e.g. `"23/01/2020"`.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Day-first formats accepted when reading a locally saved copy. Covers the
/// wire format plus what spreadsheet tools tend to write back.
const LENIENT_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y-%m-%d", "%Y/%m/%d"];

const LENIENT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// One sales transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub product: String,
    pub category: String,
    pub price: f64,
    pub freight: f64,
    /// Always present for live records. `None` only for fallback rows whose
    /// date cell could not be parsed.
    pub purchase_date: Option<NaiveDate>,
    pub seller: String,
    /// Brazilian state abbreviation, e.g. `"SP"`.
    pub purchase_location: String,
    pub rating: u8,
    pub payment_type: String,
    pub installments: u32,
    pub lat: f64,
    pub lon: f64,
}

/// A record as it appears on the wire or in a CSV row, before the purchase
/// date has been interpreted.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSalesRecord {
    #[serde(rename = "Produto")]
    pub product: String,
    #[serde(rename = "Categoria do Produto")]
    pub category: String,
    #[serde(rename = "Preço")]
    pub price: f64,
    #[serde(rename = "Frete")]
    pub freight: f64,
    #[serde(rename = "Data da Compra", default)]
    pub purchase_date: Option<String>,
    #[serde(rename = "Vendedor")]
    pub seller: String,
    #[serde(rename = "Local da compra")]
    pub purchase_location: String,
    #[serde(rename = "Avaliação da compra")]
    pub rating: u8,
    #[serde(rename = "Tipo de pagamento")]
    pub payment_type: String,
    #[serde(rename = "Quantidade de parcelas")]
    pub installments: u32,
    pub lat: f64,
    pub lon: f64,
}

impl RawSalesRecord {
    /// Converts with a mandatory `DD/MM/YYYY` purchase date.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidDate`] if the date is missing or malformed.
    pub fn into_strict(self) -> Result<SalesRecord, CoreError> {
        let raw_date = self.purchase_date.as_deref().unwrap_or_default();
        let date = parse_date_strict(raw_date)?;
        Ok(self.into_record(Some(date)))
    }

    /// Converts with best-effort date parsing; an unreadable date becomes `None`.
    #[must_use]
    pub fn into_lenient(self) -> SalesRecord {
        let date = self.purchase_date.as_deref().and_then(parse_date_lenient);
        self.into_record(date)
    }

    fn into_record(self, purchase_date: Option<NaiveDate>) -> SalesRecord {
        SalesRecord {
            product: self.product,
            category: self.category,
            price: self.price,
            freight: self.freight,
            purchase_date,
            seller: self.seller,
            purchase_location: self.purchase_location,
            rating: self.rating,
            payment_type: self.payment_type,
            installments: self.installments,
            lat: self.lat,
            lon: self.lon,
        }
    }
}

/// Parses a purchase date in the exact wire format.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDate`] if `value` is not `DD/MM/YYYY`.
pub fn parse_date_strict(value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| CoreError::InvalidDate {
        value: value.to_owned(),
    })
}

/// Parses a purchase date day-first, trying a handful of common layouts.
/// Returns `None` when nothing matches.
#[must_use]
pub fn parse_date_lenient(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            LENIENT_DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Formats a date in the wire format.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: Option<&str>) -> RawSalesRecord {
        RawSalesRecord {
            product: "Modelagem preditiva".to_owned(),
            category: "livros".to_owned(),
            price: 92.45,
            freight: 5.6096965236,
            purchase_date: date.map(str::to_owned),
            seller: "Thiago Silva".to_owned(),
            purchase_location: "BA".to_owned(),
            rating: 1,
            payment_type: "cartao_credito".to_owned(),
            installments: 3,
            lat: -13.29,
            lon: -41.71,
        }
    }

    #[test]
    fn strict_parses_wire_format() {
        let record = raw(Some("01/01/2020")).into_strict().unwrap();
        assert_eq!(
            record.purchase_date,
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
    }

    #[test]
    fn strict_reads_day_before_month() {
        let date = parse_date_strict("13/02/2021").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2021, 2, 13).unwrap());
    }

    #[test]
    fn strict_rejects_iso_dates() {
        let err = raw(Some("2020-01-01")).into_strict().unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { ref value } if value == "2020-01-01"));
    }

    #[test]
    fn strict_rejects_missing_date() {
        assert!(matches!(
            raw(None).into_strict(),
            Err(CoreError::InvalidDate { .. })
        ));
    }

    #[test]
    fn lenient_accepts_iso_and_datetime() {
        let expected = NaiveDate::from_ymd_opt(2022, 7, 4);
        assert_eq!(parse_date_lenient("2022-07-04"), expected);
        assert_eq!(parse_date_lenient("2022-07-04 00:00:00"), expected);
        assert_eq!(parse_date_lenient("04/07/2022"), expected);
        assert_eq!(parse_date_lenient("04-07-2022"), expected);
    }

    #[test]
    fn lenient_turns_garbage_into_none() {
        let record = raw(Some("ontem")).into_lenient();
        assert_eq!(record.purchase_date, None);
        assert_eq!(record.product, "Modelagem preditiva");
    }

    #[test]
    fn lenient_treats_blank_as_none() {
        assert_eq!(parse_date_lenient("   "), None);
    }

    #[test]
    fn raw_record_deserializes_portuguese_field_names() {
        let json = serde_json::json!({
            "Produto": "Bola de basquete",
            "Categoria do Produto": "esporte e lazer",
            "Preço": 129.9,
            "Frete": 8.5,
            "Data da Compra": "23/03/2021",
            "Vendedor": "Rafael Costa",
            "Local da compra": "SP",
            "Avaliação da compra": 5,
            "Tipo de pagamento": "boleto",
            "Quantidade de parcelas": 1,
            "lat": -22.19,
            "lon": -48.79
        });
        let record: RawSalesRecord = serde_json::from_value(json).unwrap();
        let record = record.into_strict().unwrap();
        assert_eq!(record.seller, "Rafael Costa");
        assert_eq!(record.rating, 5);
        assert_eq!(format_date(record.purchase_date.unwrap()), "23/03/2021");
    }
}
