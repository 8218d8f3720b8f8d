//! CSV reading and writing with the API's Portuguese column headers.
//!
//! The same layout serves as export format and as the local fallback copy,
//! so an export with every column can be dropped in as a fallback file.

use std::io::{Read, Write};

use crate::records::{format_date, RawSalesRecord, SalesRecord};
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Product,
    Category,
    Price,
    Freight,
    PurchaseDate,
    Seller,
    PurchaseLocation,
    Rating,
    PaymentType,
    Installments,
    Lat,
    Lon,
}

impl Column {
    /// Every column in API order.
    pub const ALL: [Column; 12] = [
        Column::Product,
        Column::Category,
        Column::Price,
        Column::Freight,
        Column::PurchaseDate,
        Column::Seller,
        Column::PurchaseLocation,
        Column::Rating,
        Column::PaymentType,
        Column::Installments,
        Column::Lat,
        Column::Lon,
    ];

    #[must_use]
    pub fn header(self) -> &'static str {
        match self {
            Column::Product => "Produto",
            Column::Category => "Categoria do Produto",
            Column::Price => "Preço",
            Column::Freight => "Frete",
            Column::PurchaseDate => "Data da Compra",
            Column::Seller => "Vendedor",
            Column::PurchaseLocation => "Local da compra",
            Column::Rating => "Avaliação da compra",
            Column::PaymentType => "Tipo de pagamento",
            Column::Installments => "Quantidade de parcelas",
            Column::Lat => "lat",
            Column::Lon => "lon",
        }
    }

    /// Looks a column up by its header, ignoring case.
    #[must_use]
    pub fn from_header(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Column::ALL
            .into_iter()
            .find(|c| c.header().to_lowercase() == wanted)
    }

    fn cell(self, record: &SalesRecord) -> String {
        match self {
            Column::Product => record.product.clone(),
            Column::Category => record.category.clone(),
            Column::Price => record.price.to_string(),
            Column::Freight => record.freight.to_string(),
            Column::PurchaseDate => record.purchase_date.map(format_date).unwrap_or_default(),
            Column::Seller => record.seller.clone(),
            Column::PurchaseLocation => record.purchase_location.clone(),
            Column::Rating => record.rating.to_string(),
            Column::PaymentType => record.payment_type.clone(),
            Column::Installments => record.installments.to_string(),
            Column::Lat => record.lat.to_string(),
            Column::Lon => record.lon.to_string(),
        }
    }
}

/// Writes `records` as CSV with a header row. An empty `columns` slice
/// writes every column.
///
/// # Errors
///
/// Returns [`CoreError::Csv`] if writing to `writer` fails.
pub fn write_csv<'a, W: Write>(
    records: impl IntoIterator<Item = &'a SalesRecord>,
    columns: &[Column],
    writer: W,
) -> Result<(), CoreError> {
    let columns = if columns.is_empty() {
        &Column::ALL[..]
    } else {
        columns
    };

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(columns.iter().map(|c| c.header()))?;
    for record in records {
        wtr.write_record(columns.iter().map(|c| c.cell(record)))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Reads a full-column CSV, parsing purchase dates leniently. Extra columns
/// (such as a spreadsheet index) are ignored.
///
/// # Errors
///
/// Returns [`CoreError::Csv`] if the input is not valid CSV or a row is
/// missing a required column or holds a non-numeric value in a numeric one.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<SalesRecord>, CoreError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for row in rdr.deserialize::<RawSalesRecord>() {
        records.push(row?.into_lenient());
    }
    Ok(records)
}
