// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Uploaded stock snapshot.

use crate::decode::TextEncoding;
use crate::error::Result;
use crate::schema::StockColumns;
use crate::table::{read_upload, RawTable, SourceFormat};
use chrono::{NaiveDate, NaiveDateTime};
use rustc_hash::FxHashMap;

/// Placeholder product/description for slots without stock.
pub const EMPTY_PLACEHOLDER: &str = "-";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%Y/%m/%d"];

/// Parse an expiry cell. Slashed dates are day-first.
pub fn parse_expiry(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Parse a quantity cell, accepting `1234.5` and `1.234,5`.
pub fn parse_quantity(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let plain = fast_float::parse::<f64, _>(value).ok();
    let parsed = plain.or_else(|| {
        if !value.contains(',') {
            return None;
        }
        let swapped = value.replace('.', "").replace(',', ".");
        fast_float::parse::<f64, _>(swapped.as_str()).ok()
    })?;
    parsed.is_finite().then_some(parsed)
}

/// One stock row, keyed by slot address.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StockRecord {
    pub address: String,
    pub product_code: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub expiry_date: Option<NaiveDateTime>,
}

impl StockRecord {
    pub fn new(address: impl Into<String>, product_code: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            product_code: Some(product_code.into()),
            description: None,
            quantity: None,
            expiry_date: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = Some(quantity);
        self
    }

    pub fn with_expiry(mut self, expiry: NaiveDateTime) -> Self {
        self.expiry_date = Some(expiry);
        self
    }
}

/// Data-quality findings of a stock load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StockReport {
    pub rows: usize,
    /// Rows with a blank address cell.
    pub missing_address: usize,
    /// Repeated addresses; only the first row per address is kept.
    pub duplicate_addresses: Vec<String>,
    /// Non-blank expiry cells that did not parse.
    pub invalid_expiry: usize,
    /// Non-blank quantity cells that did not parse.
    pub invalid_quantity: usize,
    pub has_expiry_column: bool,
    pub format: Option<SourceFormat>,
    pub encoding: Option<TextEncoding>,
}

/// Stock rows with at most one record per address.
#[derive(Debug, Clone, Default)]
pub struct StockTable {
    records: Vec<StockRecord>,
    index: FxHashMap<String, usize>,
    report: StockReport,
}

impl StockTable {
    /// Read an upload (`.csv`/`.txt` or a spreadsheet) and normalize it.
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> Result<Self> {
        let loaded = read_upload(file_name, bytes)?;
        let mut stock = Self::from_table(&loaded.table)?;
        stock.report.format = Some(loaded.format);
        stock.report.encoding = loaded.encoding;
        Ok(stock)
    }

    pub fn from_table(table: &RawTable) -> Result<Self> {
        let columns = StockColumns::resolve(table.headers())?;
        let mut report = StockReport {
            rows: table.len(),
            has_expiry_column: columns.expiry_date.is_some(),
            ..Default::default()
        };

        let cell = |row: usize, col: Option<usize>| col.and_then(|c| table.cell(row, c));
        let mut records = Vec::with_capacity(table.len());

        for row in 0..table.len() {
            let Some(address) = table.cell(row, columns.address) else {
                report.missing_address += 1;
                continue;
            };

            let quantity = cell(row, columns.quantity).and_then(|q| {
                let parsed = parse_quantity(q);
                if parsed.is_none() {
                    report.invalid_quantity += 1;
                }
                parsed
            });
            let expiry_date = cell(row, columns.expiry_date).and_then(|e| {
                let parsed = parse_expiry(e);
                if parsed.is_none() {
                    report.invalid_expiry += 1;
                }
                parsed
            });

            records.push(StockRecord {
                address: address.to_string(),
                product_code: cell(row, columns.product_code).map(str::to_string),
                description: cell(row, columns.description).map(str::to_string),
                quantity,
                expiry_date,
            });
        }

        let mut stock = Self::from_records(records);
        report.duplicate_addresses = std::mem::take(&mut stock.report.duplicate_addresses);
        stock.report = report;
        Ok(stock)
    }

    /// Index records by address, keeping the first row of each address.
    pub fn from_records(records: impl IntoIterator<Item = StockRecord>) -> Self {
        let mut report = StockReport::default();
        let mut index = FxHashMap::default();
        let mut kept = Vec::new();
        for record in records {
            report.rows += 1;
            if index.contains_key(&record.address) {
                report.duplicate_addresses.push(record.address);
                continue;
            }
            index.insert(record.address.clone(), kept.len());
            kept.push(record);
        }
        Self {
            records: kept,
            index,
            report,
        }
    }

    /// Record for a slot address.
    #[inline]
    pub fn get(&self, address: &str) -> Option<&StockRecord> {
        self.index.get(address).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[StockRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn report(&self) -> &StockReport {
        &self.report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_expiry() {
        assert_eq!(parse_expiry("2029-01-01"), Some(date(2029, 1, 1)));
        assert_eq!(parse_expiry("01/02/2024"), Some(date(2024, 2, 1)));
        assert_eq!(parse_expiry("15.03.2025"), Some(date(2025, 3, 15)));
        assert_eq!(
            parse_expiry("2029-01-01 13:45:00"),
            NaiveDate::from_ymd_opt(2029, 1, 1).and_then(|d| d.and_hms_opt(13, 45, 0))
        );
        assert_eq!(parse_expiry("soon"), None);
        assert_eq!(parse_expiry("  "), None);
        assert_eq!(parse_expiry("31/02/2024"), None);
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("240"), Some(240.0));
        assert_eq!(parse_quantity(" 12.5 "), Some(12.5));
        assert_eq!(parse_quantity("1.234,5"), Some(1234.5));
        assert_eq!(parse_quantity("7,25"), Some(7.25));
        assert_eq!(parse_quantity("abc"), None);
        assert_eq!(parse_quantity("inf"), None);
        assert_eq!(parse_quantity(""), None);
    }

    #[test]
    fn test_from_upload_csv() {
        let csv = "\
Posição no depósito,Produto,Descrição produto,Quantidade,Data do vencimento
025-071-040-001,100200,CAIXA LEITE,240,2029-01-01
021-001-010-001,100300,SUCO,12,2023-01-01
021-001-010-001,100400,DUPLICATE,1,2023-01-01
,100500,NO ADDRESS,1,
022-002-010-001,100600,BAD CELLS,lots,someday
";
        let stock = StockTable::from_upload("estoque.csv", csv.as_bytes()).unwrap();
        let report = stock.report();
        assert_eq!(report.rows, 5);
        assert_eq!(report.missing_address, 1);
        assert_eq!(report.duplicate_addresses, vec!["021-001-010-001"]);
        assert_eq!(report.invalid_quantity, 1);
        assert_eq!(report.invalid_expiry, 1);
        assert!(report.has_expiry_column);
        assert_eq!(report.format, Some(SourceFormat::Delimited));
        assert_eq!(report.encoding, Some(TextEncoding::Utf8));

        assert_eq!(stock.len(), 3);
        let rec = stock.get("025-071-040-001").unwrap();
        assert_eq!(rec.product_code.as_deref(), Some("100200"));
        assert_eq!(rec.quantity, Some(240.0));
        assert_eq!(rec.expiry_date, Some(date(2029, 1, 1)));

        // First row wins for duplicated addresses
        let dup = stock.get("021-001-010-001").unwrap();
        assert_eq!(dup.description.as_deref(), Some("SUCO"));

        let bad = stock.get("022-002-010-001").unwrap();
        assert_eq!(bad.quantity, None);
        assert_eq!(bad.expiry_date, None);
    }

    #[test]
    fn test_from_records() {
        let stock = StockTable::from_records([
            StockRecord::new("a", "1").with_quantity(2.0),
            StockRecord::new("a", "2"),
            StockRecord::new("b", "3").with_description("x"),
        ]);
        assert_eq!(stock.len(), 2);
        assert_eq!(stock.get("a").unwrap().quantity, Some(2.0));
        assert_eq!(stock.report().duplicate_addresses, vec!["a"]);
        assert!(stock.get("c").is_none());
    }
}
