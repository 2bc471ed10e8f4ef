// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Header + string-cell tables read from delimited text or spreadsheets.

use crate::decode::{decode_text, TextEncoding};
use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::{NaiveDate, TimeDelta};
use smallvec::SmallVec;
use std::io::Cursor;

/// Delimiters tried by [`sniff_delimiter`], in tie-break order.
const DELIMITER_CANDIDATES: [u8; 4] = [b';', b',', b'\t', b'|'];

/// Number of lines inspected when sniffing.
const SNIFF_LINES: usize = 20;

/// Input format of an upload, chosen from its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" | "txt" | "tsv" => Ok(SourceFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            _ => Err(Error::UnsupportedFormat(name.to_string())),
        }
    }
}

/// A table of trimmed string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell text, or `None` when the row is short or the cell is blank.
    #[inline]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

/// A decoded table plus how it was read.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: RawTable,
    pub format: SourceFormat,
    /// `None` for spreadsheets.
    pub encoding: Option<TextEncoding>,
}

/// Count delimiter occurrences outside double quotes.
fn count_unquoted(line: &[u8], delimiter: u8) -> usize {
    let mut in_quotes = false;
    let mut count = 0;
    for pos in memchr::memchr2_iter(delimiter, b'"', line) {
        if line[pos] == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            count += 1;
        }
    }
    count
}

/// Guess the field delimiter of a text table.
///
/// A candidate wins when it splits every sampled line into the same number of
/// fields as the header; among winners the one producing most fields is
/// picked. Falls back to the candidate most frequent in the header, then `,`.
pub fn sniff_delimiter(text: &str) -> u8 {
    let lines: SmallVec<[&[u8]; SNIFF_LINES]> = text
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .map(str::as_bytes)
        .collect();

    let Some(header) = lines.first() else {
        return b',';
    };

    let mut consistent: Option<(u8, usize)> = None;
    let mut frequent: Option<(u8, usize)> = None;

    for &candidate in &DELIMITER_CANDIDATES {
        let expected = count_unquoted(header, candidate);
        if expected == 0 {
            continue;
        }
        if frequent.map_or(true, |(_, n)| expected > n) {
            frequent = Some((candidate, expected));
        }
        let uniform = lines[1..]
            .iter()
            .all(|line| count_unquoted(line, candidate) == expected);
        if uniform && consistent.map_or(true, |(_, n)| expected > n) {
            consistent = Some((candidate, expected));
        }
    }

    consistent.or(frequent).map_or(b',', |(d, _)| d)
}

/// Read delimited text with a known delimiter.
pub fn read_delimited(text: &str, delimiter: u8) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(Error::EmptyTable);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(|c| c.trim().to_string()).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Decode and read delimited text, sniffing the delimiter.
pub fn read_text_table(bytes: &[u8]) -> Result<(RawTable, TextEncoding)> {
    let (text, encoding) = decode_text(bytes)?;
    let delimiter = sniff_delimiter(&text);
    Ok((read_delimited(&text, delimiter)?, encoding))
}

/// Convert a spreadsheet date serial (days since 1899-12-30) to text.
fn excel_serial_to_string(serial: f64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round();
    if !millis.is_finite() {
        return None;
    }
    let stamp = epoch.checked_add_signed(TimeDelta::try_milliseconds(millis as i64)?)?;
    Some(stamp.format("%Y-%m-%d %H:%M:%S").to_string())
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_to_string(dt.as_f64()).unwrap_or_default(),
        Data::DateTimeIso(s) => s.clone(),
        _ => String::new(),
    }
}

/// Read the first worksheet of a spreadsheet. Row one is the header.
pub fn read_spreadsheet(bytes: Vec<u8>) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook.worksheet_range_at(0).ok_or(Error::EmptyTable)??;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or(Error::EmptyTable)?
        .iter()
        .map(cell_to_string)
        .collect();

    let rows = rows
        .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>())
        .filter(|row| row.iter().any(|c| !c.is_empty()))
        .collect();

    Ok(RawTable::new(headers, rows))
}

/// Read an upload, choosing the reader from the file name.
pub fn read_upload(file_name: &str, bytes: &[u8]) -> Result<LoadedTable> {
    let format = SourceFormat::from_file_name(file_name)?;
    match format {
        SourceFormat::Delimited => {
            let (table, encoding) = read_text_table(bytes)?;
            Ok(LoadedTable {
                table,
                format,
                encoding: Some(encoding),
            })
        }
        SourceFormat::Spreadsheet => Ok(LoadedTable {
            table: read_spreadsheet(bytes.to_vec())?,
            format,
            encoding: None,
        }),
    }
}
