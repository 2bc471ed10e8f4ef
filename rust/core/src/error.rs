// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for table loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for loading operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading layout or stock tables.
#[derive(Error, Debug)]
pub enum Error {
    /// The fixed layout file does not exist.
    #[error("layout file not found: {}", .0.display())]
    LayoutNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("delimited text error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Content is neither valid UTF-8 nor Latin-1 text.
    #[error("could not decode {bytes} bytes as UTF-8 or Latin-1 text")]
    Decode { bytes: usize },

    /// A mandatory column is absent from the header row.
    #[error("{table} table has no {field} column (expected one of: {expected})")]
    MissingColumn {
        table: &'static str,
        field: &'static str,
        expected: String,
    },

    /// File extension does not map to a supported input format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// No header row could be read.
    #[error("table is empty")]
    EmptyTable,
}
