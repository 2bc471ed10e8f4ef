// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # rackmap Core
//!
//! Parsing and loading for warehouse rack maps.
//!
//! ## Overview
//!
//! - **Address parsing**: `AA-CCC-LL-EXTRA` slot addresses into
//!   aisle/column/level triples, built with [nom](https://docs.rs/nom)
//! - **Text decoding**: UTF-8 with a Latin-1 fallback
//! - **Table reading**: delimiter sniffing over [csv](https://docs.rs/csv),
//!   spreadsheets through [calamine](https://docs.rs/calamine)
//! - **Schema**: header aliases resolved once per table
//! - **Layout / stock**: the fixed slot layout and the uploaded snapshot
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rackmap_core::{Layout, StockTable};
//!
//! let layout = Layout::load("layout.csv")?;
//! let stock = StockTable::from_upload("estoque.csv", &bytes)?;
//! println!("{} slots, {} stock rows", layout.len(), stock.len());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization support for slots and stock records

pub mod address;
pub mod decode;
pub mod error;
pub mod height;
pub mod layout;
pub mod schema;
pub mod stock;
pub mod table;

pub use address::{parse_address, parse_addresses, SlotAddress};
pub use decode::{decode_text, TextEncoding};
pub use error::{Error, Result};
pub use height::parse_height_code;
pub use layout::{Layout, LayoutReport, Slot, UNKNOWN_AREA};
pub use schema::{FieldSpec, LayoutColumns, StockColumns};
pub use stock::{parse_expiry, parse_quantity, StockRecord, StockReport, StockTable, EMPTY_PLACEHOLDER};
pub use table::{read_upload, sniff_delimiter, LoadedTable, RawTable, SourceFormat};
