// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The fixed slot layout of the warehouse.

use crate::address::{parse_address, parse_addresses, SlotAddress};
use crate::error::{Error, Result};
use crate::schema::LayoutColumns;
use crate::table::{read_spreadsheet, read_text_table, RawTable, SourceFormat};
use rustc_hash::FxHashSet;
use std::path::Path;

/// Area code used when the layout has no area column or the cell is blank.
pub const UNKNOWN_AREA: &str = "unknown";

/// One physical pallet position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Slot {
    pub address: String,
    pub location: SlotAddress,
    pub area_code: String,
    pub level_height_code: Option<String>,
}

impl Slot {
    /// Build a slot from its address, or `None` if the address is malformed.
    pub fn new(
        address: impl Into<String>,
        area_code: impl Into<String>,
        level_height_code: Option<&str>,
    ) -> Option<Self> {
        let address = address.into().trim().to_string();
        let location = parse_address(&address)?;
        Some(Self {
            address,
            location,
            area_code: area_code.into(),
            level_height_code: level_height_code.map(str::to_string),
        })
    }
}

/// Rows dropped while building a layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Data rows in the source table.
    pub rows: usize,
    /// Addresses that did not parse into aisle/column/level.
    pub malformed_addresses: Vec<String>,
    /// Repeated addresses; the first occurrence is kept.
    pub duplicate_addresses: Vec<String>,
}

impl LayoutReport {
    pub fn skipped(&self) -> usize {
        self.malformed_addresses.len() + self.duplicate_addresses.len()
    }
}

/// Immutable set of slots, unique by address.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    slots: Vec<Slot>,
    report: LayoutReport,
}

impl Layout {
    /// Load the layout file. A missing file is reported as
    /// [`Error::LayoutNotFound`].
    ///
    /// Spreadsheet extensions go through the spreadsheet reader; anything
    /// else is read as delimited text.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::LayoutNotFound(path.to_path_buf()))
            }
            Err(e) => return Err(e.into()),
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match SourceFormat::from_file_name(&name) {
            Ok(SourceFormat::Spreadsheet) => Self::from_spreadsheet(bytes),
            _ => Self::from_bytes(&bytes),
        }
    }

    /// Build from the first sheet of a workbook.
    pub fn from_spreadsheet(bytes: Vec<u8>) -> Result<Self> {
        Self::from_table(&read_spreadsheet(bytes)?)
    }

    /// Build from delimited text (UTF-8 or Latin-1, delimiter sniffed).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (table, _) = read_text_table(bytes)?;
        Self::from_table(&table)
    }

    /// Build from a decoded table.
    ///
    /// Malformed addresses are dropped here, before any geometry grouping
    /// sees them.
    pub fn from_table(table: &RawTable) -> Result<Self> {
        let columns = LayoutColumns::resolve(table.headers())?;

        let addresses: Vec<&str> = (0..table.len())
            .map(|row| table.cell(row, columns.address).unwrap_or(""))
            .collect();
        let parsed = parse_addresses(addresses.iter().copied());

        let mut report = LayoutReport {
            rows: table.len(),
            ..Default::default()
        };
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        let mut slots = Vec::with_capacity(table.len());

        for (row, (&address, location)) in addresses.iter().zip(parsed).enumerate() {
            let Some(location) = location else {
                report.malformed_addresses.push(address.to_string());
                continue;
            };
            if !seen.insert(address) {
                report.duplicate_addresses.push(address.to_string());
                continue;
            }
            let area_code = columns
                .area_code
                .and_then(|c| table.cell(row, c))
                .unwrap_or(UNKNOWN_AREA);
            let level_height_code = columns
                .level_height_code
                .and_then(|c| table.cell(row, c));

            slots.push(Slot {
                address: address.to_string(),
                location,
                area_code: area_code.to_string(),
                level_height_code: level_height_code.map(str::to_string),
            });
        }

        Ok(Self { slots, report })
    }

    /// Build from already-parsed slots; later duplicates are dropped.
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut report = LayoutReport::default();
        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut kept = Vec::new();
        for slot in slots {
            report.rows += 1;
            if seen.insert(slot.address.clone()) {
                kept.push(slot);
            } else {
                report.duplicate_addresses.push(slot.address);
            }
        }
        Self {
            slots: kept,
            report,
        }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn report(&self) -> &LayoutReport {
        &self.report
    }
}
