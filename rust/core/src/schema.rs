// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Column schema for layout and stock tables.
//!
//! Exports in the wild name the same field several ways. Each field lists its
//! accepted header aliases; headers are matched once per table (trimmed,
//! case-insensitive) and the resulting column indices are used for every row.
//! Only the slot address is mandatory. Absent optional fields fall back to:
//!
//! | Field | Default |
//! |---|---|
//! | area code | [`UNKNOWN_AREA`](crate::layout::UNKNOWN_AREA) |
//! | level height code | default level height of the geometry config |
//! | product code | [`EMPTY_PLACEHOLDER`](crate::stock::EMPTY_PLACEHOLDER) |
//! | description | [`EMPTY_PLACEHOLDER`](crate::stock::EMPTY_PLACEHOLDER) |
//! | quantity | `0` |
//! | expiry date | none (never expired) |

use crate::error::{Error, Result};

/// A logical field and the header names it may appear under.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Canonical name.
    pub name: &'static str,
    pub aliases: &'static [&'static str],
}

pub const SLOT_ADDRESS: FieldSpec = FieldSpec {
    name: "slot_address",
    aliases: &["slot_address", "Posição no depósito", "endereco", "endereço"],
};

pub const AREA_CODE: FieldSpec = FieldSpec {
    name: "area_code",
    aliases: &[
        "area_code",
        "Área armazmto.",
        "deposit_position_type",
        "Tipo de posição no depósito",
    ],
};

pub const LEVEL_HEIGHT_CODE: FieldSpec = FieldSpec {
    name: "level_height_code",
    aliases: &["level_height_code", "Tipo de altura", "height_code"],
};

pub const PRODUCT_CODE: FieldSpec = FieldSpec {
    name: "product_code",
    aliases: &["product_code", "Produto"],
};

pub const DESCRIPTION: FieldSpec = FieldSpec {
    name: "description",
    aliases: &["description", "Descrição produto"],
};

pub const QUANTITY: FieldSpec = FieldSpec {
    name: "quantity",
    aliases: &["quantity", "Quantidade"],
};

pub const EXPIRY_DATE: FieldSpec = FieldSpec {
    name: "expiry_date",
    aliases: &["expiry_date", "Vencimento", "Data do vencimento"],
};

fn normalize_header(header: &str) -> String {
    header.trim_start_matches('\u{feff}').trim().to_lowercase()
}

impl FieldSpec {
    /// Index of the first header matching one of the aliases.
    ///
    /// Alias order wins over column order, so a canonical header is preferred
    /// over a legacy one when a table carries both.
    pub fn locate(&self, headers: &[String]) -> Option<usize> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        self.aliases.iter().find_map(|alias| {
            let alias = normalize_header(alias);
            normalized.iter().position(|h| *h == alias)
        })
    }

    fn require(&self, table: &'static str, headers: &[String]) -> Result<usize> {
        self.locate(headers).ok_or_else(|| Error::MissingColumn {
            table,
            field: self.name,
            expected: self.aliases.join(", "),
        })
    }
}

/// Column indices of a layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutColumns {
    pub address: usize,
    pub area_code: Option<usize>,
    pub level_height_code: Option<usize>,
}

impl LayoutColumns {
    pub fn resolve(headers: &[String]) -> Result<Self> {
        Ok(Self {
            address: SLOT_ADDRESS.require("layout", headers)?,
            area_code: AREA_CODE.locate(headers),
            level_height_code: LEVEL_HEIGHT_CODE.locate(headers),
        })
    }
}

/// Column indices of an uploaded stock table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockColumns {
    pub address: usize,
    pub product_code: Option<usize>,
    pub description: Option<usize>,
    pub quantity: Option<usize>,
    pub expiry_date: Option<usize>,
}

impl StockColumns {
    pub fn resolve(headers: &[String]) -> Result<Self> {
        Ok(Self {
            address: SLOT_ADDRESS.require("stock", headers)?,
            product_code: PRODUCT_CODE.locate(headers),
            description: DESCRIPTION.locate(headers),
            quantity: QUANTITY.locate(headers),
            expiry_date: EXPIRY_DATE.locate(headers),
        })
    }
}
