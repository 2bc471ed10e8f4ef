// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolved slot: layout ⋈ stock ⋈ geometry, plus its classification.

use chrono::NaiveDateTime;
use rackmap_core::SlotAddress;
use rackmap_geometry::SlotGeometry;
use serde::Serialize;

/// Display key of slots without stock.
pub const EMPTY_STRUCTURE: &str = "EMPTY_STRUCTURE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SlotStatus {
    Occupied,
    Empty,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Occupied => "Occupied",
            SlotStatus::Empty => "Empty",
        }
    }
}

/// A fully annotated slot as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSlot {
    pub address: String,
    #[serde(flatten)]
    pub location: SlotAddress,
    pub area_code: String,
    pub level_height_code: Option<String>,
    #[serde(flatten)]
    pub geometry: SlotGeometry,
    pub product_code: String,
    pub description: String,
    pub quantity: f64,
    pub expiry_date: Option<NaiveDateTime>,
    pub status: SlotStatus,
    pub is_expired: bool,
    /// Colour-grouping key: the area code, or [`EMPTY_STRUCTURE`].
    pub display_key: String,
}

impl ResolvedSlot {
    #[inline]
    pub fn is_occupied(&self) -> bool {
        self.status == SlotStatus::Occupied
    }
}
