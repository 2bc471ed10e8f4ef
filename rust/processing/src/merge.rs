// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Left join of the stock snapshot onto the fixed layout.

use chrono::NaiveDateTime;
use rackmap_core::{Layout, Slot, StockTable, EMPTY_PLACEHOLDER};
use rackmap_geometry::SlotGeometry;
use rayon::prelude::*;

/// A layout slot with its stock fields filled in.
///
/// Slots without a stock row carry placeholders (`-`, quantity 0, no expiry)
/// rather than missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedSlot {
    pub slot: Slot,
    pub geometry: SlotGeometry,
    pub product_code: String,
    pub description: String,
    pub quantity: f64,
    pub expiry_date: Option<NaiveDateTime>,
    /// Whether a stock row exists for the address.
    pub matched: bool,
}

/// Join `stock` onto every layout slot by address.
///
/// The result has exactly one entry per layout slot, in layout order.
/// `geometry` must be index-aligned with `layout.slots()`. The stock table
/// already holds at most one row per address (first row wins).
pub fn merge_stock(
    layout: &Layout,
    geometry: &[SlotGeometry],
    stock: Option<&StockTable>,
) -> Vec<MergedSlot> {
    debug_assert_eq!(layout.len(), geometry.len());

    layout
        .slots()
        .par_iter()
        .zip(geometry.par_iter())
        .map(|(slot, geometry)| {
            let record = stock.and_then(|s| s.get(&slot.address));
            MergedSlot {
                slot: slot.clone(),
                geometry: *geometry,
                product_code: record
                    .and_then(|r| r.product_code.clone())
                    .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string()),
                description: record
                    .and_then(|r| r.description.clone())
                    .unwrap_or_else(|| EMPTY_PLACEHOLDER.to_string()),
                quantity: record.and_then(|r| r.quantity).unwrap_or(0.0),
                expiry_date: record.and_then(|r| r.expiry_date),
                matched: record.is_some(),
            }
        })
        .collect()
}
