// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Occupancy indicators.

use crate::resolved::ResolvedSlot;
use rackmap_core::UNKNOWN_AREA;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Warehouse-wide counts over slots with a known area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OccupancySummary {
    pub total: usize,
    pub occupied: usize,
    pub empty: usize,
    pub expired: usize,
}

impl OccupancySummary {
    pub fn from_slots<'a>(slots: impl IntoIterator<Item = &'a ResolvedSlot>) -> Self {
        slots
            .into_iter()
            .filter(|s| s.area_code != UNKNOWN_AREA)
            .fold(Self::default(), |mut acc, slot| {
                acc.total += 1;
                if slot.is_occupied() {
                    acc.occupied += 1;
                } else {
                    acc.empty += 1;
                }
                if slot.is_expired {
                    acc.expired += 1;
                }
                acc
            })
    }

    /// Occupied share in percent; 0 for an empty warehouse.
    pub fn occupancy_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.occupied as f64 / self.total as f64 * 100.0
        }
    }
}

/// Sum of quantities over the occupied slots given.
pub fn stocked_quantity<'a>(slots: impl IntoIterator<Item = &'a ResolvedSlot>) -> f64 {
    slots
        .into_iter()
        .filter(|s| s.is_occupied())
        .map(|s| s.quantity)
        .sum()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductTotal {
    pub product_code: String,
    pub description: String,
    pub quantity: f64,
}

/// The `n` products with the largest summed quantity, largest first.
///
/// Grouped by (product, description) over occupied slots with a known area.
/// Ties order by product code.
pub fn top_products(slots: &[ResolvedSlot], n: usize) -> Vec<ProductTotal> {
    let mut totals: FxHashMap<(&str, &str), f64> = FxHashMap::default();
    for slot in slots
        .iter()
        .filter(|s| s.is_occupied() && s.area_code != UNKNOWN_AREA)
    {
        *totals
            .entry((slot.product_code.as_str(), slot.description.as_str()))
            .or_insert(0.0) += slot.quantity;
    }

    let mut ranked: Vec<ProductTotal> = totals
        .into_iter()
        .map(|((product_code, description), quantity)| ProductTotal {
            product_code: product_code.to_string(),
            description: description.to_string(),
            quantity,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.quantity
            .total_cmp(&a.quantity)
            .then_with(|| a.product_code.cmp(&b.product_code))
            .then_with(|| a.description.cmp(&b.description))
    });
    ranked.truncate(n);
    ranked
}
