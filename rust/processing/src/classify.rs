// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-slot status, expiry and display key.
//!
//! Each slot is classified from its own merged fields and the evaluation
//! instant only, so results are independent of slot order.

use crate::merge::MergedSlot;
use crate::resolved::{ResolvedSlot, SlotStatus, EMPTY_STRUCTURE};
use chrono::NaiveDateTime;
use rackmap_core::EMPTY_PLACEHOLDER;
use rayon::prelude::*;

/// A product code counts as stock unless blank or the placeholder.
#[inline]
pub fn is_stocked_product(product_code: &str) -> bool {
    let code = product_code.trim();
    !code.is_empty() && code != EMPTY_PLACEHOLDER
}

/// Classify one merged slot at the instant `now`.
pub fn classify(merged: &MergedSlot, now: NaiveDateTime) -> ResolvedSlot {
    let status = if is_stocked_product(&merged.product_code) {
        SlotStatus::Occupied
    } else {
        SlotStatus::Empty
    };
    let is_expired =
        status == SlotStatus::Occupied && merged.expiry_date.is_some_and(|expiry| expiry < now);
    let display_key = match status {
        SlotStatus::Occupied => merged.slot.area_code.clone(),
        SlotStatus::Empty => EMPTY_STRUCTURE.to_string(),
    };

    ResolvedSlot {
        address: merged.slot.address.clone(),
        location: merged.slot.location,
        area_code: merged.slot.area_code.clone(),
        level_height_code: merged.slot.level_height_code.clone(),
        geometry: merged.geometry,
        product_code: merged.product_code.clone(),
        description: merged.description.clone(),
        quantity: merged.quantity,
        expiry_date: merged.expiry_date,
        status,
        is_expired,
        display_key,
    }
}

/// Classify every merged slot, preserving order.
pub fn classify_all(merged: &[MergedSlot], now: NaiveDateTime) -> Vec<ResolvedSlot> {
    merged.par_iter().map(|m| classify(m, now)).collect()
}
