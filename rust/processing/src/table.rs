// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The resolved table handed to the renderer, with detail lookup by address.

use crate::error::Result;
use crate::filter::SlotFilter;
use crate::resolved::ResolvedSlot;
use chrono::NaiveDateTime;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// One resolved slot per layout slot, in layout order.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTable {
    evaluated_at: NaiveDateTime,
    slots: Vec<ResolvedSlot>,
    #[serde(skip)]
    index: FxHashMap<String, usize>,
}

impl ResolvedTable {
    pub fn new(slots: Vec<ResolvedSlot>, evaluated_at: NaiveDateTime) -> Self {
        let mut index = FxHashMap::default();
        index.reserve(slots.len());
        for (i, slot) in slots.iter().enumerate() {
            index.entry(slot.address.clone()).or_insert(i);
        }
        Self {
            evaluated_at,
            slots,
            index,
        }
    }

    /// Instant the expiry flags were computed against.
    pub fn evaluated_at(&self) -> NaiveDateTime {
        self.evaluated_at
    }

    pub fn slots(&self) -> &[ResolvedSlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up a slot by its full address string.
    pub fn get_slot_detail(&self, address: &str) -> Option<&ResolvedSlot> {
        self.index.get(address.trim()).map(|&i| &self.slots[i])
    }

    /// Slots passing `filter`, in table order.
    pub fn filter(&self, filter: &SlotFilter) -> Vec<&ResolvedSlot> {
        self.slots.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Serialize the table as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_slot, occupied_slot};
    use chrono::NaiveDate;

    fn table() -> ResolvedTable {
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        ResolvedTable::new(
            vec![
                occupied_slot("025-071-040-001", "PAL", "100200", None),
                empty_slot("025-071-050-001", "PAL"),
            ],
            now,
        )
    }

    #[test]
    fn test_detail_lookup() {
        let table = table();
        assert_eq!(
            table.get_slot_detail("025-071-040-001").unwrap().product_code,
            "100200"
        );
        assert_eq!(
            table.get_slot_detail(" 025-071-050-001 ").unwrap().address,
            "025-071-050-001"
        );
        assert!(table.get_slot_detail("999-999-999-999").is_none());
    }

    #[test]
    fn test_filter_preserves_order() {
        let table = table();
        let all = table.filter(&SlotFilter::default());
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].address, "025-071-040-001");
        assert_eq!(table.filter(&SlotFilter::new().hide_structure()).len(), 1);
    }

    #[test]
    fn test_json_is_flat_and_stable() {
        let table = table();
        let json = table.to_json().unwrap();
        assert_eq!(json, table.to_json().unwrap());

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["slots"][0];
        assert_eq!(first["aisle"], 25);
        assert_eq!(first["status"], "Occupied");
        assert_eq!(first["display_key"], "PAL");
        assert!(first["y_macro"].is_number());
        assert!(value.get("index").is_none());
    }
}
