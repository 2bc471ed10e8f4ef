// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display filters over a resolved table.

use crate::resolved::{ResolvedSlot, EMPTY_STRUCTURE};
use chrono::NaiveDate;
use rackmap_core::UNKNOWN_AREA;
use std::collections::BTreeSet;

/// Conjunction of the active display filters. The default shows everything.
///
/// Product, address and expiry filters let empty slots through so the rack
/// structure around the matches stays visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotFilter {
    pub show_structure: bool,
    pub area: Option<String>,
    pub product: Option<String>,
    pub address: Option<String>,
    pub expiry: Option<NaiveDate>,
    pub aisle: Option<u32>,
}

impl Default for SlotFilter {
    fn default() -> Self {
        Self {
            show_structure: true,
            area: None,
            product: None,
            address: None,
            expiry: None,
            aisle: None,
        }
    }
}

impl SlotFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = Some(product.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn with_aisle(mut self, aisle: u32) -> Self {
        self.aisle = Some(aisle);
        self
    }

    pub fn hide_structure(mut self) -> Self {
        self.show_structure = false;
        self
    }

    pub fn matches(&self, slot: &ResolvedSlot) -> bool {
        let occupied = slot.is_occupied();

        if !self.show_structure && !occupied {
            return false;
        }
        if self.aisle.is_some_and(|aisle| slot.location.aisle != aisle) {
            return false;
        }
        if self.area.as_deref().is_some_and(|area| slot.area_code != area) {
            return false;
        }
        if !occupied {
            return true;
        }
        if let Some(product) = non_blank(&self.product) {
            if !slot.product_code.contains(product) {
                return false;
            }
        }
        if let Some(address) = non_blank(&self.address) {
            if !slot.address.contains(address) {
                return false;
            }
        }
        if let Some(expiry) = self.expiry {
            if slot.expiry_date.map(|d| d.date()) != Some(expiry) {
                return false;
            }
        }
        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Selectable areas: distinct area codes, sorted, without `unknown`.
pub fn area_options(slots: &[ResolvedSlot]) -> Vec<String> {
    slots
        .iter()
        .map(|s| s.area_code.as_str())
        .filter(|a| !a.is_empty() && *a != UNKNOWN_AREA && *a != EMPTY_STRUCTURE)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Selectable expiry dates: distinct calendar dates of occupied slots, sorted.
pub fn expiry_options(slots: &[ResolvedSlot]) -> Vec<NaiveDate> {
    slots
        .iter()
        .filter(|s| s.is_occupied())
        .filter_map(|s| s.expiry_date.map(|d| d.date()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Aisles present in the table, ascending.
pub fn aisle_options(slots: &[ResolvedSlot]) -> Vec<u32> {
    slots
        .iter()
        .map(|s| s.location.aisle)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{empty_slot, occupied_slot};

    #[test]
    fn test_default_shows_everything() {
        let filter = SlotFilter::default();
        assert!(filter.matches(&occupied_slot("025-071-040-001", "PAL", "100200", None)));
        assert!(filter.matches(&empty_slot("025-071-050-001", "PAL")));
    }

    #[test]
    fn test_hide_structure() {
        let filter = SlotFilter::new().hide_structure();
        assert!(filter.matches(&occupied_slot("025-071-040-001", "PAL", "100200", None)));
        assert!(!filter.matches(&empty_slot("025-071-050-001", "PAL")));
    }

    #[test]
    fn test_product_filter_keeps_empty_slots() {
        let filter = SlotFilter::new().with_product("1002");
        assert!(filter.matches(&occupied_slot("025-071-040-001", "PAL", "100200", None)));
        assert!(!filter.matches(&occupied_slot("025-071-040-002", "PAL", "999999", None)));
        assert!(filter.matches(&empty_slot("025-071-050-001", "PAL")));
    }

    #[test]
    fn test_area_filter_applies_to_empty_slots() {
        let filter = SlotFilter::new().with_area("BLK");
        assert!(!filter.matches(&empty_slot("025-071-050-001", "PAL")));
        assert!(filter.matches(&empty_slot("021-001-010-001", "BLK")));
    }

    #[test]
    fn test_expiry_and_aisle_filters() {
        let day = NaiveDate::from_ymd_opt(2029, 1, 1).unwrap();
        let at = day.and_hms_opt(8, 30, 0);
        let slot = occupied_slot("025-071-040-001", "PAL", "100200", at);
        assert!(SlotFilter::new().with_expiry(day).matches(&slot));
        assert!(!SlotFilter::new()
            .with_expiry(day.succ_opt().unwrap())
            .matches(&slot));
        assert!(SlotFilter::new().with_aisle(25).matches(&slot));
        assert!(!SlotFilter::new().with_aisle(21).matches(&slot));
    }

    #[test]
    fn test_blank_text_filters_are_inactive() {
        let filter = SlotFilter::new().with_product("  ").with_address("");
        assert!(filter.matches(&occupied_slot("025-071-040-001", "PAL", "100200", None)));
    }

    #[test]
    fn test_option_lists() {
        let day = NaiveDate::from_ymd_opt(2029, 1, 1).unwrap();
        let slots = vec![
            occupied_slot("025-071-040-001", "PAL", "1", day.and_hms_opt(0, 0, 0)),
            occupied_slot("021-001-010-001", "BLK", "2", day.and_hms_opt(12, 0, 0)),
            empty_slot("021-001-020-001", UNKNOWN_AREA),
        ];
        assert_eq!(area_options(&slots), vec!["BLK", "PAL"]);
        assert_eq!(expiry_options(&slots), vec![day]);
        assert_eq!(aisle_options(&slots), vec![21, 25]);
    }
}
