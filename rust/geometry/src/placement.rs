// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slot placement: address triple → plot coordinates.
//!
//! X follows the column number. Y groups aisles at a fixed spacing and pushes
//! even and odd columns to opposite sides so the two rack faces of an aisle
//! are separated by a walkway. Z is the cumulative height of the levels below
//! a slot within its (aisle, column) stack, so mixed-height racks stack at
//! their real clearances.

use crate::config::LayoutConfig;
use rackmap_core::{parse_height_code, Slot, SlotAddress};
use rayon::prelude::*;

/// Plot coordinates of one slot.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotGeometry {
    pub x: f64,
    /// Warehouse-wide Y (aisle spacing + side offset).
    pub y_macro: f64,
    /// Y used when one aisle is drawn in isolation.
    pub y_micro: f64,
    /// Height of the slot's floor above ground.
    pub z_base: f64,
    /// Clearance of the slot itself, in metres.
    pub level_height: f64,
}

/// Level height in metres from a height code (centimetres).
///
/// Codes without digits, or with a zero reading, fall back to `default`.
#[inline]
pub fn level_height(code: Option<&str>, default: f64) -> f64 {
    code.and_then(parse_height_code)
        .filter(|&cm| cm > 0)
        .map_or(default, |cm| f64::from(cm) / 100.0)
}

/// `(x, y_macro, y_micro)` for an address.
#[inline]
pub fn lateral_position(location: &SlotAddress, config: &LayoutConfig) -> (f64, f64, f64) {
    let side = if location.is_even_column() { 1.0 } else { -1.0 };
    let x = f64::from(location.column);
    let y_macro = f64::from(location.aisle) * config.aisle_spacing + side * config.side_offset;
    let y_micro = side * config.micro_offset;
    (x, y_macro, y_micro)
}

/// Cumulative stacking heights.
///
/// `z_base(level)` is the sum of the heights of every lower level present in
/// the same (aisle, column) stack, in ascending level order. Missing level
/// numbers leave no gap. Slots sharing a level (different sub-positions) share
/// one z_base; the level's height is the tallest clearance among them.
pub fn stack_bases(locations: &[SlotAddress], heights: &[f64]) -> Vec<f64> {
    debug_assert_eq!(locations.len(), heights.len());

    let mut order: Vec<usize> = (0..locations.len()).collect();
    order.par_sort_unstable_by_key(|&i| locations[i]);

    let mut bases = vec![0.0; locations.len()];
    for stack in order.chunk_by(|&a, &b| locations[a].stack_key() == locations[b].stack_key()) {
        let mut running = 0.0;
        for level in stack.chunk_by(|&a, &b| locations[a].level == locations[b].level) {
            let level_height = level.iter().map(|&i| heights[i]).fold(0.0, f64::max);
            for &i in level {
                bases[i] = running;
            }
            running += level_height;
        }
    }
    bases
}

/// Geometry for every slot, index-aligned with `slots`.
pub fn compute_geometry(slots: &[Slot], config: &LayoutConfig) -> Vec<SlotGeometry> {
    let heights: Vec<f64> = slots
        .par_iter()
        .map(|s| level_height(s.level_height_code.as_deref(), config.default_level_height))
        .collect();
    let locations: Vec<SlotAddress> = slots.iter().map(|s| s.location).collect();
    let bases = stack_bases(&locations, &heights);

    locations
        .par_iter()
        .zip(heights.par_iter().zip(bases.par_iter()))
        .map(|(location, (&level_height, &z_base))| {
            let (x, y_macro, y_micro) = lateral_position(location, config);
            SlotGeometry {
                x,
                y_macro,
                y_micro,
                z_base,
                level_height,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn slot(address: &str, code: Option<&str>) -> Slot {
        Slot::new(address, "PAL", code).unwrap()
    }

    #[test]
    fn test_level_height() {
        assert_relative_eq!(level_height(Some("P160"), 1.6), 1.6);
        assert_relative_eq!(level_height(Some("120"), 1.6), 1.2);
        assert_relative_eq!(level_height(Some("ALTO"), 1.6), 1.6);
        assert_relative_eq!(level_height(Some("P0"), 1.6), 1.6);
        assert_relative_eq!(level_height(None, 2.0), 2.0);
    }

    #[test]
    fn test_lateral_even_odd() {
        let config = LayoutConfig::default();
        let (x, y_macro, y_micro) = lateral_position(&SlotAddress::new(25, 71, 40), &config);
        assert_relative_eq!(x, 71.0);
        assert_relative_eq!(y_macro, 75.0 - 0.8);
        assert_relative_eq!(y_micro, -1.0);

        let (_, y_macro, y_micro) = lateral_position(&SlotAddress::new(25, 70, 40), &config);
        assert_relative_eq!(y_macro, 75.0 + 0.8);
        assert_relative_eq!(y_micro, 1.0);
    }

    #[test]
    fn test_mixed_heights_stack() {
        let slots = vec![
            slot("025-071-020-001", Some("P120")),
            slot("025-071-010-001", Some("P160")),
        ];
        let geometry = compute_geometry(&slots, &LayoutConfig::default());
        assert_relative_eq!(geometry[1].z_base, 0.0);
        assert_relative_eq!(geometry[0].z_base, 1.6);
        assert_relative_eq!(geometry[0].level_height, 1.2);
    }

    #[test]
    fn test_non_contiguous_levels_leave_no_gap() {
        let slots = vec![
            slot("001-002-010-001", Some("P100")),
            slot("001-002-050-001", Some("P150")),
            slot("001-002-090-001", Some("P100")),
            // Different column: its own stack
            slot("001-003-050-001", Some("P100")),
        ];
        let geometry = compute_geometry(&slots, &LayoutConfig::default());
        assert_relative_eq!(geometry[0].z_base, 0.0);
        assert_relative_eq!(geometry[1].z_base, 1.0);
        assert_relative_eq!(geometry[2].z_base, 2.5);
        assert_relative_eq!(geometry[3].z_base, 0.0);
    }

    #[test]
    fn test_shared_level_uses_tallest() {
        let slots = vec![
            slot("001-002-010-001", Some("P100")),
            slot("001-002-010-002", Some("P140")),
            slot("001-002-020-001", Some("P100")),
        ];
        let geometry = compute_geometry(&slots, &LayoutConfig::default());
        assert_relative_eq!(geometry[0].z_base, 0.0);
        assert_relative_eq!(geometry[1].z_base, 0.0);
        assert_relative_eq!(geometry[2].z_base, 1.4);
    }

    #[test]
    fn test_bases_monotonic_in_level() {
        let codes = ["P120", "P160", "X", "P090", "P200"];
        let slots: Vec<Slot> = (0..40)
            .map(|i| {
                let address = format!("{:03}-{:03}-{:03}-001", i % 3, i % 4, (i * 7) % 11);
                slot(&address, Some(codes[i % codes.len()]))
            })
            .collect();
        let geometry = compute_geometry(&slots, &LayoutConfig::default());

        let mut by_stack: Vec<(SlotAddress, f64)> = slots
            .iter()
            .zip(&geometry)
            .map(|(s, g)| (s.location, g.z_base))
            .collect();
        by_stack.sort_by(|a, b| a.0.cmp(&b.0));
        for pair in by_stack.windows(2) {
            if pair[0].0.stack_key() == pair[1].0.stack_key() {
                assert!(pair[1].1 >= pair[0].1);
            } else {
                // First level of a new stack starts on the floor
                assert_relative_eq!(pair[1].1, 0.0);
            }
        }
        assert_relative_eq!(by_stack[0].1, 0.0);
    }
}
