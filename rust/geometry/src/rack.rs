// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Box primitives of a pallet rack: uprights, beams, pallet bases, cargo.

use crate::batch::BoxSpec;
use crate::config::RackDimensions;

impl RackDimensions {
    /// The two uprights at either side of a slot column, from the floor to `top`.
    pub fn uprights(&self, x: f64, y: f64, top: f64) -> [BoxSpec; 2] {
        let half = self.slot_width / 2.0;
        [x - half, x + half].map(|ux| {
            BoxSpec::standing(ux, y, 0.0, self.upright_size, self.rack_depth, top)
        })
    }

    /// Beam carrying a level whose floor is at `z`.
    pub fn beam(&self, x: f64, y: f64, z: f64) -> BoxSpec {
        BoxSpec::standing(x, y, z, self.slot_width, self.rack_depth, self.beam_height)
    }

    /// Pallet base resting on the beam of a level at `z`.
    pub fn pallet_base(&self, x: f64, y: f64, z: f64) -> BoxSpec {
        let inset = 2.0 * self.cargo_inset;
        BoxSpec::standing(
            x,
            y,
            z + self.beam_height,
            self.slot_width - inset,
            self.rack_depth - inset,
            self.pallet_base_height,
        )
    }

    /// Load on top of the pallet base for a level of `level_height`.
    ///
    /// Never thinner than the pallet base, even for very low levels.
    pub fn cargo(&self, x: f64, y: f64, z: f64, level_height: f64) -> BoxSpec {
        let inset = 2.0 * self.cargo_inset;
        let floor = self.beam_height + self.pallet_base_height;
        let height = (level_height * self.cargo_fill - floor).max(self.pallet_base_height);
        BoxSpec::standing(
            x,
            y,
            z + floor,
            self.slot_width - inset,
            self.rack_depth - inset,
            height,
        )
    }

    /// Lane `index` of `count` sub-positions sharing one beam at `x`.
    ///
    /// Returns the lane centre and dimensions whose `slot_width` is the lane
    /// width. The inset is capped at a quarter lane so cargo keeps a width.
    pub fn lane(&self, x: f64, index: usize, count: usize) -> (f64, RackDimensions) {
        let count = count.max(1);
        let width = self.slot_width / count as f64;
        let center = x - self.slot_width / 2.0 + width * (index as f64 + 0.5);
        let dims = RackDimensions {
            slot_width: width,
            cargo_inset: self.cargo_inset.min(width / 4.0),
            ..*self
        };
        (center, dims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_uprights_span_stack() {
        let dims = RackDimensions::default();
        let [left, right] = dims.uprights(10.0, 3.0, 4.4);
        assert_relative_eq!(left.extents.z, 4.4);
        assert_relative_eq!(left.origin.z, 0.0);
        assert_relative_eq!(right.origin.x - left.origin.x, dims.slot_width, epsilon = 1e-9);
    }

    #[test]
    fn test_pallet_sits_on_beam() {
        let dims = RackDimensions::default();
        let beam = dims.beam(1.0, 0.0, 1.6);
        let base = dims.pallet_base(1.0, 0.0, 1.6);
        let cargo = dims.cargo(1.0, 0.0, 1.6, 1.2);
        assert_relative_eq!(base.origin.z, beam.origin.z + beam.extents.z, epsilon = 1e-9);
        assert_relative_eq!(cargo.origin.z, base.origin.z + base.extents.z, epsilon = 1e-9);
        assert_relative_eq!(cargo.extents.z, 1.2 * dims.cargo_fill - 0.22, epsilon = 1e-9);
        assert!(cargo.origin.z + cargo.extents.z < 1.6 + 1.2);
    }

    #[test]
    fn test_low_level_cargo_has_height() {
        let dims = RackDimensions::default();
        let cargo = dims.cargo(0.0, 0.0, 0.0, 0.1);
        assert_relative_eq!(cargo.extents.z, dims.pallet_base_height);
    }

    #[test]
    fn test_single_lane_is_whole_slot() {
        let dims = RackDimensions::default();
        let (center, lane) = dims.lane(4.0, 0, 1);
        assert_relative_eq!(center, 4.0, epsilon = 1e-9);
        assert_eq!(lane, dims);
    }

    #[test]
    fn test_lanes_split_slot_width() {
        let dims = RackDimensions::default();
        let (left, a) = dims.lane(4.0, 0, 2);
        let (right, b) = dims.lane(4.0, 1, 2);
        assert_relative_eq!(a.slot_width, dims.slot_width / 2.0, epsilon = 1e-9);
        assert_relative_eq!(right - left, dims.slot_width / 2.0, epsilon = 1e-9);

        let first = a.cargo(left, 0.0, 0.0, 1.6);
        let second = b.cargo(right, 0.0, 0.0, 1.6);
        assert!(first.origin.x + first.extents.x <= second.origin.x);
    }

    #[test]
    fn test_narrow_lanes_keep_cargo_width() {
        let dims = RackDimensions::default();
        let (center, lane) = dims.lane(0.0, 8, 9);
        assert!(lane.validate().is_ok());
        assert!(lane.cargo(center, 0.0, 0.0, 1.6).extents.x > 0.0);
    }
}
