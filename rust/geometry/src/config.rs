// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tunable layout and rack dimensions.
//!
//! The aisle spacing and side offsets are visual parameters: they only need to
//! keep facing rack rows apart and adjacent aisles from overlapping.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Placement parameters for slot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Distance between aisle centrelines along Y.
    pub aisle_spacing: f64,
    /// Lateral shift of each rack row from its aisle centreline.
    pub side_offset: f64,
    /// Fixed ± offset used when a single aisle is drawn on its own.
    pub micro_offset: f64,
    /// Level height (m) used when a height code holds no digits.
    pub default_level_height: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            aisle_spacing: 3.0,
            side_offset: 0.8,
            micro_offset: 1.0,
            default_level_height: 1.6,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let all_finite = [
            self.aisle_spacing,
            self.side_offset,
            self.micro_offset,
            self.default_level_height,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !all_finite {
            return Err(Error::InvalidConfig("values must be finite".into()));
        }
        if self.aisle_spacing <= 0.0 {
            return Err(Error::InvalidConfig("aisle_spacing must be positive".into()));
        }
        if self.side_offset < 0.0 || self.micro_offset < 0.0 {
            return Err(Error::InvalidConfig("offsets must not be negative".into()));
        }
        // Rows of neighbouring aisles would otherwise cross
        if 2.0 * self.side_offset >= self.aisle_spacing {
            return Err(Error::InvalidConfig(format!(
                "side_offset {} overlaps neighbouring aisles at spacing {}",
                self.side_offset, self.aisle_spacing
            )));
        }
        if self.default_level_height <= 0.0 {
            return Err(Error::InvalidConfig(
                "default_level_height must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Physical box sizes used to draw racks and pallets, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RackDimensions {
    /// Width of one slot along X (columns are one unit apart).
    pub slot_width: f64,
    /// Depth of a rack row along Y.
    pub rack_depth: f64,
    /// Square section of an upright.
    pub upright_size: f64,
    pub beam_height: f64,
    pub pallet_base_height: f64,
    /// Share of the level height filled by a loaded pallet.
    pub cargo_fill: f64,
    /// Gap between cargo and the slot edges.
    pub cargo_inset: f64,
}

impl Default for RackDimensions {
    fn default() -> Self {
        Self {
            slot_width: 0.9,
            rack_depth: 0.6,
            upright_size: 0.06,
            beam_height: 0.08,
            pallet_base_height: 0.14,
            cargo_fill: 0.8,
            cargo_inset: 0.05,
        }
    }
}

impl RackDimensions {
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            self.slot_width,
            self.rack_depth,
            self.upright_size,
            self.beam_height,
            self.pallet_base_height,
        ];
        if sizes.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(Error::InvalidConfig("rack sizes must be positive".into()));
        }
        if !(self.cargo_fill > 0.0 && self.cargo_fill <= 1.0) {
            return Err(Error::InvalidConfig("cargo_fill must be in (0, 1]".into()));
        }
        if !(self.cargo_inset >= 0.0 && 2.0 * self.cargo_inset < self.slot_width.min(self.rack_depth)) {
            return Err(Error::InvalidConfig("cargo_inset leaves no room for cargo".into()));
        }
        Ok(())
    }
}
