// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Colour assignment for display keys and mesh categories.

use crate::resolved::EMPTY_STRUCTURE;
use rackmap_geometry::MeshCategory;
use serde::Serialize;
use std::collections::BTreeMap;

/// Linear RGBA, components in `0.0..=1.0`.
pub type Rgba = [f32; 4];

fn hex(rgb: u32) -> Rgba {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        1.0,
    ]
}

/// Area colours as `0xRRGGBB`, cycled over the sorted area list.
pub const AREA_COLORS: [u32; 9] = [
    0x1f77b4, 0x2ca02c, 0xff7f0e, 0x9467bd, 0x8c564b, 0x17becf, 0xe377c2, 0x7f7f7f, 0xbcbd22,
];

/// Translucent grey used for rack structure without stock.
pub const EMPTY_COLOR: Rgba = [150.0 / 255.0, 150.0 / 255.0, 150.0 / 255.0, 0.5];

/// Colour per display key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AreaPalette {
    colors: BTreeMap<String, Rgba>,
}

impl AreaPalette {
    /// Assign colours to `areas` in sorted order; the empty key is always grey.
    pub fn new<I, S>(areas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = areas.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();

        let mut colors = BTreeMap::new();
        colors.insert(EMPTY_STRUCTURE.to_string(), EMPTY_COLOR);
        for (i, area) in sorted
            .into_iter()
            .filter(|a| a != EMPTY_STRUCTURE)
            .enumerate()
        {
            colors.insert(area, hex(AREA_COLORS[i % AREA_COLORS.len()]));
        }
        Self { colors }
    }

    /// Colour for `key`; keys outside the palette fall back to the first colour.
    pub fn color(&self, key: &str) -> Rgba {
        self.colors
            .get(key)
            .copied()
            .unwrap_or_else(|| hex(AREA_COLORS[0]))
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, Rgba)> {
        self.colors.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Fixed material colour of a mesh category.
pub fn category_color(category: MeshCategory) -> Rgba {
    match category {
        MeshCategory::Structure => hex(0x3c5a8c),
        MeshCategory::Beam => hex(0xe07b24),
        MeshCategory::PalletBase => hex(0xb08a57),
        MeshCategory::Cargo => hex(0x2ca02c),
        MeshCategory::ExpiredCargo => hex(0xd62728),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_assignment() {
        let palette = AreaPalette::new(["PAL", "BLK", "PAL"]);
        assert_eq!(palette.color("BLK"), hex(0x1f77b4));
        assert_eq!(palette.color("PAL"), hex(0x2ca02c));
        assert_eq!(palette.color(EMPTY_STRUCTURE), EMPTY_COLOR);
    }

    #[test]
    fn test_palette_cycles() {
        let areas: Vec<String> = (0..10).map(|i| format!("A{i:02}")).collect();
        let palette = AreaPalette::new(areas);
        assert_eq!(palette.color("A09"), palette.color("A00"));
        assert_eq!(palette.entries().count(), 11);
    }

    #[test]
    fn test_hex_conversion() {
        assert_eq!(hex(0xff0000), [1.0, 0.0, 0.0, 1.0]);
    }
}
