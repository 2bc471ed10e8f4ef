// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resolved-slot builders shared by unit tests.

use crate::resolved::{ResolvedSlot, SlotStatus, EMPTY_STRUCTURE};
use chrono::NaiveDateTime;
use rackmap_core::parse_address;
use rackmap_geometry::{lateral_position, LayoutConfig, SlotGeometry};

fn geometry_for(address: &str) -> (rackmap_core::SlotAddress, SlotGeometry) {
    let location = parse_address(address).expect("test address");
    let (x, y_macro, y_micro) = lateral_position(&location, &LayoutConfig::default());
    let z_base = f64::from(location.level / 10 - 1) * 1.6;
    let geometry = SlotGeometry {
        x,
        y_macro,
        y_micro,
        z_base,
        level_height: 1.6,
    };
    (location, geometry)
}

pub fn occupied_slot(
    address: &str,
    area: &str,
    product: &str,
    expiry: Option<NaiveDateTime>,
) -> ResolvedSlot {
    let (location, geometry) = geometry_for(address);
    ResolvedSlot {
        address: address.to_string(),
        location,
        area_code: area.to_string(),
        level_height_code: Some("P160".to_string()),
        geometry,
        product_code: product.to_string(),
        description: format!("Item {product}"),
        quantity: 10.0,
        expiry_date: expiry,
        status: SlotStatus::Occupied,
        is_expired: false,
        display_key: area.to_string(),
    }
}

pub fn empty_slot(address: &str, area: &str) -> ResolvedSlot {
    let (location, geometry) = geometry_for(address);
    ResolvedSlot {
        address: address.to_string(),
        location,
        area_code: area.to_string(),
        level_height_code: Some("P160".to_string()),
        geometry,
        product_code: "-".to_string(),
        description: "-".to_string(),
        quantity: 0.0,
        expiry_date: None,
        status: SlotStatus::Empty,
        is_expired: false,
        display_key: EMPTY_STRUCTURE.to_string(),
    }
}
