// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Slot address parsing.
//!
//! Addresses look like `025-071-040-001`: aisle, column and level followed by
//! a sub-position discriminator that plays no part in placement.

use nom::{
    character::complete::{char, digit1},
    combinator::map_res,
    sequence::{preceded, tuple},
    IResult,
};

/// Aisle/column/level triple of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotAddress {
    pub aisle: u32,
    pub column: u32,
    pub level: u32,
}

impl SlotAddress {
    pub fn new(aisle: u32, column: u32, level: u32) -> Self {
        Self {
            aisle,
            column,
            level,
        }
    }

    /// Even columns sit on one face of the aisle, odd columns on the other.
    #[inline]
    pub fn is_even_column(&self) -> bool {
        self.column % 2 == 0
    }

    /// Key of the rack column this slot is stacked in.
    #[inline]
    pub fn stack_key(&self) -> (u32, u32) {
        (self.aisle, self.column)
    }
}

/// Parse one numeric group with lexical-core (rejects overflow).
fn group(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |s: &str| lexical_core::parse::<u32>(s.as_bytes()))(input)
}

fn triple(input: &str) -> IResult<&str, (u32, u32, u32)> {
    tuple((group, preceded(char('-'), group), preceded(char('-'), group)))(input)
}

/// Parse a slot address into its aisle/column/level triple.
///
/// The first three dash-delimited groups must be numeric; anything after the
/// third group (normally the sub-position) is ignored as long as it starts
/// with another dash. Returns `None` for anything else.
pub fn parse_address(address: &str) -> Option<SlotAddress> {
    let input = address.trim();
    let (rest, (aisle, column, level)) = triple(input).ok()?;
    if rest.is_empty() || rest.starts_with('-') {
        Some(SlotAddress::new(aisle, column, level))
    } else {
        None
    }
}

/// Parse a whole address column in one pass.
pub fn parse_addresses<'a, I>(addresses: I) -> Vec<Option<SlotAddress>>
where
    I: IntoIterator<Item = &'a str>,
{
    addresses.into_iter().map(parse_address).collect()
}
