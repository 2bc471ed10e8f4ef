// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level-height code parsing (`P160`, `H-120 cm`, ...).

use nom::{
    bytes::complete::take_till,
    character::complete::digit1,
    combinator::map_res,
    sequence::preceded,
    IResult,
};

fn first_digit_run(input: &str) -> IResult<&str, u32> {
    preceded(
        take_till(|c: char| c.is_ascii_digit()),
        map_res(digit1, |s: &str| lexical_core::parse::<u32>(s.as_bytes())),
    )(input)
}

/// Extract the shelf clearance in centimetres from a level-height code.
///
/// Only the first run of digits counts. Returns `None` when the code holds no
/// digits or the run does not fit in a `u32`.
pub fn parse_height_code(code: &str) -> Option<u32> {
    first_digit_run(code).ok().map(|(_, cm)| cm)
}
