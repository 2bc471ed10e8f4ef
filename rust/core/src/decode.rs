// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Text decoding with a UTF-8 → Latin-1 fallback.

use crate::error::{Error, Result};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Character encoding a text upload was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextEncoding {
    Utf8,
    Latin1,
}

/// Decode raw bytes, trying UTF-8 first and ISO-8859-1 second.
///
/// Every byte maps to a Latin-1 code point, so the fallback only rejects
/// content holding NUL bytes (binary files, UTF-16 exports).
pub fn decode_text(bytes: &[u8]) -> Result<(String, TextEncoding)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    if let Ok(text) = std::str::from_utf8(bytes) {
        return Ok((text.to_owned(), TextEncoding::Utf8));
    }

    if memchr::memchr(0, bytes).is_some() {
        return Err(Error::Decode { bytes: bytes.len() });
    }

    let text: String = bytes.iter().map(|&b| b as char).collect();
    Ok((text, TextEncoding::Latin1))
}
