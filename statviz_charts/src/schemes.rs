// Copyright 2025 the statviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Named color schemes.
//!
//! Schemes are stored as concatenated six-digit hex strings and decoded on demand.

extern crate alloc;

use alloc::vec::Vec;

use peniko::Color;

const BLUES: &str = "f7fbffdeebf7c6dbef9ecae16baed64292c62171b508519c08306b";
const YLORRD: &str = "ffffccffeda0fed976feb24cfd8d3cfc4e2ae31a1cbd0026800026";
const CATEGORY10: &str = "1f77b4ff7f0e2ca02cd627289467bd8c564be377c27f7f7fbcbd2217becf";

/// A named color scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorScheme {
    /// Sequential white-to-blue ramp (9 stops).
    Blues,
    /// Sequential yellow-orange-red ramp (9 stops).
    YlOrRd,
    /// Ten categorical colors.
    Category10,
}

impl ColorScheme {
    /// Looks up a scheme by (case-insensitive) name.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("blues") {
            Some(Self::Blues)
        } else if name.eq_ignore_ascii_case("ylorrd") {
            Some(Self::YlOrRd)
        } else if name.eq_ignore_ascii_case("category10") {
            Some(Self::Category10)
        } else {
            None
        }
    }

    /// The scheme's colors, in order.
    pub fn colors(self) -> Vec<Color> {
        decode_scheme(match self {
            Self::Blues => BLUES,
            Self::YlOrRd => YLORRD,
            Self::Category10 => CATEGORY10,
        })
    }
}

/// Decodes concatenated `rrggbb` triples. Malformed chunks are skipped.
pub fn decode_scheme(hex: &str) -> Vec<Color> {
    hex.as_bytes()
        .chunks_exact(6)
        .filter_map(|chunk| {
            let s = core::str::from_utf8(chunk).ok()?;
            let rgb = u32::from_str_radix(s, 16).ok()?;
            let [_, r, g, b] = rgb.to_be_bytes();
            Some(Color::from_rgb8(r, g, b))
        })
        .collect()
}

/// Parses a `#rrggbb` color string.
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return None;
    }
    decode_scheme(hex).first().copied()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn schemes_decode_fully() {
        assert_eq!(ColorScheme::Blues.colors().len(), 9);
        assert_eq!(ColorScheme::YlOrRd.colors().len(), 9);
        assert_eq!(ColorScheme::Category10.colors().len(), 10);
    }

    #[test]
    fn first_category_color_is_blue() {
        let c = ColorScheme::Category10.colors()[0].to_rgba8();
        assert_eq!((c.r, c.g, c.b), (0x1f, 0x77, 0xb4));
    }

    #[test]
    fn parse_hex() {
        let c = parse_hex_color("#005900").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (0, 0x59, 0, 255));
        assert!(parse_hex_color("#05").is_none());
        assert_eq!(ColorScheme::from_name("YLORRD"), Some(ColorScheme::YlOrRd));
    }
}
