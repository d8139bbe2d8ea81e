//! Hex colour parsing
//!
//! The analysis model reports colours as CSS-style hex strings. They are
//! parsed once at the validation boundary so the generator never sees an
//! unparseable colour.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An sRGB colour parsed from `#rgb` or `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HexColor {
    r: u8,
    g: u8,
    b: u8,
}

/// Error returned when a string is not a hex colour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a hex colour (expected #rgb or #rrggbb)")]
pub struct HexColorError(pub String);

impl HexColor {
    pub const BLACK: Self = Self::from_u32(0x000000);
    pub const WHITE: Self = Self::from_u32(0xffffff);

    /// Build from individual channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value (upper byte ignored).
    pub const fn from_u32(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// Packed `0xRRGGBB`.
    pub const fn to_u32(self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Channels normalized to 0.0..=1.0 (still sRGB encoded).
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Channels converted to linear light for shading.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_f32().map(srgb_to_linear)
    }

    /// True when every channel is zero.
    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed).as_bytes();
        let err = || HexColorError(s.to_string());

        let nibbles = digits
            .iter()
            .map(|&c| hex_digit(c))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(err)?;

        match *nibbles.as_slice() {
            // #rgb expands each nibble: f -> ff
            [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new(
                (r1 << 4) | r0,
                (g1 << 4) | g0,
                (b1 << 4) | b0,
            )),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_form() {
        let c: HexColor = "#2d3436".parse().unwrap();
        assert_eq!(c.rgb(), [0x2d, 0x34, 0x36]);
        assert_eq!(c.to_u32(), 0x2d3436);
    }

    #[test]
    fn parses_short_form_and_missing_hash() {
        assert_eq!("#fa0".parse::<HexColor>().unwrap().rgb(), [0xff, 0xaa, 0x00]);
        assert_eq!("00FF88".parse::<HexColor>().unwrap().to_u32(), 0x00ff88);
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<HexColor>().is_err());
        assert!("#12345".parse::<HexColor>().is_err());
        assert!("crimson".parse::<HexColor>().is_err());
        assert!("#gg0000".parse::<HexColor>().is_err());
    }

    #[test]
    fn display_is_canonical_lowercase() {
        let c: HexColor = "  #ABCDEF ".parse().unwrap();
        assert_eq!(c.to_string(), "#abcdef");
    }

    #[test]
    fn linear_conversion_endpoints() {
        assert_eq!(HexColor::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = HexColor::WHITE.to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn serde_as_string() {
        let c = HexColor::from_u32(0x3366ff);
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#3366ff\"");
        let back: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
