use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An sRGB color stored as 8-bit channels so hex round-trips are exact.
///
/// Settings JSON carries colors as `#rrggbb` strings, which is also how the
/// type serializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Error, Debug)]
#[error("invalid hex color {0:?}, expected #rrggbb")]
pub struct ParseColorError(pub String);

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear-ish channel values in [0, 1] for raster work.
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.to_string()))?;

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_string()));
        }

        let r = u8::from_str_radix(&digits[0..2], 16).unwrap();
        let g = u8::from_str_radix(&digits[2..4], 16).unwrap();
        let b = u8::from_str_radix(&digits[4..6], 16).unwrap();

        Ok(Color::new(r, g, b))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

struct ColorVisitor;

impl Visitor<'_> for ColorVisitor {
    type Value = Color;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a hex color string like \"#3865ad\"")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Color, E> {
        value.parse().map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(ColorVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip() {
        let color: Color = "#3865ad".parse().unwrap();
        assert_eq!(color, Color::new(0x38, 0x65, 0xad));
        assert_eq!(color.to_hex(), "#3865ad");
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!("3865ad".parse::<Color>().is_err());
        assert!("#38f".parse::<Color>().is_err());
        assert!("#38f65adx".parse::<Color>().is_err());
        assert!("#38g5ad".parse::<Color>().is_err());
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Color::new(0x11, 0x22, 0x33)).unwrap();
        assert_eq!(json, "\"#112233\"");

        let back: Color = serde_json::from_str("\"#112233\"").unwrap();
        assert_eq!(back, Color::new(0x11, 0x22, 0x33));

        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }
}
