//! Brush color model exchanged between the color picker and the surfaces.

use crate::error::{Result, WhiteboardError};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default brush color for new sessions.
pub const DEFAULT_BRUSH_HEX: &str = "#0693E3";

/// An RGBA8 color that always has a hex representation.
///
/// Serialized as a hex string (`"#0693e3"`, or `"#0693e380"` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BrushColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl BrushColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub const fn black() -> Self {
        Self::rgb(0, 0, 0)
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let invalid = || WhiteboardError::InvalidColor(hex.to_string());
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        // from_str_radix would accept a leading '+' in any channel
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
        };

        match digits.len() {
            3 => {
                // Each nibble is doubled: #abc == #aabbcc
                let nibble = |i: usize| channel(i..i + 1).map(|v| v * 17);
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
            8 => Ok(Self::new(
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Lowercase hex form, alpha omitted when fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for BrushColor {
    fn default() -> Self {
        Self::rgb(0x06, 0x93, 0xE3)
    }
}

impl fmt::Display for BrushColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for BrushColor {
    type Err = WhiteboardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for BrushColor {
    type Error = WhiteboardError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<BrushColor> for String {
    fn from(color: BrushColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for BrushColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl From<BrushColor> for Color {
    fn from(color: BrushColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_hex_constant() {
        assert_eq!(BrushColor::default(), BrushColor::from_hex(DEFAULT_BRUSH_HEX).unwrap());
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(BrushColor::from_hex("#0693E3").unwrap(), BrushColor::rgb(6, 147, 227));
        assert_eq!(BrushColor::from_hex("0693e3").unwrap(), BrushColor::rgb(6, 147, 227));
        assert_eq!(BrushColor::from_hex("#fff").unwrap(), BrushColor::rgb(255, 255, 255));
        assert_eq!(
            BrushColor::from_hex("#11223344").unwrap(),
            BrushColor::new(0x11, 0x22, 0x33, 0x44)
        );
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        for bad in [
            "",
            "#",
            "#12",
            "#12345",
            "#gggggg",
            "#ééé",
            "#+1+2+3",
            "#+f+f+f",
            "+f+f+f",
            "#12+456",
            "rgb(1,2,3)",
        ] {
            assert!(
                matches!(BrushColor::from_hex(bad), Err(WhiteboardError::InvalidColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_hex_output() {
        assert_eq!(BrushColor::rgb(6, 147, 227).to_hex(), "#0693e3");
        assert_eq!(BrushColor::new(0, 0, 0, 128).to_hex(), "#00000080");
        assert_eq!(BrushColor::black().to_string(), "#000000");
    }

    #[test]
    fn test_serde_uses_hex_string() {
        let json = serde_json::to_string(&BrushColor::rgb(255, 0, 0)).unwrap();
        assert_eq!(json, "\"#ff0000\"");

        let parsed: BrushColor = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(parsed, BrushColor::rgb(0, 255, 0));

        assert!(serde_json::from_str::<BrushColor>("\"nope\"").is_err());
    }

    #[test]
    fn test_peniko_conversion() {
        let color = BrushColor::new(10, 20, 30, 255);
        let peniko: Color = color.into();
        assert_eq!(BrushColor::from(peniko), color);
    }
}
