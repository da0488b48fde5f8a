use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An opaque highlight color, written in configuration as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(Srgb<u8>);

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(Srgb::new(r, g, b))
    }
}

impl FromStr for Color {
    type Err = palette::rgb::FromHexError;

    fn from_str(hex: &str) -> Result<Self, Self::Err> {
        Srgb::<u8>::from_str(hex.trim()).map(Self)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0.red, self.0.green, self.0.blue)
    }
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    hex.parse().ok()
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Color, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;

        hex_to_color(&hex).ok_or_else(|| {
            serde::de::Error::custom(format!("not a valid hex: {hex}"))
        })
    }
}
