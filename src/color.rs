// SPDX-License-Identifier: PMPL-1.0-or-later
//! Color values and CSS color parsing.
//!
//! Accepts `#rgb`, `#rrggbb`, `rgb(r, g, b)`, `rgba(r, g, b, a)` and the
//! basic CSS named colors. Anything else is a `ColorFormat` error; there is
//! no silent fallback to black.

use crate::error::{EngineError, Result};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::LazyLock;

static RGB_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[0-9.]+%?\s*)?\)$")
        .expect("valid regex")
});

/// An sRGB color with 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorValue {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorValue {
    pub const BLACK: ColorValue = ColorValue::new(0, 0, 0);
    pub const WHITE: ColorValue = ColorValue::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any supported CSS color notation
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim().to_lowercase();
        if trimmed.is_empty() {
            return Err(EngineError::color(value, "empty color"));
        }

        if let Some(hex) = trimmed.strip_prefix('#') {
            parse_hex(value, hex)
        } else if trimmed.starts_with("rgb") {
            parse_rgb(value, &trimmed)
        } else {
            named_color(&trimmed)
                .ok_or_else(|| EngineError::color(value, "unrecognized color notation"))
        }
    }

    /// Perceptual-weight luminance normalized to [0, 1]
    pub fn luminance(&self) -> f64 {
        (0.299 * f64::from(self.r) + 0.587 * f64::from(self.g) + 0.114 * f64::from(self.b))
            / 255.0
    }

    /// Lowercase `#rrggbb` form
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl std::fmt::Display for ColorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for ColorValue {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        ColorValue::parse(s)
    }
}

impl Serialize for ColorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ColorValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ColorValue::parse(&raw).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(original: &str, hex: &str) -> Result<ColorValue> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EngineError::color(original, "non-hex digit"));
    }
    let channel = |s: &str| {
        u8::from_str_radix(s, 16).map_err(|e| EngineError::color(original, e.to_string()))
    };
    match hex.len() {
        3 => Ok(ColorValue::new(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Ok(ColorValue::new(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        n => Err(EngineError::color(
            original,
            format!("expected 3 or 6 hex digits, got {}", n),
        )),
    }
}

fn parse_rgb(original: &str, value: &str) -> Result<ColorValue> {
    let caps = RGB_RE
        .captures(value)
        .ok_or_else(|| EngineError::color(original, "malformed rgb() notation"))?;
    let channel = |i: usize| {
        caps[i]
            .parse::<u8>()
            .map_err(|_| EngineError::color(original, format!("channel {} out of range", &caps[i])))
    };
    Ok(ColorValue::new(channel(1)?, channel(2)?, channel(3)?))
}

fn named_color(name: &str) -> Option<ColorValue> {
    let (r, g, b) = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "gray" | "grey" => (128, 128, 128),
        "silver" => (192, 192, 192),
        "maroon" => (128, 0, 0),
        "olive" => (128, 128, 0),
        "lime" => (0, 255, 0),
        "aqua" | "cyan" => (0, 255, 255),
        "teal" => (0, 128, 128),
        "navy" => (0, 0, 128),
        "fuchsia" | "magenta" => (255, 0, 255),
        "purple" => (128, 0, 128),
        "orange" => (255, 165, 0),
        _ => return None,
    };
    Some(ColorValue::new(r, g, b))
}
