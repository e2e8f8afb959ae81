//! # Style Parameters
//!
//! Value objects describing everything a card render depends on:
//! [`StyleParameters`], [`ContentStrings`] and [`ManualOffsets`].
//!
//! All types derive `Serialize + Deserialize` with the camelCase field names
//! used by saved templates. Numeric fields accept either JSON numbers or
//! numeric strings, since older templates stored raw form values.
//!
//! ## Validation
//!
//! Values are validated once at the boundary with
//! [`StyleParameters::sanitized`]; layout code assumes finite, in-range input.
//!
//! ```
//! use quotecard::style::{Color, StyleParameters};
//!
//! let mut style = StyleParameters::default();
//! style.card_width = 10_000;
//! style.quote1_line_height = f32::NAN;
//!
//! let style = style.sanitized();
//! assert_eq!(style.card_width, 2000);
//! assert_eq!(style.quote1_line_height, 1.4);
//! assert_eq!(Color::parse("#f6f4e8").unwrap().to_hex(), "#F6F4E8");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::QuoteCardError;

/// Smallest canvas edge accepted (matches the resize handle lower bound).
pub const MIN_CARD_SIZE: u32 = 400;
/// Largest canvas edge accepted (matches the resize handle upper bound).
pub const MAX_CARD_SIZE: u32 = 2000;

pub const DEFAULT_CARD_WIDTH: u32 = 970;
pub const DEFAULT_CARD_HEIGHT: u32 = 1074;
pub const DEFAULT_FONT_FAMILY: &str = "'American Typewriter', 'Courier Prime', monospace";

const MIN_FONT_SIZE: u32 = 1;
const MAX_FONT_SIZE: u32 = 500;
const MIN_LINE_HEIGHT: f32 = 1.0;
const MAX_LINE_HEIGHT: f32 = 5.0;

// ============================================================================
// COLOR
// ============================================================================

/// An opaque RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (the `#` is optional, case-insensitive).
    pub fn parse(input: &str) -> Result<Self, QuoteCardError> {
        let hex = input.trim().trim_start_matches('#');
        let invalid = || QuoteCardError::InvalidInput(format!("Invalid color '{}'", input));

        if !hex.is_ascii() {
            return Err(invalid());
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
                let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
                Ok(Self::rgb(r, g, b))
            }
            3 => {
                let digit = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::rgb(digit(0)?, digit(1)?, digit(2)?))
            }
            _ => Err(invalid()),
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl FromStr for Color {
    type Err = QuoteCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// FONT WEIGHT
// ============================================================================

/// A CSS-style font weight: `"400"`, `"600"`, `"normal"`, `"bold"`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FontWeight(String);

impl FontWeight {
    pub fn new(weight: impl Into<String>) -> Self {
        Self(weight.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric weight; unknown keywords count as normal (400).
    pub fn numeric(&self) -> u16 {
        match self.0.trim().to_lowercase().as_str() {
            "normal" | "" => 400,
            "bold" => 700,
            "bolder" => 800,
            "lighter" => 300,
            other => other.parse().unwrap_or(400),
        }
    }

    pub fn is_bold(&self) -> bool {
        self.numeric() >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::new("400")
    }
}

impl<'de> Deserialize<'de> for FontWeight {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum WeightValue {
            Number(u16),
            Text(String),
        }

        Ok(match WeightValue::deserialize(deserializer)? {
            WeightValue::Number(n) => FontWeight(n.to_string()),
            WeightValue::Text(s) => FontWeight(s),
        })
    }
}

// ============================================================================
// NUMERIC DESERIALIZERS
// ============================================================================

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberValue {
    Number(f64),
    Text(String),
}

impl NumberValue {
    fn into_f64(self) -> f64 {
        match self {
            NumberValue::Number(n) => n,
            // Unparseable text becomes NaN and is repaired by `sanitized()`.
            NumberValue::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
        }
    }
}

/// Accepts a number or numeric string; truncates toward zero like `parseInt`.
///
/// `null`, garbage and non-positive values become 0 (repaired by `sanitized()`).
pub(crate) fn deserialize_px<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberValue> = Option::deserialize(deserializer)?;
    let value = value.map_or(f64::NAN, NumberValue::into_f64);
    if value.is_finite() && value > 0.0 {
        Ok(value.trunc().min(u32::MAX as f64) as u32)
    } else {
        Ok(0)
    }
}

/// Accepts a number or numeric string as `f32`; `null` becomes NaN.
///
/// NaN is repaired to the field default by the owning type's `sanitized()`.
pub(crate) fn deserialize_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberValue> = Option::deserialize(deserializer)?;
    Ok(value.map_or(f32::NAN, |v| v.into_f64() as f32))
}

// ============================================================================
// STYLE PARAMETERS
// ============================================================================

/// Which text element a style lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Quote1,
    Quote2,
    Author,
}

/// Resolved style for one text element.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle<'a> {
    pub size: f32,
    /// Line-height multiplier (the author line is always single-line).
    pub line_height: f32,
    pub weight: &'a FontWeight,
    pub color: Color,
    pub family: &'a str,
}

/// Flat record of every independently settable style field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StyleParameters {
    #[serde(deserialize_with = "deserialize_px")]
    pub card_width: u32,
    #[serde(deserialize_with = "deserialize_px")]
    pub card_height: u32,

    #[serde(deserialize_with = "deserialize_px")]
    pub quote1_size: u32,
    #[serde(deserialize_with = "deserialize_px")]
    pub quote2_size: u32,
    #[serde(deserialize_with = "deserialize_px")]
    pub author_size: u32,

    #[serde(deserialize_with = "deserialize_f32")]
    pub quote1_line_height: f32,
    #[serde(deserialize_with = "deserialize_f32")]
    pub quote2_line_height: f32,

    pub quote1_weight: FontWeight,
    pub quote2_weight: FontWeight,
    pub author_weight: FontWeight,

    pub quote1_color: Color,
    pub quote2_color: Color,
    pub author_color: Color,
    pub bg_color: Color,
    pub card_color: Color,
    pub divider_color: Color,

    pub enable_quote2: bool,
    pub show_dividers: bool,
    pub enable_colored_borders: bool,

    pub font_family: String,
}

impl Default for StyleParameters {
    fn default() -> Self {
        Self {
            card_width: DEFAULT_CARD_WIDTH,
            card_height: DEFAULT_CARD_HEIGHT,
            quote1_size: 70,
            quote2_size: 60,
            author_size: 36,
            quote1_line_height: 1.4,
            quote2_line_height: 1.4,
            quote1_weight: FontWeight::new("600"),
            quote2_weight: FontWeight::new("400"),
            author_weight: FontWeight::new("400"),
            quote1_color: Color::BLACK,
            quote2_color: Color::BLACK,
            author_color: Color::rgb(0x8B, 0x73, 0x55),
            bg_color: Color::rgb(0xE9, 0xE5, 0xCD),
            card_color: Color::rgb(0xF6, 0xF4, 0xE8),
            divider_color: Color::rgb(0xAF, 0xA8, 0x6A),
            enable_quote2: false,
            show_dividers: true,
            enable_colored_borders: true,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
        }
    }
}

impl StyleParameters {
    /// Clamp every numeric field into its valid range.
    ///
    /// Non-finite or zero values fall back to the defaults rather than
    /// propagating into degenerate geometry.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let px = |value: u32, fallback: u32, min: u32, max: u32| {
            if value == 0 { fallback } else { value.clamp(min, max) }
        };
        let ratio = |value: f32, fallback: f32| {
            if value.is_finite() {
                value.clamp(MIN_LINE_HEIGHT, MAX_LINE_HEIGHT)
            } else {
                fallback
            }
        };

        self.card_width = px(self.card_width, defaults.card_width, MIN_CARD_SIZE, MAX_CARD_SIZE);
        self.card_height = px(self.card_height, defaults.card_height, MIN_CARD_SIZE, MAX_CARD_SIZE);
        self.quote1_size = px(self.quote1_size, defaults.quote1_size, MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.quote2_size = px(self.quote2_size, defaults.quote2_size, MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.author_size = px(self.author_size, defaults.author_size, MIN_FONT_SIZE, MAX_FONT_SIZE);
        self.quote1_line_height = ratio(self.quote1_line_height, defaults.quote1_line_height);
        self.quote2_line_height = ratio(self.quote2_line_height, defaults.quote2_line_height);

        if self.font_family.trim().is_empty() {
            self.font_family = defaults.font_family;
        }

        self
    }

    /// Restore colors, fonts and toggles to defaults, keeping the canvas size.
    pub fn reset_styles(&mut self) {
        let (width, height) = (self.card_width, self.card_height);
        let enable_quote2 = self.enable_quote2;
        let show_dividers = self.show_dividers;
        *self = Self {
            card_width: width,
            card_height: height,
            enable_quote2,
            show_dividers,
            ..Self::default()
        };
    }

    /// Restore the default canvas size.
    pub fn reset_size(&mut self) {
        self.card_width = DEFAULT_CARD_WIDTH;
        self.card_height = DEFAULT_CARD_HEIGHT;
    }

    /// Resolved style for one text element.
    pub fn text_style(&self, role: TextRole) -> TextStyle<'_> {
        let (size, line_height, weight, color) = match role {
            TextRole::Quote1 => (
                self.quote1_size,
                self.quote1_line_height,
                &self.quote1_weight,
                self.quote1_color,
            ),
            TextRole::Quote2 => (
                self.quote2_size,
                self.quote2_line_height,
                &self.quote2_weight,
                self.quote2_color,
            ),
            TextRole::Author => (self.author_size, 1.0, &self.author_weight, self.author_color),
        };

        TextStyle {
            size: size as f32,
            line_height,
            weight,
            color,
            family: &self.font_family,
        }
    }
}

// ============================================================================
// CONTENT & OFFSETS
// ============================================================================

/// The three free-form text fields of a card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentStrings {
    #[serde(rename = "quote1Text")]
    pub quote1: String,
    #[serde(rename = "quote2Text")]
    pub quote2: String,
    #[serde(rename = "authorText")]
    pub author: String,
}

impl ContentStrings {
    pub fn new(quote1: impl Into<String>) -> Self {
        Self {
            quote1: quote1.into(),
            ..Default::default()
        }
    }

    pub fn with_quote2(mut self, quote2: impl Into<String>) -> Self {
        self.quote2 = quote2.into();
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn has_author(&self) -> bool {
        !self.author.trim().is_empty()
    }
}

/// User drag deltas (pixels) added on top of computed vertical positions.
///
/// Offsets are intentionally unbounded; only a reset brings a dragged-away
/// element back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManualOffsets {
    #[serde(deserialize_with = "deserialize_f32")]
    pub quote1_offset: f32,
    #[serde(deserialize_with = "deserialize_f32")]
    pub quote2_offset: f32,
    #[serde(deserialize_with = "deserialize_f32")]
    pub author_offset: f32,
    #[serde(deserialize_with = "deserialize_f32")]
    pub divider1_offset: f32,
}

impl ManualOffsets {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Replace non-finite offsets (e.g. from a corrupt template) with zero.
    pub fn sanitized(self) -> Self {
        let finite = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            quote1_offset: finite(self.quote1_offset),
            quote2_offset: finite(self.quote2_offset),
            author_offset: finite(self.author_offset),
            divider1_offset: finite(self.divider1_offset),
        }
    }
}
