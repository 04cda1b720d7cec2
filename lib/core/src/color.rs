//! RGB colors and the linear color-similarity metric
//!
//! Similarity is the Euclidean distance between two colors in RGB space,
//! normalized against the largest possible distance and expressed as a
//! percentage in `[0.0, 100.0]`. It is a linear metric, not a perceptual one:
//! two colors a human sees as close may score lower than expected.

use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Largest possible distance between two RGB colors: `sqrt(3 * 255^2)`
pub const MAX_RGB_DISTANCE: f64 = 441.672_955_930_063_7;

/// An 8-bit RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub const BLACK: Rgb = Rgb([0, 0, 0]);

    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    #[inline]
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    #[inline]
    pub fn g(&self) -> u8 {
        self.0[1]
    }

    #[inline]
    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// Coerce a JSON value into a color
    ///
    /// The value must be an array of exactly three components. Each component
    /// may be a number or a numeric string; fractions are truncated and the
    /// result is clamped to `[0, 255]`. Returns `None` for anything else.
    pub fn from_value(value: &Value) -> Option<Self> {
        let items = value.as_array()?;
        if items.len() != 3 {
            return None;
        }
        let mut channels = [0u8; 3];
        for (slot, item) in channels.iter_mut().zip(items) {
            *slot = coerce_component(item)?;
        }
        Some(Self(channels))
    }

    /// Build a color from floating point components with the same coercion
    /// rules as [`Rgb::from_value`]
    pub fn from_components(components: &[f64]) -> Option<Self> {
        if components.len() != 3 {
            return None;
        }
        let mut channels = [0u8; 3];
        for (slot, c) in channels.iter_mut().zip(components) {
            *slot = clamp_channel(*c)?;
        }
        Some(Self(channels))
    }

    /// Parse `#RRGGBB` (the leading `#` is optional, case-insensitive)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(format!("expected #RRGGBB, got '{}'", hex)));
        }
        let mut channels = [0u8; 3];
        for (i, slot) in channels.iter_mut().enumerate() {
            *slot = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16)
                .map_err(|_| Error::InvalidColor(format!("expected #RRGGBB, got '{}'", hex)))?;
        }
        Ok(Self(channels))
    }

    /// Render as a lowercase `#rrggbb` string
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }

    /// Channel-wise mean of a pixel buffer, truncated toward zero
    ///
    /// Returns `None` for an empty buffer.
    pub fn mean(pixels: &[[u8; 3]]) -> Option<Self> {
        if pixels.is_empty() {
            return None;
        }
        let mut sums = [0u64; 3];
        for pixel in pixels {
            for (sum, channel) in sums.iter_mut().zip(pixel) {
                *sum += u64::from(*channel);
            }
        }
        let n = pixels.len() as u64;
        Some(Self([
            (sums[0] / n) as u8,
            (sums[1] / n) as u8,
            (sums[2] / n) as u8,
        ]))
    }

    /// Similarity percentage to another color
    #[inline]
    pub fn similarity(&self, other: &Rgb) -> f64 {
        similarity(*self, *other)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Self {
        Rgb(channels)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    /// Accepts `[r, g, b]` (numbers or numeric strings) or a `#RRGGBB` string
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        match &value {
            Value::String(s) => Rgb::from_hex(s).map_err(serde::de::Error::custom),
            other => Rgb::from_value(other).ok_or_else(|| {
                serde::de::Error::custom(format!(
                    "expected [r, g, b] or \"#RRGGBB\", got {}",
                    other
                ))
            }),
        }
    }
}

/// A record's color as found in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyColor {
    Rgb(Rgb),
    /// Present in the catalog but not reducible to three numeric components
    Malformed,
}

impl BodyColor {
    pub fn from_value(value: &Value) -> Self {
        Rgb::from_value(value).map_or(BodyColor::Malformed, BodyColor::Rgb)
    }

    pub fn rgb(&self) -> Option<Rgb> {
        match self {
            BodyColor::Rgb(rgb) => Some(*rgb),
            BodyColor::Malformed => None,
        }
    }

    /// Similarity to `target`; a malformed color scores `0.0`
    pub fn similarity_to(&self, target: &Rgb) -> f64 {
        match self {
            BodyColor::Rgb(rgb) => similarity(*rgb, *target),
            BodyColor::Malformed => 0.0,
        }
    }
}

/// Similarity between two colors in `[0.0, 100.0]`
///
/// `(1 - d / d_max) * 100` where `d` is the Euclidean RGB distance.
pub fn similarity(a: Rgb, b: Rgb) -> f64 {
    let squared: f64 = a
        .0
        .iter()
        .zip(b.0.iter())
        .map(|(x, y)| {
            let diff = f64::from(*x) - f64::from(*y);
            diff * diff
        })
        .sum();
    let score = (1.0 - squared.sqrt() / MAX_RGB_DISTANCE) * 100.0;
    score.clamp(0.0, 100.0)
}

/// Fail-soft similarity over raw JSON values
///
/// Returns `0.0` if either value cannot be coerced into an [`Rgb`].
pub fn similarity_values(a: &Value, b: &Value) -> f64 {
    match (Rgb::from_value(a), Rgb::from_value(b)) {
        (Some(a), Some(b)) => similarity(a, b),
        _ => 0.0,
    }
}

fn coerce_component(value: &Value) -> Option<u8> {
    match value {
        Value::Number(n) => clamp_channel(n.as_f64()?),
        Value::String(s) => clamp_channel(s.trim().parse::<f64>().ok()?),
        _ => None,
    }
}

fn clamp_channel(c: f64) -> Option<u8> {
    if !c.is_finite() {
        return None;
    }
    Some(c.trunc().clamp(0.0, 255.0) as u8)
}
