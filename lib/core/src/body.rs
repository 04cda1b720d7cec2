use crate::color::{BodyColor, Rgb};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Where a record lives in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LocationKey {
    /// One-level catalog: `key -> record`
    Flat(String),
    /// Two-level catalog: `system -> coordinates -> record`
    Nested { system: String, coordinates: String },
}

impl LocationKey {
    pub fn system(&self) -> Option<&str> {
        match self {
            LocationKey::Flat(_) => None,
            LocationKey::Nested { system, .. } => Some(system),
        }
    }
}

impl std::fmt::Display for LocationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationKey::Flat(key) => write!(f, "{}", key),
            LocationKey::Nested { system, coordinates } => write!(f, "{}, {}", system, coordinates),
        }
    }
}

impl Serialize for LocationKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One celestial body from the catalog
///
/// Every attribute is optional here; whether a record is searchable at all
/// is decided once, during catalog ingestion.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CelestialBody {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(rename = "PrimaryColor", skip_serializing_if = "Option::is_none")]
    pub color: Option<BodyColor>,
    pub resources: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gravity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tidally_locked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_rings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain_config: Option<Value>,
    /// Fields the search never looks at, kept for detail views
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CelestialBody {
    #[must_use]
    pub fn new(type_name: impl Into<String>, sub_type: impl Into<String>) -> Self {
        Self {
            type_name: Some(type_name.into()),
            sub_type: Some(sub_type.into()),
            ..Default::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = Some(BodyColor::Rgb(color));
        self
    }

    #[inline]
    #[must_use]
    pub fn with_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = resources.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = Some(gravity);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_atmosphere(mut self, atmosphere: bool) -> Self {
        self.atmosphere = Some(atmosphere);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tidally_locked(mut self, locked: bool) -> Self {
        self.tidally_locked = Some(locked);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rings(mut self, has_rings: bool) -> Self {
        self.has_rings = Some(has_rings);
        self
    }

    /// Subtype used for grouping
    pub fn group_name(&self) -> &str {
        self.sub_type.as_deref().unwrap_or("Unknown")
    }

    /// Color used for scoring and display; black when missing or malformed
    pub fn display_color(&self) -> Rgb {
        self.color.and_then(|c| c.rgb()).unwrap_or(Rgb::BLACK)
    }
}

impl Serialize for BodyColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            BodyColor::Rgb(rgb) => rgb.serialize(serializer),
            BodyColor::Malformed => serializer.serialize_none(),
        }
    }
}
