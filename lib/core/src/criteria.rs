//! Search criteria
//!
//! A closed, typed description of one query. Every field has a wildcard
//! value that never rejects a record on its own:
//!
//! | Field | Wildcard |
//! |-------|----------|
//! | `Type`, `SubType` | absent, `""` or `"Any"` |
//! | `ExcludedSubTypes`, `Resources` | empty set |
//! | `Temperature`, `Gravity` | both bounds absent |
//! | `Atmosphere`, `TidallyLocked`, `HasRings` | absent, `null` or `"Any"` |
//! | `Color` | absent (`MinColorSimilarity` is then ignored) |

use crate::color::Rgb;
use crate::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Sentinel the UI uses for "no constraint"
pub const ANY: &str = "Any";

/// Inclusive numeric range; an absent bound is unbounded
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct NumericRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Whether `value` satisfies every present bound
    ///
    /// A missing value never satisfies a bounded range.
    pub fn contains(&self, value: Option<f64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(v) = value else {
            return false;
        };
        self.min.map_or(true, |min| v >= min) && self.max.map_or(true, |max| v <= max)
    }
}

/// One search query
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields, default)]
pub struct SearchCriteria {
    #[serde(rename = "Type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub excluded_sub_types: BTreeSet<String>,
    #[serde(skip_serializing_if = "NumericRange::is_unbounded")]
    pub temperature: NumericRange,
    #[serde(skip_serializing_if = "NumericRange::is_unbounded")]
    pub gravity: NumericRange,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub resources: BTreeSet<String>,
    #[serde(deserialize_with = "any_or_bool", skip_serializing_if = "Option::is_none")]
    pub atmosphere: Option<bool>,
    #[serde(deserialize_with = "any_or_bool", skip_serializing_if = "Option::is_none")]
    pub tidally_locked: Option<bool>,
    #[serde(deserialize_with = "any_or_bool", skip_serializing_if = "Option::is_none")]
    pub has_rings: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    pub min_color_similarity: f64,
}

impl SearchCriteria {
    /// Criteria that match every searchable record
    pub fn any() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    #[must_use]
    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    #[must_use]
    pub fn excluding<I, S>(mut self, sub_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_sub_types.extend(sub_types.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.temperature = NumericRange::new(min, max);
        self
    }

    #[must_use]
    pub fn with_gravity(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.gravity = NumericRange::new(min, max);
        self
    }

    #[must_use]
    pub fn requiring_resources<I, S>(mut self, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources.extend(resources.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_atmosphere(mut self, atmosphere: Option<bool>) -> Self {
        self.atmosphere = atmosphere;
        self
    }

    #[must_use]
    pub fn with_tidally_locked(mut self, locked: Option<bool>) -> Self {
        self.tidally_locked = locked;
        self
    }

    #[must_use]
    pub fn with_rings(mut self, has_rings: Option<bool>) -> Self {
        self.has_rings = has_rings;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: Rgb, min_similarity: f64) -> Self {
        self.color = Some(color);
        self.min_color_similarity = min_similarity;
        self
    }

    /// Reject values no query can meaningfully carry
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.min_color_similarity) {
            return Err(Error::InvalidCriteria(format!(
                "MinColorSimilarity must be within [0, 100], got {}",
                self.min_color_similarity
            )));
        }
        for (name, range) in [("Temperature", &self.temperature), ("Gravity", &self.gravity)] {
            if range.min.is_some_and(f64::is_nan) || range.max.is_some_and(f64::is_nan) {
                return Err(Error::InvalidCriteria(format!("{} bound is NaN", name)));
            }
        }
        Ok(())
    }
}

/// Whether a string criterion constrains anything
pub fn is_wildcard(value: Option<&str>) -> bool {
    matches!(value, None | Some("") | Some(ANY))
}

fn any_or_bool<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<bool>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::String(s) if s == ANY => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected true, false, null or \"Any\", got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_contains() {
        let open = NumericRange::default();
        assert!(open.contains(None));
        assert!(open.contains(Some(-1e9)));

        let range = NumericRange::new(Some(-10.0), Some(40.0));
        assert!(range.contains(Some(-10.0)));
        assert!(range.contains(Some(40.0)));
        assert!(!range.contains(Some(40.01)));
        assert!(!range.contains(None));

        let floor = NumericRange::new(Some(0.5), None);
        assert!(floor.contains(Some(100.0)));
        assert!(!floor.contains(Some(0.4)));
    }

    #[test]
    fn test_wildcards() {
        assert!(is_wildcard(None));
        assert!(is_wildcard(Some("")));
        assert!(is_wildcard(Some("Any")));
        assert!(!is_wildcard(Some("any")));
        assert!(!is_wildcard(Some("Rocky")));
    }

    #[test]
    fn test_deserialize_full_criteria() {
        let criteria: SearchCriteria = serde_json::from_value(json!({
            "Type": "Rocky",
            "SubType": "Any",
            "ExcludedSubTypes": ["Lava"],
            "Temperature": {"Min": -20, "Max": 45.5},
            "Gravity": {"Max": 1.5},
            "Resources": ["Iron", "Gold"],
            "Atmosphere": true,
            "TidallyLocked": "Any",
            "HasRings": null,
            "Color": [0, 255, 0],
            "MinColorSimilarity": 90
        }))
        .unwrap();

        assert_eq!(criteria.type_name.as_deref(), Some("Rocky"));
        assert!(criteria.excluded_sub_types.contains("Lava"));
        assert_eq!(criteria.temperature, NumericRange::new(Some(-20.0), Some(45.5)));
        assert_eq!(criteria.gravity, NumericRange::new(None, Some(1.5)));
        assert_eq!(criteria.resources.len(), 2);
        assert_eq!(criteria.atmosphere, Some(true));
        assert_eq!(criteria.tidally_locked, None);
        assert_eq!(criteria.has_rings, None);
        assert_eq!(criteria.color, Some(Rgb::new(0, 255, 0)));
        assert_eq!(criteria.min_color_similarity, 90.0);
        assert!(criteria.validate().is_ok());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result = serde_json::from_value::<SearchCriteria>(json!({"Colour": [1, 2, 3]}));
        assert!(result.is_err());
        let result = serde_json::from_value::<SearchCriteria>(json!({"Atmosphere": "maybe"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_object_is_match_all() {
        let criteria: SearchCriteria = serde_json::from_value(json!({})).unwrap();
        assert_eq!(criteria, SearchCriteria::any());
    }

    #[test]
    fn test_validate() {
        assert!(SearchCriteria::any().with_color(Rgb::BLACK, 100.0).validate().is_ok());
        assert!(matches!(
            SearchCriteria::any().with_color(Rgb::BLACK, 100.5).validate(),
            Err(Error::InvalidCriteria(_))
        ));
        assert!(matches!(
            SearchCriteria::any().with_gravity(Some(f64::NAN), None).validate(),
            Err(Error::InvalidCriteria(_))
        ));
    }
}
