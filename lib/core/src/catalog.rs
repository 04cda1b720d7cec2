//! Catalog ingestion
//!
//! Turns raw catalog JSON into a flat list of searchable records. Catalog
//! shape (one or two levels of keys) and field naming are resolved here,
//! so the matcher only ever sees [`CelestialBody`] values.

use crate::body::{CelestialBody, LocationKey};
use crate::color::BodyColor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Fields every searchable record must carry, besides the color field
pub const REQUIRED_FIELDS: [&str; 7] = [
    "Type",
    "SubType",
    "Resources",
    "Temperature",
    "Gravity",
    "Atmosphere",
    "TerrainConfig",
];

const OPTIONAL_FIELDS: [&str; 2] = ["TidallyLocked", "HasRings"];

pub const DEFAULT_COLOR_FIELD: &str = "PrimaryColor";

/// Unit the catalog records temperatures in. Never converted, only displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            other => Err(Error::InvalidCatalog(format!("unknown temperature unit '{}'", other))),
        }
    }
}

/// How the top level of the catalog is keyed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogShape {
    /// Decide per top-level entry: records are recognized by their fields
    #[default]
    Auto,
    /// `key -> record`
    Flat,
    /// `system -> coordinates -> record`
    Nested,
}

impl FromStr for CatalogShape {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(CatalogShape::Auto),
            "flat" => Ok(CatalogShape::Flat),
            "nested" => Ok(CatalogShape::Nested),
            other => Err(Error::InvalidCatalog(format!("unknown catalog shape '{}'", other))),
        }
    }
}

/// Describes the on-disk catalog format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFormat {
    /// Name of the field holding the record's RGB color
    pub color_field: String,
    pub temperature_unit: TemperatureUnit,
    pub shape: CatalogShape,
}

impl Default for CatalogFormat {
    fn default() -> Self {
        Self {
            color_field: DEFAULT_COLOR_FIELD.to_string(),
            temperature_unit: TemperatureUnit::Celsius,
            shape: CatalogShape::Auto,
        }
    }
}

/// Validity predicate: is every required field present and non-null?
pub fn is_searchable(record: &Map<String, Value>, format: &CatalogFormat) -> bool {
    let present = |field: &str| record.get(field).is_some_and(|v| !v.is_null());
    REQUIRED_FIELDS.iter().all(|field| present(field)) && present(&format.color_field)
}

/// Build a typed record, or `None` if Temperature or Gravity is not a number
///
/// A mistyped Type, SubType or flag is read as missing, so it only fails a
/// non-wildcard criterion on that field. Non-string resource names are
/// dropped. A color that cannot be read is kept as [`BodyColor::Malformed`].
pub fn parse_body(record: &Map<String, Value>, format: &CatalogFormat) -> Option<CelestialBody> {
    let mut body = CelestialBody {
        type_name: opt_string(record.get("Type")),
        sub_type: opt_string(record.get("SubType")),
        color: record
            .get(&format.color_field)
            .filter(|v| !v.is_null())
            .map(BodyColor::from_value),
        resources: parse_resources(record.get("Resources")),
        temperature: opt_number(record.get("Temperature"))?,
        gravity: opt_number(record.get("Gravity"))?,
        atmosphere: opt_bool(record.get("Atmosphere")),
        tidally_locked: opt_bool(record.get("TidallyLocked")),
        has_rings: opt_bool(record.get("HasRings")),
        terrain_config: record.get("TerrainConfig").cloned(),
        extra: Map::new(),
    };

    for (key, value) in record {
        let known = REQUIRED_FIELDS.contains(&key.as_str())
            || OPTIONAL_FIELDS.contains(&key.as_str())
            || *key == format.color_field;
        if !known {
            body.extra.insert(key.clone(), value.clone());
        }
    }
    Some(body)
}

/// Validity check and typed parse in one step
pub fn ingest_record(record: &Map<String, Value>, format: &CatalogFormat) -> Option<CelestialBody> {
    if !is_searchable(record, format) {
        return None;
    }
    parse_body(record, format)
}

/// An ingested, read-only catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<(LocationKey, CelestialBody)>,
    format: CatalogFormat,
    skipped: usize,
}

impl Catalog {
    /// Build a catalog from already-typed records, in scan order
    pub fn from_entries(entries: Vec<(LocationKey, CelestialBody)>, format: CatalogFormat) -> Self {
        Self {
            entries,
            format,
            skipped: 0,
        }
    }

    /// Ingest a parsed catalog document
    ///
    /// Fails with [`Error::InvalidCatalog`] if the top level is not an
    /// object. Entries that are not records, or not searchable, are
    /// skipped silently.
    pub fn from_value(value: &Value, format: CatalogFormat) -> Result<Self> {
        let top = value.as_object().ok_or_else(|| {
            Error::InvalidCatalog(format!("expected a JSON object, got {}", json_kind(value)))
        })?;

        let mut catalog = Self {
            entries: Vec::with_capacity(top.len()),
            format,
            skipped: 0,
        };

        for (key, entry) in top {
            let Some(obj) = entry.as_object() else {
                catalog.skipped += 1;
                continue;
            };
            let flat = match catalog.format.shape {
                CatalogShape::Flat => true,
                CatalogShape::Nested => false,
                CatalogShape::Auto => looks_like_record(obj, &catalog.format),
            };
            if flat {
                catalog.push(LocationKey::Flat(key.clone()), obj);
            } else {
                for (coordinates, record) in obj {
                    match record.as_object() {
                        Some(record) => catalog.push(
                            LocationKey::Nested {
                                system: key.clone(),
                                coordinates: coordinates.clone(),
                            },
                            record,
                        ),
                        None => catalog.skipped += 1,
                    }
                }
            }
        }

        debug!(
            records = catalog.entries.len(),
            skipped = catalog.skipped,
            "catalog ingested"
        );
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R, format: CatalogFormat) -> Result<Self> {
        let value: Value = serde_json::from_reader(reader)?;
        Self::from_value(&value, format)
    }

    pub fn from_path<P: AsRef<Path>>(path: P, format: CatalogFormat) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        Self::from_reader(BufReader::new(file), format)
    }

    fn push(&mut self, location: LocationKey, record: &Map<String, Value>) {
        match ingest_record(record, &self.format) {
            Some(body) => self.entries.push((location, body)),
            None => self.skipped += 1,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries dropped during ingestion
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn format(&self) -> &CatalogFormat {
        &self.format
    }

    /// Records in scan order
    pub fn entries(&self) -> &[(LocationKey, CelestialBody)] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LocationKey, &CelestialBody)> {
        self.entries.iter().map(|(k, b)| (k, b))
    }

    pub fn get(&self, location: &LocationKey) -> Option<&CelestialBody> {
        self.entries
            .iter()
            .find(|(k, _)| k == location)
            .map(|(_, b)| b)
    }
}

fn looks_like_record(obj: &Map<String, Value>, format: &CatalogFormat) -> bool {
    REQUIRED_FIELDS
        .iter()
        .chain(OPTIONAL_FIELDS.iter())
        .any(|field| obj.contains_key(*field))
        || obj.contains_key(&format.color_field)
}

fn opt_string(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

fn opt_bool(value: Option<&Value>) -> Option<bool> {
    value.and_then(Value::as_bool)
}

// Outer `None` means the field is present but not a number.
fn opt_number(value: Option<&Value>) -> Option<Option<f64>> {
    match value {
        None | Some(Value::Null) => Some(None),
        Some(v) => v.as_f64().map(Some),
    }
}

/// Resources may be listed as an array of names or as an object keyed by name
fn parse_resources(value: Option<&Value>) -> BTreeSet<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::Object(map)) => map.keys().cloned().collect(),
        _ => BTreeSet::new(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
