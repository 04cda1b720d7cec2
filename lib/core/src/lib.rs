//! # Starsift Core
//!
//! Core library for searching a catalog of celestial bodies.
//!
//! This crate provides the data model and the search engine:
//!
//! - [`Catalog`] - Ingested records, flattened from one- or two-level JSON
//! - [`SearchCriteria`] - A typed query with wildcard defaults
//! - [`Filter`] - Criteria matching for a single record
//! - [`search`] - Match, group by subtype, rank and truncate
//! - [`Rgb`] - Colors and the linear similarity metric
//!
//! ## Example
//!
//! ```rust
//! use starsift_core::{search, Catalog, CatalogFormat, Rgb, SearchCriteria};
//! use serde_json::json;
//!
//! let raw = json!({
//!     "Sol": {
//!         "(0, 0, 3)": {
//!             "Type": "Rocky",
//!             "SubType": "HighMetal",
//!             "PrimaryColor": [255, 0, 0],
//!             "Resources": {"Iron": 1},
//!             "Temperature": 20,
//!             "Gravity": 1.0,
//!             "Atmosphere": true,
//!             "TerrainConfig": {}
//!         }
//!     }
//! });
//! let catalog = Catalog::from_value(&raw, CatalogFormat::default()).unwrap();
//!
//! let criteria = SearchCriteria::any()
//!     .with_type("Rocky")
//!     .with_color(Rgb::new(250, 10, 10), 80.0);
//! let results = search(&catalog, &criteria, Some(5));
//! assert_eq!(results.get("HighMetal").unwrap().len(), 1);
//! ```

pub mod body;
pub mod catalog;
pub mod color;
pub mod criteria;
pub mod error;
pub mod filter;
pub mod search;

pub use body::{CelestialBody, LocationKey};
pub use catalog::{
    is_searchable, Catalog, CatalogFormat, CatalogShape, TemperatureUnit, REQUIRED_FIELDS,
};
pub use color::{similarity, similarity_values, BodyColor, Rgb};
pub use criteria::{NumericRange, SearchCriteria};
pub use error::{Error, Result};
pub use filter::{evaluate, Filter};
pub use search::{
    search, search_json, search_parallel, GroupedResults, ResultGroup, SearchResult,
    DEFAULT_TOP_K,
};
