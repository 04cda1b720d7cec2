//! # Starsift
//!
//! Search a catalog of celestial bodies by type, physical ranges, resources
//! and color, with results grouped by subtype and ranked by color similarity.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! starsift search --catalog planets.json --type Rocky --color '#c0392b' \
//!     --min-similarity 80 --top-per-group
//! starsift serve --http-port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use starsift::prelude::*;
//!
//! let catalog = Catalog::from_path("planets.json", CatalogFormat::default()).unwrap();
//! let criteria = SearchCriteria::any()
//!     .with_type("Rocky")
//!     .with_atmosphere(Some(true))
//!     .with_color(Rgb::new(192, 57, 43), 80.0);
//! let results = search(&catalog, &criteria, Some(DEFAULT_TOP_K));
//! for group in &results {
//!     println!("{}: {}", group.sub_type, group.len());
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - [`starsift-core`](https://docs.rs/starsift-core) - Catalog ingestion, matching, color similarity, ranking
//! - [`starsift-api`](https://docs.rs/starsift-api) - Stateless REST API

pub mod report;

// Re-export core types
pub use starsift_core::{
    search, search_json, search_parallel,
    Catalog, CatalogFormat, CatalogShape, TemperatureUnit,
    CelestialBody, LocationKey, BodyColor, Rgb,
    SearchCriteria, NumericRange, Filter,
    GroupedResults, ResultGroup, SearchResult, DEFAULT_TOP_K,
    Error, Result,
};

// Re-export API
pub use starsift_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        search, search_parallel,
        Catalog, CatalogFormat, CatalogShape, TemperatureUnit,
        CelestialBody, LocationKey, Rgb,
        SearchCriteria, Filter,
        GroupedResults, ResultGroup, SearchResult, DEFAULT_TOP_K,
        Error, Result,
        RestApi,
    };
}

/// The color similarity metric
pub mod color {
    pub use starsift_core::color::{similarity, similarity_values, MAX_RGB_DISTANCE};
}
