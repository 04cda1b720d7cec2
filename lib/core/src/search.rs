//! Search and ranking
//!
//! Scans a [`Catalog`], keeps the records that satisfy the criteria, groups
//! them by subtype in first-seen order and sorts each group by score,
//! highest first. Equal scores keep their scan order.

use crate::body::{CelestialBody, LocationKey};
use crate::catalog::{Catalog, CatalogFormat};
use crate::color::Rgb;
use crate::criteria::SearchCriteria;
use crate::filter::evaluate;
use crate::Result;
use rayon::prelude::*;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// How many results per subtype the color search UI asks for
pub const DEFAULT_TOP_K: usize = 5;

/// One matching record
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SearchResult {
    pub location: LocationKey,
    /// Color similarity in `[0, 100]`, or 100 when no color was searched
    pub color_similarity: f64,
    /// The record's color as used for scoring
    #[serde(serialize_with = "serialize_hex")]
    pub color: Rgb,
    #[serde(skip)]
    pub sub_type: String,
    pub body: CelestialBody,
}

/// Results for one subtype, best first
#[derive(Debug, Clone, Default)]
pub struct ResultGroup {
    pub sub_type: String,
    pub results: Vec<SearchResult>,
}

impl ResultGroup {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn best(&self) -> Option<&SearchResult> {
        self.results.first()
    }
}

impl Serialize for ResultGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ResultGroup", 3)?;
        state.serialize_field("SubType", &self.sub_type)?;
        state.serialize_field("Count", &self.results.len())?;
        state.serialize_field("Results", &self.results)?;
        state.end()
    }
}

/// Matches grouped by subtype, groups in first-seen order
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct GroupedResults {
    groups: Vec<ResultGroup>,
}

impl GroupedResults {
    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, sub_type: &str) -> Option<&ResultGroup> {
        self.groups.iter().find(|g| g.sub_type == sub_type)
    }

    pub fn groups(&self) -> &[ResultGroup] {
        &self.groups
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultGroup> {
        self.groups.iter()
    }

    /// Sum of all group sizes
    pub fn total_matches(&self) -> usize {
        self.groups.iter().map(ResultGroup::len).sum()
    }

    pub fn into_groups(self) -> Vec<ResultGroup> {
        self.groups
    }

    /// Group matches in scan order, then rank and truncate
    fn from_matches<I>(matches: I, top_k_per_group: Option<usize>) -> Self
    where
        I: IntoIterator<Item = SearchResult>,
    {
        let mut groups: Vec<ResultGroup> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for result in matches {
            let slot = *index.entry(result.sub_type.clone()).or_insert_with(|| {
                groups.push(ResultGroup {
                    sub_type: result.sub_type.clone(),
                    results: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].results.push(result);
        }

        for group in &mut groups {
            // sort_by is stable: equal scores keep scan order
            group
                .results
                .sort_by(|a, b| b.color_similarity.total_cmp(&a.color_similarity));
            if let Some(k) = top_k_per_group {
                group.results.truncate(k);
            }
        }
        groups.retain(|group| !group.results.is_empty());

        Self { groups }
    }
}

impl<'a> IntoIterator for &'a GroupedResults {
    type Item = &'a ResultGroup;
    type IntoIter = std::slice::Iter<'a, ResultGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Search `catalog` with `criteria`
///
/// When `top_k_per_group` is set every group is cut to its first `k`
/// entries after sorting, whether or not a color was searched.
pub fn search(
    catalog: &Catalog,
    criteria: &SearchCriteria,
    top_k_per_group: Option<usize>,
) -> GroupedResults {
    let matches = catalog
        .entries()
        .iter()
        .filter_map(|(location, body)| score(location, body, criteria));
    let results = GroupedResults::from_matches(matches, top_k_per_group);
    log_summary(catalog, &results);
    results
}

/// Same result as [`search`], with records scored across the rayon pool
///
/// Scores are collected in scan order before grouping, so ranking and
/// tie-breaks are identical to the sequential scan.
pub fn search_parallel(
    catalog: &Catalog,
    criteria: &SearchCriteria,
    top_k_per_group: Option<usize>,
) -> GroupedResults {
    let scored: Vec<Option<SearchResult>> = catalog
        .entries()
        .par_iter()
        .map(|(location, body)| score(location, body, criteria))
        .collect();
    let results = GroupedResults::from_matches(scored.into_iter().flatten(), top_k_per_group);
    log_summary(catalog, &results);
    results
}

/// Ingest a raw catalog document and search it
///
/// Fails with [`crate::Error::InvalidCatalog`] before scanning if the
/// document is not a JSON object.
pub fn search_json(
    catalog: &Value,
    format: CatalogFormat,
    criteria: &SearchCriteria,
    top_k_per_group: Option<usize>,
) -> Result<GroupedResults> {
    let catalog = Catalog::from_value(catalog, format)?;
    Ok(search(&catalog, criteria, top_k_per_group))
}

fn score(location: &LocationKey, body: &CelestialBody, criteria: &SearchCriteria) -> Option<SearchResult> {
    let color_similarity = evaluate(body, criteria)?;
    Some(SearchResult {
        location: location.clone(),
        color_similarity,
        color: body.display_color(),
        sub_type: body.group_name().to_string(),
        body: body.clone(),
    })
}

fn log_summary(catalog: &Catalog, results: &GroupedResults) {
    debug!(
        candidates = catalog.len(),
        matches = results.total_matches(),
        groups = results.len(),
        "search complete"
    );
}

fn serialize_hex<S: Serializer>(color: &Rgb, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&color.to_hex())
}
