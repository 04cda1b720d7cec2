//! Plain-text rendering of search results for the terminal

use starsift_core::{CelestialBody, GroupedResults, SearchResult, TemperatureUnit};
use std::fmt;

/// Grouped results laid out the way the search page lists them
///
/// `scored` controls whether similarity percentages are printed; they only
/// mean something when a color was searched.
pub struct TextReport<'a> {
    pub results: &'a GroupedResults,
    pub unit: TemperatureUnit,
    pub scored: bool,
    pub details: bool,
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Found {} matching planets across {} subtypes:",
            self.results.total_matches(),
            self.results.len()
        )?;

        for group in self.results {
            writeln!(f, "\n{} ({} planets)", group.sub_type, group.len())?;
            for result in &group.results {
                write!(f, "  {}  {}", result.location, result.color.to_hex())?;
                if self.scored {
                    write!(f, "  {:.2}%", result.color_similarity)?;
                }
                writeln!(f)?;
                if self.details {
                    write_details(f, result, self.unit)?;
                }
            }
        }
        Ok(())
    }
}

pub fn render_text(
    results: &GroupedResults,
    unit: TemperatureUnit,
    scored: bool,
    details: bool,
) -> String {
    TextReport {
        results,
        unit,
        scored,
        details,
    }
    .to_string()
}

fn write_details(f: &mut fmt::Formatter<'_>, result: &SearchResult, unit: TemperatureUnit) -> fmt::Result {
    let body: &CelestialBody = &result.body;
    writeln!(f, "      Type: {}", body.type_name.as_deref().unwrap_or("Unknown"))?;
    writeln!(f, "      SubType: {}", body.group_name())?;
    writeln!(f, "      Temperature: {}", measure(body.temperature, unit.symbol()))?;
    writeln!(f, "      Gravity: {}", measure(body.gravity, "g"))?;
    writeln!(f, "      Atmosphere: {}", yes_no(body.atmosphere))?;
    writeln!(f, "      Tidally Locked: {}", yes_no(body.tidally_locked))?;
    writeln!(f, "      Has Rings: {}", yes_no(body.has_rings))?;
    let resources = if body.resources.is_empty() {
        "None".to_string()
    } else {
        body.resources.iter().cloned().collect::<Vec<_>>().join(", ")
    };
    writeln!(f, "      Resources: {}", resources)?;
    for (key, value) in &body.extra {
        writeln!(f, "      {}: {}", key, value)?;
    }
    Ok(())
}

fn measure(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "Unknown".to_string(), |v| format!("{} {}", v, suffix))
}

fn yes_no(flag: Option<bool>) -> &'static str {
    if flag.unwrap_or(false) {
        "Yes"
    } else {
        "No"
    }
}
