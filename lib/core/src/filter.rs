// Criteria matching for a single record
use crate::body::CelestialBody;
use crate::color::Rgb;
use crate::criteria::{is_wildcard, SearchCriteria};

/// Score reported for a match when no color was asked for
pub const UNSCORED: f64 = 100.0;

pub trait Filter {
    fn matches(&self, body: &CelestialBody) -> bool;
}

impl Filter for SearchCriteria {
    fn matches(&self, body: &CelestialBody) -> bool {
        evaluate(body, self).is_some()
    }
}

/// Evaluate `body` against `criteria`
///
/// Returns the display score of a match: the color similarity when the
/// criteria carry a color, [`UNSCORED`] otherwise. Returns `None` as soon as
/// one field fails.
pub fn evaluate(body: &CelestialBody, criteria: &SearchCriteria) -> Option<f64> {
    if !text_matches(criteria.type_name.as_deref(), body.type_name.as_deref()) {
        return None;
    }
    if !text_matches(criteria.sub_type.as_deref(), body.sub_type.as_deref()) {
        return None;
    }
    if let Some(sub_type) = &body.sub_type {
        if criteria.excluded_sub_types.contains(sub_type) {
            return None;
        }
    }
    if !criteria.temperature.contains(body.temperature) {
        return None;
    }
    if !criteria.gravity.contains(body.gravity) {
        return None;
    }
    if !criteria.resources.is_subset(&body.resources) {
        return None;
    }
    if !flag_matches(criteria.atmosphere, body.atmosphere)
        || !flag_matches(criteria.tidally_locked, body.tidally_locked)
        || !flag_matches(criteria.has_rings, body.has_rings)
    {
        return None;
    }

    match &criteria.color {
        Some(target) => {
            let score = color_score(body, target);
            (score >= criteria.min_color_similarity).then_some(score)
        }
        None => Some(UNSCORED),
    }
}

/// Similarity of the record's color to `target`
///
/// A missing color is compared as black; a malformed one scores zero.
pub fn color_score(body: &CelestialBody, target: &Rgb) -> f64 {
    match &body.color {
        Some(color) => color.similarity_to(target),
        None => Rgb::BLACK.similarity(target),
    }
}

fn text_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    if is_wildcard(wanted) {
        return true;
    }
    actual.is_some() && actual == wanted
}

fn flag_matches(wanted: Option<bool>, actual: Option<bool>) -> bool {
    wanted.map_or(true, |w| actual.unwrap_or(false) == w)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::BodyColor;

    fn rocky() -> CelestialBody {
        CelestialBody::new("Rocky", "HighMetal")
            .with_color(Rgb::new(255, 0, 0))
            .with_resources(["Iron"])
            .with_temperature(20.0)
            .with_gravity(1.0)
            .with_atmosphere(true)
    }

    #[test]
    fn test_any_matches_unscored() {
        assert_eq!(evaluate(&rocky(), &SearchCriteria::any()), Some(UNSCORED));
    }

    #[test]
    fn test_type_and_sub_type() {
        let body = rocky();
        assert!(SearchCriteria::any().with_type("Rocky").matches(&body));
        assert!(SearchCriteria::any().with_type("").matches(&body));
        assert!(SearchCriteria::any().with_type("Any").matches(&body));
        assert!(!SearchCriteria::any().with_type("Gas").matches(&body));
        assert!(SearchCriteria::any().with_sub_type("HighMetal").matches(&body));
        assert!(!SearchCriteria::any().with_sub_type("Ice").matches(&body));

        let mut untyped = rocky();
        untyped.type_name = None;
        assert!(!SearchCriteria::any().with_type("Rocky").matches(&untyped));
        assert!(SearchCriteria::any().matches(&untyped));
    }

    #[test]
    fn test_excluded_sub_type_always_rejects() {
        let criteria = SearchCriteria::any()
            .with_type("Rocky")
            .with_sub_type("HighMetal")
            .excluding(["HighMetal"]);
        assert!(!criteria.matches(&rocky()));
        assert!(SearchCriteria::any().excluding(["Ice"]).matches(&rocky()));
    }

    #[test]
    fn test_numeric_ranges() {
        let body = rocky();
        assert!(SearchCriteria::any().with_temperature(Some(20.0), Some(20.0)).matches(&body));
        assert!(!SearchCriteria::any().with_temperature(Some(21.0), None).matches(&body));
        assert!(!SearchCriteria::any().with_gravity(None, Some(0.9)).matches(&body));

        let mut weightless = rocky();
        weightless.gravity = None;
        assert!(!SearchCriteria::any().with_gravity(Some(0.0), None).matches(&weightless));
        assert!(SearchCriteria::any().matches(&weightless));
    }

    #[test]
    fn test_resources_subset() {
        let body = rocky();
        assert!(SearchCriteria::any().requiring_resources(["Iron"]).matches(&body));
        assert!(!SearchCriteria::any().requiring_resources(["Iron", "Gold"]).matches(&body));
    }

    #[test]
    fn test_flags_default_to_false() {
        let body = rocky();
        assert!(SearchCriteria::any().with_atmosphere(Some(true)).matches(&body));
        assert!(!SearchCriteria::any().with_atmosphere(Some(false)).matches(&body));
        assert!(SearchCriteria::any().with_rings(Some(false)).matches(&body));
        assert!(!SearchCriteria::any().with_rings(Some(true)).matches(&body));
        assert!(SearchCriteria::any().with_tidally_locked(None).matches(&body));
    }

    #[test]
    fn test_color_threshold() {
        let body = rocky();
        let exact = SearchCriteria::any().with_color(Rgb::new(255, 0, 0), 100.0);
        assert_eq!(evaluate(&body, &exact), Some(100.0));

        let green = SearchCriteria::any().with_color(Rgb::new(0, 255, 0), 90.0);
        assert_eq!(evaluate(&body, &green), None);

        let lenient = SearchCriteria::any().with_color(Rgb::new(0, 255, 0), 0.0);
        let score = evaluate(&body, &lenient).unwrap();
        assert!((score - 18.35).abs() < 0.01);
    }

    #[test]
    fn test_missing_and_malformed_colors() {
        let mut body = rocky();
        body.color = None;
        let black = SearchCriteria::any().with_color(Rgb::BLACK, 100.0);
        assert_eq!(evaluate(&body, &black), Some(100.0));

        body.color = Some(BodyColor::Malformed);
        assert_eq!(evaluate(&body, &black), None);
        let lenient = SearchCriteria::any().with_color(Rgb::BLACK, 0.0);
        assert_eq!(evaluate(&body, &lenient), Some(0.0));
    }

    #[test]
    fn test_evaluation_is_repeatable() {
        let body = rocky();
        let criteria = SearchCriteria::any()
            .with_type("Rocky")
            .with_color(Rgb::new(200, 30, 30), 50.0);
        assert_eq!(evaluate(&body, &criteria), evaluate(&body, &criteria));
    }
}
