// Integration tests for Starsift
use serde_json::{json, Value};
use starsift::{
    search, search_json, search_parallel, Catalog, CatalogFormat, Error, Filter, Rgb,
    SearchCriteria, TemperatureUnit,
};
use std::io::Write;
use std::process::Command;

fn planet(sub_type: &str, color: [u8; 3]) -> Value {
    json!({
        "Type": "Rocky",
        "SubType": sub_type,
        "PrimaryColor": color,
        "Resources": {"Iron": 1},
        "Temperature": 20,
        "Gravity": 1.0,
        "Atmosphere": true,
        "TerrainConfig": {}
    })
}

fn single_planet_catalog() -> Value {
    json!({"Sol": {"(0, 0, 3)": planet("HighMetal", [255, 0, 0])}})
}

#[test]
fn test_type_search_returns_record_under_its_subtype() {
    let criteria = SearchCriteria::any().with_type("Rocky");
    let results = search_json(&single_planet_catalog(), CatalogFormat::default(), &criteria, None).unwrap();

    assert_eq!(results.len(), 1);
    let group = results.get("HighMetal").unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group.results[0].location.to_string(), "Sol, (0, 0, 3)");
    assert_eq!(group.results[0].color_similarity, 100.0);
}

#[test]
fn test_dissimilar_color_yields_nothing() {
    let criteria = SearchCriteria::any().with_color(Rgb::new(0, 255, 0), 90.0);
    let results = search_json(&single_planet_catalog(), CatalogFormat::default(), &criteria, None).unwrap();
    assert!(results.is_empty());
    assert_eq!(results.total_matches(), 0);
}

#[test]
fn test_missing_resource_rejects() {
    let criteria = SearchCriteria::any().requiring_resources(["Iron", "Gold"]);
    let results = search_json(&single_planet_catalog(), CatalogFormat::default(), &criteria, None).unwrap();
    assert!(results.is_empty());
}

#[test]
fn test_top_one_keeps_best_color_match() {
    // Against black, gray level v scores 100 * (1 - v / 255)
    let raw = json!({
        "A-60": planet("Ice", [102, 102, 102]),
        "A-80": planet("Ice", [51, 51, 51]),
    });
    let criteria = SearchCriteria::any().with_color(Rgb::BLACK, 0.0);
    let results = search_json(&raw, CatalogFormat::default(), &criteria, Some(1)).unwrap();

    let ice = results.get("Ice").unwrap();
    assert_eq!(ice.len(), 1);
    assert_eq!(ice.results[0].location.to_string(), "A-80");
    assert!((ice.results[0].color_similarity - 80.0).abs() < 1e-9);
}

#[test]
fn test_invalid_records_are_skipped_silently() {
    let mut no_terrain = planet("Lava", [1, 1, 1]);
    no_terrain.as_object_mut().unwrap().remove("TerrainConfig");
    let mut bad_temp = planet("Lava", [1, 1, 1]);
    bad_temp["Temperature"] = json!("scorching");

    let raw = json!({
        "Sol": {
            "a": planet("Lava", [1, 1, 1]),
            "b": no_terrain,
            "c": bad_temp,
            "d": "not a record",
        }
    });
    let catalog = Catalog::from_value(&raw, CatalogFormat::default()).unwrap();
    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.skipped(), 3);

    let results = search(&catalog, &SearchCriteria::any(), None);
    assert_eq!(results.total_matches(), 1);
}

#[test]
fn test_mistyped_flag_only_fails_its_own_criterion() {
    let mut ringed = planet("HighMetal", [255, 0, 0]);
    ringed["HasRings"] = json!("no");
    let raw = json!({"a": ringed});

    let all = search_json(&raw, CatalogFormat::default(), &SearchCriteria::any(), None).unwrap();
    assert_eq!(all.total_matches(), 1);

    let criteria = SearchCriteria::any().with_type("Rocky").with_rings(Some(true));
    let rings = search_json(&raw, CatalogFormat::default(), &criteria, None).unwrap();
    assert!(rings.is_empty());
}

#[test]
fn test_non_mapping_catalog_is_an_error() {
    let result = search_json(&json!([planet("Lava", [0, 0, 0])]), CatalogFormat::default(), &SearchCriteria::any(), None);
    assert!(matches!(result, Err(Error::InvalidCatalog(_))));
}

#[test]
fn test_exclusion_beats_every_other_match() {
    let catalog = Catalog::from_value(&single_planet_catalog(), CatalogFormat::default()).unwrap();
    let criteria = SearchCriteria::any()
        .with_type("Rocky")
        .with_sub_type("HighMetal")
        .requiring_resources(["Iron"])
        .with_color(Rgb::new(255, 0, 0), 100.0)
        .excluding(["HighMetal"]);
    let (_, body) = &catalog.entries()[0];
    assert!(!criteria.matches(body));
}

#[test]
fn test_mixed_shapes_and_color_field() {
    let mut legacy = planet("Desert", [200, 150, 100]);
    let color = legacy.as_object_mut().unwrap().remove("PrimaryColor").unwrap();
    legacy["Color"] = color;

    let raw = json!({
        "Kepler-22b": legacy.clone(),
        "Kepler": {"(1, 2, 3)": legacy},
    });
    let format = CatalogFormat {
        color_field: "Color".to_string(),
        temperature_unit: TemperatureUnit::Fahrenheit,
        ..Default::default()
    };
    let catalog = Catalog::from_value(&raw, format).unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.format().temperature_unit, TemperatureUnit::Fahrenheit);

    let criteria = SearchCriteria::any().with_color(Rgb::new(200, 150, 100), 99.0);
    let seq = search(&catalog, &criteria, None);
    let par = search_parallel(&catalog, &criteria, None);
    assert_eq!(seq.total_matches(), 2);
    assert_eq!(par.total_matches(), 2);
}

#[test]
fn test_group_order_follows_document_order() {
    let raw = json!({
        "z": planet("Zeta", [0, 0, 0]),
        "a": planet("Alpha", [0, 0, 0]),
        "m": planet("Zeta", [0, 0, 0]),
    });
    let results = search_json(&raw, CatalogFormat::default(), &SearchCriteria::any(), None).unwrap();
    let order: Vec<&str> = results.iter().map(|g| g.sub_type.as_str()).collect();
    assert_eq!(order, vec!["Zeta", "Alpha"]);
}

#[test]
fn test_cli_search_json_output() {
    let mut catalog = tempfile::NamedTempFile::new().unwrap();
    let raw = json!({
        "Sol": {
            "(0, 0, 1)": planet("HighMetal", [250, 0, 0]),
            "(0, 0, 2)": planet("HighMetal", [255, 0, 0]),
            "(0, 0, 3)": planet("Ice", [0, 0, 255]),
        }
    });
    write!(catalog, "{}", raw).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_starsift"))
        .args(["search", "--catalog"])
        .arg(catalog.path())
        .args(["--type", "Rocky", "--color", "#ff0000", "--min-similarity", "50", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let groups: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups[0]["SubType"], json!("HighMetal"));
    assert_eq!(groups[0]["Results"][0]["Location"], json!("Sol, (0, 0, 2)"));
    assert_eq!(groups[0]["Results"][1]["Location"], json!("Sol, (0, 0, 1)"));
}

#[test]
fn test_cli_rejects_out_of_range_similarity() {
    let mut catalog = tempfile::NamedTempFile::new().unwrap();
    write!(catalog, "{}", single_planet_catalog()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_starsift"))
        .args(["search", "--catalog"])
        .arg(catalog.path())
        .args(["--color", "#000000", "--min-similarity", "120"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
