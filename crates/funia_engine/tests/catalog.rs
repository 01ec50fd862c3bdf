use std::fs;

use funia_engine::{is_valid, list_effects, CatalogError, EffectCatalog, EffectDescriptor};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const SMALL_CATALOG: &str = r#"[
    {"uniquename": "calendar", "key": "calendar"},
    {"uniquename": "smokeflare", "key": "smoke-flare"},
    {"uniquename": "wanted", "key": "wanted-poster"}
]"#;

#[test]
fn every_listed_effect_is_valid_and_nothing_else() {
    let effects = list_effects();
    assert!(!effects.is_empty());
    for name in &effects {
        assert!(is_valid(name), "{name} should be valid");
    }
    assert!(!is_valid("definitely-not-an-effect"));
    assert!(!is_valid(""));
    // Keys are not names.
    assert!(!is_valid("smoke-flare"));
}

#[test]
fn listing_matches_catalog_size_and_is_stable() {
    let catalog = EffectCatalog::builtin();
    let first = list_effects();
    let second = list_effects();
    assert_eq!(first.len(), catalog.len());
    assert_eq!(first, second);
}

#[test]
fn listing_keeps_dataset_order() {
    let catalog = EffectCatalog::from_json(SMALL_CATALOG).unwrap();
    assert_eq!(
        catalog.list_effects(),
        vec!["calendar", "smokeflare", "wanted"]
    );
}

#[test]
fn lookup_returns_service_key() {
    let catalog = EffectCatalog::from_json(SMALL_CATALOG).unwrap();
    assert_eq!(
        catalog.get("wanted"),
        Some(&EffectDescriptor {
            unique_name: "wanted".to_string(),
            key: "wanted-poster".to_string(),
        })
    );
    assert_eq!(catalog.get("Wanted"), None);
}

#[test]
fn catalog_loads_from_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("effects.json");
    fs::write(&path, SMALL_CATALOG).unwrap();

    let catalog = EffectCatalog::load(&path).unwrap();
    assert_eq!(catalog.len(), 3);
    assert!(catalog.is_valid("smokeflare"));
}

#[test]
fn catalog_load_reports_missing_and_malformed_files() {
    let temp = TempDir::new().unwrap();
    let missing = EffectCatalog::load(&temp.path().join("nope.json")).unwrap_err();
    assert!(matches!(missing, CatalogError::Io(_)));

    let path = temp.path().join("broken.json");
    fs::write(&path, r#"[{"uniquename": "calendar"}]"#).unwrap();
    let broken = EffectCatalog::load(&path).unwrap_err();
    assert!(matches!(broken, CatalogError::Parse(_)));
}
