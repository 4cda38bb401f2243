//! Tests for loading declared perspectives from disk

use perspective_schema::config::MAX_CONFIG_SIZE;
use perspective_schema::{CombineWith, Error, GroupType, PerspectiveConfig};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const SAMPLE: &str = r#"
name = "Cost Centers"
include_in_reports = true

[[group]]
name = "Owner"
type = "categorize"

[[group.rule]]
asset = "AwsAsset"
tag_field = ["owner"]

[[group]]
name = "Production"
ref_id = "3"

[[group.rule]]
asset = "AwsAccount"

[group.rule.condition]
combine_with = "or"

[[group.rule.condition.clause]]
field = ["Name"]
op = "Contains"
val = "prod"

[[group.rule.condition.clause]]
tag_field = ["env"]
val = "production"
"#;

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("perspective.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_sample_config() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, SAMPLE);

    let config = PerspectiveConfig::load(&path).unwrap();
    assert_eq!(config.name, "Cost Centers");
    assert!(config.include_in_reports);
    assert_eq!(config.groups.len(), 2);

    let owner = &config.groups[0];
    assert_eq!(owner.kind, GroupType::Categorize);
    assert_eq!(owner.rules[0].tag_fields, vec!["owner"]);
    assert!(owner.rules[0].condition.is_none());

    let production = &config.groups[1];
    assert_eq!(production.kind, GroupType::Filter);
    assert_eq!(production.ref_id, "3");
    let condition = production.rules[0].condition.as_ref().unwrap();
    assert_eq!(condition.combine_with, Some(CombineWith::Or));
    assert_eq!(condition.clauses.len(), 2);
    assert_eq!(condition.clauses[0].op, "Contains");
    assert_eq!(condition.clauses[1].op, "=");
    assert_eq!(condition.clauses[1].tag_fields, vec!["env"]);
}

#[test]
fn test_load_missing_config() {
    let dir = TempDir::new().unwrap();
    let err = PerspectiveConfig::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, Error::ConfigNotFound { .. }));
}

#[test]
fn test_load_invalid_toml_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "name = \n");

    let err = PerspectiveConfig::load(&path).unwrap_err();
    match err {
        Error::InvalidConfig { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}

#[test]
fn test_load_rejects_oversized_config() {
    let dir = TempDir::new().unwrap();
    let padding = "#".repeat(MAX_CONFIG_SIZE as usize + 1);
    let path = write_config(&dir, &padding);

    let err = PerspectiveConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::ConfigTooLarge { .. }));
}

#[test]
fn test_load_runs_validation() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "include_in_reports = false\n");

    let err = PerspectiveConfig::load(&path).unwrap_err();
    assert!(matches!(err, Error::MissingName));
}

#[test]
fn test_config_serializes_back_to_toml() {
    let config = PerspectiveConfig::parse(SAMPLE).unwrap();
    let rendered = toml::to_string(&config).unwrap();
    let reparsed = PerspectiveConfig::parse(&rendered).unwrap();
    assert_eq!(reparsed, config);
}
