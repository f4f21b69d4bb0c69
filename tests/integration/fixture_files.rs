//! Fixture files on disk built into repositories

use super::test_utils::write_fixture;
use memrepo::fixture::FixtureDocument;
use memrepo::{ApiError, Decimal, ItemHandle, ValueType};
use tempfile::TempDir;

const SITE_TOML: &str = r#"
[[node]]
path = "/site"
type = "nt:folder"

[node.properties]
title = "Site"
languages = ["en", "de"]

[[node.node]]
path = "/site/en"

[node.node.properties]
weight = { type = "decimal", value = "-0.25" }
visits = 42

[[node]]
path = "/assets"
"#;

#[test]
fn test_toml_file_builds_saved_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(&dir, "site.toml", SITE_TOML);

    let repository = FixtureDocument::load(&path)
        .unwrap()
        .to_builder()
        .unwrap()
        .build()
        .unwrap();
    let session = repository.login();

    assert!(!session.has_pending_changes());
    assert!(session.verify_index().is_ok());

    let site = session.get_node("/site").unwrap();
    assert_eq!(site.primary_type(), "nt:folder");
    assert_eq!(site.property("languages").unwrap().values().unwrap().len(), 2);

    let en = session.get_node("/site/en").unwrap();
    assert_eq!(
        en.property("weight").unwrap().get_decimal().unwrap(),
        Decimal::new(-25, 2).unwrap()
    );
    assert_eq!(
        en.property("visits").unwrap().value_type().unwrap(),
        ValueType::Long
    );

    let top: Vec<String> = session
        .root_node()
        .nodes()
        .unwrap()
        .map(|n| n.path())
        .collect();
    assert_eq!(top, vec!["/site", "/assets"]);
}

#[test]
fn test_json_file_builds_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(
        &dir,
        "site.json",
        r#"{
  "node": [
    {
      "path": "/site",
      "properties": {
        "flag": false,
        "created": { "type": "date", "value": "2023-05-06T07:08:09+02:00" }
      },
      "node": [{ "path": "/site/en", "type": "nt:folder" }]
    }
  ]
}"#,
    );

    let session = FixtureDocument::load(&path)
        .unwrap()
        .to_builder()
        .unwrap()
        .build()
        .unwrap()
        .login();

    assert!(!session.get_property("/site/flag").unwrap().get_boolean().unwrap());
    assert_eq!(
        session
            .get_property("/site/created")
            .unwrap()
            .value_type()
            .unwrap(),
        ValueType::Date
    );
    assert!(session.get_node("/site/en").unwrap().is_node_type("nt:folder"));
}

#[test]
fn test_malformed_files_report_fixture_errors() {
    let dir = TempDir::new().unwrap();
    let toml = write_fixture(&dir, "broken.toml", "[[node]\npath = ");
    let json = write_fixture(&dir, "broken.json", "{\"node\": [");

    assert!(matches!(
        FixtureDocument::load(&toml),
        Err(ApiError::FixtureError(_))
    ));
    assert!(matches!(
        FixtureDocument::load(&json),
        Err(ApiError::FixtureError(_))
    ));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    assert!(matches!(
        FixtureDocument::load(&dir.path().join("absent.toml")),
        Err(ApiError::Io(_))
    ));
}

#[test]
fn test_unknown_value_type_rejected() {
    let document = FixtureDocument::from_toml_str(
        r#"
[[node]]
path = "/a"
[node.properties]
odd = { type = "weakreference", value = "x" }
"#,
    )
    .unwrap();
    assert!(document.to_builder().is_err());
}

#[test]
fn test_duplicate_fixture_nodes_fail_to_build() {
    let document = FixtureDocument::from_toml_str(
        r#"
[[node]]
path = "/a"

[[node]]
path = "/a"
"#,
    )
    .unwrap();
    assert!(matches!(
        document.to_builder().unwrap().build(),
        Err(memrepo::RepositoryError::AlreadyExists(_))
    ));
}
