//! CLI commands run through RunContext against fixture files

use super::test_utils::{with_xdg_env, write_fixture};
use clap::Parser;
use memrepo::cli::{Cli, Commands, ExportFormat, RunContext};
use memrepo::config::MemrepoConfig;
use memrepo::ApiError;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = r#"
[[node]]
path = "/a"

[node.properties]
t = "hello"
tags = ["x", "y"]

[[node.node]]
path = "/a/b"
type = "nt:folder"
"#;

fn context(test_dir: &TempDir) -> RunContext {
    let project = test_dir.path().join("project");
    fs::create_dir_all(&project).unwrap();
    with_xdg_env(test_dir, || RunContext::new(project, None)).unwrap()
}

#[test]
fn test_show_lists_items() {
    let test_dir = TempDir::new().unwrap();
    let fixture = write_fixture(&test_dir, "fixture.toml", FIXTURE);
    let ctx = context(&test_dir);

    let output = ctx
        .execute(&Commands::Show {
            fixture,
            path: "/a".to_string(),
        })
        .unwrap();
    assert!(output.contains("/a/t"));
    assert!(output.contains("hello"));
    assert!(output.contains("property[]"));
    assert!(output.contains("nt:folder"));
}

#[test]
fn test_export_compact_document() {
    let test_dir = TempDir::new().unwrap();
    let fixture = write_fixture(&test_dir, "fixture.toml", FIXTURE);
    let ctx = context(&test_dir);

    let output = ctx
        .execute(&Commands::Export {
            fixture,
            path: "/a".to_string(),
            format: ExportFormat::Compact,
        })
        .unwrap();
    let document: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(document["t"], "hello");
    assert_eq!(document["tags"], serde_json::json!(["x", "y"]));
    assert_eq!(document["b"]["jcr:primaryType"], "nt:folder");
    assert!(!output.contains('\n'));
}

#[test]
fn test_check_reports_item_count() {
    let test_dir = TempDir::new().unwrap();
    let fixture = write_fixture(&test_dir, "fixture.toml", FIXTURE);
    let ctx = context(&test_dir);

    let output = ctx.execute(&Commands::Check { fixture }).unwrap();
    // root, /a with three properties, /a/b with its type
    assert!(output.ends_with("ok (7 items)"));
}

#[test]
fn test_missing_subtree_is_an_error() {
    let test_dir = TempDir::new().unwrap();
    let fixture = write_fixture(&test_dir, "fixture.toml", FIXTURE);
    let ctx = RunContext::from_config(MemrepoConfig::default());

    let err = ctx
        .execute(&Commands::Show {
            fixture,
            path: "/missing".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::Repository(_)));
}

#[test]
fn test_project_config_applies_to_fixtures() {
    let test_dir = TempDir::new().unwrap();
    let project = test_dir.path().join("project");
    fs::create_dir_all(&project).unwrap();
    fs::write(
        project.join("memrepo.toml"),
        "[session]\ndefault_node_type = \"sling:Folder\"\n",
    )
    .unwrap();
    let fixture = write_fixture(&test_dir, "fixture.toml", FIXTURE);

    let ctx = with_xdg_env(&test_dir, || RunContext::new(project, None)).unwrap();
    let session = ctx.load_fixture(&fixture).unwrap();
    assert_eq!(
        session.get_node("/a").unwrap().primary_type(),
        "sling:Folder"
    );
}

#[test]
fn test_parse_export_arguments() {
    let cli = Cli::try_parse_from([
        "memrepo",
        "--root",
        "/tmp/project",
        "export",
        "fixture.json",
        "--path",
        "/a",
        "--format",
        "compact",
    ])
    .unwrap();
    match cli.command {
        Commands::Export { path, format, .. } => {
            assert_eq!(path, "/a");
            assert_eq!(format, ExportFormat::Compact);
        }
        _ => panic!("expected export command"),
    }
}
