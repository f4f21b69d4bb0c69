//! CLI presentation: tables and documents rendered to strings.

use super::parse::ExportFormat;
use crate::error::{ApiError, RepositoryError};
use crate::item::{ItemHandle, Node};
use crate::session::Session;
use crate::value::PropertyValue;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use std::path::Path;

/// Table of every item at and beneath `path`, depth-first.
pub fn format_items_table(session: &Session, path: &str) -> Result<String, RepositoryError> {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Kind", "Type", "Value"]);
    add_node_rows(&mut table, &session.get_node(path)?)?;
    Ok(table.to_string())
}

fn add_node_rows(table: &mut Table, node: &Node) -> Result<(), RepositoryError> {
    table.add_row(vec![
        node.path(),
        "node".to_string(),
        node.primary_type(),
        String::new(),
    ]);
    for property in node.properties()? {
        let content = property.content()?;
        let (kind, value) = match &content {
            PropertyValue::Single(v) => ("property", v.to_string()),
            PropertyValue::Multiple(values) => (
                "property[]",
                values
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            ),
        };
        table.add_row(vec![
            property.path(),
            kind.to_string(),
            content.value_type().to_string(),
            value,
        ]);
    }
    for child in node.nodes()? {
        add_node_rows(table, &child)?;
    }
    Ok(())
}

pub fn format_export(document: &serde_json::Value, format: ExportFormat) -> Result<String, ApiError> {
    let rendered = match format {
        ExportFormat::Pretty => serde_json::to_string_pretty(document),
        ExportFormat::Compact => serde_json::to_string(document),
    };
    rendered.map_err(|e| ApiError::FixtureError(format!("Failed to render JSON: {}", e)))
}

pub fn format_check_summary(fixture: &Path, session: &Session) -> String {
    format!(
        "{}: ok ({} items)",
        fixture.display(),
        session.item_count()
    )
}
