// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for the CLI

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use planlite::exec::Row;
use planlite::{Schema, Value};

use super::commands::OutputFormat;

/// Formats executed rows and plan listings
pub struct ResultFormatter;

#[derive(Serialize)]
struct JsonRows<'a> {
    columns: Vec<&'a str>,
    rows: &'a [Row],
}

impl ResultFormatter {
    pub fn heading(text: &str) -> String {
        text.bold().cyan().to_string()
    }

    /// Render rows in the requested format
    pub fn format_rows(
        schema: &Schema,
        rows: &[Row],
        format: OutputFormat,
    ) -> Result<String, serde_json::Error> {
        match format {
            OutputFormat::Table => Ok(Self::format_table(schema, rows)),
            OutputFormat::Json => Self::format_json(schema, rows),
        }
    }

    pub fn format_table(schema: &Schema, rows: &[Row]) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(schema.columns.iter().map(|c| c.name.clone()));

        for row in rows {
            table.add_row(row.iter().map(Self::format_value));
        }

        format!("{}\n{} row(s)", table, rows.len())
    }

    pub fn format_json(schema: &Schema, rows: &[Row]) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonRows {
            columns: schema.columns.iter().map(|c| c.name.as_str()).collect(),
            rows,
        })
    }

    fn format_value(value: &Value) -> String {
        match value {
            Value::Null => "NULL".to_string(),
            Value::Varchar(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Two-column name/description table
    pub fn format_listing<'a>(
        header: [&str; 2],
        entries: impl IntoIterator<Item = (&'a str, String)>,
    ) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(header);
        for (name, detail) in entries {
            table.add_row(vec![name.to_string(), detail]);
        }
        table.to_string()
    }
}
