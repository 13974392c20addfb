// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! In-memory catalog
//!
//! Holds table schemas, table rows and index metadata. Rewrite rules only read
//! index metadata from here; the executor also reads rows. Index contents are
//! not materialized: an index is a key-column list, and the executor derives
//! its ordered key map from the table rows when it needs one.

pub mod error;

pub use error::CatalogError;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ConfigError;
use crate::types::{Schema, Value};

/// A table and its rows
#[derive(Debug, Clone)]
pub struct TableInfo {
    pub name: String,
    pub schema: Schema,
    pub rows: Vec<Vec<Value>>,
}

/// Index metadata: an ordered list of key columns of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexInfo {
    pub name: String,
    pub table_name: String,
    pub key_columns: Vec<usize>,
}

/// Catalog of tables and indexes
#[derive(Debug, Default)]
pub struct Catalog {
    tables: HashMap<String, TableInfo>,
    indexes: HashMap<String, IndexInfo>,
    /// Index names per table, in creation order
    table_indexes: HashMap<String, Vec<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table
    pub fn create_table(&mut self, name: &str, schema: Schema) -> Result<(), CatalogError> {
        if self.tables.contains_key(name) {
            return Err(CatalogError::TableAlreadyExists(name.to_string()));
        }

        info!("Creating table '{}' {}", name, schema);
        self.tables.insert(
            name.to_string(),
            TableInfo {
                name: name.to_string(),
                schema,
                rows: Vec::new(),
            },
        );
        self.table_indexes.insert(name.to_string(), Vec::new());
        Ok(())
    }

    /// Append rows to a table, returning the number of rows inserted
    pub fn insert_rows(
        &mut self,
        table_name: &str,
        rows: Vec<Vec<Value>>,
    ) -> Result<usize, CatalogError> {
        let table = self
            .tables
            .get_mut(table_name)
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))?;

        let expected = table.schema.len();
        if let Some(bad) = rows.iter().find(|row| row.len() != expected) {
            return Err(CatalogError::ArityMismatch {
                table: table_name.to_string(),
                expected,
                actual: bad.len(),
            });
        }

        let count = rows.len();
        table.rows.extend(rows);
        debug!("Inserted {} rows into '{}'", count, table_name);
        Ok(count)
    }

    /// Create an index over the named key columns of a table
    pub fn create_index(
        &mut self,
        index_name: &str,
        table_name: &str,
        key_columns: &[&str],
    ) -> Result<(), CatalogError> {
        if self.indexes.contains_key(index_name) {
            return Err(CatalogError::IndexAlreadyExists(index_name.to_string()));
        }
        if key_columns.is_empty() {
            return Err(CatalogError::InvalidIndex(format!(
                "index '{}' has no key columns",
                index_name
            )));
        }

        let table = self
            .tables
            .get(table_name)
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))?;

        let mut resolved = Vec::with_capacity(key_columns.len());
        for column in key_columns {
            let idx = table
                .schema
                .index_of(column)
                .ok_or_else(|| CatalogError::ColumnNotFound {
                    table: table_name.to_string(),
                    column: column.to_string(),
                })?;
            resolved.push(idx);
        }

        info!(
            "Creating index '{}' on {}({})",
            index_name,
            table_name,
            key_columns.join(", ")
        );
        self.indexes.insert(
            index_name.to_string(),
            IndexInfo {
                name: index_name.to_string(),
                table_name: table_name.to_string(),
                key_columns: resolved,
            },
        );
        self.table_indexes
            .entry(table_name.to_string())
            .or_default()
            .push(index_name.to_string());
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableInfo> {
        self.tables.get(name)
    }

    pub fn index(&self, name: &str) -> Option<&IndexInfo> {
        self.indexes.get(name)
    }

    /// All indexes of a table, in creation order
    pub fn table_indexes(&self, table_name: &str) -> Vec<&IndexInfo> {
        self.table_indexes
            .get(table_name)
            .map(|names| names.iter().filter_map(|n| self.indexes.get(n)).collect())
            .unwrap_or_default()
    }

    /// First index of `table_name` whose key columns are exactly `key_columns`
    pub fn find_index(&self, table_name: &str, key_columns: &[usize]) -> Option<&IndexInfo> {
        self.table_indexes(table_name)
            .into_iter()
            .find(|index| index.key_columns == key_columns)
    }

    /// Build a catalog from a serialized definition
    pub fn from_definition(definition: CatalogDefinition) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::new();
        for table in definition.tables {
            catalog.create_table(&table.name, table.schema)?;
            catalog.insert_rows(&table.name, table.rows)?;
        }
        for index in definition.indexes {
            let keys: Vec<&str> = index.key_columns.iter().map(String::as_str).collect();
            catalog.create_index(&index.name, &index.table, &keys)?;
        }
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let definition: CatalogDefinition = serde_json::from_str(json)?;
        Ok(Self::from_definition(definition)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Serialized form of a catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDefinition {
    pub name: String,
    pub schema: Schema,
    #[serde(default)]
    pub rows: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDefinition {
    pub name: String,
    pub table: String,
    pub key_columns: Vec<String>,
}
