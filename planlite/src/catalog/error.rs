// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Catalog error types

use thiserror::Error;

/// Errors raised by catalog DDL and data loading
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    #[error("Row has {actual} values but table '{table}' has {expected} columns")]
    ArityMismatch {
        table: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid index definition: {0}")]
    InvalidIndex(String),
}
