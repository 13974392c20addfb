// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Execution error types

use thiserror::Error;

use crate::types::DataType;

/// Errors raised while running a plan against catalog data
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Type mismatch: cannot apply {op} to {left} and {right}")]
    TypeMismatch {
        op: String,
        left: String,
        right: String,
    },

    #[error("Expected {expected} value, got {actual}")]
    UnexpectedType { expected: DataType, actual: String },

    #[error("Column #{tuple_idx}.{col_idx} is out of range")]
    ColumnOutOfRange { tuple_idx: usize, col_idx: usize },

    #[error("Expression references the right tuple outside of a join")]
    MissingRightTuple,

    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}
