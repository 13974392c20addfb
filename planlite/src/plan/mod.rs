// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Query plans and their optimization
//!
//! This module holds the physical plan tree, the expressions it carries,
//! the rule-based optimizer that rewrites it, and a reference executor
//! used to check that rewrites preserve results.

pub mod builders;
pub mod cardinality;
pub mod expression;
pub mod node;
pub mod optimizer;
pub mod optimizers;
pub mod physical_executor;

use thiserror::Error;

pub use builders::PhysicalBuilder;
pub use node::{JoinType, OrderBy, OrderDirection, PlanNode, PlanNodeRef};

/// Planning errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanningError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Column index {index} out of range for input of width {width}")]
    ColumnOutOfRange { index: usize, width: usize },
}
