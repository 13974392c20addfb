// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! PlanLite - rule-based rewriting of relational query plans
//!
//! PlanLite takes an immutable physical plan tree and rewrites it into an
//! equivalent, cheaper one. The optimizer either runs a fixed starter
//! sequence of six rewrite rules or hands the plan to a caller-supplied
//! rule composition.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use planlite::{Catalog, Optimizer, OptimizerConfig, PhysicalBuilder};
//! use planlite::plan::expression::{col, eq, lit};
//!
//! let mut catalog = Catalog::new();
//! // ... create tables and indexes ...
//! let catalog = Arc::new(catalog);
//!
//! let plan = PhysicalBuilder::scan(&catalog, "orders_10k")?
//!     .filter(eq(col(0, 0), lit(42)))
//!     .build();
//!
//! let optimizer = Optimizer::new(Arc::clone(&catalog), OptimizerConfig::default());
//! println!("{}", optimizer.optimize(&plan).explain());
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Values, data types and schemas
//! - [`catalog`] - Tables, rows and index metadata
//! - [`plan`] - Plan trees, expressions, rewrite rules and the optimizer
//! - [`exec`] - Expression evaluation used by the reference executor
//! - [`error`] - Crate-level error types

pub mod catalog;
pub mod error;
pub mod exec;
pub mod plan;
pub mod types;

// Re-export main types for convenience
pub use catalog::{Catalog, CatalogError};
pub use error::{ConfigError, PlanLiteError};
pub use exec::ExecutionError;
pub use plan::cardinality::{estimated_cardinality, CardinalityEstimator, SuffixCardinalityEstimator};
pub use plan::optimizer::{OptimizationStrategy, Optimizer, OptimizerConfig};
pub use plan::optimizers::{CustomRuleComposition, OptimizedPlan, RewriteRule, RulePipeline};
pub use plan::physical_executor::PhysicalExecutor;
pub use plan::{PhysicalBuilder, PlanNode, PlanNodeRef, PlanningError};
pub use types::{Column, DataType, Schema, Value};

/// Load a serialized plan tree from JSON
pub fn plan_from_json_str(json: &str) -> std::result::Result<PlanNodeRef, ConfigError> {
    let plan: PlanNode = serde_json::from_str(json)?;
    Ok(std::sync::Arc::new(plan))
}

/// Load a serialized plan tree from a JSON file
pub fn plan_from_path(
    path: impl AsRef<std::path::Path>,
) -> std::result::Result<PlanNodeRef, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    plan_from_json_str(&json)
}
