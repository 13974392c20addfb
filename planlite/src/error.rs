// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Crate-level error types

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::exec::ExecutionError;
use crate::plan::PlanningError;

/// Errors raised while loading configuration, catalogs or plans from disk
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Umbrella error for callers that drive the whole crate
#[derive(Error, Debug)]
pub enum PlanLiteError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Planning(#[from] PlanningError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}
