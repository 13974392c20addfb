// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for PlanLite
//!
//! Loads catalogs and plans from JSON, runs the optimizer and reports the
//! rewritten plan, optionally executing both plans side by side.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_cardinality, handle_optimize, handle_rules, handle_version};
