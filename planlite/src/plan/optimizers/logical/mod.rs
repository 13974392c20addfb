// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Logical rewrite rules
//!
//! Rules that reshape the tree without consulting index metadata:
//! - merge_projection.rs - Remove identity projections, collapse stacked ones
//! - merge_filter_nlj.rs - Fold filters into nested loop join predicates
//! - merge_filter_scan.rs - Push filters into sequential scans

pub mod merge_filter_nlj;
pub mod merge_filter_scan;
pub mod merge_projection;

pub use merge_filter_nlj::MergeFilterNlj;
pub use merge_filter_scan::MergeFilterScan;
pub use merge_projection::MergeProjection;
