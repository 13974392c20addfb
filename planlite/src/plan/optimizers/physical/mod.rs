// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Physical rewrite rules
//!
//! Rules that pick access paths and join algorithms using catalog metadata:
//! - nlj_as_index_join.rs - Index nested loop joins for equi joins
//! - order_by_as_index_scan.rs - Ordered index scans instead of sorts
//! - seq_scan_as_index_scan.rs - Index point lookups for equality filters
//! - join_reorder.rs - Smaller table on the outer side (cardinality based)

pub mod join_reorder;
pub mod nlj_as_index_join;
pub mod order_by_as_index_scan;
pub mod seq_scan_as_index_scan;

pub use join_reorder::JoinReorder;
pub use nlj_as_index_join::NljAsIndexJoin;
pub use order_by_as_index_scan::OrderByAsIndexScan;
pub use seq_scan_as_index_scan::SeqScanAsIndexScan;
