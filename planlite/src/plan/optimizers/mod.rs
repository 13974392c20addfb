// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Rule-based plan optimizers
//!
//! - rule.rs - The rewrite rule trait and bottom-up traversal
//! - pipeline.rs - Ordered rule sequences and custom compositions
//! - logical/ - Rules that reshape the tree
//! - physical/ - Rules that choose indexes and join algorithms

pub mod logical;
pub mod physical;
pub mod pipeline;
pub mod rule;

use std::sync::Arc;

pub use logical::{MergeFilterNlj, MergeFilterScan, MergeProjection};
pub use physical::{JoinReorder, NljAsIndexJoin, OrderByAsIndexScan, SeqScanAsIndexScan};
pub use pipeline::{
    ClosureComposition, CustomRuleComposition, IdentityComposition, OptimizedPlan, RulePipeline,
};
pub use rule::{transform_up, RewriteContext, RewriteRule, RuleTrace, Transformed};

/// The starter rule sequence, in application order
pub fn starter_rules() -> Vec<Arc<dyn RewriteRule>> {
    vec![
        Arc::new(MergeProjection),
        Arc::new(MergeFilterNlj),
        Arc::new(NljAsIndexJoin),
        Arc::new(OrderByAsIndexScan),
        Arc::new(MergeFilterScan),
        Arc::new(SeqScanAsIndexScan),
    ]
}

/// Every rule known by name, starter rules first
pub fn all_rules() -> Vec<Arc<dyn RewriteRule>> {
    let mut rules = starter_rules();
    rules.push(Arc::new(JoinReorder));
    rules
}

/// Look up a rule by its name, case-insensitively
pub fn rule_by_name(name: &str) -> Option<Arc<dyn RewriteRule>> {
    all_rules()
        .into_iter()
        .find(|rule| rule.name().eq_ignore_ascii_case(name))
}
