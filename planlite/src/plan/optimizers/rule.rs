// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Rewrite rule abstraction
//!
//! A rewrite rule is a total function from a plan to an equivalent plan:
//! same rows, same columns, same ordering where ordering is required. A rule
//! whose precondition does not hold returns its input unchanged.

use std::fmt;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::plan::cardinality::CardinalityEstimator;
use crate::plan::node::{PlanNode, PlanNodeRef};

/// Read-only collaborators available to every rule
#[derive(Clone, Copy)]
pub struct RewriteContext<'a> {
    pub catalog: &'a Catalog,
    pub cardinality: &'a dyn CardinalityEstimator,
}

impl<'a> RewriteContext<'a> {
    pub fn new(catalog: &'a Catalog, cardinality: &'a dyn CardinalityEstimator) -> Self {
        Self {
            catalog,
            cardinality,
        }
    }
}

impl fmt::Debug for RewriteContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewriteContext")
            .field("cardinality", &self.cardinality)
            .finish_non_exhaustive()
    }
}

/// A single equivalence-preserving plan rewrite
pub trait RewriteRule: Send + Sync {
    /// Get the name of this rule.
    fn name(&self) -> &'static str;

    /// Get a description of what this rule does.
    fn description(&self) -> &'static str {
        "No description available"
    }

    /// Apply this rule to the whole plan.
    fn apply(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> Transformed;
}

/// The result of applying a rewrite rule
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The (potentially transformed) plan.
    pub plan: PlanNodeRef,
    /// Whether the plan was actually changed.
    pub changed: bool,
}

impl Transformed {
    pub fn yes(plan: PlanNodeRef) -> Self {
        Self {
            plan,
            changed: true,
        }
    }

    pub fn no(plan: PlanNodeRef) -> Self {
        Self {
            plan,
            changed: false,
        }
    }
}

/// Rewrite a plan bottom-up.
///
/// Children are rewritten first; `f` is then offered the (possibly rebuilt)
/// node and returns `Some` to replace it. Subtrees where nothing changed are
/// returned as the original handles, so unchanged parts of the input are
/// shared with the output.
pub fn transform_up<F>(plan: &PlanNodeRef, f: &F) -> Transformed
where
    F: Fn(&PlanNodeRef) -> Option<PlanNodeRef>,
{
    let mut children_changed = false;
    let mut children = Vec::new();
    for child in plan.children() {
        let result = transform_up(child, f);
        children_changed |= result.changed;
        children.push(result.plan);
    }

    let node = if children_changed {
        Arc::new(plan.with_children(children))
    } else {
        Arc::clone(plan)
    };

    match f(&node) {
        Some(rewritten) => Transformed::yes(rewritten),
        None => Transformed {
            plan: node,
            changed: children_changed,
        },
    }
}

/// A trace entry for a rule that rewrote the plan
#[derive(Debug, Clone)]
pub struct RuleTrace {
    /// The name of the rule that was applied.
    pub rule_name: String,
    /// The plan before the rule was applied (as explain string).
    pub before: String,
    /// The plan after the rule was applied (as explain string).
    pub after: String,
}

impl RuleTrace {
    pub fn new(
        rule_name: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> Self {
        Self {
            rule_name: rule_name.into(),
            before: before.into(),
            after: after.into(),
        }
    }
}

/// Convenience for rules that only look at single nodes
pub(crate) fn rewrite_nodes<F>(plan: &PlanNodeRef, f: F) -> Transformed
where
    F: Fn(&PlanNode) -> Option<PlanNode>,
{
    transform_up(plan, &|node: &PlanNodeRef| f(node.as_ref()).map(Arc::new))
}
