// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Ordered rule sequences
//!
//! A [`RulePipeline`] runs its rules once, in order, each rule consuming the
//! previous rule's output. There is no iteration to a fixed point.

use log::debug;
use std::fmt;
use std::sync::Arc;

use super::rule::{RewriteContext, RewriteRule, RuleTrace};
use crate::plan::node::PlanNodeRef;

/// An explicit, ordered list of rewrite rules
#[derive(Clone, Default)]
pub struct RulePipeline {
    rules: Vec<Arc<dyn RewriteRule>>,
}

impl RulePipeline {
    pub fn new(rules: Vec<Arc<dyn RewriteRule>>) -> Self {
        Self { rules }
    }

    /// Append a rule to the end of the pipeline
    pub fn with_rule<R: RewriteRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    pub fn rules(&self) -> &[Arc<dyn RewriteRule>] {
        &self.rules
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Pipeline made of the first `n` rules
    pub fn prefix(&self, n: usize) -> RulePipeline {
        RulePipeline {
            rules: self.rules.iter().take(n).cloned().collect(),
        }
    }

    /// Run every rule once, in order
    pub fn run(
        &self,
        plan: &PlanNodeRef,
        ctx: &RewriteContext<'_>,
        enable_trace: bool,
    ) -> OptimizedPlan {
        let mut current = Arc::clone(plan);
        let mut rules_applied = 0;
        let mut trace = Vec::new();

        for rule in &self.rules {
            let before = enable_trace.then(|| current.explain());
            let result = rule.apply(&current, ctx);

            if result.changed {
                rules_applied += 1;
                debug!("Rule '{}' rewrote the plan", rule.name());

                if let Some(before) = before {
                    trace.push(RuleTrace::new(rule.name(), before, result.plan.explain()));
                }
            }

            current = result.plan;
        }

        OptimizedPlan {
            plan: current,
            rules_applied,
            trace,
        }
    }
}

impl fmt::Debug for RulePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// The result of optimization with optional trace information
#[derive(Debug, Clone)]
pub struct OptimizedPlan {
    /// The final optimized plan.
    pub plan: PlanNodeRef,
    /// Number of rules that changed the plan.
    pub rules_applied: usize,
    /// Detailed trace of rule applications (if tracing was enabled).
    pub trace: Vec<RuleTrace>,
}

impl OptimizedPlan {
    /// Format the trace as a human-readable string.
    pub fn format_trace(&self) -> String {
        let mut output = format!("Optimization completed, {} rules applied\n", self.rules_applied);

        if self.trace.is_empty() {
            output.push_str("  (no trace available)\n");
        } else {
            for (i, entry) in self.trace.iter().enumerate() {
                output.push_str(&format!("\n--- Rule {} applied: {} ---\n", i + 1, entry.rule_name));
                output.push_str("Before:\n");
                output.push_str(&entry.before);
                output.push_str("After:\n");
                output.push_str(&entry.after);
            }
        }

        output
    }
}

/// Externally supplied rewrite used by the custom strategy
pub trait CustomRuleComposition: Send + Sync {
    fn optimize_custom(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> PlanNodeRef;
}

impl CustomRuleComposition for RulePipeline {
    fn optimize_custom(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> PlanNodeRef {
        self.run(plan, ctx, false).plan
    }
}

/// Composition that returns its input unchanged
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityComposition;

impl CustomRuleComposition for IdentityComposition {
    fn optimize_custom(&self, plan: &PlanNodeRef, _ctx: &RewriteContext<'_>) -> PlanNodeRef {
        Arc::clone(plan)
    }
}

/// Adapter turning a closure into a [`CustomRuleComposition`]
pub struct ClosureComposition<F>(pub F);

impl<F> CustomRuleComposition for ClosureComposition<F>
where
    F: Fn(&PlanNodeRef, &RewriteContext<'_>) -> PlanNodeRef + Send + Sync,
{
    fn optimize_custom(&self, plan: &PlanNodeRef, ctx: &RewriteContext<'_>) -> PlanNodeRef {
        (self.0)(plan, ctx)
    }
}
