// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! Query plan optimizer
//!
//! This module provides the main optimization entry point. An [`Optimizer`]
//! is configured once with a catalog, a cardinality estimator and a
//! strategy, then rewrites plans either through the fixed starter rule
//! sequence or through a caller-supplied [`CustomRuleComposition`].

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::ConfigError;
use crate::plan::cardinality::{CardinalityEstimator, SuffixCardinalityEstimator};
use crate::plan::node::PlanNodeRef;
use crate::plan::optimizers::{
    starter_rules, CustomRuleComposition, IdentityComposition, OptimizedPlan, RewriteContext,
    RulePipeline,
};

/// Environment variable overriding [`OptimizerConfig::force_starter_rule`]
pub const FORCE_STARTER_RULE_ENV: &str = "PLANLITE_FORCE_STARTER_RULE";

/// Configuration for the optimizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Run the fixed starter rule sequence instead of the custom composition.
    pub force_starter_rule: bool,
    /// Record a before/after trace for every rule that fires.
    pub enable_trace: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            force_starter_rule: true,
            enable_trace: false,
        }
    }
}

impl OptimizerConfig {
    /// Choose between the starter sequence and the custom composition.
    pub fn with_starter_rules(mut self, force: bool) -> Self {
        self.force_starter_rule = force;
        self
    }

    /// Enable or disable tracing.
    pub fn with_trace(mut self, enable: bool) -> Self {
        self.enable_trace = enable;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Apply [`FORCE_STARTER_RULE_ENV`] from the process environment
    pub fn with_env_overrides(self) -> Self {
        let value = std::env::var(FORCE_STARTER_RULE_ENV).ok();
        self.apply_env_override(value.as_deref())
    }

    /// Apply a raw override value; unrecognized values are ignored
    pub fn apply_env_override(mut self, value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return self;
        };
        match parse_flag(raw) {
            Some(force) => {
                debug!("{} overrides force_starter_rule to {}", FORCE_STARTER_RULE_ENV, force);
                self.force_starter_rule = force;
            }
            None => warn!(
                "Ignoring invalid value '{}' for {}",
                raw, FORCE_STARTER_RULE_ENV
            ),
        }
        self
    }

    pub fn strategy(&self) -> OptimizationStrategy {
        if self.force_starter_rule {
            OptimizationStrategy::Starter
        } else {
            OptimizationStrategy::Custom
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Which rewrite path an optimizer takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptimizationStrategy {
    Starter,
    Custom,
}

impl fmt::Display for OptimizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizationStrategy::Starter => write!(f, "starter"),
            OptimizationStrategy::Custom => write!(f, "custom"),
        }
    }
}

/// Rewrites plans with either the starter rules or a custom composition.
///
/// The strategy is fixed at construction. Plans are never mutated: nodes
/// that no rule touched are shared between input and output.
pub struct Optimizer {
    catalog: Arc<Catalog>,
    cardinality: Arc<dyn CardinalityEstimator>,
    config: OptimizerConfig,
    starter: RulePipeline,
    custom: Arc<dyn CustomRuleComposition>,
}

impl Optimizer {
    pub fn new(catalog: Arc<Catalog>, config: OptimizerConfig) -> Self {
        Self {
            catalog,
            cardinality: Arc::new(SuffixCardinalityEstimator::default()),
            config,
            starter: RulePipeline::new(starter_rules()),
            custom: Arc::new(IdentityComposition),
        }
    }

    /// Replace the table size estimator used by cardinality-aware rules
    pub fn with_cardinality_estimator(mut self, estimator: Arc<dyn CardinalityEstimator>) -> Self {
        self.cardinality = estimator;
        self
    }

    /// Set the composition run by the custom strategy
    pub fn with_custom_rules<C: CustomRuleComposition + 'static>(mut self, custom: C) -> Self {
        self.custom = Arc::new(custom);
        self
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    pub fn strategy(&self) -> OptimizationStrategy {
        self.config.strategy()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Names of the starter rules, in application order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.starter.names()
    }

    /// Forwarded to the configured estimator
    pub fn estimated_cardinality(&self, table_name: &str) -> Option<usize> {
        self.cardinality.estimated_cardinality(table_name)
    }

    fn context(&self) -> RewriteContext<'_> {
        RewriteContext::new(&self.catalog, self.cardinality.as_ref())
    }

    /// Optimize a plan with the configured strategy
    pub fn optimize(&self, plan: &PlanNodeRef) -> PlanNodeRef {
        self.optimize_with_trace(plan).plan
    }

    /// Optimize a plan, reporting which rules fired.
    ///
    /// Custom compositions are opaque, so their runs report no rule counts
    /// or trace entries.
    pub fn optimize_with_trace(&self, plan: &PlanNodeRef) -> OptimizedPlan {
        let ctx = self.context();
        match self.strategy() {
            OptimizationStrategy::Starter => {
                let result = self.starter.run(plan, &ctx, self.config.enable_trace);
                debug!(
                    "Starter optimization finished, {} of {} rules changed the plan",
                    result.rules_applied,
                    self.starter.len()
                );
                result
            }
            OptimizationStrategy::Custom => {
                debug!("Delegating optimization to custom rule composition");
                OptimizedPlan {
                    plan: self.custom.optimize_custom(plan, &ctx),
                    rules_applied: 0,
                    trace: Vec::new(),
                }
            }
        }
    }

    /// Run only the first `n` starter rules, regardless of strategy
    pub fn optimize_prefix(&self, plan: &PlanNodeRef, n: usize) -> PlanNodeRef {
        self.starter
            .prefix(n)
            .run(plan, &self.context(), false)
            .plan
    }
}

impl fmt::Debug for Optimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Optimizer")
            .field("config", &self.config)
            .field("starter", &self.starter)
            .field("cardinality", &self.cardinality)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::builders::PhysicalBuilder;
    use crate::plan::expression::{col, eq, lit};
    use crate::plan::node::PlanNode;
    use crate::plan::optimizers::{ClosureComposition, SeqScanAsIndexScan};
    use crate::types::{Column, DataType, Schema};

    fn catalog() -> Arc<Catalog> {
        let mut catalog = Catalog::new();
        catalog
            .create_table(
                "t_1k",
                Schema::new(vec![
                    Column::new("a", DataType::Integer),
                    Column::new("b", DataType::Integer),
                ]),
            )
            .unwrap();
        catalog.create_index("t_a", "t_1k", &["a"]).unwrap();
        Arc::new(catalog)
    }

    fn filtered_scan(catalog: &Catalog) -> PlanNodeRef {
        PhysicalBuilder::scan(catalog, "t_1k")
            .unwrap()
            .filter(eq(col(0, 0), lit(1)))
            .build()
    }

    #[test]
    fn test_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Optimizer>();
        assert_send_sync::<PlanNodeRef>();
        assert_send_sync::<RulePipeline>();
    }

    #[test]
    fn test_default_config() {
        let config = OptimizerConfig::default();
        assert!(config.force_starter_rule);
        assert!(!config.enable_trace);
        assert_eq!(config.strategy(), OptimizationStrategy::Starter);
    }

    #[test]
    fn test_starter_strategy() {
        let catalog = catalog();
        let optimizer = Optimizer::new(Arc::clone(&catalog), OptimizerConfig::default());
        let optimized = optimizer.optimize(&filtered_scan(&catalog));
        assert!(matches!(optimized.as_ref(), PlanNode::IndexScan { .. }));
    }

    #[test]
    fn test_custom_strategy_defaults_to_identity() {
        let catalog = catalog();
        let optimizer = Optimizer::new(
            Arc::clone(&catalog),
            OptimizerConfig::default().with_starter_rules(false),
        );
        let plan = filtered_scan(&catalog);
        assert!(Arc::ptr_eq(&optimizer.optimize(&plan), &plan));
    }

    #[test]
    fn test_custom_strategy_runs_composition() {
        let catalog = catalog();
        let optimizer = Optimizer::new(
            Arc::clone(&catalog),
            OptimizerConfig::default().with_starter_rules(false),
        )
        .with_custom_rules(RulePipeline::default().with_rule(SeqScanAsIndexScan));

        // Without MergeFilterScan the filter never reaches the scan
        let plan = filtered_scan(&catalog);
        assert!(Arc::ptr_eq(&optimizer.optimize(&plan), &plan));

        let prefiltered = Arc::new(PlanNode::SeqScan {
            schema: catalog.table("t_1k").unwrap().schema.clone(),
            table_name: "t_1k".to_string(),
            filter_predicate: Some(eq(col(0, 0), lit(1))),
        });
        assert!(matches!(
            optimizer.optimize(&prefiltered).as_ref(),
            PlanNode::IndexScan { .. }
        ));
    }

    #[test]
    fn test_closure_custom_rules() {
        let catalog = catalog();
        let optimizer = Optimizer::new(
            Arc::clone(&catalog),
            OptimizerConfig::default().with_starter_rules(false),
        )
        .with_custom_rules(ClosureComposition(
            |plan: &PlanNodeRef, _ctx: &RewriteContext<'_>| {
                PhysicalBuilder::from_plan(Arc::clone(plan)).limit(1).build()
            },
        ));
        let optimized = optimizer.optimize(&filtered_scan(&catalog));
        assert_eq!(optimized.kind(), "Limit");
    }

    #[test]
    fn test_optimize_prefix() {
        let catalog = catalog();
        let optimizer = Optimizer::new(Arc::clone(&catalog), OptimizerConfig::default());
        let plan = filtered_scan(&catalog);

        assert!(Arc::ptr_eq(&optimizer.optimize_prefix(&plan, 0), &plan));
        assert_eq!(optimizer.optimize_prefix(&plan, 5).kind(), "SeqScan");
        assert_eq!(optimizer.optimize_prefix(&plan, 6).kind(), "IndexScan");
    }

    #[test]
    fn test_trace() {
        let catalog = catalog();
        let optimizer = Optimizer::new(
            Arc::clone(&catalog),
            OptimizerConfig::default().with_trace(true),
        );
        let result = optimizer.optimize_with_trace(&filtered_scan(&catalog));
        assert_eq!(result.rules_applied, 2);
        let names: Vec<_> = result.trace.iter().map(|t| t.rule_name.as_str()).collect();
        assert_eq!(names, vec!["MergeFilterScan", "SeqScanAsIndexScan"]);
    }

    #[test]
    fn test_estimated_cardinality_forwarding() {
        #[derive(Debug)]
        struct Fixed;
        impl CardinalityEstimator for Fixed {
            fn estimated_cardinality(&self, _table_name: &str) -> Option<usize> {
                Some(7)
            }
        }

        let optimizer = Optimizer::new(catalog(), OptimizerConfig::default());
        assert_eq!(optimizer.estimated_cardinality("t_1k"), Some(1_000));
        assert_eq!(optimizer.estimated_cardinality("t"), None);

        let optimizer = optimizer.with_cardinality_estimator(Arc::new(Fixed));
        assert_eq!(optimizer.estimated_cardinality("t"), Some(7));
    }

    #[test]
    fn test_env_override_values() {
        let config = OptimizerConfig::default();
        assert!(!config.clone().apply_env_override(Some("false")).force_starter_rule);
        assert!(!config.clone().apply_env_override(Some(" OFF ")).force_starter_rule);
        assert!(config.clone().apply_env_override(Some("banana")).force_starter_rule);
        assert!(config.clone().apply_env_override(None).force_starter_rule);

        let custom = config.with_starter_rules(false);
        assert!(custom.apply_env_override(Some("1")).force_starter_rule);
    }

    #[test]
    fn test_config_from_json() {
        let config = OptimizerConfig::from_json_str(r#"{"force_starter_rule": false}"#).unwrap();
        assert_eq!(config.strategy(), OptimizationStrategy::Custom);
        assert!(!config.enable_trace);

        assert_eq!(
            OptimizerConfig::from_json_str("{}").unwrap(),
            OptimizerConfig::default()
        );
        assert!(matches!(
            OptimizerConfig::from_json_str("{"),
            Err(ConfigError::Json(_))
        ));
    }
}
