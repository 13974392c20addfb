// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for PlanLite

use colored::Colorize;
use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use planlite::exec::Row;
use planlite::plan::optimizers::{all_rules, rule_by_name, starter_rules};
use planlite::{
    estimated_cardinality, plan_from_path, Catalog, ConfigError, ExecutionError, OptimizedPlan,
    OptimizationStrategy, Optimizer, OptimizerConfig, PhysicalExecutor, PlanNodeRef, RulePipeline,
};

use super::commands::OptimizeArgs;
use super::output::ResultFormatter;

/// Errors surfaced by CLI commands
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Execution failed: {0}")]
    Execution(#[from] ExecutionError),

    #[error("Unknown rule '{0}' (see `planlite rules`)")]
    UnknownRule(String),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Everything `optimize` computed, before printing
pub struct OptimizeOutcome {
    pub original: PlanNodeRef,
    pub optimized: OptimizedPlan,
    pub strategy: OptimizationStrategy,
    /// Rows of the original and optimized plan, when `--execute` was given
    pub rows: Option<(Vec<Row>, Vec<Row>)>,
}

impl OptimizeOutcome {
    /// Whether both plans returned the same rows. Row order only counts when
    /// the original plan is ordered.
    pub fn results_match(&self) -> Option<bool> {
        let (before, after) = self.rows.as_ref()?;
        if self.original.is_ordered() {
            return Some(before == after);
        }

        let mut before = before.clone();
        let mut after = after.clone();
        before.sort();
        after.sort();
        Some(before == after)
    }
}

/// Build the custom composition from rule names
fn custom_pipeline(names: &[String]) -> Result<RulePipeline, CliError> {
    let rules = names
        .iter()
        .map(|name| rule_by_name(name.trim()).ok_or_else(|| CliError::UnknownRule(name.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RulePipeline::new(rules))
}

/// Load inputs, optimize and optionally execute, without printing
pub fn run_optimize(args: &OptimizeArgs) -> Result<OptimizeOutcome, CliError> {
    let catalog = Arc::new(Catalog::from_path(&args.catalog)?);
    let plan = plan_from_path(&args.plan)?;

    let mut config = match &args.config {
        Some(path) => OptimizerConfig::from_path(path)?,
        None => OptimizerConfig::default(),
    }
    .with_env_overrides();
    // --rules implies the custom strategy
    if args.custom || !args.rules.is_empty() {
        if !args.custom && config.force_starter_rule {
            warn!("--rules given; switching to the custom strategy");
        }
        config = config.with_starter_rules(false);
    }
    if args.trace {
        config = config.with_trace(true);
    }

    let mut optimizer = Optimizer::new(catalog, config);
    if !args.rules.is_empty() {
        optimizer = optimizer.with_custom_rules(custom_pipeline(&args.rules)?);
    }
    info!("Optimizing {} with the {} strategy", args.plan.display(), optimizer.strategy());

    let optimized = optimizer.optimize_with_trace(&plan);

    let rows = if args.execute {
        let executor = PhysicalExecutor::new(optimizer.catalog());
        Some((executor.execute(&plan)?, executor.execute(&optimized.plan)?))
    } else {
        None
    };

    Ok(OptimizeOutcome {
        original: plan,
        optimized,
        strategy: optimizer.strategy(),
        rows,
    })
}

/// Handle the optimize command
pub fn handle_optimize(args: OptimizeArgs) -> Result<(), CliError> {
    let outcome = run_optimize(&args)?;

    println!("{}", ResultFormatter::heading("Original plan:"));
    print!("{}", outcome.original.explain());
    println!();
    println!(
        "{}",
        ResultFormatter::heading(&format!("Optimized plan ({} strategy):", outcome.strategy))
    );
    print!("{}", outcome.optimized.plan.explain());

    if args.trace {
        println!();
        println!("{}", ResultFormatter::heading("Trace:"));
        print!("{}", outcome.optimized.format_trace());
    }

    if let Some((_, after)) = &outcome.rows {
        println!();
        println!("{}", ResultFormatter::heading("Results:"));
        println!(
            "{}",
            ResultFormatter::format_rows(outcome.optimized.plan.schema(), after, args.format)?
        );
        match outcome.results_match() {
            Some(true) => println!("{}", "Optimized plan returns the same rows".green()),
            _ => println!("{}", "Optimized plan returns different rows".red().bold()),
        }
    }

    Ok(())
}

/// Handle the cardinality command
pub fn handle_cardinality(tables: &[String]) {
    let entries = tables.iter().map(|table| {
        let estimate = match estimated_cardinality(table) {
            Some(rows) => rows.to_string(),
            None => "unknown".to_string(),
        };
        (table.as_str(), estimate)
    });
    println!("{}", ResultFormatter::format_listing(["Table", "Estimated rows"], entries));
}

/// Handle the rules command
pub fn handle_rules() {
    let starter: Vec<&'static str> = starter_rules().iter().map(|r| r.name()).collect();

    println!("{}", ResultFormatter::heading("Starter sequence:"));
    for (i, name) in starter.iter().enumerate() {
        println!("  {}. {}", i + 1, name);
    }
    println!();

    let rules = all_rules();
    let entries = rules
        .iter()
        .map(|rule| (rule.name(), rule.description().to_string()));
    println!("{}", ResultFormatter::format_listing(["Rule", "Description"], entries));
}

/// Handle the version command
pub fn handle_version() {
    println!("{}", format!("PlanLite {}", env!("CARGO_PKG_VERSION")).bold().green());
    println!("Starter rules: {}", starter_rules().len());
    println!("Default strategy: {}", OptimizerConfig::default().strategy());
}
