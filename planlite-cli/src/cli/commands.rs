// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for PlanLite

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// PlanLite CLI - query plan rewriting
#[derive(Parser)]
#[command(name = "planlite")]
#[command(about = "PlanLite - A rule-based query plan rewriter")]
#[command(version)]
pub struct Cli {
    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log filter; warnings only unless asked otherwise
    pub fn level_filter(&self) -> log::LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.to_level_filter(),
            (None, true) => log::LevelFilter::Debug,
            (None, false) => log::LevelFilter::Warn,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Optimize a plan stored as JSON
    Optimize(OptimizeArgs),

    /// Show estimated table sizes
    Cardinality {
        /// Table names to estimate
        #[arg(required = true)]
        tables: Vec<String>,
    },

    /// List the available rewrite rules
    Rules,
}

#[derive(clap::Args, Debug, Clone)]
pub struct OptimizeArgs {
    /// Catalog definition (tables, rows, indexes)
    #[arg(long)]
    pub catalog: PathBuf,

    /// Plan to optimize
    #[arg(long)]
    pub plan: PathBuf,

    /// Optimizer configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Use the custom rule composition instead of the starter rules
    #[arg(long)]
    pub custom: bool,

    /// Rules of the custom composition, in order (e.g. JoinReorder,NljAsIndexJoin)
    #[arg(long, value_delimiter = ',')]
    pub rules: Vec<String>,

    /// Print a before/after trace for every rule that fired
    #[arg(short, long)]
    pub trace: bool,

    /// Execute the original and optimized plans and compare results
    #[arg(short, long)]
    pub execute: bool,

    /// Output format for executed rows
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Output format options
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
