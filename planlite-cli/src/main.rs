// Copyright (c) 2024-2025 PlanLite Contributors
// SPDX-License-Identifier: Apache-2.0

mod cli;

use clap::Parser;
use colored::Colorize;

use cli::{handle_cardinality, handle_optimize, handle_rules, handle_version, Cli, Commands};

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.level_filter())
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Commands::Version => {
            handle_version();
            Ok(())
        }
        Commands::Optimize(args) => handle_optimize(args),
        Commands::Cardinality { tables } => {
            handle_cardinality(&tables);
            Ok(())
        }
        Commands::Rules => {
            handle_rules();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}
