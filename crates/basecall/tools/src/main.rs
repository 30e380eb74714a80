// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Basecall CLI Tool
//!
//! Main entry point for the base-call analyzer command-line interface.

use basecall_tools::cli::check::{CheckArgs, run_check};
use basecall_tools::cli::init_tracing;
use basecall_tools::cli::rules::{RulesArgs, run_rules};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "basecall")]
#[command(about = "Basecall - checks that overriding methods call their base implementation")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a compilation unit
    Check(CheckArgs),
    /// List the rules and their severities
    Rules(RulesArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => {
            init_tracing(args.verbose);
            let outcome = run_check(&args)?;
            print!("{}", outcome.output);
            if outcome.failed {
                std::process::exit(1);
            }
        }
        Commands::Rules(args) => {
            init_tracing(0);
            print!("{}", run_rules(&args)?);
        }
    }

    Ok(())
}
