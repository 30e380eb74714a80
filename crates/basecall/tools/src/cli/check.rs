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

//! Check command analyzing a compilation unit

use super::settings::Settings;
use anyhow::{Context, Result};
use basecall_analyzer::reporting::{AnalysisReport, formatter_for};
use basecall_analyzer::{BaseCallAnalysisEngine, ReceiverKind, ReportFormat, Severity};
use basecall_common::AnalysisHost;
use basecall_core::UnitHost;
use clap::{ArgAction, Args};
use std::path::PathBuf;
use tracing::{debug, info};

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Compilation unit to analyze, as JSON
    #[arg(value_name = "UNIT_FILE")]
    pub unit: PathBuf,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text", value_parser = parse_format)]
    pub format: ReportFormat,

    /// Analyze methods in parallel
    #[arg(short, long)]
    pub parallel: bool,

    /// Treat the next-in-chain accessor as the base-call receiver
    #[arg(long)]
    pub next_in_chain: bool,

    /// Increase verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn parse_format(value: &str) -> Result<ReportFormat, String> {
    value.parse()
}

/// Formatted report and whether an error-severity finding or fault was seen
#[derive(Debug)]
pub struct CheckOutcome {
    pub output: String,
    pub failed: bool,
}

/// Execute the check command
pub fn run_check(args: &CheckArgs) -> Result<CheckOutcome> {
    let settings = Settings::resolve(args.config.as_deref())?;
    let catalog = settings.catalog()?;

    let mut config = settings.engine;
    if args.parallel {
        config = config.with_parallel(true);
    }
    if args.next_in_chain {
        config = config.with_receiver(ReceiverKind::NextInChain);
    }
    if args.verbose > 0 {
        let verbosity = config.verbosity.max(1).saturating_add(args.verbose);
        config = config.with_verbosity(verbosity);
    }
    debug!(?config, "Resolved engine configuration");

    let host = UnitHost::load(&args.unit).with_context(|| format!("Failed to load {}", args.unit.display()))?;
    let methods = host.methods();
    info!(unit = %host.unit().name, methods = methods.len(), "Checking compilation unit");

    let mut engine = BaseCallAnalysisEngine::new(config);
    let report = engine.analyze_unit(&host, &methods);

    let payload = AnalysisReport::new(&host.unit().name, &report, &catalog);
    let output = formatter_for(args.format).format(&payload)?;
    let failed = payload.max_severity() == Some(Severity::Error) || !report.faults.is_empty();

    Ok(CheckOutcome { output, failed })
}
