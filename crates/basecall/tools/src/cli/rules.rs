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

//! Rules command listing every finding kind

use super::settings::Settings;
use anyhow::Result;
use basecall_analyzer::{FindingCatalog, FindingKind};
use clap::Args;
use std::fmt::Write;
use std::path::PathBuf;

/// Arguments for the rules command
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Configuration file whose severity and message overrides are shown
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// One line per finding kind: code, severity and title
pub fn render_rules(catalog: &FindingCatalog) -> String {
    let width = FindingKind::ALL.iter().map(|kind| kind.code().len()).max().unwrap_or(0);
    let mut out = String::new();
    for kind in FindingKind::ALL {
        let descriptor = catalog.descriptor(kind);
        let _ = writeln!(out, "{:<width$}  {:<7}  {}", kind.code(), descriptor.severity, descriptor.title, width = width);
    }
    out
}

/// Execute the rules command
pub fn run_rules(args: &RulesArgs) -> Result<String> {
    let settings = Settings::resolve(args.config.as_deref())?;
    Ok(render_rules(&settings.catalog()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecall_analyzer::Severity;

    #[test]
    fn test_lists_every_kind() {
        let rendered = render_rules(&FindingCatalog::default());
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].starts_with("MissingBaseCall "));
        assert!(lines[0].contains("error"));
        assert!(rendered.lines().any(|line| line.starts_with("WrongBaseCall ") && line.contains("warning")));
    }

    #[test]
    fn test_shows_overrides() {
        let catalog = FindingCatalog::default().with_severity(FindingKind::BaseCallInSwitch, Severity::Info);
        let rendered = render_rules(&catalog);
        assert!(rendered.lines().any(|line| line.starts_with("BaseCallInSwitch ") && line.contains("info")));
    }
}
