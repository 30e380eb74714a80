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

//! Formatting of analysis reports

use super::catalog::{FindingCatalog, RenderedFinding, Severity};
use crate::engine::UnitReport;
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

/// Error during formatting
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Write failed: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

/// Analysis report payload
#[derive(Debug, Clone, Copy)]
pub struct AnalysisReport<'a> {
    /// Name of the analyzed unit, prefixed to text lines
    pub unit: &'a str,
    pub report: &'a UnitReport,
    pub catalog: &'a FindingCatalog,
}

impl<'a> AnalysisReport<'a> {
    pub fn new(unit: &'a str, report: &'a UnitReport, catalog: &'a FindingCatalog) -> Self {
        Self { unit, report, catalog }
    }

    /// Every finding rendered through the catalog, in report order
    pub fn rendered(&self) -> Vec<RenderedFinding> {
        self.report.findings().map(|(_, finding)| self.catalog.render(finding)).collect()
    }

    /// Highest severity among the findings
    pub fn max_severity(&self) -> Option<Severity> {
        self.report.findings().map(|(_, finding)| self.catalog.severity(finding.kind)).max()
    }
}

/// Trait for formatting analysis reports
pub trait ReportFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String, FormatError>;
    fn supported_formats(&self) -> &[ReportFormat];
}

/// One line per finding, then one per method fault
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String, FormatError> {
        let mut out = String::new();
        for finding in report.rendered() {
            writeln!(out, "{}: {}[{}] {} at {}..{}", report.unit, finding.severity, finding.code, finding.message, finding.span.start, finding.span.end)?;
        }
        for fault in &report.report.faults {
            writeln!(out, "{}: fault in method {}: {}", report.unit, fault.method, fault.message)?;
        }
        if report.report.cancelled {
            writeln!(out, "{}: analysis cancelled", report.unit)?;
        }
        Ok(out)
    }

    fn supported_formats(&self) -> &[ReportFormat] {
        &[ReportFormat::Text]
    }
}

/// JSON array of rendered findings
pub struct JsonFormatter {
    pub pretty: bool,
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &AnalysisReport) -> Result<String, FormatError> {
        let rendered = report.rendered();
        let json = if self.pretty { serde_json::to_string_pretty(&rendered)? } else { serde_json::to_string(&rendered)? };
        Ok(json)
    }

    fn supported_formats(&self) -> &[ReportFormat] {
        &[ReportFormat::Json]
    }
}

/// Formatter for `format`
pub fn formatter_for(format: ReportFormat) -> Box<dyn ReportFormatter> {
    match format {
        ReportFormat::Text => Box::new(TextFormatter),
        ReportFormat::Json => Box::new(JsonFormatter { pretty: true }),
    }
}
