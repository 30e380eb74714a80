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

//! Verdict classification

use crate::findings::{Finding, FindingKind};
use crate::paths::PathOutcome;
use basecall_common::Span;

/// Combines path and scanner results into the findings reported for a method
#[derive(Debug, Clone, Copy)]
pub struct VerdictClassifier {
    /// Missing/multiple classification applies to the method
    pub classify: bool,
    /// Count throw exits towards the minimum
    pub include_throws: bool,
    /// Suppress context and wrong-call findings when `classify` is off
    pub gate_context_findings: bool,
    /// The method overrides something; otherwise only scanner findings apply
    pub is_override: bool,
}

impl VerdictClassifier {
    pub fn new(classify: bool) -> Self {
        Self { classify, include_throws: true, gate_context_findings: false, is_override: true }
    }

    pub fn with_override(mut self, is_override: bool) -> Self {
        self.is_override = is_override;
        self
    }

    pub fn with_include_throws(mut self, include_throws: bool) -> Self {
        self.include_throws = include_throws;
        self
    }

    pub fn with_gate_context_findings(mut self, gate: bool) -> Self {
        self.gate_context_findings = gate;
        self
    }

    /// The classification finding alone, if any
    pub fn verdict(&self, outcome: &PathOutcome, method_name: &str, declaration: Span) -> Option<Finding> {
        if let Some(finding) = outcome.summary.diagnostic() {
            return match finding.kind.is_count_finding() {
                true if self.classify => Some(finding.clone()),
                true => None,
                false => Some(finding.clone()),
            };
        }
        if !self.classify {
            return None;
        }

        let completed = outcome.completed(self.include_throws)?;
        if completed.max() >= 2 {
            Some(Finding::new(FindingKind::MultipleBaseCalls, declaration).with_method_name(method_name))
        } else if completed.min() == 0 {
            Some(Finding::new(FindingKind::MissingBaseCall, declaration).with_method_name(method_name))
        } else {
            None
        }
    }

    /// Wrong calls first, then the verdict finding, then scanner findings.
    ///
    /// A method without an override relationship has no base call to get
    /// wrong, so only the scanner's findings are kept for it.
    pub fn findings(&self, outcome: &PathOutcome, scanned: Vec<Finding>, method_name: &str, declaration: Span) -> Vec<Finding> {
        let ungated = self.classify || !self.gate_context_findings;
        if !self.is_override {
            return if ungated { scanned } else { Vec::new() };
        }
        let verdict = self.verdict(outcome, method_name, declaration);

        let mut findings = Vec::with_capacity(outcome.wrong_calls.len() + scanned.len() + 1);
        if ungated {
            findings.extend(outcome.wrong_calls.iter().cloned());
        }
        findings.extend(verdict.filter(|finding| ungated || finding.kind.is_count_finding()));
        if ungated {
            findings.extend(scanned);
        }
        findings
    }
}
