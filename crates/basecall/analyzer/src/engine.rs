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

//! Core base-call analysis engine

use crate::config::EngineConfig;
use crate::error::{AnalysisError, AnalysisResult};
use crate::findings::Finding;
use crate::matcher::SignatureMatcher;
use crate::paths::{PathAnalyzer, PathOutcome};
use crate::policy::{PolicyResolver, ResolvedPolicy};
use crate::scanner::ContextScanner;
use crate::verdict::VerdictClassifier;
use basecall_common::visit::nesting_depth;
use basecall_common::{AnalysisHost, MethodId};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Why a method was not analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Abstract or interface declaration
    NoBody,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodStatus {
    Analyzed,
    Skipped(SkipReason),
}

/// Analysis result for one method
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodReport {
    pub method: MethodId,
    /// Simple name of the method
    pub name: String,
    pub status: MethodStatus,
    /// Resolved policy; `None` when skipped
    pub policy: Option<ResolvedPolicy>,
    /// Path analysis outcome; `None` when skipped
    pub summary: Option<PathOutcome>,
    pub findings: Vec<Finding>,
}

impl MethodReport {
    fn skipped(method: MethodId, name: String, reason: SkipReason) -> Self {
        Self {
            method,
            name,
            status: MethodStatus::Skipped(reason),
            policy: None,
            summary: None,
            findings: Vec::new(),
        }
    }

    pub fn is_analyzed(&self) -> bool {
        self.status == MethodStatus::Analyzed
    }
}

/// A method whose analysis failed; its siblings are unaffected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodFault {
    pub method: MethodId,
    pub message: String,
}

/// Analysis result for a set of methods, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub methods: Vec<MethodReport>,
    pub faults: Vec<MethodFault>,
    /// Some methods were not started because the analysis was cancelled
    pub cancelled: bool,
}

impl UnitReport {
    /// Every finding with the method it was reported for
    pub fn findings(&self) -> impl Iterator<Item = (&MethodReport, &Finding)> {
        self.methods.iter().flat_map(|report| report.findings.iter().map(move |finding| (report, finding)))
    }

    pub fn finding_count(&self) -> usize {
        self.methods.iter().map(|report| report.findings.len()).sum()
    }

    pub fn method(&self, method: MethodId) -> Option<&MethodReport> {
        self.methods.iter().find(|report| report.method == method)
    }

    /// No findings and no faults
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty() && self.finding_count() == 0
    }
}

/// Statistics collected while analyzing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisStats {
    /// Number of method bodies analyzed
    pub methods_analyzed: usize,
    /// Number of methods skipped for lack of a body
    pub methods_skipped: usize,
    /// Number of findings reported
    pub findings_reported: usize,
    /// Number of methods whose analysis failed
    pub faults: usize,
    /// Duration of the last analysis in milliseconds
    pub duration_ms: u64,
}

impl AnalysisStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one method
    pub fn record(&mut self, result: &AnalysisResult<MethodReport>) {
        match result {
            Ok(report) if report.is_analyzed() => {
                self.methods_analyzed += 1;
                self.findings_reported += report.findings.len();
            }
            Ok(_) => self.methods_skipped += 1,
            Err(_) => self.faults += 1,
        }
    }

    /// Set analysis duration
    pub fn set_duration(&mut self, duration_ms: u64) {
        self.duration_ms = duration_ms;
    }
}

/// Main base-call analysis engine
#[derive(Debug, Default)]
pub struct BaseCallAnalysisEngine {
    /// Engine configuration
    config: EngineConfig,
    /// Analysis statistics
    stats: AnalysisStats,
}

impl BaseCallAnalysisEngine {
    /// Create a new base-call analysis engine with the given configuration
    pub fn new(config: EngineConfig) -> Self {
        Self { config, stats: AnalysisStats::new() }
    }

    /// Create a new engine with default configuration
    pub fn with_default_config() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Get the current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Update the engine configuration
    pub fn update_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// Get analysis statistics
    pub fn statistics(&self) -> &AnalysisStats {
        &self.stats
    }

    /// Reset analysis statistics
    pub fn reset(&mut self) {
        self.stats = AnalysisStats::new();
    }

    /// Analyze a single method
    #[instrument(skip(self, host))]
    pub fn analyze_method(&mut self, host: &dyn AnalysisHost, method: MethodId) -> AnalysisResult<MethodReport> {
        let start_time = Instant::now();
        let result = self.check_method(host, method);
        if let Err(error) = &result {
            warn!(%method, %error, "Method analysis failed");
        }
        self.stats.record(&result);
        self.stats.set_duration(start_time.elapsed().as_millis() as u64);
        result
    }

    /// Analyze every method of `methods`; failures are collected as faults
    pub fn analyze_unit(&mut self, host: &dyn AnalysisHost, methods: &[MethodId]) -> UnitReport {
        self.analyze_unit_until(host, methods, &AtomicBool::new(false))
    }

    /// Like [`Self::analyze_unit`], but stops starting new methods once `cancel` is set
    #[instrument(skip_all, fields(methods = methods.len(), parallel = self.config.enable_parallel))]
    pub fn analyze_unit_until(&mut self, host: &dyn AnalysisHost, methods: &[MethodId], cancel: &AtomicBool) -> UnitReport {
        let start_time = Instant::now();

        let engine = &*self;
        let attempt = |method: &MethodId| -> Option<(MethodId, AnalysisResult<MethodReport>)> {
            if cancel.load(Ordering::Relaxed) {
                return None;
            }
            Some((*method, engine.check_method(host, *method)))
        };
        let results: Vec<_> = if self.config.enable_parallel { methods.par_iter().map(attempt).collect() } else { methods.iter().map(attempt).collect() };

        let mut report = UnitReport::default();
        for result in results {
            let Some((method, result)) = result else {
                report.cancelled = true;
                continue;
            };
            self.stats.record(&result);
            match result {
                Ok(method_report) => report.methods.push(method_report),
                Err(error) => {
                    warn!(%method, %error, "Method analysis failed");
                    report.faults.push(MethodFault { method, message: error.to_string() });
                }
            }
        }

        let duration = start_time.elapsed();
        self.stats.set_duration(duration.as_millis() as u64);
        if self.config.is_verbose() {
            info!(
                analyzed = report.methods.len(),
                findings = report.finding_count(),
                faults = report.faults.len(),
                cancelled = report.cancelled,
                "Base-call analysis completed in {}ms",
                duration.as_millis()
            );
        }
        report
    }

    /// Analysis of one method, without side effects on the engine
    fn check_method(&self, host: &dyn AnalysisHost, method: MethodId) -> AnalysisResult<MethodReport> {
        let signature = host.signature(method)?;
        let Some(body) = host.body(method)? else {
            debug!(%method, name = %signature.name, "Skipping method without body");
            return Ok(MethodReport::skipped(method, signature.name, SkipReason::NoBody));
        };

        let limit = self.config.max_depth;
        if let Err(depth) = nesting_depth(body, limit) {
            return Err(AnalysisError::DepthLimitExceeded { depth, limit });
        }

        let chain = host.override_chain(method)?;
        let markers = host.markers(method)?;
        let declaration = host.declaration_span(method)?;

        let policy = PolicyResolver::new().resolve(&chain, &markers);
        // Only overrides have a base call to make
        let classify = chain.is_override() && policy.classifies(&signature);
        debug!(%method, name = %signature.name, %policy, classify, "Resolved policy");

        let matcher = SignatureMatcher::new(host, method, &signature, self.config.receiver.strategy());
        let outcome = PathAnalyzer::new(&matcher).with_halt_on_multiple(classify).analyze(body);
        let scanned = ContextScanner::new(&matcher).scan(body, chain.is_override(), declaration);

        let findings = VerdictClassifier::new(classify)
            .with_override(chain.is_override())
            .with_include_throws(self.config.throw_paths_require_base_call)
            .with_gate_context_findings(self.config.gate_context_findings)
            .findings(&outcome, scanned, &signature.name, declaration);
        debug!(%method, summary = ?outcome.summary, findings = findings.len(), "Analyzed method");

        Ok(MethodReport {
            method,
            name: signature.name.clone(),
            status: MethodStatus::Analyzed,
            policy: Some(policy),
            summary: Some(outcome),
            findings,
        })
    }
}
