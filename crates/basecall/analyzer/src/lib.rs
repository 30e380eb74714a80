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

//! Base-call contract analysis
//!
//! Verifies that an overriding method calls the implementation it overrides
//! according to the policy declared along its override chain, and that such
//! calls never appear where their execution count cannot be guaranteed.
//!
//! ## Analysis Components
//!
//! ### Policy Resolver (`policy`)
//! - **Purpose**: Determines the checking mode of a method
//! - **Modes**: Mandatory, Optional, Default (mandatory for void methods only)
//! - **Exemption**: The first override of an abstract or empty-template method is optional
//!
//! ### Signature Matcher (`matcher`)
//! - **Purpose**: Classifies calls as matching, wrong or unrelated to the base call
//! - **Receivers**: Supertype reference, or a mixin's next-in-chain accessor
//!
//! ### Path Analyzer (`paths`)
//! - **Purpose**: Minimum and maximum number of matching calls over every path
//! - **Short-circuit**: Stops at the first finding that makes counting meaningless
//!
//! ### Context Scanner (`scanner`)
//! - **Purpose**: Base calls inside closures, local functions and non-overriding methods
//!
//! ### Verdict Classifier (`verdict`)
//! - **Purpose**: Turns path summaries into missing/multiple findings and applies gating
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BaseCallAnalysisEngine::new(EngineConfig::new().with_parallel(true));
//! let report = engine.analyze_unit(&host, &host.methods());
//! for (method, finding) in report.findings() {
//!     println!("{}: {}", method.name, finding);
//! }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod findings;
pub mod matcher;
pub mod paths;
pub mod policy;
pub mod reporting;
pub mod scanner;
pub mod verdict;

pub use config::{EngineConfig, ReceiverKind};
pub use engine::{AnalysisStats, BaseCallAnalysisEngine, MethodFault, MethodReport, MethodStatus, SkipReason, UnitReport};
pub use error::{AnalysisError, AnalysisResult};
pub use findings::{Finding, FindingKind};
pub use matcher::{BaseCallMatch, Mismatch, NextInChainReceiver, Reach, ReceiverStrategy, SignatureMatcher, SupertypeReceiver};
pub use paths::{CallCount, ExitSummary, PathAnalyzer, PathOutcome, PathSummary};
pub use policy::{PolicyResolver, PolicySource, ResolvedPolicy};
pub use reporting::{FindingCatalog, FindingDescriptor, ReportFormat, Severity};
pub use scanner::ContextScanner;
pub use verdict::VerdictClassifier;

#[cfg(test)]
pub(crate) mod fixtures {
    use basecall_common::{AnalysisHost, MethodId, Stmt};
    use basecall_core::{CompilationUnit, MethodDecl, TypeDecl, UnitHost};

    /// `Derived.Test` overriding `Base.Test`, both taking `params`; returns the override
    pub fn host_with_params(params: &[(&str, &str)], body: Vec<Stmt>) -> (UnitHost, MethodId) {
        let declare = |method: MethodDecl| params.iter().fold(method, |method, (name, ty)| method.with_param(*name, *ty));

        let unit = CompilationUnit::new("fixture")
            .with_type(TypeDecl::new("Base").with_method(declare(MethodDecl::new("Test")).virtual_method().with_body(basecall_common::Block::empty())))
            .with_type(TypeDecl::new("Derived").with_base("Base").with_method(declare(MethodDecl::new("Test")).override_method().with_body(body).at(0, 4)));
        let host = UnitHost::new(unit).unwrap();
        let method = host.find_method("Derived", "Test").unwrap();
        assert!(host.body(method).unwrap().is_some());
        (host, method)
    }
}
