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

//! Disallowed-context scanner
//!
//! Flags base calls whose execution is deferred or unrelated to an override:
//! closures and local functions at any nesting depth, and methods that
//! override nothing. Presence anywhere inside counts, on any path.

use crate::findings::{Finding, FindingKind};
use crate::matcher::{Reach, SignatureMatcher};
use basecall_common::visit::{Visitor, walk_function_body};
use basecall_common::{Block, Closure, LocalFunction, Span};
use std::convert::Infallible;
use std::ops::ControlFlow;
use tracing::trace;

/// Scans one method body
#[derive(Debug)]
pub struct ContextScanner<'m, 'a> {
    matcher: &'m SignatureMatcher<'a>,
}

impl<'m, 'a> ContextScanner<'m, 'a> {
    pub fn new(matcher: &'m SignatureMatcher<'a>) -> Self {
        Self { matcher }
    }

    /// Findings in source order: one per offending closure or local function,
    /// then the non-overriding finding when `is_override` is false.
    pub fn scan(&self, body: &Block, is_override: bool, declaration: Span) -> Vec<Finding> {
        let mut collector = NestedFunctions { matcher: self.matcher, findings: Vec::new() };
        if let ControlFlow::Break(never) = collector.visit_block(body) {
            match never {}
        }
        let mut findings = collector.findings;

        if !is_override && self.matcher.first_candidate_in_block(body, Reach::Nested).is_some() {
            trace!(method = %self.matcher.method(), "Base call in non-overriding method");
            findings.push(Finding::new(FindingKind::BaseCallInNonOverridingMethod, declaration).with_method_name(self.matcher.signature().name.as_str()));
        }
        findings
    }
}

struct NestedFunctions<'m, 'a> {
    matcher: &'m SignatureMatcher<'a>,
    findings: Vec<Finding>,
}

impl<'ast> Visitor<'ast> for NestedFunctions<'_, '_> {
    type Break = Infallible;

    fn visit_closure(&mut self, closure: &'ast Closure, span: Span) -> ControlFlow<Infallible> {
        if self.matcher.first_candidate_in_body(&closure.body, Reach::Nested).is_some() {
            self.findings.push(Finding::new(FindingKind::BaseCallInAnonymousFunction, span));
        }
        walk_function_body(self, &closure.body)
    }

    fn visit_local_function(&mut self, function: &'ast LocalFunction, span: Span) -> ControlFlow<Infallible> {
        if self.matcher.first_candidate_in_body(&function.body, Reach::Nested).is_some() {
            self.findings.push(Finding::new(FindingKind::BaseCallInLocalFunction, span));
        }
        walk_function_body(self, &function.body)
    }
}
