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

use basecall_analyzer::{BaseCallAnalysisEngine, CallCount, FindingKind, PathAnalyzer, PathOutcome, PathSummary, SignatureMatcher, SupertypeReceiver};
use basecall_common::visit::{Visitor, walk_expr};
use basecall_common::{AnalysisHost, Block, Expr, MethodId, Stmt};
use basecall_core::{CompilationUnit, MethodDecl, TypeDecl, UnitHost};
use proptest::prelude::*;
use std::ops::ControlFlow;

fn host_for(body: Vec<Stmt>) -> (UnitHost, MethodId) {
    let unit = CompilationUnit::new("generated")
        .with_type(TypeDecl::new("Base").with_method(MethodDecl::new("Test").virtual_method().with_body(Block::empty())))
        .with_type(TypeDecl::new("Derived").with_base("Base").with_method(MethodDecl::new("Test").override_method().with_body(body)));
    let host = UnitHost::new(unit).unwrap();
    let method = host.find_method("Derived", "Test").unwrap();
    (host, method)
}

fn paths(body: Vec<Stmt>, halt: bool) -> PathOutcome {
    let (host, method) = host_for(body);
    let signature = host.signature(method).unwrap();
    let matcher = SignatureMatcher::new(&host, method, &signature, &SupertypeReceiver);
    PathAnalyzer::new(&matcher).with_halt_on_multiple(halt).analyze(host.body(method).unwrap().unwrap())
}

fn ordered(count: CallCount) -> bool {
    count.min() <= count.max()
}

/// Counts `base.Test(..)` calls written in a body, optionally only the argument-less ones
struct TestCalls {
    any_arity: bool,
    count: u32,
}

impl<'ast> Visitor<'ast> for TestCalls {
    type Break = ();

    fn visit_expr(&mut self, expr: &'ast Expr) -> ControlFlow<()> {
        if let Some((_, "Test", args)) = expr.as_member_call() {
            if self.any_arity || args.is_empty() {
                self.count += 1;
            }
        }
        walk_expr(self, expr)
    }
}

fn count_calls(body: &[Stmt], any_arity: bool) -> u32 {
    let mut counter = TestCalls { any_arity, count: 0 };
    let _ = counter.visit_block(&Block::new(body.to_vec()));
    counter.count
}

fn matching_calls(body: &[Stmt]) -> u32 {
    count_calls(body, false)
}

/// Loop-free bodies; try blocks never contain a call to `Test`
fn stmt_strategy() -> impl Strategy<Value = Stmt> {
    let leaf = prop_oneof![
        4 => Just(Stmt::expr(Expr::base_call("Test", vec![]))),
        1 => Just(Stmt::expr(Expr::base_call("Other", vec![]))),
        1 => Just(Stmt::expr(Expr::base_call("Test", vec![Expr::int(1)]))),
        2 => Just(Stmt::expr(Expr::int(1))),
        1 => Just(Stmt::ret(None)),
        1 => Just(Stmt::throw(None)),
    ];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|body| Stmt::if_then(Expr::ident("c"), body)),
            (prop::collection::vec(inner.clone(), 0..4), prop::collection::vec(inner.clone(), 0..4)).prop_map(|(then, otherwise)| Stmt::if_else(Expr::ident("c"), then, otherwise)),
            prop::collection::vec(inner.clone(), 0..4).prop_map(|body| Stmt::block(body)),
            (prop::collection::vec(inner.clone(), 0..3), prop::collection::vec(inner, 0..3)).prop_map(|(body, finally)| Stmt::try_catch(
                body.into_iter().filter(|stmt| count_calls(std::slice::from_ref(stmt), true) == 0).collect::<Vec<_>>(),
                vec![],
                Some(Block::new(finally))
            )),
        ]
    })
}

fn body_strategy() -> impl Strategy<Value = Vec<Stmt>> {
    prop::collection::vec(stmt_strategy(), 0..6)
}

proptest! {
    #[test]
    fn prop_counts_stay_ordered(body in body_strategy()) {
        let outcome = paths(body, false);
        if let PathSummary::Counting(count) = outcome.summary {
            prop_assert!(ordered(count));
        }
        for exit in [outcome.exits.returns, outcome.exits.throws].into_iter().flatten() {
            prop_assert!(ordered(exit));
        }
        if let Some(completed) = outcome.completed(true) {
            prop_assert!(ordered(completed));
        }
    }

    #[test]
    fn prop_max_bounded_by_written_calls(body in body_strategy()) {
        let written = matching_calls(&body);
        let outcome = paths(body, false);
        if let Some(completed) = outcome.completed(true) {
            prop_assert!(completed.max() <= written);
        }
    }

    #[test]
    fn prop_analysis_is_idempotent(body in body_strategy()) {
        let (host, method) = host_for(body);
        let mut engine = BaseCallAnalysisEngine::with_default_config();
        let first = engine.analyze_method(&host, method).unwrap();
        let second = engine.analyze_method(&host, method).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_nothing_inspected_after_halting(body in body_strategy(), extra in body_strategy()) {
        let halted = paths(body.clone(), true);
        if halted.summary.diagnostic().is_some() {
            let mut extended = body;
            extended.extend(extra);
            prop_assert_eq!(paths(extended, true), halted);
        }
    }

    #[test]
    fn prop_halting_finding_is_multiple(body in body_strategy()) {
        let unhalted = paths(body.clone(), false);
        let halted = paths(body, true);
        match halted.summary.diagnostic() {
            Some(finding) => {
                prop_assert_eq!(finding.kind, FindingKind::MultipleBaseCalls);
                prop_assert!(halted.candidates_inspected <= unhalted.candidates_inspected);
            }
            None => prop_assert_eq!(halted, unhalted),
        }
    }

    #[test]
    fn prop_sequential_calls_counted(calls in 0u32..6) {
        let body: Vec<Stmt> = (0..calls).map(|_| Stmt::expr(Expr::base_call("Test", vec![]))).collect();
        prop_assert_eq!(paths(body.clone(), false).summary, PathSummary::Counting(CallCount::exactly(calls)));
        let halted = paths(body, true);
        prop_assert_eq!(halted.summary.diagnostic().is_some(), calls >= 2);
        prop_assert_eq!(halted.candidates_inspected, calls.min(2) as usize);
    }
}
