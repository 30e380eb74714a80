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

//! Path analysis
//!
//! Reduces a method body to a [`PathSummary`] holding the minimum and maximum
//! number of matching base calls over every path that falls through the body.
//!
//! ## Traversal
//!
//! - **Sequence**: statements are folded top to bottom from `Counting(0, 0)`.
//!   A `Returns` statement makes the rest of its block unreachable.
//! - **Expressions**: every call sub-expression is classified, operands before
//!   the call itself. Matching calls add one to both bounds; the call that
//!   lifts `max` to 2 ends the traversal with `MultipleBaseCalls`.
//! - **Conditionals**: branches start from the paths that reach them and are
//!   joined. Without an `else` the skipping path joins too.
//! - **Loops, switches, try/catch**: a candidate anywhere inside ends the
//!   traversal with the matching context finding. Otherwise the construct is
//!   walked only to record its exits and report wrong calls.
//! - **Finally**: folded like any block after the try region. Paths leaving
//!   the region early carry the finally block's own count.
//! - **Closures and local functions**: opaque here, see the scanner.
//!
//! Paths leaving through `return` or `throw` are recorded in an [`ExitSummary`]
//! and later joined by the verdict.

pub mod summary;

pub use summary::{CallCount, ExitSummary, PathOutcome, PathSummary};

use crate::findings::{Finding, FindingKind};
use crate::matcher::{BaseCallMatch, Reach, SignatureMatcher};
use basecall_common::{Block, CatchClause, ConditionalBranch, Expr, ExprKind, Span, Stmt, StmtKind, SwitchArm, SwitchExprArm, SwitchLabel};
use std::ops::ControlFlow;
use tracing::trace;

/// Expression-level traversal result; a finding stops everything
type Step = ControlFlow<Finding, CallCount>;

/// Turns a finished expression step into a statement-level summary on error
macro_rules! step {
    ($step:expr) => {
        match $step {
            ControlFlow::Continue(count) => count,
            ControlFlow::Break(finding) => return PathSummary::DiagnosticFound(finding),
        }
    };
}

/// Folds one branch result into a merge accumulator, propagating findings
macro_rules! merge {
    ($merged:expr, $summary:expr) => {
        match $summary {
            PathSummary::Counting(count) => CallCount::join_into(&mut $merged, count),
            PathSummary::Returns => {}
            found @ PathSummary::DiagnosticFound(_) => return found,
        }
    };
}

/// Where `break`/`continue` resume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JumpKind {
    Loop,
    Switch,
}

#[derive(Debug)]
struct JumpTarget {
    kind: JumpKind,
    /// Number of enclosing finally blocks when the target was entered
    finally_depth: usize,
    reached: Option<CallCount>,
}

/// Path analyzer for one method body
#[derive(Debug)]
pub struct PathAnalyzer<'m, 'a> {
    matcher: &'m SignatureMatcher<'a>,
    halt_on_multiple: bool,
    exits: ExitSummary,
    wrong_calls: Vec<Finding>,
    candidates_inspected: usize,
    finally_deltas: Vec<CallCount>,
    jump_targets: Vec<JumpTarget>,
}

impl<'m, 'a> PathAnalyzer<'m, 'a> {
    pub fn new(matcher: &'m SignatureMatcher<'a>) -> Self {
        Self {
            matcher,
            halt_on_multiple: true,
            exits: ExitSummary::default(),
            wrong_calls: Vec::new(),
            candidates_inspected: 0,
            finally_deltas: Vec::new(),
            jump_targets: Vec::new(),
        }
    }

    /// Whether a second matching call ends the traversal
    pub fn with_halt_on_multiple(mut self, halt: bool) -> Self {
        self.halt_on_multiple = halt;
        self
    }

    /// Analyze a whole method body
    pub fn analyze(mut self, body: &Block) -> PathOutcome {
        let summary = self.block(body, CallCount::ZERO);
        trace!(summary = ?summary, exits = ?self.exits, "Path analysis finished");
        PathOutcome {
            summary,
            exits: self.exits,
            wrong_calls: self.wrong_calls,
            candidates_inspected: self.candidates_inspected,
        }
    }

    fn method_name(&self) -> &'a str {
        &self.matcher.signature().name
    }

    fn block(&mut self, block: &Block, entry: CallCount) -> PathSummary {
        let mut count = entry;
        for stmt in &block.stmts {
            match self.stmt(stmt, count) {
                PathSummary::Counting(next) => count = next,
                terminal @ (PathSummary::Returns | PathSummary::DiagnosticFound(_)) => return terminal,
            }
        }
        PathSummary::Counting(count)
    }

    fn stmt(&mut self, stmt: &Stmt, count: CallCount) -> PathSummary {
        match &stmt.kind {
            StmtKind::Expr { expr } => PathSummary::Counting(step!(self.expr(expr, count))),
            StmtKind::Local { init, .. } => PathSummary::Counting(step!(self.optional_expr(init.as_ref(), count))),
            StmtKind::Block { block } => self.block(block, count),
            StmtKind::Using { resource, body, .. } => {
                let count = step!(self.expr(resource, count));
                self.block(body, count)
            }
            StmtKind::If { branches, otherwise } => self.conditional(branches, otherwise.as_ref(), count),
            StmtKind::Return { value } => {
                let count = step!(self.optional_expr(value.as_ref(), count));
                let total = self.with_finally(count, 0);
                self.exits.record_return(total);
                PathSummary::Returns
            }
            StmtKind::Throw { value } => {
                let count = step!(self.optional_expr(value.as_ref(), count));
                let total = self.with_finally(count, 0);
                self.exits.record_throw(total);
                PathSummary::Returns
            }
            StmtKind::While { cond, body } => {
                if let Some(found) = self.loop_candidate(stmt) {
                    return found;
                }
                step!(self.expr(cond, count));
                self.loop_body(body, count, false)
            }
            StmtKind::DoWhile { body, cond } => {
                if let Some(found) = self.loop_candidate(stmt) {
                    return found;
                }
                match self.loop_body(body, count, true) {
                    PathSummary::Counting(count) => PathSummary::Counting(step!(self.expr(cond, count))),
                    other => other,
                }
            }
            StmtKind::For { init, cond, update, body } => {
                if let Some(found) = self.loop_candidate(stmt) {
                    return found;
                }
                for stmt in init {
                    if let found @ PathSummary::DiagnosticFound(_) = self.stmt(stmt, count) {
                        return found;
                    }
                }
                step!(self.optional_expr(cond.as_ref(), count));
                for expr in update {
                    step!(self.expr(expr, count));
                }
                self.loop_body(body, count, false)
            }
            StmtKind::ForEach { iterable, body, .. } => {
                // The iterable is evaluated once, before the first iteration
                let count = step!(self.expr(iterable, count));
                if let Some(span) = self.matcher.first_candidate_in_block(body, Reach::SameFunction) {
                    return self.context_finding(FindingKind::BaseCallInLoop, span);
                }
                self.loop_body(body, count, false)
            }
            StmtKind::Switch { scrutinee, arms } => {
                let count = step!(self.expr(scrutinee, count));
                self.switch(arms, count)
            }
            StmtKind::Try { body, catches, finally } => self.try_statement(body, catches, finally.as_ref(), count),
            StmtKind::Break => self.jump(JumpKind::Switch, count),
            StmtKind::Continue => self.jump(JumpKind::Loop, count),
            StmtKind::LocalFunction { .. } | StmtKind::Empty => PathSummary::Counting(count),
        }
    }

    fn optional_expr(&mut self, expr: Option<&Expr>, count: CallCount) -> Step {
        match expr {
            Some(expr) => self.expr(expr, count),
            None => ControlFlow::Continue(count),
        }
    }

    fn expr(&mut self, expr: &Expr, count: CallCount) -> Step {
        match &expr.kind {
            ExprKind::Literal { .. } | ExprKind::Ident { .. } | ExprKind::Base | ExprKind::This => ControlFlow::Continue(count),
            ExprKind::Member { object, .. } => self.expr(object, count),
            ExprKind::Call { callee, args } => self.call(expr, callee, args, count),
            ExprKind::Unary { operand, .. } | ExprKind::Cast { operand, .. } => self.expr(operand, count),
            ExprKind::Binary { lhs, rhs, .. } => {
                let count = self.expr(lhs, count)?;
                self.expr(rhs, count)
            }
            ExprKind::Assign { target, value } => {
                let count = self.expr(target, count)?;
                self.expr(value, count)
            }
            ExprKind::Conditional { cond, then, otherwise } => {
                let count = self.expr(cond, count)?;
                let count = self.expr(then, count)?;
                self.expr(otherwise, count)
            }
            ExprKind::Interpolation { parts } => parts.iter().try_fold(count, |count, part| self.expr(part, count)),
            ExprKind::New { args, .. } => args.iter().try_fold(count, |count, arg| self.expr(arg, count)),
            ExprKind::Lambda { .. } => ControlFlow::Continue(count),
            ExprKind::Switch { scrutinee, arms } => {
                let count = self.expr(scrutinee, count)?;
                self.switch_expression(arms, count)
            }
        }
    }

    fn call(&mut self, call: &Expr, callee: &Expr, args: &[Expr], count: CallCount) -> Step {
        let mut count = match &callee.kind {
            ExprKind::Member { object, .. } if self.matcher.is_base_receiver(object) => count,
            _ => self.expr(callee, count)?,
        };
        for arg in args {
            count = self.expr(arg, count)?;
        }

        let classification = self.matcher.classify(call);
        if classification.is_candidate() {
            self.candidates_inspected += 1;
        }
        match classification {
            BaseCallMatch::NotABaseCall => ControlFlow::Continue(count),
            BaseCallMatch::Wrong(mismatch) => {
                trace!(span = %call.span, %mismatch, "Wrong base call");
                let finding = Finding::new(FindingKind::WrongBaseCall, call.span).with_method_name(self.method_name());
                self.wrong_calls.push(finding);
                ControlFlow::Continue(count)
            }
            BaseCallMatch::Matching => {
                let count = count.increment();
                if self.halt_on_multiple && count.max() >= 2 {
                    return ControlFlow::Break(Finding::new(FindingKind::MultipleBaseCalls, call.span).with_method_name(self.method_name()));
                }
                ControlFlow::Continue(count)
            }
        }
    }

    fn switch_expression(&mut self, arms: &[SwitchExprArm], count: CallCount) -> Step {
        for arm in arms {
            let parts = arm.pattern.iter().chain(arm.guard.iter()).chain(std::iter::once(&arm.value));
            for part in parts {
                if let Some(span) = self.matcher.first_candidate_in_expr(part, Reach::SameFunction) {
                    return ControlFlow::Break(Finding::new(FindingKind::BaseCallInSwitch, span));
                }
            }
        }
        // Free of candidates: arms cannot change the count, walk them for wrong calls only
        for arm in arms {
            let parts = arm.pattern.iter().chain(arm.guard.iter()).chain(std::iter::once(&arm.value));
            for part in parts {
                self.expr(part, count)?;
            }
        }
        ControlFlow::Continue(count)
    }

    fn conditional(&mut self, branches: &[ConditionalBranch], otherwise: Option<&Block>, entry: CallCount) -> PathSummary {
        // Paths that skipped every branch so far
        let mut skipped = entry;
        let mut merged = None;
        for branch in branches {
            skipped = step!(self.expr(&branch.cond, skipped));
            merge!(merged, self.block(&branch.body, skipped));
        }
        match otherwise {
            Some(block) => merge!(merged, self.block(block, skipped)),
            None => CallCount::join_into(&mut merged, skipped),
        }
        match merged {
            Some(count) => PathSummary::Counting(count),
            None => PathSummary::Returns,
        }
    }

    fn loop_candidate(&self, stmt: &Stmt) -> Option<PathSummary> {
        self.matcher.first_candidate_in_stmt(stmt, Reach::SameFunction).map(|span| self.context_finding(FindingKind::BaseCallInLoop, span))
    }

    /// Walks a candidate-free loop body. The loop may run zero times unless `runs_once`.
    fn loop_body(&mut self, body: &Block, entry: CallCount, runs_once: bool) -> PathSummary {
        self.enter_jump_target(JumpKind::Loop);
        let summary = self.block(body, entry);
        let target = self.leave_jump_target();
        match summary {
            PathSummary::DiagnosticFound(_) => summary,
            PathSummary::Returns if runs_once && target.reached.is_none() => PathSummary::Returns,
            PathSummary::Counting(_) | PathSummary::Returns => PathSummary::Counting(entry),
        }
    }

    fn switch(&mut self, arms: &[SwitchArm], entry: CallCount) -> PathSummary {
        for arm in arms {
            for label in &arm.labels {
                if let SwitchLabel::Case(value) = label {
                    if let Some(span) = self.matcher.first_candidate_in_expr(value, Reach::SameFunction) {
                        return self.context_finding(FindingKind::BaseCallInSwitch, span);
                    }
                }
            }
            if let Some(span) = self.matcher.first_candidate_in_block(&arm.body, Reach::SameFunction) {
                return self.context_finding(FindingKind::BaseCallInSwitch, span);
            }
        }

        let mut merged = None;
        let mut exhaustive = false;
        self.enter_jump_target(JumpKind::Switch);
        for arm in arms {
            exhaustive |= arm.has_default();
            for label in &arm.labels {
                if let SwitchLabel::Case(value) = label {
                    if let ControlFlow::Break(finding) = self.expr(value, entry) {
                        self.leave_jump_target();
                        return PathSummary::DiagnosticFound(finding);
                    }
                }
            }
            let summary = self.block(&arm.body, entry);
            if let PathSummary::DiagnosticFound(_) = summary {
                self.leave_jump_target();
                return summary;
            }
            if let PathSummary::Counting(count) = summary {
                CallCount::join_into(&mut merged, count);
            }
        }
        if let Some(reached) = self.leave_jump_target().reached {
            CallCount::join_into(&mut merged, reached);
        }
        if !exhaustive {
            CallCount::join_into(&mut merged, entry);
        }

        match merged {
            Some(count) => PathSummary::Counting(count),
            None => PathSummary::Returns,
        }
    }

    fn try_statement(&mut self, body: &Block, catches: &[CatchClause], finally: Option<&Block>, entry: CallCount) -> PathSummary {
        let guarded = self.matcher.first_candidate_in_block(body, Reach::SameFunction).or_else(|| {
            catches.iter().find_map(|catch| {
                let in_filter = catch.filter.as_ref().and_then(|filter| self.matcher.first_candidate_in_expr(filter, Reach::SameFunction));
                in_filter.or_else(|| self.matcher.first_candidate_in_block(&catch.body, Reach::SameFunction))
            })
        });
        if let Some(span) = guarded {
            return self.context_finding(FindingKind::BaseCallInTryOrCatch, span);
        }

        let delta = finally.map(|block| self.finally_delta(block)).unwrap_or(CallCount::ZERO);
        self.finally_deltas.push(delta);
        let region = self.try_region(body, catches, entry);
        self.finally_deltas.pop();

        match (region, finally) {
            (PathSummary::Counting(count), Some(block)) => self.block(block, count),
            (PathSummary::Returns, Some(block)) => {
                // Exits were recorded with the finally delta already; this pass only looks for findings
                let exits = self.exits;
                let summary = self.block(block, entry);
                self.exits = exits;
                match summary {
                    found @ PathSummary::DiagnosticFound(_) => found,
                    PathSummary::Counting(_) | PathSummary::Returns => PathSummary::Returns,
                }
            }
            (region, _) => region,
        }
    }

    /// Try block and catch clauses as alternatives of one construct
    fn try_region(&mut self, body: &Block, catches: &[CatchClause], entry: CallCount) -> PathSummary {
        let mut merged = None;
        merge!(merged, self.block(body, entry));
        for catch in catches {
            let count = step!(self.optional_expr(catch.filter.as_ref(), entry));
            merge!(merged, self.block(&catch.body, count));
        }
        match merged {
            Some(count) => PathSummary::Counting(count),
            None => PathSummary::Returns,
        }
    }

    /// Calls a finally block adds to every path through it, measured in isolation
    fn finally_delta(&self, block: &Block) -> CallCount {
        let scratch = PathAnalyzer::new(self.matcher).with_halt_on_multiple(false);
        scratch.analyze(block).summary.counting().unwrap_or(CallCount::ZERO)
    }

    /// `count` plus the finally blocks entered after the first `from` ones
    fn with_finally(&self, count: CallCount, from: usize) -> CallCount {
        self.finally_deltas.iter().skip(from).fold(count, |total, delta| total.add(*delta))
    }

    fn jump(&mut self, kind: JumpKind, count: CallCount) -> PathSummary {
        // `break` leaves the innermost loop or switch, `continue` the innermost loop
        let position = match kind {
            JumpKind::Switch => self.jump_targets.len().checked_sub(1),
            JumpKind::Loop => self.jump_targets.iter().rposition(|target| target.kind == JumpKind::Loop),
        };
        let Some(position) = position else {
            return PathSummary::Counting(count);
        };
        let total = self.with_finally(count, self.jump_targets[position].finally_depth);
        CallCount::join_into(&mut self.jump_targets[position].reached, total);
        PathSummary::Returns
    }

    fn enter_jump_target(&mut self, kind: JumpKind) {
        self.jump_targets.push(JumpTarget { kind, finally_depth: self.finally_deltas.len(), reached: None });
    }

    fn leave_jump_target(&mut self) -> JumpTarget {
        self.jump_targets.pop().unwrap_or(JumpTarget { kind: JumpKind::Loop, finally_depth: 0, reached: None })
    }

    fn context_finding(&self, kind: FindingKind, span: Span) -> PathSummary {
        trace!(%kind, %span, "Base call in disallowed context");
        PathSummary::DiagnosticFound(Finding::new(kind, span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::matcher::SupertypeReceiver;
    use basecall_common::{AnalysisHost, CatchClause, ConditionalBranch, LocalFunction, MethodSignature, SwitchArm};

    fn run(body: Vec<Stmt>) -> PathOutcome {
        run_with(body, true)
    }

    fn run_with(body: Vec<Stmt>, halt: bool) -> PathOutcome {
        let (host, method) = fixtures::host_with_params(&[], body);
        let signature = host.signature(method).unwrap();
        let matcher = SignatureMatcher::new(&host, method, &signature, &SupertypeReceiver);
        let body = host.body(method).unwrap().unwrap();
        PathAnalyzer::new(&matcher).with_halt_on_multiple(halt).analyze(body)
    }

    fn call() -> Stmt {
        Stmt::expr(Expr::base_call("Test", vec![]))
    }

    fn call_at(start: usize) -> Stmt {
        Stmt::expr(Expr::base_call("Test", vec![]).at(start, start + 11))
    }

    fn cond() -> Expr {
        Expr::ident("c")
    }

    fn kind_of(outcome: &PathOutcome) -> Option<FindingKind> {
        outcome.summary.diagnostic().map(|finding| finding.kind)
    }

    #[test]
    fn test_single_call_counts_once() {
        let outcome = run(vec![call()]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
    }

    #[test]
    fn test_second_call_halts_at_its_location() {
        let outcome = run(vec![call_at(0), call_at(20), call_at(40)]);
        let finding = outcome.summary.diagnostic().unwrap();
        assert_eq!(finding.kind, FindingKind::MultipleBaseCalls);
        assert_eq!(finding.span, Span::new(20, 31));
        assert_eq!(outcome.candidates_inspected, 2);
    }

    #[test]
    fn test_without_halting_counts_continue() {
        let outcome = run_with(vec![call(), call(), call()], false);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(3)));
    }

    #[test]
    fn test_if_without_else_may_skip() {
        let outcome = run(vec![Stmt::if_then(cond(), vec![call()])]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::between(0, 1).unwrap()));
    }

    #[test]
    fn test_if_else_full_coverage() {
        let outcome = run(vec![Stmt::if_else(cond(), vec![call()], vec![call()])]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
    }

    #[test]
    fn test_else_if_chain() {
        let chain = Stmt::if_chain(vec![ConditionalBranch::new(cond(), vec![call()]), ConditionalBranch::new(Expr::ident("d"), vec![Stmt::empty()])], Some(Block::new(vec![call()])));
        let outcome = run(vec![chain]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::between(0, 1).unwrap()));
    }

    #[test]
    fn test_returning_branch_is_excluded_from_merge() {
        let outcome = run(vec![Stmt::if_then(cond(), vec![Stmt::ret(None)]), call()]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
        assert_eq!(outcome.exits.returns, Some(CallCount::ZERO));
    }

    #[test]
    fn test_all_branches_return() {
        let outcome = run(vec![Stmt::if_else(cond(), vec![call(), Stmt::ret(None)], vec![Stmt::throw(None)]), call()]);
        assert_eq!(outcome.summary, PathSummary::Returns);
        assert_eq!(outcome.exits.returns, Some(CallCount::exactly(1)));
        assert_eq!(outcome.exits.throws, Some(CallCount::ZERO));
        assert_eq!(outcome.candidates_inspected, 1);
    }

    #[test]
    fn test_call_in_return_value_counts() {
        let outcome = run(vec![Stmt::ret(Some(Expr::base_call("Test", vec![])))]);
        assert_eq!(outcome.exits.returns, Some(CallCount::exactly(1)));
    }

    #[test]
    fn test_ternary_operands_each_count() {
        let ternary = Expr::conditional(cond(), Expr::base_call("Test", vec![]), Expr::base_call("Test", vec![]));
        let outcome = run(vec![Stmt::expr(ternary)]);
        assert_eq!(kind_of(&outcome), Some(FindingKind::MultipleBaseCalls));
    }

    #[test]
    fn test_wrong_call_does_not_count() {
        let outcome = run(vec![Stmt::expr(Expr::base_call("Other", vec![]).at(2, 14)), Stmt::expr(Expr::base_call("Test", vec![Expr::int(1)]))]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::ZERO));
        assert_eq!(outcome.wrong_calls.len(), 2);
        assert_eq!(outcome.wrong_calls[0].span, Span::new(2, 14));
        assert_eq!(outcome.candidates_inspected, 1);
    }

    #[test]
    fn test_loop_with_candidate() {
        let nested = Stmt::for_loop(vec![], Some(cond()), vec![], vec![Stmt::if_else(cond(), vec![Stmt::if_then(cond(), vec![call_at(50)])], vec![])]);
        let outcome = run(vec![nested]);
        let finding = outcome.summary.diagnostic().unwrap();
        assert_eq!(finding.kind, FindingKind::BaseCallInLoop);
        assert_eq!(finding.span, Span::new(50, 61));
    }

    #[test]
    fn test_while_condition_is_part_of_loop() {
        let outcome = run(vec![Stmt::while_loop(Expr::base_call("Test", vec![]), vec![Stmt::brk()])]);
        assert_eq!(kind_of(&outcome), Some(FindingKind::BaseCallInLoop));
    }

    #[test]
    fn test_foreach_iterable_is_evaluated_once() {
        let outcome = run(vec![Stmt::foreach("item", Expr::base_call("Test", vec![]), vec![Stmt::expr(Expr::ident("item"))])]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));

        let outcome = run(vec![Stmt::foreach("item", Expr::ident("items"), vec![call()])]);
        assert_eq!(kind_of(&outcome), Some(FindingKind::BaseCallInLoop));
    }

    #[test]
    fn test_return_inside_loop_is_recorded() {
        let outcome = run(vec![Stmt::while_loop(cond(), vec![Stmt::ret(None)]), call()]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
        assert_eq!(outcome.exits.returns, Some(CallCount::ZERO));
    }

    #[test]
    fn test_do_while_that_always_returns() {
        let outcome = run(vec![Stmt::do_while(vec![Stmt::ret(None)], cond()), call()]);
        assert_eq!(outcome.summary, PathSummary::Returns);

        let outcome = run(vec![Stmt::do_while(vec![Stmt::if_then(cond(), vec![Stmt::brk()]), Stmt::ret(None)], cond()), call()]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
    }

    #[test]
    fn test_switch_with_candidate() {
        let arms = vec![SwitchArm::case(Expr::int(1), vec![Stmt::brk()]), SwitchArm::default_arm(vec![call_at(70), Stmt::brk()])];
        let outcome = run(vec![Stmt::switch(Expr::ident("x"), arms)]);
        let finding = outcome.summary.diagnostic().unwrap();
        assert_eq!(finding.kind, FindingKind::BaseCallInSwitch);
        assert_eq!(finding.span, Span::new(70, 81));
    }

    #[test]
    fn test_switch_scrutinee_counts() {
        let outcome = run(vec![Stmt::switch(Expr::base_call("Test", vec![]), vec![SwitchArm::default_arm(vec![Stmt::brk()])])]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
    }

    #[test]
    fn test_switch_arms_as_branches() {
        let exhaustive = vec![SwitchArm::case(Expr::int(1), vec![Stmt::ret(None)]), SwitchArm::default_arm(vec![Stmt::throw(None)])];
        assert_eq!(run(vec![Stmt::switch(Expr::ident("x"), exhaustive), call()]).summary, PathSummary::Returns);

        let partial = vec![SwitchArm::case(Expr::int(1), vec![Stmt::ret(None)])];
        assert_eq!(run(vec![Stmt::switch(Expr::ident("x"), partial), call()]).summary, PathSummary::Counting(CallCount::exactly(1)));

        let breaking = vec![SwitchArm::case(Expr::int(1), vec![Stmt::brk()]), SwitchArm::default_arm(vec![Stmt::ret(None)])];
        assert_eq!(run(vec![Stmt::switch(Expr::ident("x"), breaking), call()]).summary, PathSummary::Counting(CallCount::exactly(1)));
    }

    #[test]
    fn test_switch_expression_arm_candidate() {
        let switch = Expr::switch(Expr::ident("x"), vec![SwitchExprArm { pattern: None, guard: None, value: Expr::base_call("Test", vec![]) }]);
        let outcome = run(vec![Stmt::local("v", None, Some(switch))]);
        assert_eq!(kind_of(&outcome), Some(FindingKind::BaseCallInSwitch));
    }

    #[test]
    fn test_try_with_candidate() {
        let in_try = Stmt::try_catch(vec![call()], vec![CatchClause::new(None, Block::empty())], None);
        assert_eq!(kind_of(&run(vec![in_try])), Some(FindingKind::BaseCallInTryOrCatch));

        let in_catch = Stmt::try_catch(Block::empty(), vec![CatchClause::new(Some("Exception".into()), vec![call()])], None);
        assert_eq!(kind_of(&run(vec![in_catch])), Some(FindingKind::BaseCallInTryOrCatch));

        let in_filter = Stmt::try_catch(Block::empty(), vec![CatchClause::new(None, Block::empty()).with_filter(Expr::base_call("Test", vec![]))], None);
        assert_eq!(kind_of(&run(vec![in_filter])), Some(FindingKind::BaseCallInTryOrCatch));
    }

    #[test]
    fn test_finally_always_runs() {
        let outcome = run(vec![Stmt::try_catch(vec![Stmt::expr(Expr::int(1))], vec![CatchClause::new(None, vec![Stmt::throw(None)])], Some(Block::new(vec![call()])))]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
        assert_eq!(outcome.exits.throws, Some(CallCount::exactly(1)));
    }

    #[test]
    fn test_finally_counts_on_early_return() {
        let outcome = run(vec![Stmt::try_catch(vec![Stmt::ret(None)], vec![], Some(Block::new(vec![call()])))]);
        assert_eq!(outcome.summary, PathSummary::Returns);
        assert_eq!(outcome.exits.returns, Some(CallCount::exactly(1)));
        assert!(outcome.wrong_calls.is_empty());
    }

    #[test]
    fn test_finally_after_call_is_multiple() {
        let outcome = run(vec![call(), Stmt::try_catch(vec![Stmt::ret(None)], vec![], Some(Block::new(vec![call_at(90)])))]);
        let finding = outcome.summary.diagnostic().unwrap();
        assert_eq!(finding.kind, FindingKind::MultipleBaseCalls);
        assert_eq!(finding.span, Span::new(90, 101));
    }

    #[test]
    fn test_closures_and_local_functions_are_opaque() {
        let outcome = run(vec![
            Stmt::expr(Expr::assign(Expr::ident("f"), Expr::lambda_block(vec![call()]))),
            Stmt::local_function(LocalFunction::new("Helper", vec![call()])),
            Stmt::while_loop(cond(), vec![Stmt::expr(Expr::lambda_block(vec![call()]))]),
        ]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::ZERO));
        assert_eq!(outcome.candidates_inspected, 0);
    }

    #[test]
    fn test_using_and_blocks_are_transparent() {
        let outcome = run(vec![Stmt::using(Expr::new_object("Scope", vec![]), vec![Stmt::block(vec![call()])])]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
    }

    #[test]
    fn test_condition_calls_apply_to_reaching_paths() {
        let chain = Stmt::if_chain(vec![ConditionalBranch::new(cond(), vec![Stmt::ret(None)]), ConditionalBranch::new(Expr::base_call("Test", vec![]), Block::empty())], None);
        let outcome = run(vec![chain]);
        assert_eq!(outcome.summary, PathSummary::Counting(CallCount::exactly(1)));
        assert_eq!(outcome.exits.returns, Some(CallCount::ZERO));
    }

    #[test]
    fn test_signature_from_fixture() {
        let (host, method) = fixtures::host_with_params(&[("a", "int")], vec![]);
        assert_eq!(host.signature(method).unwrap(), MethodSignature::new("Test").with_parameter("a", "int"));
    }
}
