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

//! Signature matching
//!
//! Classifies call expressions against the enclosing method:
//! - **Not a base call**: the receiver is not accepted by the active [`ReceiverStrategy`]
//! - **Wrong**: a base call to another member, or with a different argument list
//! - **Matching**: same member name, same arity, every argument assignable to its parameter
//!
//! A *candidate* is a base call that names the enclosing method, whether or not its
//! arguments match. Disallowed-context rules fire on candidates.

pub mod receiver;

pub use receiver::{NextInChainReceiver, ReceiverScope, ReceiverStrategy, SupertypeReceiver};

use basecall_common::visit::{Visitor, walk_expr, walk_function_body};
use basecall_common::{AnalysisHost, Block, Closure, Expr, FunctionBody, LocalFunction, MethodId, MethodSignature, Span, Stmt, TypeName};
use std::fmt;
use std::ops::ControlFlow;
use tracing::trace;

/// Why a base call does not match the enclosing signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    Name { found: String },
    Arity { expected: usize, found: usize },
    ArgumentType { index: usize, expected: TypeName, found: TypeName },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Name { found } => write!(f, "calls '{}'", found),
            Mismatch::Arity { expected, found } => write!(f, "passes {} arguments, {} expected", found, expected),
            Mismatch::ArgumentType { index, expected, found } => write!(f, "argument {} is '{}', '{}' expected", index, found, expected),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BaseCallMatch {
    NotABaseCall,
    Wrong(Mismatch),
    Matching,
}

impl BaseCallMatch {
    /// Base call naming the enclosing method
    pub fn is_candidate(&self) -> bool {
        match self {
            BaseCallMatch::Matching => true,
            BaseCallMatch::Wrong(Mismatch::Name { .. }) => false,
            BaseCallMatch::Wrong(_) => true,
            BaseCallMatch::NotABaseCall => false,
        }
    }
}

/// How far a candidate search looks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reach {
    /// Stop at closures and local functions
    SameFunction,
    /// Descend into closures and local functions at any depth
    Nested,
}

/// Matches calls against the signature of one analyzed method
#[derive(Clone, Copy)]
pub struct SignatureMatcher<'a> {
    host: &'a dyn AnalysisHost,
    method: MethodId,
    signature: &'a MethodSignature,
    receiver: &'a dyn ReceiverStrategy,
}

impl fmt::Debug for SignatureMatcher<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureMatcher").field("method", &self.method).field("signature", &self.signature).field("receiver", &self.receiver.name()).finish()
    }
}

impl<'a> SignatureMatcher<'a> {
    pub fn new(host: &'a dyn AnalysisHost, method: MethodId, signature: &'a MethodSignature, receiver: &'a dyn ReceiverStrategy) -> Self {
        Self { host, method, signature, receiver }
    }

    pub fn signature(&self) -> &'a MethodSignature {
        self.signature
    }

    pub fn method(&self) -> MethodId {
        self.method
    }

    pub fn host(&self) -> &'a dyn AnalysisHost {
        self.host
    }

    pub fn is_base_receiver(&self, receiver: &Expr) -> bool {
        self.receiver.is_base_receiver(receiver, &ReceiverScope { host: self.host, method: self.method })
    }

    /// Classify a call expression; any other expression is not a base call
    pub fn classify(&self, call: &Expr) -> BaseCallMatch {
        let Some((object, member, args)) = call.as_member_call() else {
            return BaseCallMatch::NotABaseCall;
        };
        if !self.is_base_receiver(object) {
            return BaseCallMatch::NotABaseCall;
        }

        let outcome = self.match_arguments(member, args);
        trace!(member, span = %call.span, outcome = ?outcome, "Classified base call");
        outcome
    }

    fn match_arguments(&self, member: &str, args: &[Expr]) -> BaseCallMatch {
        if member != self.signature.name {
            return BaseCallMatch::Wrong(Mismatch::Name { found: member.to_string() });
        }
        if args.len() != self.signature.arity() {
            return BaseCallMatch::Wrong(Mismatch::Arity { expected: self.signature.arity(), found: args.len() });
        }
        for (index, (arg, expected)) in args.iter().zip(self.signature.parameter_types()).enumerate() {
            // Arguments the host cannot type are given the benefit of the doubt
            let Some(found) = self.host.expression_type(self.method, arg) else {
                continue;
            };
            if !self.host.is_assignable(&found, expected) {
                return BaseCallMatch::Wrong(Mismatch::ArgumentType { index, expected: expected.clone(), found });
            }
        }
        BaseCallMatch::Matching
    }

    /// Whether `call` is a base call naming the enclosing method
    pub fn is_candidate(&self, call: &Expr) -> bool {
        match call.as_member_call() {
            Some((object, member, _)) => member == self.signature.name && self.is_base_receiver(object),
            None => false,
        }
    }

    pub fn first_candidate_in_block(&self, block: &Block, reach: Reach) -> Option<Span> {
        self.search(reach, |search| search.visit_block(block))
    }

    pub fn first_candidate_in_stmt(&self, stmt: &Stmt, reach: Reach) -> Option<Span> {
        self.search(reach, |search| search.visit_stmt(stmt))
    }

    pub fn first_candidate_in_expr(&self, expr: &Expr, reach: Reach) -> Option<Span> {
        self.search(reach, |search| search.visit_expr(expr))
    }

    pub fn first_candidate_in_body(&self, body: &FunctionBody, reach: Reach) -> Option<Span> {
        self.search(reach, |search| walk_function_body(search, body))
    }

    fn search<'m>(&'m self, reach: Reach, run: impl FnOnce(&mut CandidateSearch<'m, 'a>) -> ControlFlow<Span>) -> Option<Span> {
        let mut search = CandidateSearch { matcher: self, reach };
        run(&mut search).break_value()
    }
}

/// Pre-order search for the first candidate, so an outer call wins over calls in its arguments
struct CandidateSearch<'m, 'a> {
    matcher: &'m SignatureMatcher<'a>,
    reach: Reach,
}

impl<'ast> Visitor<'ast> for CandidateSearch<'_, '_> {
    type Break = Span;

    fn visit_expr(&mut self, expr: &'ast Expr) -> ControlFlow<Span> {
        if self.matcher.is_candidate(expr) {
            return ControlFlow::Break(expr.span);
        }
        walk_expr(self, expr)
    }

    fn visit_closure(&mut self, closure: &'ast Closure, _span: Span) -> ControlFlow<Span> {
        match self.reach {
            Reach::SameFunction => ControlFlow::Continue(()),
            Reach::Nested => walk_function_body(self, &closure.body),
        }
    }

    fn visit_local_function(&mut self, function: &'ast LocalFunction, _span: Span) -> ControlFlow<Span> {
        match self.reach {
            Reach::SameFunction => ControlFlow::Continue(()),
            Reach::Nested => walk_function_body(self, &function.body),
        }
    }
}
