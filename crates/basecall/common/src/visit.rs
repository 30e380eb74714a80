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

//! Early-exit visitor over the method-body tree
//!
//! Every `visit_*` method defaults to the matching `walk_*` function, so an
//! implementation only overrides the nodes it cares about. Returning
//! `ControlFlow::Break` stops the whole traversal.

use crate::span::Span;
use crate::syntax::{Block, Closure, Expr, ExprKind, FunctionBody, LocalFunction, Stmt, StmtKind, SwitchLabel};
use std::ops::ControlFlow;

pub trait Visitor<'ast> {
    type Break;

    fn visit_block(&mut self, block: &'ast Block) -> ControlFlow<Self::Break> {
        walk_block(self, block)
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) -> ControlFlow<Self::Break> {
        walk_stmt(self, stmt)
    }

    fn visit_expr(&mut self, expr: &'ast Expr) -> ControlFlow<Self::Break> {
        walk_expr(self, expr)
    }

    /// `span` is the span of the lambda expression
    fn visit_closure(&mut self, closure: &'ast Closure, _span: Span) -> ControlFlow<Self::Break> {
        walk_function_body(self, &closure.body)
    }

    /// `span` is the span of the declaring statement
    fn visit_local_function(&mut self, function: &'ast LocalFunction, _span: Span) -> ControlFlow<Self::Break> {
        walk_function_body(self, &function.body)
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, block: &'ast Block) -> ControlFlow<V::Break> {
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt)?;
    }
    ControlFlow::Continue(())
}

pub fn walk_function_body<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, body: &'ast FunctionBody) -> ControlFlow<V::Break> {
    match body {
        FunctionBody::Block(block) => visitor.visit_block(block),
        FunctionBody::Expr(expr) => visitor.visit_expr(expr),
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, stmt: &'ast Stmt) -> ControlFlow<V::Break> {
    match &stmt.kind {
        StmtKind::Expr { expr } => visitor.visit_expr(expr),
        StmtKind::Local { init, .. } => match init {
            Some(init) => visitor.visit_expr(init),
            None => ControlFlow::Continue(()),
        },
        StmtKind::Block { block } => visitor.visit_block(block),
        StmtKind::Using { resource, body, .. } => {
            visitor.visit_expr(resource)?;
            visitor.visit_block(body)
        }
        StmtKind::If { branches, otherwise } => {
            for branch in branches {
                visitor.visit_expr(&branch.cond)?;
                visitor.visit_block(&branch.body)?;
            }
            match otherwise {
                Some(block) => visitor.visit_block(block),
                None => ControlFlow::Continue(()),
            }
        }
        StmtKind::Return { value } | StmtKind::Throw { value } => match value {
            Some(value) => visitor.visit_expr(value),
            None => ControlFlow::Continue(()),
        },
        StmtKind::While { cond, body } => {
            visitor.visit_expr(cond)?;
            visitor.visit_block(body)
        }
        StmtKind::DoWhile { body, cond } => {
            visitor.visit_block(body)?;
            visitor.visit_expr(cond)
        }
        StmtKind::For { init, cond, update, body } => {
            for stmt in init {
                visitor.visit_stmt(stmt)?;
            }
            if let Some(cond) = cond {
                visitor.visit_expr(cond)?;
            }
            for expr in update {
                visitor.visit_expr(expr)?;
            }
            visitor.visit_block(body)
        }
        StmtKind::ForEach { iterable, body, .. } => {
            visitor.visit_expr(iterable)?;
            visitor.visit_block(body)
        }
        StmtKind::Switch { scrutinee, arms } => {
            visitor.visit_expr(scrutinee)?;
            for arm in arms {
                for label in &arm.labels {
                    if let SwitchLabel::Case(value) = label {
                        visitor.visit_expr(value)?;
                    }
                }
                visitor.visit_block(&arm.body)?;
            }
            ControlFlow::Continue(())
        }
        StmtKind::Try { body, catches, finally } => {
            visitor.visit_block(body)?;
            for catch in catches {
                if let Some(filter) = &catch.filter {
                    visitor.visit_expr(filter)?;
                }
                visitor.visit_block(&catch.body)?;
            }
            match finally {
                Some(block) => visitor.visit_block(block),
                None => ControlFlow::Continue(()),
            }
        }
        StmtKind::LocalFunction { function } => visitor.visit_local_function(function, stmt.span),
        StmtKind::Break | StmtKind::Continue | StmtKind::Empty => ControlFlow::Continue(()),
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, expr: &'ast Expr) -> ControlFlow<V::Break> {
    match &expr.kind {
        ExprKind::Literal { .. } | ExprKind::Ident { .. } | ExprKind::Base | ExprKind::This => ControlFlow::Continue(()),
        ExprKind::Member { object, .. } => visitor.visit_expr(object),
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee)?;
            args.iter().try_for_each(|arg| visitor.visit_expr(arg))
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Binary { lhs, rhs, .. } => {
            visitor.visit_expr(lhs)?;
            visitor.visit_expr(rhs)
        }
        ExprKind::Assign { target, value } => {
            visitor.visit_expr(target)?;
            visitor.visit_expr(value)
        }
        ExprKind::Conditional { cond, then, otherwise } => {
            visitor.visit_expr(cond)?;
            visitor.visit_expr(then)?;
            visitor.visit_expr(otherwise)
        }
        ExprKind::Interpolation { parts } => parts.iter().try_for_each(|part| visitor.visit_expr(part)),
        ExprKind::Cast { operand, .. } => visitor.visit_expr(operand),
        ExprKind::New { args, .. } => args.iter().try_for_each(|arg| visitor.visit_expr(arg)),
        ExprKind::Lambda { closure } => visitor.visit_closure(closure, expr.span),
        ExprKind::Switch { scrutinee, arms } => {
            visitor.visit_expr(scrutinee)?;
            for arm in arms {
                if let Some(pattern) = &arm.pattern {
                    visitor.visit_expr(pattern)?;
                }
                if let Some(guard) = &arm.guard {
                    visitor.visit_expr(guard)?;
                }
                visitor.visit_expr(&arm.value)?;
            }
            ControlFlow::Continue(())
        }
    }
}

/// Tracks statement/expression nesting and stops once `limit` is exceeded
struct DepthProbe {
    depth: usize,
    deepest: usize,
    limit: usize,
}

impl DepthProbe {
    fn enter(&mut self) -> ControlFlow<usize> {
        self.depth += 1;
        self.deepest = self.deepest.max(self.depth);
        if self.depth > self.limit { ControlFlow::Break(self.depth) } else { ControlFlow::Continue(()) }
    }
}

impl<'ast> Visitor<'ast> for DepthProbe {
    type Break = usize;

    fn visit_stmt(&mut self, stmt: &'ast Stmt) -> ControlFlow<usize> {
        self.enter()?;
        walk_stmt(self, stmt)?;
        self.depth -= 1;
        ControlFlow::Continue(())
    }

    fn visit_expr(&mut self, expr: &'ast Expr) -> ControlFlow<usize> {
        self.enter()?;
        walk_expr(self, expr)?;
        self.depth -= 1;
        ControlFlow::Continue(())
    }
}

/// Nesting depth of `block`, or `Err(depth)` as soon as it exceeds `limit`.
///
/// The walk never recurses deeper than `limit + 1` levels.
pub fn nesting_depth(block: &Block, limit: usize) -> Result<usize, usize> {
    let mut probe = DepthProbe { depth: 0, deepest: 0, limit };
    match probe.visit_block(block) {
        ControlFlow::Continue(()) => Ok(probe.deepest),
        ControlFlow::Break(depth) => Err(depth),
    }
}
