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

//! Structured method-body tree
//!
//! The host lowers a method body into this reduced tree before analysis:
//! - statements and expressions are closed enums, one dispatch arm per kind
//! - every node carries a [`Span`]
//! - expressions may carry a static type resolved by the host
//!
//! In JSON a node is an object tagged by its `kind`, for example
//! `{"kind": "ident", "name": "x", "span": [4, 5]}`.

use crate::method::{Parameter, TypeName};
use crate::span::Span;
use serde::{Deserialize, Serialize};

/// A sequence of statements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts, span: Span::dummy() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn at(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Self::new(stmts)
    }
}

/// A statement node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    #[serde(flatten)]
    pub kind: StmtKind,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StmtKind {
    /// Expression evaluated for its effect
    Expr { expr: Expr },
    /// Local variable declaration
    Local {
        name: String,
        #[serde(default)]
        declared: Option<TypeName>,
        #[serde(default)]
        init: Option<Expr>,
    },
    /// Bare nested block
    Block { block: Block },
    /// Scoped resource; the resource is evaluated once before the body
    Using {
        #[serde(default)]
        binding: Option<String>,
        resource: Expr,
        body: Block,
    },
    /// `if` / `else if` chain with an optional trailing `else`
    If {
        branches: Vec<ConditionalBranch>,
        #[serde(default)]
        otherwise: Option<Block>,
    },
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },
    Throw {
        #[serde(default)]
        value: Option<Expr>,
    },
    While { cond: Expr, body: Block },
    DoWhile { body: Block, cond: Expr },
    For {
        #[serde(default)]
        init: Vec<Stmt>,
        #[serde(default)]
        cond: Option<Expr>,
        #[serde(default)]
        update: Vec<Expr>,
        body: Block,
    },
    ForEach {
        binding: String,
        #[serde(default)]
        declared: Option<TypeName>,
        iterable: Expr,
        body: Block,
    },
    Switch { scrutinee: Expr, arms: Vec<SwitchArm> },
    Try {
        body: Block,
        #[serde(default)]
        catches: Vec<CatchClause>,
        #[serde(default)]
        finally: Option<Block>,
    },
    LocalFunction { function: LocalFunction },
    Break,
    Continue,
    Empty,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self { kind, span: Span::dummy() }
    }

    pub fn at(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }

    pub fn expr(expr: Expr) -> Self {
        Self::new(StmtKind::Expr { expr })
    }

    pub fn local(name: impl Into<String>, declared: Option<TypeName>, init: Option<Expr>) -> Self {
        Self::new(StmtKind::Local { name: name.into(), declared, init })
    }

    pub fn block(block: impl Into<Block>) -> Self {
        Self::new(StmtKind::Block { block: block.into() })
    }

    pub fn using(resource: Expr, body: impl Into<Block>) -> Self {
        Self::new(StmtKind::Using { binding: None, resource, body: body.into() })
    }

    pub fn if_then(cond: Expr, then: impl Into<Block>) -> Self {
        Self::if_chain(vec![ConditionalBranch::new(cond, then)], None)
    }

    pub fn if_else(cond: Expr, then: impl Into<Block>, otherwise: impl Into<Block>) -> Self {
        Self::if_chain(vec![ConditionalBranch::new(cond, then)], Some(otherwise.into()))
    }

    pub fn if_chain(branches: Vec<ConditionalBranch>, otherwise: Option<Block>) -> Self {
        Self::new(StmtKind::If { branches, otherwise })
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Return { value })
    }

    pub fn throw(value: Option<Expr>) -> Self {
        Self::new(StmtKind::Throw { value })
    }

    pub fn while_loop(cond: Expr, body: impl Into<Block>) -> Self {
        Self::new(StmtKind::While { cond, body: body.into() })
    }

    pub fn do_while(body: impl Into<Block>, cond: Expr) -> Self {
        Self::new(StmtKind::DoWhile { body: body.into(), cond })
    }

    pub fn for_loop(init: Vec<Stmt>, cond: Option<Expr>, update: Vec<Expr>, body: impl Into<Block>) -> Self {
        Self::new(StmtKind::For { init, cond, update, body: body.into() })
    }

    pub fn foreach(binding: impl Into<String>, iterable: Expr, body: impl Into<Block>) -> Self {
        Self::new(StmtKind::ForEach {
            binding: binding.into(),
            declared: None,
            iterable,
            body: body.into(),
        })
    }

    pub fn switch(scrutinee: Expr, arms: Vec<SwitchArm>) -> Self {
        Self::new(StmtKind::Switch { scrutinee, arms })
    }

    pub fn try_catch(body: impl Into<Block>, catches: Vec<CatchClause>, finally: Option<Block>) -> Self {
        Self::new(StmtKind::Try { body: body.into(), catches, finally })
    }

    pub fn local_function(function: LocalFunction) -> Self {
        Self::new(StmtKind::LocalFunction { function })
    }

    pub fn brk() -> Self {
        Self::new(StmtKind::Break)
    }

    pub fn cont() -> Self {
        Self::new(StmtKind::Continue)
    }

    pub fn empty() -> Self {
        Self::new(StmtKind::Empty)
    }
}

/// One `if` or `else if` arm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalBranch {
    pub cond: Expr,
    pub body: Block,
}

impl ConditionalBranch {
    pub fn new(cond: Expr, body: impl Into<Block>) -> Self {
        Self { cond, body: body.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwitchLabel {
    Case(Expr),
    Default,
}

/// A switch section: one or more labels sharing a body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchArm {
    pub labels: Vec<SwitchLabel>,
    pub body: Block,
    #[serde(default)]
    pub span: Span,
}

impl SwitchArm {
    pub fn new(labels: Vec<SwitchLabel>, body: impl Into<Block>) -> Self {
        Self { labels, body: body.into(), span: Span::dummy() }
    }

    pub fn case(value: Expr, body: impl Into<Block>) -> Self {
        Self::new(vec![SwitchLabel::Case(value)], body)
    }

    pub fn default_arm(body: impl Into<Block>) -> Self {
        Self::new(vec![SwitchLabel::Default], body)
    }

    pub fn has_default(&self) -> bool {
        self.labels.iter().any(|label| matches!(label, SwitchLabel::Default))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default)]
    pub ty: Option<TypeName>,
    #[serde(default)]
    pub binding: Option<String>,
    #[serde(default)]
    pub filter: Option<Expr>,
    pub body: Block,
    #[serde(default)]
    pub span: Span,
}

impl CatchClause {
    pub fn new(ty: Option<TypeName>, body: impl Into<Block>) -> Self {
        Self {
            ty,
            binding: None,
            filter: None,
            body: body.into(),
            span: Span::dummy(),
        }
    }

    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = Some(binding.into());
        self
    }

    pub fn with_filter(mut self, filter: Expr) -> Self {
        self.filter = Some(filter);
        self
    }
}

/// Body of a closure or local function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionBody {
    Block(Block),
    Expr(Box<Expr>),
}

/// Anonymous function literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Closure {
    #[serde(default)]
    pub params: Vec<String>,
    pub body: FunctionBody,
}

/// Named function declared inside a method body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalFunction {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    #[serde(default)]
    pub returns: Option<TypeName>,
    pub body: FunctionBody,
}

impl LocalFunction {
    pub fn new(name: impl Into<String>, body: impl Into<Block>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            body: FunctionBody::Block(body.into()),
        }
    }

    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.params = params;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Null,
}

/// An expression node with its optional host-resolved static type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ty: Option<TypeName>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    Literal { value: LiteralValue },
    Ident { name: String },
    /// Supertype reference
    Base,
    This,
    Member { object: Box<Expr>, member: String },
    Call {
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Unary { op: String, operand: Box<Expr> },
    Binary { op: String, lhs: Box<Expr>, rhs: Box<Expr> },
    Assign { target: Box<Expr>, value: Box<Expr> },
    Conditional { cond: Box<Expr>, then: Box<Expr>, otherwise: Box<Expr> },
    Interpolation { parts: Vec<Expr> },
    Cast { target: TypeName, operand: Box<Expr> },
    New {
        class: TypeName,
        #[serde(default)]
        args: Vec<Expr>,
    },
    Lambda { closure: Closure },
    Switch { scrutinee: Box<Expr>, arms: Vec<SwitchExprArm> },
}

/// Arm of a switch expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchExprArm {
    /// `None` is the discard pattern
    #[serde(default)]
    pub pattern: Option<Expr>,
    #[serde(default)]
    pub guard: Option<Expr>,
    pub value: Expr,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, span: Span::dummy(), ty: None }
    }

    pub fn at(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }

    pub fn typed(mut self, ty: impl Into<TypeName>) -> Self {
        self.ty = Some(ty.into());
        self
    }

    pub fn base() -> Self {
        Self::new(ExprKind::Base)
    }

    pub fn this() -> Self {
        Self::new(ExprKind::This)
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Ident { name: name.into() })
    }

    pub fn literal(value: LiteralValue) -> Self {
        Self::new(ExprKind::Literal { value })
    }

    pub fn int(value: i64) -> Self {
        Self::literal(LiteralValue::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Self::literal(LiteralValue::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::literal(LiteralValue::Str(value.into()))
    }

    pub fn boolean(value: bool) -> Self {
        Self::literal(LiteralValue::Bool(value))
    }

    pub fn null() -> Self {
        Self::literal(LiteralValue::Null)
    }

    pub fn member(object: Expr, member: impl Into<String>) -> Self {
        Self::new(ExprKind::Member { object: Box::new(object), member: member.into() })
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::Call { callee: Box::new(callee), args })
    }

    /// `object.member(args)`
    pub fn method_call(object: Expr, member: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::call(Self::member(object, member), args)
    }

    /// `base.member(args)`
    pub fn base_call(member: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::method_call(Self::base(), member, args)
    }

    pub fn unary(op: impl Into<String>, operand: Expr) -> Self {
        Self::new(ExprKind::Unary { op: op.into(), operand: Box::new(operand) })
    }

    pub fn binary(op: impl Into<String>, lhs: Expr, rhs: Expr) -> Self {
        Self::new(ExprKind::Binary { op: op.into(), lhs: Box::new(lhs), rhs: Box::new(rhs) })
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::new(ExprKind::Assign { target: Box::new(target), value: Box::new(value) })
    }

    pub fn conditional(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::new(ExprKind::Conditional { cond: Box::new(cond), then: Box::new(then), otherwise: Box::new(otherwise) })
    }

    pub fn interpolation(parts: Vec<Expr>) -> Self {
        Self::new(ExprKind::Interpolation { parts })
    }

    pub fn cast(target: impl Into<TypeName>, operand: Expr) -> Self {
        Self::new(ExprKind::Cast { target: target.into(), operand: Box::new(operand) })
    }

    pub fn new_object(class: impl Into<TypeName>, args: Vec<Expr>) -> Self {
        Self::new(ExprKind::New { class: class.into(), args })
    }

    pub fn lambda(params: Vec<String>, body: FunctionBody) -> Self {
        Self::new(ExprKind::Lambda { closure: Closure { params, body } })
    }

    /// Closure with a block body and no parameters
    pub fn lambda_block(body: impl Into<Block>) -> Self {
        Self::lambda(Vec::new(), FunctionBody::Block(body.into()))
    }

    pub fn switch(scrutinee: Expr, arms: Vec<SwitchExprArm>) -> Self {
        Self::new(ExprKind::Switch { scrutinee: Box::new(scrutinee), arms })
    }

    /// Splits `object.member(args)` into its parts
    pub fn as_member_call(&self) -> Option<(&Expr, &str, &[Expr])> {
        match &self.kind {
            ExprKind::Call { callee, args } => match &callee.kind {
                ExprKind::Member { object, member } => Some((object.as_ref(), member.as_str(), args.as_slice())),
                _ => None,
            },
            _ => None,
        }
    }
}
