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

//! Shared vocabulary for base-call contract analysis
//!
//! This crate holds the types every other basecall crate speaks:
//! - `span`: source locations attached to every node
//! - `syntax`: the structured, typed method-body tree handed over by a host
//! - `method`: signatures, policy markers and override chains
//! - `host`: the collaborator interface the analyzer queries
//! - `visit`: a generic early-exit visitor over the body tree

pub mod host;
pub mod method;
pub mod span;
pub mod syntax;
pub mod visit;

pub use host::{AnalysisHost, HostError, HostResult};
pub use method::{DeclaredMarkers, MethodId, MethodSignature, OverrideChain, OverrideLink, Parameter, PolicyMode, ReturnKind, TypeName};
pub use span::Span;
pub use syntax::{Block, CatchClause, Closure, ConditionalBranch, Expr, ExprKind, FunctionBody, LiteralValue, LocalFunction, Stmt, StmtKind, SwitchArm, SwitchExprArm, SwitchLabel};
pub use visit::Visitor;
