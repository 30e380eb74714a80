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

//! Host collaborator interface
//!
//! The analyzer never loads projects or resolves symbols itself. Everything it
//! needs to know about a method is asked through [`AnalysisHost`].

use crate::method::{DeclaredMarkers, MethodId, MethodSignature, OverrideChain, TypeName};
use crate::span::Span;
use crate::syntax::{Block, Expr};
use thiserror::Error;

/// Errors a host can report for a single method
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("Unknown method {0}")]
    UnknownMethod(MethodId),

    #[error("Overridden declaration of '{method}' cannot be resolved")]
    UnresolvedOverride { method: String },

    #[error("Host information unavailable: {reason}")]
    Unavailable { reason: String },
}

pub type HostResult<T> = Result<T, HostError>;

/// Queries the analyzer issues against the program being analyzed.
///
/// Implementations must be shareable across threads: units are analyzed in
/// parallel with one shared host and no locking.
pub trait AnalysisHost: Send + Sync {
    /// Methods of the unit, in declaration order
    fn methods(&self) -> Vec<MethodId>;

    /// `None` for declarations without a body
    fn body(&self, method: MethodId) -> HostResult<Option<&Block>>;

    /// Chain from `method` up to its root declaration. Empty when `method` overrides nothing.
    fn override_chain(&self, method: MethodId) -> HostResult<OverrideChain>;

    fn markers(&self, method: MethodId) -> HostResult<DeclaredMarkers>;

    fn signature(&self, method: MethodId) -> HostResult<MethodSignature>;

    fn declaration_span(&self, method: MethodId) -> HostResult<Span>;

    /// Static type of `expr` as seen from inside `method`
    fn expression_type(&self, _method: MethodId, expr: &Expr) -> Option<TypeName> {
        expr.ty.clone()
    }

    /// Whether a value of type `from` may be passed where `to` is declared
    fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        from == to
    }

    /// Whether `identifier`, read inside `method`, denotes the next implementation in a mixin chain
    fn is_next_chain_accessor(&self, _method: MethodId, _identifier: &str) -> bool {
        false
    }
}
