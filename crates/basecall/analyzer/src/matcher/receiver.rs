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

//! What counts as a base-call receiver

use basecall_common::{AnalysisHost, Expr, ExprKind, MethodId};
use std::fmt;

/// Context a receiver is judged in
#[derive(Clone, Copy)]
pub struct ReceiverScope<'a> {
    pub host: &'a dyn AnalysisHost,
    pub method: MethodId,
}

impl fmt::Debug for ReceiverScope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReceiverScope").field("method", &self.method).finish_non_exhaustive()
    }
}

/// Decides whether the object of a member call denotes the overridden implementation.
///
/// One strategy is chosen per analysis and shared by every rule.
pub trait ReceiverStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn is_base_receiver(&self, receiver: &Expr, scope: &ReceiverScope<'_>) -> bool;
}

/// Only the supertype reference (`base`, `super`) is a receiver
#[derive(Debug, Clone, Copy, Default)]
pub struct SupertypeReceiver;

impl ReceiverStrategy for SupertypeReceiver {
    fn name(&self) -> &'static str {
        "supertype"
    }

    fn is_base_receiver(&self, receiver: &Expr, _scope: &ReceiverScope<'_>) -> bool {
        matches!(receiver.kind, ExprKind::Base)
    }
}

/// The supertype reference, or an identifier the host resolves to the mixin's next implementation
#[derive(Debug, Clone, Copy, Default)]
pub struct NextInChainReceiver;

impl ReceiverStrategy for NextInChainReceiver {
    fn name(&self) -> &'static str {
        "next_in_chain"
    }

    fn is_base_receiver(&self, receiver: &Expr, scope: &ReceiverScope<'_>) -> bool {
        match &receiver.kind {
            ExprKind::Base => true,
            ExprKind::Ident { name } => scope.host.is_next_chain_accessor(scope.method, name),
            _ => false,
        }
    }
}
