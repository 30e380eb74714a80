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

//! Configuration types for base-call analysis

use crate::matcher::{NextInChainReceiver, ReceiverStrategy, SupertypeReceiver};
use serde::{Deserialize, Serialize};
use std::fmt;

static SUPERTYPE: SupertypeReceiver = SupertypeReceiver;
static NEXT_IN_CHAIN: NextInChainReceiver = NextInChainReceiver;

/// Receiver strategy selected for an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiverKind {
    #[default]
    Supertype,
    NextInChain,
}

impl ReceiverKind {
    pub fn strategy(self) -> &'static dyn ReceiverStrategy {
        match self {
            ReceiverKind::Supertype => &SUPERTYPE,
            ReceiverKind::NextInChain => &NEXT_IN_CHAIN,
        }
    }
}

impl fmt::Display for ReceiverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strategy().name())
    }
}

/// Configuration for the base-call analysis engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Verbosity level: 0 = quiet, 1 = normal, 2 = verbose
    pub verbosity: u8,
    /// Analyze the methods of a unit in parallel
    pub enable_parallel: bool,
    /// Maximum nesting depth of a method body
    pub max_depth: usize,
    /// What counts as a base-call receiver
    pub receiver: ReceiverKind,
    /// Paths ending in `throw` must also make the base call; off exempts throwing guard clauses
    pub throw_paths_require_base_call: bool,
    /// Drop wrong-call and context findings for methods that are not classified
    pub gate_context_findings: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            verbosity: 1,
            enable_parallel: false,
            max_depth: 256,
            receiver: ReceiverKind::Supertype,
            throw_paths_require_base_call: true,
            gate_context_findings: false,
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set verbosity level
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set maximum body nesting depth
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enable or disable parallel analysis
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.enable_parallel = enable;
        self
    }

    pub fn with_receiver(mut self, receiver: ReceiverKind) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn with_throw_paths_require_base_call(mut self, enable: bool) -> Self {
        self.throw_paths_require_base_call = enable;
        self
    }

    pub fn with_gate_context_findings(mut self, enable: bool) -> Self {
        self.gate_context_findings = enable;
        self
    }

    /// Check if verbose logging is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbosity > 0
    }

    /// Check if debug logging is enabled
    pub fn is_debug(&self) -> bool {
        self.verbosity > 1
    }
}
