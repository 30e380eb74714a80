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

//! Finding kinds and records

use basecall_common::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stable identifiers of every rule the analyzer enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FindingKind {
    MissingBaseCall,
    BaseCallInLoop,
    BaseCallInAnonymousFunction,
    BaseCallInLocalFunction,
    MultipleBaseCalls,
    WrongBaseCall,
    BaseCallInTryOrCatch,
    BaseCallInNonOverridingMethod,
    BaseCallInSwitch,
}

impl FindingKind {
    pub const ALL: [FindingKind; 9] = [
        FindingKind::MissingBaseCall,
        FindingKind::BaseCallInLoop,
        FindingKind::BaseCallInAnonymousFunction,
        FindingKind::BaseCallInLocalFunction,
        FindingKind::MultipleBaseCalls,
        FindingKind::WrongBaseCall,
        FindingKind::BaseCallInTryOrCatch,
        FindingKind::BaseCallInNonOverridingMethod,
        FindingKind::BaseCallInSwitch,
    ];

    /// Identifier exchanged with hosts
    pub fn code(self) -> &'static str {
        match self {
            FindingKind::MissingBaseCall => "MissingBaseCall",
            FindingKind::BaseCallInLoop => "BaseCallInLoop",
            FindingKind::BaseCallInAnonymousFunction => "BaseCallInAnonymousFunction",
            FindingKind::BaseCallInLocalFunction => "BaseCallInLocalFunction",
            FindingKind::MultipleBaseCalls => "MultipleBaseCalls",
            FindingKind::WrongBaseCall => "WrongBaseCall",
            FindingKind::BaseCallInTryOrCatch => "BaseCallInTryOrCatch",
            FindingKind::BaseCallInNonOverridingMethod => "BaseCallInNonOverridingMethod",
            FindingKind::BaseCallInSwitch => "BaseCallInSwitch",
        }
    }

    /// Position in [`FindingKind::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Kinds decided by missing/multiple classification
    pub fn is_count_finding(self) -> bool {
        matches!(self, FindingKind::MissingBaseCall | FindingKind::MultipleBaseCalls)
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FindingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FindingKind::ALL.into_iter().find(|kind| kind.code() == s).ok_or_else(|| format!("Unknown finding kind: {}", s))
    }
}

/// One reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// Primary location
    pub span: Span,
    /// Name substituted into the message, when the rule has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
}

impl Finding {
    pub fn new(kind: FindingKind, span: Span) -> Self {
        Self { kind, span, method_name: None }
    }

    pub fn with_method_name(mut self, name: impl Into<String>) -> Self {
        self.method_name = Some(name.into());
        self
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method_name {
            Some(name) => write!(f, "{} ({}) at {}", self.kind, name, self.span),
            None => write!(f, "{} at {}", self.kind, self.span),
        }
    }
}
