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

//! Policy resolution over override chains

use basecall_common::{DeclaredMarkers, MethodSignature, OverrideChain, PolicyMode};
use serde::Serialize;
use std::fmt;

/// Where a resolved mode came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PolicySource {
    /// First override of an abstract or empty-template method
    TemplateExemption,
    /// Explicit attribute `depth` links up the chain (0 = the method itself)
    Declared { depth: usize },
    /// No attribute anywhere in the chain
    Fallback,
}

/// Mode a method is checked under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedPolicy {
    pub mode: PolicyMode,
    #[serde(flatten)]
    pub source: PolicySource,
    /// Excluded from missing/multiple classification by its own marker
    pub ignored: bool,
}

impl ResolvedPolicy {
    /// Whether missing/multiple classification applies to a method with `signature`
    pub fn classifies(&self, signature: &MethodSignature) -> bool {
        if self.ignored {
            return false;
        }
        match self.mode {
            PolicyMode::Mandatory => true,
            PolicyMode::Optional => false,
            PolicyMode::Default => signature.is_void(),
        }
    }
}

impl fmt::Display for ResolvedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mode)?;
        if self.ignored {
            write!(f, " (ignored)")?;
        }
        Ok(())
    }
}

/// Resolves the checking mode of a method from its override chain
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyResolver;

impl PolicyResolver {
    pub fn new() -> Self {
        Self
    }

    /// `own` are the markers of the method itself; they take precedence over `chain.links[0]`.
    pub fn resolve(&self, chain: &OverrideChain, own: &DeclaredMarkers) -> ResolvedPolicy {
        let ignored = own.ignore;

        if let Some(overridden) = chain.overridden() {
            if overridden.is_abstract || overridden.markers.empty_template {
                return ResolvedPolicy { mode: PolicyMode::Optional, source: PolicySource::TemplateExemption, ignored };
            }
        }

        let declared = std::iter::once(own).chain(chain.ancestors().map(|link| &link.markers)).enumerate().find_map(|(depth, markers)| markers.mode.map(|mode| (depth, mode)));

        match declared {
            Some((depth, mode)) => ResolvedPolicy { mode, source: PolicySource::Declared { depth }, ignored },
            None => ResolvedPolicy { mode: PolicyMode::Default, source: PolicySource::Fallback, ignored },
        }
    }
}
