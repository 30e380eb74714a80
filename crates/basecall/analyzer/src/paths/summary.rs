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

//! Path summaries

use crate::findings::Finding;
use serde::Serialize;
use std::fmt;

/// Minimum and maximum number of matching base calls over a set of paths.
///
/// `min <= max` holds for every value; the fields are only reachable through
/// constructors and operations that preserve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct CallCount {
    min: u32,
    max: u32,
}

impl CallCount {
    pub const ZERO: CallCount = CallCount { min: 0, max: 0 };

    /// Every path makes exactly `calls` calls
    pub const fn exactly(calls: u32) -> Self {
        Self { min: calls, max: calls }
    }

    /// `None` when `min > max`
    pub fn between(min: u32, max: u32) -> Option<Self> {
        (min <= max).then_some(Self { min, max })
    }

    pub fn min(self) -> u32 {
        self.min
    }

    pub fn max(self) -> u32 {
        self.max
    }

    /// One more call on every path
    pub fn increment(self) -> Self {
        Self {
            min: self.min.saturating_add(1),
            max: self.max.saturating_add(1),
        }
    }

    /// Sequential composition
    pub fn add(self, other: CallCount) -> Self {
        Self {
            min: self.min.saturating_add(other.min),
            max: self.max.saturating_add(other.max),
        }
    }

    /// Paths of either set
    pub fn join(self, other: CallCount) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Join into an accumulator that may not have seen any path yet
    pub fn join_into(slot: &mut Option<CallCount>, count: CallCount) {
        *slot = Some(match *slot {
            Some(existing) => existing.join(count),
            None => count,
        });
    }
}

impl fmt::Display for CallCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Result of reducing a statement sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PathSummary {
    /// Execution continues after the sequence with this many calls made
    Counting(CallCount),
    /// Every path left the sequence through `return`, `throw`, `break` or `continue`.
    /// Their counts were recorded where those paths resume.
    Returns,
    /// An irrecoverable finding stopped the traversal
    DiagnosticFound(Finding),
}

impl PathSummary {
    pub fn counting(&self) -> Option<CallCount> {
        match self {
            PathSummary::Counting(count) => Some(*count),
            PathSummary::Returns | PathSummary::DiagnosticFound(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Finding> {
        match self {
            PathSummary::DiagnosticFound(finding) => Some(finding),
            PathSummary::Counting(_) | PathSummary::Returns => None,
        }
    }
}

/// Counts of paths that left the method early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ExitSummary {
    pub returns: Option<CallCount>,
    pub throws: Option<CallCount>,
}

impl ExitSummary {
    pub fn record_return(&mut self, count: CallCount) {
        CallCount::join_into(&mut self.returns, count);
    }

    pub fn record_throw(&mut self, count: CallCount) {
        CallCount::join_into(&mut self.throws, count);
    }
}

/// Everything the path analyzer learned about one body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathOutcome {
    /// Summary of the body itself; `Counting` is the fall-through path
    pub summary: PathSummary,
    pub exits: ExitSummary,
    /// Non-fatal findings met before the traversal ended
    pub wrong_calls: Vec<Finding>,
    /// Candidate calls classified before the traversal ended
    pub candidates_inspected: usize,
}

impl PathOutcome {
    /// Count over every completed path: fall-through, returns and, if requested, throws.
    ///
    /// `None` when no path contributes, e.g. every path throws.
    pub fn completed(&self, include_throws: bool) -> Option<CallCount> {
        let mut completed = self.summary.counting();
        if let Some(returns) = self.exits.returns {
            CallCount::join_into(&mut completed, returns);
        }
        if include_throws {
            if let Some(throws) = self.exits.throws {
                CallCount::join_into(&mut completed, throws);
            }
        }
        completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::FindingKind;
    use basecall_common::Span;

    #[test]
    fn test_call_count_operations() {
        let one = CallCount::exactly(1);
        assert_eq!(CallCount::ZERO.increment(), one);
        assert_eq!(one.join(CallCount::ZERO), CallCount::between(0, 1).unwrap());
        assert_eq!(CallCount::between(0, 1).unwrap().add(one), CallCount::between(1, 2).unwrap());
        assert!(CallCount::between(2, 1).is_none());
    }

    #[test]
    fn test_join_into_empty_slot() {
        let mut slot = None;
        CallCount::join_into(&mut slot, CallCount::exactly(2));
        assert_eq!(slot, Some(CallCount::exactly(2)));
        CallCount::join_into(&mut slot, CallCount::exactly(0));
        assert_eq!(slot, CallCount::between(0, 2));
    }

    #[test]
    fn test_completed_joins_exits() {
        let mut outcome = PathOutcome {
            summary: PathSummary::Counting(CallCount::exactly(1)),
            exits: ExitSummary::default(),
            wrong_calls: Vec::new(),
            candidates_inspected: 1,
        };
        assert_eq!(outcome.completed(false), Some(CallCount::exactly(1)));

        outcome.exits.record_throw(CallCount::ZERO);
        assert_eq!(outcome.completed(false), Some(CallCount::exactly(1)));
        assert_eq!(outcome.completed(true), CallCount::between(0, 1));

        outcome.exits.record_return(CallCount::ZERO);
        assert_eq!(outcome.completed(false), CallCount::between(0, 1));
    }

    #[test]
    fn test_no_contributing_path() {
        let mut outcome = PathOutcome {
            summary: PathSummary::Returns,
            exits: ExitSummary::default(),
            wrong_calls: Vec::new(),
            candidates_inspected: 0,
        };
        outcome.exits.record_throw(CallCount::ZERO);
        assert_eq!(outcome.completed(false), None);

        outcome.summary = PathSummary::DiagnosticFound(Finding::new(FindingKind::BaseCallInLoop, Span::new(1, 2)));
        assert!(outcome.summary.diagnostic().is_some());
        assert_eq!(outcome.summary.counting(), None);
    }
}
