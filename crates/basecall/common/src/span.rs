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

//! Source locations

use serde::{Deserialize, Serialize};
use std::fmt;

/// Byte range of a node in the host's source text.
///
/// Serialized as a two element array `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(usize, usize)", into = "(usize, usize)")]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Sentinel span that does not correspond to any source location.
    pub fn dummy() -> Self {
        Self { start: usize::MAX, end: usize::MAX }
    }

    /// Returns true if this span is the dummy sentinel.
    pub fn is_dummy(self) -> bool {
        self.start == usize::MAX && self.end == usize::MAX
    }

    /// Smallest span covering both inputs; dummies are ignored.
    pub fn merge(self, other: Span) -> Span {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return self;
        }
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::dummy()
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self { start, end }
    }
}

impl From<Span> for (usize, usize) {
    fn from(span: Span) -> Self {
        (span.start, span.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() { write!(f, "<unknown>") } else { write!(f, "{}..{}", self.start, self.end) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_ignores_dummy() {
        let span = Span::new(4, 9);
        assert_eq!(span.merge(Span::dummy()), span);
        assert_eq!(Span::dummy().merge(span), span);
        assert_eq!(span.merge(Span::new(1, 6)), Span::new(1, 9));
    }

    #[test]
    fn test_serde_as_pair() {
        let span: Span = serde_json::from_str("[3, 14]").unwrap();
        assert_eq!(span, Span::new(3, 14));
        assert_eq!(serde_json::to_string(&span).unwrap(), "[3,14]");
    }

    #[test]
    fn test_display() {
        assert_eq!(Span::new(1, 2).to_string(), "1..2");
        assert_eq!(Span::dummy().to_string(), "<unknown>");
    }
}
