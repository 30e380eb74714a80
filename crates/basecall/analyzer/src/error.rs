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

use basecall_common::HostError;
use thiserror::Error;

/// Errors that abort the analysis of a single method
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Host query failed: {0}")]
    Host(#[from] HostError),

    #[error("Analysis depth limit exceeded: nesting depth {depth} is over the limit of {limit}")]
    DepthLimitExceeded { depth: usize, limit: usize },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
