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

use thiserror::Error;

/// Errors raised while loading a compilation unit
#[derive(Error, Debug)]
pub enum UnitError {
    #[error("Failed to parse compilation unit: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read compilation unit: {0}")]
    Io(#[from] std::io::Error),

    #[error("Type '{0}' is declared more than once")]
    DuplicateType(String),

    #[error("Cyclic inheritance involving type '{0}'")]
    CyclicInheritance(String),
}

pub type UnitResult<T> = Result<T, UnitError>;
