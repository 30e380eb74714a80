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

//! Compilation-unit host for base-call analysis
//!
//! Provides a self-contained program model the analyzer can run against:
//! - `unit`: JSON-serializable types, methods and bodies
//! - `hierarchy`: inheritance graph built on `petgraph`
//! - `host`: `UnitHost`, the `AnalysisHost` implementation over a unit
//! - `error`: load errors

pub mod error;
pub mod hierarchy;
pub mod host;
pub mod unit;

pub use error::{UnitError, UnitResult};
pub use hierarchy::{TypeHierarchy, TypeNode};
pub use host::UnitHost;
pub use unit::{CompilationUnit, MethodDecl, MethodModifiers, TypeDecl};
