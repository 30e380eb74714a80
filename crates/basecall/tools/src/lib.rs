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

//! Basecall Tools Library
//!
//! Command-line front end of the base-call analyzer: loads a compilation
//! unit and an optional TOML configuration, runs the engine and prints the
//! findings as text or JSON.

pub mod cli;

pub use cli::check::{CheckArgs, CheckOutcome, run_check};
pub use cli::rules::{RulesArgs, render_rules, run_rules};
pub use cli::settings::Settings;
