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

//! Reporting system for base-call analysis results
//!
//! The analyzer only produces [`Finding`](crate::findings::Finding) records:
//! a stable kind, a location and an optional method name. Everything a user
//! reads is layered on top here.
//!
//! ## Components
//!
//! ### Finding Catalog (`catalog`)
//! - **Purpose**: Maps every finding kind to a title, a message template and a severity
//! - **Defaults**: English text; wrong base calls are warnings, everything else is an error
//! - **Customization**: Hosts replace single descriptors, severities or messages
//! - **Templates**: `{0}` in a message is replaced by the method name
//!
//! ### Report Formatting (`formatter`)
//! - **Purpose**: Converts a unit report into output text
//! - **Formats**: Plain text lines and JSON
//! - **Text lines**: `<unit>: <severity>[<code>] <message> at <start>..<end>`
//! - **JSON**: Array of rendered findings, spans as `[start, end]`

pub mod catalog;
pub mod formatter;

pub use catalog::{FindingCatalog, FindingDescriptor, RenderedFinding, Severity};
pub use formatter::{AnalysisReport, FormatError, JsonFormatter, ReportFormat, ReportFormatter, TextFormatter, formatter_for};
