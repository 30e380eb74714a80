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

//! TOML configuration file

use anyhow::{Context, Result, anyhow};
use basecall_analyzer::{EngineConfig, FindingCatalog, FindingKind, Severity};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Contents of a configuration file.
///
/// ```toml
/// [engine]
/// receiver = "next_in_chain"
/// throw_paths_require_base_call = false
///
/// [severity]
/// WrongBaseCall = "error"
///
/// [messages]
/// MissingBaseCall = "'{0}' must call its base implementation"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub engine: EngineConfig,
    /// Severity overrides keyed by finding code
    pub severity: BTreeMap<String, Severity>,
    /// Message overrides keyed by finding code
    pub messages: BTreeMap<String, String>,
}

impl Settings {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("Invalid configuration file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Default settings, or the file's when a path is given
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Default catalog with this file's overrides applied
    pub fn catalog(&self) -> Result<FindingCatalog> {
        let mut catalog = FindingCatalog::default();
        for (code, severity) in &self.severity {
            catalog = catalog.with_severity(parse_kind(code)?, *severity);
        }
        for (code, message) in &self.messages {
            catalog = catalog.with_message(parse_kind(code)?, message.clone());
        }
        Ok(catalog)
    }
}

fn parse_kind(code: &str) -> Result<FindingKind> {
    code.parse::<FindingKind>().map_err(|err| anyhow!(err))
}
