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

//! Finding descriptors

use crate::findings::{Finding, FindingKind};
use basecall_common::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How serious a finding is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Presentation of one finding kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingDescriptor {
    pub title: String,
    /// Message text; `{0}` is replaced by the method name
    pub message: String,
    pub severity: Severity,
}

impl FindingDescriptor {
    pub fn new(title: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self { title: title.into(), message: message.into(), severity }
    }

    /// Message with the method name filled in, or the raw template without one
    pub fn render_message(&self, method_name: Option<&str>) -> String {
        match method_name {
            Some(name) => self.message.replace("{0}", name),
            None => self.message.clone(),
        }
    }
}

/// Finding as shown to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFinding {
    pub code: &'static str,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method_name: Option<String>,
}

/// Descriptors for every finding kind, replaceable per kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingCatalog {
    descriptors: [FindingDescriptor; 9],
}

impl Default for FindingCatalog {
    fn default() -> Self {
        Self {
            descriptors: FindingKind::ALL.map(default_descriptor),
        }
    }
}

fn default_descriptor(kind: FindingKind) -> FindingDescriptor {
    let (title, message) = match kind {
        FindingKind::MissingBaseCall => ("Missing base call", "Overriding method '{0}' must call the method it overrides exactly once on every path"),
        FindingKind::BaseCallInLoop => ("Base call in loop", "Base call must not be made inside a loop"),
        FindingKind::BaseCallInAnonymousFunction => ("Base call in anonymous function", "Base call must not be made inside an anonymous function"),
        FindingKind::BaseCallInLocalFunction => ("Base call in local function", "Base call must not be made inside a local function"),
        FindingKind::MultipleBaseCalls => ("Multiple base calls", "Overriding method '{0}' calls the method it overrides more than once"),
        FindingKind::WrongBaseCall => ("Wrong base call", "Base call does not match the signature of '{0}'"),
        FindingKind::BaseCallInTryOrCatch => ("Base call in try or catch", "Base call must not be made inside a try or catch block"),
        FindingKind::BaseCallInNonOverridingMethod => ("Base call in non-overriding method", "Method '{0}' does not override anything but makes a base call"),
        FindingKind::BaseCallInSwitch => ("Base call in switch", "Base call must not be made inside a switch"),
    };
    let severity = match kind {
        FindingKind::WrongBaseCall => Severity::Warning,
        _ => Severity::Error,
    };
    FindingDescriptor::new(title, message, severity)
}

impl FindingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_descriptor(mut self, kind: FindingKind, descriptor: FindingDescriptor) -> Self {
        self.descriptors[kind.index()] = descriptor;
        self
    }

    pub fn with_severity(mut self, kind: FindingKind, severity: Severity) -> Self {
        self.descriptors[kind.index()].severity = severity;
        self
    }

    pub fn with_message(mut self, kind: FindingKind, message: impl Into<String>) -> Self {
        self.descriptors[kind.index()].message = message.into();
        self
    }

    pub fn descriptor(&self, kind: FindingKind) -> &FindingDescriptor {
        &self.descriptors[kind.index()]
    }

    pub fn severity(&self, kind: FindingKind) -> Severity {
        self.descriptor(kind).severity
    }

    pub fn render(&self, finding: &Finding) -> RenderedFinding {
        let descriptor = self.descriptor(finding.kind);
        RenderedFinding {
            code: finding.kind.code(),
            severity: descriptor.severity,
            title: descriptor.title.clone(),
            message: descriptor.render_message(finding.method_name.as_deref()),
            span: finding.span,
            method_name: finding.method_name.clone(),
        }
    }
}
