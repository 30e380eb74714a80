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

//! Method signatures, policy markers and override chains

use crate::span::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle the host uses to identify a method declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MethodId(pub u32);

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type as spelled by the host. Compatibility between two names is decided by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this name spells the void type
    pub fn is_void(&self) -> bool {
        self.0 == "void"
    }
}

impl From<&str> for TypeName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeName,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self { name: name.into(), ty: ty.into() }
    }
}

/// Whether a method produces a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    Void,
    Value(TypeName),
}

impl ReturnKind {
    /// Map an optional declared return type; `None` and `void` are void-equivalent.
    pub fn from_declared(declared: Option<&TypeName>) -> Self {
        match declared {
            Some(ty) if !ty.is_void() => ReturnKind::Value(ty.clone()),
            _ => ReturnKind::Void,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ReturnKind::Void)
    }
}

/// Name, ordered parameter types and return kind of an analyzed method.
///
/// Derived once per analyzed method and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_kind: ReturnKind,
}

impl MethodSignature {
    /// A void method without parameters
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_kind: ReturnKind::Void,
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    pub fn returning(mut self, ty: impl Into<TypeName>) -> Self {
        self.return_kind = ReturnKind::from_declared(Some(&ty.into()));
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_void(&self) -> bool {
        self.return_kind.is_void()
    }

    /// Positional parameter types
    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeName> {
        self.parameters.iter().map(|p| &p.ty)
    }
}

/// Checking mode required of an override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyMode {
    /// Exactly one base call on every path
    Mandatory,
    /// Presence of the base call is not checked
    Optional,
    /// Mandatory for void-equivalent methods only
    Default,
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Mandatory => write!(f, "mandatory"),
            PolicyMode::Optional => write!(f, "optional"),
            PolicyMode::Default => write!(f, "default"),
        }
    }
}

/// Markers a declaration carries
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeclaredMarkers {
    /// Explicit policy attribute
    pub mode: Option<PolicyMode>,
    /// Exclude this declaration from missing/multiple classification
    #[serde(alias = "ignore_check")]
    pub ignore: bool,
    /// The declaration is an empty template; its first override is exempt
    pub empty_template: bool,
}

impl DeclaredMarkers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: PolicyMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_ignore(mut self, ignore: bool) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_empty_template(mut self, empty_template: bool) -> Self {
        self.empty_template = empty_template;
        self
    }
}

/// One declaration in an override chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideLink {
    /// Qualified name, e.g. `Derived.Test`
    pub name: String,
    /// The declaration has no body
    pub is_abstract: bool,
    pub markers: DeclaredMarkers,
    pub span: Span,
}

impl OverrideLink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_abstract: false,
            markers: DeclaredMarkers::default(),
            span: Span::dummy(),
        }
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_markers(mut self, markers: DeclaredMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

/// Declarations from the analyzed method (index 0) up to the root virtual or abstract declaration.
///
/// Fewer than two links means the method overrides nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideChain {
    pub links: Vec<OverrideLink>,
}

impl OverrideChain {
    pub fn new(links: Vec<OverrideLink>) -> Self {
        Self { links }
    }

    /// Chain of a method without override relationship
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_override(&self) -> bool {
        self.links.len() > 1
    }

    pub fn current(&self) -> Option<&OverrideLink> {
        self.links.first()
    }

    /// The declaration directly overridden by the analyzed method
    pub fn overridden(&self) -> Option<&OverrideLink> {
        self.links.get(1)
    }

    pub fn root(&self) -> Option<&OverrideLink> {
        if self.is_override() { self.links.last() } else { None }
    }

    /// Ancestors from the directly overridden declaration up to the root
    pub fn ancestors(&self) -> impl Iterator<Item = &OverrideLink> {
        self.links.iter().skip(1)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
