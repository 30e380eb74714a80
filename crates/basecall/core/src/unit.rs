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

//! In-memory compilation unit model
//!
//! A unit is a flat list of type declarations, each with a single optional
//! base type and its method declarations. Units are exchanged as JSON.

use crate::error::UnitResult;
use basecall_common::{Block, DeclaredMarkers, MethodSignature, Parameter, ReturnKind, Span, TypeName};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A set of type declarations analyzed together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Unit name, usually the source file it was lowered from
    pub name: String,
    /// Declared types
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

/// A class declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    /// Direct base type; may name a type outside the unit
    #[serde(default)]
    pub base: Option<TypeName>,
    #[serde(default)]
    pub is_abstract: bool,
    /// Identifier denoting the next implementation in a mixin chain
    #[serde(default)]
    pub next_accessor: Option<String>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
    #[serde(default)]
    pub span: Span,
}

/// Override-related modifiers of a method
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MethodModifiers {
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_abstract: bool,
}

/// A method declaration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Parameter>,
    /// Declared return type; absent means void
    #[serde(default)]
    pub returns: Option<TypeName>,
    #[serde(default)]
    pub modifiers: MethodModifiers,
    #[serde(default)]
    pub markers: DeclaredMarkers,
    /// Absent for abstract declarations
    #[serde(default)]
    pub body: Option<Block>,
    #[serde(default)]
    pub span: Span,
}

impl CompilationUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), types: Vec::new() }
    }

    pub fn with_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Parse a unit from its JSON form
    pub fn from_json(json: &str) -> UnitResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a unit file
    pub fn from_path(path: impl AsRef<Path>) -> UnitResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> UnitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of method declarations
    pub fn method_count(&self) -> usize {
        self.types.iter().map(|t| t.methods.len()).sum()
    }
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base: None,
            is_abstract: false,
            next_accessor: None,
            methods: Vec::new(),
            span: Span::dummy(),
        }
    }

    pub fn with_base(mut self, base: impl Into<TypeName>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_abstract(mut self, is_abstract: bool) -> Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn with_next_accessor(mut self, accessor: impl Into<String>) -> Self {
        self.next_accessor = Some(accessor.into());
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            returns: None,
            modifiers: MethodModifiers::default(),
            markers: DeclaredMarkers::default(),
            body: None,
            span: Span::dummy(),
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        self.params.push(Parameter::new(name, ty));
        self
    }

    pub fn returning(mut self, ty: impl Into<TypeName>) -> Self {
        self.returns = Some(ty.into());
        self
    }

    pub fn virtual_method(mut self) -> Self {
        self.modifiers.is_virtual = true;
        self
    }

    pub fn override_method(mut self) -> Self {
        self.modifiers.is_override = true;
        self
    }

    /// Abstract declarations carry no body
    pub fn abstract_method(mut self) -> Self {
        self.modifiers.is_abstract = true;
        self.body = None;
        self
    }

    pub fn with_markers(mut self, markers: DeclaredMarkers) -> Self {
        self.markers = markers;
        self
    }

    pub fn with_body(mut self, body: impl Into<Block>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn at(mut self, start: usize, end: usize) -> Self {
        self.span = Span::new(start, end);
        self
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.is_abstract || self.body.is_none()
    }

    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            name: self.name.clone(),
            parameters: self.params.clone(),
            return_kind: ReturnKind::from_declared(self.returns.as_ref()),
        }
    }

    /// Same name and same positional parameter types
    pub fn has_same_signature(&self, other: &MethodDecl) -> bool {
        self.name == other.name && self.params.len() == other.params.len() && self.params.iter().zip(&other.params).all(|(a, b)| a.ty == b.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basecall_common::{Expr, PolicyMode, Stmt};

    #[test]
    fn test_parse_minimal_unit() {
        let unit = CompilationUnit::from_json(
            r#"{
                "name": "sample.cs",
                "types": [
                    {"name": "Base", "methods": [{"name": "Test", "modifiers": {"is_virtual": true}, "body": {"stmts": []}}]},
                    {"name": "Derived", "base": "Base", "methods": [
                        {"name": "Test", "modifiers": {"is_override": true},
                         "markers": {"mode": "mandatory"}, "span": [40, 80],
                         "body": {"stmts": [{"kind": "expr", "expr": {"kind": "call", "callee": {"kind": "member", "object": {"kind": "base"}, "member": "Test"}}}]}}
                    ]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(unit.name, "sample.cs");
        assert_eq!(unit.method_count(), 2);
        let derived = &unit.types[1].methods[0];
        assert!(derived.modifiers.is_override);
        assert_eq!(derived.markers.mode, Some(PolicyMode::Mandatory));
        assert_eq!(derived.span, Span::new(40, 80));
        assert_eq!(derived.body.as_ref().map(|b| b.stmts.len()), Some(1));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CompilationUnit::from_json("{\"types\": 3}").is_err());
    }

    #[test]
    fn test_builder_and_signature() {
        let method = MethodDecl::new("Test").with_param("a", "int").returning("bool").override_method().with_body(vec![Stmt::ret(Some(Expr::boolean(true)))]);
        let sig = method.signature();
        assert_eq!(sig.arity(), 1);
        assert!(!sig.is_void());
        assert!(!method.is_abstract());
        assert!(MethodDecl::new("Test").abstract_method().is_abstract());
    }

    #[test]
    fn test_same_signature() {
        let a = MethodDecl::new("Test").with_param("x", "int");
        let b = MethodDecl::new("Test").with_param("y", "int");
        let c = MethodDecl::new("Test").with_param("x", "string");
        assert!(a.has_same_signature(&b));
        assert!(!a.has_same_signature(&c));
        assert!(!a.has_same_signature(&MethodDecl::new("Test")));
    }

    #[test]
    fn test_json_round_trip_preserves_unit() {
        let unit = CompilationUnit::new("u").with_type(TypeDecl::new("A").with_method(MethodDecl::new("Run").virtual_method().with_body(vec![Stmt::expr(Expr::int(1))])));
        let parsed = CompilationUnit::from_json(&unit.to_json().unwrap()).unwrap();
        assert_eq!(parsed, unit);
    }
}
