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

//! [`AnalysisHost`] backed by a [`CompilationUnit`]
//!
//! The host resolves everything the analyzer asks about from the unit alone:
//! - override chains by walking the type hierarchy upward
//! - static types of literals, parameters, typed locals, `this`, casts and allocations
//! - assignability through the hierarchy graph
//! - the mixin accessor, unless a parameter or local shadows it

use crate::error::UnitResult;
use crate::hierarchy::TypeHierarchy;
use crate::unit::{CompilationUnit, MethodDecl, TypeDecl};
use basecall_common::visit::{Visitor, walk_function_body, walk_stmt};
use basecall_common::{AnalysisHost, Block, Closure, DeclaredMarkers, Expr, ExprKind, HostError, HostResult, LiteralValue, LocalFunction, MethodId, MethodSignature, OverrideChain, OverrideLink, Span, Stmt, StmtKind, TypeName};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::convert::Infallible;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::debug;

/// Position of a method inside the unit
#[derive(Debug, Clone, Copy)]
struct MethodSlot {
    type_index: usize,
    method_index: usize,
}

/// Names bound inside one method body
#[derive(Debug, Clone, Default)]
struct MethodScope {
    bindings: HashSet<String>,
    /// `None` once a name is declared with differing or unknown types
    declared_types: HashMap<String, Option<TypeName>>,
}

impl MethodScope {
    fn collect(body: Option<&Block>) -> Self {
        let mut scope = Self::default();
        if let Some(body) = body {
            if let ControlFlow::Break(never) = scope.visit_block(body) {
                match never {}
            }
        }
        scope
    }

    fn bind(&mut self, name: &str, ty: Option<TypeName>) {
        self.bindings.insert(name.to_string());
        match self.declared_types.entry(name.to_string()) {
            Entry::Vacant(entry) => {
                entry.insert(ty);
            }
            Entry::Occupied(mut entry) => {
                if *entry.get() != ty {
                    entry.insert(None);
                }
            }
        }
    }

    fn declared_type(&self, name: &str) -> Option<TypeName> {
        self.declared_types.get(name).cloned().flatten()
    }
}

impl<'ast> Visitor<'ast> for MethodScope {
    type Break = Infallible;

    fn visit_stmt(&mut self, stmt: &'ast Stmt) -> ControlFlow<Infallible> {
        match &stmt.kind {
            StmtKind::Local { name, declared, init } => {
                let ty = declared.clone().or_else(|| init.as_ref().and_then(intrinsic_type));
                self.bind(name, ty);
            }
            StmtKind::ForEach { binding, declared, .. } => self.bind(binding, declared.clone()),
            StmtKind::Using { binding: Some(binding), resource, .. } => self.bind(binding, intrinsic_type(resource)),
            StmtKind::Try { catches, .. } => {
                for catch in catches {
                    if let Some(binding) = &catch.binding {
                        self.bind(binding, catch.ty.clone());
                    }
                }
            }
            _ => {}
        }
        walk_stmt(self, stmt)
    }

    fn visit_closure(&mut self, closure: &'ast Closure, _span: Span) -> ControlFlow<Infallible> {
        for param in &closure.params {
            self.bind(param, None);
        }
        walk_function_body(self, &closure.body)
    }

    fn visit_local_function(&mut self, function: &'ast LocalFunction, _span: Span) -> ControlFlow<Infallible> {
        self.bind(&function.name, None);
        for param in &function.params {
            self.bind(&param.name, Some(param.ty.clone()));
        }
        walk_function_body(self, &function.body)
    }
}

/// Type an expression has regardless of where it appears
fn intrinsic_type(expr: &Expr) -> Option<TypeName> {
    if let Some(ty) = &expr.ty {
        return Some(ty.clone());
    }
    match &expr.kind {
        ExprKind::Literal { value } => Some(TypeName::from(match value {
            LiteralValue::Bool(_) => "bool",
            LiteralValue::Int(_) => "int",
            LiteralValue::Float(_) => "double",
            LiteralValue::Str(_) => "string",
            LiteralValue::Null => "null",
        })),
        ExprKind::Interpolation { .. } => Some(TypeName::from("string")),
        ExprKind::Cast { target, .. } => Some(target.clone()),
        ExprKind::New { class, .. } => Some(class.clone()),
        _ => None,
    }
}

/// Host over an in-memory compilation unit
#[derive(Debug)]
pub struct UnitHost {
    unit: CompilationUnit,
    hierarchy: TypeHierarchy,
    slots: Vec<MethodSlot>,
    scopes: Vec<MethodScope>,
}

impl UnitHost {
    /// Index `unit` and build its type hierarchy
    pub fn new(unit: CompilationUnit) -> UnitResult<Self> {
        let hierarchy = TypeHierarchy::build(&unit)?;

        let mut slots = Vec::with_capacity(unit.method_count());
        let mut scopes = Vec::with_capacity(unit.method_count());
        for (type_index, decl) in unit.types.iter().enumerate() {
            for (method_index, method) in decl.methods.iter().enumerate() {
                slots.push(MethodSlot { type_index, method_index });
                scopes.push(MethodScope::collect(method.body.as_ref()));
            }
        }

        debug!(unit = %unit.name, types = unit.types.len(), methods = slots.len(), "Indexed compilation unit");

        Ok(Self { unit, hierarchy, slots, scopes })
    }

    pub fn from_json(json: &str) -> UnitResult<Self> {
        Self::new(CompilationUnit::from_json(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> UnitResult<Self> {
        Self::new(CompilationUnit::from_path(path)?)
    }

    pub fn unit(&self) -> &CompilationUnit {
        &self.unit
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Handle of `type_name.method_name`; the first declaration wins for overloads
    pub fn find_method(&self, type_name: &str, method_name: &str) -> Option<MethodId> {
        self.slots.iter().position(|slot| {
            let decl = &self.unit.types[slot.type_index];
            decl.name == type_name && decl.methods[slot.method_index].name == method_name
        })
        .map(|index| MethodId(index as u32))
    }

    /// `Type.Method` spelling of a method
    pub fn qualified_name(&self, method: MethodId) -> HostResult<String> {
        let (owner, decl) = self.lookup(method)?;
        Ok(qualify(owner, decl))
    }

    fn slot(&self, method: MethodId) -> HostResult<MethodSlot> {
        self.slots.get(method.0 as usize).copied().ok_or(HostError::UnknownMethod(method))
    }

    fn lookup(&self, method: MethodId) -> HostResult<(&TypeDecl, &MethodDecl)> {
        let slot = self.slot(method)?;
        let owner = &self.unit.types[slot.type_index];
        Ok((owner, &owner.methods[slot.method_index]))
    }

    fn scope(&self, method: MethodId) -> Option<&MethodScope> {
        self.scopes.get(method.0 as usize)
    }

    /// Closest declaration with the same signature in a base type of `owner`
    fn find_overridden(&self, owner: &str, method: &MethodDecl) -> Option<(&TypeDecl, &MethodDecl)> {
        self.hierarchy
            .ancestors(owner)
            .into_iter()
            .filter_map(|node| node.decl.map(|index| &self.unit.types[index]))
            .find_map(|base| base.methods.iter().find(|candidate| candidate.has_same_signature(method)).map(|found| (base, found)))
    }
}

fn qualify(owner: &TypeDecl, decl: &MethodDecl) -> String {
    format!("{}.{}", owner.name, decl.name)
}

fn link(owner: &TypeDecl, decl: &MethodDecl) -> OverrideLink {
    OverrideLink::new(qualify(owner, decl)).with_abstract(decl.is_abstract()).with_markers(decl.markers.clone()).with_span(decl.span)
}

impl AnalysisHost for UnitHost {
    fn methods(&self) -> Vec<MethodId> {
        (0..self.slots.len() as u32).map(MethodId).collect()
    }

    fn body(&self, method: MethodId) -> HostResult<Option<&Block>> {
        let (_, decl) = self.lookup(method)?;
        Ok(if decl.modifiers.is_abstract { None } else { decl.body.as_ref() })
    }

    fn override_chain(&self, method: MethodId) -> HostResult<OverrideChain> {
        let (owner, decl) = self.lookup(method)?;
        if !decl.modifiers.is_override {
            return Ok(OverrideChain::none());
        }

        let mut links = vec![link(owner, decl)];
        let (mut current_owner, mut current) = (owner, decl);
        loop {
            let Some((base, overridden)) = self.find_overridden(&current_owner.name, current) else {
                return Err(HostError::UnresolvedOverride { method: qualify(owner, decl) });
            };
            links.push(link(base, overridden));
            if !overridden.modifiers.is_override {
                break;
            }
            (current_owner, current) = (base, overridden);
        }

        Ok(OverrideChain::new(links))
    }

    fn markers(&self, method: MethodId) -> HostResult<DeclaredMarkers> {
        Ok(self.lookup(method)?.1.markers.clone())
    }

    fn signature(&self, method: MethodId) -> HostResult<MethodSignature> {
        Ok(self.lookup(method)?.1.signature())
    }

    fn declaration_span(&self, method: MethodId) -> HostResult<Span> {
        Ok(self.lookup(method)?.1.span)
    }

    fn expression_type(&self, method: MethodId, expr: &Expr) -> Option<TypeName> {
        if let Some(ty) = &expr.ty {
            return Some(ty.clone());
        }
        let (owner, decl) = self.lookup(method).ok()?;
        match &expr.kind {
            ExprKind::Ident { name } => decl
                .params
                .iter()
                .find(|param| &param.name == name)
                .map(|param| param.ty.clone())
                .or_else(|| self.scope(method).and_then(|scope| scope.declared_type(name))),
            ExprKind::This => Some(TypeName::new(owner.name.as_str())),
            ExprKind::Base => owner.base.clone(),
            _ => intrinsic_type(expr),
        }
    }

    fn is_assignable(&self, from: &TypeName, to: &TypeName) -> bool {
        from == to || from.as_str() == "null" || to.as_str() == "object" || self.hierarchy.is_subtype(from.as_str(), to.as_str())
    }

    fn is_next_chain_accessor(&self, method: MethodId, identifier: &str) -> bool {
        let Ok((owner, decl)) = self.lookup(method) else {
            return false;
        };
        if owner.next_accessor.as_deref() != Some(identifier) {
            return false;
        }
        let shadowed_by_param = decl.params.iter().any(|param| param.name == identifier);
        let shadowed_by_local = self.scope(method).is_some_and(|scope| scope.bindings.contains(identifier));
        !shadowed_by_param && !shadowed_by_local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::TypeDecl;
    use basecall_common::PolicyMode;

    fn host() -> UnitHost {
        let unit = CompilationUnit::new("sample")
            .with_type(TypeDecl::new("Base").with_abstract(true).with_method(MethodDecl::new("Run").with_param("n", "int").abstract_method()))
            .with_type(TypeDecl::new("Middle").with_base("Base").with_method(MethodDecl::new("Run").with_param("n", "int").override_method().with_body(Block::empty())))
            .with_type(
                TypeDecl::new("Leaf")
                    .with_base("Middle")
                    .with_next_accessor("next")
                    .with_method(
                        MethodDecl::new("Run")
                            .with_param("n", "int")
                            .override_method()
                            .with_markers(DeclaredMarkers::new().with_mode(PolicyMode::Mandatory))
                            .with_body(vec![Stmt::local("count", Some("long".into()), None), Stmt::local("label", None, Some(Expr::string("x")))])
                            .at(100, 140),
                    )
                    .with_method(MethodDecl::new("Shadow").with_param("next", "object").with_body(Block::empty())),
            )
            .with_type(TypeDecl::new("Orphan").with_method(MethodDecl::new("Run").override_method().with_body(Block::empty())));
        UnitHost::new(unit).unwrap()
    }

    #[test]
    fn test_methods_enumerated_in_order() {
        let host = host();
        assert_eq!(host.methods().len(), 5);
        assert_eq!(host.find_method("Leaf", "Run"), Some(MethodId(2)));
        assert_eq!(host.qualified_name(MethodId(1)).unwrap(), "Middle.Run");
        assert!(matches!(host.signature(MethodId(9)), Err(HostError::UnknownMethod(MethodId(9)))));
    }

    #[test]
    fn test_override_chain_walks_to_root() {
        let host = host();
        let chain = host.override_chain(MethodId(2)).unwrap();
        let names: Vec<&str> = chain.links.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Leaf.Run", "Middle.Run", "Base.Run"]);
        assert!(chain.root().unwrap().is_abstract);
        assert!(!chain.overridden().unwrap().is_abstract);
        assert_eq!(chain.current().unwrap().markers.mode, Some(PolicyMode::Mandatory));
        assert_eq!(chain.current().unwrap().span, Span::new(100, 140));

        assert!(!host.override_chain(MethodId(0)).unwrap().is_override());
        assert!(!host.override_chain(MethodId(3)).unwrap().is_override());
    }

    #[test]
    fn test_unresolved_override_is_error() {
        let host = host();
        let err = host.override_chain(MethodId(4)).unwrap_err();
        assert_eq!(err, HostError::UnresolvedOverride { method: "Orphan.Run".into() });
    }

    #[test]
    fn test_abstract_method_has_no_body() {
        let host = host();
        assert!(host.body(MethodId(0)).unwrap().is_none());
        assert!(host.body(MethodId(1)).unwrap().is_some());
    }

    #[test]
    fn test_expression_types() {
        let host = host();
        let leaf = MethodId(2);
        assert_eq!(host.expression_type(leaf, &Expr::ident("n")), Some("int".into()));
        assert_eq!(host.expression_type(leaf, &Expr::ident("count")), Some("long".into()));
        assert_eq!(host.expression_type(leaf, &Expr::ident("label")), Some("string".into()));
        assert_eq!(host.expression_type(leaf, &Expr::ident("missing")), None);
        assert_eq!(host.expression_type(leaf, &Expr::this()), Some("Leaf".into()));
        assert_eq!(host.expression_type(leaf, &Expr::base()), Some("Middle".into()));
        assert_eq!(host.expression_type(leaf, &Expr::float(1.5)), Some("double".into()));
        assert_eq!(host.expression_type(leaf, &Expr::new_object("Leaf", vec![])), Some("Leaf".into()));
        assert_eq!(host.expression_type(leaf, &Expr::ident("n").typed("short")), Some("short".into()));
    }

    #[test]
    fn test_redeclared_local_is_untyped() {
        let body = vec![
            Stmt::block(vec![Stmt::local("x", Some("int".into()), None)]),
            Stmt::block(vec![Stmt::local("x", Some("string".into()), None), Stmt::local("y", Some("bool".into()), None)]),
            Stmt::block(vec![Stmt::local("y", Some("bool".into()), None)]),
        ];
        let unit = CompilationUnit::new("scopes").with_type(TypeDecl::new("Widget").with_method(MethodDecl::new("Paint").with_body(body)));
        let host = UnitHost::new(unit).unwrap();

        assert_eq!(host.expression_type(MethodId(0), &Expr::ident("x")), None);
        assert_eq!(host.expression_type(MethodId(0), &Expr::ident("y")), Some("bool".into()));
    }

    #[test]
    fn test_assignability() {
        let host = host();
        assert!(host.is_assignable(&"Leaf".into(), &"Base".into()));
        assert!(!host.is_assignable(&"Base".into(), &"Leaf".into()));
        assert!(host.is_assignable(&"null".into(), &"Leaf".into()));
        assert!(host.is_assignable(&"int".into(), &"object".into()));
        assert!(!host.is_assignable(&"int".into(), &"long".into()));
    }

    #[test]
    fn test_next_accessor_respects_shadowing() {
        let host = host();
        assert!(host.is_next_chain_accessor(MethodId(2), "next"));
        assert!(!host.is_next_chain_accessor(MethodId(2), "count"));
        assert!(!host.is_next_chain_accessor(MethodId(3), "next"));
        assert!(!host.is_next_chain_accessor(MethodId(1), "next"));
    }
}
