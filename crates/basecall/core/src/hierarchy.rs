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

//! Type hierarchy graph
//!
//! Edges point from a derived type to its direct base. Base names that are not
//! declared in the unit become external nodes, so the graph is always closed.

use crate::error::{UnitError, UnitResult};
use crate::unit::CompilationUnit;
use petgraph::Direction;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Node payload of the hierarchy graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeNode {
    pub name: String,
    /// Index into `CompilationUnit::types`; `None` for types outside the unit
    pub decl: Option<usize>,
}

impl TypeNode {
    pub fn is_external(&self) -> bool {
        self.decl.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    graph: DiGraph<TypeNode, ()>,
    node_indices: HashMap<String, NodeIndex>,
}

impl TypeHierarchy {
    /// Build the graph for `unit`, rejecting duplicate declarations and inheritance cycles
    pub fn build(unit: &CompilationUnit) -> UnitResult<Self> {
        let mut hierarchy = Self::default();

        for (index, decl) in unit.types.iter().enumerate() {
            if hierarchy.node_indices.contains_key(&decl.name) {
                return Err(UnitError::DuplicateType(decl.name.clone()));
            }
            let node = hierarchy.graph.add_node(TypeNode { name: decl.name.clone(), decl: Some(index) });
            hierarchy.node_indices.insert(decl.name.clone(), node);
        }

        for decl in &unit.types {
            if let Some(base) = &decl.base {
                if base.as_str() == decl.name {
                    return Err(UnitError::CyclicInheritance(decl.name.clone()));
                }
                let derived = hierarchy.node_indices[&decl.name];
                let base = hierarchy.add_external(base.as_str());
                hierarchy.graph.add_edge(derived, base, ());
            }
        }

        if let Err(cycle) = toposort(&hierarchy.graph, None) {
            return Err(UnitError::CyclicInheritance(hierarchy.graph[cycle.node_id()].name.clone()));
        }

        Ok(hierarchy)
    }

    fn add_external(&mut self, name: &str) -> NodeIndex {
        if let Some(&node) = self.node_indices.get(name) {
            return node;
        }
        let node = self.graph.add_node(TypeNode { name: name.to_string(), decl: None });
        self.node_indices.insert(name.to_string(), node);
        node
    }

    pub fn node(&self, name: &str) -> Option<&TypeNode> {
        self.node_indices.get(name).map(|&index| &self.graph[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.node_indices.contains_key(name)
    }

    /// Direct base of `name`
    pub fn base_of(&self, name: &str) -> Option<&TypeNode> {
        let index = *self.node_indices.get(name)?;
        self.graph.neighbors_directed(index, Direction::Outgoing).next().map(|base| &self.graph[base])
    }

    /// Bases of `name` from the direct base up to the root
    pub fn ancestors(&self, name: &str) -> Vec<&TypeNode> {
        let mut chain = Vec::new();
        let mut current = name;
        while let Some(base) = self.base_of(current) {
            chain.push(base);
            current = &base.name;
        }
        chain
    }

    /// Types deriving directly from `name`
    pub fn derived_of(&self, name: &str) -> Vec<&TypeNode> {
        match self.node_indices.get(name) {
            Some(&index) => self.graph.neighbors_directed(index, Direction::Incoming).map(|derived| &self.graph[derived]).collect(),
            None => Vec::new(),
        }
    }

    /// Whether `derived` is `base` or inherits from it
    pub fn is_subtype(&self, derived: &str, base: &str) -> bool {
        match (self.node_indices.get(derived), self.node_indices.get(base)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
