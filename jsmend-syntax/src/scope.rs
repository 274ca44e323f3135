//! Lexical scopes as a parent-linked arena.

use crate::tree::NodeId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Module,
    /// Function bodies, arrow bodies, class field initializers and static blocks.
    Function,
    Block,
    Catch,
    Class,
}

impl ScopeKind {
    /// Scopes that receive `var` declarations.
    pub fn is_var_target(self) -> bool {
        matches!(self, ScopeKind::Module | ScopeKind::Function)
    }
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Bound names and the binding identifier nodes that declare them.
    pub bindings: BTreeMap<String, Vec<NodeId>>,
}

#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    pub(crate) fn add(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            kind,
            parent,
            children: vec![],
            bindings: BTreeMap::new(),
        });
        if let Some(p) = parent {
            self.scopes[p.index()].children.push(id);
        }
        id
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    pub(crate) fn declare(&mut self, scope: ScopeId, name: &str, node: NodeId) {
        self.scopes[scope.index()]
            .bindings
            .entry(name.to_string())
            .or_default()
            .push(node);
    }

    pub(crate) fn undeclare(&mut self, scope: ScopeId, name: &str, node: NodeId) {
        let bindings = &mut self.scopes[scope.index()].bindings;
        if let Some(nodes) = bindings.get_mut(name) {
            nodes.retain(|n| *n != node);
            if nodes.is_empty() {
                bindings.remove(name);
            }
        }
    }

    /// `scope` followed by each of its ancestors, innermost first.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), move |s| self.get(*s).parent)
    }

    /// Nearest scope that receives `var` declarations.
    pub fn var_scope(&self, scope: ScopeId) -> ScopeId {
        self.ancestors(scope)
            .find(|s| self.get(*s).kind.is_var_target())
            .unwrap_or(scope)
    }

    pub fn is_bound_in(&self, scope: ScopeId, name: &str) -> bool {
        self.get(scope).bindings.contains_key(name)
    }

    /// Innermost scope in the chain starting at `scope` that binds `name`.
    pub fn resolve(&self, scope: ScopeId, name: &str) -> Option<ScopeId> {
        self.ancestors(scope).find(|s| self.is_bound_in(*s, name))
    }

    /// True when `scope` is `ancestor` or nested somewhere inside it.
    pub fn is_within(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(scope).any(|s| s == ancestor)
    }
}
