//! Structural edits on a parsed tree.
//!
//! Mutations never touch the source text. They update nodes and scopes and
//! record where synthesized nodes print; [`SyntaxTree::print`] applies them.

use crate::scope::ScopeId;
use crate::text::Span;
use crate::tree::{
    BindingKind, BindingSite, FunctionBody, IdentNode, IdentRole, ImportNode, Insertion, Node,
    NodeId, NodeKind, SynthesizedDecl, SyntaxTree,
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutateError {
    #[error("node {0:?} is not a binding identifier")]
    NotABinding(NodeId),
    #[error("node {0:?} is not an import declaration")]
    NotAnImport(NodeId),
    #[error("import from '{0}' cannot take named specifiers")]
    ClosedImport(String),
    #[error("node {0:?} is not a function with a block body")]
    NoBlockBody(NodeId),
}

impl SyntaxTree {
    /// Renames one binding identifier. References are left alone.
    pub fn rename_binding(&mut self, id: NodeId, new_name: &str) -> Result<(), MutateError> {
        let scope = self.node(id).scope;
        let Some(NodeKind::Ident(ident)) = self.nodes.get_mut(id.index()).map(|n| &mut n.kind)
        else {
            return Err(MutateError::NotABinding(id));
        };
        if !ident.is_binding() {
            return Err(MutateError::NotABinding(id));
        }
        let old = std::mem::replace(&mut ident.name, new_name.to_string());
        if ident.renamed_from.is_none() && !ident.synthesized {
            ident.renamed_from = Some(old.clone());
        }
        self.scopes.undeclare(scope, &old, id);
        self.scopes.declare(scope, new_name, id);
        debug!(from = %old, to = new_name, "renamed binding");
        Ok(())
    }

    /// Appends named specifiers to an import declaration, parsed or synthesized.
    /// Returns the new local binding identifiers.
    pub fn add_import_names(
        &mut self,
        import: NodeId,
        names: &[String],
    ) -> Result<Vec<NodeId>, MutateError> {
        let synthesized = self.node(import).span.is_empty();
        match self.import(import) {
            None => return Err(MutateError::NotAnImport(import)),
            Some(node) if !synthesized && !node.accepts_named() => {
                return Err(MutateError::ClosedImport(node.source.clone()));
            }
            Some(_) => {}
        }
        Ok(names
            .iter()
            .map(|name| self.push_import_local(import, name))
            .collect())
    }

    /// Synthesizes `import { names } from 'module'` after the leading imports.
    pub fn insert_import(&mut self, module: &str, names: &[String]) -> NodeId {
        let nl = self.newline();
        let (at, prefix, suffix) = match self.leading_imports_end() {
            Some(end) => (end, nl.to_string(), String::new()),
            None => match self.prologue_end() {
                Some(end) => (self.end_of_line_trivia(end), nl.to_string(), String::new()),
                None => (0, String::new(), nl.to_string()),
            },
        };
        let root = self.root();
        let id = self.push_synthesized(
            NodeKind::Import(ImportNode {
                source: module.to_string(),
                type_only: false,
                default: None,
                namespace: None,
                named: None,
                added: Vec::new(),
            }),
            root,
            self.module_scope(),
            at,
        );
        for name in names {
            self.push_import_local(id, name);
        }
        self.insertions.push(Insertion {
            at,
            node: id,
            prefix,
            suffix,
        });
        debug!(module, at, "inserted import declaration");
        id
    }

    /// Prepends `const [value, setter] = callee(null);` to a function body.
    pub fn prepend_state_declaration(
        &mut self,
        function: NodeId,
        value: &str,
        setter: &str,
        callee: &str,
    ) -> Result<NodeId, MutateError> {
        let body = self.block_body(function)?;
        let decl = self.push_synthesized(
            NodeKind::Statement,
            function,
            body.scope,
            body.open + 1,
        );
        let value = self.push_local(decl, body.scope, value, BindingKind::Const);
        let setter = self.push_local(decl, body.scope, setter, BindingKind::Const);
        self.nodes[decl.index()].kind = NodeKind::Synthesized(SynthesizedDecl::State {
            value,
            setter,
            callee: callee.to_string(),
        });
        self.insert_into_body(&body, decl);
        Ok(decl)
    }

    /// Prepends `let name = null;` to a function body.
    pub fn prepend_null_declaration(
        &mut self,
        function: NodeId,
        name: &str,
    ) -> Result<NodeId, MutateError> {
        let body = self.block_body(function)?;
        let decl = self.push_synthesized(
            NodeKind::Statement,
            function,
            body.scope,
            body.open + 1,
        );
        let name = self.push_local(decl, body.scope, name, BindingKind::Let);
        self.nodes[decl.index()].kind = NodeKind::Synthesized(SynthesizedDecl::Null { name });
        self.insert_into_body(&body, decl);
        Ok(decl)
    }

    /// Block body of a function node.
    pub fn block_body(&self, function: NodeId) -> Result<FunctionBody, MutateError> {
        self.function(function)
            .and_then(|f| f.body.clone())
            .ok_or(MutateError::NoBlockBody(function))
    }

    /// Whether any mutation has been applied.
    pub fn is_modified(&self) -> bool {
        !self.insertions.is_empty()
            || self.imports().any(|(_, import)| !import.added.is_empty())
            || self.nodes.iter().any(|n| {
                matches!(&n.kind, NodeKind::Ident(ident) if ident.renamed_from.is_some())
            })
    }

    pub(crate) fn newline(&self) -> &'static str {
        if self.source.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// End of the hashbang line or of the top-level directive prologue.
    fn prologue_end(&self) -> Option<u32> {
        match &self.node(self.root()).kind {
            NodeKind::Module(module) => module.directives_end.or(module.hashbang_end),
            _ => None,
        }
    }

    fn push_synthesized(
        &mut self,
        kind: NodeKind,
        parent: NodeId,
        scope: ScopeId,
        at: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            span: Span::empty_at(at),
            scope,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Synthesized binding identifier declared in `scope`.
    fn push_local(&mut self, parent: NodeId, scope: ScopeId, name: &str, kind: BindingKind) -> NodeId {
        let at = self.node(parent).span.start;
        let id = self.push_synthesized(
            NodeKind::Ident(IdentNode {
                name: name.to_string(),
                role: IdentRole::Binding(BindingSite::new(kind)),
                renamed_from: None,
                synthesized: true,
            }),
            parent,
            scope,
            at,
        );
        self.scopes.declare(scope, name, id);
        id
    }

    fn push_import_local(&mut self, import: NodeId, name: &str) -> NodeId {
        let scope = self.module_scope();
        let id = self.push_local(import, scope, name, BindingKind::Import);
        if let NodeKind::Import(node) = &mut self.nodes[import.index()].kind {
            node.added.push(id);
        }
        id
    }

    /// Records where a synthesized body statement prints: at the top of the
    /// body, after any directives, indented like the first statement.
    fn insert_into_body(&mut self, body: &FunctionBody, decl: NodeId) {
        let nl = self.newline();
        let source = self.source.as_str();
        let brace_indent = self.lines.indent_of(source, body.open).to_string();
        let nested_indent = format!("{brace_indent}{}", self.style.indent_unit.as_str());
        let anchor = body.directives_end.unwrap_or(body.open + 1);
        let anchor_line = self.lines.line_of(anchor);

        let (at, prefix, suffix) = match body.first_statement {
            Some(first) if self.lines.line_of(first) != anchor_line => {
                let indent = self.lines.indent_of(source, first);
                (
                    self.end_of_line_trivia(anchor),
                    format!("{nl}{indent}"),
                    String::new(),
                )
            }
            // `{ return x; }`: the statement moves to its own line.
            Some(first) => (
                first,
                format!("{nl}{nested_indent}"),
                format!("{nl}{nested_indent}"),
            ),
            None if self.lines.line_of(body.close) != anchor_line => (
                self.end_of_line_trivia(anchor),
                format!("{nl}{nested_indent}"),
                String::new(),
            ),
            // `{}`
            None => (
                anchor,
                format!("{nl}{nested_indent}"),
                format!("{nl}{brace_indent}"),
            ),
        };

        // Only the last statement inserted at one offset carries the text that
        // separates the insertions from what follows.
        let mut suffix = suffix;
        let nodes = &self.nodes;
        for earlier in self.insertions.iter_mut().filter(|i| {
            i.at == at && matches!(nodes[i.node.index()].kind, NodeKind::Synthesized(_))
        }) {
            let carried = std::mem::take(&mut earlier.suffix);
            if suffix.is_empty() {
                suffix = carried;
            }
        }

        self.nodes[decl.index()].span = Span::empty_at(at);
        self.insertions.push(Insertion {
            at,
            node: decl,
            prefix,
            suffix,
        });
        debug!(at, "inserted body declaration");
    }
}

#[cfg(test)]
mod tests {
    use crate::{Dialect, parse};

    #[test]
    fn rename_updates_scope_bindings() {
        let mut tree = parse("function f(temp) { return 1; }", Dialect::javascript()).unwrap();
        let id = tree
            .scopes()
            .get(tree.scopes().get(tree.module_scope()).children[0])
            .bindings["temp"][0];
        tree.rename_binding(id, "_temp").unwrap();
        let scope = tree.node(id).scope;
        assert!(tree.scopes().is_bound_in(scope, "_temp"));
        assert!(!tree.scopes().is_bound_in(scope, "temp"));
        assert_eq!(tree.ident(id).unwrap().renamed_from.as_deref(), Some("temp"));
        assert!(tree.is_modified());
    }

    #[test]
    fn rename_rejects_references() {
        let mut tree = parse("foo();", Dialect::javascript()).unwrap();
        let reference = tree.references()[0];
        assert!(tree.rename_binding(reference, "_foo").is_err());
    }

    #[test]
    fn namespace_imports_are_closed() {
        let mut tree = parse("import * as R from 'react';", Dialect::javascript()).unwrap();
        let (id, _) = tree.imports().next().unwrap();
        assert!(tree.add_import_names(id, &["useState".to_string()]).is_err());
    }

    #[test]
    fn synthesized_names_are_bound_in_the_body_scope() {
        let mut tree = parse("function App() {\n  return 1;\n}\n", Dialect::javascript()).unwrap();
        let app = tree.first_component().unwrap();
        tree.prepend_state_declaration(app, "count", "setCount", "useState")
            .unwrap();
        let scope = tree.block_body(app).unwrap().scope;
        assert!(tree.scopes().is_bound_in(scope, "count"));
        assert!(tree.scopes().is_bound_in(scope, "setCount"));
    }
}
