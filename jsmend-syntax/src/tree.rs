//! Arena-backed syntax tree.
//!
//! The tree only materializes what repairs need: statements, declarations,
//! functions, classes, JSX elements and every identifier with its role. Everything
//! else is kept as source text and printed back untouched.

use crate::Dialect;
use crate::scope::{ScopeId, ScopeTree};
use crate::text::{LineIndex, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    CatchParam,
    Import,
    /// TypeScript `enum`, `namespace` and `declare` names.
    Ambient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingSite {
    pub kind: BindingKind,
    /// Shorthand property in an object pattern (`{ name }`).
    pub shorthand: bool,
    /// Import specifier without `as` (`import { name }`).
    pub import_unaliased: bool,
    /// Declared by an `export` declaration.
    pub exported: bool,
}

impl BindingSite {
    pub fn new(kind: BindingKind) -> Self {
        Self {
            kind,
            shorthand: false,
            import_unaliased: false,
            exported: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentRole {
    Binding(BindingSite),
    Reference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentNode {
    pub name: String,
    pub role: IdentRole,
    /// Name as parsed, when the identifier has been renamed.
    pub renamed_from: Option<String>,
    /// Created by a mutation rather than read from the source.
    pub synthesized: bool,
}

impl IdentNode {
    pub fn binding(&self) -> Option<BindingSite> {
        match self.role {
            IdentRole::Binding(site) => Some(site),
            IdentRole::Reference => None,
        }
    }

    pub fn is_binding(&self) -> bool {
        self.binding().is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    /// Exported name on the module side.
    pub imported: String,
    /// Local binding identifier.
    pub local: NodeId,
    pub type_only: bool,
    pub span: Span,
}

/// The `{ ... }` clause of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedImports {
    /// Offset of `{`.
    pub open: u32,
    /// Offset of `}`.
    pub close: u32,
    pub specifiers: Vec<ImportSpecifier>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportNode {
    /// Module specifier, without quotes.
    pub source: String,
    pub type_only: bool,
    pub default: Option<NodeId>,
    pub namespace: Option<NodeId>,
    pub named: Option<NamedImports>,
    /// Local binding identifiers appended by mutation.
    pub added: Vec<NodeId>,
}

impl ImportNode {
    /// Whether named specifiers can be appended to this declaration.
    pub fn accepts_named(&self) -> bool {
        !self.type_only
            && self.namespace.is_none()
            && (self.named.is_some() || self.default.is_some())
    }

    /// Local binding identifiers of every specifier, parsed or added.
    pub fn locals(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.default
            .into_iter()
            .chain(self.namespace)
            .chain(self.named.iter().flat_map(|n| n.specifiers.iter().map(|s| s.local)))
            .chain(self.added.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBody {
    pub scope: ScopeId,
    /// Offset of `{`.
    pub open: u32,
    /// Offset of `}`.
    pub close: u32,
    /// End of the last directive (`"use client";`), if any.
    pub directives_end: Option<u32>,
    /// Start of the first statement after the directives.
    pub first_statement: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionNode {
    pub name: Option<NodeId>,
    pub arrow: bool,
    /// `None` for expression-bodied arrows and bodiless TypeScript signatures.
    pub body: Option<FunctionBody>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaratorNode {
    /// The declared identifier when the target is a plain name.
    pub name: Option<NodeId>,
    /// The initializer when it is directly a function or arrow.
    pub function: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    /// End of the hashbang line.
    pub hashbang_end: Option<u32>,
    /// End of the last top-level directive.
    pub directives_end: Option<u32>,
}

/// A declaration statement created by mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesizedDecl {
    /// `const [value, setter] = callee(null);`
    State {
        value: NodeId,
        setter: NodeId,
        callee: String,
    },
    /// `let name = null;`
    Null { name: NodeId },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Module(ModuleNode),
    Import(ImportNode),
    Export { default: bool },
    VarDecl(VarKind),
    Declarator(DeclaratorNode),
    Function(FunctionNode),
    Class,
    Block,
    /// Any other statement.
    Statement,
    /// TypeScript-only declaration kept as text (interface, type alias, ...).
    TypeDecl,
    Jsx,
    Ident(IdentNode),
    Synthesized(SynthesizedDecl),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    /// Scope the node belongs to; for bindings, the scope they are declared in.
    pub scope: ScopeId,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Formatting conventions observed in the parsed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceStyle {
    pub semicolons: bool,
    pub quote: char,
    pub indent_unit: IndentUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Spaces(u8),
    Tab,
}

impl IndentUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            IndentUnit::Tab => "\t",
            IndentUnit::Spaces(4) => "    ",
            IndentUnit::Spaces(_) => "  ",
        }
    }
}

/// Text printed at a fixed offset for a synthesized node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Insertion {
    pub at: u32,
    pub node: NodeId,
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub(crate) source: String,
    pub(crate) dialect: Dialect,
    pub(crate) lines: LineIndex,
    pub(crate) nodes: Vec<Node>,
    pub(crate) scopes: ScopeTree,
    pub(crate) references: Vec<NodeId>,
    pub(crate) insertions: Vec<Insertion>,
    pub(crate) style: SourceStyle,
}

impl SyntaxTree {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    pub fn style(&self) -> SourceStyle {
        self.style
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn scopes(&self) -> &ScopeTree {
        &self.scopes
    }

    pub fn module_scope(&self) -> ScopeId {
        ScopeId(0)
    }

    pub fn ident(&self, id: NodeId) -> Option<&IdentNode> {
        match &self.node(id).kind {
            NodeKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    pub fn import(&self, id: NodeId) -> Option<&ImportNode> {
        match &self.node(id).kind {
            NodeKind::Import(import) => Some(import),
            _ => None,
        }
    }

    pub fn function(&self, id: NodeId) -> Option<&FunctionNode> {
        match &self.node(id).kind {
            NodeKind::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Top-level statements in source order, followed by synthesized imports.
    pub fn top_level(&self) -> &[NodeId] {
        &self.node(self.root()).children
    }

    /// Every reference identifier, in source order.
    pub fn references(&self) -> &[NodeId] {
        &self.references
    }

    /// `(1-based line, 0-based UTF-16 column)` of a byte offset.
    pub fn position(&self, offset: u32) -> (u32, u32) {
        self.lines.line_col(&self.source, offset)
    }

    /// Byte offset of `(1-based line, 0-based UTF-16 column)`.
    pub fn offset_of(&self, line: u32, column: u32) -> Option<u32> {
        self.lines.offset_of(&self.source, line, column)
    }

    /// Import declarations at the top level, parsed and synthesized.
    pub fn imports(&self) -> impl Iterator<Item = (NodeId, &ImportNode)> + '_ {
        self.top_level()
            .iter()
            .filter_map(|id| self.import(*id).map(|import| (*id, import)))
    }

    /// Current name of an identifier node.
    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.ident(id).map(|i| i.name.as_str())
    }

    /// Whether any reference resolves to the binding declared by `binding`.
    pub fn is_referenced(&self, binding: NodeId) -> bool {
        let Some(ident) = self.ident(binding) else {
            return false;
        };
        let declared_in = self.node(binding).scope;
        self.references.iter().any(|r| {
            let node = self.node(*r);
            self.ident(*r).is_some_and(|i| i.name == ident.name)
                && self.scopes.resolve(node.scope, &ident.name) == Some(declared_in)
        })
    }

    /// Whether `name` is bound in `scope` or any enclosing scope.
    pub fn is_visible(&self, scope: ScopeId, name: &str) -> bool {
        self.scopes.resolve(scope, name).is_some()
    }

    /// Whether binding `name` in `scope` would capture a reference that currently
    /// resolves outside `scope` (or nowhere).
    pub fn would_capture(&self, scope: ScopeId, name: &str) -> bool {
        self.references.iter().any(|r| {
            let node = self.node(*r);
            if self.ident(*r).is_none_or(|i| i.name != name) {
                return false;
            }
            if !self.scopes.is_within(node.scope, scope) {
                return false;
            }
            match self.scopes.resolve(node.scope, name) {
                None => true,
                Some(found) => !self.scopes.is_within(found, scope),
            }
        })
    }

    /// Whether `name` is declared anywhere inside `scope`, nested scopes included.
    pub fn is_bound_below(&self, scope: ScopeId, name: &str) -> bool {
        let mut stack = vec![scope];
        while let Some(s) = stack.pop() {
            let data = self.scopes.get(s);
            if data.bindings.contains_key(name) {
                return true;
            }
            stack.extend(data.children.iter().copied());
        }
        false
    }

    /// The first top-level function whose name starts upper-case and that has a
    /// block body: `function App() {}`, `export (default) function App() {}` or
    /// `const App = () => {}` / `const App = function () {}`.
    pub fn first_component(&self) -> Option<NodeId> {
        self.top_level()
            .iter()
            .find_map(|id| self.component_in_statement(*id))
    }

    fn component_in_statement(&self, id: NodeId) -> Option<NodeId> {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Function(f) => {
                let name = f.name.and_then(|n| self.name_of(n))?;
                (starts_upper(name) && f.body.is_some()).then_some(id)
            }
            NodeKind::Export { .. } => node
                .children
                .iter()
                .find_map(|c| self.component_in_statement(*c)),
            NodeKind::VarDecl(_) => node.children.iter().find_map(|c| {
                let NodeKind::Declarator(decl) = &self.node(*c).kind else {
                    return None;
                };
                let name = decl.name.and_then(|n| self.name_of(n))?;
                let function = decl.function?;
                let has_body = self.function(function)?.body.is_some();
                (starts_upper(name) && has_body).then_some(function)
            }),
            _ => None,
        }
    }

    /// Offset right after the last top-level import declaration that precedes any
    /// other statement, extended past trailing same-line comments. The directive
    /// prologue does not end the run.
    pub fn leading_imports_end(&self) -> Option<u32> {
        let prologue_end = match &self.node(self.root()).kind {
            NodeKind::Module(module) => module.directives_end,
            _ => None,
        };
        let mut end = None;
        for id in self.top_level() {
            let node = self.node(*id);
            if prologue_end.is_some_and(|p| node.span.end <= p) && !node.span.is_empty() {
                continue;
            }
            match &node.kind {
                NodeKind::Import(_) if !node.span.is_empty() => end = Some(node.span.end),
                NodeKind::Import(_) => {}
                _ => break,
            }
        }
        end.map(|e| self.end_of_line_trivia(e))
    }

    /// Moves `offset` past spaces and comments that end on the same line.
    pub(crate) fn end_of_line_trivia(&self, offset: u32) -> u32 {
        let bytes = self.source.as_bytes();
        let mut pos = offset as usize;
        loop {
            while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
                pos += 1;
            }
            if bytes[pos..].starts_with(b"//") {
                while pos < bytes.len() && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
                return pos as u32;
            }
            if bytes[pos..].starts_with(b"/*") {
                let rest = &self.source[pos + 2..];
                match rest.find("*/") {
                    Some(rel) if !rest[..rel].contains('\n') => {
                        pos += 2 + rel + 2;
                        continue;
                    }
                    _ => return offset,
                }
            }
            let at_line_end = pos >= bytes.len() || bytes[pos] == b'\n' || bytes[pos] == b'\r';
            return if at_line_end { pos as u32 } else { offset };
        }
    }
}

fn starts_upper(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
