//! Recursive-descent parser producing a [`SyntaxTree`].
//!
//! The parser materializes identifiers, declarations, functions, classes and JSX
//! elements, and records the lexical scope of every identifier. Expression shapes
//! it has no use for are consumed without building nodes. TypeScript types are
//! skipped token-wise.

mod expr;
mod jsx;
mod pattern;
mod stmt;
mod ts;

use crate::Dialect;
use crate::scanner::Scanner;
use crate::scope::{ScopeId, ScopeKind, ScopeTree};
use crate::text::{LineIndex, Span};
use crate::token::{Token, TokenKind, is_reserved_word};
use crate::tree::{
    BindingKind, BindingSite, IdentNode, IdentRole, IndentUnit, ModuleNode, Node, NodeId,
    NodeKind, SourceStyle, SyntaxTree,
};
use thiserror::Error;
use tracing::debug;

/// Guards recursion so pathological nesting fails cleanly instead of
/// overflowing the stack.
const MAX_DEPTH: u32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based line.
    pub line: u32,
    /// 1-based column, in UTF-16 code units.
    pub column: u32,
}

pub(crate) type PResult<T> = Result<T, ParseError>;

/// What an expression turned out to be, as far as declarations care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expr {
    /// A bare function expression or arrow.
    Function(NodeId),
    Other,
}

pub fn parse(source: &str, dialect: Dialect) -> Result<SyntaxTree, ParseError> {
    Parser::new(source, dialect).parse_module()
}

pub(crate) struct Parser<'a> {
    src: &'a str,
    scanner: Scanner<'a>,
    tok: Token,
    prev_end: u32,
    dialect: Dialect,
    nodes: Vec<Node>,
    scopes: ScopeTree,
    references: Vec<NodeId>,
    open: Vec<NodeId>,
    scope: ScopeId,
    depth: u32,
    in_generator: bool,
    /// Bindings created now belong to an `export` declaration.
    exporting: bool,
    explicit_semicolons: u32,
    inserted_semicolons: u32,
    single_quotes: u32,
    double_quotes: u32,
}

/// Parser position, for speculative parsing that must not build nodes.
#[derive(Clone, Copy)]
pub(crate) struct Checkpoint<'a> {
    scanner: Scanner<'a>,
    tok: Token,
    prev_end: u32,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str, dialect: Dialect) -> Self {
        let mut scanner = Scanner::new(src);
        let tok = scanner.scan();
        let mut scopes = ScopeTree::default();
        let scope = scopes.add(ScopeKind::Module, None);
        Self {
            src,
            scanner,
            tok,
            prev_end: 0,
            dialect,
            nodes: Vec::new(),
            scopes,
            references: Vec::new(),
            open: Vec::new(),
            scope,
            depth: 0,
            in_generator: false,
            exporting: false,
            explicit_semicolons: 0,
            inserted_semicolons: 0,
            single_quotes: 0,
            double_quotes: 0,
        }
    }

    fn parse_module(mut self) -> PResult<SyntaxTree> {
        let hashbang_end = self
            .src
            .starts_with("#!")
            .then(|| self.src.find(['\n', '\r']).unwrap_or(self.src.len()) as u32);
        let root = self.start_node(
            NodeKind::Module(ModuleNode {
                hashbang_end,
                directives_end: None,
            }),
            0,
        );

        let directives_end = self.parse_directive_prologue()?;
        while self.tok.kind != TokenKind::Eof {
            self.parse_statement_list_item()?;
        }
        self.prev_end = self.src.len() as u32;
        self.finish_node(root);
        if let NodeKind::Module(module) = &mut self.nodes[root.index()].kind {
            module.directives_end = directives_end;
        }

        debug!(
            nodes = self.nodes.len(),
            scopes = self.scopes.len(),
            references = self.references.len(),
            "parsed module"
        );

        let style = self.style();
        Ok(SyntaxTree {
            lines: LineIndex::new(self.src),
            source: self.src.to_string(),
            dialect: self.dialect,
            nodes: self.nodes,
            scopes: self.scopes,
            references: self.references,
            insertions: Vec::new(),
            style,
        })
    }

    fn style(&self) -> SourceStyle {
        SourceStyle {
            semicolons: self.explicit_semicolons >= self.inserted_semicolons,
            quote: if self.double_quotes > self.single_quotes {
                '"'
            } else {
                '\''
            },
            indent_unit: detect_indent(self.src),
        }
    }

    // ---- tokens -----------------------------------------------------------

    fn text(&self, tok: Token) -> &'a str {
        &self.src[tok.span.start as usize..tok.span.end as usize]
    }

    fn at(&self, punct: &str) -> bool {
        self.tok.kind == TokenKind::Punct && self.text(self.tok) == punct
    }

    fn at_kw(&self, kw: &str) -> bool {
        is_kw(self.src, self.tok, kw)
    }

    /// Current token can name a binding.
    fn at_binding_ident(&self) -> bool {
        self.tok.kind == TokenKind::Ident
            && (self.tok.escaped || !is_reserved_word(self.text(self.tok)))
    }

    fn bump(&mut self) {
        if self.tok.kind == TokenKind::String {
            match self.src.as_bytes()[self.tok.span.start as usize] {
                b'\'' => self.single_quotes += 1,
                b'"' => self.double_quotes += 1,
                _ => {}
            }
        }
        self.prev_end = self.tok.span.end;
        self.tok = self.scanner.scan();
    }

    fn eat(&mut self, punct: &str) -> bool {
        if self.at(punct) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn eat_kw(&mut self, kw: &str) -> bool {
        if self.at_kw(kw) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, punct: &str) -> PResult<()> {
        if self.eat(punct) {
            Ok(())
        } else {
            self.unexpected_expecting(punct)
        }
    }

    fn expect_kw(&mut self, kw: &str) -> PResult<()> {
        if self.eat_kw(kw) {
            Ok(())
        } else {
            self.unexpected_expecting(kw)
        }
    }

    /// Next token after the current one.
    fn peek(&self) -> Token {
        let mut scanner = self.scanner;
        scanner.scan()
    }

    /// The two tokens after the current one.
    fn peek2(&self) -> (Token, Token) {
        let mut scanner = self.scanner;
        let first = scanner.scan();
        (first, scanner.scan())
    }

    fn peek_is(&self, punct: &str) -> bool {
        let next = self.peek();
        next.kind == TokenKind::Punct && self.text(next) == punct
    }

    fn tok_is(&self, tok: Token, punct: &str) -> bool {
        tok.kind == TokenKind::Punct && self.text(tok) == punct
    }

    fn checkpoint(&self) -> Checkpoint<'a> {
        Checkpoint {
            scanner: self.scanner,
            tok: self.tok,
            prev_end: self.prev_end,
        }
    }

    fn restore(&mut self, cp: Checkpoint<'a>) {
        self.scanner = cp.scanner;
        self.tok = cp.tok;
        self.prev_end = cp.prev_end;
    }

    /// Statement terminator with automatic semicolon insertion.
    fn consume_semicolon(&mut self) -> PResult<()> {
        if self.eat(";") {
            self.explicit_semicolons += 1;
            return Ok(());
        }
        if self.at("}") || self.tok.kind == TokenKind::Eof || self.tok.nl_before {
            self.inserted_semicolons += 1;
            return Ok(());
        }
        self.unexpected_expecting(";")
    }

    fn descend(&mut self) -> PResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(self.error_at(self.tok.span.start, "nesting too deep".to_string()));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    // ---- errors -----------------------------------------------------------

    fn error_at(&self, offset: u32, message: String) -> ParseError {
        let (line, column) = LineIndex::new(self.src).line_col(self.src, offset);
        ParseError {
            message,
            line,
            column: column + 1,
        }
    }

    fn describe(&self, tok: Token) -> String {
        match tok.kind {
            TokenKind::Eof => "end of file".to_string(),
            TokenKind::Invalid => "invalid or unterminated token".to_string(),
            _ => {
                let text = self.text(tok);
                let short: String = text.chars().take(24).collect();
                format!("token `{short}`")
            }
        }
    }

    fn unexpected<T>(&self) -> PResult<T> {
        Err(self.error_at(
            self.tok.span.start,
            format!("unexpected {}", self.describe(self.tok)),
        ))
    }

    fn unexpected_expecting<T>(&self, what: &str) -> PResult<T> {
        Err(self.error_at(
            self.tok.span.start,
            format!("expected `{what}`, found {}", self.describe(self.tok)),
        ))
    }

    // ---- nodes and scopes -------------------------------------------------

    fn push_node(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = self.open.last().copied();
        self.nodes.push(Node {
            kind,
            span,
            scope: self.scope,
            parent,
            children: Vec::new(),
        });
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        id
    }

    fn start_node(&mut self, kind: NodeKind, start: u32) -> NodeId {
        let id = self.push_node(kind, Span::empty_at(start));
        self.open.push(id);
        id
    }

    fn finish_node(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.index()];
        node.span.end = self.prev_end.max(node.span.start);
        while let Some(top) = self.open.pop() {
            if top == id {
                break;
            }
        }
    }

    fn set_kind(&mut self, id: NodeId, kind: NodeKind) {
        self.nodes[id.index()].kind = kind;
    }

    fn push_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = self.scopes.add(kind, Some(self.scope));
        self.scope = id;
        id
    }

    fn ident_name(&self, tok: Token) -> String {
        let raw = self.text(tok);
        if tok.escaped {
            cook_identifier(raw)
        } else {
            raw.to_string()
        }
    }

    /// Records an identifier reference at `tok`.
    fn reference(&mut self, tok: Token) -> NodeId {
        let ident = IdentNode {
            name: self.ident_name(tok),
            role: IdentRole::Reference,
            renamed_from: None,
            synthesized: false,
        };
        let id = self.push_node(NodeKind::Ident(ident), tok.span);
        self.references.push(id);
        id
    }

    /// Declares a binding identifier at `tok` in the scope `site.kind` targets.
    fn bind(&mut self, tok: Token, mut site: BindingSite) -> NodeId {
        if self.exporting {
            site.exported = true;
        }
        let scope = match site.kind {
            BindingKind::Var => self.scopes.var_scope(self.scope),
            _ => self.scope,
        };
        let name = self.ident_name(tok);
        let ident = IdentNode {
            name: name.clone(),
            role: IdentRole::Binding(site),
            renamed_from: None,
            synthesized: false,
        };
        let id = self.push_node(NodeKind::Ident(ident), tok.span);
        self.nodes[id.index()].scope = scope;
        self.scopes.declare(scope, &name, id);
        id
    }

    /// Leading `"use ..."` directives. Returns the end of the last one.
    fn parse_directive_prologue(&mut self) -> PResult<Option<u32>> {
        let mut end = None;
        while self.tok.kind == TokenKind::String {
            let next = self.peek();
            let terminated = next.kind == TokenKind::Eof
                || next.nl_before
                || self.tok_is(next, ";")
                || self.tok_is(next, "}");
            if !terminated {
                break;
            }
            let id = self.start_node(NodeKind::Statement, self.tok.span.start);
            self.bump();
            self.consume_semicolon()?;
            self.finish_node(id);
            end = Some(self.prev_end);
        }
        Ok(end)
    }
}

pub(crate) fn is_kw(src: &str, tok: Token, kw: &str) -> bool {
    tok.kind == TokenKind::Ident
        && !tok.escaped
        && &src[tok.span.start as usize..tok.span.end as usize] == kw
}

/// Decodes `\uXXXX` and `\u{...}` escapes in an identifier.
fn cook_identifier(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(idx) = rest.find("\\u") {
        out.push_str(&rest[..idx]);
        let after = &rest[idx + 2..];
        let (hex, consumed) = match after.strip_prefix('{') {
            Some(inner) => match inner.find('}') {
                Some(close) => (&inner[..close], close + 2),
                None => (inner, after.len()),
            },
            None => (&after[..after.len().min(4)], after.len().min(4)),
        };
        match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
            Some(c) => out.push(c),
            None => out.push_str(&rest[idx..idx + 2 + consumed]),
        }
        rest = &after[consumed..];
    }
    out.push_str(rest);
    out
}

/// Most common indentation step among indented lines.
fn detect_indent(src: &str) -> IndentUnit {
    let mut tabs = 0usize;
    let mut two = 0usize;
    let mut four = 0usize;
    for line in src.lines() {
        if line.starts_with('\t') {
            tabs += 1;
        } else {
            let spaces = line.len() - line.trim_start_matches(' ').len();
            if spaces == 0 || line.trim().is_empty() {
                continue;
            }
            match spaces % 4 {
                0 => four += 1,
                2 => two += 1,
                _ => {}
            }
        }
    }
    if tabs > two + four {
        IndentUnit::Tab
    } else if two == 0 && four > 0 {
        IndentUnit::Spaces(4)
    } else {
        IndentUnit::Spaces(2)
    }
}
