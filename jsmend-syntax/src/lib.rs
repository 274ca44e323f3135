//! Lossless JavaScript / TypeScript / JSX syntax trees for jsmend.
//!
//! Responsibilities:
//! - Parse a module into an arena of nodes with a parent-linked scope chain.
//! - Apply structural edits (renames, import specifiers, body declarations).
//! - Print the edited tree, copying untouched regions byte-for-byte.

pub mod globals;
mod mutate;
mod parser;
mod print;
pub mod scanner;
pub mod scope;
pub mod text;
pub mod token;
pub mod tree;
pub mod visit;

pub use mutate::MutateError;
pub use parser::{ParseError, parse};
pub use print::PrintError;
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use text::{LineIndex, Span};
pub use tree::{
    BindingKind, BindingSite, FunctionBody, FunctionNode, IdentNode, IdentRole, ImportNode,
    IndentUnit, Node, NodeId, NodeKind, SourceStyle, SynthesizedDecl, SyntaxTree,
};

use camino::Utf8Path;

/// Syntax extensions enabled for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dialect {
    pub typescript: bool,
    pub jsx: bool,
}

impl Dialect {
    pub fn javascript() -> Self {
        Self {
            typescript: false,
            jsx: true,
        }
    }

    pub fn typescript() -> Self {
        Self {
            typescript: true,
            jsx: false,
        }
    }

    pub fn tsx() -> Self {
        Self {
            typescript: true,
            jsx: true,
        }
    }

    /// Dialect for a file extension; `None` for files this crate cannot parse.
    /// Plain JavaScript files accept JSX, as bundlers commonly do.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "js" | "jsx" | "mjs" | "cjs" => Some(Self::javascript()),
            "ts" | "mts" | "cts" => Some(Self::typescript()),
            "tsx" => Some(Self::tsx()),
            _ => None,
        }
    }

    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        path.extension().and_then(Self::from_extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialect_follows_extension() {
        assert_eq!(
            Dialect::from_path(Utf8Path::new("src/App.tsx")),
            Some(Dialect::tsx())
        );
        assert_eq!(
            Dialect::from_path(Utf8Path::new("a/b.MJS")),
            Some(Dialect::javascript())
        );
        assert_eq!(
            Dialect::from_path(Utf8Path::new("x.d.ts")),
            Some(Dialect::typescript())
        );
        assert_eq!(Dialect::from_path(Utf8Path::new("README.md")), None);
        assert_eq!(Dialect::from_path(Utf8Path::new("Makefile")), None);
    }
}
