//! Collision-free names for synthesized and renamed bindings.

use jsmend_syntax::globals::is_known_global;
use jsmend_syntax::token::is_reserved_word;
use jsmend_syntax::{ScopeId, SyntaxTree};
use std::collections::BTreeSet;

/// What the name is about to be used for. The two differ in whether capturing
/// existing references is the goal or a hazard, and in whether nested bindings
/// count as collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameUse {
    /// A new declaration meant to satisfy undeclared references in its scope.
    /// Nested bindings shadow it without conflict.
    Declaration,
    /// A new name for an existing, unreferenced binding.
    Rename,
}

/// Whether `name` can be bound in `scope` without clashing with a visible
/// binding, a runtime global or a reserved word. Renames also avoid nested
/// bindings and existing references.
pub fn is_free(
    tree: &SyntaxTree,
    scope: ScopeId,
    name: &str,
    usage: NameUse,
    globals: &BTreeSet<String>,
) -> bool {
    if is_reserved_word(name) || is_known_global(name) || globals.contains(name) {
        return false;
    }
    if tree.is_visible(scope, name) {
        return false;
    }
    match usage {
        NameUse::Declaration => true,
        NameUse::Rename => !tree.is_bound_below(scope, name) && !tree.would_capture(scope, name),
    }
}

/// `candidate`, or the first free `candidate_N` for `N` in `1..=max_attempts`.
pub fn unique_name(
    tree: &SyntaxTree,
    scope: ScopeId,
    candidate: &str,
    usage: NameUse,
    globals: &BTreeSet<String>,
    max_attempts: u32,
) -> Option<String> {
    if is_free(tree, scope, candidate, usage, globals) {
        return Some(candidate.to_string());
    }
    (1..=max_attempts)
        .map(|n| format!("{candidate}_{n}"))
        .find(|name| is_free(tree, scope, name, usage, globals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsmend_syntax::{Dialect, parse};

    fn component_scope(tree: &SyntaxTree) -> ScopeId {
        let app = tree.first_component().unwrap();
        tree.block_body(app).unwrap().scope
    }

    #[test]
    fn undeclared_references_do_not_block_declarations() {
        let tree = parse(
            "function App() {\n  return count;\n}\n",
            Dialect::javascript(),
        )
        .unwrap();
        let scope = component_scope(&tree);
        let none = BTreeSet::new();
        assert!(is_free(&tree, scope, "count", NameUse::Declaration, &none));
        assert!(!is_free(&tree, scope, "count", NameUse::Rename, &none));
    }

    #[test]
    fn suffixes_skip_every_visible_collision() {
        let tree = parse(
            "const value = 1;\nfunction App() {\n  const value_1 = 2;\n  return value_2;\n}\n",
            Dialect::javascript(),
        )
        .unwrap();
        let scope = component_scope(&tree);
        let none = BTreeSet::new();
        assert_eq!(
            unique_name(&tree, scope, "value", NameUse::Declaration, &none, 100).as_deref(),
            Some("value_2")
        );
    }

    #[test]
    fn nested_bindings_only_block_renames() {
        let tree = parse(
            "function App() {\n  const ids = rows.map((item) => item.id);\n  return item;\n}\n",
            Dialect::javascript(),
        )
        .unwrap();
        let scope = component_scope(&tree);
        let none = BTreeSet::new();
        assert!(is_free(&tree, scope, "item", NameUse::Declaration, &none));
        assert!(!is_free(&tree, scope, "item", NameUse::Rename, &none));
    }

    #[test]
    fn globals_and_reserved_words_are_never_free() {
        let tree = parse("function App() {}\n", Dialect::javascript()).unwrap();
        let scope = component_scope(&tree);
        let extra = BTreeSet::from(["analytics".to_string()]);
        assert!(!is_free(&tree, scope, "window", NameUse::Declaration, &extra));
        assert!(!is_free(&tree, scope, "analytics", NameUse::Declaration, &extra));
        assert!(!is_free(&tree, scope, "new", NameUse::Declaration, &extra));
        assert_eq!(
            unique_name(&tree, scope, "window", NameUse::Declaration, &extra, 2).as_deref(),
            Some("window_1")
        );
    }

    #[test]
    fn exhausting_attempts_gives_up() {
        let tree = parse(
            "function App() {\n  let a, a_1, a_2;\n}\n",
            Dialect::javascript(),
        )
        .unwrap();
        let scope = component_scope(&tree);
        let none = BTreeSet::new();
        assert_eq!(
            unique_name(&tree, scope, "a", NameUse::Declaration, &none, 2),
            None
        );
    }
}
