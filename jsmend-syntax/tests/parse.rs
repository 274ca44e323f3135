use jsmend_syntax::{BindingKind, Dialect, NodeKind, ScopeKind, SyntaxTree, parse};
use pretty_assertions::assert_eq;

fn js(src: &str) -> SyntaxTree {
    parse(src, Dialect::javascript()).unwrap_or_else(|e| panic!("parse failed: {e}\n{src}"))
}

fn ts(src: &str) -> SyntaxTree {
    parse(src, Dialect::typescript()).unwrap_or_else(|e| panic!("parse failed: {e}\n{src}"))
}

fn tsx(src: &str) -> SyntaxTree {
    parse(src, Dialect::tsx()).unwrap_or_else(|e| panic!("parse failed: {e}\n{src}"))
}

fn reference_names(tree: &SyntaxTree) -> Vec<String> {
    tree.references()
        .iter()
        .filter_map(|id| tree.name_of(*id))
        .map(str::to_string)
        .collect()
}

fn module_bindings(tree: &SyntaxTree) -> Vec<String> {
    tree.scopes()
        .get(tree.module_scope())
        .bindings
        .keys()
        .cloned()
        .collect()
}

#[test]
fn react_component_with_hooks_and_jsx() {
    let src = r#"import React, { useEffect } from "react";
import { Button } from "@/components/ui/button";

export default function Dashboard({ user, onLogout }) {
  useEffect(() => {
    document.title = `Hello ${user.name}`;
  }, [user]);

  const handle = async (event) => {
    event.preventDefault();
    await onLogout?.();
  };

  return (
    <div className="p-4" onClick={handle}>
      <Button variant="ghost">{count} items</Button>
      <Card.Header {...props} />
      {/* comment */}
      <>text &gt; more</>
    </div>
  );
}
"#;
    let tree = js(src);
    assert_eq!(
        module_bindings(&tree),
        vec!["Button", "Dashboard", "React", "useEffect"]
    );
    let refs = reference_names(&tree);
    for expected in ["useEffect", "document", "user", "event", "onLogout", "handle"] {
        assert!(refs.contains(&expected.to_string()), "missing {expected}");
    }
    assert!(refs.contains(&"Button".to_string()));
    assert!(refs.contains(&"Card".to_string()));
    assert!(refs.contains(&"count".to_string()));
    assert!(refs.contains(&"props".to_string()));
    assert!(!refs.contains(&"div".to_string()));
    assert_eq!(tree.print().unwrap(), src);
}

#[test]
fn first_component_prefers_top_level_upper_case_functions() {
    let tree = js("function helper() {}\nconst Page = () => {\n  return null;\n};\n");
    let id = tree.first_component().unwrap();
    assert!(matches!(tree.node(id).kind, NodeKind::Function(ref f) if f.arrow));

    let tree = js("const App = () => null;\nexport function Real() { return 1; }\n");
    let id = tree.first_component().unwrap();
    let name = tree.function(id).and_then(|f| f.name).unwrap();
    assert_eq!(tree.name_of(name), Some("Real"));

    assert!(js("const x = 1;").first_component().is_none());
}

#[test]
fn scopes_follow_blocks_functions_and_catch() {
    let src = "var a;\n{ let b; var c; }\nfunction f(p) { try {} catch (e) { const d = 1; } }\nfor (let i = 0; i < 3; i++) {}\n";
    let tree = js(src);
    assert_eq!(module_bindings(&tree), vec!["a", "c", "f"]);
    let scopes = tree.scopes();
    let kinds: Vec<ScopeKind> = (0..scopes.len())
        .map(|i| scopes.get(scope_id(&tree, i)).kind)
        .collect();
    assert!(kinds.contains(&ScopeKind::Catch));
    assert!(kinds.contains(&ScopeKind::Function));
}

fn scope_id(tree: &SyntaxTree, index: usize) -> jsmend_syntax::ScopeId {
    // Scope ids are dense; walk from the module scope to find the one at `index`.
    let mut stack = vec![tree.module_scope()];
    while let Some(s) = stack.pop() {
        if s.index() == index {
            return s;
        }
        stack.extend(tree.scopes().get(s).children.iter().copied());
    }
    panic!("no scope {index}");
}

#[test]
fn regex_and_division_are_told_apart() {
    let src = "const r = /ab+c/gi.test(s) ? a / b / c : x;\nconst t = (y) / 2;\n";
    let tree = js(src);
    let refs = reference_names(&tree);
    assert_eq!(refs, vec!["s", "a", "b", "c", "x", "y"]);
    assert_eq!(tree.print().unwrap(), src);
}

#[test]
fn typescript_annotations_are_skipped() {
    let src = r#"import type { FC } from "react";
import { type Props, helper } from "./types";

interface State<T> extends Base { items: T[]; }
type Handler = (event: Event) => void;
declare const VERSION: string;
enum Color { Red, Green }

export const List: FC<Props> = <T,>({ items }: { items: T[] }): JSX.Element | null => {
  const sorted = items.sort((a, b) => (a as number) - (b as number))!;
  const value = helper<string>(sorted) satisfies string;
  return null;
};

abstract class Repo<T> implements Store {
  private readonly cache = new Map<string, T>();
  constructor(private client: Client) { super(); }
  abstract find(id: string): Promise<T>;
}
"#;
    let tree = ts(src);
    let bindings = module_bindings(&tree);
    for expected in ["Color", "FC", "List", "Props", "Repo", "VERSION", "helper"] {
        assert!(bindings.contains(&expected.to_string()), "missing {expected}");
    }
    assert!(!bindings.contains(&"State".to_string()));
    let refs = reference_names(&tree);
    assert!(refs.contains(&"helper".to_string()));
    assert!(refs.contains(&"items".to_string()));
    assert!(refs.contains(&"Map".to_string()));
    assert!(!refs.contains(&"Event".to_string()));
    assert_eq!(tree.print().unwrap(), src);
}

#[test]
fn tsx_generic_components() {
    let src = "const Row = <T,>(props: RowProps<T>) => <td>{props.value as string}</td>;\n";
    let tree = tsx(src);
    assert!(reference_names(&tree).contains(&"props".to_string()));
    assert_eq!(tree.print().unwrap(), src);
}

#[test]
fn binding_kinds_are_recorded() {
    let tree = js("import x from 'x';\nclass K {}\nlet [a, ...rest] = list;\n");
    let module = tree.scopes().get(tree.module_scope());
    let kind_of = |name: &str| {
        let id = module.bindings[name][0];
        tree.ident(id).and_then(|i| i.binding()).map(|b| b.kind)
    };
    assert_eq!(kind_of("x"), Some(BindingKind::Import));
    assert_eq!(kind_of("K"), Some(BindingKind::Class));
    assert_eq!(kind_of("rest"), Some(BindingKind::Let));
}

#[test]
fn export_declarations_mark_bindings_exported() {
    let tree = js("export const a = 1, b = () => {};\nconst c = 2;\n");
    let module = tree.scopes().get(tree.module_scope());
    let exported = |name: &str| {
        let id = module.bindings[name][0];
        tree.ident(id)
            .and_then(|i| i.binding())
            .is_some_and(|b| b.exported)
    };
    assert!(exported("a"));
    assert!(exported("b"));
    assert!(!exported("c"));
}

#[test]
fn object_literal_shorthand_is_a_reference() {
    let tree = js("const o = { a, b: c, [d]: 1, get e() { return f; }, ...g };\n");
    assert_eq!(reference_names(&tree), vec!["a", "c", "d", "f", "g"]);
}

#[test]
fn syntax_errors_are_reported_with_positions() {
    let err = parse("function (", Dialect::javascript()).unwrap_err();
    assert_eq!(err.line, 1);

    let err = parse("const a = 1;\nconst b = {;\n", Dialect::javascript()).unwrap_err();
    assert_eq!(err.line, 2);

    assert!(parse("<div>", Dialect::javascript()).is_err());
    assert!(parse("`unterminated", Dialect::javascript()).is_err());
}

#[test]
fn deep_nesting_fails_cleanly() {
    let src = format!("x = {}1{};", "(".repeat(5000), ")".repeat(5000));
    assert!(parse(&src, Dialect::javascript()).is_err());
}
