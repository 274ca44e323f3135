//! End-to-end repairs of source text through `repair_source`.

use camino::Utf8Path;
use jsmend_edit::{MutateOptions, RepairError, repair_source};
use jsmend_types::diagnostic::LocationKey;
use jsmend_types::plan::{Fix, FixPlan};
use jsmend_types::report::FixStatus;
use pretty_assertions::assert_eq;
use std::collections::BTreeSet;

fn plan(path: &str, fixes: Vec<Fix>) -> FixPlan {
    let mut plan = FixPlan::new(path.into());
    for fix in fixes {
        plan.push(fix);
    }
    plan
}

fn names(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn repair(path: &str, src: &str, fixes: Vec<Fix>) -> jsmend_edit::Repaired {
    repair_source(
        Utf8Path::new(path),
        src,
        &plan(path, fixes),
        &MutateOptions::default(),
    )
    .unwrap()
}

#[test]
fn notification_import_is_added_once() {
    let src = r#"import React from "react";
import { Button } from "@/components/ui/button";

export default function Save() {
  return <Button onClick={() => toast("saved")}>Save</Button>;
}
"#;
    let fix = Fix::ImportMerge {
        module: "sonner".into(),
        names: names(&["toast"]),
        only_if_imported: false,
    };
    let repaired = repair("src/Save.jsx", src, vec![fix.clone()]);
    assert!(repaired.changed);
    assert_eq!(
        repaired.output,
        r#"import React from "react";
import { Button } from "@/components/ui/button";
import { toast } from "sonner";

export default function Save() {
  return <Button onClick={() => toast("saved")}>Save</Button>;
}
"#
    );

    let again = repair("src/Save.jsx", &repaired.output, vec![fix]);
    assert!(!again.changed);
    assert_eq!(again.output, repaired.output);
}

#[test]
fn state_pair_opens_the_component_body() {
    let src = r#"import { useEffect } from "react";

export function Counter() {
  useEffect(() => setCount(0), []);
  return <span>{count}</span>;
}
"#;
    let fixes = vec![
        Fix::ImportMerge {
            module: "react".into(),
            names: names(&["useState"]),
            only_if_imported: false,
        },
        Fix::PairedDeclaration {
            value_name: "count".into(),
            setter_name: "setCount".into(),
        },
    ];
    let repaired = repair("src/Counter.jsx", src, fixes.clone());
    assert_eq!(
        repaired.output,
        r#"import { useEffect, useState } from "react";

export function Counter() {
  const [count, setCount] = useState(null);
  useEffect(() => setCount(0), []);
  return <span>{count}</span>;
}
"#
    );
    assert_eq!(repaired.applied(), 2);

    let again = repair("src/Counter.jsx", &repaired.output, fixes);
    assert!(!again.changed);
    assert_eq!(again.dropped(), 2);
}

#[test]
fn unused_parameter_is_prefixed() {
    let src = "import { format } from \"./fmt\";\n\nexport const Row = ({ item }) => {\n  const label = format(item);\n  return label;\n};\n\nfunction helper(value, temp) {\n  return value;\n}\n";
    let repaired = repair(
        "src/Row.jsx",
        src,
        vec![Fix::Rename {
            at: LocationKey::from_one_based(8, 24),
            name: "temp".into(),
        }],
    );
    assert_eq!(
        repaired.output,
        src.replace("(value, temp)", "(value, _temp)")
    );

    let again = repair(
        "src/Row.jsx",
        &repaired.output,
        vec![Fix::Rename {
            at: LocationKey::from_one_based(8, 24),
            name: "temp".into(),
        }],
    );
    assert!(!again.changed);
}

#[test]
fn only_the_binding_occurrence_is_renamed() {
    let src = "function List({ items, temp }) {\n  const other = { temp: 1 };\n  return items.map((x) => x.temp);\n}\n";
    let repaired = repair(
        "src/List.jsx",
        src,
        vec![Fix::Rename {
            at: LocationKey::from_one_based(1, 24),
            name: "temp".into(),
        }],
    );
    assert_eq!(
        repaired.output,
        "function List({ items, temp: _temp }) {\n  const other = { temp: 1 };\n  return items.map((x) => x.temp);\n}\n"
    );
}

#[test]
fn dropped_fixes_leave_the_text_alone() {
    let src = "export function App() {\n  return temp;\n}\n";
    let repaired = repair(
        "src/App.jsx",
        src,
        vec![Fix::Rename {
            at: LocationKey::from_one_based(2, 10),
            name: "temp".into(),
        }],
    );
    assert!(!repaired.changed);
    assert_eq!(repaired.output, src);
    assert_eq!(repaired.outcomes[0].status, FixStatus::Dropped);
}

#[test]
fn typescript_components_are_repaired() {
    let src = "import type { FC } from \"react\";\n\ninterface Props { title: string }\n\nexport const Card: FC<Props> = ({ title }: Props) => {\n  return <h1>{title ?? user}</h1>;\n};\n";
    let repaired = repair(
        "src/Card.tsx",
        src,
        vec![
            Fix::ImportMerge {
                module: "react".into(),
                names: names(&["useState"]),
                only_if_imported: false,
            },
            Fix::SingleDeclaration {
                name: "user".into(),
            },
        ],
    );
    assert_eq!(
        repaired.output,
        "import type { FC } from \"react\";\nimport { useState } from \"react\";\n\ninterface Props { title: string }\n\nexport const Card: FC<Props> = ({ title }: Props) => {\n  let user = null;\n  return <h1>{title ?? user}</h1>;\n};\n"
    );
}

#[test]
fn parse_failures_are_reported() {
    let err = repair_source(
        Utf8Path::new("src/Broken.jsx"),
        "function (",
        &plan("src/Broken.jsx", vec![]),
        &MutateOptions::default(),
    )
    .unwrap_err();
    assert!(err.is_parse_failure());

    let err = repair_source(
        Utf8Path::new("src/styles.css"),
        "a {}",
        &plan("src/styles.css", vec![]),
        &MutateOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, RepairError::UnsupportedFile { .. }));
}

#[test]
fn nested_shadows_do_not_rename_a_placeholder() {
    let src = "function App() {\n  const ids = rows.map((item) => item.id);\n  return item;\n}\n";
    let fix = Fix::SingleDeclaration {
        name: "item".into(),
    };
    let repaired = repair("src/App.jsx", src, vec![fix.clone()]);
    assert_eq!(
        repaired.output,
        "function App() {\n  let item = null;\n  const ids = rows.map((item) => item.id);\n  return item;\n}\n"
    );
    assert_eq!(repaired.outcomes[0].names, vec!["item".to_string()]);

    let again = repair("src/App.jsx", &repaired.output, vec![fix]);
    assert!(!again.changed);
    assert_eq!(again.output, repaired.output);
}

#[test]
fn nested_setter_parameter_does_not_suffix_the_pair() {
    let src = "function Counter() {\n  const reset = (setCount) => setCount(0);\n  setCount(1);\n  return count;\n}\n";
    let fix = Fix::PairedDeclaration {
        value_name: "count".into(),
        setter_name: "setCount".into(),
    };
    let repaired = repair("src/Counter.jsx", src, vec![fix.clone()]);
    assert_eq!(
        repaired.output,
        "function Counter() {\n  const [count, setCount] = useState(null);\n  const reset = (setCount) => setCount(0);\n  setCount(1);\n  return count;\n}\n"
    );

    let again = repair("src/Counter.jsx", &repaired.output, vec![fix]);
    assert!(!again.changed);
}

#[test]
fn setter_without_an_identifier_value_is_dropped() {
    let src = "function App() {\n  return set1(2);\n}\n";
    let repaired = repair(
        "src/App.jsx",
        src,
        vec![Fix::PairedDeclaration {
            value_name: "1".into(),
            setter_name: "set1".into(),
        }],
    );
    assert!(!repaired.changed);
    assert_eq!(
        repaired.outcomes[0].reason.as_deref(),
        Some("'1' is not an identifier")
    );
}
