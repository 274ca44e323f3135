//! End-to-end runs of the plan and fix pipelines against scratch repositories.

use anyhow::anyhow;
use camino::{Utf8Path, Utf8PathBuf};
use jsmend_core::adapters::{
    FsDiagnosticSource, FsReadPort, FsWritePort, InMemoryDiagnosticSource, MemoryWritePort,
};
use jsmend_core::pipeline::{run_fix, run_plan, write_run_artifacts};
use jsmend_core::ports::ReadPort;
use jsmend_core::settings::RunSettings;
use jsmend_syntax::globals::is_known_global;
use jsmend_syntax::{Dialect, parse};
use jsmend_types::plan::Fix;
use jsmend_types::report::{FileStatus, FixStatus, ToolInfo};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const NOTIFY: &str = r#"import React from "react";
import { Button } from "@/components/ui/button";

export default function Save() {
  return <Button onClick={() => toast("saved")}>Save</Button>;
}
"#;

const COUNTER: &str = r#"import { useEffect } from "react";

export function Counter() {
  useEffect(() => setCount(0), []);
  return <span>{count}</span>;
}
"#;

const ROW: &str = "import { format } from \"./fmt\";\n\nexport const Row = ({ item }) => {\n  const label = format(item);\n  return label;\n};\n\nfunction helper(value, temp) {\n  return value;\n}\n";

const LIST: &str = r#"export default function List({ rows }) {
  const ids = rows.map((item) => item.id);
  const reset = (setCount) => setCount(0);
  setCount(ids.length);
  return <p onClick={reset}>{item}{count}</p>;
}
"#;

const QUIET: &str = "import React from \"react\";\n\nexport const Quiet = () => null;\n";

fn tool() -> ToolInfo {
    ToolInfo {
        name: "jsmend".into(),
        version: Some("test".into()),
    }
}

fn create_repo(files: &[(&str, &str)]) -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    for (rel, contents) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
    }
    (temp, root)
}

fn message(rule: &str, text: &str, line: u32, column: u32) -> serde_json::Value {
    json!({ "ruleId": rule, "severity": 2, "message": text, "line": line, "column": column })
}

/// ESLint-shaped report covering the four canonical scenarios.
fn scenario_report() -> serde_json::Value {
    json!([
        { "filePath": "src/Save.jsx", "messages": [
            message("no-undef", "'toast' is not defined.", 5, 44),
        ]},
        { "filePath": "src/Counter.jsx", "messages": [
            message("no-undef", "'setCount' is not defined.", 4, 19),
            message("no-undef", "'count' is not defined.", 5, 17),
        ]},
        { "filePath": "src/Row.jsx", "messages": [
            message("no-unused-vars", "'temp' is defined but never used.", 8, 24),
        ]},
        { "filePath": "src/Quiet.jsx", "messages": [
            message("no-unused-vars", "'React' is defined but never used.", 1, 8),
        ]},
    ])
}

fn scenario_repo() -> (TempDir, Utf8PathBuf) {
    create_repo(&[
        ("src/Save.jsx", NOTIFY),
        ("src/Counter.jsx", COUNTER),
        ("src/Row.jsx", ROW),
        ("src/Quiet.jsx", QUIET),
    ])
}

fn settings(root: &Utf8Path) -> RunSettings {
    RunSettings {
        repo_root: root.to_path_buf(),
        ..RunSettings::default()
    }
}

fn read(root: &Utf8Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

#[test]
fn scenarios_are_repaired_on_disk() {
    let (_temp, root) = scenario_repo();
    let source = InMemoryDiagnosticSource::new(scenario_report());

    let run = run_fix(&settings(&root), &source, &FsReadPort, &FsWritePort, tool()).unwrap();

    // A: one new import from the notification module, others untouched.
    assert_eq!(
        read(&root, "src/Save.jsx"),
        NOTIFY.replace(
            "button\";\n",
            "button\";\nimport { toast } from \"sonner\";\n"
        )
    );
    // B: the component body opens with the state pair.
    assert_eq!(
        read(&root, "src/Counter.jsx"),
        r#"import { useEffect, useState } from "react";

export function Counter() {
  const [count, setCount] = useState(null);
  useEffect(() => setCount(0), []);
  return <span>{count}</span>;
}
"#
    );
    // C: only the parameter binding is renamed.
    assert_eq!(
        read(&root, "src/Row.jsx"),
        ROW.replace("(value, temp)", "(value, _temp)")
    );
    // D: exempt-only file is left alone.
    assert_eq!(read(&root, "src/Quiet.jsx"), QUIET);

    let summary = &run.report.summary;
    assert_eq!(summary.touched_files, 3);
    assert_eq!(summary.changed_files, 3);
    assert_eq!(summary.unchanged_files, 0);
    assert_eq!(summary.fixes_applied, 4);
    assert_eq!(summary.fixes_dropped, 0);
    assert!(!run.has_failures());

    let paths: Vec<&str> = run.report.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["src/Counter.jsx", "src/Row.jsx", "src/Save.jsx"]);
    assert_eq!(run.report.intake.accepted, 5);
    assert!(run.patch.contains("diff --git a/src/Row.jsx b/src/Row.jsx"));
}

#[test]
fn second_run_changes_nothing() {
    let (_temp, root) = scenario_repo();
    let source = InMemoryDiagnosticSource::new(scenario_report());
    run_fix(&settings(&root), &source, &FsReadPort, &FsWritePort, tool()).unwrap();

    let writer = MemoryWritePort::new();
    let run = run_fix(&settings(&root), &source, &FsReadPort, &writer, tool()).unwrap();

    assert!(writer.written().is_empty());
    assert_eq!(run.report.summary.changed_files, 0);
    assert_eq!(run.report.summary.unchanged_files, 3);
    assert_eq!(run.patch, "");
}

/// No-undef report for the current contents of `files`, as a linter would
/// produce it from the repaired tree.
fn undeclared_report(root: &Utf8Path, files: &[&str]) -> serde_json::Value {
    let entries = files
        .iter()
        .map(|rel| {
            let source = read(root, rel);
            let dialect = Dialect::from_path(Utf8Path::new(rel)).unwrap();
            let tree = parse(&source, dialect).unwrap();
            let messages: Vec<serde_json::Value> = tree
                .references()
                .iter()
                .filter_map(|id| {
                    let node = tree.node(*id);
                    let name = tree.name_of(*id)?;
                    if tree.scopes().resolve(node.scope, name).is_some() || is_known_global(name) {
                        return None;
                    }
                    let (line, column) = tree.position(node.span.start);
                    Some(message(
                        "no-undef",
                        &format!("'{name}' is not defined."),
                        line,
                        column + 1,
                    ))
                })
                .collect();
            json!({ "filePath": rel, "messages": messages })
        })
        .collect();
    serde_json::Value::Array(entries)
}

#[test]
fn regenerated_report_after_a_run_changes_nothing() {
    let files = ["src/Counter.jsx", "src/List.jsx", "src/Save.jsx"];
    let (_temp, root) = create_repo(&[
        ("src/Counter.jsx", COUNTER),
        ("src/List.jsx", LIST),
        ("src/Save.jsx", NOTIFY),
    ]);

    let first = InMemoryDiagnosticSource::new(undeclared_report(&root, &files));
    let run = run_fix(&settings(&root), &first, &FsReadPort, &FsWritePort, tool()).unwrap();
    assert_eq!(run.report.summary.changed_files, 3);

    // Shadowed names in nested callbacks keep their own spelling.
    let list = read(&root, "src/List.jsx");
    assert!(list.contains("  const [count, setCount] = useState(null);\n"));
    assert!(list.contains("  let item = null;\n"));
    assert!(!list.contains("item_1"));
    assert!(!list.contains("setCount_1"));

    let second = undeclared_report(&root, &files);
    for entry in second.as_array().unwrap() {
        assert_eq!(entry["messages"], json!([]), "{}", entry["filePath"]);
    }

    let writer = MemoryWritePort::new();
    let source = InMemoryDiagnosticSource::new(second);
    let run = run_fix(&settings(&root), &source, &FsReadPort, &writer, tool()).unwrap();
    assert!(writer.written().is_empty());
    assert_eq!(run.report.summary.changed_files, 0);
    assert_eq!(run.patch, "");
}

#[test]
fn files_without_applicable_fixes_are_never_written() {
    let (_temp, root) = scenario_repo();
    let source = InMemoryDiagnosticSource::new(scenario_report());
    let writer = MemoryWritePort::new();

    run_fix(&settings(&root), &source, &FsReadPort, &writer, tool()).unwrap();

    let written: Vec<Utf8PathBuf> = writer.written().into_keys().collect();
    assert_eq!(
        written,
        vec![
            root.join("src/Counter.jsx"),
            root.join("src/Row.jsx"),
            root.join("src/Save.jsx"),
        ]
    );
}

#[test]
fn dry_run_reports_a_patch_without_writing() {
    let (_temp, root) = scenario_repo();
    let source = InMemoryDiagnosticSource::new(scenario_report());
    let settings = RunSettings {
        dry_run: true,
        ..settings(&root)
    };

    let run = run_fix(&settings, &source, &FsReadPort, &FsWritePort, tool()).unwrap();

    assert!(run.report.dry_run);
    assert_eq!(run.report.summary.changed_files, 3);
    assert_eq!(read(&root, "src/Row.jsx"), ROW);
    assert!(run.patch.contains("-function helper(value, temp) {"));
    assert!(run.patch.contains("+function helper(value, _temp) {"));
    assert!(run.patch.contains("+import { toast } from \"sonner\";"));
}

#[test]
fn parse_failures_are_counted_and_the_batch_continues() {
    let (_temp, root) = create_repo(&[
        ("src/Broken.jsx", "export function Broken() {\n  return <div>;\n}\n"),
        ("src/Row.jsx", ROW),
    ]);
    let source = InMemoryDiagnosticSource::new(json!([
        { "filePath": "src/Broken.jsx", "messages": [
            message("no-undef", "'toast' is not defined.", 2, 3),
        ]},
        { "filePath": "src/Row.jsx", "messages": [
            message("no-unused-vars", "'temp' is defined but never used.", 8, 24),
        ]},
    ]));

    let run = run_fix(&settings(&root), &source, &FsReadPort, &FsWritePort, tool()).unwrap();

    assert_eq!(run.report.summary.parse_failures, 1);
    assert_eq!(run.report.summary.changed_files, 1);
    assert!(run.has_failures());
    let broken = &run.report.files[0];
    assert_eq!(broken.path, "src/Broken.jsx");
    assert_eq!(broken.status, FileStatus::ParseFailed);
    assert!(broken.message.as_deref().unwrap_or("").contains("parse error"));
    assert_eq!(
        read(&root, "src/Broken.jsx"),
        "export function Broken() {\n  return <div>;\n}\n"
    );
}

/// Returns the real contents on the first read of each run and an edited
/// version afterwards, as if another process touched the file.
struct ShiftingReader {
    reads: AtomicUsize,
}

impl ReadPort for ShiftingReader {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        let text = fs::read_to_string(path).map_err(|e| anyhow!("{e}"))?;
        if self.reads.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(text)
        } else {
            Ok(format!("{text}// edited\n"))
        }
    }
}

#[test]
fn files_edited_mid_run_fail_the_precondition() {
    let (_temp, root) = create_repo(&[("src/Row.jsx", ROW)]);
    let source = InMemoryDiagnosticSource::new(json!([
        { "filePath": "src/Row.jsx", "messages": [
            message("no-unused-vars", "'temp' is defined but never used.", 8, 24),
        ]},
    ]));
    let reader = ShiftingReader {
        reads: AtomicUsize::new(0),
    };
    let writer = MemoryWritePort::new();

    let run = run_fix(&settings(&root), &source, &reader, &writer, tool()).unwrap();

    assert!(writer.written().is_empty());
    assert_eq!(run.report.files[0].status, FileStatus::PreconditionFailed);
    assert_eq!(run.report.summary.io_failures, 1);
    assert_eq!(run.report.summary.fixes_applied, 0);
    assert_eq!(run.patch, "");
}

#[test]
fn backups_keep_the_original_text() {
    let (_temp, root) = create_repo(&[("src/Row.jsx", ROW)]);
    let source = InMemoryDiagnosticSource::new(json!([
        { "filePath": "src/Row.jsx", "messages": [
            message("no-unused-vars", "'temp' is defined but never used.", 8, 24),
        ]},
    ]));
    let settings = RunSettings {
        backup_enabled: true,
        ..settings(&root)
    };

    let run = run_fix(&settings, &source, &FsReadPort, &FsWritePort, tool()).unwrap();

    assert_eq!(read(&root, "src/Row.jsx.jsmend.bak"), ROW);
    let file = &run.report.files[0];
    assert_eq!(file.backup_path.as_deref(), Some("src/Row.jsx.jsmend.bak"));
    assert_ne!(file.sha256_before, file.sha256_after);
    assert!(file.fixes.iter().all(|f| f.status == FixStatus::Applied));
}

#[test]
fn stale_renames_are_dropped_without_writing() {
    let src = "function helper(value, temp) {\n  return value + temp;\n}\n";
    let (_temp, root) = create_repo(&[("src/helper.js", src)]);
    let source = InMemoryDiagnosticSource::new(json!([
        { "filePath": "src/helper.js", "messages": [
            message("no-unused-vars", "'temp' is defined but never used.", 1, 24),
        ]},
    ]));

    let run = run_fix(&settings(&root), &source, &FsReadPort, &FsWritePort, tool()).unwrap();

    assert_eq!(read(&root, "src/helper.js"), src);
    assert_eq!(run.report.files[0].status, FileStatus::Unchanged);
    assert_eq!(run.report.summary.fixes_dropped, 1);
    assert!(
        run.report.files[0].fixes[0]
            .reason
            .as_deref()
            .unwrap_or("")
            .contains("referenced")
    );
}

#[test]
fn unreadable_report_is_fatal() {
    let (_temp, root) = create_repo(&[]);
    let source = FsDiagnosticSource::new(root.join("missing.json"));

    let err = run_fix(&settings(&root), &source, &FsReadPort, &FsWritePort, tool()).unwrap_err();

    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("load diagnostic report"));
}

#[test]
fn plan_lists_fixes_per_file_without_touching_sources() {
    let (_temp, root) = scenario_repo();
    let report_path = root.join("eslint.json");
    fs::write(&report_path, scenario_report().to_string()).unwrap();
    let source = FsDiagnosticSource::new(report_path);

    let doc = run_plan(&settings(&root), &source, tool()).unwrap();

    assert_eq!(doc.schema, "jsmend.plan.v1");
    assert_eq!(doc.intake.records_total, 5);
    let paths: Vec<&str> = doc.plans.iter().map(|p| p.file_path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["src/Counter.jsx", "src/Quiet.jsx", "src/Row.jsx", "src/Save.jsx"]
    );
    assert!(doc.plans[1].is_empty());
    assert!(doc.plans[3].fixes.iter().any(|f| matches!(
        &f.fix,
        Fix::ImportMerge { module, .. } if module == "sonner"
    )));
    assert_eq!(read(&root, "src/Save.jsx"), NOTIFY);
}

#[test]
fn run_artifacts_are_written_where_requested() {
    let (_temp, root) = scenario_repo();
    let out = root.join("out");
    let settings = RunSettings {
        dry_run: true,
        report_out: Some(out.join("report.json")),
        summary_out: Some(out.join("summary.md")),
        patch_out: Some(out.join("fix.patch")),
        ..settings(&root)
    };
    let source = InMemoryDiagnosticSource::new(scenario_report());

    let run = run_fix(&settings, &source, &FsReadPort, &FsWritePort, tool()).unwrap();
    write_run_artifacts(&run, &settings, &FsWritePort).unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&read(&out, "report.json")).unwrap();
    assert_eq!(report["schema"], "jsmend.report.v1");
    assert_eq!(report["summary"]["changed_files"], 3);
    assert!(read(&out, "summary.md").starts_with("# jsmend"));
    assert_eq!(read(&out, "fix.patch"), run.patch);
}
