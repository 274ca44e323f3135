//! Report loading against a scratch repository.

use camino::{Utf8Path, Utf8PathBuf};
use jsmend_diagnostics::{IntakeError, IntakeOptions, load_report};
use jsmend_types::diagnostic::RuleKind;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn create_repo() -> (TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    for file in ["src/App.jsx", "src/util.ts", "src/styles.css", "scripts/build.js"] {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "// source\n").unwrap();
    }
    (temp, root)
}

fn write_report(root: &Utf8Path, contents: &str) -> Utf8PathBuf {
    let path = root.join("eslint.json");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn eslint_output_is_grouped_by_relative_path() {
    let (_temp, root) = create_repo();
    let report = format!(
        r#"[
          {{
            "filePath": "{root}/src/App.jsx",
            "messages": [
              {{ "ruleId": "no-undef", "severity": 2, "message": "'setCount' is not defined.", "line": 4, "column": 3 }},
              {{ "ruleId": "no-unused-vars", "severity": 2, "message": "'temp' is assigned a value but never used.", "line": 2, "column": 9 }},
              {{ "ruleId": "react/prop-types", "severity": 2, "message": "'x' is missing in props validation", "line": 1, "column": 1 }},
              {{ "ruleId": "no-undef", "severity": 1, "message": "'warned' is not defined.", "line": 5, "column": 1 }}
            ]
          }},
          {{
            "filePath": "{root}/src/util.ts",
            "messages": [
              {{ "ruleId": "@typescript-eslint/no-unused-vars", "severity": 2, "message": "'unused' is defined but never used.", "line": 1, "column": 7 }}
            ]
          }}
        ]"#
    );
    let report_path = write_report(&root, &report);

    let intake = load_report(&report_path, &IntakeOptions::new(root.clone())).unwrap();

    let files: Vec<&str> = intake.diagnostics.keys().map(|p| p.as_str()).collect();
    assert_eq!(files, vec!["src/App.jsx", "src/util.ts"]);
    let app = &intake.diagnostics[Utf8Path::new("src/App.jsx")];
    assert_eq!(app.len(), 2);
    assert_eq!(app[0].rule_kind, RuleKind::UndeclaredReference);
    assert_eq!(app[0].symbol_name, "setCount");
    assert_eq!(app[1].symbol_name, "temp");

    assert_eq!(intake.stats.records_total, 5);
    assert_eq!(intake.stats.accepted, 3);
    assert_eq!(intake.stats.ignored_rule, 1);
    assert_eq!(intake.stats.below_severity, 1);
    assert_eq!(intake.diagnostic_count(), 3);
}

#[test]
fn flat_records_are_filtered_by_tree_extension_and_existence() {
    let (_temp, root) = create_repo();
    let report = r#"{
      "diagnostics": [
        { "filePath": "src/App.jsx", "ruleKind": "UndeclaredReference", "message": "'toast' is not defined.", "line": 3, "column": 5, "severity": "must_fix" },
        { "filePath": "scripts/build.js", "ruleKind": "UndeclaredReference", "message": "'x' is not defined.", "line": 1, "column": 1, "severity": "must_fix" },
        { "filePath": "src/styles.css", "ruleKind": "UnusedBinding", "message": "'y' is unused", "line": 1, "column": 1, "severity": "must_fix" },
        { "filePath": "src/Gone.jsx", "ruleKind": "UnusedBinding", "message": "'z' is unused", "line": 1, "column": 1, "severity": "must_fix" },
        { "filePath": "../outside.js", "ruleKind": "UnusedBinding", "message": "'w' is unused", "line": 1, "column": 1, "severity": "must_fix" },
        { "filePath": "src/App.jsx", "ruleKind": "UnusedBinding", "message": "no quotes here", "line": 1, "column": 1, "severity": "must_fix" },
        { "ruleKind": "UnusedBinding", "message": "'v' is unused", "line": 1, "column": 1, "severity": "must_fix" }
      ]
    }"#;
    let report_path = write_report(&root, report);

    let intake = load_report(&report_path, &IntakeOptions::new(root.clone())).unwrap();

    assert_eq!(intake.file_count(), 1);
    assert_eq!(intake.stats.records_total, 7);
    assert_eq!(intake.stats.accepted, 1);
    assert_eq!(intake.stats.outside_tree, 2);
    assert_eq!(intake.stats.unsupported_extension, 1);
    assert_eq!(intake.stats.missing_file, 1);
    assert_eq!(intake.stats.malformed, 2);
}

#[test]
fn whole_repo_source_root_accepts_scripts() {
    let (_temp, root) = create_repo();
    let report = r#"[
      { "filePath": "scripts/build.js", "ruleId": "no-undef", "message": "'process' is not defined.", "line": 1, "column": 1, "severity": 2 }
    ]"#;
    let report_path = write_report(&root, report);
    let options = IntakeOptions {
        source_root: Utf8PathBuf::from("."),
        ..IntakeOptions::new(root.clone())
    };

    let intake = load_report(&report_path, &options).unwrap();
    assert_eq!(intake.stats.accepted, 1);
}

#[test]
fn missing_report_is_fatal() {
    let (_temp, root) = create_repo();
    let err = load_report(&root.join("nope.json"), &IntakeOptions::new(root.clone())).unwrap_err();
    assert!(matches!(err, IntakeError::Io { .. }));
}

#[test]
fn invalid_json_is_fatal() {
    let (_temp, root) = create_repo();
    let report_path = write_report(&root, "{ not json");
    let err = load_report(&report_path, &IntakeOptions::new(root.clone())).unwrap_err();
    assert!(matches!(err, IntakeError::Json { .. }));
    assert!(err.to_string().contains("eslint.json"));
}

#[test]
fn unexpected_document_shape_is_fatal() {
    let (_temp, root) = create_repo();
    let report_path = write_report(&root, r#"{ "results": 3 }"#);
    let err = load_report(&report_path, &IntakeOptions::new(root.clone())).unwrap_err();
    assert_eq!(err, IntakeError::Shape);
}

#[test]
fn exclude_patterns_skip_matching_files() {
    let (_temp, root) = create_repo();
    let generated = root.join("src/generated/api.ts");
    fs::create_dir_all(generated.parent().unwrap()).unwrap();
    fs::write(&generated, "// generated\n").unwrap();
    let report = r#"[
      { "filePath": "src/generated/api.ts", "ruleId": "no-undef", "message": "'a' is not defined.", "line": 1, "column": 1, "severity": 2 },
      { "filePath": "src/util.ts", "ruleId": "no-undef", "message": "'b' is not defined.", "line": 1, "column": 1, "severity": 2 },
      { "filePath": "src/App.jsx", "ruleId": "no-undef", "message": "'c' is not defined.", "line": 1, "column": 1, "severity": 2 }
    ]"#;
    let report_path = write_report(&root, report);
    let options = IntakeOptions {
        exclude: vec!["src/generated/**".into(), "src/*.ts".into()],
        ..IntakeOptions::new(root.clone())
    };

    let intake = load_report(&report_path, &options).unwrap();

    assert_eq!(intake.stats.excluded, 2);
    assert_eq!(intake.stats.accepted, 1);
    let files: Vec<&str> = intake.diagnostics.keys().map(|p| p.as_str()).collect();
    assert_eq!(files, vec!["src/App.jsx"]);
}

#[test]
fn single_star_stays_in_one_directory() {
    let (_temp, root) = create_repo();
    let nested = root.join("src/deep/util.ts");
    fs::create_dir_all(nested.parent().unwrap()).unwrap();
    fs::write(&nested, "// nested\n").unwrap();
    let report = r#"[
      { "filePath": "src/deep/util.ts", "ruleId": "no-undef", "message": "'a' is not defined.", "line": 1, "column": 1, "severity": 2 }
    ]"#;
    let report_path = write_report(&root, report);
    let options = IntakeOptions {
        exclude: vec!["src/*.ts".into()],
        ..IntakeOptions::new(root.clone())
    };

    let intake = load_report(&report_path, &options).unwrap();
    assert_eq!(intake.stats.excluded, 0);
    assert_eq!(intake.stats.accepted, 1);
}

#[test]
fn invalid_exclude_pattern_is_fatal() {
    let (_temp, root) = create_repo();
    let report_path = write_report(&root, "[]");
    let options = IntakeOptions {
        exclude: vec!["src/[".into()],
        ..IntakeOptions::new(root.clone())
    };
    let err = load_report(&report_path, &options).unwrap_err();
    assert!(matches!(err, IntakeError::Pattern { .. }));
}
