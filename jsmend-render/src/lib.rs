//! Rendering helpers (markdown) for human-readable artifacts.

use jsmend_types::plan::{Fix, PlanDocument};
use jsmend_types::report::{FixStatus, RunReport};

pub fn render_plan_md(doc: &PlanDocument) -> String {
    let mut out = String::new();
    out.push_str("# jsmend plan\n\n");
    let planned: Vec<_> = doc.plans.iter().filter(|p| !p.is_empty()).collect();
    let fixes: usize = planned.iter().map(|p| p.fixes.len()).sum();
    out.push_str(&format!(
        "- Diagnostics: {} accepted of {}\n",
        doc.intake.accepted, doc.intake.records_total
    ));
    out.push_str(&format!("- Files with fixes: {}\n", planned.len()));
    out.push_str(&format!("- Fixes: {}\n\n", fixes));

    out.push_str("## Files\n\n");
    if planned.is_empty() {
        out.push_str("_No fixes planned._\n");
        return out;
    }

    for plan in planned {
        out.push_str(&format!("### `{}`\n\n", plan.file_path));
        for planned in &plan.fixes {
            out.push_str(&format!("- {}\n", describe(&planned.fix)));
        }
        out.push('\n');
    }
    out
}

pub fn render_run_md(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str("# jsmend run\n\n");
    if report.dry_run {
        out.push_str("_Dry run: no files were written._\n\n");
    }
    let s = &report.summary;
    out.push_str(&format!(
        "- Touched files: {}\n- Changed files: {}\n- Unchanged files: {}\n- Fixes applied: {}\n- Fixes dropped: {}\n",
        s.touched_files, s.changed_files, s.unchanged_files, s.fixes_applied, s.fixes_dropped
    ));
    if s.parse_failures + s.io_failures + s.panicked > 0 {
        out.push_str(&format!(
            "- Failures: {} parse, {} io, {} panicked\n",
            s.parse_failures, s.io_failures, s.panicked
        ));
    }
    out.push('\n');

    let i = &report.intake;
    out.push_str("## Intake\n\n");
    out.push_str("| records | accepted | malformed | ignored rule | below severity | outside tree | missing file | unsupported | excluded |\n");
    out.push_str("|---|---|---|---|---|---|---|---|---|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n\n",
        i.records_total,
        i.accepted,
        i.malformed,
        i.ignored_rule,
        i.below_severity,
        i.outside_tree,
        i.missing_file,
        i.unsupported_extension,
        i.excluded
    ));

    out.push_str("## Files\n\n");
    if report.files.is_empty() {
        out.push_str("_No files touched._\n");
        return out;
    }

    for file in &report.files {
        out.push_str(&format!(
            "### `{}` ({})\n\n",
            file.path,
            file.status.as_str()
        ));
        if let Some(msg) = &file.message {
            out.push_str(&format!("- Message: {}\n", msg));
        }
        if let (Some(before), Some(after)) = (&file.sha256_before, &file.sha256_after) {
            out.push_str(&format!("- sha256: {} → {}\n", short(before), short(after)));
        }
        for fix in &file.fixes {
            match fix.status {
                FixStatus::Applied => out.push_str(&format!(
                    "- `{}` applied: {}\n",
                    fix.kind,
                    fix.names.join(", ")
                )),
                FixStatus::Dropped => out.push_str(&format!(
                    "- `{}` dropped: {}\n",
                    fix.kind,
                    fix.reason.as_deref().unwrap_or("-")
                )),
            }
        }
        out.push('\n');
    }
    out
}

fn describe(fix: &Fix) -> String {
    match fix {
        Fix::Rename { at, name } => format!("rename `{name}` at {at}"),
        Fix::ImportMerge {
            module,
            names,
            only_if_imported,
        } => {
            let names = names.iter().cloned().collect::<Vec<_>>().join(", ");
            if *only_if_imported {
                format!("import `{names}` from `{module}` (only into an existing import)")
            } else {
                format!("import `{names}` from `{module}`")
            }
        }
        Fix::PairedDeclaration {
            value_name,
            setter_name,
        } => format!("declare state `[{value_name}, {setter_name}]`"),
        Fix::SingleDeclaration { name } => format!("declare `{name}`"),
    }
}

fn short(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}
