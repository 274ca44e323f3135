//! Plan and fix pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: the report, source reads and writes
//! all go through the port traits.

use crate::ports::{DiagnosticSource, ReadPort, WritePort};
use crate::settings::RunSettings;
use anyhow::Context;
use camino::Utf8Path;
use chrono::Utc;
use jsmend_domain::Classifier;
use jsmend_edit::{MutateOptions, backup_path, render_patch, repair_source, sha256_hex};
use jsmend_render::render_run_md;
use jsmend_types::plan::{FixPlan, PlanDocument};
use jsmend_types::report::{FileReport, FileStatus, FixStatus, RunReport, RunSummary, ToolInfo};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Worker stack size. The parser recurses once per nesting level.
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

/// Error type for pipeline results. Exit code 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("{0:#}")]
    Fatal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::Fatal(_) => 1,
        }
    }
}

/// Load the report and classify every file's diagnostics. Touches no sources
/// beyond the existence checks done by intake.
pub fn run_plan(
    settings: &RunSettings,
    source: &dyn DiagnosticSource,
    tool: ToolInfo,
) -> Result<PlanDocument, ToolError> {
    let intake = source
        .load(&settings.intake_options())
        .context("load diagnostic report")?;

    let classifier = Classifier::new(settings.classifier.clone());
    let plans = classifier.plan_all(&intake.diagnostics);
    info!(
        files = plans.len(),
        fixes = plans.iter().map(|p| p.fixes.len()).sum::<usize>(),
        "planned fixes"
    );

    Ok(PlanDocument::new(tool, intake.stats, plans))
}

/// Outcome of `run_fix`.
#[derive(Debug, Clone)]
pub struct FixRun {
    pub report: RunReport,
    /// Unified diff of every changed file, in path order.
    pub patch: String,
}

impl FixRun {
    pub fn has_failures(&self) -> bool {
        self.report.files.iter().any(|f| f.status.is_failure())
    }
}

/// Run the fix pipeline: plan, then read, repair and write each file with a
/// non-empty plan. Per-file failures are recorded, never propagated.
pub fn run_fix(
    settings: &RunSettings,
    source: &dyn DiagnosticSource,
    reader: &dyn ReadPort,
    writer: &dyn WritePort,
    tool: ToolInfo,
) -> Result<FixRun, ToolError> {
    let started_at = Utc::now();
    let intake = source
        .load(&settings.intake_options())
        .context("load diagnostic report")?;

    let classifier = Classifier::new(settings.classifier.clone());
    let plans: Vec<FixPlan> = classifier
        .plan_all(&intake.diagnostics)
        .into_iter()
        .filter(|plan| !plan.is_empty())
        .collect();
    debug!(files = plans.len(), "files with applicable fixes");

    let options = settings.mutate_options();
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(settings.jobs)
        .stack_size(WORKER_STACK_SIZE)
        .build()
        .context("build worker pool")?;

    let mut files: Vec<FileRun> = pool.install(|| {
        plans
            .par_iter()
            .map(|plan| fix_file(settings, plan, &options, reader, writer))
            .collect()
    });
    files.sort_by(|a, b| a.report.path.cmp(&b.report.path));

    let mut report = RunReport::new(tool, settings.dry_run);
    report.intake = intake.stats;
    report.summary = summarize(plans.len(), &files);
    report.started_at = Some(started_at);

    let mut patch = String::new();
    for file in files {
        patch.push_str(&file.patch);
        report.files.push(file.report);
    }
    report.ended_at = Some(Utc::now());

    let s = &report.summary;
    info!(
        touched = s.touched_files,
        changed = s.changed_files,
        parse_failures = s.parse_failures,
        io_failures = s.io_failures,
        panicked = s.panicked,
        dry_run = settings.dry_run,
        "fix run complete"
    );

    Ok(FixRun { report, patch })
}

/// Write the requested run artifacts: JSON report, markdown summary, patch.
pub fn write_run_artifacts(
    run: &FixRun,
    settings: &RunSettings,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    if let Some(path) = &settings.report_out {
        let json = serde_json::to_string_pretty(&run.report).context("serialize run report")?;
        writer.write_file(path, json.as_bytes())?;
    }
    if let Some(path) = &settings.summary_out {
        writer.write_file(path, render_run_md(&run.report).as_bytes())?;
    }
    if let Some(path) = &settings.patch_out {
        writer.write_file(path, run.patch.as_bytes())?;
    }
    Ok(())
}

struct FileRun {
    report: FileReport,
    patch: String,
}

impl FileRun {
    fn done(report: FileReport) -> Self {
        Self {
            report,
            patch: String::new(),
        }
    }

    fn failed(mut report: FileReport, status: FileStatus, message: String) -> Self {
        warn!(path = %report.path, status = status.as_str(), %message, "file not repaired");
        report.status = status;
        report.message = Some(message);
        Self::done(report)
    }
}

fn fix_file(
    settings: &RunSettings,
    plan: &FixPlan,
    options: &MutateOptions,
    reader: &dyn ReadPort,
    writer: &dyn WritePort,
) -> FileRun {
    let rel = plan.file_path.as_path();
    let abs = settings.repo_root.join(rel);
    let mut report = FileReport {
        path: rel.to_string(),
        status: FileStatus::Unchanged,
        message: None,
        sha256_before: None,
        sha256_after: None,
        backup_path: None,
        fixes: vec![],
    };

    let original = match reader.read_to_string(&abs) {
        Ok(text) => text,
        Err(err) => return FileRun::failed(report, FileStatus::ReadFailed, format!("{err:#}")),
    };
    let sha_before = sha256_hex(original.as_bytes());
    report.sha256_before = Some(sha_before.clone());

    let repaired = match panic::catch_unwind(AssertUnwindSafe(|| {
        repair_source(rel, &original, plan, options)
    })) {
        Ok(Ok(repaired)) => repaired,
        Ok(Err(err)) => {
            return FileRun::failed(report, FileStatus::ParseFailed, err.to_string());
        }
        Err(payload) => {
            let message = format!("repair panicked: {}", panic_message(payload.as_ref()));
            return FileRun::failed(report, FileStatus::Panicked, message);
        }
    };
    report.fixes = repaired.outcomes;

    if !repaired.changed {
        debug!(path = %rel, "no change");
        return FileRun::done(report);
    }

    let patch = render_patch(rel, &original, &repaired.output);
    report.sha256_after = Some(sha256_hex(repaired.output.as_bytes()));

    if !settings.dry_run {
        let write = GuardedWrite {
            abs: &abs,
            rel,
            original: &original,
            sha_before: &sha_before,
            output: &repaired.output,
        };
        match write.run(settings, reader, writer) {
            Ok(backup) => report.backup_path = backup,
            Err((status, message)) => return FileRun::failed(report, status, message),
        }
    }

    report.status = FileStatus::Changed;
    FileRun { report, patch }
}

struct GuardedWrite<'a> {
    abs: &'a Utf8Path,
    rel: &'a Utf8Path,
    original: &'a str,
    sha_before: &'a str,
    output: &'a str,
}

impl GuardedWrite<'_> {
    /// Re-checks the hash captured at read time, writes the optional backup,
    /// then the new contents. Returns the backup path relative to the repo.
    fn run(
        &self,
        settings: &RunSettings,
        reader: &dyn ReadPort,
        writer: &dyn WritePort,
    ) -> Result<Option<String>, (FileStatus, String)> {
        let current = reader
            .read_to_string(self.abs)
            .map_err(|err| (FileStatus::ReadFailed, format!("{err:#}")))?;
        if sha256_hex(current.as_bytes()) != self.sha_before {
            return Err((
                FileStatus::PreconditionFailed,
                "file changed since it was read".to_string(),
            ));
        }

        let mut backup = None;
        if settings.backup_enabled {
            let path = backup_path(self.abs, &settings.backup_suffix);
            writer
                .write_file(&path, self.original.as_bytes())
                .map_err(|err| (FileStatus::WriteFailed, format!("backup: {err:#}")))?;
            backup = Some(backup_path(self.rel, &settings.backup_suffix).to_string());
        }

        writer
            .write_file(self.abs, self.output.as_bytes())
            .map_err(|err| (FileStatus::WriteFailed, format!("{err:#}")))?;
        debug!(path = %self.rel, "wrote repaired file");
        Ok(backup)
    }
}

fn summarize(touched: usize, files: &[FileRun]) -> RunSummary {
    let mut summary = RunSummary {
        touched_files: touched as u64,
        ..RunSummary::default()
    };
    for file in files {
        let report = &file.report;
        let applied = report
            .fixes
            .iter()
            .filter(|f| f.status == FixStatus::Applied)
            .count() as u64;
        let dropped = report.fixes.len() as u64 - applied;
        match report.status {
            FileStatus::Changed => {
                summary.changed_files += 1;
                summary.fixes_applied += applied;
                summary.fixes_dropped += dropped;
            }
            FileStatus::Unchanged => {
                summary.unchanged_files += 1;
                summary.fixes_dropped += dropped;
            }
            FileStatus::ParseFailed => summary.parse_failures += 1,
            FileStatus::ReadFailed | FileStatus::WriteFailed | FileStatus::PreconditionFailed => {
                summary.io_failures += 1
            }
            FileStatus::Panicked => summary.panicked += 1,
        }
    }
    summary
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
