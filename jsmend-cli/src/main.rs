mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{CliOverrides, ConfigMerger};
use fs_err as fs;
use jsmend_core::adapters::{FsDiagnosticSource, FsReadPort, FsWritePort};
use jsmend_core::pipeline::{ToolError, run_fix, run_plan, write_run_artifacts};
use jsmend_core::settings::RunSettings;
use jsmend_render::render_plan_md;
use jsmend_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "jsmend",
    version,
    about = "Repairs unused and undeclared bindings in JavaScript and TypeScript sources from an ESLint report."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Repair the files named in the report and write the ones that change.
    Fix(FixArgs),
    /// Print the per-file fix plans without reading or writing sources.
    Plan(PlanArgs),
}

#[derive(Debug, clap::Args)]
struct CommonArgs {
    /// Diagnostic report (ESLint `--format json` output or a flat record list).
    #[arg(long)]
    report: Utf8PathBuf,

    /// Repository root (default: current directory).
    #[arg(long, default_value = ".")]
    repo_root: Utf8PathBuf,

    /// Managed source tree, relative to the repository root (default: src).
    #[arg(long)]
    source_root: Option<Utf8PathBuf>,

    /// File extension to repair; repeat for several (default: all JS/TS extensions).
    #[arg(long = "ext")]
    extensions: Vec<String>,

    /// Glob over repo-relative paths to leave alone; repeat for several.
    #[arg(long)]
    exclude: Vec<String>,

    /// Config file (default: <repo_root>/jsmend.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct FixArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Compute fixes and print the patch without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Worker threads (default: one per core).
    #[arg(long, env = "JSMEND_JOBS")]
    jobs: Option<usize>,

    /// Keep a copy of every file before overwriting it.
    #[arg(long, default_value_t = false)]
    backup: bool,

    /// Write the JSON run report here.
    #[arg(long)]
    report_json: Option<Utf8PathBuf>,

    /// Write a markdown run summary here.
    #[arg(long)]
    summary_md: Option<Utf8PathBuf>,

    /// Write the unified diff of all changes here.
    #[arg(long)]
    patch: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct PlanArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Output format (json, md).
    #[arg(long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Write the plan here instead of stdout.
    #[arg(long)]
    out: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Md,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.cmd {
        Command::Fix(args) => cmd_fix(args),
        Command::Plan(args) => cmd_plan(args),
    };
    match result {
        Ok(()) => ExitCode::from(0),
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}

fn cmd_fix(args: FixArgs) -> Result<(), ToolError> {
    let (settings, report) = settings_for(
        &args.common,
        CliOverrides {
            source_root: args.common.source_root.clone(),
            extensions: args.common.extensions.clone(),
            exclude: args.common.exclude.clone(),
            jobs: args.jobs,
            backup: args.backup,
            dry_run: args.dry_run,
            report_out: args.report_json,
            summary_out: args.summary_md,
            patch_out: args.patch,
        },
    )?;

    let source = FsDiagnosticSource::new(report);
    let run = run_fix(&settings, &source, &FsReadPort, &FsWritePort, tool_info())?;
    write_run_artifacts(&run, &settings, &FsWritePort).context("write run artifacts")?;

    if settings.dry_run && settings.patch_out.is_none() {
        print!("{}", run.patch);
    }
    let s = &run.report.summary;
    println!(
        "{} {} of {} touched files ({} fixes applied, {} dropped, {} failed)",
        if settings.dry_run { "would change" } else { "changed" },
        s.changed_files,
        s.touched_files,
        s.fixes_applied,
        s.fixes_dropped,
        s.parse_failures + s.io_failures + s.panicked,
    );
    info!(repo_root = %settings.repo_root, "fix complete");
    Ok(())
}

fn cmd_plan(args: PlanArgs) -> Result<(), ToolError> {
    let (settings, report) = settings_for(
        &args.common,
        CliOverrides {
            source_root: args.common.source_root.clone(),
            extensions: args.common.extensions.clone(),
            exclude: args.common.exclude.clone(),
            ..CliOverrides::default()
        },
    )?;

    let source = FsDiagnosticSource::new(report);
    let doc = run_plan(&settings, &source, tool_info())?;

    let text = match args.format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&doc).context("serialize plan")?;
            json.push('\n');
            json
        }
        OutputFormat::Md => render_plan_md(&doc),
    };
    match &args.out {
        Some(path) => write_text(path, &text)?,
        None => print!("{text}"),
    }
    Ok(())
}

/// Resolves the repository root, loads the config and merges it with the CLI.
/// Returns the settings and the report path.
fn settings_for(
    common: &CommonArgs,
    cli: CliOverrides,
) -> Result<(RunSettings, Utf8PathBuf), ToolError> {
    // Absolute report paths are matched against the canonical root.
    let repo_root = common
        .repo_root
        .canonicalize_utf8()
        .with_context(|| format!("resolve repository root {}", common.repo_root))?;

    let file_config = config::load_or_default(&repo_root, common.config.as_deref())
        .context("load jsmend.toml config")?;
    let settings = ConfigMerger::new(file_config).merge(repo_root, cli);
    debug!(
        source_root = %settings.source_root,
        extensions = ?settings.extensions,
        jobs = settings.jobs,
        dry_run = settings.dry_run,
        "merged settings"
    );
    Ok((settings, common.report.clone()))
}

fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
    }
    fs::write(path, text).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "jsmend".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}
