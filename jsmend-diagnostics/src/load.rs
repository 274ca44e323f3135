use crate::record::{self, Rejection};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::{MatchOptions, Pattern};
use jsmend_types::diagnostic::Diagnostic;
use jsmend_types::report::IntakeStats;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_SOURCE_ROOT: &str = "src";

pub const DEFAULT_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

/// Where diagnostics may point.
#[derive(Debug, Clone)]
pub struct IntakeOptions {
    /// Absolute paths in the report are made relative to this directory.
    pub repo_root: Utf8PathBuf,
    /// Managed source tree, relative to `repo_root`. Empty or `.` accepts the whole repo.
    pub source_root: Utf8PathBuf,
    /// Extensions (without the dot) of files jsmend may edit.
    pub extensions: Vec<String>,
    /// Glob patterns over repo-relative paths that are never edited. `*` stays
    /// within one directory; `**` crosses directories.
    pub exclude: Vec<String>,
}

impl Default for IntakeOptions {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            source_root: Utf8PathBuf::from(DEFAULT_SOURCE_ROOT),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
        }
    }
}

impl IntakeOptions {
    pub fn new(repo_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            ..Self::default()
        }
    }

    /// Repo-relative, lexically normalized form of `path` when it lies inside
    /// the managed source tree.
    pub fn managed_path(&self, path: &Utf8Path) -> Option<Utf8PathBuf> {
        let relative = if path.is_absolute() {
            path.strip_prefix(&self.repo_root).ok()?
        } else {
            path
        };
        let relative = normalize(relative)?;
        let source_root = normalize(&self.source_root)?;
        if source_root.as_str().is_empty() || relative.starts_with(&source_root) {
            Some(relative)
        } else {
            None
        }
    }

    fn exclude_patterns(&self) -> Result<Vec<Pattern>, IntakeError> {
        self.exclude
            .iter()
            .map(|raw| {
                Pattern::new(raw).map_err(|e| IntakeError::Pattern {
                    pattern: raw.clone(),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    pub fn supports_extension(&self, path: &Utf8Path) -> bool {
        path.extension()
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }
}

/// Lexical normalization. `None` for paths that climb out of their base.
fn normalize(path: &Utf8Path) -> Option<Utf8PathBuf> {
    let mut out = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::Normal(part) => out.push(part),
            Utf8Component::ParentDir | Utf8Component::RootDir | Utf8Component::Prefix(_) => {
                return None;
            }
        }
    }
    Some(out)
}

/// Accepted diagnostics grouped by repo-relative path.
#[derive(Debug, Clone, Default)]
pub struct Intake {
    pub diagnostics: BTreeMap<Utf8PathBuf, Vec<Diagnostic>>,
    pub stats: IntakeStats,
}

impl Intake {
    pub fn file_count(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn diagnostic_count(&self) -> usize {
        self.diagnostics.values().map(Vec::len).sum()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("cannot read diagnostic report {path}: {message}")]
    Io { path: Utf8PathBuf, message: String },

    #[error("diagnostic report {path} is not valid JSON: {message}")]
    Json { path: Utf8PathBuf, message: String },

    #[error("invalid exclude pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    #[error("diagnostic report has an unrecognized shape: expected an array of records or lint results")]
    Shape,
}

pub fn load_report(path: &Utf8Path, options: &IntakeOptions) -> Result<Intake, IntakeError> {
    debug!(path = %path, "loading diagnostic report");

    let text = fs::read_to_string(path).map_err(|e| IntakeError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|e| IntakeError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    intake_value(&value, options)
}

/// Validates, filters and groups every record of an already-parsed report.
pub fn intake_value(value: &Value, options: &IntakeOptions) -> Result<Intake, IntakeError> {
    let records = record::flatten(value).ok_or(IntakeError::Shape)?;
    let excludes = options.exclude_patterns()?;
    let match_options = MatchOptions {
        require_literal_separator: true,
        ..MatchOptions::new()
    };

    let mut intake = Intake::default();
    for raw in records {
        let stats = &mut intake.stats;
        stats.records_total += 1;

        let mut diagnostic = match raw.normalize() {
            Ok(d) => d,
            Err(rejection) => {
                match rejection {
                    Rejection::Malformed => stats.malformed += 1,
                    Rejection::IgnoredRule => stats.ignored_rule += 1,
                    Rejection::BelowSeverity => stats.below_severity += 1,
                }
                debug!(?rejection, rule = ?raw.rule, "skipping diagnostic record");
                continue;
            }
        };

        let Some(relative) = options.managed_path(&diagnostic.file_path) else {
            stats.outside_tree += 1;
            debug!(path = %diagnostic.file_path, "diagnostic outside the source tree");
            continue;
        };
        if excludes
            .iter()
            .any(|p| p.matches_with(relative.as_str(), match_options))
        {
            stats.excluded += 1;
            debug!(path = %relative, "excluded by pattern");
            continue;
        }
        if !options.supports_extension(&relative) {
            stats.unsupported_extension += 1;
            debug!(path = %relative, "unsupported file extension");
            continue;
        }
        if !options.repo_root.join(&relative).is_file() {
            stats.missing_file += 1;
            debug!(path = %relative, "diagnostic names a missing file");
            continue;
        }

        stats.accepted += 1;
        diagnostic.file_path = relative.clone();
        intake.diagnostics.entry(relative).or_default().push(diagnostic);
    }

    info!(
        records = intake.stats.records_total,
        accepted = intake.stats.accepted,
        files = intake.file_count(),
        "diagnostic intake complete"
    );
    Ok(intake)
}
