use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Machine-readable outcome of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    pub dry_run: bool,

    pub intake: IntakeStats,

    pub summary: RunSummary,

    #[serde(default)]
    pub files: Vec<FileReport>,
}

impl RunReport {
    pub fn new(tool: ToolInfo, dry_run: bool) -> Self {
        Self {
            schema: crate::schema::JSMEND_REPORT_V1.to_string(),
            tool,
            started_at: None,
            ended_at: None,
            dry_run,
            intake: IntakeStats::default(),
            summary: RunSummary::default(),
            files: vec![],
        }
    }
}

/// Counters accumulated while loading the diagnostic report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeStats {
    pub records_total: u64,
    pub accepted: u64,
    pub malformed: u64,
    pub ignored_rule: u64,
    pub below_severity: u64,
    pub outside_tree: u64,
    pub missing_file: u64,
    pub unsupported_extension: u64,
    /// Matched an `exclude` pattern.
    #[serde(default)]
    pub excluded: u64,
}

/// Aggregate counters exposed to the caller of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Files with at least one applicable fix.
    pub touched_files: u64,
    /// Files rewritten (or that would be, in dry-run).
    pub changed_files: u64,
    pub unchanged_files: u64,
    pub parse_failures: u64,
    /// Read, write and precondition failures.
    pub io_failures: u64,
    /// Files whose repair panicked.
    #[serde(default)]
    pub panicked: u64,
    pub fixes_applied: u64,
    pub fixes_dropped: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: String,
    pub status: FileStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<String>,

    #[serde(default)]
    pub fixes: Vec<FixOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Changed,
    Unchanged,
    ParseFailed,
    ReadFailed,
    WriteFailed,
    PreconditionFailed,
    Panicked,
}

impl FileStatus {
    pub fn is_failure(self) -> bool {
        !matches!(self, FileStatus::Changed | FileStatus::Unchanged)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Changed => "changed",
            FileStatus::Unchanged => "unchanged",
            FileStatus::ParseFailed => "parse_failed",
            FileStatus::ReadFailed => "read_failed",
            FileStatus::WriteFailed => "write_failed",
            FileStatus::PreconditionFailed => "precondition_failed",
            FileStatus::Panicked => "panicked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixOutcome {
    pub fix_id: String,
    pub kind: String,
    pub status: FixStatus,

    /// Names written by the fix (renamed-to, imported or declared names).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixStatus {
    Applied,
    Dropped,
}
