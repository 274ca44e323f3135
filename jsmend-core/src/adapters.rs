//! Default filesystem-backed port implementations, plus in-memory ones for
//! embedding and tests.

use crate::ports::{DiagnosticSource, ReadPort, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use jsmend_diagnostics::{Intake, IntakeError, IntakeOptions};
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::debug;

/// Loads the report from a JSON file via `jsmend_diagnostics::load_report`.
#[derive(Debug, Clone)]
pub struct FsDiagnosticSource {
    pub report_path: Utf8PathBuf,
}

impl FsDiagnosticSource {
    pub fn new(report_path: Utf8PathBuf) -> Self {
        Self { report_path }
    }
}

impl DiagnosticSource for FsDiagnosticSource {
    fn load(&self, options: &IntakeOptions) -> Result<Intake, IntakeError> {
        jsmend_diagnostics::load_report(&self.report_path, options)
    }
}

/// Report already parsed into a JSON value.
#[derive(Debug, Clone)]
pub struct InMemoryDiagnosticSource {
    report: serde_json::Value,
}

impl InMemoryDiagnosticSource {
    pub fn new(report: serde_json::Value) -> Self {
        Self { report }
    }
}

impl DiagnosticSource for InMemoryDiagnosticSource {
    fn load(&self, options: &IntakeOptions) -> Result<Intake, IntakeError> {
        jsmend_diagnostics::intake_value(&self.report, options)
    }
}

/// Filesystem reads.
#[derive(Debug, Clone, Default)]
pub struct FsReadPort;

impl ReadPort for FsReadPort {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String> {
        fs::read_to_string(path).with_context(|| format!("read {}", path))
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// Write port that records writes in memory instead of touching disk.
#[derive(Debug, Default)]
pub struct MemoryWritePort {
    files: Mutex<BTreeMap<Utf8PathBuf, Vec<u8>>>,
}

impl MemoryWritePort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every write so far, by path. Later writes to a path replace earlier ones.
    pub fn written(&self) -> BTreeMap<Utf8PathBuf, Vec<u8>> {
        self.files
            .lock()
            .map(|files| files.clone())
            .unwrap_or_default()
    }
}

impl WritePort for MemoryWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        debug!(path = %path, bytes = contents.len(), "recording write");
        let mut files = self
            .files
            .lock()
            .map_err(|_| anyhow::anyhow!("write log poisoned"))?;
        files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, _path: &Utf8Path) -> anyhow::Result<()> {
        Ok(())
    }
}
