//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use jsmend_diagnostics::{Intake, IntakeError, IntakeOptions};

/// Source of analyzer diagnostics.
pub trait DiagnosticSource {
    fn load(&self, options: &IntakeOptions) -> Result<Intake, IntakeError>;
}

/// Source file reads. Shared across worker threads.
pub trait ReadPort: Send + Sync {
    fn read_to_string(&self, path: &Utf8Path) -> anyhow::Result<String>;
}

/// File-system write operations. Shared across worker threads.
pub trait WritePort: Send + Sync {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
