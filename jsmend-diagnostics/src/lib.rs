//! Diagnostic report ingestion.
//!
//! jsmend consumes reports produced by an external analyzer. Intake is tolerant: it
//! accepts ESLint formatter output as well as flat record lists, ignores unknown
//! fields, and skips (and counts) records it cannot use instead of failing the run.
//! Only an unreadable or unparsable report is fatal.

mod load;
mod record;

pub use load::{
    DEFAULT_EXTENSIONS, DEFAULT_SOURCE_ROOT, Intake, IntakeError, IntakeOptions, intake_value,
    load_report,
};
pub use record::{RawRecord, Rejection};
