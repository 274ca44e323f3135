//! Edit engine for jsmend fix plans.
//!
//! Responsibilities:
//! - Execute a plan against a parsed tree in three passes (imports, declarations,
//!   renames), recording an outcome per fix.
//! - Pick collision-free names for everything it synthesizes.
//! - Print the result losslessly and decide whether the file changed.
//! - Hash file contents for write preconditions and render unified diffs.

mod error;
mod mutator;
mod patch;
mod unique;

pub use error::RepairError;
pub use mutator::{DEFAULT_MAX_SUFFIX_ATTEMPTS, MutateOptions, apply_fixes};
pub use patch::{backup_path, render_patch, sha256_hex};
pub use unique::{NameUse, is_free, unique_name};

use camino::Utf8Path;
use jsmend_syntax::{Dialect, parse};
use jsmend_types::plan::FixPlan;
use jsmend_types::report::{FixOutcome, FixStatus};
use tracing::debug;

/// Result of running one plan over one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub output: String,
    pub outcomes: Vec<FixOutcome>,
    /// At least one fix applied and the printed text differs from the input.
    pub changed: bool,
}

impl Repaired {
    pub fn applied(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == FixStatus::Applied)
            .count()
    }

    pub fn dropped(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Parses `source`, applies `plan` and prints the tree. The dialect follows the
/// extension of `path`.
pub fn repair_source(
    path: &Utf8Path,
    source: &str,
    plan: &FixPlan,
    options: &MutateOptions,
) -> Result<Repaired, RepairError> {
    let dialect = Dialect::from_path(path).ok_or_else(|| RepairError::UnsupportedFile {
        path: path.to_string(),
    })?;
    let mut tree = parse(source, dialect)?;
    let outcomes = apply_fixes(&mut tree, plan, options);

    let any_applied = outcomes.iter().any(|o| o.status == FixStatus::Applied);
    let output = if any_applied {
        tree.print()?
    } else {
        source.to_string()
    };
    let changed = any_applied && output != source;
    debug!(path = %path, changed, "repaired source");

    Ok(Repaired {
        output,
        outcomes,
        changed,
    })
}
