//! Clap-free settings for the plan and fix pipelines.

use camino::Utf8PathBuf;
use jsmend_diagnostics::{DEFAULT_EXTENSIONS, DEFAULT_SOURCE_ROOT, IntakeOptions};
use jsmend_domain::ClassifierConfig;
use jsmend_edit::MutateOptions;

pub const DEFAULT_BACKUP_SUFFIX: &str = ".jsmend.bak";

/// Settings shared by `run_plan` and `run_fix`.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub repo_root: Utf8PathBuf,
    /// Managed source tree, relative to `repo_root`.
    pub source_root: Utf8PathBuf,
    pub extensions: Vec<String>,
    /// Glob patterns over repo-relative paths that are never edited.
    pub exclude: Vec<String>,

    // Fix behaviour
    pub dry_run: bool,
    /// Worker threads; 0 lets rayon decide.
    pub jobs: usize,
    pub max_suffix_attempts: u32,

    // Backups
    pub backup_enabled: bool,
    pub backup_suffix: String,

    // Artifacts
    pub report_out: Option<Utf8PathBuf>,
    pub summary_out: Option<Utf8PathBuf>,
    pub patch_out: Option<Utf8PathBuf>,

    pub classifier: ClassifierConfig,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            source_root: Utf8PathBuf::from(DEFAULT_SOURCE_ROOT),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            exclude: Vec::new(),
            dry_run: false,
            jobs: 0,
            max_suffix_attempts: jsmend_edit::DEFAULT_MAX_SUFFIX_ATTEMPTS,
            backup_enabled: false,
            backup_suffix: DEFAULT_BACKUP_SUFFIX.to_string(),
            report_out: None,
            summary_out: None,
            patch_out: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl RunSettings {
    pub fn intake_options(&self) -> IntakeOptions {
        IntakeOptions {
            repo_root: self.repo_root.clone(),
            source_root: self.source_root.clone(),
            extensions: self.extensions.clone(),
            exclude: self.exclude.clone(),
        }
    }

    pub fn mutate_options(&self) -> MutateOptions {
        MutateOptions {
            state_primitive: self.classifier.state_primitive.clone(),
            reserved_prefix: self.classifier.reserved_prefix.clone(),
            globals: self.classifier.globals.clone(),
            max_suffix_attempts: self.max_suffix_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutate_options_follow_the_classifier() {
        let mut settings = RunSettings::default();
        settings.classifier.state_primitive = "useSignal".into();
        settings.classifier.reserved_prefix = "unused_".into();
        settings.max_suffix_attempts = 5;
        let opts = settings.mutate_options();
        assert_eq!(opts.state_primitive, "useSignal");
        assert_eq!(opts.reserved_prefix, "unused_");
        assert_eq!(opts.max_suffix_attempts, 5);
    }

    #[test]
    fn intake_options_follow_the_settings() {
        let settings = RunSettings {
            repo_root: "/repo".into(),
            source_root: "app".into(),
            ..RunSettings::default()
        };
        let opts = settings.intake_options();
        assert_eq!(opts.repo_root, "/repo");
        assert_eq!(opts.source_root, "app");
        assert!(opts.extensions.iter().any(|e| e == "tsx"));
    }
}
