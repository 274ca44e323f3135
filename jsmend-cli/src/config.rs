//! Configuration file loading for jsmend.
//!
//! Discovers and loads `jsmend.toml` from the repository root (or `--config`).
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use jsmend_core::ClassifierConfig;
use jsmend_core::settings::RunSettings;
use serde::Deserialize;
use std::collections::BTreeMap;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "jsmend.toml";

/// Top-level configuration from jsmend.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JsmendConfig {
    /// Source tree, parallelism and backup settings.
    pub run: RunConfig,

    /// Undeclared name → module that exports it. Extends the built-in table.
    pub capabilities: BTreeMap<String, String>,

    /// State primitive used for `setX` / `x` pairs.
    pub state: StateConfig,

    /// Conditional imports for capitalized names.
    pub icons: IconsConfig,

    /// Extra runtime globals that are never declared.
    pub globals: GlobalsConfig,
}

/// Run section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Managed source tree, relative to the repository root.
    pub source_root: Option<Utf8PathBuf>,

    /// File extensions eligible for repair.
    pub extensions: Option<Vec<String>>,

    /// Glob patterns over repo-relative paths that are never edited.
    pub exclude: Vec<String>,

    /// Worker threads (0 = one per core).
    pub jobs: Option<usize>,

    /// Suffix attempts before a synthesized name is given up on.
    pub max_suffix_attempts: Option<u32>,

    /// Prefix marking a binding as intentionally unused.
    pub reserved_prefix: Option<String>,

    /// Whether to write `<file><suffix>` before overwriting.
    pub backup: Option<bool>,

    /// Suffix for backup files.
    pub backup_suffix: Option<String>,
}

/// State section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StateConfig {
    pub module: Option<String>,
    pub primitive: Option<String>,
    pub setter_prefix: Option<String>,
}

/// Icons section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IconsConfig {
    pub module: Option<String>,
}

/// Globals section of the config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalsConfig {
    pub names: Vec<String>,
}

/// Discover the jsmend.toml config file in the repository root.
pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!(path = %config_path, "found config file");
        Some(config_path)
    } else {
        debug!(path = %config_path, "no config file");
        None
    }
}

/// Load and parse a jsmend.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<JsmendConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<JsmendConfig> {
    let config: JsmendConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load the explicit config if given, else the one in the repo root, else defaults.
pub fn load_or_default(
    repo_root: &Utf8Path,
    explicit: Option<&Utf8Path>,
) -> anyhow::Result<JsmendConfig> {
    match explicit.map(Utf8Path::to_path_buf).or_else(|| discover_config(repo_root)) {
        Some(path) => load_config(&path),
        None => Ok(JsmendConfig::default()),
    }
}

/// CLI values that override the config file. `None` / empty means "not given".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub source_root: Option<Utf8PathBuf>,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub jobs: Option<usize>,
    pub backup: bool,
    pub dry_run: bool,
    pub report_out: Option<Utf8PathBuf>,
    pub summary_out: Option<Utf8PathBuf>,
    pub patch_out: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: JsmendConfig,
}

impl ConfigMerger {
    pub fn new(config: JsmendConfig) -> Self {
        Self { config }
    }

    /// Settings for one run rooted at `repo_root`. CLI values win over the
    /// config file, which wins over built-in defaults.
    pub fn merge(self, repo_root: Utf8PathBuf, cli: CliOverrides) -> RunSettings {
        let JsmendConfig {
            run,
            capabilities,
            state,
            icons,
            globals,
        } = self.config;
        let defaults = RunSettings::default();

        let mut classifier = ClassifierConfig::default();
        classifier.capabilities.extend(capabilities);
        if let Some(module) = state.module {
            classifier.state_module = module;
        }
        if let Some(primitive) = state.primitive {
            classifier.state_primitive = primitive;
        }
        if let Some(prefix) = state.setter_prefix {
            classifier.setter_prefix = prefix;
        }
        if let Some(module) = icons.module {
            classifier.icon_module = module;
        }
        if let Some(prefix) = run.reserved_prefix {
            classifier.reserved_prefix = prefix;
        }
        classifier.globals.extend(globals.names);

        let extensions = if !cli.extensions.is_empty() {
            cli.extensions
        } else {
            run.extensions.unwrap_or(defaults.extensions)
        };
        let extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_ascii_lowercase())
            .collect();

        // CLI patterns extend the config file list.
        let mut exclude = run.exclude;
        for pattern in cli.exclude {
            if !exclude.contains(&pattern) {
                exclude.push(pattern);
            }
        }

        RunSettings {
            repo_root,
            source_root: cli
                .source_root
                .or(run.source_root)
                .unwrap_or(defaults.source_root),
            extensions,
            exclude,
            dry_run: cli.dry_run,
            jobs: cli.jobs.or(run.jobs).unwrap_or(defaults.jobs),
            max_suffix_attempts: run
                .max_suffix_attempts
                .unwrap_or(defaults.max_suffix_attempts),
            backup_enabled: cli.backup || run.backup.unwrap_or(defaults.backup_enabled),
            backup_suffix: run.backup_suffix.unwrap_or(defaults.backup_suffix),
            report_out: cli.report_out,
            summary_out: cli.summary_out,
            patch_out: cli.patch_out,
            classifier,
        }
    }
}
