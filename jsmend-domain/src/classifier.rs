use crate::config::ClassifierConfig;
use camino::{Utf8Path, Utf8PathBuf};
use jsmend_types::diagnostic::{Diagnostic, RuleKind};
use jsmend_types::plan::{Fix, FixPlan};
use jsmend_types::symbol::{lower_first, starts_upper};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// How one undeclared name gets declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Imported from a module in the capability table.
    Capability { module: String },
    /// `const [value, setter] = primitive(null)`.
    Pair {
        value_name: String,
        setter_name: String,
    },
    /// Capitalized name merged into an existing import of the icon module.
    Icon { module: String },
    /// `let name = null`.
    Placeholder,
    /// Provided by the runtime; declaring it would shadow the global.
    Global,
}

#[derive(Debug, Clone, Default)]
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// First matching strategy wins: capability, pair, icon, global, placeholder.
    pub fn classify_undeclared(&self, name: &str) -> Classification {
        if let Some(module) = self.config.module_for(name) {
            return Classification::Capability {
                module: module.to_string(),
            };
        }
        if let Some(value_name) = self.paired_value_name(name) {
            return Classification::Pair {
                value_name,
                setter_name: name.to_string(),
            };
        }
        if starts_upper(name) && !self.config.is_global(name) {
            return Classification::Icon {
                module: self.config.icon_module.clone(),
            };
        }
        if self.config.is_global(name) {
            return Classification::Global;
        }
        Classification::Placeholder
    }

    /// `setCount` → `count`. Any name longer than the prefix qualifies, so
    /// `settings` pairs with `tings`; the mutator drops values that are not
    /// identifiers.
    pub fn paired_value_name(&self, name: &str) -> Option<String> {
        let rest = name.strip_prefix(self.config.setter_prefix.as_str())?;
        (!rest.is_empty()).then(|| lower_first(rest))
    }

    /// Unused bindings that are intentionally unused by convention.
    pub fn is_exempt_unused(&self, name: &str) -> bool {
        let prefix = self.config.reserved_prefix.as_str();
        (!prefix.is_empty() && name.starts_with(prefix)) || starts_upper(name)
    }

    /// Builds the plan for one file. Fixes are ordered imports, pairs,
    /// placeholders, renames; within each group the diagnostic order is kept.
    pub fn plan_file(&self, path: &Utf8Path, diagnostics: &[Diagnostic]) -> FixPlan {
        let mut plan = FixPlan::new(path.to_path_buf());

        let paired_values: BTreeSet<String> = diagnostics
            .iter()
            .filter(|d| d.rule_kind == RuleKind::UndeclaredReference)
            .filter_map(|d| match self.classify_undeclared(&d.symbol_name) {
                Classification::Pair { value_name, .. } => Some(value_name),
                _ => None,
            })
            .collect();

        let mut imports: BTreeMap<(String, bool), BTreeSet<String>> = BTreeMap::new();
        let mut pairs = Vec::new();
        let mut singles = Vec::new();
        let mut renames = Vec::new();
        let mut seen_undeclared = BTreeSet::new();

        for diagnostic in diagnostics {
            let name = diagnostic.symbol_name.as_str();
            match diagnostic.rule_kind {
                RuleKind::UndeclaredReference => {
                    if !seen_undeclared.insert(name) {
                        plan.exempt += 1;
                        continue;
                    }
                    match self.classify_undeclared(name) {
                        Classification::Capability { module } => {
                            imports
                                .entry((module, false))
                                .or_default()
                                .insert(name.to_string());
                        }
                        Classification::Pair {
                            value_name,
                            setter_name,
                        } => {
                            imports
                                .entry((self.config.state_module.clone(), false))
                                .or_default()
                                .insert(self.config.state_primitive.clone());
                            pairs.push(Fix::PairedDeclaration {
                                value_name,
                                setter_name,
                            });
                        }
                        Classification::Icon { module } => {
                            imports
                                .entry((module, true))
                                .or_default()
                                .insert(name.to_string());
                        }
                        Classification::Placeholder if paired_values.contains(name) => {
                            debug!(name, "placeholder subsumed by paired declaration");
                            plan.exempt += 1;
                        }
                        Classification::Placeholder => singles.push(Fix::SingleDeclaration {
                            name: name.to_string(),
                        }),
                        Classification::Global => {
                            debug!(name, "undeclared name is a runtime global");
                            plan.exempt += 1;
                        }
                    }
                }
                RuleKind::UnusedBinding => {
                    if self.is_exempt_unused(name) {
                        plan.exempt += 1;
                        continue;
                    }
                    renames.push(Fix::Rename {
                        at: diagnostic.location_key(),
                        name: name.to_string(),
                    });
                }
            }
        }

        for ((module, only_if_imported), names) in imports {
            plan.push(Fix::ImportMerge {
                module,
                names,
                only_if_imported,
            });
        }
        for fix in pairs.into_iter().chain(singles).chain(renames) {
            plan.push(fix);
        }

        debug!(
            path = %path,
            fixes = plan.fixes.len(),
            exempt = plan.exempt,
            "planned file"
        );
        plan
    }

    /// One plan per file, in path order. Files whose diagnostics are all exempt
    /// get an empty plan.
    pub fn plan_all(&self, grouped: &BTreeMap<Utf8PathBuf, Vec<Diagnostic>>) -> Vec<FixPlan> {
        grouped
            .iter()
            .map(|(path, diagnostics)| self.plan_file(path, diagnostics))
            .collect()
    }
}
