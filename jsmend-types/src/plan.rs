use crate::diagnostic::LocationKey;
use crate::report::{IntakeStats, ToolInfo};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// One repair, as a tagged union dispatched by the mutator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fix {
    /// Rename the binding declared at `at` (currently named `name`).
    Rename { at: LocationKey, name: String },

    /// Ensure `names` are imported from `module`.
    ImportMerge {
        module: String,
        names: BTreeSet<String>,
        /// Only merge into an existing import of `module`; never add a new declaration.
        #[serde(default)]
        only_if_imported: bool,
    },

    /// Declare `[value_name, setter_name]` from the state primitive.
    PairedDeclaration {
        value_name: String,
        setter_name: String,
    },

    /// Declare `name` as a local binding initialised to `null`.
    SingleDeclaration { name: String },
}

impl Fix {
    /// Stable key used for ordering and id derivation.
    pub fn fix_key(&self) -> String {
        match self {
            Fix::Rename { at, name } => format!("rename|{}|{}", at, name),
            Fix::ImportMerge {
                module,
                names,
                only_if_imported,
            } => format!(
                "import|{}|{}|{}",
                module,
                names.iter().cloned().collect::<Vec<_>>().join(","),
                only_if_imported
            ),
            Fix::PairedDeclaration {
                value_name,
                setter_name,
            } => format!("pair|{}|{}", value_name, setter_name),
            Fix::SingleDeclaration { name } => format!("single|{}", name),
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            Fix::Rename { .. } => "rename",
            Fix::ImportMerge { .. } => "import_merge",
            Fix::PairedDeclaration { .. } => "paired_declaration",
            Fix::SingleDeclaration { .. } => "single_declaration",
        }
    }

    /// Mutation pass that owns this fix. Passes run in ascending order.
    pub fn pass(&self) -> u8 {
        match self {
            Fix::ImportMerge { .. } => 0,
            Fix::PairedDeclaration { .. } | Fix::SingleDeclaration { .. } => 1,
            Fix::Rename { .. } => 2,
        }
    }
}

/// A fix with its deterministic id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedFix {
    pub id: String,
    #[serde(flatten)]
    pub fix: Fix,
}

impl PlannedFix {
    pub fn new(file_path: &Utf8Path, fix: Fix) -> Self {
        let id = deterministic_fix_id(file_path, &fix).to_string();
        Self { id, fix }
    }
}

fn deterministic_fix_id(file_path: &Utf8Path, fix: &Fix) -> Uuid {
    // v5(namespace, "<path>|<fix key>")
    const NAMESPACE: Uuid = Uuid::from_bytes([
        0x7a, 0x1e, 0x0c, 0x93, 0x5b, 0x2f, 0x4d, 0x61, 0x9a, 0x44, 0x1f, 0xe2, 0x08, 0xb7, 0x3c,
        0x55,
    ]);
    let stable_key = format!("{}|{}", file_path, fix.fix_key());
    Uuid::new_v5(&NAMESPACE, stable_key.as_bytes())
}

/// The side-effect-free description of everything one file's mutation should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixPlan {
    pub file_path: Utf8PathBuf,

    #[serde(default)]
    pub fixes: Vec<PlannedFix>,

    /// Diagnostics that produced no fix (exempt names, duplicates).
    #[serde(default)]
    pub exempt: u64,
}

impl FixPlan {
    pub fn new(file_path: Utf8PathBuf) -> Self {
        Self {
            file_path,
            fixes: vec![],
            exempt: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fixes.is_empty()
    }

    pub fn push(&mut self, fix: Fix) {
        if self.fixes.iter().any(|f| f.fix == fix) {
            return;
        }
        let planned = PlannedFix::new(&self.file_path, fix);
        self.fixes.push(planned);
    }

    /// Fixes in execution order: imports, declarations, renames. Plan order is kept
    /// within a pass.
    pub fn in_pass_order(&self) -> Vec<&PlannedFix> {
        let mut out: Vec<&PlannedFix> = self.fixes.iter().collect();
        out.sort_by_key(|f| f.fix.pass());
        out
    }

    pub fn rename_targets(&self) -> BTreeMap<LocationKey, String> {
        self.fixes
            .iter()
            .filter_map(|f| match &f.fix {
                Fix::Rename { at, name } => Some((*at, name.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn capability_imports(&self) -> BTreeMap<String, BTreeSet<String>> {
        let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for f in &self.fixes {
            if let Fix::ImportMerge { module, names, .. } = &f.fix {
                out.entry(module.clone())
                    .or_default()
                    .extend(names.iter().cloned());
            }
        }
        out
    }

    pub fn paired_declarations(&self) -> Vec<(String, String)> {
        self.fixes
            .iter()
            .filter_map(|f| match &f.fix {
                Fix::PairedDeclaration {
                    value_name,
                    setter_name,
                } => Some((value_name.clone(), setter_name.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn single_declarations(&self) -> Vec<String> {
        self.fixes
            .iter()
            .filter_map(|f| match &f.fix {
                Fix::SingleDeclaration { name } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }
}

/// Serialized preview of every plan in a run (`jsmend plan`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDocument {
    pub schema: String,
    pub tool: ToolInfo,
    pub intake: IntakeStats,
    #[serde(default)]
    pub plans: Vec<FixPlan>,
}

impl PlanDocument {
    pub fn new(tool: ToolInfo, intake: IntakeStats, plans: Vec<FixPlan>) -> Self {
        Self {
            schema: crate::schema::JSMEND_PLAN_V1.to_string(),
            tool,
            intake,
            plans,
        }
    }
}
