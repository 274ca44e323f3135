//! Three-pass execution of a fix plan against one syntax tree.
//!
//! Pass order is fixed: imports, then component-body declarations, then renames.
//! Each fix either applies or is dropped with a reason; a dropped fix never
//! blocks its siblings.

use crate::unique::{NameUse, unique_name};
use jsmend_syntax::{NodeId, ScopeId, SyntaxTree, visit};
use jsmend_types::diagnostic::LocationKey;
use jsmend_types::plan::{Fix, FixPlan, PlannedFix};
use jsmend_types::symbol::is_identifier;
use jsmend_types::report::{FixOutcome, FixStatus};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

pub const DEFAULT_MAX_SUFFIX_ATTEMPTS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutateOptions {
    /// Callee of paired declarations: `const [v, setV] = <state_primitive>(null)`.
    pub state_primitive: String,
    /// Prefix renames add to unused bindings.
    pub reserved_prefix: String,
    /// Extra global names synthesized bindings must not shadow.
    pub globals: BTreeSet<String>,
    pub max_suffix_attempts: u32,
}

impl Default for MutateOptions {
    fn default() -> Self {
        Self {
            state_primitive: "useState".to_string(),
            reserved_prefix: "_".to_string(),
            globals: BTreeSet::new(),
            max_suffix_attempts: DEFAULT_MAX_SUFFIX_ATTEMPTS,
        }
    }
}

/// Applies every fix of `plan` to `tree`, returning one outcome per fix in
/// execution order.
pub fn apply_fixes(tree: &mut SyntaxTree, plan: &FixPlan, options: &MutateOptions) -> Vec<FixOutcome> {
    let mut mutator = Mutator {
        tree,
        options,
        synthesized_imports: BTreeMap::new(),
    };
    plan.in_pass_order()
        .into_iter()
        .map(|planned| {
            let result = mutator.apply(&planned.fix);
            outcome(planned, result)
        })
        .collect()
}

/// Names written by an applied fix, or the reason it was dropped.
type FixResult = Result<Vec<String>, String>;

fn outcome(planned: &PlannedFix, result: FixResult) -> FixOutcome {
    let (status, names, reason) = match result {
        Ok(names) => (FixStatus::Applied, names, None),
        Err(reason) => (FixStatus::Dropped, Vec::new(), Some(reason)),
    };
    FixOutcome {
        fix_id: planned.id.clone(),
        kind: planned.fix.kind_label().to_string(),
        status,
        names,
        reason,
    }
}

struct Mutator<'t, 'o> {
    tree: &'t mut SyntaxTree,
    options: &'o MutateOptions,
    /// Imports this run created, by module.
    synthesized_imports: BTreeMap<String, NodeId>,
}

impl Mutator<'_, '_> {
    fn apply(&mut self, fix: &Fix) -> FixResult {
        let result = match fix {
            Fix::ImportMerge {
                module,
                names,
                only_if_imported,
            } => self.merge_import(module, names, *only_if_imported),
            Fix::PairedDeclaration {
                value_name,
                setter_name,
            } => self.declare_pair(value_name, setter_name),
            Fix::SingleDeclaration { name } => self.declare_single(name),
            Fix::Rename { at, name } => self.rename(*at, name),
        };
        match &result {
            Ok(names) => debug!(kind = fix.kind_label(), ?names, "applied fix"),
            Err(reason) => debug!(kind = fix.kind_label(), reason = %reason, "dropped fix"),
        }
        result
    }

    fn merge_import(
        &mut self,
        module: &str,
        names: &BTreeSet<String>,
        only_if_imported: bool,
    ) -> FixResult {
        let module_scope = self.tree.module_scope();
        let missing: Vec<String> = names
            .iter()
            .filter(|name| !self.tree.scopes().is_bound_in(module_scope, name))
            .cloned()
            .collect();
        if missing.is_empty() {
            return Err("already imported or declared at module level".to_string());
        }

        let target = self
            .tree
            .imports()
            .find(|(id, import)| {
                import.source == module
                    && import.accepts_named()
                    && !self.tree.node(*id).span.is_empty()
            })
            .map(|(id, _)| id)
            .or_else(|| self.synthesized_imports.get(module).copied());

        match target {
            Some(import) => {
                self.tree
                    .add_import_names(import, &missing)
                    .map_err(|e| e.to_string())?;
            }
            None if only_if_imported => {
                return Err(format!("no existing import from '{module}' to merge into"));
            }
            None => {
                let id = self.tree.insert_import(module, &missing);
                self.synthesized_imports.insert(module.to_string(), id);
            }
        }
        Ok(missing)
    }

    fn component_body(&self) -> Result<(NodeId, ScopeId), String> {
        let component = self
            .tree
            .first_component()
            .ok_or_else(|| "no component body to declare in".to_string())?;
        let body = self
            .tree
            .block_body(component)
            .map_err(|e| e.to_string())?;
        Ok((component, body.scope))
    }

    fn unique(&self, scope: ScopeId, candidate: &str, usage: NameUse) -> FixResult {
        unique_name(
            &*self.tree,
            scope,
            candidate,
            usage,
            &self.options.globals,
            self.options.max_suffix_attempts,
        )
        .map(|name| vec![name])
        .ok_or_else(|| format!("no free name for '{candidate}'"))
    }

    fn declare_pair(&mut self, value_name: &str, setter_name: &str) -> FixResult {
        if !is_identifier(value_name) {
            return Err(format!("'{value_name}' is not an identifier"));
        }
        let (component, scope) = self.component_body()?;
        let scopes = self.tree.scopes();
        if scopes.is_bound_in(scope, value_name) || scopes.is_bound_in(scope, setter_name) {
            return Err("already declared in the component body".to_string());
        }
        let mut names = self.unique(scope, value_name, NameUse::Declaration)?;
        names.extend(self.unique(scope, setter_name, NameUse::Declaration)?);
        if names[0] == names[1] {
            return Err(format!("'{}' would be declared twice", names[0]));
        }

        self.tree
            .prepend_state_declaration(component, &names[0], &names[1], &self.options.state_primitive)
            .map_err(|e| e.to_string())?;
        Ok(names)
    }

    fn declare_single(&mut self, name: &str) -> FixResult {
        let (component, scope) = self.component_body()?;
        if self.tree.scopes().is_bound_in(scope, name) {
            return Err("already declared in the component body".to_string());
        }
        let names = self.unique(scope, name, NameUse::Declaration)?;
        self.tree
            .prepend_null_declaration(component, &names[0])
            .map_err(|e| e.to_string())?;
        Ok(names)
    }

    fn rename(&mut self, at: LocationKey, name: &str) -> FixResult {
        let offset = self
            .tree
            .offset_of(at.line, at.column)
            .ok_or_else(|| format!("location {at} is outside the file"))?;
        let binding = visit::bindings_at(&*self.tree, offset)
            .into_iter()
            .find(|id| self.tree.name_of(*id) == Some(name))
            .ok_or_else(|| format!("no binding named '{name}' at {at}"))?;

        let site = self
            .tree
            .ident(binding)
            .and_then(|i| i.binding())
            .ok_or_else(|| format!("'{name}' at {at} is not a binding"))?;
        if site.exported {
            return Err(format!("'{name}' is exported"));
        }
        if self.tree.is_referenced(binding) {
            warn!(name, location = %at, "stale unused-binding diagnostic: binding is referenced");
            return Err(format!("'{name}' is referenced"));
        }

        let scope = self.tree.node(binding).scope;
        let candidate = format!("{}{name}", self.options.reserved_prefix);
        let names = self.unique(scope, &candidate, NameUse::Rename)?;
        self.tree
            .rename_binding(binding, &names[0])
            .map_err(|e| e.to_string())?;
        Ok(names)
    }
}
