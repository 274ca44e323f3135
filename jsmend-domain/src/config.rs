use jsmend_syntax::globals::is_known_global;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Vocabulary and naming conventions the classifier works from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Undeclared name → module expected to export it.
    pub capabilities: BTreeMap<String, String>,
    /// Module that provides the state primitive.
    pub state_module: String,
    /// Called as `primitive(null)` for paired declarations.
    pub state_primitive: String,
    /// Setter prefix that triggers a paired declaration.
    pub setter_prefix: String,
    /// Module capitalized names are imported from, when the file already imports it.
    pub icon_module: String,
    /// Unused bindings starting with this prefix are left alone; renames add it.
    pub reserved_prefix: String,
    /// Globals on top of the built-in runtime list.
    pub globals: BTreeSet<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        let mut capabilities = BTreeMap::new();
        for hook in [
            "useState",
            "useEffect",
            "useLayoutEffect",
            "useMemo",
            "useCallback",
            "useRef",
            "useContext",
            "useReducer",
            "useId",
            "useTransition",
            "useDeferredValue",
            "Fragment",
        ] {
            capabilities.insert(hook.to_string(), "react".to_string());
        }
        capabilities.insert("toast".to_string(), "sonner".to_string());
        capabilities.insert("cn".to_string(), "@/lib/utils".to_string());

        Self {
            capabilities,
            state_module: "react".to_string(),
            state_primitive: "useState".to_string(),
            setter_prefix: "set".to_string(),
            icon_module: "lucide-react".to_string(),
            reserved_prefix: "_".to_string(),
            globals: BTreeSet::new(),
        }
    }
}

impl ClassifierConfig {
    pub fn module_for(&self, name: &str) -> Option<&str> {
        self.capabilities.get(name).map(String::as_str)
    }

    pub fn is_global(&self, name: &str) -> bool {
        is_known_global(name) || self.globals.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_hooks_and_notifications() {
        let config = ClassifierConfig::default();
        assert_eq!(config.module_for("useEffect"), Some("react"));
        assert_eq!(config.module_for("toast"), Some("sonner"));
        assert_eq!(config.module_for("count"), None);
        assert!(config.is_global("window"));
        assert!(!config.is_global("count"));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: ClassifierConfig =
            serde_json::from_str(r#"{ "icon_module": "@heroicons/react" }"#).unwrap();
        assert_eq!(config.icon_module, "@heroicons/react");
        assert_eq!(config.state_primitive, "useState");
        assert!(!config.capabilities.is_empty());
    }
}
