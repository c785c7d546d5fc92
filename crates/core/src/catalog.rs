//! Static module catalog.
//!
//! One JSON file describes the course structure and how external purchases map
//! onto it: the ordered list of modules (with their submodules), the payment
//! provider's product id -> module id table, and the per-module unlock hooks.
//! Keeping this in configuration means a new product SKU ships without a code
//! change.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;
use crate::progress::{ModuleProgress, ProgressMap, SubmoduleProgress};

/// One course module and its ordered submodules.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleDef {
    pub id: String,
    #[serde(default)]
    pub submodules: Vec<String>,
}

/// The catalog file, deserialized as-is.
///
/// `unlock_hooks` is an explicit table of module id -> submodule id granted
/// alongside the module. Only modules listed here get the extra write; the
/// rule is never inferred from whatever submodules a user document happens to
/// contain.
#[derive(Debug, Clone, Deserialize)]
pub struct ModuleCatalog {
    pub modules: Vec<ModuleDef>,
    pub products: BTreeMap<String, String>,
    #[serde(default)]
    pub unlock_hooks: BTreeMap<String, String>,
}

impl ModuleCatalog {
    /// Load and validate the catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("cannot read catalog file {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
    }

    /// Parse and validate a catalog from a JSON string.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let catalog: Self = serde_json::from_str(raw)
            .map_err(|e| CoreError::Config(format!("invalid catalog JSON: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reject catalogs whose cross-references do not line up.
    fn validate(&self) -> Result<(), CoreError> {
        for (product_id, module_id) in &self.products {
            if self.module(module_id).is_none() {
                return Err(CoreError::Config(format!(
                    "product {product_id} maps to unknown module {module_id}"
                )));
            }
        }
        for (module_id, submodule_id) in &self.unlock_hooks {
            let Some(module) = self.module(module_id) else {
                return Err(CoreError::Config(format!(
                    "unlock hook references unknown module {module_id}"
                )));
            };
            if !module.submodules.iter().any(|s| s == submodule_id) {
                return Err(CoreError::Config(format!(
                    "unlock hook for {module_id} references unknown submodule {submodule_id}"
                )));
            }
        }
        Ok(())
    }

    fn module(&self, module_id: &str) -> Option<&ModuleDef> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Resolve an external product id to an internal module id.
    pub fn module_for_product(&self, product_id: &str) -> Option<&str> {
        self.products.get(product_id).map(String::as_str)
    }

    /// The submodule granted alongside `module_id`, if any.
    pub fn unlock_hook(&self, module_id: &str) -> Option<&str> {
        self.unlock_hooks.get(module_id).map(String::as_str)
    }

    /// Build the progress document a fresh account starts with: every module
    /// and submodule present and locked.
    pub fn default_progress(&self) -> ProgressMap {
        self.modules
            .iter()
            .map(|module| {
                let submodules = module
                    .submodules
                    .iter()
                    .map(|id| (id.clone(), SubmoduleProgress::default()))
                    .collect();
                (
                    module.id.clone(),
                    ModuleProgress {
                        submodules,
                        ..ModuleProgress::default()
                    },
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ModuleStatus;

    fn catalog() -> ModuleCatalog {
        ModuleCatalog::from_json(
            r#"{
                "modules": [
                    {"id": "alphabet-sounds", "submodules": ["letter-names", "letter-sounds"]},
                    {"id": "phonetic-graphism", "submodules": ["intro-strokes", "letter-tracing", "word-writing"]},
                    {"id": "syllable-blending"}
                ],
                "products": {
                    "SKU-ALPHA": "alphabet-sounds",
                    "SKU-GRAPH": "phonetic-graphism"
                },
                "unlock_hooks": {
                    "phonetic-graphism": "intro-strokes"
                }
            }"#,
        )
        .expect("test catalog should parse")
    }

    #[test]
    fn resolves_products_and_hooks() {
        let catalog = catalog();
        assert_eq!(
            catalog.module_for_product("SKU-GRAPH"),
            Some("phonetic-graphism")
        );
        assert_eq!(catalog.module_for_product("SKU-UNKNOWN"), None);
        assert_eq!(catalog.unlock_hook("phonetic-graphism"), Some("intro-strokes"));
        assert_eq!(catalog.unlock_hook("alphabet-sounds"), None);
    }

    #[test]
    fn default_progress_is_fully_locked() {
        let progress = catalog().default_progress();
        assert_eq!(progress.len(), 3);
        for (id, module) in &progress {
            assert_eq!(module.status, ModuleStatus::Locked, "module: {id}");
            for (sub_id, sub) in &module.submodules {
                assert_eq!(sub.status, ModuleStatus::Locked, "submodule: {sub_id}");
            }
        }
        assert_eq!(progress["phonetic-graphism"].submodules.len(), 3);
        assert!(progress["syllable-blending"].submodules.is_empty());
    }

    #[test]
    fn rejects_product_mapping_to_unknown_module() {
        let result = ModuleCatalog::from_json(
            r#"{"modules": [], "products": {"SKU": "ghost"}, "unlock_hooks": {}}"#,
        );
        assert!(matches!(result, Err(CoreError::Config(_))));
    }

    #[test]
    fn rejects_hook_for_unknown_submodule() {
        let result = ModuleCatalog::from_json(
            r#"{
                "modules": [{"id": "m", "submodules": ["a"]}],
                "products": {},
                "unlock_hooks": {"m": "b"}
            }"#,
        );
        assert!(matches!(result, Err(CoreError::Config(_))));
    }
}
