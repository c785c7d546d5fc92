//! The module unlock rule.
//!
//! A purchase grant is expressed as a list of [`FieldUpdate`]s against the
//! user's progress document. The rule itself is pure: it only consults the
//! static catalog, never the document being updated.

use crate::catalog::ModuleCatalog;
use crate::progress::{GRANTED_STATUS, ModuleStatus, ProgressMap};

/// Where a status write lands in the progress document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockTarget {
    Module(String),
    Submodule { module: String, submodule: String },
}

/// One status write produced by the unlock rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub target: UnlockTarget,
    pub status: ModuleStatus,
}

/// Compute the field updates required to grant `module_id`.
///
/// Always sets the module status to [`GRANTED_STATUS`]. Modules with an entry
/// in the catalog's unlock-hook table additionally get their configured first
/// submodule set to the same value.
pub fn unlock_updates(catalog: &ModuleCatalog, module_id: &str) -> Vec<FieldUpdate> {
    let mut updates = vec![FieldUpdate {
        target: UnlockTarget::Module(module_id.to_string()),
        status: GRANTED_STATUS,
    }];
    if let Some(submodule) = catalog.unlock_hook(module_id) {
        updates.push(FieldUpdate {
            target: UnlockTarget::Submodule {
                module: module_id.to_string(),
                submodule: submodule.to_string(),
            },
            status: GRANTED_STATUS,
        });
    }
    updates
}

/// Apply one field update to a progress document.
///
/// Missing module or submodule entries are created at their locked default
/// first, so an out-of-date document is healed rather than rejected.
pub fn apply_update(progress: &mut ProgressMap, update: &FieldUpdate) {
    match &update.target {
        UnlockTarget::Module(module) => {
            progress.entry(module.clone()).or_default().status = update.status;
        }
        UnlockTarget::Submodule { module, submodule } => {
            progress
                .entry(module.clone())
                .or_default()
                .submodules
                .entry(submodule.clone())
                .or_default()
                .status = update.status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ModuleCatalog;

    fn catalog() -> ModuleCatalog {
        ModuleCatalog::from_json(
            r#"{
                "modules": [
                    {"id": "alphabet-sounds", "submodules": ["letter-names"]},
                    {"id": "phonetic-graphism", "submodules": ["intro-strokes", "letter-tracing"]}
                ],
                "products": {},
                "unlock_hooks": {"phonetic-graphism": "intro-strokes"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn plain_module_gets_single_update() {
        let updates = unlock_updates(&catalog(), "alphabet-sounds");
        assert_eq!(
            updates,
            vec![FieldUpdate {
                target: UnlockTarget::Module("alphabet-sounds".into()),
                status: GRANTED_STATUS,
            }]
        );
    }

    #[test]
    fn hooked_module_also_unlocks_first_submodule() {
        let updates = unlock_updates(&catalog(), "phonetic-graphism");
        assert_eq!(updates.len(), 2);
        assert_eq!(
            updates[1],
            FieldUpdate {
                target: UnlockTarget::Submodule {
                    module: "phonetic-graphism".into(),
                    submodule: "intro-strokes".into(),
                },
                status: GRANTED_STATUS,
            }
        );
    }

    #[test]
    fn apply_transitions_existing_entries() {
        let catalog = catalog();
        let mut progress = catalog.default_progress();

        for update in unlock_updates(&catalog, "phonetic-graphism") {
            apply_update(&mut progress, &update);
        }

        let module = &progress["phonetic-graphism"];
        assert_eq!(module.status, GRANTED_STATUS);
        assert_eq!(module.submodules["intro-strokes"].status, GRANTED_STATUS);
        // Sibling submodule is untouched.
        assert_eq!(
            module.submodules["letter-tracing"].status,
            ModuleStatus::Locked
        );
    }

    #[test]
    fn apply_heals_missing_entries() {
        let catalog = catalog();
        let mut progress = ProgressMap::new();

        for update in unlock_updates(&catalog, "phonetic-graphism") {
            apply_update(&mut progress, &update);
        }

        let module = &progress["phonetic-graphism"];
        assert_eq!(module.status, GRANTED_STATUS);
        assert_eq!(module.submodules["intro-strokes"].status, GRANTED_STATUS);
        assert_eq!(module.submodules.len(), 1, "only the hooked submodule is created");
    }
}
