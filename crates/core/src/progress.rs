//! User progress document types.
//!
//! A user's course progress is one JSONB document: a map from module id to a
//! [`ModuleProgress`] record, with optional nested submodule statuses. Created
//! at signup with every catalog module locked; status transitions happen only
//! through the reconciliation transaction and course-completion logic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a module or submodule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    #[default]
    Locked,
    Active,
    Unlocked,
    Completed,
}

/// Status value a purchase grant writes.
///
/// Historically both `unlocked` and `active` were in use depending on the
/// entry point; `unlocked` is the single canonical value now.
pub const GRANTED_STATUS: ModuleStatus = ModuleStatus::Unlocked;

/// Progress record for one submodule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmoduleProgress {
    #[serde(default)]
    pub status: ModuleStatus,
}

/// Progress record for one top-level module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleProgress {
    #[serde(default)]
    pub status: ModuleStatus,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub submodules: BTreeMap<String, SubmoduleProgress>,
}

/// The per-user progress document: module id -> module progress.
pub type ProgressMap = BTreeMap<String, ModuleProgress>;
