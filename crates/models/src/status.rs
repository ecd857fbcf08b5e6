use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle of admin-managed records. Deletion is a transition, never a row removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Active,
    Inactive,
    Deleted,
}

impl RecordStatus {
    pub fn label<'a>(&self, labels: &'a configs::StatusLabels) -> &'a str {
        match self {
            RecordStatus::Active => &labels.active,
            RecordStatus::Inactive => &labels.inactive,
            RecordStatus::Deleted => &labels.deleted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "active",
            RecordStatus::Inactive => "inactive",
            RecordStatus::Deleted => "deleted",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
