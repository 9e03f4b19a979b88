//! The single persisted entity and its partial-update field set.

use serde::{Deserialize, Serialize};

/// A stored record, keyed by `id`.
///
/// `id` is the primary key: non-empty, unique within the table and never
/// rewritten once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
        }
    }

    /// Apply a patch in place. Fields absent from the patch keep their value.
    pub fn apply(&mut self, patch: &RecordPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
    }
}

/// Mutable fields of a [`Record`] for a partial update.
///
/// `None` means "leave unchanged", never "clear".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl RecordPatch {
    /// True when the patch would write nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    /// Fill every omitted field from `existing`, producing a patch that
    /// carries a value for each mutable field.
    pub fn coalesce(self, existing: &Record) -> RecordPatch {
        RecordPatch {
            name: Some(self.name.unwrap_or_else(|| existing.name.clone())),
            email: Some(self.email.unwrap_or_else(|| existing.email.clone())),
        }
    }
}
