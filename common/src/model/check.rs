//! Checklist runs.
//!
//! A `Check` is one answerable run of a template against a set of host
//! elements. It embeds a full snapshot of the template as it was when the
//! check was created, so later edits to the template never change an
//! existing check.

use crate::lenient::null_as_default;
use crate::model::template::Template;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a check that is still being filled in.
pub const STATUS_DRAFT: &str = "draft";
/// Status of a check whose answers are final.
pub const STATUS_COMPLETED: &str = "completed";

fn draft() -> String {
    STATUS_DRAFT.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Check {
    pub id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub data_storage_unique_id: String,
    /// Storage handle of the template this check was created from.
    #[serde(deserialize_with = "null_as_default")]
    pub template_unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub template_snapshot: Template,
    /// Host element identifiers covered by this check. Duplicates are kept.
    #[serde(deserialize_with = "null_as_default")]
    pub checked_elements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub answers: Vec<CheckAnswer>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_by: String,
    pub modified_date: DateTime<Utc>,
    /// `null` reads as empty, which `normalize_status` turns into `draft`.
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

impl Default for Check {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            data_storage_unique_id: String::new(),
            template_unique_id: String::new(),
            template_snapshot: Template::default(),
            checked_elements: Vec::new(),
            answers: Vec::new(),
            created_by: String::new(),
            created_date: DateTime::<Utc>::default(),
            modified_by: String::new(),
            modified_date: DateTime::<Utc>::default(),
            status: draft(),
        }
    }
}

impl Check {
    /// An empty or whitespace status collapses to `draft`.
    pub fn normalize_status(&mut self) {
        if self.status.trim().is_empty() {
            self.status = draft();
        }
    }

    pub fn is_draft(&self) -> bool {
        self.status == STATUS_DRAFT
    }

    pub fn stamp_created(&mut self, by: &str, at: DateTime<Utc>) {
        self.created_by = by.to_string();
        self.created_date = at;
        self.stamp_modified(by, at);
    }

    pub fn stamp_modified(&mut self, by: &str, at: DateTime<Utc>) {
        self.modified_by = by.to_string();
        self.modified_date = at;
    }

    /// Copies the mutable fields from `other`; identity, handle and creation
    /// audit stay as stored.
    pub fn apply_edits(&mut self, other: Check) {
        self.template_unique_id = other.template_unique_id;
        self.template_snapshot = other.template_snapshot;
        self.checked_elements = other.checked_elements;
        self.answers = other.answers;
        self.status = other.status;
        self.normalize_status();
    }

    /// Answers whose `item_id` does not exist in the snapshot.
    ///
    /// Writes never reject these; readers can use this to flag them.
    pub fn dangling_answers(&self) -> impl Iterator<Item = &CheckAnswer> {
        self.answers
            .iter()
            .filter(|answer| self.template_snapshot.item(answer.item_id).is_none())
    }
}

/// The response to one template item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckAnswer {
    pub item_id: Uuid,
    pub answer: Option<String>,
    pub comment: Option<String>,
    pub element_unique_id: Option<String>,
}
