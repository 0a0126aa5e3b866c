//! Checklist template definitions.
//!
//! A `Template` is the reusable definition of a checklist: an ordered list of
//! `TemplateSection`s, each holding an ordered list of `TemplateItem`s. Order is
//! display order and is preserved verbatim through every save and load.
//!
//! Every field is defaulted on deserialization so that partial request bodies
//! (for example `{"name": "Fire Safety"}`) parse into a complete value. Text,
//! list and flag fields also accept an explicit `null`.

use crate::lenient::null_as_default;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

fn first_version() -> i32 {
    1
}

/// A reusable checklist definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Template {
    pub id: Uuid,
    /// Storage handle assigned by the host document on first save.
    /// Empty until the template has been persisted.
    #[serde(deserialize_with = "null_as_default")]
    pub data_storage_unique_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default = "first_version")]
    pub version: i32,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<TemplateSection>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_by: String,
    pub created_date: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub modified_by: String,
    pub modified_date: DateTime<Utc>,
    #[serde(deserialize_with = "null_as_default")]
    pub archived: bool,
}

impl Default for Template {
    fn default() -> Self {
        Self {
            id: Uuid::nil(),
            data_storage_unique_id: String::new(),
            name: String::new(),
            description: String::new(),
            version: first_version(),
            sections: Vec::new(),
            created_by: String::new(),
            created_date: DateTime::<Utc>::default(),
            modified_by: String::new(),
            modified_date: DateTime::<Utc>::default(),
            archived: false,
        }
    }
}

impl Template {
    /// Brings the template into canonical form.
    ///
    /// Sections and items that arrived without an identity get a fresh one,
    /// and options are dropped from items whose type does not use them.
    pub fn canonicalize(&mut self) {
        for section in &mut self.sections {
            if section.id.is_nil() {
                section.id = Uuid::new_v4();
            }
            for item in &mut section.items {
                if item.id.is_nil() {
                    item.id = Uuid::new_v4();
                }
                if !item.item_type.accepts_options() {
                    item.options = None;
                }
            }
        }
    }

    /// Stamps a freshly created template: creation and modification audit
    /// fields are both set to `by`/`at`.
    pub fn stamp_created(&mut self, by: &str, at: DateTime<Utc>) {
        self.created_by = by.to_string();
        self.created_date = at;
        self.stamp_modified(by, at);
    }

    pub fn stamp_modified(&mut self, by: &str, at: DateTime<Utc>) {
        self.modified_by = by.to_string();
        self.modified_date = at;
    }

    /// Copies the user-editable fields from `other`, leaving identity,
    /// storage handle, version and creation audit untouched.
    pub fn apply_edits(&mut self, other: Template) {
        self.name = other.name;
        self.description = other.description;
        self.sections = other.sections;
        self.archived = other.archived;
    }

    /// Looks up an item by identity across all sections.
    pub fn item(&self, id: Uuid) -> Option<&TemplateItem> {
        self.sections
            .iter()
            .flat_map(|section| section.items.iter())
            .find(|item| item.id == id)
    }
}

/// A named, ordered group of items within a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateSection {
    pub id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<TemplateItem>,
}

/// A single question in a template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateItem {
    pub id: Uuid,
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub item_type: ItemType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// The kind of answer an item expects.
///
/// Unrecognized values are kept in `Other` and written back unchanged, so a
/// document produced by a newer client survives a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    #[default]
    Checkbox,
    Text,
    Number,
    Dropdown,
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            ItemType::Checkbox => "checkbox",
            ItemType::Text => "text",
            ItemType::Number => "number",
            ItemType::Dropdown => "dropdown",
            ItemType::Other(value) => value,
        }
    }

    /// Whether items of this type may carry an option list in canonical form.
    /// Unknown types keep whatever they were given.
    pub fn accepts_options(&self) -> bool {
        matches!(self, ItemType::Dropdown | ItemType::Other(_))
    }
}

impl From<String> for ItemType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "checkbox" => ItemType::Checkbox,
            "text" => ItemType::Text,
            "number" => ItemType::Number,
            "dropdown" => ItemType::Dropdown,
            _ => ItemType::Other(value),
        }
    }
}

impl From<ItemType> for String {
    fn from(value: ItemType) -> Self {
        match value {
            ItemType::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
