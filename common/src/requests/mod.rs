use crate::lenient::null_as_default;
use serde::{Deserialize, Serialize};

/// How many elements the operator is asked to pick.
///
/// Only the exact value `"multiple"` asks for several elements. Anything
/// else, including a missing or `null` count, is a single pick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "Option<String>")]
pub enum SelectionCount {
    #[default]
    Single,
    Multiple,
}

impl From<Option<String>> for SelectionCount {
    fn from(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("multiple") => SelectionCount::Multiple,
            _ => SelectionCount::Single,
        }
    }
}

/// Request payload for `POST /api/select-elements`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectElementsRequest {
    /// Prompt shown to the operator while picking.
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    pub count: SelectionCount,
    /// Host category names the picker should restrict itself to.
    pub allowed_categories: Option<Vec<String>>,
}

impl SelectElementsRequest {
    pub fn allows_multiple(&self) -> bool {
        self.count == SelectionCount::Multiple
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> SelectElementsRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn only_exact_multiple_allows_several() {
        assert!(parse(json!({"count": "multiple"})).allows_multiple());
        for count in [json!("single"), json!("Multiple"), json!("many"), json!(null)] {
            assert!(!parse(json!({"count": count})).allows_multiple());
        }
        assert!(!parse(json!({})).allows_multiple());
    }

    #[test]
    fn null_message_reads_as_empty() {
        let request = parse(json!({"message": null, "count": "single"}));
        assert!(request.message.is_empty());
        assert_eq!(request.allowed_categories, None);
    }

    #[test]
    fn count_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(SelectionCount::Multiple).unwrap(),
            json!("multiple")
        );
    }
}
