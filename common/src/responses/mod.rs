//! Fixed-shape response bodies shared by the server and its clients.

use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "ok";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: STATUS_OK.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectElementsResponse {
    pub status: String,
    pub selected_element_unique_ids: Vec<String>,
}

impl SelectElementsResponse {
    pub fn ok(selected_element_unique_ids: Vec<String>) -> Self {
        Self {
            status: STATUS_OK.to_string(),
            selected_element_unique_ids,
        }
    }
}

/// Body of every non-2xx JSON response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
