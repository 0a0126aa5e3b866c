//! Persistence of checklist records inside the host document.
//!
//! - `document`: the `DocumentStore` trait the host document implements.
//! - `sqlite`: the SQLite-backed host document.
//! - `blob_store`: the adapter translating record kinds into schema-scoped
//!   JSON blobs, with a per-process schema cache.
//! - `records`: typed load/save of `Template` and `Check` on top of the adapter.

pub mod blob_store;
pub mod document;
pub mod records;
pub mod sqlite;

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("document error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Category of JSON blob. Each kind is stored under its own schema, so blobs
/// of different kinds never show up in each other's listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKind {
    Template,
    Check,
}

const TEMPLATE_SCHEMA_GUID: Uuid = Uuid::from_u128(0xda3f0c02_3d07_4f84_867b_dcbd82272d15);
const CHECK_SCHEMA_GUID: Uuid = Uuid::from_u128(0xb14f6b43_afe7_46cd_b13f_565ff6562a68);

impl StorageKind {
    pub const ALL: [StorageKind; 2] = [StorageKind::Template, StorageKind::Check];

    pub fn schema_guid(self) -> Uuid {
        match self {
            StorageKind::Template => TEMPLATE_SCHEMA_GUID,
            StorageKind::Check => CHECK_SCHEMA_GUID,
        }
    }

    pub fn schema_name(self) -> &'static str {
        match self {
            StorageKind::Template => "ChecklistTemplate",
            StorageKind::Check => "ChecklistCheck",
        }
    }
}

impl fmt::Display for StorageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageKind::Template => f.write_str("template"),
            StorageKind::Check => f.write_str("check"),
        }
    }
}
