//! SQLite-backed host document.
//!
//! The document file holds three tables:
//!
//! - `schemas`: registered entity schemas, keyed by GUID.
//! - `elements`: storage elements. `unique_id` is the handle handed out to
//!   callers; it is never reused, even after the element is deleted.
//! - `entities`: one JSON payload per (element, schema) pair.
//!
//! Every write runs inside a transaction, so a failed save leaves the
//! document unchanged.

use crate::storage::document::{DocumentStore, Schema};
use crate::storage::StorageResult;
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const DOCUMENT_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS schemas (
        guid TEXT PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS elements (
        element_id INTEGER PRIMARY KEY AUTOINCREMENT,
        unique_id TEXT NOT NULL UNIQUE
    );
    CREATE TABLE IF NOT EXISTS entities (
        unique_id TEXT NOT NULL,
        schema_guid TEXT NOT NULL,
        json TEXT NOT NULL,
        PRIMARY KEY (unique_id, schema_guid)
    );
";

pub struct SqliteDocument {
    conn: Connection,
}

impl SqliteDocument {
    /// Opens (or creates) a document file.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        log::info!("Opening host document {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// A throwaway document that lives only as long as this value.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(DOCUMENT_SCHEMA)?;
        Ok(Self { conn })
    }

    fn element_exists(tx: &Transaction<'_>, unique_id: &str) -> StorageResult<bool> {
        let found = tx
            .query_row(
                "SELECT 1 FROM elements WHERE unique_id = ?1",
                params![unique_id],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Creates a storage element. Unique ids follow the `<guid>-<element id
    /// in hex>` shape hosts commonly use for persistent element ids.
    fn create_element(tx: &Transaction<'_>) -> StorageResult<String> {
        let next_id: i64 = tx.query_row(
            "SELECT COALESCE(MAX(element_id), 0) + 1 FROM elements",
            [],
            |row| row.get(0),
        )?;
        let unique_id = format!("{}-{:08x}", Uuid::new_v4(), next_id);
        tx.execute(
            "INSERT INTO elements (element_id, unique_id) VALUES (?1, ?2)",
            params![next_id, &unique_id],
        )?;
        Ok(unique_id)
    }
}

impl DocumentStore for SqliteDocument {
    fn lookup_schema(&self, guid: Uuid) -> StorageResult<Option<Schema>> {
        let name: Option<String> = self
            .conn
            .query_row(
                "SELECT name FROM schemas WHERE guid = ?1",
                params![guid.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name.map(|name| Schema { guid, name }))
    }

    fn register_schema(&mut self, guid: Uuid, name: &str) -> StorageResult<Schema> {
        self.conn.execute(
            "INSERT OR IGNORE INTO schemas (guid, name) VALUES (?1, ?2)",
            params![guid.to_string(), name],
        )?;
        Ok(Schema {
            guid,
            name: name.to_string(),
        })
    }

    fn save(&mut self, schema: &Schema, json: &str, handle: Option<&str>) -> StorageResult<String> {
        let tx = self.conn.transaction()?;

        let unique_id = match handle.filter(|h| !h.is_empty()) {
            Some(existing) if Self::element_exists(&tx, existing)? => existing.to_string(),
            Some(missing) => {
                log::warn!(
                    "Storage element {} not found; creating a new one for {}",
                    missing,
                    schema.name
                );
                Self::create_element(&tx)?
            }
            None => Self::create_element(&tx)?,
        };

        tx.execute(
            "INSERT INTO entities (unique_id, schema_guid, json) VALUES (?1, ?2, ?3)
             ON CONFLICT (unique_id, schema_guid) DO UPDATE SET json = excluded.json",
            params![&unique_id, schema.guid.to_string(), json],
        )?;
        tx.commit()?;

        Ok(unique_id)
    }

    fn load(&self, handle: &str, schema: &Schema) -> StorageResult<Option<String>> {
        let json = self
            .conn
            .query_row(
                "SELECT json FROM entities WHERE unique_id = ?1 AND schema_guid = ?2",
                params![handle, schema.guid.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(json)
    }

    fn delete(&mut self, handle: &str) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM entities WHERE unique_id = ?1", params![handle])?;
        tx.execute("DELETE FROM elements WHERE unique_id = ?1", params![handle])?;
        tx.commit()?;
        Ok(())
    }

    fn list_handles(&self, schema: &Schema) -> StorageResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT e.unique_id FROM entities e
             JOIN elements el ON el.unique_id = e.unique_id
             WHERE e.schema_guid = ?1
             ORDER BY el.element_id",
        )?;
        let handles = stmt
            .query_map(params![schema.guid.to_string()], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    fn schema(name: &str) -> Schema {
        Schema {
            guid: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    #[test]
    fn save_without_handle_creates_element() {
        let mut doc = SqliteDocument::open_in_memory().unwrap();
        let s = schema("a");

        let first = doc.save(&s, "{}", None).unwrap();
        let second = doc.save(&s, "{}", None).unwrap();

        assert_ne!(first, second);
        assert!(first.ends_with("-00000001"));
        assert_eq!(doc.list_handles(&s).unwrap(), vec![first, second]);
    }

    #[test]
    fn save_with_handle_overwrites_in_place() {
        let mut doc = SqliteDocument::open_in_memory().unwrap();
        let s = schema("a");

        let handle = doc.save(&s, r#"{"v":1}"#, None).unwrap();
        let again = doc.save(&s, r#"{"v":2}"#, Some(&handle)).unwrap();

        assert_eq!(handle, again);
        assert_eq!(doc.load(&handle, &s).unwrap().as_deref(), Some(r#"{"v":2}"#));
        assert_eq!(doc.list_handles(&s).unwrap().len(), 1);
    }

    #[test]
    fn save_with_unknown_handle_creates_new_element() {
        let mut doc = SqliteDocument::open_in_memory().unwrap();
        let s = schema("a");

        let handle = doc.save(&s, "{}", Some("missing")).unwrap();
        assert_ne!(handle, "missing");
        assert_eq!(doc.list_handles(&s).unwrap(), vec![handle]);
    }

    #[test]
    fn unusable_document_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("taken");
        fs::write(&blocker, b"not a directory").unwrap();

        let result = SqliteDocument::open(blocker.join("doc.sqlite"));
        assert!(matches!(result, Err(StorageError::Io(_))));
    }

    #[test]
    fn entities_are_scoped_by_schema() {
        let mut doc = SqliteDocument::open_in_memory().unwrap();
        let a = schema("a");
        let b = schema("b");

        let handle = doc.save(&a, "{}", None).unwrap();

        assert!(doc.load(&handle, &b).unwrap().is_none());
        assert!(doc.list_handles(&b).unwrap().is_empty());
    }

    #[test]
    fn delete_removes_element_and_ignores_unknown() {
        let mut doc = SqliteDocument::open_in_memory().unwrap();
        let s = schema("a");
        let handle = doc.save(&s, "{}", None).unwrap();

        doc.delete(&handle).unwrap();
        doc.delete("never-existed").unwrap();

        assert!(doc.load(&handle, &s).unwrap().is_none());
        assert!(doc.list_handles(&s).unwrap().is_empty());
    }

    #[test]
    fn schema_registration_is_idempotent() {
        let mut doc = SqliteDocument::open_in_memory().unwrap();
        let guid = Uuid::new_v4();

        assert!(doc.lookup_schema(guid).unwrap().is_none());
        doc.register_schema(guid, "Checklist").unwrap();
        doc.register_schema(guid, "Checklist").unwrap();

        assert_eq!(
            doc.lookup_schema(guid).unwrap(),
            Some(Schema {
                guid,
                name: "Checklist".to_string()
            })
        );
    }

    #[test]
    fn file_document_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.sqlite");
        let s = schema("a");

        let handle = {
            let mut doc = SqliteDocument::open(&path).unwrap();
            doc.register_schema(s.guid, &s.name).unwrap();
            doc.save(&s, r#"{"kept":true}"#, None).unwrap()
        };

        let doc = SqliteDocument::open(&path).unwrap();
        assert!(doc.lookup_schema(s.guid).unwrap().is_some());
        assert_eq!(
            doc.load(&handle, &s).unwrap().as_deref(),
            Some(r#"{"kept":true}"#)
        );
    }
}
