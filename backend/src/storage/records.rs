//! Typed records on top of `BlobStore`.
//!
//! Records are stored as their compact JSON form. The storage handle is
//! assigned by the document, so on every load it is taken from the element the
//! blob was read from rather than from the blob itself.

use crate::storage::blob_store::BlobStore;
use crate::storage::{StorageKind, StorageResult};
use common::model::check::Check;
use common::model::template::Template;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

/// A model persisted as one blob in the host document.
pub trait StoredRecord: Serialize + DeserializeOwned + Send + 'static {
    const KIND: StorageKind;

    fn id(&self) -> Uuid;
    fn handle(&self) -> &str;
    fn set_handle(&mut self, handle: String);
}

impl StoredRecord for Template {
    const KIND: StorageKind = StorageKind::Template;

    fn id(&self) -> Uuid {
        self.id
    }

    fn handle(&self) -> &str {
        &self.data_storage_unique_id
    }

    fn set_handle(&mut self, handle: String) {
        self.data_storage_unique_id = handle;
    }
}

impl StoredRecord for Check {
    const KIND: StorageKind = StorageKind::Check;

    fn id(&self) -> Uuid {
        self.id
    }

    fn handle(&self) -> &str {
        &self.data_storage_unique_id
    }

    fn set_handle(&mut self, handle: String) {
        self.data_storage_unique_id = handle;
    }
}

impl BlobStore {
    /// Loads every record of type `T`.
    ///
    /// Blobs that do not parse are skipped, logged and counted in the
    /// diagnostics instead of failing the whole listing.
    pub fn list<T: StoredRecord>(&mut self) -> StorageResult<Vec<T>> {
        let handles = self.handles(T::KIND)?;
        let mut records = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Some(record) = self.load::<T>(&handle)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Loads the record behind `handle`. An unreadable blob counts as absent.
    pub fn load<T: StoredRecord>(&mut self, handle: &str) -> StorageResult<Option<T>> {
        let Some(json) = self.load_json(handle, T::KIND)? else {
            return Ok(None);
        };
        match serde_json::from_str::<T>(&json) {
            Ok(mut record) => {
                record.set_handle(handle.to_string());
                Ok(Some(record))
            }
            Err(e) => {
                log::warn!("Skipping unreadable {} blob {}: {}", T::KIND, handle, e);
                self.diagnostics.record_skipped(T::KIND);
                Ok(None)
            }
        }
    }

    /// Finds a record by identity by scanning all records of its kind.
    pub fn find<T: StoredRecord>(&mut self, id: Uuid) -> StorageResult<Option<T>> {
        Ok(self.list::<T>()?.into_iter().find(|record| record.id() == id))
    }

    /// Persists a new record and stores the assigned handle in it.
    pub fn insert<T: StoredRecord>(&mut self, record: &mut T) -> StorageResult<()> {
        record.set_handle(String::new());
        let json = serde_json::to_string(record)?;
        let handle = self.save_json(T::KIND, &json, None)?;
        record.set_handle(handle);
        Ok(())
    }

    /// Re-persists an existing record under its current handle.
    pub fn replace<T: StoredRecord>(&mut self, record: &mut T) -> StorageResult<()> {
        let json = serde_json::to_string(record)?;
        let handle = self.save_json(T::KIND, &json, Some(record.handle()))?;
        if handle != record.handle() {
            log::warn!(
                "{} {} moved from {} to {}",
                T::KIND,
                record.id(),
                record.handle(),
                handle
            );
            record.set_handle(handle);
        }
        Ok(())
    }

    pub fn remove<T: StoredRecord>(&mut self, record: &T) -> StorageResult<()> {
        self.delete(record.handle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::blob_store::tests::memory_store;
    use chrono::{TimeZone, Utc};
    use common::model::template::{ItemType, TemplateItem, TemplateSection};

    fn fire_safety() -> Template {
        Template {
            id: Uuid::new_v4(),
            name: "Fire Safety".into(),
            description: "Quarterly walk-through".into(),
            sections: vec![TemplateSection {
                id: Uuid::new_v4(),
                name: "Exits".into(),
                items: vec![
                    TemplateItem {
                        id: Uuid::new_v4(),
                        label: "Door unlocked?".into(),
                        item_type: ItemType::Checkbox,
                        options: None,
                    },
                    TemplateItem {
                        id: Uuid::new_v4(),
                        label: "Signage".into(),
                        item_type: ItemType::Dropdown,
                        options: Some(vec!["ok".into(), "missing".into()]),
                    },
                ],
            }],
            created_by: "alice".into(),
            created_date: Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            ..Template::default()
        }
    }

    #[test]
    fn insert_then_load_round_trips() {
        let mut store = memory_store();
        let mut template = fire_safety();

        store.insert(&mut template).unwrap();
        assert!(!template.data_storage_unique_id.is_empty());

        let loaded: Template = store.load(&template.data_storage_unique_id).unwrap().unwrap();
        assert_eq!(loaded, template);
    }

    #[test]
    fn replace_keeps_the_handle() {
        let mut store = memory_store();
        let mut template = fire_safety();
        store.insert(&mut template).unwrap();
        let handle = template.data_storage_unique_id.clone();

        template.name = "Fire Safety v2".into();
        store.replace(&mut template).unwrap();
        template.archived = true;
        store.replace(&mut template).unwrap();

        assert_eq!(template.data_storage_unique_id, handle);
        let all: Vec<Template> = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].data_storage_unique_id, handle);
        assert!(all[0].archived);
    }

    #[test]
    fn list_skips_and_counts_unreadable_blobs() {
        let mut store = memory_store();
        let mut template = fire_safety();
        store.insert(&mut template).unwrap();
        store
            .save_json(StorageKind::Template, "{ not json", None)
            .unwrap();
        store
            .save_json(StorageKind::Template, r#"{"sections": 5}"#, None)
            .unwrap();

        let all: Vec<Template> = store.list().unwrap();

        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, template.id);
        assert_eq!(store.diagnostics.skipped(StorageKind::Template), 2);
        assert_eq!(store.diagnostics.skipped(StorageKind::Check), 0);
    }

    #[test]
    fn find_by_identity_and_kind() {
        let mut store = memory_store();
        let mut template = fire_safety();
        store.insert(&mut template).unwrap();
        let mut check = Check {
            id: Uuid::new_v4(),
            template_unique_id: template.data_storage_unique_id.clone(),
            template_snapshot: template.clone(),
            ..Check::default()
        };
        store.insert(&mut check).unwrap();

        assert_eq!(store.find::<Template>(template.id).unwrap(), Some(template.clone()));
        assert_eq!(store.find::<Check>(check.id).unwrap(), Some(check));
        assert!(store.find::<Check>(template.id).unwrap().is_none());
        assert!(store.find::<Template>(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn remove_deletes_record() {
        let mut store = memory_store();
        let mut template = fire_safety();
        store.insert(&mut template).unwrap();

        store.remove(&template).unwrap();

        assert!(store.list::<Template>().unwrap().is_empty());
    }
}
