use crate::diagnostics::Diagnostics;
use crate::storage::document::{DocumentStore, Schema};
use crate::storage::{StorageKind, StorageResult};
use std::collections::HashMap;
use std::sync::Arc;

/// Stores JSON blobs in the host document, one schema per `StorageKind`.
///
/// Lives on the host context together with the document. Schemas are looked
/// up (or registered) the first time a kind is used and cached afterwards.
pub struct BlobStore {
    document: Box<dyn DocumentStore>,
    schemas: HashMap<StorageKind, Schema>,
    pub(crate) diagnostics: Arc<Diagnostics>,
}

impl BlobStore {
    pub fn new(document: Box<dyn DocumentStore>, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            document,
            schemas: HashMap::new(),
            diagnostics,
        }
    }

    /// Saves `json` as a blob of `kind`. With a handle, the blob behind it is
    /// overwritten; the returned handle is the one to use from now on.
    pub fn save_json(
        &mut self,
        kind: StorageKind,
        json: &str,
        handle: Option<&str>,
    ) -> StorageResult<String> {
        let schema = resolve_schema(&mut self.schemas, self.document.as_mut(), kind)?;
        let handle = self.document.save(schema, json, handle)?;
        log::debug!("Saved {} blob {}", kind, handle);
        Ok(handle)
    }

    /// Loads the blob of `kind` behind `handle`, if there is one.
    pub fn load_json(&mut self, handle: &str, kind: StorageKind) -> StorageResult<Option<String>> {
        let schema = resolve_schema(&mut self.schemas, self.document.as_mut(), kind)?;
        self.document.load(handle, schema)
    }

    pub fn delete(&mut self, handle: &str) -> StorageResult<()> {
        self.document.delete(handle)?;
        log::debug!("Deleted blob {}", handle);
        Ok(())
    }

    /// Handles of every blob of `kind`. Blobs of other kinds are excluded.
    pub fn handles(&mut self, kind: StorageKind) -> StorageResult<Vec<String>> {
        let schema = resolve_schema(&mut self.schemas, self.document.as_mut(), kind)?;
        self.document.list_handles(schema)
    }
}

fn resolve_schema<'a>(
    cache: &'a mut HashMap<StorageKind, Schema>,
    document: &mut dyn DocumentStore,
    kind: StorageKind,
) -> StorageResult<&'a Schema> {
    if !cache.contains_key(&kind) {
        let schema = match document.lookup_schema(kind.schema_guid())? {
            Some(schema) => schema,
            None => {
                log::info!("Registering {} schema {}", kind, kind.schema_guid());
                document.register_schema(kind.schema_guid(), kind.schema_name())?
            }
        };
        cache.insert(kind, schema);
    }
    Ok(&cache[&kind])
}
