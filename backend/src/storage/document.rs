use crate::storage::StorageResult;
use uuid::Uuid;

/// A registered entity schema in the host document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub guid: Uuid,
    pub name: String,
}

/// The host document's persistence surface.
///
/// Implementations are owned by the host context and are never shared
/// between threads, so none of these methods need to be thread-safe.
///
/// The model is that of extensible storage: the document holds storage
/// elements named by an opaque unique id (the handle), and each element can
/// carry one JSON entity per schema.
pub trait DocumentStore {
    fn lookup_schema(&self, guid: Uuid) -> StorageResult<Option<Schema>>;

    fn register_schema(&mut self, guid: Uuid, name: &str) -> StorageResult<Schema>;

    /// Writes `json` as the `schema` entity of the element named by `handle`.
    ///
    /// Without a handle, or when the handle names no element, a new element
    /// is created. Returns the handle of the element written to.
    fn save(&mut self, schema: &Schema, json: &str, handle: Option<&str>) -> StorageResult<String>;

    /// Reads the `schema` entity of an element. `None` when the element does
    /// not exist or carries no entity of that schema.
    fn load(&self, handle: &str, schema: &Schema) -> StorageResult<Option<String>>;

    /// Removes an element with all its entities. Unknown handles are ignored.
    fn delete(&mut self, handle: &str) -> StorageResult<()>;

    /// Handles of every element carrying an entity of `schema`, in creation
    /// order.
    fn list_handles(&self, schema: &Schema) -> StorageResult<Vec<String>>;
}
