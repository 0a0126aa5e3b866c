//! The host context and the collaborators that live on it.
//!
//! `Host` is the value owned by the host thread: the document (behind the
//! blob adapter), the element picker and the host's operator name. It is
//! only ever reached through a `HostBridge<Host>`, which guarantees one
//! caller at a time.

pub mod bridge;
pub mod selection;
pub mod user;

pub use bridge::{spawn, BridgeCounters, BridgeError, BridgeResult, HostBridge, HostThread};

use crate::host::selection::ElementPicker;
use crate::host::user::{HostUsername, NoHostUsername};
use crate::storage::blob_store::BlobStore;
use crate::storage::{StorageKind, StorageResult};
use common::requests::SelectElementsRequest;

pub struct Host {
    blobs: BlobStore,
    picker: Box<dyn ElementPicker>,
    username: Box<dyn HostUsername>,
}

/// Number of stored blobs per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentSummary {
    pub templates: usize,
    pub checks: usize,
}

impl Host {
    pub fn new(blobs: BlobStore, picker: Box<dyn ElementPicker>) -> Self {
        Self {
            blobs,
            picker,
            username: Box::new(NoHostUsername),
        }
    }

    /// Replaces the source of the host-reported operator name.
    pub fn with_username(mut self, username: Box<dyn HostUsername>) -> Self {
        self.username = username;
        self
    }

    pub fn blobs(&mut self) -> &mut BlobStore {
        &mut self.blobs
    }

    /// Asks the operator to pick elements. A single-element request never
    /// returns more than one id, whatever the picker hands back.
    pub fn pick_elements(&mut self, request: &SelectElementsRequest) -> Vec<String> {
        let mut picked = self.picker.pick(request);
        if !request.allows_multiple() {
            picked.truncate(1);
        }
        picked
    }

    /// The operator name reported by the host application, if any.
    pub fn reported_username(&mut self) -> Option<String> {
        self.username.host_username()
    }

    pub fn summary(&mut self) -> StorageResult<DocumentSummary> {
        Ok(DocumentSummary {
            templates: self.blobs.handles(StorageKind::Template)?.len(),
            checks: self.blobs.handles(StorageKind::Check)?.len(),
        })
    }
}
