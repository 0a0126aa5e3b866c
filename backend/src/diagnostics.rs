//! Process-wide counters that make otherwise silent behavior visible.
//!
//! Listing tolerates stored blobs that no longer parse: they are skipped so
//! one bad record cannot hide the rest. Each skip is counted here and exposed
//! through `GET /api/diagnostics`.

use crate::storage::StorageKind;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Diagnostics {
    skipped_templates: AtomicU64,
    skipped_checks: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkippedRecords {
    pub templates: u64,
    pub checks: u64,
}

impl Diagnostics {
    pub fn record_skipped(&self, kind: StorageKind) {
        self.counter(kind).fetch_add(1, Ordering::Relaxed);
    }

    pub fn skipped(&self, kind: StorageKind) -> u64 {
        self.counter(kind).load(Ordering::Relaxed)
    }

    pub fn skipped_records(&self) -> SkippedRecords {
        SkippedRecords {
            templates: self.skipped(StorageKind::Template),
            checks: self.skipped(StorageKind::Check),
        }
    }

    fn counter(&self, kind: StorageKind) -> &AtomicU64 {
        match kind {
            StorageKind::Template => &self.skipped_templates,
            StorageKind::Check => &self.skipped_checks,
        }
    }
}
