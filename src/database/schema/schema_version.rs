use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared schema generation counter. The database and every collection it
/// owns hold a clone, so a shape change anywhere is visible to the catalog.
#[derive(Debug, Clone, Default)]
pub struct SchemaVersion(Arc<AtomicU64>);

impl SchemaVersion {
    pub fn current(&self) -> u64 {
        self.0.load(Ordering::Acquire)
    }

    pub fn bump(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}
