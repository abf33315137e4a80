use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::identifiers::TopicSlug;

/// One mutex per topic slug, created on first use.
///
/// Serializes read-merge-write cycles on the same registry inside one
/// process. Separate processes sharing a storage root are not covered.
///
/// Entries are never evicted: the table holds one small mutex for every
/// slug merged since the store was created.
#[derive(Debug, Default)]
pub struct SlugLocks {
    table: Mutex<HashMap<TopicSlug, Arc<Mutex<()>>>>,
}

impl SlugLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock handle for `slug`. Hold `handle.lock()` for the whole cycle.
    pub fn handle(&self, slug: &TopicSlug) -> Arc<Mutex<()>> {
        // A panic while holding the table lock cannot leave the map invalid.
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table
            .entry(slug.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Acquire a slug mutex, ignoring poisoning from an earlier panicked merge.
pub fn acquire(handle: &Mutex<()>) -> MutexGuard<'_, ()> {
    handle.lock().unwrap_or_else(PoisonError::into_inner)
}
