//! Bulk trace snapshots carried across thread boundaries.

use super::{TraceBlob, TraceKey};
use std::collections::HashMap;

/// The result of bulk-reading one thread's trace slots.
///
/// A snapshot holds one entry per key registered at capture time. Keys the
/// captured thread never wrote are explicitly absent rather than filled
/// with a placeholder blob, so a restorer can tell "no data" from real
/// data.
#[derive(Debug, Clone, Default)]
pub struct TraceSnapshot {
    entries: HashMap<TraceKey, Option<TraceBlob>>,
}

impl TraceSnapshot {
    pub(crate) fn from_entries(entries: HashMap<TraceKey, Option<TraceBlob>>) -> Self {
        Self { entries }
    }

    /// Returns the blob captured for a key, if one was present.
    #[must_use]
    pub fn get(&self, key: &TraceKey) -> Option<&TraceBlob> {
        self.entries.get(key).and_then(Option::as_ref)
    }

    /// Returns true if the key had no blob at capture time.
    ///
    /// Keys outside the captured registry also read as absent.
    #[must_use]
    pub fn is_absent(&self, key: &TraceKey) -> bool {
        self.get(key).is_none()
    }

    /// Returns the captured keys, present or absent.
    pub fn keys(&self) -> impl Iterator<Item = &TraceKey> {
        self.entries.keys()
    }

    /// Extracts the present entries, for restoring into another thread's
    /// slots with partial-update semantics.
    #[must_use]
    pub fn present(&self) -> HashMap<TraceKey, TraceBlob> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.clone().map(|blob| (k.clone(), blob)))
            .collect()
    }

    /// Returns the number of present entries.
    #[must_use]
    pub fn present_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Returns the number of captured keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no keys were captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
