//! Shared per-transfer progress map.
//!
//! Keys are the feedback id for downloads and a generated task id for
//! upload batches. An entry exists exactly while its transfer is active:
//! `begin` inserts it at 0, `finish` removes it on success, failure and
//! cancellation alike. Nothing is ever left at an intermediate percent,
//! so a stuck indicator cannot block retries.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Cloneable handle to the progress map. Transfer workers write through
/// it; view code polls `percent` / `snapshot`.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    entries: Arc<Mutex<HashMap<String, u32>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transfer at 0%. Returns `false` when an entry for the
    /// key is already active, which doubles as the in-flight guard.
    pub(crate) fn begin(&self, key: &str) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains_key(key) {
            return false;
        }
        entries.insert(key.to_string(), 0);
        true
    }

    /// Raise a transfer's percent. Updates are monotonic: a value below
    /// the current one is ignored, anything above 100 is clamped. Writes
    /// to a key that is not active are dropped.
    pub(crate) fn update(&self, key: &str, percent: u32) {
        let mut entries = self.entries.lock();
        if let Some(current) = entries.get_mut(key) {
            let percent = percent.min(100);
            if percent > *current {
                *current = percent;
            }
        }
    }

    /// Terminal: forget the transfer, whatever its outcome was.
    pub(crate) fn finish(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    /// Current percent of an active transfer, `None` otherwise.
    pub fn percent(&self, key: &str) -> Option<u32> {
        self.entries.lock().get(key).copied()
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.entries.lock().contains_key(key)
    }

    /// Snapshot of every active transfer, for progress display.
    pub fn snapshot(&self) -> HashMap<String, u32> {
        self.entries.lock().clone()
    }
}
