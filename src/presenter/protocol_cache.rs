use std::num::NonZeroUsize;

use lru::LruCache;
use ratatui_image::protocol::StatefulProtocol;

use crate::gallery::RgbaFrame;

use super::traits::{FrameKey, Viewport};

pub(crate) const DEFAULT_MAX_ENTRIES: usize = 96;
pub(crate) const DEFAULT_BUDGET_BYTES: usize = 64 * 1024 * 1024;

/// A frame variant placed in a particular viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ProtocolKey {
    pub(crate) frame: FrameKey,
    pub(crate) viewport: Viewport,
}

pub(crate) enum ProtocolSlot {
    /// Source pixels not yet handed to the encode worker.
    Pending(RgbaFrame),
    Encoding,
    Ready(Box<StatefulProtocol>),
    Failed,
}

pub(crate) struct CachedProtocol {
    pub(crate) slot: ProtocolSlot,
    bytes: usize,
}

/// Terminal protocols keyed by variant and viewport. Bounded by entry count and
/// by the byte size of the source frames they were built from.
pub(crate) struct ProtocolCache {
    budget_bytes: usize,
    used_bytes: usize,
    pub(crate) entries: LruCache<ProtocolKey, CachedProtocol>,
    hits: u64,
    misses: u64,
}

impl Default for ProtocolCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES, DEFAULT_BUDGET_BYTES)
    }
}

impl ProtocolCache {
    pub(crate) fn new(capacity: usize, budget_bytes: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            budget_bytes: budget_bytes.max(1),
            used_bytes: 0,
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    /// Counted lookup that also marks the entry as recently used.
    pub(crate) fn touch(&mut self, key: &ProtocolKey) -> bool {
        let found = self.entries.get(key).is_some();
        if found {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    pub(crate) fn slot_mut(&mut self, key: &ProtocolKey) -> Option<&mut ProtocolSlot> {
        self.entries.peek_mut(key).map(|entry| &mut entry.slot)
    }

    /// Stores `frame` as pending. Frames bigger than the whole budget are only
    /// admitted with `force`, and then replace everything else. While such a
    /// frame is the sole entry, unforced inserts are refused.
    pub(crate) fn insert(
        &mut self,
        key: ProtocolKey,
        frame: RgbaFrame,
        bytes: usize,
        force: bool,
    ) -> bool {
        let oversize = bytes > self.budget_bytes;
        let holding_oversize = self.entries.len() == 1 && self.used_bytes > self.budget_bytes;
        if !force && (oversize || holding_oversize) {
            return false;
        }
        if oversize {
            self.clear();
        }

        if let Some(previous) = self.entries.pop(&key) {
            self.used_bytes = self.used_bytes.saturating_sub(previous.bytes);
        }
        self.used_bytes += bytes;
        if let Some((_, evicted)) = self.entries.push(
            key,
            CachedProtocol {
                slot: ProtocolSlot::Pending(frame),
                bytes,
            },
        ) {
            self.used_bytes = self.used_bytes.saturating_sub(evicted.bytes);
        }

        while self.entries.len() > 1 && self.used_bytes > self.budget_bytes {
            match self.entries.pop_lru() {
                Some((_, evicted)) => {
                    self.used_bytes = self.used_bytes.saturating_sub(evicted.bytes)
                }
                None => break,
            }
        }
        true
    }

    pub(crate) fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            lookups => self.hits as f64 / lookups as f64,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    #[cfg(test)]
    pub(crate) fn limits(&self) -> (usize, usize) {
        (self.entries.cap().get(), self.budget_bytes)
    }

    pub(crate) fn any_encoding(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, entry)| matches!(entry.slot, ProtocolSlot::Encoding))
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.used_bytes = 0;
    }
}
