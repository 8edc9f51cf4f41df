use std::num::NonZeroUsize;

use lru::LruCache;

use super::frame::RgbaFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evicted: u64,
}

/// Decoded artwork keyed by dataset index. Bounded by entry count and by the
/// bytes of pixel data held.
#[derive(Debug)]
pub struct ImageCache {
    frames: LruCache<usize, RgbaFrame>,
    budget: usize,
    held: usize,
    stats: CacheStats,
}

impl ImageCache {
    pub fn new(max_entries: usize, budget_bytes: usize) -> Self {
        let cap = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            frames: LruCache::new(cap),
            budget: budget_bytes.max(1),
            held: 0,
            stats: CacheStats::default(),
        }
    }

    /// Returns a handle to the cached pixels and marks them recently used.
    pub fn get_cloned(&mut self, work: usize) -> Option<RgbaFrame> {
        let found = self.frames.get(&work).cloned();
        if found.is_some() {
            self.stats.hits += 1;
        } else {
            self.stats.misses += 1;
        }
        found
    }

    /// Looks at cached pixels without touching recency or the hit counters.
    pub fn peek_cloned(&self, work: usize) -> Option<RgbaFrame> {
        self.frames.peek(&work).cloned()
    }

    pub fn contains(&self, work: usize) -> bool {
        self.frames.contains(&work)
    }

    /// Stores a decoded image. An image larger than the whole budget is kept
    /// alone so the artwork on screen can always display.
    pub fn insert(&mut self, work: usize, frame: RgbaFrame) {
        let size = frame.byte_len();
        if let Some(replaced) = self.frames.pop(&work) {
            self.held -= replaced.byte_len();
        }

        if size > self.budget {
            self.stats.evicted += self.frames.len() as u64;
            self.frames.clear();
            self.held = 0;
        }
        if let Some((_, pushed_out)) = self.frames.push(work, frame) {
            self.held -= pushed_out.byte_len();
            self.stats.evicted += 1;
        }
        self.held += size;

        while self.held > self.budget && self.frames.len() > 1 {
            let Some((_, oldest)) = self.frames.pop_lru() else {
                break;
            };
            self.held -= oldest.byte_len();
            self.stats.evicted += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn held_bytes(&self) -> usize {
        self.held
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
