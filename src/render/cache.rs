//! LRU cache and the text-measurement cache built on it.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

use super::backend::DrawSurface;

/// Capacity of the per-renderer text measurement cache.
pub const TEXT_MEASURE_CACHE_CAP: usize = 4096;

/// A least-recently-used cache with a fixed capacity.
///
/// Lookups promote entries. Promotion appends a new stamp to the recency
/// queue instead of searching it; stale stamps are skipped on eviction and
/// dropped when the queue is compacted.
pub struct LruCache<K: Hash + Eq + Clone, V> {
    entries: HashMap<K, (V, u64)>,
    order: VecDeque<(K, u64)>,
    capacity: usize,
    tick: u64,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// A capacity of 0 disables caching entirely.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            tick: 0,
        }
    }

    /// Look up a value, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        if self.capacity == 0 || !self.entries.contains_key(key) {
            return None;
        }
        let stamp = self.next_tick();
        self.order.push_back((key.clone(), stamp));
        let entry = self.entries.get_mut(key)?;
        entry.1 = stamp;
        self.compact_if_needed();
        self.entries.get(key).map(|(v, _)| v)
    }

    /// Insert or replace a value. Returns `true` if the key was new.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        if self.capacity == 0 {
            return false;
        }
        let stamp = self.next_tick();
        let fresh = self
            .entries
            .insert(key.clone(), (value, stamp))
            .is_none();
        self.order.push_back((key, stamp));
        self.enforce_cap();
        self.compact_if_needed();
        fresh
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn next_tick(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    /// Evict least recently used entries until we're at or below capacity.
    fn enforce_cap(&mut self) {
        while self.entries.len() > self.capacity {
            let Some((oldest, stamp)) = self.order.pop_front() else {
                break;
            };
            if self.entries.get(&oldest).is_some_and(|(_, s)| *s == stamp) {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Drop stale stamps once the queue outgrows the live entries.
    fn compact_if_needed(&mut self) {
        if self.order.len() <= self.capacity.saturating_mul(4).max(16) {
            return;
        }
        let entries = &self.entries;
        self.order
            .retain(|(key, stamp)| entries.get(key).is_some_and(|(_, s)| s == stamp));
    }
}

/// Memoised text widths keyed by `(font, text)`.
pub struct MeasureCache {
    cache: LruCache<String, f64>,
    scratch: String,
}

impl MeasureCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: LruCache::new(capacity),
            scratch: String::new(),
        }
    }

    /// Width of `text` in `font`, measured on `surface` at most once while cached.
    pub fn measure(&mut self, surface: &mut dyn DrawSurface, font: &str, text: &str) -> f64 {
        self.scratch.clear();
        self.scratch.push_str(font);
        self.scratch.push('\n');
        self.scratch.push_str(text);
        if let Some(width) = self.cache.get(&self.scratch) {
            return *width;
        }
        let width = surface.measure_text(text, font);
        self.cache.insert(self.scratch.clone(), width);
        width
    }

    /// Truncate `text` with an ellipsis so it fits in `max_width`.
    ///
    /// Cuts on a char boundary using a binary search over prefix widths.
    pub fn fit<'a>(
        &mut self,
        surface: &mut dyn DrawSurface,
        font: &str,
        text: &'a str,
        max_width: f64,
    ) -> std::borrow::Cow<'a, str> {
        use std::borrow::Cow;

        if self.measure(surface, font, text) <= max_width {
            return Cow::Borrowed(text);
        }
        let ellipsis = "\u{2026}";
        let available = max_width - self.measure(surface, font, ellipsis);
        if available <= 0.0 {
            return Cow::Borrowed("");
        }

        let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let mut low = 0;
        let mut high = bounds.len();
        while low < high {
            let mid = (low + high).div_ceil(2);
            let end = bounds.get(mid).copied().unwrap_or(text.len());
            let width = self.measure(surface, font, text.get(..end).unwrap_or(text));
            if width <= available {
                low = mid;
            } else {
                high = mid - 1;
            }
        }
        let end = bounds.get(low).copied().unwrap_or(text.len());
        let mut truncated = text.get(..end).unwrap_or("").to_string();
        truncated.push_str(ellipsis);
        Cow::Owned(truncated)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::render::RecordingSurface;

    #[test]
    fn test_eviction_prefers_least_recently_used() {
        let mut cache: LruCache<String, i32> = LruCache::new(2);
        cache.insert("a".to_string(), 1);
        cache.insert("b".to_string(), 2);
        // touch "a" so "b" becomes the eviction candidate
        assert_eq!(cache.get(&"a".to_string()), Some(&1));
        cache.insert("c".to_string(), 3);

        assert_eq!(cache.get(&"b".to_string()), None);
        assert_eq!(cache.get(&"a".to_string()), Some(&1));
        assert_eq!(cache.get(&"c".to_string()), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_zero_capacity() {
        let mut cache: LruCache<String, i32> = LruCache::new(0);
        assert!(!cache.insert("a".to_string(), 1));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_insert_replaces() {
        let mut cache: LruCache<u32, i32> = LruCache::new(3);
        assert!(cache.insert(1, 1));
        assert!(!cache.insert(1, 2));
        assert_eq!(cache.get(&1), Some(&2));
    }

    #[test]
    fn test_many_hits_stay_bounded() {
        let mut cache: LruCache<u32, u32> = LruCache::new(2);
        cache.insert(1, 1);
        for _ in 0..1000 {
            cache.get(&1);
        }
        assert!(cache.order.len() <= 16);
        cache.insert(2, 2);
        cache.insert(3, 3);
        assert!(cache.contains_key(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_measure_is_memoised() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut cache = MeasureCache::new(8);
        assert_eq!(cache.measure(&mut surface, "12px Arial", "abcd"), 28.0);
        assert_eq!(cache.measure(&mut surface, "12px Arial", "abcd"), 28.0);
        assert_eq!(surface.measure_calls(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_fit_truncates_on_char_boundary() {
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut cache = MeasureCache::new(64);
        assert_eq!(cache.fit(&mut surface, "f", "short", 100.0), "short");
        // 7px per char: 35px leaves room for 4 chars plus the ellipsis
        assert_eq!(cache.fit(&mut surface, "f", "héllo wörld", 35.0), "héll\u{2026}");
        assert_eq!(cache.fit(&mut surface, "f", "abc", 5.0), "");
    }
}
