use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::cache::lru::LruMap;
use crate::surface::image::RasterImage;

/// Default byte budget: two 1024x1024 RGBA8 images.
pub const DEFAULT_CAPACITY_BYTES: usize = 1024 * 1024 * 4 * 2;

/// Environment variable overriding the capacity of [`ImageCache::shared`].
pub const CAPACITY_ENV_VAR: &str = "RINGS_CACHE_CAPACITY_BYTES";

/// Byte cost of a cache entry.
pub type CostFn = dyn Fn(&RasterImage) -> usize + Send + Sync;

/// Counters accumulated over the cache lifetime.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups that found an entry.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
    /// Insertions, including replacements.
    pub puts: u64,
    /// Entries dropped to honor the byte budget.
    pub evictions: u64,
}

struct Entry {
    image: RasterImage,
    cost: usize,
}

struct CacheState {
    entries: LruMap<String, Entry>,
    size_bytes: usize,
    capacity_bytes: usize,
    stats: CacheStats,
}

impl CacheState {
    fn evict_to(&mut self, max_bytes: usize) {
        while self.size_bytes > max_bytes {
            let Some((key, entry)) = self.entries.pop_lru() else {
                break;
            };
            self.size_bytes = self.size_bytes.saturating_sub(entry.cost);
            self.stats.evictions += 1;
            tracing::debug!(key = %key, cost = entry.cost, size = self.size_bytes, "evicted cache entry");
        }
    }
}

/// Byte-bounded LRU cache from string keys to rendered images.
///
/// Every operation locks internal state, so a cache can be shared across threads. Inserting
/// past the budget evicts least recently used entries, including the new entry itself when it
/// alone exceeds the capacity.
pub struct ImageCache {
    state: Mutex<CacheState>,
    cost_fn: Box<CostFn>,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ImageCache")
            .field("len", &state.entries.len())
            .field("size_bytes", &state.size_bytes)
            .field("capacity_bytes", &state.capacity_bytes)
            .field("stats", &state.stats)
            .finish()
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_BYTES)
    }
}

impl ImageCache {
    /// Cache charging each image its raw pixel byte count.
    pub fn new(capacity_bytes: usize) -> Self {
        Self::with_cost_fn(capacity_bytes, RasterImage::byte_len)
    }

    /// Cache charging each image `cost_fn(image)` bytes.
    pub fn with_cost_fn(
        capacity_bytes: usize,
        cost_fn: impl Fn(&RasterImage) -> usize + Send + Sync + 'static,
    ) -> Self {
        Self {
            state: Mutex::new(CacheState {
                entries: LruMap::new(),
                size_bytes: 0,
                capacity_bytes,
                stats: CacheStats::default(),
            }),
            cost_fn: Box::new(cost_fn),
        }
    }

    /// Process-wide cache, created on first use.
    ///
    /// Capacity is [`DEFAULT_CAPACITY_BYTES`] unless [`CAPACITY_ENV_VAR`] holds a positive
    /// integer.
    pub fn shared() -> &'static ImageCache {
        static SHARED: OnceLock<ImageCache> = OnceLock::new();
        SHARED.get_or_init(|| {
            let capacity = std::env::var(CAPACITY_ENV_VAR)
                .ok()
                .and_then(|v| v.trim().parse::<usize>().ok())
                .filter(|&n| n > 0)
                .unwrap_or(DEFAULT_CAPACITY_BYTES);
            tracing::debug!(capacity, "created shared image cache");
            ImageCache::new(capacity)
        })
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Every mutation leaves the state consistent, so a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&self, key: &str) -> Option<RasterImage> {
        let mut state = self.lock();
        let hit = state.entries.get(key).map(|e| e.image.clone());
        match hit {
            Some(_) => {
                state.stats.hits += 1;
                tracing::debug!(key, "image cache hit");
            }
            None => {
                state.stats.misses += 1;
                tracing::debug!(key, "image cache miss");
            }
        }
        hit
    }

    /// Insert `image` under `key` as the most recently used entry and return the image it
    /// replaced, if any.
    pub fn put(&self, key: impl Into<String>, image: RasterImage) -> Option<RasterImage> {
        let cost = (self.cost_fn)(&image);
        let mut state = self.lock();
        let previous = state.entries.insert(key.into(), Entry { image, cost });
        if let Some(prev) = &previous {
            state.size_bytes = state.size_bytes.saturating_sub(prev.cost);
        }
        state.size_bytes = state.size_bytes.saturating_add(cost);
        state.stats.puts += 1;
        let capacity = state.capacity_bytes;
        state.evict_to(capacity);
        previous.map(|e| e.image)
    }

    /// Return the cached image for `key`, or build it with `factory` and cache the result.
    ///
    /// The lock is not held while `factory` runs: concurrent misses on one key may each run
    /// their factory, and the last insertion wins.
    pub fn get_or_compute(&self, key: &str, factory: impl FnOnce() -> RasterImage) -> RasterImage {
        if let Some(hit) = self.get(key) {
            return hit;
        }
        let image = factory();
        self.put(key, image.clone());
        image
    }

    /// Fallible [`get_or_compute`](Self::get_or_compute); errors are returned and not cached.
    pub fn try_get_or_compute<E>(
        &self,
        key: &str,
        factory: impl FnOnce() -> Result<RasterImage, E>,
    ) -> Result<RasterImage, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let image = factory()?;
        self.put(key, image.clone());
        Ok(image)
    }

    /// Remove `key`, returning its image.
    pub fn remove(&self, key: &str) -> Option<RasterImage> {
        let mut state = self.lock();
        let entry = state.entries.remove(key)?;
        state.size_bytes = state.size_bytes.saturating_sub(entry.cost);
        Some(entry.image)
    }

    /// Drop every entry. Statistics are kept.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.size_bytes = 0;
    }

    /// Evict least recently used entries until at most `max_bytes` are held.
    pub fn trim_to_size(&self, max_bytes: usize) {
        self.lock().evict_to(max_bytes);
    }

    /// Change the byte budget, evicting as needed.
    pub fn resize(&self, capacity_bytes: usize) {
        let mut state = self.lock();
        state.capacity_bytes = capacity_bytes;
        state.evict_to(capacity_bytes);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Return `true` when no entries are held.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Return `true` if `key` is cached. Does not affect recency or statistics.
    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().entries.contains_key(key)
    }

    /// Total cost of the held entries.
    pub fn size_bytes(&self) -> usize {
        self.lock().size_bytes
    }

    /// Byte budget.
    pub fn capacity_bytes(&self) -> usize {
        self.lock().capacity_bytes
    }

    /// Keys from least to most recently used.
    pub fn keys(&self) -> Vec<String> {
        self.lock().entries.iter().map(|(k, _)| k.clone()).collect()
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> CacheStats {
        self.lock().stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/cache/image_cache.rs"]
mod tests;
