use pagecache::{FixedSlidingCache, RecordKey, SlidingCacheOptions, Step};

use crate::MemoryStore;

/// Delivers every pending store response to `cache` until it is idle.
///
/// Returns the number of responses delivered.
pub fn pump_sliding<T, K>(cache: &mut FixedSlidingCache<T, K, MemoryStore<T>>) -> usize
where
    T: Clone,
    K: RecordKey,
{
    let mut delivered = 0;
    while let Some(response) = cache.provider_mut().next_response() {
        cache.on_response(response);
        delivered += 1;
    }
    delivered
}

/// "Next/previous" navigation over a long sequence, for playback-style consumers.
///
/// Each step first repositions the sliding window around the current key and settles it, so
/// the neighbor lookup never misses at a window edge.
#[derive(Debug)]
pub struct Navigator<T, K> {
    cache: FixedSlidingCache<T, K, MemoryStore<T>>,
}

impl<T: Clone, K: RecordKey> Navigator<T, K> {
    pub fn new(options: SlidingCacheOptions<T, K>, store: MemoryStore<T>) -> Self {
        let mut cache = FixedSlidingCache::new(options, store);
        cache.initialize();
        pump_sliding(&mut cache);
        Self { cache }
    }

    pub fn cache(&self) -> &FixedSlidingCache<T, K, MemoryStore<T>> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut FixedSlidingCache<T, K, MemoryStore<T>> {
        &mut self.cache
    }

    pub fn store(&self) -> &MemoryStore<T> {
        self.cache.provider()
    }

    /// Key of the first record in the sequence, if it is cached.
    pub fn first(&self) -> Option<K> {
        let window = self.cache.window();
        if window.offset() != 0 {
            return None;
        }
        window.get(0).map(|record| (self.cache.options().get_key)(record))
    }

    pub fn next(&mut self, key: &K) -> Option<K> {
        self.step(key, Step::Next)
    }

    pub fn previous(&mut self, key: &K) -> Option<K> {
        self.step(key, Step::Previous)
    }

    /// Reloads the window from the start of the sequence.
    pub fn reload(&mut self) {
        self.cache.initialize();
        pump_sliding(&mut self.cache);
    }

    fn step(&mut self, key: &K, step: Step) -> Option<K> {
        self.cache.refresh(key.clone());
        pump_sliding(&mut self.cache);
        let neighbor = self.cache.neighbor(key, step);
        ptrace!(?step, found = neighbor.is_some(), "Navigator::step");
        neighbor
    }
}
