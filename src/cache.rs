use std::collections::HashMap;
use std::hash::Hash;

/// Memoising store injected into the fetch functions.
pub trait MemoCache<K, V> {
    fn get(&mut self, key: &K) -> Option<V>;
    fn put(&mut self, key: K, value: V);
    /// Drops `key` so the next lookup misses.
    fn remove(&mut self, key: &K);
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bounded least-recently-used cache. Capacity is small (tens of entries),
/// so eviction scans for the oldest stamp instead of keeping a linked list.
#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, (V, u64)>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            tick: 0,
            entries: HashMap::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn next_tick(&mut self) -> u64 {
        self.tick = self.tick.wrapping_add(1);
        self.tick
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (_, stamp))| *stamp)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.entries.remove(&key);
        }
    }
}

impl<K: Eq + Hash + Clone, V: Clone> MemoCache<K, V> for LruCache<K, V> {
    fn get(&mut self, key: &K) -> Option<V> {
        let stamp = self.next_tick();
        let (value, last_used) = self.entries.get_mut(key)?;
        *last_used = stamp;
        Some(value.clone())
    }

    fn put(&mut self, key: K, value: V) {
        let stamp = self.next_tick();
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            self.evict_oldest();
        }
        self.entries.insert(key, (value, stamp));
    }

    fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Never stores anything; every lookup misses.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCache;

impl<K, V> MemoCache<K, V> for NoCache {
    fn get(&mut self, _key: &K) -> Option<V> {
        None
    }

    fn put(&mut self, _key: K, _value: V) {}

    fn remove(&mut self, _key: &K) {}

    fn len(&self) -> usize {
        0
    }
}
