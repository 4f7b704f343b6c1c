use std::collections::HashMap;
use std::hash::Hash;

/// A bounded map with least-recently-used eviction.
///
/// Recency is tracked with a monotonically increasing tick per access.
/// Eviction scans for the minimum tick, which is `O(len)`, but the only
/// cache in this crate with a bound holds at most 1,000 entries and misses
/// are dominated by an oracle query anyway.
#[derive(Debug)]
pub(crate) struct Lru<K, V> {
    map: HashMap<K, (V, u64)>,
    capacity: usize,
    tick: u64,
}

impl<K: Eq + Hash + Clone, V: Clone> Lru<K, V> {
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// `capacity` must be non-zero.
    pub(crate) fn new(capacity: usize) -> Lru<K, V> {
        assert!(capacity > 0, "LRU capacity must be non-zero");
        Lru { map: HashMap::new(), capacity, tick: 0 }
    }

    /// Returns a copy of the value for `key` and marks it most recently
    /// used.
    pub(crate) fn get(&mut self, key: &K) -> Option<V> {
        self.tick += 1;
        let tick = self.tick;
        let (value, last_used) = self.map.get_mut(key)?;
        *last_used = tick;
        Some(value.clone())
    }

    /// Inserts a value, evicting the least recently used entry when full.
    ///
    /// Re-inserting an existing key overwrites it in place. Population is
    /// expected to be idempotent, so a racing recompute-and-overwrite with
    /// an identical value is harmless.
    pub(crate) fn insert(&mut self, key: K, value: V) {
        self.tick += 1;
        if !self.map.contains_key(&key) && self.map.len() >= self.capacity {
            let evictee = self
                .map
                .iter()
                .min_by_key(|(_, (_, tick))| *tick)
                .map(|(k, _)| k.clone());
            if let Some(evictee) = evictee {
                self.map.remove(&evictee);
            }
        }
        self.map.insert(key, (value, self.tick));
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }
}
