use std::collections::{HashMap, VecDeque};

use log::debug;

use crate::config::ChatConfig;

/// Point-in-time view of cache occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub bytes: usize,
    pub count_limit: usize,
    pub byte_limit: usize,
}

/// Bounded map from exact message text to the response it produced.
///
/// Eviction is first-in first-out: lookups do not refresh an entry, only a
/// fresh `store` of the same key moves it to the back of the queue. After
/// every `store` both the entry count and the summed byte length of the
/// values are within their limits.
#[derive(Debug)]
pub struct ResponseCache {
    entries: HashMap<String, String>,
    /// Keys from oldest to newest insertion
    order: VecDeque<String>,
    total_bytes: usize,
    count_limit: usize,
    byte_limit: usize,
}

impl ResponseCache {
    pub fn new(count_limit: usize, byte_limit: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            total_bytes: 0,
            count_limit,
            byte_limit,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.cache_count_limit, config.cache_byte_limit)
    }

    /// Exact, case-sensitive lookup
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`, evicting the oldest entries as needed.
    ///
    /// Returns false when the value can never fit (larger than the byte
    /// limit, or a zero count limit); any previous value for `key` is
    /// dropped in that case so a stale response is never served.
    pub fn store(&mut self, key: impl Into<String>, value: impl Into<String>) -> bool {
        let key = key.into();
        let value = value.into();

        self.remove(&key);

        if self.count_limit == 0 || value.len() > self.byte_limit {
            debug!("Not caching response of {} bytes (limit {} bytes)", value.len(), self.byte_limit);
            return false;
        }

        while self.entries.len() >= self.count_limit || self.total_bytes + value.len() > self.byte_limit {
            if !self.evict_oldest() {
                break;
            }
        }

        self.total_bytes += value.len();
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Summed byte length of all cached values
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            bytes: self.total_bytes,
            count_limit: self.count_limit,
            byte_limit: self.byte_limit,
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.total_bytes = 0;
    }

    fn remove(&mut self, key: &str) {
        if let Some(previous) = self.entries.remove(key) {
            self.total_bytes -= previous.len();
            self.order.retain(|k| k != key);
        }
    }

    fn evict_oldest(&mut self) -> bool {
        match self.order.pop_front() {
            Some(oldest) => {
                if let Some(value) = self.entries.remove(&oldest) {
                    self.total_bytes -= value.len();
                }
                debug!("Evicted cached response for {:?}", oldest);
                true
            }
            None => false,
        }
    }
}
