//! Small TTL cache used to memoize catalog reads.
//! Wraps the usual pattern of `(Instant, V)` entries in a `HashMap` behind
//! an `RwLock`. Expired entries are removed by the read that notices them.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: RwLock<HashMap<K, (Instant, V)>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cloned value for `key` if the entry exists and is younger than the
    /// cache's TTL.
    pub async fn get(&self, key: &K) -> Option<V> {
        // Fast path: read lock only.
        if let Some((stamp, value)) = self.entries.read().await.get(key).cloned() {
            if stamp.elapsed() < self.ttl {
                return Some(value);
            }
        } else {
            return None;
        }
        // Entry expired: take the write lock just long enough to evict it.
        let mut write = self.entries.write().await;
        if let Some((stamp, _)) = write.get(key)
            && stamp.elapsed() >= self.ttl
        {
            write.remove(key);
        }
        None
    }

    /// Insert or overwrite an entry, stamped with the current time.
    pub async fn put(&self, key: K, value: V) {
        self.entries
            .write()
            .await
            .insert(key, (Instant::now(), value));
    }

    /// Drop an entry before its TTL runs out.
    pub async fn invalidate(&self, key: &K) {
        self.entries.write().await.remove(key);
    }
}
