use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::document::DocumentId;

/// A sharded map from document id to an accumulating value, used to merge
/// partial relevance scores from parallel workers without a global lock.
///
/// Each shard is a `BTreeMap` behind its own mutex; a key lives in the shard
/// `id mod shard_count`, which assumes non-negative ids (guaranteed by
/// [`crate::SearchServer::add_document`] validation). No operation takes more
/// than one shard lock at a time; the final merge consumes the map and runs
/// only after all writers have joined.
pub struct ConcurrentMap<V> {
    shards: Vec<Mutex<BTreeMap<DocumentId, V>>>,
}

impl<V: Default> ConcurrentMap<V> {
    /// Create a map with `shard_count` shards (at least one).
    pub fn new(shard_count: usize) -> Self {
        let shard_count = shard_count.max(1);
        let shards = (0..shard_count).map(|_| Mutex::new(BTreeMap::new())).collect();
        Self { shards }
    }

    /// Read-modify-write the value under `key`, inserting a default first if
    /// the key is absent. Only the key's shard is locked for the duration of
    /// the closure.
    pub fn update(&self, key: DocumentId, apply: impl FnOnce(&mut V)) {
        let mut shard = self.shards[self.shard_for(key)].lock();
        apply(shard.entry(key).or_default());
    }

    /// Remove `key` if present. Idempotent.
    pub fn erase(&self, key: DocumentId) {
        self.shards[self.shard_for(key)].lock().remove(&key);
    }

    /// Merge every shard into one ordered map, consuming the accumulator.
    pub fn into_ordinary_map(self) -> BTreeMap<DocumentId, V> {
        let mut merged = BTreeMap::new();
        for shard in self.shards {
            merged.append(&mut shard.into_inner());
        }
        merged
    }

    fn shard_for(&self, key: DocumentId) -> usize {
        key.rem_euclid(self.shards.len() as DocumentId) as usize
    }
}
