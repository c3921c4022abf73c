//! SyncTreeHashMap: the thread-safe facade over [`TreeHashMap`].
//!
//! Every operation takes `&self` and goes through the
//! [`RwMonitor`](crate::RwMonitor): lookups, containment, length, and
//! traversal acquire read access; inserts, removals, resizes, and
//! clears acquire write access for the whole composite operation. An
//! insert that triggers growth detects and rebuilds inside the inner
//! table's `insert`, i.e. under the one write acquisition, so there is no
//! window where a second writer could interleave a partial resize.
//!
//! Traversal discipline: one read acquisition per traversal call, with
//! the snapshot materialized while the lock is held. A lazy iterator
//! cannot soundly keep the monitor locked across a suspension, so
//! `entries`/`keys`/`values` return owned `Vec`s and callers iterate
//! them lock-free. The snapshot is consistent at the instant of the
//! call and does not observe later writes.

use core::hash::{BuildHasher, Hash};

use hashbrown::hash_map::DefaultHashBuilder;

use crate::rw_monitor::RwMonitor;
use crate::tree_hash_map::{MapError, TreeHashMap};

/// A concurrent hash table with ordered-tree buckets: many simultaneous
/// readers, one exclusive writer, writers preferred over waiting
/// readers.
///
/// Callers block until the monitor admits them; there is no timeout
/// (documented limitation). Reads return owned values (`V: Clone`) so
/// no borrow outlives its read guard.
pub struct SyncTreeHashMap<K, V, S = DefaultHashBuilder> {
    inner: RwMonitor<TreeHashMap<K, V, S>>,
}

impl<K, V> SyncTreeHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Create a table with the default capacity.
    pub fn new() -> Self {
        Self {
            inner: RwMonitor::new(TreeHashMap::new()),
        }
    }

    /// Create a table with the given capacity. Zero capacity fails with
    /// [`MapError::InvalidCapacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        Ok(Self {
            inner: RwMonitor::new(TreeHashMap::with_capacity(capacity)?),
        })
    }
}

impl<K, V> Default for SyncTreeHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> SyncTreeHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, MapError> {
        Ok(Self {
            inner: RwMonitor::new(TreeHashMap::with_capacity_and_hasher(capacity, hasher)?),
        })
    }

    /// Look a key up under read access, reporting absence as
    /// [`MapError::MissingKey`]. The value is cloned out so the guard
    /// is released before returning.
    pub fn get(&self, key: &K) -> Result<V, MapError>
    where
        V: Clone,
    {
        let guard = self.inner.read();
        guard.get(key).map(V::clone)
    }

    /// `Option`-returning lookup under read access.
    pub fn find(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let guard = self.inner.read();
        guard.find(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.read().capacity()
    }

    /// Bucket a key would land in right now. Diagnostic only: a
    /// concurrent resize can invalidate the answer as soon as the read
    /// guard is released.
    pub fn bucket_index(&self, key: &K) -> usize {
        self.inner.read().bucket_index(key)
    }

    /// Insert or replace under write access. Growth, if triggered, runs
    /// inside the same acquisition.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Remove under write access, reporting absence as
    /// [`MapError::MissingKey`].
    pub fn remove(&self, key: &K) -> Result<V, MapError> {
        self.inner.write().remove(key)
    }

    /// Rebuild at an explicit capacity under write access; zero is a
    /// no-op.
    pub fn resize(&self, new_capacity: usize) {
        self.inner.write().resize(new_capacity);
    }

    /// Drop every entry under write access.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Snapshot of all entries in bucket index order (ascending within
    /// each bucket), materialized under one read acquisition.
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        let guard = self.inner.read();
        guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Snapshot of all keys, same order as [`entries`](Self::entries).
    pub fn keys(&self) -> Vec<K>
    where
        K: Clone,
    {
        let guard = self.inner.read();
        guard.keys().cloned().collect()
    }

    /// Snapshot of all values, same order as [`entries`](Self::entries).
    pub fn values(&self) -> Vec<V>
    where
        V: Clone,
    {
        let guard = self.inner.read();
        guard.values().cloned().collect()
    }

    /// Unwrap the inner single-threaded table. Consumes the facade, so
    /// no guard can be outstanding.
    pub fn into_inner(self) -> TreeHashMap<K, V, S> {
        self.inner.into_inner()
    }
}
