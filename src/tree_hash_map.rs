//! TreeHashMap: the single-threaded bucket table.
//!
//! An array of [`OrderedTree`] buckets indexed by `fingerprint %
//! capacity`, with a cached total entry count and doubling growth once
//! the count exceeds the capacity. Growth, explicit resize, and clear
//! all replace the bucket array wholesale; growth re-inserts every
//! entry into freshly sized buckets and recomputes the count from
//! scratch while doing so.
//!
//! This layer is not thread-safe: mutation requires `&mut self`, so a
//! shared-counter read-modify-write from several threads does not
//! compile here. [`SyncTreeHashMap`](crate::SyncTreeHashMap) is the
//! variant that admits concurrent callers.

use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::hash_map::DefaultHashBuilder;

use crate::ordered_tree::{self, OrderedTree};

/// Capacity used by [`TreeHashMap::new`].
pub const DEFAULT_CAPACITY: usize = 8;

/// Error kinds surfaced by the table layers.
///
/// The source design's third kind, an unhashable key, has no runtime
/// representative here: `K: Hash` rejects it at the call boundary at
/// compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapError {
    /// `get`/`remove` on a key that is not present.
    MissingKey,
    /// Construction with a zero capacity.
    InvalidCapacity,
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::MissingKey => f.write_str("key not present in the table"),
            MapError::InvalidCapacity => f.write_str("capacity must be greater than zero"),
        }
    }
}

impl std::error::Error for MapError {}

/// A hash table with one [`OrderedTree`] per bucket.
///
/// Absent keys are reported as [`MapError::MissingKey`] by [`get`] and
/// [`remove`] (values may legitimately be absent-like, so absence is
/// never folded into the value domain); [`find`] is the
/// `Option`-returning overload.
///
/// [`get`]: Self::get
/// [`remove`]: Self::remove
/// [`find`]: Self::find
pub struct TreeHashMap<K, V, S = DefaultHashBuilder> {
    buckets: Vec<OrderedTree<K, V, S>>,
    len: usize,
    hasher: S,
}

impl<K, V> TreeHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Create a table with [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        let hasher = DefaultHashBuilder::default();
        let buckets = Self::fresh_buckets(DEFAULT_CAPACITY, &hasher);
        Self {
            buckets,
            len: 0,
            hasher,
        }
    }

    /// Create a table with the given capacity. Zero capacity fails with
    /// [`MapError::InvalidCapacity`].
    pub fn with_capacity(capacity: usize) -> Result<Self, MapError> {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for TreeHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> TreeHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self, MapError> {
        if capacity == 0 {
            return Err(MapError::InvalidCapacity);
        }
        let buckets = Self::fresh_buckets(capacity, &hasher);
        Ok(Self {
            buckets,
            len: 0,
            hasher,
        })
    }

    fn fresh_buckets(capacity: usize, hasher: &S) -> Vec<OrderedTree<K, V, S>> {
        (0..capacity)
            .map(|_| OrderedTree::with_hasher(hasher.clone()))
            .collect()
    }

    fn fingerprint(&self, key: &K) -> u64 {
        self.hasher.hash_one(key)
    }

    /// Number of entries in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Bucket a key would land in: `fingerprint % capacity`, always in
    /// `[0, capacity)`. Exposed for diagnostics and tests.
    pub fn bucket_index(&self, key: &K) -> usize {
        self.index_of(self.fingerprint(key))
    }

    fn index_of(&self, fingerprint: u64) -> usize {
        (fingerprint % self.buckets.len() as u64) as usize
    }

    /// Look a key up, reporting absence as [`MapError::MissingKey`].
    pub fn get(&self, key: &K) -> Result<&V, MapError> {
        self.find(key).ok_or(MapError::MissingKey)
    }

    /// `Option`-returning lookup.
    pub fn find(&self, key: &K) -> Option<&V> {
        let fingerprint = self.fingerprint(key);
        self.buckets[self.index_of(fingerprint)].get_prehashed(key, fingerprint)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Insert or replace. Returns the previous value for an existing
    /// key; a new entry returns `None` and may trigger growth (capacity
    /// doubling, minimum 2) once `len` exceeds the capacity.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let fingerprint = self.fingerprint(&key);
        let index = self.index_of(fingerprint);
        let previous = self.buckets[index].insert_prehashed(key, fingerprint, value);
        if previous.is_none() {
            self.len += 1;
            if self.len > self.buckets.len() {
                let doubled = (self.buckets.len() * 2).max(2);
                self.rebuild(doubled);
            }
        }
        previous
    }

    /// Remove a key, reporting absence as [`MapError::MissingKey`].
    /// `len` is decremented only on an actual removal.
    pub fn remove(&mut self, key: &K) -> Result<V, MapError> {
        let fingerprint = self.fingerprint(key);
        let index = self.index_of(fingerprint);
        match self.buckets[index].remove_prehashed(key, fingerprint) {
            Some(value) => {
                self.len -= 1;
                Ok(value)
            }
            None => Err(MapError::MissingKey),
        }
    }

    /// Rebuild at an explicit capacity. A zero capacity is a no-op, in
    /// contrast to the constructors, which fail on it.
    pub fn resize(&mut self, new_capacity: usize) {
        if new_capacity == 0 {
            return;
        }
        self.rebuild(new_capacity);
    }

    /// Drop every entry, keeping the current capacity.
    pub fn clear(&mut self) {
        self.buckets = Self::fresh_buckets(self.buckets.len(), &self.hasher);
        self.len = 0;
    }

    fn rebuild(&mut self, new_capacity: usize) {
        let mut entries = Vec::with_capacity(self.len);
        for tree in self.buckets.drain(..) {
            tree.into_entries(&mut entries);
        }
        self.buckets = Self::fresh_buckets(new_capacity, &self.hasher);
        self.len = 0;
        for (key, fingerprint, value) in entries {
            let index = self.index_of(fingerprint);
            if self.buckets[index]
                .insert_prehashed(key, fingerprint, value)
                .is_none()
            {
                self.len += 1;
            }
        }
    }

    /// Iterate buckets in index order, ascending placement order within
    /// each bucket. This is a per-bucket order guarantee only, not a
    /// global ascending order across the whole table.
    pub fn iter(&self) -> Iter<'_, K, V, S> {
        Iter {
            buckets: self.buckets.iter(),
            current: None,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }
}

/// Iterator over `(&K, &V)` in bucket index order.
pub struct Iter<'a, K, V, S> {
    buckets: std::slice::Iter<'a, OrderedTree<K, V, S>>,
    current: Option<ordered_tree::Iter<'a, K, V>>,
}

impl<'a, K, V, S> Iterator for Iter<'a, K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tree_iter) = &mut self.current {
                if let Some(pair) = tree_iter.next() {
                    return Some(pair);
                }
            }
            self.current = Some(self.buckets.next()?.iter());
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a TreeHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, S> Extend<(K, V)> for TreeHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Clone,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V> FromIterator<(K, V)> for TreeHashMap<K, V>
where
    K: Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_hashers::{ConstBuildHasher, IdentityBuildHasher};

    /// Invariant: construction with zero capacity fails; any positive
    /// capacity is accepted as-is.
    #[test]
    fn zero_capacity_rejected() {
        assert!(matches!(
            TreeHashMap::<u64, u64>::with_capacity(0),
            Err(MapError::InvalidCapacity)
        ));
        match TreeHashMap::<u64, u64>::with_capacity(3) {
            Ok(m) => assert_eq!(m.capacity(), 3),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    /// Invariant: `bucket_index` is always in `[0, capacity)` and
    /// equals `fingerprint % capacity`.
    #[test]
    fn bucket_index_bounds() {
        let m: TreeHashMap<u64, (), IdentityBuildHasher> =
            TreeHashMap::with_capacity_and_hasher(4, IdentityBuildHasher).unwrap();
        assert_eq!(m.bucket_index(&0), 0);
        assert_eq!(m.bucket_index(&5), 1);
        assert_eq!(m.bucket_index(&7), 3);
        assert_eq!(m.bucket_index(&u64::MAX), (u64::MAX % 4) as usize);
    }

    /// Invariant: `len` always equals the number of pairs a full
    /// iteration yields, across inserts, replacements, removals, a
    /// growth, and a clear.
    #[test]
    fn len_matches_iteration_throughout() {
        let mut m: TreeHashMap<u64, u64> = TreeHashMap::with_capacity(2).unwrap();
        for k in 0..40u64 {
            m.insert(k, k);
            assert_eq!(m.len(), m.iter().count());
        }
        for k in (0..40u64).step_by(3) {
            m.insert(k, k + 1); // replacements
            assert_eq!(m.len(), m.iter().count());
        }
        for k in (0..40u64).step_by(2) {
            m.remove(&k).unwrap();
            assert_eq!(m.len(), m.iter().count());
        }
        m.clear();
        assert_eq!(m.len(), 0);
        assert_eq!(m.iter().count(), 0);
    }

    /// Invariant: growth preserves every (key, value) pair.
    #[test]
    fn growth_preserves_entries() {
        let mut m: TreeHashMap<u64, String> = TreeHashMap::with_capacity(2).unwrap();
        for k in 0..100u64 {
            m.insert(k, format!("v{k}"));
        }
        assert!(m.capacity() >= 100);
        assert_eq!(m.len(), 100);
        for k in 0..100u64 {
            assert_eq!(m.get(&k).unwrap(), &format!("v{k}"));
        }
    }

    /// Invariant: removing an absent key reports MissingKey and leaves
    /// `len` unchanged.
    #[test]
    fn missing_remove_reports_error() {
        let mut m: TreeHashMap<u64, u64> = TreeHashMap::new();
        m.insert(1, 1);
        assert_eq!(m.remove(&2).unwrap_err(), MapError::MissingKey);
        assert_eq!(m.len(), 1);
        assert_eq!(m.get(&2).unwrap_err(), MapError::MissingKey);
    }

    /// Invariant: explicit resize(0) is a no-op; any other resize
    /// rebuilds at exactly the requested capacity and preserves content.
    #[test]
    fn resize_semantics() {
        let mut m: TreeHashMap<u64, u64, IdentityBuildHasher> =
            TreeHashMap::with_capacity_and_hasher(4, IdentityBuildHasher).unwrap();
        for k in 0..10u64 {
            m.insert(k, k * 2);
        }
        let cap_before = m.capacity();
        m.resize(0);
        assert_eq!(m.capacity(), cap_before);
        m.resize(3);
        assert_eq!(m.capacity(), 3);
        assert_eq!(m.len(), 10);
        for k in 0..10u64 {
            assert_eq!(m.find(&k), Some(&(k * 2)));
        }
    }

    /// Invariant: iteration visits buckets in index order with
    /// ascending keys inside each bucket; under the identity hasher the
    /// interleaving is exactly (bucket, then fingerprint) order.
    #[test]
    fn iteration_is_per_bucket_ordered() {
        let mut m: TreeHashMap<u64, (), IdentityBuildHasher> =
            TreeHashMap::with_capacity_and_hasher(4, IdentityBuildHasher).unwrap();
        // len stays at capacity, so no growth interferes.
        for k in [7u64, 2, 5, 3] {
            m.insert(k, ());
        }
        let keys: Vec<u64> = m.keys().copied().collect();
        // buckets mod 4: [], [5], [2], [3, 7]
        assert_eq!(keys, vec![5, 2, 3, 7]);
    }

    /// Invariant: a constant hasher funnels everything into bucket 0
    /// and the table still behaves like a map.
    #[test]
    fn const_hasher_single_bucket_map() {
        let mut m: TreeHashMap<String, i32, ConstBuildHasher> =
            TreeHashMap::with_capacity_and_hasher(4, ConstBuildHasher).unwrap();
        for i in 0..20 {
            m.insert(format!("k{i}"), i);
        }
        for i in 0..20 {
            assert_eq!(m.bucket_index(&format!("k{i}")), 0);
            assert_eq!(m.find(&format!("k{i}")), Some(&i));
        }
        assert_eq!(m.remove(&"k7".to_string()).unwrap(), 7);
        assert!(!m.contains_key(&"k7".to_string()));
        assert_eq!(m.len(), 19);
    }

    /// Invariant: FromIterator/Extend behave like repeated insert,
    /// last write winning per key.
    #[test]
    fn from_iterator_and_extend() {
        let mut m: TreeHashMap<u64, &str> = [(1u64, "one"), (2, "two")].into_iter().collect();
        m.extend([(2u64, "TWO"), (3, "three")]);
        assert_eq!(m.len(), 3);
        assert_eq!(m.find(&2), Some(&"TWO"));
    }
}
