//! tree-hashmap: a hash table with ordered-tree buckets and a
//! writer-preference reader/writer monitor for concurrent use.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build SyncTreeHashMap in plain, verifiable layers so each
//!   piece can be reasoned about independently.
//! - Layers:
//!   - OrderedTree<K, V, S>: a binary search tree used as the per-bucket
//!     collision structure; placement order is (hash fingerprint,
//!     node-creation sequence), lookup identity is `K: Eq`.
//!   - TreeHashMap<K, V, S>: the bucket table: `Vec<OrderedTree>`
//!     indexed by `fingerprint % capacity`, cached entry count, and
//!     doubling growth once the count exceeds the capacity.
//!   - RwMonitor<T>: a reader/writer monitor (mutex + condvar) with
//!     writer preference, owning the protected value and handing out
//!     RAII guards.
//!   - SyncTreeHashMap<K, V, S>: public concurrent API composing the
//!     table with the monitor; reads share, writes exclude, growth runs
//!     inside the writer's single acquisition.
//!
//! Constraints
//! - TreeHashMap alone is single-threaded: mutation needs `&mut self`.
//!   The concurrent surface is SyncTreeHashMap.
//! - Buckets are unbalanced: an adversarial fingerprint stream degrades
//!   a bucket to O(n). Accepted for simplicity; growth keeps buckets
//!   small for honest hashers.
//! - Blocking acquisitions have no timeout and cannot be cancelled.
//! - Absent keys are an error (`MapError::MissingKey`) on `get`/
//!   `remove`, never a silent default; `find` is the `Option` overload.
//!
//! Why this split?
//! - Localize invariants: the tree never sees capacities, the table
//!   never sees lock state, the monitor never sees keys.
//! - Minimize unsafe: the only unsafe code is the guard derefs in
//!   `rw_monitor`, justified by the monitor's counters.
//! - The comparison rule (equality, then fingerprint, then creation
//!   sequence) lives entirely inside OrderedTree; upper layers only
//!   ever hand it a key and a precomputed fingerprint.
//!
//! Hasher and rebuild invariants
//! - Every key is hashed exactly once at the table boundary; the stored
//!   fingerprint is reused for bucket indexing, tree placement, and
//!   growth, so `K: Hash` is never re-invoked on a stored key.
//! - Growth/resize/clear replace the bucket array wholesale; growth
//!   recomputes the entry count from scratch while re-inserting.
//!
//! Traversal
//! - OrderedTree and TreeHashMap iterate lazily (the borrow checker
//!   provides exclusion); SyncTreeHashMap materializes snapshots under
//!   one read acquisition because a lock cannot be held soundly across
//!   a suspended iteration.
//!
//! Notes and non-goals
//! - No persistence, no replication, no lock-free algorithms, no
//!   bounded-memory guarantee.
//! - Table-wide iteration order is bucket index order with ascending
//!   placement order per bucket, not a global key order.
//! - The seq tiebreak is process-run-local; it is never persisted or
//!   compared across runs.

pub mod ordered_tree;
pub mod rw_monitor;
pub mod sync_tree_hash_map;
pub mod tree_hash_map;

#[cfg(test)]
pub(crate) mod test_hashers;

// Public surface
pub use ordered_tree::OrderedTree;
pub use rw_monitor::{ReadGuard, RwMonitor, WriteGuard};
pub use sync_tree_hash_map::SyncTreeHashMap;
pub use tree_hash_map::{MapError, TreeHashMap, DEFAULT_CAPACITY};
