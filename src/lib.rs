//! treebucket: hash maps whose buckets are red-black trees, plus the ordered
//! and insertion-ordered maps and sets built from the same tree engine.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: worst-case logarithmic lookups in a hash map, even when every
//!   key lands in one bucket, built in layers that can each be checked on
//!   their own.
//! - Layers:
//!   - `node` + `engine`: index-linked tree nodes in a `SlotMap` arena and
//!     the policy-free tree routines (rotate, attach, detach, walks).
//!   - `balance`: `RedBlack` and `Avl` policies that restore their
//!     invariants after the engine attaches or unlinks a node.
//!   - `TreeMap<K, V, B>`: one tree, ordered by a comparator.
//!   - `raw_table::RawTable`: bucket array of red-black trees ordered by
//!     (hash, comparator, stamp), with hooks for an overlay.
//!   - `HashTreeMap` (no overlay) and `LinkedHashTreeMap` (insertion-order
//!     chain overlay).
//!   - Sets: each map with unit values.
//!
//! Constraints
//! - Single-threaded mutation through `&mut self`; no interior mutability,
//!   so the maps are `Send`/`Sync` whenever their contents are.
//! - No per-node heap allocation: node records live in the map's arena and
//!   keep their slot for their whole life, including across resizes.
//! - Lookups take `&K`. The middle level of the bucket order is an optional
//!   `fn(&K, &K) -> Ordering` fixed at construction.
//!
//! Bucket order
//! - Hashes are spread (`h ^ (h >> 32)`) and cached on the node; `K: Hash`
//!   is never called again for a stored key.
//! - Within a bucket: hash, then the comparator when it is decisive, then
//!   the entry's stamp. Stamps increase with every new entry, so a new node
//!   always descends right on a full tie.
//! - Lookups cannot use stamps. On a hash tie the comparator cannot break,
//!   they search the left subtree and continue right.
//!
//! Deletion and overlays
//! - A node with two children exchanges its payload (key, value, hash and
//!   stamp) with its in-order successor, and the successor's record is
//!   unlinked instead. The overlay hook sees that exchange and moves chain
//!   positions with the payloads, so the insertion-order chain never needs
//!   a second lookup.
//!
//! Growth
//! - Before an insert, if `len / capacity > load_factor` the bucket array
//!   doubles. Every old bucket is walked breadth-first, each node is reset
//!   to a red leaf and re-inserted by its cached order key; nothing is
//!   reallocated.
//!
//! Notes and non-goals
//! - No weak references, no concurrent access, no persistence.
//! - Structural corruption (a missing rotation pivot, a dangling index)
//!   panics with a descriptive message; it is never reported as an error.
//! - The node arena and the balancing hooks are internal:
//!
//! ```compile_fail
//! use treebucket::node::NodeId;
//! ```

pub mod balance;
mod config;
mod engine;
mod error;
mod hash_tree_map;
mod hash_tree_map_proptest;
mod linked_hash_tree_map;
mod node;
mod raw_table;
mod set;
mod table_map;
#[cfg(test)]
mod test_util;
mod tree_map;
mod tree_map_proptest;

use core::cmp::Ordering;

/// Comparator fixed at construction. Must be a strict weak order consistent
/// with `Eq`: keys that are `==` compare `Equal`.
pub type Comparator<K> = fn(&K, &K) -> Ordering;

// Public surface
pub use balance::{Avl, RedBlack};
pub use config::{TableConfig, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
pub use error::{Error, InvariantViolation};
pub use hash_tree_map::HashTreeMap;
pub use linked_hash_tree_map::LinkedHashTreeMap;
pub use set::{HashTreeSet, LinkedHashTreeSet, TreeSet};
pub use tree_map::TreeMap;

pub mod iter {
    //! Iterator types returned by the maps.
    pub use crate::hash_tree_map::Iter as HashTreeIter;
    pub use crate::linked_hash_tree_map::Iter as LinkedHashTreeIter;
    pub use crate::tree_map::Iter as TreeIter;
}
