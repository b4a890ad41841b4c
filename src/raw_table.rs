//! RawTable: bucket array of red-black trees shared by the hash-backed maps.
//!
//! Layout
//! - `buckets[i]` is the root slot of the tree holding every key whose spread
//!   hash masks to `i`. The bucket count is always a power of two.
//! - Node records live in one `SlotMap` arena; tree relations are `NodeId`
//!   indices, so a rotation at a bucket root rewrites `buckets[i]` in place.
//! - Each node caches its spread hash and carries a stamp. Stamps come from a
//!   per-table counter, so a newer entry always has a larger stamp.
//!
//! Order inside a bucket
//! - Hash first, then the optional comparator when it is decisive, then the
//!   stamp. That is a strict total order even for keys that cannot be
//!   compared, or that compare equal without being `==`.
//! - A lookup carries no stamp. When hash and comparator cannot decide, it
//!   searches the left subtree and continues right.
//!
//! Overlays
//! - An [`Overlay`] receives hooks on node creation, on the degree-2 payload
//!   swap during deletion, on unlink and on clear. `Unordered` ignores them;
//!   the insertion-order chain uses them to keep a second set of links on
//!   the same node records consistent with the trees.

use crate::balance::{Balance, Color, RedBlack};
use crate::engine::{self, InOrder, LevelOrder};
use crate::node::{Links, NodeId, Nodes, Side, TreeNode};
use crate::Comparator;
use core::cmp::Ordering;
use core::hash::{BuildHasher, Hash};
use slotmap::SlotMap;
use std::collections::VecDeque;

pub(crate) struct HashNode<K, V, L> {
    pub(crate) key: K,
    pub(crate) value: V,
    hash: u64,
    stamp: u64,
    links: Links<Color>,
    pub(crate) chain: L,
}

impl<K, V, L> TreeNode for HashNode<K, V, L> {
    type Meta = Color;

    #[inline]
    fn links(&self) -> &Links<Color> {
        &self.links
    }

    #[inline]
    fn links_mut(&mut self) -> &mut Links<Color> {
        &mut self.links
    }

    // The stamp is the entry's identity, so it travels with the key.
    fn swap_payload(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.key, &mut other.key);
        core::mem::swap(&mut self.value, &mut other.value);
        core::mem::swap(&mut self.hash, &mut other.hash);
        core::mem::swap(&mut self.stamp, &mut other.stamp);
    }
}

#[cfg(test)]
impl<K, V, L> HashNode<K, V, L> {
    pub(crate) fn stamp(&self) -> u64 {
        self.stamp
    }
}

pub(crate) type TableNodes<K, V, O> = Nodes<HashNode<K, V, <O as Overlay>::Link>>;

/// Extra structure threaded through the table's nodes.
pub(crate) trait Overlay: Default {
    /// Per-node link data.
    type Link: Default;

    /// `id` was just allocated for a new entry.
    fn on_create<K, V>(&mut self, nodes: &mut Nodes<HashNode<K, V, Self::Link>>, id: NodeId);

    /// `shown` and `moved` just exchanged payloads; `moved` is about to be
    /// unlinked in place of `shown`.
    fn on_swap<K, V>(
        &mut self,
        nodes: &mut Nodes<HashNode<K, V, Self::Link>>,
        shown: NodeId,
        moved: NodeId,
    );

    /// `id` left its tree and is about to leave the arena.
    fn on_remove<K, V>(&mut self, nodes: &mut Nodes<HashNode<K, V, Self::Link>>, id: NodeId);

    fn on_clear(&mut self);
}

/// No overlay: iteration follows the bucket array.
#[derive(Debug, Default)]
pub(crate) struct Unordered;

impl Overlay for Unordered {
    type Link = ();

    fn on_create<K, V>(&mut self, _: &mut Nodes<HashNode<K, V, ()>>, _: NodeId) {}
    fn on_swap<K, V>(&mut self, _: &mut Nodes<HashNode<K, V, ()>>, _: NodeId, _: NodeId) {}
    fn on_remove<K, V>(&mut self, _: &mut Nodes<HashNode<K, V, ()>>, _: NodeId) {}
    fn on_clear(&mut self) {}
}

/// Fold the upper half of the hash into the lower half, which is all the
/// bucket mask looks at.
#[inline]
pub(crate) fn spread(hash: u64) -> u64 {
    hash ^ (hash >> 32)
}

pub(crate) struct RawTable<K, V, S, O: Overlay> {
    nodes: TableNodes<K, V, O>,
    buckets: Vec<Option<NodeId>>,
    hasher: S,
    compare: Option<Comparator<K>>,
    load_factor: f32,
    next_stamp: u64,
    pub(crate) overlay: O,
}

impl<K, V, S, O: Overlay> RawTable<K, V, S, O> {
    /// `bucket_count` must be a power of two; see `TableConfig::validate`.
    pub(crate) fn new(
        bucket_count: usize,
        load_factor: f32,
        hasher: S,
        compare: Option<Comparator<K>>,
    ) -> Self {
        debug_assert!(bucket_count.is_power_of_two());
        Self {
            nodes: SlotMap::with_key(),
            buckets: vec![None; bucket_count],
            hasher,
            compare,
            load_factor,
            next_stamp: 0,
            overlay: O::default(),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn load_factor(&self) -> f32 {
        self.load_factor
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hasher
    }

    pub(crate) fn nodes(&self) -> &TableNodes<K, V, O> {
        &self.nodes
    }

    /// Drop every entry; the bucket array keeps its size.
    pub(crate) fn clear(&mut self) {
        tracing::trace!(
            len = self.nodes.len(),
            capacity = self.buckets.len(),
            "clearing hash tree table"
        );
        self.nodes.clear();
        self.buckets.fill(None);
        self.next_stamp = 0;
        self.overlay.on_clear();
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash as usize) & (self.buckets.len() - 1)
    }

    #[inline]
    fn order(&self, a: &K, b: &K) -> Ordering {
        self.compare.map_or(Ordering::Equal, |compare| compare(a, b))
    }

    pub(crate) fn value_of(&self, id: NodeId) -> &V {
        &self.nodes[id].value
    }

    pub(crate) fn value_mut_of(&mut self, id: NodeId) -> &mut V {
        &mut self.nodes[id].value
    }

    pub(crate) fn pair(&self, id: NodeId) -> (&K, &V) {
        let n = &self.nodes[id];
        (&n.key, &n.value)
    }

    /// Entries bucket by bucket, each bucket in ascending composite order.
    pub(crate) fn bucket_walk(&self) -> BucketWalk<'_, K, V, O::Link> {
        BucketWalk {
            nodes: &self.nodes,
            buckets: self.buckets.iter(),
            current: InOrder::new(&self.nodes, None),
            remaining: self.nodes.len(),
        }
    }

    /// Breadth-first scan of every bucket; values have no index.
    pub(crate) fn scan_values(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.buckets
            .iter()
            .flat_map(|&root| LevelOrder::new(&self.nodes, root))
            .any(|id| self.nodes[id].value == *value)
    }
}

impl<K, V, S, O> RawTable<K, V, S, O>
where
    K: Hash + Eq,
    S: BuildHasher,
    O: Overlay,
{
    #[inline]
    fn make_hash(&self, key: &K) -> u64 {
        spread(self.hasher.hash_one(key))
    }

    /// Find the node holding `key` in the subtree at `start`.
    fn search(&self, start: Option<NodeId>, key: &K, hash: u64) -> Option<NodeId> {
        let mut cur = start;
        while let Some(id) = cur {
            let node = &self.nodes[id];
            let side = match hash.cmp(&node.hash) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal if node.key == *key => return Some(id),
                Ordering::Equal => match self.order(key, &node.key) {
                    Ordering::Less => Side::Left,
                    Ordering::Greater => Side::Right,
                    // Undecided: the stamp order is unknown to a lookup.
                    Ordering::Equal => {
                        if let Some(found) = self.search(node.links.left, key, hash) {
                            return Some(found);
                        }
                        Side::Right
                    }
                },
            };
            cur = node.links.child(side);
        }
        None
    }

    pub(crate) fn find(&self, key: &K) -> Option<NodeId> {
        let hash = self.make_hash(key);
        self.search(self.buckets[self.index(hash)], key, hash)
    }

    /// Insert or replace. Returns the previous value of an existing key; the
    /// stored key is kept.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.grow_if_needed();

        let hash = self.make_hash(&key);
        let idx = self.index(hash);
        let Some(mut cur) = self.buckets[idx] else {
            self.create(idx, key, value, hash, None);
            return None;
        };

        let mut searched = false;
        let at = loop {
            let node = &self.nodes[cur];
            let side = match hash.cmp(&node.hash) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal if node.key == key => {
                    return Some(core::mem::replace(&mut self.nodes[cur].value, value));
                }
                Ordering::Equal => match self.order(&key, &node.key) {
                    Ordering::Less => Side::Left,
                    Ordering::Greater => Side::Right,
                    Ordering::Equal => {
                        // An equal key could sit on either side of this node;
                        // below it, everything on the right has been covered.
                        if !searched {
                            searched = true;
                            let found = self
                                .search(node.links.left, &key, hash)
                                .or_else(|| self.search(node.links.right, &key, hash));
                            if let Some(found) = found {
                                return Some(core::mem::replace(
                                    &mut self.nodes[found].value,
                                    value,
                                ));
                            }
                        }
                        // The new stamp is the largest in the table.
                        Side::Right
                    }
                },
            };
            match node.links.child(side) {
                Some(next) => cur = next,
                None => break (cur, side),
            }
        };

        self.create(idx, key, value, hash, Some(at));
        None
    }

    fn create(&mut self, idx: usize, key: K, value: V, hash: u64, at: Option<(NodeId, Side)>) {
        let stamp = self.next_stamp;
        self.next_stamp += 1;
        let id = self.nodes.insert(HashNode {
            key,
            value,
            hash,
            stamp,
            links: Links::new(RedBlack::fresh()),
            chain: O::Link::default(),
        });
        self.overlay.on_create(&mut self.nodes, id);
        engine::link::<_, RedBlack>(&mut self.nodes, &mut self.buckets[idx], id, at);
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<(K, V)> {
        let hash = self.make_hash(key);
        let idx = self.index(hash);
        let id = self.search(self.buckets[idx], key, hash)?;

        let overlay = &mut self.overlay;
        let gone = engine::detach::<_, RedBlack, _>(
            &mut self.nodes,
            &mut self.buckets[idx],
            id,
            |nodes, shown, moved| overlay.on_swap(nodes, shown, moved),
        );
        self.overlay.on_remove(&mut self.nodes, gone);
        let node = self
            .nodes
            .remove(gone)
            .expect("detached node is still in the arena");
        Some((node.key, node.value))
    }

    fn grow_if_needed(&mut self) {
        let depth = self.nodes.len() as f32 / self.buckets.len() as f32;
        if depth <= self.load_factor {
            return;
        }
        let doubled = self
            .buckets
            .len()
            .checked_mul(2)
            .expect("bucket array capacity overflow");
        self.resize(doubled);
    }

    /// Rebuild every bucket tree into a bucket array of `new_len` slots.
    /// Nodes keep their arena slots; only their relations are rewritten.
    fn resize(&mut self, new_len: usize) {
        tracing::debug!(
            from = self.buckets.len(),
            to = new_len,
            len = self.nodes.len(),
            "growing bucket array"
        );
        let old = core::mem::replace(&mut self.buckets, vec![None; new_len]);
        let mut queue = VecDeque::new();
        for root in old.into_iter().flatten() {
            queue.push_back(root);
            while let Some(id) = queue.pop_front() {
                // Children are queued before `relocate` forgets them.
                let l = engine::links(&self.nodes, id);
                queue.extend(l.left);
                queue.extend(l.right);
                self.relocate(id);
            }
        }
    }

    /// Insert an existing, unique node into the current bucket array.
    fn relocate(&mut self, id: NodeId) {
        let node = &mut self.nodes[id];
        node.links.reset(RedBlack::fresh());
        let (hash, stamp) = (node.hash, node.stamp);
        let idx = self.index(hash);

        let at = match self.buckets[idx] {
            None => None,
            Some(mut cur) => loop {
                let other = &self.nodes[cur];
                let ord = hash
                    .cmp(&other.hash)
                    .then_with(|| self.order(&self.nodes[id].key, &other.key))
                    .then(stamp.cmp(&other.stamp));
                let side = if ord == Ordering::Less {
                    Side::Left
                } else {
                    Side::Right
                };
                match other.links.child(side) {
                    Some(next) => cur = next,
                    None => break Some((cur, side)),
                }
            },
        };
        engine::link::<_, RedBlack>(&mut self.nodes, &mut self.buckets[idx], id, at);
    }

    /// Check every bucket tree: links, coloring, composite order, bucket
    /// placement and the entry count.
    #[cfg(test)]
    pub(crate) fn validate(&self) -> Result<(), crate::error::InvariantViolation> {
        use crate::error::InvariantViolation;

        let mut total = 0;
        for (i, &root) in self.buckets.iter().enumerate() {
            total += engine::check_links(&self.nodes, root)?;
            RedBlack::check(&self.nodes, root)?;
            engine::check_ascending(&self.nodes, root, |a, b| {
                a.hash
                    .cmp(&b.hash)
                    .then_with(|| self.order(&a.key, &b.key))
                    .then(a.stamp.cmp(&b.stamp))
                    == Ordering::Less
            })?;
            for id in LevelOrder::new(&self.nodes, root) {
                let n = &self.nodes[id];
                if self.make_hash(&n.key) != n.hash {
                    return Err(InvariantViolation::new(format!(
                        "{id:?} caches a stale hash"
                    )));
                }
                if self.index(n.hash) != i {
                    return Err(InvariantViolation::new(format!(
                        "{id:?} sits in bucket {i} but hashes to {}",
                        self.index(n.hash)
                    )));
                }
            }
        }
        if total != self.nodes.len() {
            return Err(InvariantViolation::new(format!(
                "{total} nodes reachable from buckets but {} stored",
                self.nodes.len()
            )));
        }
        Ok(())
    }
}

/// Walk of a table in bucket order, ascending inside each bucket.
pub(crate) struct BucketWalk<'a, K, V, L> {
    nodes: &'a Nodes<HashNode<K, V, L>>,
    buckets: core::slice::Iter<'a, Option<NodeId>>,
    current: InOrder<'a, HashNode<K, V, L>>,
    remaining: usize,
}

impl<'a, K, V, L> Iterator for BucketWalk<'a, K, V, L> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.current.next() {
                self.remaining -= 1;
                let n = &self.nodes[id];
                return Some((&n.key, &n.value));
            }
            let &root = self.buckets.next()?;
            self.current = InOrder::new(self.nodes, root);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
