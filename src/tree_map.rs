//! TreeMap: ordered map on a balanced binary search tree.

use crate::balance::{Balance, RedBlack};
use crate::engine::{self, InOrder, LevelOrder};
use crate::node::{Links, NodeId, Nodes, Side, TreeNode};
use crate::Comparator;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use slotmap::SlotMap;

struct Entry<K, V, M> {
    key: K,
    value: V,
    links: Links<M>,
}

impl<K, V, M: Copy> TreeNode for Entry<K, V, M> {
    type Meta = M;

    #[inline]
    fn links(&self) -> &Links<M> {
        &self.links
    }

    #[inline]
    fn links_mut(&mut self) -> &mut Links<M> {
        &mut self.links
    }

    fn swap_payload(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.key, &mut other.key);
        core::mem::swap(&mut self.value, &mut other.value);
    }
}

/// An ordered map. Keys are kept sorted by a comparator fixed at
/// construction (`Ord::cmp` for [`TreeMap::new`]).
///
/// `B` selects the balancing policy: [`RedBlack`] (default) or
/// [`Avl`](crate::balance::Avl).
pub struct TreeMap<K, V, B: Balance = RedBlack> {
    nodes: Nodes<Entry<K, V, B::Meta>>,
    root: Option<NodeId>,
    compare: Comparator<K>,
}

impl<K: Ord, V> TreeMap<K, V> {
    /// An empty red-black map ordered by `Ord::cmp`.
    pub fn new() -> Self {
        Self::new_balanced()
    }
}

impl<K: Ord, V, B: Balance> TreeMap<K, V, B> {
    /// An empty map ordered by `Ord::cmp` under the policy `B`, as in
    /// `TreeMap::<K, V, Avl>::new_balanced()`.
    pub fn new_balanced() -> Self {
        Self::with_comparator(K::cmp)
    }
}

impl<K: Ord, V, B: Balance> Default for TreeMap<K, V, B> {
    fn default() -> Self {
        Self::new_balanced()
    }
}

impl<K, V, B: Balance> TreeMap<K, V, B> {
    /// An empty map ordered by `compare`, which must be a strict total order.
    pub fn with_comparator(compare: Comparator<K>) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        tracing::trace!(len = self.nodes.len(), "clearing tree map");
        self.nodes.clear();
        self.root = None;
    }

    /// Either the node holding `key`, or the slot a new node for it would
    /// hang from (`None` for an empty tree).
    fn locate(&self, key: &K) -> Result<NodeId, Option<(NodeId, Side)>> {
        let mut cur = self.root.ok_or(None)?;
        loop {
            let side = match (self.compare)(key, &self.nodes[cur].key) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Ok(cur),
            };
            match engine::child(&self.nodes, cur, side) {
                Some(next) => cur = next,
                None => return Err(Some((cur, side))),
            }
        }
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        self.locate(key).ok()
    }

    /// Insert or replace. Returns the previous value for an existing key; the
    /// stored key is kept.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.locate(&key) {
            Ok(id) => Some(core::mem::replace(&mut self.nodes[id].value, value)),
            Err(at) => {
                let id = self.nodes.insert(Entry {
                    key,
                    value,
                    links: Links::new(B::fresh()),
                });
                engine::link::<_, B>(&mut self.nodes, &mut self.root, id, at);
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| &self.nodes[id].value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find(key)?;
        Some(&mut self.nodes[id].value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.find(key).map(|id| self.pair(id))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Linear scan; values are not indexed.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.nodes.values().any(|e| e.value == *value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let id = self.find(key)?;
        Some(self.take(id))
    }

    fn take(&mut self, id: NodeId) -> (K, V) {
        let gone = engine::detach::<_, B, _>(&mut self.nodes, &mut self.root, id, |_, _, _| {});
        let e = self
            .nodes
            .remove(gone)
            .expect("detached node is still in the arena");
        (e.key, e.value)
    }

    #[inline]
    fn pair(&self, id: NodeId) -> (&K, &V) {
        let e = &self.nodes[id];
        (&e.key, &e.value)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        engine::first(&self.nodes, self.root).map(|id| self.pair(id))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        engine::last(&self.nodes, self.root).map(|id| self.pair(id))
    }

    pub fn pop_first(&mut self) -> Option<(K, V)> {
        let id = engine::first(&self.nodes, self.root)?;
        Some(self.take(id))
    }

    pub fn pop_last(&mut self) -> Option<(K, V)> {
        let id = engine::last(&self.nodes, self.root)?;
        Some(self.take(id))
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V, B> {
        Iter {
            walk: InOrder::new(&self.nodes, self.root),
            remaining: self.nodes.len(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Visit every entry in ascending key order.
    pub fn traverse(&self, mut visit: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    pub fn inorder(&self, visit: impl FnMut(&K, &V)) {
        self.traverse(visit)
    }

    pub fn preorder(&self, mut visit: impl FnMut(&K, &V)) {
        engine::preorder(&self.nodes, self.root, |id| {
            let (k, v) = self.pair(id);
            visit(k, v)
        });
    }

    pub fn postorder(&self, mut visit: impl FnMut(&K, &V)) {
        engine::postorder(&self.nodes, self.root, |id| {
            let (k, v) = self.pair(id);
            visit(k, v)
        });
    }

    /// Visit entries level by level, left to right.
    pub fn level_order(&self, mut visit: impl FnMut(&K, &V)) {
        for id in LevelOrder::new(&self.nodes, self.root) {
            let (k, v) = self.pair(id);
            visit(k, v);
        }
    }

    /// Number of levels; 0 for an empty map.
    pub fn height(&self) -> usize {
        engine::height(&self.nodes, self.root)
    }

    /// Whether the tree shape is complete (all levels full except the last,
    /// which is filled from the left).
    pub fn is_complete(&self) -> bool {
        engine::is_complete(&self.nodes, self.root)
    }

    #[cfg(test)]
    pub(crate) fn validate(&self) -> Result<(), crate::error::InvariantViolation> {
        let count = engine::check_links(&self.nodes, self.root)?;
        if count != self.nodes.len() {
            return Err(crate::error::InvariantViolation::new(format!(
                "{count} nodes reachable but {} stored",
                self.nodes.len()
            )));
        }
        let compare = self.compare;
        engine::check_ascending(&self.nodes, self.root, |a, b| {
            compare(&a.key, &b.key) == Ordering::Less
        })?;
        B::check(&self.nodes, self.root)
    }
}

/// Ascending iterator over a [`TreeMap`].
pub struct Iter<'a, K, V, B: Balance = RedBlack> {
    walk: InOrder<'a, Entry<K, V, B::Meta>>,
    remaining: usize,
}

impl<'a, K, V, B: Balance> Iterator for Iter<'a, K, V, B> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.walk.next()?;
        self.remaining -= 1;
        let e = &self.walk.nodes()[id];
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, B: Balance> DoubleEndedIterator for Iter<'a, K, V, B> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.walk.next_back()?;
        self.remaining -= 1;
        let e = &self.walk.nodes()[id];
        Some((&e.key, &e.value))
    }
}

impl<K, V, B: Balance> ExactSizeIterator for Iter<'_, K, V, B> {}
impl<K, V, B: Balance> FusedIterator for Iter<'_, K, V, B> {}

impl<'a, K, V, B: Balance> IntoIterator for &'a TreeMap<K, V, B> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V, B: Balance> Extend<(K, V)> for TreeMap<K, V, B> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, B: Balance> FromIterator<(K, V)> for TreeMap<K, V, B> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new_balanced();
        map.extend(iter);
        map
    }
}

impl<K: fmt::Debug, V: fmt::Debug, B: Balance> fmt::Debug for TreeMap<K, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::Avl;

    const SCENARIO: [i32; 11] = [7, 4, 9, 2, 5, 6, 8, 11, 3, 12, 1];

    fn keys<B: Balance>(m: &TreeMap<i32, i32, B>) -> Vec<i32> {
        m.keys().copied().collect()
    }

    /// Invariant: the documented scenario yields ascending keys before and
    /// after removing an interior key, for both policies.
    #[test]
    fn scenario_insert_then_remove_seven() {
        fn run<B: Balance>() {
            let mut m: TreeMap<i32, i32, B> = TreeMap::new_balanced();
            for k in SCENARIO {
                assert!(m.insert(k, k * 10).is_none());
                m.validate().unwrap();
            }
            assert_eq!(keys(&m), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 11, 12]);
            assert_eq!(m.remove(&7), Some(70));
            m.validate().unwrap();
            assert_eq!(keys(&m), vec![1, 2, 3, 4, 5, 6, 8, 9, 11, 12]);
            assert_eq!(m.len(), 10);
        }
        run::<RedBlack>();
        run::<Avl>();
    }

    /// Invariant: replacing a value keeps the size and returns the old value.
    #[test]
    fn insert_existing_key_replaces_value() {
        let mut m: TreeMap<&str, i32> = TreeMap::new();
        assert_eq!(m.insert("a", 1), None);
        assert_eq!(m.insert("a", 2), Some(1));
        assert_eq!(m.get(&"a"), Some(&2));
        assert_eq!(m.len(), 1);
    }

    /// Invariant: removing an absent key is a no-op reported as `None`.
    #[test]
    fn remove_absent_key_changes_nothing() {
        let mut m: TreeMap<i32, i32> = (0..5).map(|k| (k, k)).collect();
        assert_eq!(m.remove(&42), None);
        assert_eq!(m.len(), 5);
        assert_eq!(keys(&m), vec![0, 1, 2, 3, 4]);
    }

    /// Invariant: a custom comparator defines the iteration order.
    #[test]
    fn comparator_orders_keys() {
        let mut m: TreeMap<i32, ()> = TreeMap::with_comparator(|a, b| b.cmp(a));
        for k in [3, 1, 2] {
            m.insert(k, ());
        }
        assert_eq!(m.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(m.first_key_value(), Some((&3, &())));
    }

    /// Invariant: sequential inserts keep the tree logarithmic and every
    /// removal order leaves a valid tree.
    #[test]
    fn ascending_inserts_stay_balanced() {
        let mut m: TreeMap<u32, u32> = TreeMap::new();
        for k in 0..1024 {
            m.insert(k, k);
        }
        m.validate().unwrap();
        // A red-black tree of n nodes is at most 2*log2(n+1) tall.
        assert!(m.height() <= 20, "height {}", m.height());

        for k in (0..1024).step_by(3) {
            assert_eq!(m.remove(&k), Some(k));
            m.validate().unwrap();
        }
        assert_eq!(m.len(), 1024 - 342);
    }

    /// Invariant: AVL keeps height within 1.44*log2(n).
    #[test]
    fn avl_is_tighter() {
        let mut m: TreeMap<u32, (), Avl> = TreeMap::new_balanced();
        for k in 0..1023 {
            m.insert(k, ());
        }
        m.validate().unwrap();
        assert!(m.height() <= 14, "height {}", m.height());
        for k in 0..512 {
            m.remove(&k);
            m.validate().unwrap();
        }
        assert_eq!(m.first_key_value(), Some((&512, &())));
    }

    #[test]
    fn first_last_and_pops() {
        let mut m: TreeMap<i32, char> = [(2, 'b'), (1, 'a'), (3, 'c')].into_iter().collect();
        assert_eq!(m.first_key_value(), Some((&1, &'a')));
        assert_eq!(m.last_key_value(), Some((&3, &'c')));
        assert_eq!(m.pop_first(), Some((1, 'a')));
        assert_eq!(m.pop_last(), Some((3, 'c')));
        assert_eq!(m.pop_last(), Some((2, 'b')));
        assert_eq!(m.pop_first(), None);
        assert!(m.is_empty());
        m.validate().unwrap();
    }

    #[test]
    fn iter_is_double_ended_and_sized() {
        let m: TreeMap<i32, i32> = (0..6).map(|k| (k, -k)).collect();
        let mut it = m.iter();
        assert_eq!(it.len(), 6);
        assert_eq!(it.next(), Some((&0, &0)));
        assert_eq!(it.next_back(), Some((&5, &-5)));
        assert_eq!(it.len(), 4);
        let rest: Vec<i32> = it.map(|(k, _)| *k).collect();
        assert_eq!(rest, vec![1, 2, 3, 4]);
    }

    #[test]
    fn visitors_cover_every_entry() {
        let m: TreeMap<i32, ()> = [4, 2, 6, 1, 3, 5, 7].into_iter().map(|k| (k, ())).collect();
        let mut pre = Vec::new();
        m.preorder(|k, _| pre.push(*k));
        let mut post = Vec::new();
        m.postorder(|k, _| post.push(*k));
        let mut level = Vec::new();
        m.level_order(|k, _| level.push(*k));
        let mut ino = Vec::new();
        m.inorder(|k, _| ino.push(*k));

        assert_eq!(ino, vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(pre.len(), 7);
        assert_eq!(post.len(), 7);
        assert_eq!(level[0], pre[0]);
        assert_eq!(post[6], pre[0]);
    }

    #[test]
    fn get_mut_contains_and_clear() {
        let mut m: TreeMap<String, i32> = TreeMap::new();
        m.insert("x".to_string(), 1);
        *m.get_mut(&"x".to_string()).unwrap() += 41;
        assert_eq!(m.get_key_value(&"x".to_string()), Some((&"x".to_string(), &42)));
        assert!(m.contains_value(&42));
        assert!(!m.contains_value(&1));
        m.clear();
        assert!(m.is_empty());
        assert!(!m.contains_key(&"x".to_string()));
        assert_eq!(m.height(), 0);
    }

    #[test]
    fn debug_lists_entries_in_order() {
        let m: TreeMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
        assert_eq!(format!("{m:?}"), r#"{1: "a", 2: "b"}"#);
    }
}
