//! LinkedHashTreeMap: a [`HashTreeMap`](crate::HashTreeMap) that remembers
//! insertion order.
//!
//! Every node carries a second link pair (`Chain`) threading all entries,
//! across buckets, from oldest to newest. The chain never influences the
//! bucket trees; it is kept in step with them through the table's overlay
//! hooks:
//!
//! - creation appends at the tail,
//! - unlink splices the node out,
//! - the payload exchange of a degree-2 delete exchanges the two nodes'
//!   chain positions as well, so chain order keeps following the entries
//!   rather than the node records.
//!
//! Re-inserting an existing key replaces its value in place and does not
//! move it in the chain.

use crate::node::{NodeId, Nodes};
use crate::raw_table::{HashNode, Overlay, RawTable, TableNodes};
use crate::table_map::table_map_shell;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::hash_map::DefaultHashBuilder;

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Chain {
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Head and tail of the insertion-order chain.
#[derive(Debug, Default)]
pub(crate) struct InsertionOrder {
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl InsertionOrder {
    /// Point `id`'s neighbours (or head/tail) back at it.
    fn relink<K, V>(&mut self, nodes: &mut Nodes<HashNode<K, V, Chain>>, id: NodeId) {
        let Chain { prev, next } = nodes[id].chain;
        match prev {
            Some(p) => nodes[p].chain.next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(n) => nodes[n].chain.prev = Some(id),
            None => self.tail = Some(id),
        }
    }
}

impl Overlay for InsertionOrder {
    type Link = Chain;

    fn on_create<K, V>(&mut self, nodes: &mut Nodes<HashNode<K, V, Chain>>, id: NodeId) {
        nodes[id].chain = Chain {
            prev: self.tail,
            next: None,
        };
        self.relink(nodes, id);
    }

    fn on_swap<K, V>(
        &mut self,
        nodes: &mut Nodes<HashNode<K, V, Chain>>,
        shown: NodeId,
        moved: NodeId,
    ) {
        // Each node takes the other's position. The two may be neighbours,
        // so references to either are remapped before relinking.
        let remap = |x: Option<NodeId>| match x {
            Some(x) if x == shown => Some(moved),
            Some(x) if x == moved => Some(shown),
            other => other,
        };
        let a = nodes[shown].chain;
        let b = nodes[moved].chain;
        nodes[shown].chain = Chain {
            prev: remap(b.prev),
            next: remap(b.next),
        };
        nodes[moved].chain = Chain {
            prev: remap(a.prev),
            next: remap(a.next),
        };
        self.relink(nodes, shown);
        self.relink(nodes, moved);
    }

    fn on_remove<K, V>(&mut self, nodes: &mut Nodes<HashNode<K, V, Chain>>, id: NodeId) {
        let Chain { prev, next } = core::mem::take(&mut nodes[id].chain);
        match prev {
            Some(p) => nodes[p].chain.next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => nodes[n].chain.prev = prev,
            None => self.tail = prev,
        }
    }

    fn on_clear(&mut self) {
        self.head = None;
        self.tail = None;
    }
}

pub struct LinkedHashTreeMap<K, V, S = DefaultHashBuilder> {
    table: RawTable<K, V, S, InsertionOrder>,
}

table_map_shell!(LinkedHashTreeMap, "linked hash tree map");

impl<K, V, S> LinkedHashTreeMap<K, V, S> {
    /// Oldest entry.
    pub fn front(&self) -> Option<(&K, &V)> {
        self.table.overlay.head.map(|id| self.table.pair(id))
    }

    /// Newest entry.
    pub fn back(&self) -> Option<(&K, &V)> {
        self.table.overlay.tail.map(|id| self.table.pair(id))
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            nodes: self.table.nodes(),
            front: self.table.overlay.head,
            back: self.table.overlay.tail,
            remaining: self.table.len(),
        }
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Visit every entry in insertion order.
    pub fn traverse(&self, mut visit: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    /// Walks the chain.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<K, V, S> LinkedHashTreeMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Insert or replace. A replaced entry keeps its chain position.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    /// Bucket invariants plus a well-formed chain covering every entry in
    /// strictly increasing stamp order.
    #[cfg(test)]
    pub(crate) fn validate(&self) -> Result<(), crate::error::InvariantViolation> {
        use crate::error::InvariantViolation;

        self.table.validate()?;
        let nodes = self.table.nodes();
        let mut prev: Option<NodeId> = None;
        let mut cur = self.table.overlay.head;
        let mut count = 0;
        while let Some(id) = cur {
            let n = &nodes[id];
            if n.chain.prev != prev {
                return Err(InvariantViolation::new(format!(
                    "{id:?} has a broken back link"
                )));
            }
            if let Some(p) = prev {
                if nodes[p].stamp() >= n.stamp() {
                    return Err(InvariantViolation::new(format!(
                        "{id:?} is chained after a newer entry"
                    )));
                }
            }
            count += 1;
            if count > nodes.len() {
                return Err(InvariantViolation::new("chain has a cycle"));
            }
            prev = Some(id);
            cur = n.chain.next;
        }
        if prev != self.table.overlay.tail {
            return Err(InvariantViolation::new("chain does not end at the tail"));
        }
        if count != nodes.len() {
            return Err(InvariantViolation::new(format!(
                "chain holds {count} entries but {} stored",
                nodes.len()
            )));
        }
        Ok(())
    }
}

/// Insertion-order iterator over a [`LinkedHashTreeMap`].
pub struct Iter<'a, K, V> {
    nodes: &'a TableNodes<K, V, InsertionOrder>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = &self.nodes[self.front?];
        self.remaining -= 1;
        self.front = n.chain.next;
        Some((&n.key, &n.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let n = &self.nodes[self.back?];
        self.remaining -= 1;
        self.back = n.chain.prev;
        Some((&n.key, &n.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashTreeMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for LinkedHashTreeMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
