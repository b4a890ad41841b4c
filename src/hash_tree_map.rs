//! HashTreeMap: hash table whose buckets are red-black trees.
//!
//! Lookups cost one hash plus a walk down one bucket tree, so even a bucket
//! that every key collides into stays logarithmic. Iteration visits buckets
//! in index order and each bucket in ascending composite order; it is
//! deterministic for a given hasher and insertion history, but otherwise
//! arbitrary. See [`LinkedHashTreeMap`](crate::LinkedHashTreeMap) for
//! insertion-order iteration.

use crate::raw_table::{BucketWalk, RawTable, Unordered};
use crate::table_map::table_map_shell;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use hashbrown::hash_map::DefaultHashBuilder;

pub struct HashTreeMap<K, V, S = DefaultHashBuilder> {
    table: RawTable<K, V, S, Unordered>,
}

table_map_shell!(HashTreeMap, "hash tree map");

impl<K, V, S> HashTreeMap<K, V, S> {
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            walk: self.table.bucket_walk(),
        }
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Visit every entry, bucket by bucket.
    pub fn traverse(&self, mut visit: impl FnMut(&K, &V)) {
        for (k, v) in self.iter() {
            visit(k, v);
        }
    }

    /// Breadth-first scan of every bucket.
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.table.scan_values(value)
    }
}

impl<K, V, S> HashTreeMap<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Insert or replace. Returns the previous value of an existing key,
    /// which keeps its original key instance.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.table.insert(key, value)
    }

    #[cfg(test)]
    pub(crate) fn validate(&self) -> Result<(), crate::error::InvariantViolation> {
        self.table.validate()
    }
}

/// Iterator over a [`HashTreeMap`] in bucket order.
pub struct Iter<'a, K, V> {
    walk: BucketWalk<'a, K, V, ()>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.walk.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.walk.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<'a, K, V, S> IntoIterator for &'a HashTreeMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, S> fmt::Debug for HashTreeMap<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
