//! Sets as maps with unit values.

use crate::balance::{Balance, RedBlack};
use crate::hash_tree_map::HashTreeMap;
use crate::linked_hash_tree_map::LinkedHashTreeMap;
use crate::tree_map::TreeMap;
use crate::Comparator;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;

/// Ordered set on a balanced tree.
pub struct TreeSet<T, B: Balance = RedBlack> {
    map: TreeMap<T, (), B>,
}

impl<T: Ord> TreeSet<T> {
    pub fn new() -> Self {
        Self::new_balanced()
    }
}

impl<T: Ord, B: Balance> TreeSet<T, B> {
    /// An empty set ordered by `Ord::cmp` under the policy `B`.
    pub fn new_balanced() -> Self {
        Self {
            map: TreeMap::new_balanced(),
        }
    }
}

impl<T: Ord, B: Balance> Default for TreeSet<T, B> {
    fn default() -> Self {
        Self::new_balanced()
    }
}

impl<T, B: Balance> TreeSet<T, B> {
    pub fn with_comparator(compare: Comparator<T>) -> Self {
        Self {
            map: TreeMap::with_comparator(compare),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns whether `value` was newly added.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    /// Returns whether `value` was present.
    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_some()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }

    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(k, _)| k)
    }

    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(k, _)| k)
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(k, _)| k)
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(k, _)| k)
    }

    /// Ascending.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.map.keys()
    }

    pub fn traverse(&self, mut visit: impl FnMut(&T)) {
        self.map.traverse(|k, _| visit(k));
    }
}

impl<T: Ord, B: Balance> FromIterator<T> for TreeSet<T, B> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|t| (t, ())).collect(),
        }
    }
}

impl<T: fmt::Debug, B: Balance> fmt::Debug for TreeSet<T, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Set on a [`HashTreeMap`]; iterates in bucket order.
pub struct HashTreeSet<T, S = DefaultHashBuilder> {
    map: HashTreeMap<T, (), S>,
}

impl<T> HashTreeSet<T, DefaultHashBuilder> {
    pub fn new() -> Self {
        Self {
            map: HashTreeMap::new(),
        }
    }
}

impl<T, S: Default> Default for HashTreeSet<T, S> {
    fn default() -> Self {
        Self {
            map: HashTreeMap::default(),
        }
    }
}

impl<T, S> HashTreeSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: HashTreeMap::with_hasher(hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &T> + '_ {
        self.map.keys()
    }

    pub fn traverse(&self, mut visit: impl FnMut(&T)) {
        self.map.traverse(|k, _| visit(k));
    }
}

impl<T: Hash + Eq, S: BuildHasher> HashTreeSet<T, S> {
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_some()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for HashTreeSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|t| (t, ())).collect(),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for HashTreeSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Set on a [`LinkedHashTreeMap`]; iterates in insertion order.
pub struct LinkedHashTreeSet<T, S = DefaultHashBuilder> {
    map: LinkedHashTreeMap<T, (), S>,
}

impl<T> LinkedHashTreeSet<T, DefaultHashBuilder> {
    pub fn new() -> Self {
        Self {
            map: LinkedHashTreeMap::new(),
        }
    }
}

impl<T, S: Default> Default for LinkedHashTreeSet<T, S> {
    fn default() -> Self {
        Self {
            map: LinkedHashTreeMap::default(),
        }
    }
}

impl<T, S> LinkedHashTreeSet<T, S> {
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            map: LinkedHashTreeMap::with_hasher(hasher),
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator + '_ {
        self.map.keys()
    }

    pub fn traverse(&self, mut visit: impl FnMut(&T)) {
        self.map.traverse(|k, _| visit(k));
    }
}

impl<T: Hash + Eq, S: BuildHasher> LinkedHashTreeSet<T, S> {
    /// A value already present keeps its position.
    pub fn insert(&mut self, value: T) -> bool {
        self.map.insert(value, ()).is_none()
    }

    pub fn remove(&mut self, value: &T) -> bool {
        self.map.remove(value).is_some()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.map.contains_key(value)
    }
}

impl<T: Hash + Eq, S: BuildHasher + Default> FromIterator<T> for LinkedHashTreeSet<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().map(|t| (t, ())).collect(),
        }
    }
}

impl<T: fmt::Debug, S> fmt::Debug for LinkedHashTreeSet<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
