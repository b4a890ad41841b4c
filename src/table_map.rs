//! Surface shared by the hash-backed maps.
//!
//! `HashTreeMap` and `LinkedHashTreeMap` differ only in the overlay their
//! `RawTable` carries and in how they iterate. Everything else (construction,
//! sizing accessors, keyed lookup and removal, the std collection traits) is
//! stamped out here so the two stay in step.
//!
//! The invoking type must be `struct $map<K, V, S> { table: RawTable<K, V, S, _> }`
//! and must define its own `insert`.

macro_rules! table_map_shell {
    ($map:ident, $label:literal) => {
        impl<K, V> $map<K, V, ::hashbrown::hash_map::DefaultHashBuilder> {
            /// An empty map with 16 buckets and a 0.75 load factor.
            pub fn new() -> Self {
                Self::with_hasher(::hashbrown::hash_map::DefaultHashBuilder::default())
            }

            /// An empty map starting with at least `capacity` buckets (at
            /// least one).
            ///
            /// # Panics
            /// If `capacity` cannot be rounded up to a power of two.
            pub fn with_capacity(capacity: usize) -> Self {
                let config = $crate::config::TableConfig::new()
                    .with_initial_capacity(capacity.max(1));
                Self::from_config(
                    config,
                    ::hashbrown::hash_map::DefaultHashBuilder::default(),
                    None,
                )
                .expect("bucket array capacity overflow")
            }

            /// An empty map that orders colliding keys with `compare` before
            /// falling back to insertion identity.
            pub fn with_comparator(compare: $crate::Comparator<K>) -> Self {
                Self::with_table(
                    $crate::config::DEFAULT_CAPACITY,
                    $crate::config::DEFAULT_LOAD_FACTOR,
                    ::hashbrown::hash_map::DefaultHashBuilder::default(),
                    Some(compare),
                )
            }

            /// Like [`with_comparator`](Self::with_comparator) using `Ord::cmp`.
            pub fn ordered() -> Self
            where
                K: Ord,
            {
                Self::with_comparator(K::cmp)
            }
        }

        impl<K, V, S> $map<K, V, S> {
            pub fn with_hasher(hasher: S) -> Self {
                Self::with_table(
                    $crate::config::DEFAULT_CAPACITY,
                    $crate::config::DEFAULT_LOAD_FACTOR,
                    hasher,
                    None,
                )
            }

            pub fn with_config(
                config: $crate::config::TableConfig,
                hasher: S,
            ) -> Result<Self, $crate::error::Error> {
                Self::from_config(config, hasher, None)
            }

            /// Fully specified constructor; `compare` supplies the middle
            /// level of the bucket order.
            pub fn from_config(
                config: $crate::config::TableConfig,
                hasher: S,
                compare: Option<$crate::Comparator<K>>,
            ) -> Result<Self, $crate::error::Error> {
                let buckets = config.validate()?;
                if config != $crate::config::TableConfig::default() {
                    ::tracing::debug!(
                        map = $label,
                        buckets,
                        load_factor = config.load_factor,
                        "building table"
                    );
                }
                Ok(Self::with_table(buckets, config.load_factor, hasher, compare))
            }

            fn with_table(
                buckets: usize,
                load_factor: f32,
                hasher: S,
                compare: Option<$crate::Comparator<K>>,
            ) -> Self {
                Self {
                    table: $crate::raw_table::RawTable::new(buckets, load_factor, hasher, compare),
                }
            }

            pub fn len(&self) -> usize {
                self.table.len()
            }

            pub fn is_empty(&self) -> bool {
                self.table.is_empty()
            }

            /// Current number of buckets.
            pub fn capacity(&self) -> usize {
                self.table.capacity()
            }

            pub fn load_factor(&self) -> f32 {
                self.table.load_factor()
            }

            pub fn hasher(&self) -> &S {
                self.table.hasher()
            }

            /// Remove every entry. The bucket array keeps its current size.
            pub fn clear(&mut self) {
                self.table.clear();
            }
        }

        impl<K, V, S> $map<K, V, S>
        where
            K: ::core::hash::Hash + Eq,
            S: ::core::hash::BuildHasher,
        {
            pub fn get(&self, key: &K) -> Option<&V> {
                self.table.find(key).map(|id| self.table.value_of(id))
            }

            pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
                let id = self.table.find(key)?;
                Some(self.table.value_mut_of(id))
            }

            pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
                self.table.find(key).map(|id| self.table.pair(id))
            }

            pub fn contains_key(&self, key: &K) -> bool {
                self.table.find(key).is_some()
            }

            pub fn remove(&mut self, key: &K) -> Option<V> {
                self.table.remove(key).map(|(_, v)| v)
            }

            pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
                self.table.remove(key)
            }
        }

        impl<K, V, S: Default> Default for $map<K, V, S> {
            fn default() -> Self {
                Self::with_hasher(S::default())
            }
        }

        impl<K, V, S> Extend<(K, V)> for $map<K, V, S>
        where
            K: ::core::hash::Hash + Eq,
            S: ::core::hash::BuildHasher,
        {
            fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
                for (k, v) in iter {
                    self.insert(k, v);
                }
            }
        }

        impl<K, V, S> FromIterator<(K, V)> for $map<K, V, S>
        where
            K: ::core::hash::Hash + Eq,
            S: ::core::hash::BuildHasher + Default,
        {
            fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
                let mut map = Self::default();
                map.extend(iter);
                map
            }
        }
    };
}

pub(crate) use table_map_shell;
