//! Test-only helpers shared by the in-crate suites.

use core::hash::{BuildHasher, Hasher};

/// Hashes every key to zero, so a table degenerates to one bucket tree.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConstBuildHasher;

pub(crate) struct ConstHasher;

impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;

    fn build_hasher(&self) -> ConstHasher {
        ConstHasher
    }
}

impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}

    fn finish(&self) -> u64 {
        0
    }
}
