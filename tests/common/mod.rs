// Helpers shared by the integration suites and the benches.
#![allow(dead_code)]

use std::hash::{BuildHasher, Hasher};

/// Hashes every key to zero, so a table degenerates to one bucket tree.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConstBuildHasher;

pub struct ConstHasher;

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
