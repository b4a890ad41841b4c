//! Error types.
//!
//! Absent keys are never errors; lookups and removals report them as `None`.
//! `Error` covers caller mistakes at construction time. `InvariantViolation`
//! describes a corrupted tree and only comes out of the internal validators
//! the test suites run after every mutation.

use thiserror::Error;

/// Invalid argument passed while configuring a hash-backed map.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,
    #[error("initial capacity {0} cannot be rounded up to a power of two")]
    CapacityOverflow(usize),
    #[error("load factor must be a positive finite number, got {0}")]
    InvalidLoadFactor(f32),
}

/// A structural invariant (ordering, coloring, balance, links) does not hold.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("tree invariant violated: {reason}")]
pub struct InvariantViolation {
    reason: String,
}

impl InvariantViolation {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
