//! Construction-time settings for the hash-backed maps.

use crate::error::Error;

/// Bucket count used when no capacity is requested.
pub const DEFAULT_CAPACITY: usize = 16;
/// Average bucket depth above which the bucket array doubles.
pub const DEFAULT_LOAD_FACTOR: f32 = 0.75;

/// Initial capacity and growth threshold of a hash-backed map.
///
/// The capacity is a bucket count; it is rounded up to the next power of two
/// so that bucket selection can mask the hash instead of dividing. The table
/// doubles before an insert whenever `len / capacity` exceeds `load_factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    pub initial_capacity: usize,
    pub load_factor: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            load_factor: DEFAULT_LOAD_FACTOR,
        }
    }
}

impl TableConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_load_factor(mut self, load_factor: f32) -> Self {
        self.load_factor = load_factor;
        self
    }

    /// Check the settings and return the bucket count the table starts with.
    pub fn validate(&self) -> Result<usize, Error> {
        if self.initial_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if !(self.load_factor.is_finite() && self.load_factor > 0.0) {
            return Err(Error::InvalidLoadFactor(self.load_factor));
        }
        self.initial_capacity
            .checked_next_power_of_two()
            .ok_or(Error::CapacityOverflow(self.initial_capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sixteen_buckets_at_three_quarters() {
        let c = TableConfig::default();
        assert_eq!(c.initial_capacity, 16);
        assert_eq!(c.load_factor, 0.75);
        assert_eq!(c.validate(), Ok(16));
    }

    #[test]
    fn capacity_rounds_up_to_power_of_two() {
        assert_eq!(TableConfig::new().with_initial_capacity(1).validate(), Ok(1));
        assert_eq!(TableConfig::new().with_initial_capacity(5).validate(), Ok(8));
        assert_eq!(TableConfig::new().with_initial_capacity(64).validate(), Ok(64));
    }

    #[test]
    fn rejects_bad_arguments() {
        assert_eq!(
            TableConfig::new().with_initial_capacity(0).validate(),
            Err(Error::ZeroCapacity)
        );
        assert_eq!(
            TableConfig::new().with_initial_capacity(usize::MAX).validate(),
            Err(Error::CapacityOverflow(usize::MAX))
        );
        assert!(matches!(
            TableConfig::new().with_load_factor(0.0).validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
        assert!(matches!(
            TableConfig::new().with_load_factor(f32::NAN).validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
        assert!(matches!(
            TableConfig::new().with_load_factor(f32::INFINITY).validate(),
            Err(Error::InvalidLoadFactor(_))
        ));
    }
}
