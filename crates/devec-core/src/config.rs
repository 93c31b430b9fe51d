//! Growth configuration for devector reallocation.

use crate::error::DevecError;

/// How a devector picks its next capacity when an end runs out of slack.
///
/// The next capacity is `capacity * factor + increment`, saturating, and
/// never less than what the pending insertion requires. The default
/// (`factor = 2`, `increment = 1`) gives the classic `capacity * 2 + 1`
/// sequence `1, 3, 7, 15, ...` starting from an empty buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GrowthPolicy {
    /// Multiplier applied to the current capacity. Default: 2.
    pub factor: usize,
    /// Slots added after multiplying. Default: 1.
    pub increment: usize,
}

impl GrowthPolicy {
    /// Default multiplier.
    pub const DEFAULT_FACTOR: usize = 2;

    /// Default additive increment.
    pub const DEFAULT_INCREMENT: usize = 1;

    /// Create a policy with the given factor and increment.
    ///
    /// The result is not validated; see [`validate`](Self::validate).
    pub const fn new(factor: usize, increment: usize) -> Self {
        Self { factor, increment }
    }

    /// Check that repeated growth always makes progress.
    ///
    /// Requires `factor >= 1` (capacity never shrinks) and
    /// `increment >= 1`, so an empty buffer grows too.
    pub fn validate(&self) -> Result<(), DevecError> {
        if self.factor == 0 {
            return Err(DevecError::InvalidConfig {
                reason: "factor must be at least 1".into(),
            });
        }
        if self.increment == 0 {
            return Err(DevecError::InvalidConfig {
                reason: "increment must be at least 1 so an empty buffer can grow".into(),
            });
        }
        Ok(())
    }

    /// Capacity to grow to from `capacity` when at least `required` slots
    /// must fit.
    pub fn next_capacity(&self, capacity: usize, required: usize) -> usize {
        capacity
            .saturating_mul(self.factor)
            .saturating_add(self.increment)
            .max(required)
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FACTOR, Self::DEFAULT_INCREMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_doubles_plus_one() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.next_capacity(0, 1), 1);
        assert_eq!(policy.next_capacity(1, 2), 3);
        assert_eq!(policy.next_capacity(7, 8), 15);
    }

    #[test]
    fn required_wins_over_small_growth() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.next_capacity(3, 100), 100);
    }

    #[test]
    fn saturates_instead_of_overflowing() {
        let policy = GrowthPolicy::default();
        assert_eq!(policy.next_capacity(usize::MAX / 2 + 1, 1), usize::MAX);
    }

    #[test]
    fn zero_factor_rejected() {
        let err = GrowthPolicy::new(0, 4).validate().unwrap_err();
        assert!(matches!(err, DevecError::InvalidConfig { .. }));
    }

    #[test]
    fn zero_increment_rejected() {
        assert!(GrowthPolicy::new(3, 0).validate().is_err());
        assert!(GrowthPolicy::new(1, 8).validate().is_ok());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_policy_always_grows(
                factor in 1usize..8,
                increment in 1usize..64,
                capacity in 0usize..1_000_000,
            ) {
                let policy = GrowthPolicy::new(factor, increment);
                prop_assert!(policy.validate().is_ok());
                prop_assert!(policy.next_capacity(capacity, capacity + 1) > capacity);
            }
        }
    }
}
