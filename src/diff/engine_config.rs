//! Configuration types for the diff engine.

use crate::matching::{DuplicatePolicy, FallbackStrategy};
use crate::model::NumericTolerance;

/// Tuning knobs for [`DiffEngine`](super::DiffEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOptions {
    /// Tolerance used when both values read as numbers
    pub tolerance: NumericTolerance,
    /// Which row is kept when a key repeats within one table
    pub duplicate_policy: DuplicatePolicy,
    /// Keying strategy when no identifier is shared by both tables
    pub fallback: FallbackStrategy,
    /// Allow rayon to index and classify in parallel
    pub parallel: bool,
    /// Minimum number of keys before classification goes parallel
    pub parallel_threshold: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            tolerance: NumericTolerance::default(),
            duplicate_policy: DuplicatePolicy::LastWriteWins,
            fallback: FallbackStrategy::ContentHash,
            parallel: true,
            parallel_threshold: 2_000,
        }
    }
}

impl DiffOptions {
    /// Exact numeric comparison, and sheets without shared identifiers fail.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            tolerance: NumericTolerance::exact(),
            fallback: FallbackStrategy::Fail,
            ..Self::default()
        }
    }

    /// Loose numeric comparison for values that went through float formatting.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            tolerance: NumericTolerance {
                absolute: 1e-6,
                relative: 1e-6,
            },
            ..Self::default()
        }
    }

    /// Single-threaded, for reproducible timings and small inputs.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// True when `key_count` keys should be classified on the rayon pool.
    #[must_use]
    pub const fn use_parallel(&self, key_count: usize) -> bool {
        self.parallel && key_count >= self.parallel_threshold
    }
}
