//! Growth parameters shared by `KeyedIndex` and the graph built on it.

use thiserror::Error;

/// Bucket count a fresh index starts with.
pub const INITIAL_BUCKETS: usize = 49;
/// Post-insert load factor at which the bucket array grows.
pub const MAX_LOAD_FACTOR: f64 = 1.0;
/// Multiplier applied to the bucket count on every resize.
pub const GROWTH_FACTOR: usize = 2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("initial bucket count must be non-zero")]
    ZeroBuckets,
    #[error("max load factor must be finite and positive, got {0}")]
    InvalidLoadFactor(f64),
    #[error("growth factor must be at least 2, got {0}")]
    InvalidGrowthFactor(usize),
}

/// Sizing policy for a `KeyedIndex`.
///
/// Growth is reactive: after an insert adds a new entry, the index checks
/// `len >= buckets * max_load_factor` and, while it holds, multiplies its
/// bucket count by `growth_factor`. Indexes never shrink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexConfig {
    pub initial_buckets: usize,
    pub max_load_factor: f64,
    pub growth_factor: usize,
}

impl IndexConfig {
    pub const fn new() -> Self {
        Self {
            initial_buckets: INITIAL_BUCKETS,
            max_load_factor: MAX_LOAD_FACTOR,
            growth_factor: GROWTH_FACTOR,
        }
    }

    pub fn initial_buckets(mut self, n: usize) -> Self {
        self.initial_buckets = n;
        self
    }

    pub fn max_load_factor(mut self, lf: f64) -> Self {
        self.max_load_factor = lf;
        self
    }

    pub fn growth_factor(mut self, g: usize) -> Self {
        self.growth_factor = g;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBuckets);
        }
        if !self.max_load_factor.is_finite() || self.max_load_factor <= 0.0 {
            return Err(ConfigError::InvalidLoadFactor(self.max_load_factor));
        }
        if self.growth_factor < 2 {
            return Err(ConfigError::InvalidGrowthFactor(self.growth_factor));
        }
        Ok(())
    }

    /// True when `len` entries in `buckets` buckets reach the growth threshold.
    #[inline]
    pub(crate) fn needs_resize(&self, len: usize, buckets: usize) -> bool {
        len as f64 >= buckets as f64 * self.max_load_factor
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new()
    }
}
