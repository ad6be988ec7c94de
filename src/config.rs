//! Configuration types for the chained map

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Sizing policy for [`ChainedMap`](crate::map::ChainedMap).
///
/// The threshold is the per-bucket chain length that triggers a resize. It is
/// derived from the bucket count as `buckets * threshold_numerator /
/// threshold_denominator`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainedMapConfig {
    pub initial_buckets: usize,
    pub threshold_numerator: usize,
    pub threshold_denominator: usize,
    pub growth_factor: usize,
}

impl Default for ChainedMapConfig {
    fn default() -> Self {
        Self {
            initial_buckets: 11,
            threshold_numerator: 3,
            threshold_denominator: 4,
            growth_factor: 19,
        }
    }
}

/// Largest accepted `growth_factor`.
pub const MAX_GROWTH_FACTOR: usize = 64;

/// Largest accepted `initial_buckets`.
pub const MAX_INITIAL_BUCKETS: usize = 1 << 24;

impl ChainedMapConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> QueryResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> QueryResult<()> {
        let problem = if self.initial_buckets == 0 {
            Some("initial_buckets must be positive")
        } else if self.initial_buckets > MAX_INITIAL_BUCKETS {
            Some("initial_buckets is too large")
        } else if self.threshold_denominator == 0 {
            Some("threshold_denominator must be positive")
        } else if self.threshold_numerator == 0 {
            Some("threshold_numerator must be positive")
        } else if self.threshold_numerator > self.threshold_denominator {
            Some("threshold ratio must not exceed one")
        } else if self.growth_factor < 2 {
            Some("growth_factor must be at least 2")
        } else if self.growth_factor > MAX_GROWTH_FACTOR {
            Some("growth_factor is too large")
        } else {
            None
        };

        match problem {
            Some(msg) => {
                log::warn!("Rejected chained map config {:?}: {}", self, msg);
                Err(QueryError::InvalidConfig(msg.to_string()))
            }
            None => Ok(()),
        }
    }

    /// Chain length that triggers a resize for a table of `buckets` buckets.
    /// Never less than one so a tiny table still grows. Computed in `u128` so
    /// it cannot overflow; a zero denominator yields the smallest threshold.
    pub fn threshold_for(&self, buckets: usize) -> usize {
        let scaled = (buckets as u128 * self.threshold_numerator as u128)
            .checked_div(self.threshold_denominator as u128)
            .unwrap_or(0);
        usize::try_from(scaled).unwrap_or(usize::MAX).max(1)
    }
}
