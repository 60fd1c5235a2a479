use serde::{Deserialize, Serialize};

use crate::{OrderError, Result};

/// Tuning for the list-labeling scheme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelingConfig {
    /// Base `θ` of the overflow threshold. An aligned label range of size
    /// `2^k` may absorb a new label only while its density stays at or below
    /// `θ^-k`. Must lie strictly between 1 and 2. The universe grows like
    /// `n^(1 / (1 - log2 θ))` for `n` events, so bases close to 2 saturate
    /// 64-bit labels quickly and then respace every label more often; bases
    /// close to 1 relabel larger ranges.
    pub overflow_base: f64,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self { overflow_base: 1.4 }
    }
}

impl LabelingConfig {
    pub fn validate(&self) -> Result<()> {
        if self.overflow_base > 1.0 && self.overflow_base < 2.0 {
            Ok(())
        } else {
            Err(OrderError::InvalidConfig(format!(
                "overflow_base must be in (1, 2), got {}",
                self.overflow_base
            )))
        }
    }

    /// Density ceiling for an aligned range of `size` labels (a power of two).
    pub fn threshold(&self, size: u64) -> f64 {
        self.overflow_base.powi(-(size.trailing_zeros() as i32))
    }

    /// Whether `occupied` labels fit in a range of `size` without overflowing.
    pub(crate) fn fits(&self, occupied: usize, size: u64) -> bool {
        occupied as f64 / size as f64 <= self.threshold(size)
    }
}
