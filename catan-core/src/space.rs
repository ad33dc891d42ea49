//! Space declarations consumed by training frameworks.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A vector of independent discrete slots; slot `i` takes values in `0..nvec[i]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDiscrete {
    pub nvec: Vec<u32>,
}

impl MultiDiscrete {
    pub fn new(nvec: Vec<u32>) -> Self {
        Self { nvec }
    }

    pub fn len(&self) -> usize {
        self.nvec.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nvec.is_empty()
    }

    /// Inclusive upper bound of every slot.
    pub fn max_values(&self) -> Vec<u32> {
        self.nvec.iter().map(|n| n.saturating_sub(1)).collect()
    }

    pub fn contains(&self, values: &[u32]) -> bool {
        values.len() == self.nvec.len() && values.iter().zip(&self.nvec).all(|(v, n)| v < n)
    }

    /// Uniform sample of every slot.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<u32> {
        self.nvec.iter().map(|&n| rng.gen_range(0..n.max(1))).collect()
    }
}
