//! Inverse-occurrence motif weights.

use serde::{Deserialize, Serialize};

/// `1 / total_occurrence_count` for a motif; `0.0` for a motif that never occurs.
#[inline]
pub fn inverse_occurrence(total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        1.0 / total as f64
    }
}

/// Per-slot motif weights, parallel to the motif-name list and tradition vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MotifWeights {
    weights: Vec<f64>,
}

impl MotifWeights {
    pub fn new(weights: Vec<f64>) -> Self {
        Self { weights }
    }

    /// Derive weights from each motif's total occurrence count, one per slot.
    pub fn from_totals<I: IntoIterator<Item = u64>>(totals: I) -> Self {
        Self {
            weights: totals.into_iter().map(inverse_occurrence).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<f64> {
        self.weights.get(slot).copied()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }
}
