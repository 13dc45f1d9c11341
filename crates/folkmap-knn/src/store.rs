//! Read-only mapping from item code to feature vector.
//!
//! Each vector keeps its raw slot values next to a [`RoaringBitmap`] of the
//! slots holding exactly `1`. Metrics and the comparator walk the bitmap, so a
//! sparse presence vector costs O(set bits) instead of O(dimension).

use std::collections::BTreeMap;

use roaring::RoaringBitmap;

use crate::error::KnnError;

// ─────────────────────────────────────────────
// FeatureVector
// ─────────────────────────────────────────────

/// A fixed-length vector of non-negative slot values plus its presence set.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<u32>,
    present: RoaringBitmap,
}

impl FeatureVector {
    pub fn new(values: Vec<u32>) -> Self {
        let present = values
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v == 1)
            .map(|(i, _)| i as u32)
            .collect();
        Self { values, present }
    }

    /// Number of slots.
    #[inline]
    pub fn dim(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Slots holding exactly `1`, in ascending index order.
    #[inline]
    pub fn presence(&self) -> &RoaringBitmap {
        &self.present
    }
}

impl From<Vec<u32>> for FeatureVector {
    fn from(values: Vec<u32>) -> Self {
        Self::new(values)
    }
}

// ─────────────────────────────────────────────
// VectorStore
// ─────────────────────────────────────────────

/// Immutable code → vector mapping. Keys define the universe of queryable items.
///
/// Iteration is in lexicographic code order, which keeps rankings reproducible.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    vectors: BTreeMap<String, FeatureVector>,
}

impl VectorStore {
    /// Build a store from `(code, values)` pairs. A repeated code keeps the last vector.
    pub fn from_vectors<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u32>)>,
        S: Into<String>,
    {
        let vectors = items
            .into_iter()
            .map(|(code, values)| (code.into(), FeatureVector::new(values)))
            .collect();
        Self { vectors }
    }

    pub fn get(&self, code: &str) -> Option<&FeatureVector> {
        self.vectors.get(code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.vectors.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// All `(code, vector)` pairs in code order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureVector)> {
        self.vectors.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.vectors.keys().map(String::as_str)
    }

    /// Length of the first vector, or `None` for an empty store.
    pub fn dimension(&self) -> Option<usize> {
        self.vectors.values().next().map(FeatureVector::dim)
    }

    /// Check that every vector has exactly `expected` slots.
    pub fn ensure_dimension(&self, expected: usize) -> Result<(), KnnError> {
        match self.vectors.values().find(|v| v.dim() != expected) {
            Some(bad) => Err(KnnError::DimensionMismatch {
                expected,
                got: bad.dim(),
            }),
            None => Ok(()),
        }
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<u32>)> for VectorStore {
    fn from_iter<I: IntoIterator<Item = (S, Vec<u32>)>>(iter: I) -> Self {
        Self::from_vectors(iter)
    }
}
