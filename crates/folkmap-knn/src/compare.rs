//! Motif-inventory comparison between two traditions.

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

use crate::error::KnnError;
use crate::store::VectorStore;

/// Motifs shared by two traditions versus held by only one of them.
///
/// Each list is in motif-slot order. Together they cover every slot where at
/// least one of the two traditions has the motif, and no slot twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub common: Vec<String>,
    pub only_first: Vec<String>,
    pub only_second: Vec<String>,
}

/// Compares traditions over a shared motif index space.
#[derive(Debug, Clone, Copy)]
pub struct TraditionComparator<'a> {
    store: &'a VectorStore,
    motif_names: &'a [String],
}

impl<'a> TraditionComparator<'a> {
    /// `motif_names[i]` names slot `i` of every tradition vector in `store`.
    pub fn new(store: &'a VectorStore, motif_names: &'a [String]) -> Self {
        Self { store, motif_names }
    }

    /// Partition the motifs of `first` and `second`.
    ///
    /// # Errors
    ///
    /// - [`KnnError::NotFound`] if either code is absent.
    /// - [`KnnError::DimensionMismatch`] if a present slot has no motif name.
    pub fn compare(&self, first: &str, second: &str) -> Result<Comparison, KnnError> {
        let a = self
            .store
            .get(first)
            .ok_or_else(|| KnnError::NotFound(first.to_string()))?;
        let b = self
            .store
            .get(second)
            .ok_or_else(|| KnnError::NotFound(second.to_string()))?;

        let (a, b) = (a.presence(), b.presence());
        Ok(Comparison {
            common: self.names(&(a & b))?,
            only_first: self.names(&(a - b))?,
            only_second: self.names(&(b - a))?,
        })
    }

    fn names(&self, slots: &RoaringBitmap) -> Result<Vec<String>, KnnError> {
        slots
            .iter()
            .map(|slot| {
                self.motif_names
                    .get(slot as usize)
                    .cloned()
                    .ok_or(KnnError::DimensionMismatch {
                        expected: slot as usize + 1,
                        got: self.motif_names.len(),
                    })
            })
            .collect()
    }
}
