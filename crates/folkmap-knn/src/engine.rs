//! Immutable query engine: one collection per dataset plus the motif-name list.
//!
//! Built once at startup and shared by reference; all methods take `&self`
//! and the engine is `Send + Sync`.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::compare::{Comparison, TraditionComparator};
use crate::error::KnnError;
use crate::metric::DistanceMetric;
use crate::ranker::{Neighbor, NeighborCount, NeighborRanker};
use crate::store::VectorStore;

/// Which dataset a ranking query targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    Motifs,
    Traditions,
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Motifs => f.write_str("motifs"),
            CollectionKind::Traditions => f.write_str("traditions"),
        }
    }
}

/// A store bound to the metric used to rank it.
///
/// The store is shared, so the loader can keep its own handle without a copy.
#[derive(Debug, Clone)]
pub struct Collection {
    pub store: Arc<VectorStore>,
    pub metric: DistanceMetric,
}

impl Collection {
    pub fn new(store: impl Into<Arc<VectorStore>>, metric: DistanceMetric) -> Self {
        Self {
            store: store.into(),
            metric,
        }
    }

    pub fn ranker(&self) -> NeighborRanker<'_> {
        NeighborRanker::new(&self.store, &self.metric)
    }

    pub fn nearest(&self, code: &str, count: NeighborCount) -> Result<Vec<Neighbor>, KnnError> {
        self.ranker().rank(code, count)
    }
}

#[derive(Debug, Clone)]
pub struct QueryEngine {
    motifs: Collection,
    traditions: Collection,
    motif_names: Arc<[String]>,
}

impl QueryEngine {
    /// `motif_names[i]` names slot `i` of every tradition vector.
    pub fn new(
        motifs: Collection,
        traditions: Collection,
        motif_names: impl Into<Arc<[String]>>,
    ) -> Self {
        Self {
            motifs,
            traditions,
            motif_names: motif_names.into(),
        }
    }

    pub fn collection(&self, kind: CollectionKind) -> &Collection {
        match kind {
            CollectionKind::Motifs => &self.motifs,
            CollectionKind::Traditions => &self.traditions,
        }
    }

    pub fn motif_names(&self) -> &[String] {
        &self.motif_names
    }

    pub fn nearest(
        &self,
        kind: CollectionKind,
        code: &str,
        count: NeighborCount,
    ) -> Result<Vec<Neighbor>, KnnError> {
        self.collection(kind).nearest(code, count)
    }

    pub fn compare_traditions(&self, first: &str, second: &str) -> Result<Comparison, KnnError> {
        TraditionComparator::new(&self.traditions.store, &self.motif_names).compare(first, second)
    }
}
