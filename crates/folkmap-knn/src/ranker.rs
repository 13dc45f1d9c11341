//! Brute-force neighbor ranking over a whole [`VectorStore`].
//!
//! The ranker computes the metric from the pivot to every other item in the
//! store. For a capped request it keeps a max-heap of size `k` (the root is the
//! current worst candidate); for an uncapped request it collects and sorts.
//! Both paths order by `(distance, code)`, so equal distances come back in
//! lexicographic code order and a capped result is always a prefix of the
//! uncapped one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::KnnError;
use crate::metric::DistanceMetric;
use crate::store::VectorStore;

// ─────────────────────────────────────────────
// NeighborCount
// ─────────────────────────────────────────────

/// How many neighbors to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborCount {
    /// Every candidate (`-1` on the wire).
    All,
    /// At most this many.
    Top(usize),
}

impl NeighborCount {
    /// Sentinel raw value meaning "return everything".
    pub const ALL_SENTINEL: i64 = -1;

    /// Interpret a raw count: `-1` is [`All`](Self::All), `n >= 0` is
    /// [`Top(n)`](Self::Top), anything else is [`KnnError::InvalidCount`].
    pub fn from_raw(raw: i64) -> Result<Self, KnnError> {
        match raw {
            Self::ALL_SENTINEL => Ok(NeighborCount::All),
            n if n >= 0 => usize::try_from(n)
                .map(NeighborCount::Top)
                .map_err(|_| KnnError::InvalidCount(raw)),
            _ => Err(KnnError::InvalidCount(raw)),
        }
    }
}

impl Default for NeighborCount {
    fn default() -> Self {
        NeighborCount::All
    }
}

// ─────────────────────────────────────────────
// Neighbor
// ─────────────────────────────────────────────

/// One ranked result. Distances are only comparable within one metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub code: String,
    pub distance: f64,
}

/// Total order used for ranking: distance first, then code.
fn rank_order(a_dist: f64, a_code: &str, b_dist: f64, b_code: &str) -> Ordering {
    a_dist.total_cmp(&b_dist).then_with(|| a_code.cmp(b_code))
}

/// Heap entry borrowing its code from the store. Ordered by [`rank_order`],
/// so `BinaryHeap` pops the farthest candidate first.
#[derive(Debug)]
struct Candidate<'a> {
    code: &'a str,
    distance: f64,
}

impl PartialEq for Candidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate<'_> {}

impl PartialOrd for Candidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(self.distance, self.code, other.distance, other.code)
    }
}

// ─────────────────────────────────────────────
// NeighborRanker
// ─────────────────────────────────────────────

/// A metric bound to the store it ranks over.
#[derive(Debug, Clone, Copy)]
pub struct NeighborRanker<'a> {
    store: &'a VectorStore,
    metric: &'a DistanceMetric,
}

impl<'a> NeighborRanker<'a> {
    pub fn new(store: &'a VectorStore, metric: &'a DistanceMetric) -> Self {
        Self { store, metric }
    }

    /// Rank every item except `pivot` by its distance from `pivot`.
    ///
    /// # Errors
    ///
    /// - [`KnnError::NotFound`] if `pivot` is not in the store.
    /// - [`KnnError::DimensionMismatch`] if any metric invocation fails; the
    ///   whole query is aborted.
    pub fn rank(&self, pivot: &str, count: NeighborCount) -> Result<Vec<Neighbor>, KnnError> {
        let pivot_vec = self
            .store
            .get(pivot)
            .ok_or_else(|| KnnError::NotFound(pivot.to_string()))?;

        let candidates = self.store.iter().filter(|(code, _)| *code != pivot);

        let ranked: Vec<Candidate<'a>> = match count {
            NeighborCount::Top(0) => Vec::new(),

            NeighborCount::Top(k) => {
                // A cap past the candidate count means all of them.
                let k = k.min(self.store.len().saturating_sub(1));
                let mut heap: BinaryHeap<Candidate<'a>> = BinaryHeap::with_capacity(k + 1);
                for (code, vector) in candidates {
                    let distance = self.metric.distance(pivot_vec, vector)?;

                    // Early pruning: a full heap only admits something better than its worst.
                    if heap.len() >= k {
                        if let Some(worst) = heap.peek() {
                            if rank_order(distance, code, worst.distance, worst.code)
                                != Ordering::Less
                            {
                                continue;
                            }
                        }
                    }

                    heap.push(Candidate { code, distance });
                    if heap.len() > k {
                        heap.pop();
                    }
                }
                heap.into_sorted_vec()
            }

            NeighborCount::All => {
                let mut all = Vec::with_capacity(self.store.len().saturating_sub(1));
                for (code, vector) in candidates {
                    let distance = self.metric.distance(pivot_vec, vector)?;
                    all.push(Candidate { code, distance });
                }
                all.sort();
                all
            }
        };

        debug!(
            pivot,
            metric   = self.metric.name(),
            returned = ranked.len(),
            "ranked neighbors"
        );

        Ok(ranked
            .into_iter()
            .map(|c| Neighbor {
                code: c.code.to_string(),
                distance: c.distance,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> VectorStore {
        VectorStore::from_vectors([
            ("a", vec![1, 0, 1, 1]),
            ("b", vec![1, 1, 0, 0]),
            ("c", vec![1, 0, 1, 0]),
            ("d", vec![0, 0, 1, 1]),
            ("e", vec![0, 1, 0, 0]),
        ])
    }

    #[test]
    fn count_parsing() {
        assert_eq!(NeighborCount::from_raw(-1), Ok(NeighborCount::All));
        assert_eq!(NeighborCount::from_raw(0), Ok(NeighborCount::Top(0)));
        assert_eq!(NeighborCount::from_raw(7), Ok(NeighborCount::Top(7)));
        assert_eq!(NeighborCount::from_raw(-2), Err(KnnError::InvalidCount(-2)));
        assert_eq!(NeighborCount::from_raw(i64::MIN), Err(KnnError::InvalidCount(i64::MIN)));
    }

    #[test]
    fn ties_break_by_code() {
        let store = store();
        let metric = DistanceMetric::Manhattan;
        let ranked = NeighborRanker::new(&store, &metric)
            .rank("a", NeighborCount::All)
            .unwrap();
        // c and d are both at distance 1
        let got: Vec<(&str, f64)> = ranked.iter().map(|n| (n.code.as_str(), n.distance)).collect();
        assert_eq!(got, vec![("c", 1.0), ("d", 1.0), ("b", 3.0), ("e", 4.0)]);
    }

    #[test]
    fn top_k_is_prefix_of_all() {
        let store = store();
        let metric = DistanceMetric::Manhattan;
        let ranker = NeighborRanker::new(&store, &metric);
        let all = ranker.rank("b", NeighborCount::All).unwrap();
        for k in 0..=all.len() + 2 {
            let top = ranker.rank("b", NeighborCount::Top(k)).unwrap();
            assert_eq!(top.as_slice(), &all[..k.min(all.len())], "k = {k}");
        }
    }

    #[test]
    fn huge_cap_returns_every_candidate() {
        let store = store();
        let metric = DistanceMetric::Manhattan;
        let ranker = NeighborRanker::new(&store, &metric);
        let all = ranker.rank("a", NeighborCount::All).unwrap();
        for cap in [usize::MAX / 2, usize::MAX] {
            assert_eq!(ranker.rank("a", NeighborCount::Top(cap)).unwrap(), all, "cap = {cap}");
        }
        let wire = NeighborCount::from_raw(1_000_000_000_000_000).unwrap();
        assert_eq!(ranker.rank("a", wire).unwrap(), all);
    }

    #[test]
    fn unknown_pivot_is_not_found() {
        let store = store();
        let metric = DistanceMetric::Manhattan;
        let err = NeighborRanker::new(&store, &metric)
            .rank("zzz", NeighborCount::All)
            .unwrap_err();
        assert_eq!(err, KnnError::NotFound("zzz".into()));
    }

    #[test]
    fn corrupt_candidate_aborts_query() {
        let store = VectorStore::from_vectors([("a", vec![1, 0]), ("b", vec![1, 0, 1])]);
        let metric = DistanceMetric::Manhattan;
        let ranker = NeighborRanker::new(&store, &metric);
        assert!(matches!(
            ranker.rank("a", NeighborCount::All),
            Err(KnnError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            ranker.rank("a", NeighborCount::Top(1)),
            Err(KnnError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn single_item_store_has_no_neighbors() {
        let store = VectorStore::from_vectors([("only", vec![1])]);
        let metric = DistanceMetric::Manhattan;
        let ranked = NeighborRanker::new(&store, &metric)
            .rank("only", NeighborCount::All)
            .unwrap();
        assert!(ranked.is_empty());
    }
}
