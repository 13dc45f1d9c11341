//! Integration tests for folkmap-knn.
//!
//! These tests build small synthetic datasets (seeded RNG, so reproducible)
//! and check the ranking and comparison properties across all three metrics.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use folkmap_knn::{
    Collection, CollectionKind, DistanceMetric, GeoPoint, GeoTable, KnnError, MotifWeights,
    NeighborCount, NeighborRanker, QueryEngine, TraditionComparator, VectorStore,
};

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

const N_TRADITIONS: usize = 24;
const N_MOTIFS: usize = 40;

fn random_binary(rng: &mut StdRng, dim: usize, p: f64) -> Vec<u32> {
    (0..dim).map(|_| u32::from(rng.gen_bool(p))).collect()
}

/// Tradition store: `N_TRADITIONS` vectors over `N_MOTIFS` slots.
fn tradition_store(rng: &mut StdRng) -> VectorStore {
    VectorStore::from_vectors(
        (0..N_TRADITIONS).map(|i| (format!("T{i:02}"), random_binary(rng, N_MOTIFS, 0.3))),
    )
}

/// Motif store: `N_MOTIFS` vectors over `N_TRADITIONS` slots.
fn motif_store(rng: &mut StdRng) -> VectorStore {
    VectorStore::from_vectors(
        (0..N_MOTIFS).map(|i| (format!("m{i:02}_1"), random_binary(rng, N_TRADITIONS, 0.25))),
    )
}

fn geo_table(rng: &mut StdRng) -> GeoTable {
    GeoTable::new(
        (0..N_TRADITIONS)
            .map(|_| GeoPoint::new(rng.gen_range(-60.0..70.0), rng.gen_range(-180.0..180.0)))
            .collect(),
    )
}

fn weights(rng: &mut StdRng) -> MotifWeights {
    MotifWeights::new((0..N_MOTIFS).map(|_| 1.0 / rng.gen_range(1..20) as f64).collect())
}

/// Every (store, metric) pairing the server can be configured with.
fn configurations() -> Vec<(VectorStore, DistanceMetric)> {
    let mut rng = StdRng::seed_from_u64(42);
    let traditions = tradition_store(&mut rng);
    let motifs = motif_store(&mut rng);
    vec![
        (traditions.clone(), DistanceMetric::Manhattan),
        (traditions, DistanceMetric::IdfWeighted(weights(&mut rng))),
        (motifs.clone(), DistanceMetric::Manhattan),
        (motifs, DistanceMetric::GeoEnvelope(geo_table(&mut rng))),
    ]
}

// ─────────────────────────────────────────────
// Ranking properties
// ─────────────────────────────────────────────

#[test]
fn pivot_never_in_its_own_list() {
    for (store, metric) in configurations() {
        let ranker = NeighborRanker::new(&store, &metric);
        for pivot in store.codes() {
            let ranked = ranker.rank(pivot, NeighborCount::All).unwrap();
            assert!(ranked.iter().all(|n| n.code != pivot), "{} / {pivot}", metric.name());
        }
    }
}

#[test]
fn rankings_are_sorted_ascending() {
    for (store, metric) in configurations() {
        let ranker = NeighborRanker::new(&store, &metric);
        for pivot in store.codes() {
            let ranked = ranker.rank(pivot, NeighborCount::All).unwrap();
            for pair in ranked.windows(2) {
                assert!(pair[0].distance <= pair[1].distance, "{}", metric.name());
                if pair[0].distance == pair[1].distance {
                    assert!(pair[0].code < pair[1].code, "ties must be ordered by code");
                }
            }
        }
    }
}

#[test]
fn all_returns_every_candidate() {
    for (store, metric) in configurations() {
        let ranker = NeighborRanker::new(&store, &metric);
        let pivot = store.codes().next().unwrap();
        let ranked = ranker.rank(pivot, NeighborCount::All).unwrap();
        assert_eq!(ranked.len(), store.len() - 1);
    }
}

#[test]
fn top_n_returns_the_n_smallest() {
    for (store, metric) in configurations() {
        let ranker = NeighborRanker::new(&store, &metric);
        let pivot = store.codes().nth(3).unwrap();
        let all = ranker.rank(pivot, NeighborCount::All).unwrap();
        for n in [0, 1, 5, store.len() - 1] {
            let top = ranker.rank(pivot, NeighborCount::Top(n)).unwrap();
            assert_eq!(top.len(), n);
            assert_eq!(top.as_slice(), &all[..n]);
        }
        // Larger caps than candidates return everything.
        let over = ranker.rank(pivot, NeighborCount::Top(store.len() * 2)).unwrap();
        assert_eq!(over, all);
    }
}

#[test]
fn negative_counts_other_than_sentinel_are_rejected() {
    for raw in [-2_i64, -5, -100] {
        assert_eq!(NeighborCount::from_raw(raw), Err(KnnError::InvalidCount(raw)));
    }
    assert_eq!(NeighborCount::from_raw(-1), Ok(NeighborCount::All));
}

#[test]
fn unknown_code_is_not_found() {
    for (store, metric) in configurations() {
        let ranker = NeighborRanker::new(&store, &metric);
        assert_eq!(
            ranker.rank("no-such-code", NeighborCount::Top(3)),
            Err(KnnError::NotFound("no-such-code".into()))
        );
    }
}

// ─────────────────────────────────────────────
// Metric properties
// ─────────────────────────────────────────────

#[test]
fn manhattan_and_geo_are_symmetric() {
    for (store, metric) in configurations() {
        if matches!(metric, DistanceMetric::IdfWeighted(_)) {
            continue;
        }
        let items: Vec<_> = store.iter().collect();
        for (_, a) in &items {
            for (_, b) in &items {
                assert_eq!(metric.distance(a, b).unwrap(), metric.distance(b, a).unwrap());
            }
        }
    }
}

#[test]
fn idf_score_is_never_positive() {
    let mut rng = StdRng::seed_from_u64(7);
    let store = tradition_store(&mut rng);
    let metric = DistanceMetric::IdfWeighted(weights(&mut rng));
    for (_, a) in store.iter() {
        for (_, b) in store.iter() {
            assert!(metric.distance(a, b).unwrap() <= 0.0);
        }
    }
}

#[test]
fn geo_distance_of_single_points_is_great_circle() {
    let nairobi = GeoPoint::new(-1.286, 36.817);
    let lagos = GeoPoint::new(6.524, 3.379);
    let table = GeoTable::new(vec![nairobi, lagos]);
    let store = VectorStore::from_vectors([("east", vec![1, 0]), ("west", vec![0, 1])]);
    let metric = DistanceMetric::GeoEnvelope(table);

    let d = metric
        .distance(store.get("east").unwrap(), store.get("west").unwrap())
        .unwrap();
    assert!((d - nairobi.distance_km(&lagos)).abs() < 1e-9);
    // Roughly 3,800 km apart.
    assert!(d > 3_700.0 && d < 3_900.0, "got {d}");
}

#[test]
fn geo_envelope_grows_with_the_outlier() {
    let table = GeoTable::new(vec![
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(0.0, 2.0),
        GeoPoint::new(0.0, 50.0),
    ]);
    let store = VectorStore::from_vectors([
        ("base", vec![1, 0, 0]),
        ("near", vec![0, 1, 0]),
        ("spread", vec![0, 1, 1]),
    ]);
    let metric = DistanceMetric::GeoEnvelope(table);
    let ranked = NeighborRanker::new(&store, &metric)
        .rank("base", NeighborCount::All)
        .unwrap();
    let codes: Vec<&str> = ranked.iter().map(|n| n.code.as_str()).collect();
    assert_eq!(codes, vec!["near", "spread"]);
}

// ─────────────────────────────────────────────
// Comparison properties
// ─────────────────────────────────────────────

#[test]
fn comparison_partitions_present_slots() {
    let mut rng = StdRng::seed_from_u64(11);
    let store = tradition_store(&mut rng);
    let names: Vec<String> = (0..N_MOTIFS).map(|i| format!("m{i:02}")).collect();
    let comparator = TraditionComparator::new(&store, &names);

    for (a_code, a) in store.iter().take(6) {
        for (b_code, b) in store.iter().take(6) {
            let cmp = comparator.compare(a_code, b_code).unwrap();
            let mut seen: Vec<&String> = cmp
                .common
                .iter()
                .chain(&cmp.only_first)
                .chain(&cmp.only_second)
                .collect();
            let total = seen.len();
            seen.sort();
            seen.dedup();
            assert_eq!(seen.len(), total, "lists must be disjoint");

            let expected = (0..N_MOTIFS)
                .filter(|&i| a.values()[i] == 1 || b.values()[i] == 1)
                .count();
            assert_eq!(total, expected, "lists must cover every present slot");
        }
    }
}

#[test]
fn comparing_with_itself_is_all_common() {
    let mut rng = StdRng::seed_from_u64(3);
    let store = tradition_store(&mut rng);
    let names: Vec<String> = (0..N_MOTIFS).map(|i| format!("m{i:02}")).collect();
    let comparator = TraditionComparator::new(&store, &names);

    let (code, vector) = store.iter().next().unwrap();
    let cmp = comparator.compare(code, code).unwrap();
    assert!(cmp.only_first.is_empty());
    assert!(cmp.only_second.is_empty());
    let expected: Vec<String> = vector.presence().iter().map(|i| names[i as usize].clone()).collect();
    assert_eq!(cmp.common, expected);
}

// ─────────────────────────────────────────────
// Concurrency
// ─────────────────────────────────────────────

#[test]
fn concurrent_queries_agree() {
    let mut rng = StdRng::seed_from_u64(99);
    let motifs = Collection::new(motif_store(&mut rng), DistanceMetric::GeoEnvelope(geo_table(&mut rng)));
    let traditions = Collection::new(
        tradition_store(&mut rng),
        DistanceMetric::IdfWeighted(weights(&mut rng)),
    );
    let names: Vec<String> = (0..N_MOTIFS).map(|i| format!("m{i:02}")).collect();
    let engine = Arc::new(QueryEngine::new(motifs, traditions, names));

    let reference = engine
        .nearest(CollectionKind::Traditions, "T05", NeighborCount::Top(5))
        .unwrap();

    std::thread::scope(|s| {
        for _ in 0..8 {
            let engine = Arc::clone(&engine);
            let reference = &reference;
            s.spawn(move || {
                for _ in 0..20 {
                    let got = engine
                        .nearest(CollectionKind::Traditions, "T05", NeighborCount::Top(5))
                        .unwrap();
                    assert_eq!(&got, reference);
                    engine
                        .nearest(CollectionKind::Motifs, "m00_1", NeighborCount::All)
                        .unwrap();
                }
            });
        }
    });
}
