//! # folkmap-knn
//!
//! Nearest-neighbor query engine over a static folklore dataset.
//!
//! - [`store::VectorStore`]: read-only code → feature-vector mapping
//! - [`metric::DistanceMetric`]: Manhattan, IDF-weighted score, geo envelope
//! - [`ranker::NeighborRanker`]: brute-force ranking with a deterministic tie-break
//! - [`compare::TraditionComparator`]: common / only-first / only-second motifs
//! - [`engine::QueryEngine`]: both collections bound to their metrics
//!
//! ## Example
//!
//! ```
//! use folkmap_knn::{DistanceMetric, NeighborCount, NeighborRanker, VectorStore};
//!
//! let store = VectorStore::from_vectors([
//!     ("Nyangi", vec![1, 0, 1, 1]),
//!     ("Turkana", vec![1, 1, 0, 0]),
//! ]);
//! let metric = DistanceMetric::Manhattan;
//! let ranked = NeighborRanker::new(&store, &metric)
//!     .rank("Nyangi", NeighborCount::All)
//!     .unwrap();
//! assert_eq!(ranked[0].code, "Turkana");
//! assert_eq!(ranked[0].distance, 3.0);
//! ```

pub mod compare;
pub mod engine;
pub mod error;
pub mod geo;
pub mod metric;
pub mod ranker;
pub mod store;
pub mod weights;

pub use compare::{Comparison, TraditionComparator};
pub use engine::{Collection, CollectionKind, QueryEngine};
pub use error::KnnError;
pub use geo::{GeoPoint, GeoTable, EARTH_RADIUS_KM};
pub use metric::{DistanceMetric, MetricKind};
pub use ranker::{Neighbor, NeighborCount, NeighborRanker};
pub use store::{FeatureVector, VectorStore};
pub use weights::MotifWeights;
