//! Load the JSON dataset files into immutable stores.
//!
//! | file                       | shape                               |
//! |----------------------------|-------------------------------------|
//! | `traditions.json`          | `{code: [0|1; n_motifs]}`           |
//! | `motif_distributions.json` | `{code: [0|1; n_traditions]}`       |
//! | `motif_vectors.json`       | `{code: [count; …]}`                |
//! | `new_motif_list.json`      | `[[code, …], …]`                    |
//! | `coords.json`              | `[{Name, Latitude, Longitude}, …]`  |
//! | `new_descriptions.json`    | `{family: {Name, Description}}`     |
//!
//! Every dimension is checked here, once. A dataset that loads successfully
//! never produces a dimension mismatch at query time.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use folkmap_knn::{
    Collection, CollectionKind, DistanceMetric, GeoTable, MetricKind,
    MotifWeights, QueryEngine, VectorStore,
};

use crate::error::DatasetError;
use crate::model::{motif_family, MotifDescription, TraditionSite};

pub const TRADITIONS_FILE: &str = "traditions.json";
pub const MOTIF_DISTRIBUTIONS_FILE: &str = "motif_distributions.json";
pub const MOTIF_VECTORS_FILE: &str = "motif_vectors.json";
pub const MOTIF_LIST_FILE: &str = "new_motif_list.json";
pub const COORDS_FILE: &str = "coords.json";
pub const DESCRIPTIONS_FILE: &str = "new_descriptions.json";

// ─────────────────────────────────────────────
// Dataset
// ─────────────────────────────────────────────

/// The full static dataset, validated and ready to serve.
#[derive(Debug, Clone)]
pub struct Dataset {
    traditions: Arc<VectorStore>,
    motifs: Arc<VectorStore>,
    weights: MotifWeights,
    motif_names: Arc<[String]>,
    sites: Vec<TraditionSite>,
    descriptions: HashMap<String, MotifDescription>,
    coords_json: Vec<u8>,
    motif_list_json: Vec<u8>,
}

impl Dataset {
    /// Read and validate every dataset file under `dir`.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::Io`] / [`DatasetError::Json`] for unreadable or invalid files.
    /// - [`DatasetError::Malformed`] for an empty motif-list entry.
    /// - [`DatasetError::Knn`] when vector lengths disagree with the motif list
    ///   or the site table.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();

        let traditions_raw: HashMap<String, Vec<u32>> = read_json(&dir.join(TRADITIONS_FILE))?;
        let motifs_raw: HashMap<String, Vec<u32>> =
            read_json(&dir.join(MOTIF_DISTRIBUTIONS_FILE))?;
        let counts_raw: HashMap<String, Vec<u32>> = read_json(&dir.join(MOTIF_VECTORS_FILE))?;
        let descriptions: HashMap<String, MotifDescription> =
            read_json(&dir.join(DESCRIPTIONS_FILE))?;

        let motif_list_path = dir.join(MOTIF_LIST_FILE);
        let motif_list_json = read_bytes(&motif_list_path)?;
        let motif_list: Vec<Vec<String>> = serde_json::from_slice(&motif_list_json)
            .map_err(|e| DatasetError::json(&motif_list_path, e))?;

        let coords_path = dir.join(COORDS_FILE);
        let coords_json = read_bytes(&coords_path)?;
        let sites: Vec<TraditionSite> = serde_json::from_slice(&coords_json)
            .map_err(|e| DatasetError::json(&coords_path, e))?;

        let motif_names = motif_list
            .into_iter()
            .enumerate()
            .map(|(slot, entry)| {
                entry.into_iter().next().ok_or_else(|| {
                    DatasetError::Malformed(format!("{MOTIF_LIST_FILE}: entry {slot} is empty"))
                })
            })
            .collect::<Result<Vec<String>, _>>()?;

        let weights = derive_weights(&motif_names, &counts_raw);

        let traditions = Arc::new(VectorStore::from_vectors(traditions_raw));
        let motifs = Arc::new(VectorStore::from_vectors(motifs_raw));

        traditions.ensure_dimension(motif_names.len())?;
        motifs.ensure_dimension(sites.len())?;

        info!(
            dir         = %dir.display(),
            traditions  = traditions.len(),
            motifs      = motifs.len(),
            motif_slots = motif_names.len(),
            sites       = sites.len(),
            families    = descriptions.len(),
            "dataset loaded"
        );

        Ok(Self {
            traditions,
            motifs,
            weights,
            motif_names: motif_names.into(),
            sites,
            descriptions,
            coords_json,
            motif_list_json,
        })
    }

    /// Bind each collection to its configured metric. The engine shares this
    /// dataset's stores and motif names.
    ///
    /// Motifs accept `geo` and `manhattan`; traditions accept `idf` and `manhattan`.
    pub fn build_engine(
        &self,
        motif_metric: MetricKind,
        tradition_metric: MetricKind,
    ) -> Result<QueryEngine, DatasetError> {
        let motif_metric = match motif_metric {
            MetricKind::Geo => DistanceMetric::GeoEnvelope(self.geo_table()),
            MetricKind::Manhattan => DistanceMetric::Manhattan,
            other => return Err(unsupported(CollectionKind::Motifs, other)),
        };
        let tradition_metric = match tradition_metric {
            MetricKind::Idf => DistanceMetric::IdfWeighted(self.weights.clone()),
            MetricKind::Manhattan => DistanceMetric::Manhattan,
            other => return Err(unsupported(CollectionKind::Traditions, other)),
        };

        info!(
            motifs     = motif_metric.name(),
            traditions = tradition_metric.name(),
            "query engine ready"
        );

        Ok(QueryEngine::new(
            Collection::new(Arc::clone(&self.motifs), motif_metric),
            Collection::new(Arc::clone(&self.traditions), tradition_metric),
            Arc::clone(&self.motif_names),
        ))
    }

    /// Geo points in tradition-slot order.
    pub fn geo_table(&self) -> GeoTable {
        GeoTable::new(self.sites.iter().map(TraditionSite::point).collect())
    }

    /// Sites of the traditions in which `code` is present, or `None` for an unknown motif.
    pub fn motif_distribution(&self, code: &str) -> Option<Vec<&TraditionSite>> {
        let vector = self.motifs.get(code)?;
        Some(
            vector
                .presence()
                .iter()
                .filter_map(|slot| self.sites.get(slot as usize))
                .collect(),
        )
    }

    /// Name and description of the family `code` belongs to.
    pub fn description_for(&self, code: &str) -> Option<&MotifDescription> {
        self.descriptions.get(&motif_family(code))
    }

    pub fn traditions(&self) -> &VectorStore {
        &self.traditions
    }

    pub fn motifs(&self) -> &VectorStore {
        &self.motifs
    }

    pub fn weights(&self) -> &MotifWeights {
        &self.weights
    }

    pub fn motif_names(&self) -> &[String] {
        &self.motif_names
    }

    pub fn sites(&self) -> &[TraditionSite] {
        &self.sites
    }

    /// `coords.json` exactly as read.
    pub fn coords_json(&self) -> &[u8] {
        &self.coords_json
    }

    /// `new_motif_list.json` exactly as read.
    pub fn motif_list_json(&self) -> &[u8] {
        &self.motif_list_json
    }
}

// ─────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────

/// One weight per motif slot. Motifs without a count vector weigh `0.0`.
fn derive_weights(motif_names: &[String], counts: &HashMap<String, Vec<u32>>) -> MotifWeights {
    let missing = motif_names.iter().filter(|n| !counts.contains_key(*n)).count();
    if missing > 0 {
        warn!(missing, file = MOTIF_VECTORS_FILE, "motifs without count vectors get zero weight");
    }
    MotifWeights::from_totals(motif_names.iter().map(|name| {
        counts
            .get(name)
            .map(|values| values.iter().map(|&v| u64::from(v)).sum::<u64>())
            .unwrap_or(0)
    }))
}

fn unsupported(collection: CollectionKind, metric: MetricKind) -> DatasetError {
    DatasetError::UnsupportedMetric { collection, metric }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, DatasetError> {
    std::fs::read(path).map_err(|e| DatasetError::io(path, e))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|e| DatasetError::json(path, e))
}
