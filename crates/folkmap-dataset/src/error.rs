//! Error types for dataset loading.

use std::path::PathBuf;

use thiserror::Error;

use folkmap_knn::{CollectionKind, KnnError, MetricKind};

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed dataset: {0}")]
    Malformed(String),

    /// The metric cannot be computed over this collection's vectors.
    #[error("metric '{metric}' is not supported for {collection}")]
    UnsupportedMetric {
        collection: CollectionKind,
        metric: MetricKind,
    },

    /// Integrity failure detected at load time (e.g. vector lengths disagree).
    #[error("dataset integrity: {0}")]
    Knn(#[from] KnnError),
}

impl DatasetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io { path: path.into(), source }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        DatasetError::Json { path: path.into(), source }
    }
}
