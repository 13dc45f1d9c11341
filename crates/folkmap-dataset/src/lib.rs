//! # folkmap-dataset
//!
//! Reads the static folklore dataset (motif and tradition vectors, the motif
//! list, tradition coordinates, motif descriptions), validates that every
//! index space lines up, and builds a [`folkmap_knn::QueryEngine`] from it.

pub mod error;
pub mod loader;
pub mod model;

pub use error::DatasetError;
pub use loader::Dataset;
pub use model::{motif_family, MotifDescription, TraditionSite};
