//! Distance metrics over feature vectors.
//!
//! Three variants, selected per dataset at configuration time:
//!
//! | variant        | used for              | range      | rendering   |
//! |----------------|-----------------------|------------|-------------|
//! | `Manhattan`    | raw vector comparison | `[0, d]`   | integer     |
//! | `IdfWeighted`  | tradition similarity  | `(-∞, 0]`  | 5 decimals  |
//! | `GeoEnvelope`  | motif spatial spread  | `[0, +∞]`  | 5 decimals  |
//!
//! `IdfWeighted` is a ranking score, not a true metric: it fails the triangle
//! inequality and an item is not strictly closer to itself than to others.
//! Smaller (more negative) means closer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KnnError;
use crate::geo::GeoTable;
use crate::store::FeatureVector;
use crate::weights::MotifWeights;

/// Decimal places used when rendering continuous distances.
pub const DISTANCE_PRECISION: usize = 5;

// ─────────────────────────────────────────────
// MetricKind
// ─────────────────────────────────────────────

/// Configuration-level metric selector, parsed from strings like `"geo"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Manhattan,
    Idf,
    Geo,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Manhattan => "manhattan",
            MetricKind::Idf => "idf",
            MetricKind::Geo => "geo",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "manhattan" | "l1" => Ok(MetricKind::Manhattan),
            "idf" | "idf_weighted" => Ok(MetricKind::Idf),
            "geo" | "geo_envelope" | "hausdorff" => Ok(MetricKind::Geo),
            other => Err(format!("unknown metric '{other}'")),
        }
    }
}

// ─────────────────────────────────────────────
// DistanceMetric
// ─────────────────────────────────────────────

/// A distance metric bound to whatever auxiliary table it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum DistanceMetric {
    /// Sum of absolute slot differences.
    Manhattan,

    /// Negative sum of the weights of slots present in both vectors.
    IdfWeighted(MotifWeights),

    /// Symmetric great-circle Hausdorff distance between presence sets, in km.
    GeoEnvelope(GeoTable),
}

impl DistanceMetric {
    pub fn kind(&self) -> MetricKind {
        match self {
            DistanceMetric::Manhattan => MetricKind::Manhattan,
            DistanceMetric::IdfWeighted(_) => MetricKind::Idf,
            DistanceMetric::GeoEnvelope(_) => MetricKind::Geo,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().as_str()
    }

    /// `true` when every distance this metric produces is an integer.
    pub fn is_discrete(&self) -> bool {
        matches!(self, DistanceMetric::Manhattan)
    }

    /// Compute the distance between two vectors.
    ///
    /// # Errors
    ///
    /// [`KnnError::DimensionMismatch`] if the vectors differ in length, or if
    /// the metric's auxiliary table is shorter than the vectors.
    pub fn distance(&self, a: &FeatureVector, b: &FeatureVector) -> Result<f64, KnnError> {
        if a.dim() != b.dim() {
            return Err(KnnError::DimensionMismatch {
                expected: a.dim(),
                got: b.dim(),
            });
        }

        match self {
            DistanceMetric::Manhattan => Ok(manhattan(a.values(), b.values()) as f64),

            DistanceMetric::IdfWeighted(weights) => {
                if weights.len() < a.dim() {
                    return Err(KnnError::DimensionMismatch {
                        expected: a.dim(),
                        got: weights.len(),
                    });
                }
                let shared = a.presence() & b.presence();
                let score = shared
                    .iter()
                    .map(|slot| weights.as_slice()[slot as usize])
                    .fold(0.0, |acc, w| acc - w);
                Ok(score)
            }

            DistanceMetric::GeoEnvelope(table) => {
                if table.len() < a.dim() {
                    return Err(KnnError::DimensionMismatch {
                        expected: a.dim(),
                        got: table.len(),
                    });
                }
                Ok(table.envelope_distance(a.presence(), b.presence()))
            }
        }
    }

    /// Render a distance for the wire: integral for discrete metrics,
    /// fixed precision otherwise.
    pub fn render(&self, distance: f64) -> String {
        if self.is_discrete() && distance.is_finite() {
            format!("{distance:.0}")
        } else {
            format!("{distance:.prec$}", prec = DISTANCE_PRECISION)
        }
    }
}

/// Sum of absolute differences of two equal-length slices.
pub fn manhattan(a: &[u32], b: &[u32]) -> u64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| u64::from(x.abs_diff(y)))
        .sum()
}
