//! Great-circle geometry for the geo-envelope metric.
//!
//! ## Algorithm
//! 1. Each motif's presence set selects points from the [`GeoTable`].
//! 2. `d(A→B)` = max over `p ∈ A` of the great-circle distance from `p` to
//!    its nearest `q ∈ B`.
//! 3. The envelope distance is `max(d(A→B), d(B→A))`, the symmetric
//!    Hausdorff distance on the sphere.

use roaring::RoaringBitmap;
use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A `(latitude, longitude)` pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine great-circle distance to `other`, in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let h = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        // Rounding can push h a hair outside [0, 1] for antipodal points.
        let h = h.clamp(0.0, 1.0);

        2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
    }
}

/// Geo points indexed in parallel with the tradition slots of motif vectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoTable {
    points: Vec<GeoPoint>,
}

impl GeoTable {
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, slot: usize) -> Option<&GeoPoint> {
        self.points.get(slot)
    }

    /// Directed Hausdorff distance `d(from → to)` over two presence sets.
    ///
    /// An empty `from` contributes nothing and yields `0.0`. A non-empty
    /// `from` with an empty `to` has no match and yields `+∞`.
    ///
    /// Every index in both sets must be `< self.len()`.
    pub fn directed_hausdorff(&self, from: &RoaringBitmap, to: &RoaringBitmap) -> f64 {
        let mut worst = 0.0_f64;
        for i in from.iter() {
            let p = &self.points[i as usize];
            let nearest = to
                .iter()
                .map(|j| p.distance_km(&self.points[j as usize]))
                .fold(f64::INFINITY, f64::min);
            if nearest > worst {
                worst = nearest;
            }
        }
        worst
    }

    /// Symmetric envelope distance: the larger of both directed passes.
    pub fn envelope_distance(&self, a: &RoaringBitmap, b: &RoaringBitmap) -> f64 {
        self.directed_hausdorff(a, b).max(self.directed_hausdorff(b, a))
    }
}

impl From<Vec<GeoPoint>> for GeoTable {
    fn from(points: Vec<GeoPoint>) -> Self {
        Self::new(points)
    }
}
