use serde::{Deserialize, Serialize};

use folkmap_knn::GeoPoint;

/// A tradition's name and map position, one per tradition slot (`coords.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraditionSite {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "Latitude", alias = "latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude", alias = "longitude")]
    pub longitude: f64,
}

impl TraditionSite {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Human-readable label for a motif family (`new_descriptions.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotifDescription {
    #[serde(rename = "Name", alias = "name", default)]
    pub name: String,
    #[serde(rename = "Description", alias = "description", default)]
    pub description: String,
}

/// Family key of a motif code: the part before the first `_`, lowercased.
///
/// `"B24a_7"` → `"b24a"`.
pub fn motif_family(code: &str) -> String {
    code.split('_').next().unwrap_or(code).to_lowercase()
}
