//! Geography data types and worker communication structures

use bevy::prelude::*;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{
    Arc, Mutex,
    mpsc::{Receiver, Sender},
};

use crate::core::coordinates::GeoPoint;

/// Natural Earth 1:110m land polygons.
pub const DEFAULT_LAND_URL: &str = "https://raw.githubusercontent.com/nvkelso/natural-earth-vector/master/geojson/ne_110m_land.geojson";

/// Where the landmass boundary dataset comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeographySource {
    Url(String),
    File(PathBuf),
}

/// Environment variable pointing at a local GeoJSON file to use instead of the download.
pub const GEOJSON_ENV: &str = "PORTFOLIO_GLOBE_GEOJSON";

impl GeographySource {
    /// A non-blank override path wins over the default download.
    pub fn from_override(value: Option<String>) -> Self {
        match value.map(|v| v.trim().to_string()) {
            Some(path) if !path.is_empty() => GeographySource::File(PathBuf::from(path)),
            _ => GeographySource::Url(DEFAULT_LAND_URL.to_string()),
        }
    }

    /// Stable key used to name cache entries
    pub fn cache_key(&self) -> String {
        let raw = match self {
            GeographySource::Url(url) => url.clone(),
            GeographySource::File(path) => path.display().to_string(),
        };
        raw.chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

#[derive(Resource, Clone, Debug)]
pub struct GeographyConfig {
    pub source: GeographySource,
    pub use_cache: bool,
    pub cache_expiration_days: i64,
    /// Rings with fewer points are dropped as islands/noise
    pub min_ring_points: usize,
    /// Cluster radius of the point reduction, in degrees of arc
    pub cluster_radius_deg: f64,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            source: GeographySource::from_override(std::env::var(GEOJSON_ENV).ok()),
            use_cache: true,
            cache_expiration_days: 30,
            min_ring_points: 20,
            cluster_radius_deg: 2.0,
        }
    }
}

/// Closed outline polyline (first point equals last point)
#[derive(Clone, Debug, PartialEq)]
pub struct OutlinePath {
    pub points: Vec<GeoPoint>,
    pub elevation: f64,
}

impl OutlinePath {
    /// Elevation grows with the ring size, saturating at 100 points.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        let size_scale = (points.len() as f64 / 100.0).min(1.0);
        Self {
            points,
            elevation: 0.035 + size_scale * 0.02,
        }
    }
}

/// Continent outlines currently shown on the globe
#[derive(Resource, Default, Debug)]
pub struct OutlineSet {
    pub paths: Vec<OutlinePath>,
    /// Bumped whenever `paths` is replaced
    pub revision: u64,
}

// ---- GeoJSON ----

#[derive(Deserialize, Debug)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

#[derive(Deserialize, Debug)]
pub struct RawFeature {
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

#[derive(Deserialize, Debug)]
pub struct RawGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

/// Ring of GeoJSON positions (`[longitude, latitude, ..]`)
pub type RawRing = Vec<Vec<f64>>;

/// Geometry resolved once at parse time
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureGeometry {
    /// Polygon: outer ring followed by holes
    SinglePart(Vec<RawRing>),
    /// MultiPolygon: one ring list per part
    MultiPart(Vec<Vec<RawRing>>),
}

// ---- Worker channel messages ----

#[derive(Debug)]
pub enum GeographyCommand {
    Fetch {
        request_id: u64,
        source: GeographySource,
        use_cache: bool,
        cache_expiration_days: i64,
    },
}

#[derive(Debug)]
pub enum GeographyResult {
    Loaded {
        request_id: u64,
        collection: FeatureCollection,
    },
    Failed {
        request_id: u64,
        error: String,
    },
}

impl GeographyResult {
    pub fn request_id(&self) -> u64 {
        match self {
            GeographyResult::Loaded { request_id, .. } | GeographyResult::Failed { request_id, .. } => {
                *request_id
            }
        }
    }
}

/// Resource containing channels for communicating with the geography worker thread
#[derive(Resource)]
pub struct GeographyChannels {
    pub cmd_tx: Sender<GeographyCommand>,
    pub res_rx: Arc<Mutex<Receiver<GeographyResult>>>,
}

/// Tracks the latest outstanding fetch so stale results are dropped
#[derive(Resource, Default, Debug)]
pub struct GeographyState {
    pub latest_request: u64,
    pub requested: bool,
    pub loading: bool,
    pub error: Option<String>,
}
