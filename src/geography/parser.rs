//! GeoJSON parsing and ring preparation

use anyhow::{Context, Result};
use bevy::prelude::*;

use crate::core::coordinates::GeoPoint;
use crate::geography::simplify::simplify_ring;
use crate::geography::types::{
    FeatureCollection, FeatureGeometry, GeographyConfig, OutlinePath, RawGeometry, RawRing,
};

/// Parse a GeoJSON FeatureCollection body
pub fn parse_feature_collection(body: &str) -> Result<FeatureCollection> {
    let body = body.trim_start_matches('\u{feff}');
    serde_json::from_str(body).context("geography: invalid GeoJSON feature collection")
}

/// Resolve the geometry tag into a `FeatureGeometry`.
///
/// Returns `None` for geometry kinds that carry no rings (points, lines) and
/// for coordinate arrays that do not have the expected nesting.
pub fn resolve_geometry(raw: &RawGeometry) -> Option<FeatureGeometry> {
    match raw.kind.as_str() {
        "Polygon" => serde_json::from_value::<Vec<RawRing>>(raw.coordinates.clone())
            .ok()
            .map(FeatureGeometry::SinglePart),
        "MultiPolygon" => serde_json::from_value::<Vec<Vec<RawRing>>>(raw.coordinates.clone())
            .ok()
            .map(FeatureGeometry::MultiPart),
        _ => None,
    }
}

/// Outer ring of every polygon part, swapped to (latitude, longitude).
/// Holes are dropped.
pub fn outer_rings(collection: &FeatureCollection) -> Vec<Vec<GeoPoint>> {
    let mut rings = Vec::new();
    let mut skipped_positions = 0usize;

    for feature in &collection.features {
        let Some(geometry) = feature.geometry.as_ref().and_then(resolve_geometry) else {
            continue;
        };
        let parts: Vec<&Vec<RawRing>> = match &geometry {
            FeatureGeometry::SinglePart(polygon) => vec![polygon],
            FeatureGeometry::MultiPart(polygons) => polygons.iter().collect(),
        };
        for polygon in parts {
            let Some(outer) = polygon.first() else {
                continue;
            };
            let ring: Vec<GeoPoint> = outer
                .iter()
                .filter_map(|position| match GeoPoint::from_lon_lat(position) {
                    Ok(p) => Some(p),
                    Err(_) => {
                        skipped_positions += 1;
                        None
                    }
                })
                .collect();
            if !ring.is_empty() {
                rings.push(ring);
            }
        }
    }

    if skipped_positions > 0 {
        warn!("[GEOGRAPHY] skipped {} invalid positions", skipped_positions);
    }
    rings
}

/// Drop small rings and close any ring whose ends differ
pub fn prepare_rings(rings: Vec<Vec<GeoPoint>>, min_points: usize) -> Vec<Vec<GeoPoint>> {
    rings
        .into_iter()
        .filter(|ring| ring.len() >= min_points)
        .map(|mut ring| {
            if ring.first() != ring.last()
                && let Some(&first) = ring.first()
            {
                ring.push(first);
            }
            ring
        })
        .collect()
}

/// Full pipeline: rings -> filtered/closed -> simplified outline paths
pub fn build_outline_paths(
    collection: &FeatureCollection,
    config: &GeographyConfig,
) -> Vec<OutlinePath> {
    prepare_rings(outer_rings(collection), config.min_ring_points)
        .iter()
        .map(|ring| OutlinePath::new(simplify_ring(ring, config.cluster_radius_deg)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Closed square-ish ring of `n` points along a small circle
    fn ring_json(n: usize, center_lon: f64, center_lat: f64, radius: f64) -> String {
        let mut coords: Vec<String> = (0..n)
            .map(|i| {
                let a = i as f64 / n as f64 * std::f64::consts::TAU;
                format!(
                    "[{}, {}]",
                    center_lon + radius * a.cos(),
                    center_lat + radius * a.sin()
                )
            })
            .collect();
        coords.push(coords[0].clone());
        format!("[{}]", coords.join(","))
    }

    #[test]
    fn test_parse_polygon_and_multipolygon() {
        let body = format!(
            r#"{{"type":"FeatureCollection","features":[
                {{"type":"Feature","geometry":{{"type":"Polygon","coordinates":[{ring}, {hole}]}}}},
                {{"type":"Feature","geometry":{{"type":"MultiPolygon","coordinates":[[{ring}],[{ring}]]}}}},
                {{"type":"Feature","geometry":{{"type":"Point","coordinates":[1.0, 2.0]}}}},
                {{"type":"Feature","geometry":null}}
            ]}}"#,
            ring = ring_json(30, 10.0, 20.0, 10.0),
            hole = ring_json(25, 10.0, 20.0, 1.0),
        );
        let collection = parse_feature_collection(&body).unwrap();
        assert_eq!(collection.features.len(), 4);

        let rings = outer_rings(&collection);
        // polygon outer ring + two multipolygon outer rings; hole and point dropped
        assert_eq!(rings.len(), 3);
        assert!(rings.iter().all(|r| r.len() == 31));
        // swapped to (lat, lon)
        assert!((rings[0][0].latitude() - 20.0).abs() < 1e-9);
        assert!((rings[0][0].longitude() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_geometry_rejects_bad_nesting() {
        let raw = RawGeometry {
            kind: "Polygon".into(),
            coordinates: serde_json::json!([1.0, 2.0]),
        };
        assert!(resolve_geometry(&raw).is_none());

        let raw = RawGeometry {
            kind: "LineString".into(),
            coordinates: serde_json::json!([[1.0, 2.0], [3.0, 4.0]]),
        };
        assert!(resolve_geometry(&raw).is_none());
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(parse_feature_collection("not json").is_err());
        let empty = parse_feature_collection("{}").unwrap();
        assert!(empty.features.is_empty());
    }

    #[test]
    fn test_prepare_rings_filters_and_closes() {
        let p = |lat: f64, lon: f64| GeoPoint::new(lat, lon).unwrap();
        let small: Vec<GeoPoint> = (0..10).map(|i| p(i as f64, 0.0)).collect();
        let open: Vec<GeoPoint> = (0..25).map(|i| p(i as f64, 1.0)).collect();
        let mut closed: Vec<GeoPoint> = (0..24).map(|i| p(i as f64, 2.0)).collect();
        closed.push(closed[0]);

        let prepared = prepare_rings(vec![small, open, closed], 20);
        assert_eq!(prepared.len(), 2);
        assert_eq!(prepared[0].len(), 26);
        assert_eq!(prepared[0].first(), prepared[0].last());
        assert_eq!(prepared[1].len(), 25);
    }

    #[test]
    fn test_build_outline_paths() {
        let body = format!(
            r#"{{"features":[{{"geometry":{{"type":"Polygon","coordinates":[{}]}}}}]}}"#,
            ring_json(60, 0.0, 0.0, 20.0)
        );
        let collection = parse_feature_collection(&body).unwrap();
        let paths = build_outline_paths(&collection, &GeographyConfig::default());
        assert_eq!(paths.len(), 1);
        let path = &paths[0];
        assert!(path.points.len() <= 61);
        assert_eq!(path.points.first(), path.points.last());
        assert!(path.elevation >= 0.035 && path.elevation <= 0.055);
    }
}
