//! Point-cluster reduction for outline rings

use crate::core::coordinates::{GeoPoint, haversine_deg};

/// Rings at or below this size are returned untouched.
const MIN_POINTS_TO_SIMPLIFY: usize = 5;

/// Greedily merge points lying within `radius_deg` of an unvisited seed.
///
/// Each cluster is replaced by the plain average of its latitudes and
/// longitudes (not a spherical centroid), which is close enough at a 2° radius.
/// A ring that was closed stays closed.
pub fn simplify_ring(points: &[GeoPoint], radius_deg: f64) -> Vec<GeoPoint> {
    if points.len() <= MIN_POINTS_TO_SIMPLIFY {
        return points.to_vec();
    }

    let mut used = vec![false; points.len()];
    let mut result = Vec::new();

    for (i, seed) in points.iter().enumerate() {
        if used[i] {
            continue;
        }

        let mut lat_sum = 0.0;
        let mut lon_sum = 0.0;
        let mut count = 0usize;
        for (j, candidate) in points.iter().enumerate() {
            if !used[j] && haversine_deg(seed, candidate) <= radius_deg {
                lat_sum += candidate.latitude();
                lon_sum += candidate.longitude();
                count += 1;
                used[j] = true;
            }
        }

        if count > 0 {
            let n = count as f64;
            // Averages of in-range values stay in range
            if let Ok(merged) = GeoPoint::new(lat_sum / n, lon_sum / n) {
                result.push(merged);
            }
        }
    }

    if points.first() == points.last()
        && let Some(&first) = result.first()
    {
        result.push(first);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn test_small_ring_unchanged() {
        let ring = vec![p(0.0, 0.0), p(0.1, 0.1), p(0.2, 0.2), p(0.0, 0.0)];
        assert_eq!(simplify_ring(&ring, 2.0), ring);

        let five = vec![p(0.0, 0.0), p(0.1, 0.0), p(0.2, 0.0), p(0.3, 0.0), p(0.4, 0.0)];
        assert_eq!(simplify_ring(&five, 2.0), five);
    }

    #[test]
    fn test_large_ring_never_grows() {
        for spacing in [0.1, 0.5, 1.9, 2.5, 7.0] {
            let mut ring: Vec<GeoPoint> = (0..40)
                .map(|i| p(((i as f64) * spacing).min(80.0), (i as f64 * spacing).min(170.0)))
                .collect();
            let first = ring[0];
            ring.push(first);
            let simplified = simplify_ring(&ring, 2.0);
            assert!(simplified.len() <= ring.len(), "spacing {}", spacing);
            assert_eq!(simplified.first(), simplified.last());
        }
    }

    #[test]
    fn test_clusters_are_averaged() {
        // Two tight groups far apart, closed ring
        let ring = vec![
            p(0.0, 0.0),
            p(0.5, 0.0),
            p(1.0, 0.0),
            p(30.0, 30.0),
            p(30.5, 30.0),
            p(31.0, 30.0),
            p(0.0, 0.0),
        ];
        let simplified = simplify_ring(&ring, 2.0);
        assert_eq!(simplified.len(), 3);
        // first cluster includes the closing point: (0 + 0.5 + 1 + 0) / 4
        assert!((simplified[0].latitude() - 0.375).abs() < 1e-12);
        assert!((simplified[1].latitude() - 30.5).abs() < 1e-12);
        assert!((simplified[1].longitude() - 30.0).abs() < 1e-12);
        assert_eq!(simplified[2], simplified[0]);
    }

    #[test]
    fn test_open_ring_stays_open() {
        let ring: Vec<GeoPoint> = (0..8).map(|i| p(i as f64 * 5.0, 0.0)).collect();
        let simplified = simplify_ring(&ring, 2.0);
        assert_eq!(simplified.len(), 8);
        assert_ne!(simplified.first(), simplified.last());
    }
}
