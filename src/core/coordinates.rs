//! Core coordinate utilities
//!
//! Geographic points and the projection between them and the globe's unit sphere:
//! - `project` places a (lat, long, elevation) triple on the sphere surface
//! - `rotation_for` gives the globe rotation that turns a point toward the viewer
//! - `unproject` recovers the coordinate currently facing the viewer from a rotation

use bevy::math::DVec3;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::fmt;

/// Base radius of the globe surface before any elevation is added.
pub const SURFACE_RADIUS: f64 = 1.015;

// ========================= Geographic coordinates and helpers =========================

#[derive(Debug, Clone, PartialEq)]
pub struct CoordError {
    pub msg: String,
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl std::error::Error for CoordError {}

/// Latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordError {
                msg: format!("Invalid latitude: {:?}", latitude),
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordError {
                msg: format!("Invalid longitude: {:?}", longitude),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from a GeoJSON position, which is ordered `[longitude, latitude]`.
    pub fn from_lon_lat(position: &[f64]) -> Result<Self, CoordError> {
        match position {
            [lon, lat, ..] => Self::new(*lat, *lon),
            _ => Err(CoordError {
                msg: format!("Position needs two values, got {}", position.len()),
            }),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn as_radians(&self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }

    /// Position on the globe at `SURFACE_RADIUS + elevation`.
    pub fn project(&self, elevation: f64) -> DVec3 {
        project(self.latitude, self.longitude, elevation)
    }
}

/// Map a geographic coordinate onto the sphere, with the polar axis along +Y.
///
/// Longitude is negated so that increasing longitude turns the same way as a
/// positive yaw of the globe.
pub fn project(lat: f64, long: f64, elevation: f64) -> DVec3 {
    let lat_rad = lat.to_radians();
    let long_rad = (-long).to_radians();
    let radius = SURFACE_RADIUS + elevation;
    DVec3::new(
        radius * lat_rad.cos() * long_rad.cos(),
        radius * lat_rad.sin(),
        radius * lat_rad.cos() * long_rad.sin(),
    )
}

/// Globe rotation `(pitch, yaw)` that brings `point` in front of the camera.
pub fn rotation_for(point: &GeoPoint) -> (f64, f64) {
    let (lat_rad, long_rad) = point.as_radians();
    (lat_rad, -long_rad - FRAC_PI_2)
}

/// Coordinate facing the camera for a globe rotated by `(pitch, yaw)`.
///
/// Latitude is clamped to [-90, 90] and longitude normalised into [-180, 180).
pub fn unproject(pitch: f64, yaw: f64) -> (f64, f64) {
    let lat = pitch.to_degrees().clamp(-90.0, 90.0);
    let mut long = ((-yaw.to_degrees() - 90.0 + 180.0) % 360.0) - 180.0;
    if long < -180.0 {
        long += 360.0;
    }
    (lat, long)
}

/// Wrap an angle difference into [-π, π].
pub fn wrap_angle(delta: f64) -> f64 {
    let mut wrapped = delta % TAU;
    if wrapped.abs() > PI {
        wrapped -= wrapped.signum() * TAU;
    }
    wrapped
}

/// Great-circle distance between two points, in degrees (haversine).
pub fn haversine_deg(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lon1) = a.as_radians();
    let (lat2, lon2) = b.as_radians();
    let d_lat = lat2 - lat1;
    let d_lon = lon2 - lon1;
    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    (2.0 * h.sqrt().atan2((1.0 - h).sqrt())).to_degrees()
}

/// Human readable coordinate, e.g. `48.8566°N, 2.3522°E`.
pub fn format_coordinates(lat: f64, long: f64) -> String {
    format!(
        "{:.4}°{}, {:.4}°{}",
        lat,
        if lat >= 0.0 { "N" } else { "S" },
        long,
        if long >= 0.0 { "E" } else { "W" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::{DQuat, EulerRot};

    #[test]
    fn test_geo_point_valid() {
        let p = GeoPoint::new(48.8566, 2.3522).unwrap();
        assert_eq!(p.latitude(), 48.8566);
        assert_eq!(p.longitude(), 2.3522);
    }

    #[test]
    fn test_geo_point_invalid() {
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_lon_lat_swaps_order() {
        let p = GeoPoint::from_lon_lat(&[2.3522, 48.8566]).unwrap();
        assert_eq!(p.latitude(), 48.8566);
        assert_eq!(p.longitude(), 2.3522);

        // Altitude is ignored
        let p = GeoPoint::from_lon_lat(&[-74.006, 40.7128, 12.0]).unwrap();
        assert_eq!(p.longitude(), -74.006);

        assert!(GeoPoint::from_lon_lat(&[1.0]).is_err());
    }

    #[test]
    fn test_project_radius_and_axes() {
        let north = project(90.0, 0.0, 0.0);
        assert!((north.y - SURFACE_RADIUS).abs() < 1e-12);
        assert!(north.x.abs() < 1e-12);

        let origin = project(0.0, 0.0, 0.0);
        assert!((origin.x - SURFACE_RADIUS).abs() < 1e-12);

        // Positive longitude goes toward -Z because of the inverted sign
        let east = project(0.0, 90.0, 0.0);
        assert!((east.z + SURFACE_RADIUS).abs() < 1e-12);

        let raised = project(10.0, 20.0, 0.05);
        assert!((raised.length() - (SURFACE_RADIUS + 0.05)).abs() < 1e-12);
    }

    #[test]
    fn test_roundtrip_rotation_unproject() {
        let mut lat = -89.0;
        while lat <= 89.0 {
            let mut long = -179.0;
            while long <= 179.0 {
                let p = GeoPoint::new(lat, long).unwrap();
                let (pitch, yaw) = rotation_for(&p);
                let (rlat, rlong) = unproject(pitch, yaw);
                assert!((rlat - lat).abs() < 1e-6, "lat {} vs {}", lat, rlat);
                assert!((rlong - long).abs() < 1e-6, "long {} vs {}", long, rlong);
                long += 7.25;
            }
            lat += 3.5;
        }
    }

    #[test]
    fn test_rotation_brings_point_to_viewer() {
        for (lat, long) in [(48.8566, 2.3522), (-33.8688, 151.2093), (40.7128, -74.006)] {
            let p = GeoPoint::new(lat, long).unwrap();
            let (pitch, yaw) = rotation_for(&p);
            let q = DQuat::from_euler(EulerRot::XYZ, pitch, yaw, 0.0);
            let facing = q * p.project(0.0).normalize();
            assert!((facing - DVec3::Z).length() < 1e-9, "{:?}", facing);
        }
    }

    #[test]
    fn test_unproject_normalises_longitude() {
        // yaw of a full extra turn gives the same longitude
        let (_, a) = unproject(0.0, -FRAC_PI_2);
        let (_, b) = unproject(0.0, -FRAC_PI_2 - TAU);
        assert!(a.abs() < 1e-9);
        assert!(b.abs() < 1e-9);

        let (lat, long) = unproject(2.0, 0.0);
        assert_eq!(lat, 90.0);
        assert!((-180.0..180.0).contains(&long));
        assert!((long + 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(3.0 * FRAC_PI_2) + FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_angle(-3.0 * FRAC_PI_2) - FRAC_PI_2).abs() < 1e-12);
        assert!((wrap_angle(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_haversine() {
        let a = GeoPoint::new(0.0, 0.0).unwrap();
        let b = GeoPoint::new(0.0, 1.0).unwrap();
        assert!((haversine_deg(&a, &b) - 1.0).abs() < 1e-9);
        assert_eq!(haversine_deg(&a, &a), 0.0);

        let pole = GeoPoint::new(90.0, 0.0).unwrap();
        assert!((haversine_deg(&a, &pole) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(48.8566, 2.3522), "48.8566°N, 2.3522°E");
        // Sign is kept alongside the hemisphere suffix
        assert_eq!(format_coordinates(-33.8688, -70.5), "-33.8688°S, -70.5000°W");
    }
}
