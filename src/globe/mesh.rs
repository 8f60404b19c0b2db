//! Procedural meshes for the globe: line shell, continent outlines and pin

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

use crate::core::coordinates::project;
use crate::geography::OutlinePath;

/// Stem/head dimensions of the location pin
pub const PIN_STEM_RADIUS: f32 = 0.003;
pub const PIN_STEM_LENGTH: f32 = 0.099;
pub const PIN_HEAD_RADIUS: f32 = 0.035;
/// Pins sit slightly below the outline surface
pub const PIN_ELEVATION: f64 = -0.02;

/// Line mesh plus the undisplaced vertex positions it was built from
pub struct LineGeometry {
    pub mesh: Mesh,
    pub base: Vec<Vec3>,
}

fn line_mesh(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> LineGeometry {
    let normals: Vec<[f32; 3]> = positions
        .iter()
        .map(|p| p.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect();
    let raw: Vec<[f32; 3]> = positions.iter().map(|p| p.to_array()).collect();

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, raw)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    if let Some(indices) = indices {
        mesh.insert_indices(Indices::U32(indices));
    }

    LineGeometry {
        mesh,
        base: positions,
    }
}

/// Latitude/longitude wire grid of `segments` × `segments` cells.
pub fn shell_grid(radius: f32, segments: u32) -> LineGeometry {
    let segments = segments.max(3);
    let rings = segments + 1;
    let mut positions = Vec::with_capacity((rings * segments) as usize);

    for i in 0..rings {
        let polar = std::f32::consts::PI * i as f32 / segments as f32;
        for j in 0..segments {
            let azimuth = std::f32::consts::TAU * j as f32 / segments as f32;
            positions.push(Vec3::new(
                radius * polar.sin() * azimuth.cos(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.sin(),
            ));
        }
    }

    let index = |i: u32, j: u32| i * segments + (j % segments);
    let mut indices = Vec::new();
    for i in 0..rings {
        for j in 0..segments {
            // parallels (skip the degenerate pole rings)
            if i > 0 && i < segments {
                indices.extend_from_slice(&[index(i, j), index(i, j + 1)]);
            }
            // meridians
            if i < segments {
                indices.extend_from_slice(&[index(i, j), index(i + 1, j)]);
            }
        }
    }

    line_mesh(positions, Some(indices))
}

/// One line segment per consecutive pair of outline points.
///
/// With `relief` each path is lifted by its own elevation; otherwise all
/// outlines sit on the base outline radius.
pub fn outline_lines(paths: &[OutlinePath], relief: bool) -> LineGeometry {
    let mut positions = Vec::new();
    for path in paths {
        let elevation = if relief { path.elevation } else { 0.0 };
        for pair in path.points.windows(2) {
            positions.push(pair[0].project(elevation).as_vec3());
            positions.push(pair[1].project(elevation).as_vec3());
        }
    }
    line_mesh(positions, None)
}

/// Pin built along -Y from its origin: stem first, head at the far end.
pub fn pin_mesh() -> Mesh {
    let mut stem = Cylinder::new(PIN_STEM_RADIUS, PIN_STEM_LENGTH)
        .mesh()
        .resolution(3)
        .build()
        .translated_by(Vec3::new(0.0, -PIN_STEM_LENGTH / 2.0, 0.0));
    let head = Sphere::new(PIN_HEAD_RADIUS)
        .mesh()
        .uv(8, 8)
        .translated_by(Vec3::new(0.0, -PIN_STEM_LENGTH, 0.0));

    if let Err(e) = stem.merge(&head) {
        warn!("[GLOBE] pin head not merged: {}", e);
    }
    stem
}

/// Local transform of the pin for a focused coordinate; the head points away from the centre.
pub fn pin_transform(lat: f64, long: f64) -> Transform {
    let position = project(lat, long, PIN_ELEVATION).as_vec3();
    let outward = position.try_normalize().unwrap_or(Vec3::Y);
    Transform::from_translation(position).with_rotation(Quat::from_rotation_arc(Vec3::NEG_Y, outward))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::coordinates::GeoPoint;

    #[test]
    fn test_shell_grid_radius() {
        let grid = shell_grid(1.0, 8);
        assert_eq!(grid.base.len(), 9 * 8);
        for p in &grid.base {
            assert!((p.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_outline_lines_segments() {
        let points: Vec<GeoPoint> = [(0.0, 0.0), (0.0, 10.0), (10.0, 10.0), (0.0, 0.0)]
            .iter()
            .map(|&(lat, lon)| GeoPoint::new(lat, lon).unwrap())
            .collect();
        let path = OutlinePath::new(points);

        let flat = outline_lines(std::slice::from_ref(&path), false);
        assert_eq!(flat.base.len(), 6);
        for p in &flat.base {
            assert!((p.length() - 1.015).abs() < 1e-5);
        }

        let raised = outline_lines(std::slice::from_ref(&path), true);
        let expected = 1.015 + path.elevation as f32;
        assert!((raised.base[0].length() - expected).abs() < 1e-5);
    }

    #[test]
    fn test_pin_points_outward() {
        let transform = pin_transform(48.8566, 2.3522);
        let head_local = Vec3::new(0.0, -PIN_STEM_LENGTH, 0.0);
        let head = transform.transform_point(head_local);
        assert!(head.length() > transform.translation.length());
        assert!((transform.translation.length() - 0.995).abs() < 1e-5);
    }
}
