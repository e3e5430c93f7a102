//! Grid mesh triangulation for corridor segments.
//!
//! A segment is extruded sideways into a `rows x (columns + 1)` vertex grid and
//! stitched with double-sided quads, so the strip renders from above and below.

use glam::{Vec2, Vec3, Vec4};
use serde::Serialize;

use crate::constants::MESH_TANGENT;
use crate::corridor::RoutedSegment;

/// Triangulated quad strip ready for a renderer
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MeshBuffer {
    pub vertices: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub tangents: Vec<Vec4>,
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Axis the strip widens along
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Spread {
    X,
    Z,
}

/// Triangulate the segment from `start` to `end` into a strip `width` wide.
///
/// `rows` bands run across the strip and `columns` steps along it. Fewer than
/// two rows or no columns yields an empty buffer.
pub fn triangulate(start: Vec3, end: Vec3, rows: usize, columns: usize, width: f32) -> MeshBuffer {
    if rows < 2 || columns < 1 {
        return MeshBuffer::default();
    }

    let depth = (start.x - end.x).abs();
    let length = (start.z - end.z).abs();
    let band = width / rows as f32;

    // Travel mostly along x widens the strip along z, and the other way round.
    // Equal deltas keep the endpoints in place and widen along x.
    let (spread, offset) = if depth > length {
        (Spread::Z, Vec3::new(0.0, 0.0, -band))
    } else if depth < length {
        (Spread::X, Vec3::new(-band, 0.0, 0.0))
    } else {
        (Spread::X, Vec3::ZERO)
    };
    let (start, end) = (start + offset, end + offset);

    let vertex_count = rows * (columns + 1);
    let tangent = Vec4::from_array(MESH_TANGENT);
    let mut mesh = MeshBuffer {
        vertices: Vec::with_capacity(vertex_count),
        uvs: Vec::with_capacity(vertex_count),
        tangents: vec![tangent; vertex_count],
        indices: triangle_indices(rows, columns),
    };

    for i in 0..rows {
        let shift = i as f32 * band;
        for j in 0..=columns {
            let mut point = start.lerp(end, j as f32 / columns as f32);
            match spread {
                Spread::Z => point.z += shift,
                Spread::X => point.x += shift,
            }
            mesh.vertices.push(point);
            let uv = Vec2::new(point.x / rows as f32, point.z / columns as f32);
            mesh.uvs.push(uv);
        }
    }

    mesh
}

/// Triangulate a routed segment using its weight as the strip width
pub fn triangulate_segment(segment: &RoutedSegment, rows: usize, columns: usize) -> MeshBuffer {
    triangulate(
        segment.start.position,
        segment.end.position,
        rows,
        columns,
        segment.weight,
    )
}

/// Two triangles per winding for every grid cell, front then back.
fn triangle_indices(rows: usize, columns: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(2 * 6 * (rows - 1) * columns);
    let stride = (columns + 1) as u32;

    let mut v = 0u32;
    for _ in 0..rows - 1 {
        for _ in 0..columns {
            let below = v + stride;
            indices.extend_from_slice(&[
                below,
                below + 1,
                v,
                v,
                below + 1,
                v + 1,
                below,
                v,
                below + 1,
                v,
                v + 1,
                below + 1,
            ]);
            v += 1;
        }
        // Skip the last vertex of the row
        v += 1;
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corridor::SegmentPoint;

    #[test]
    fn test_grid_sizes() {
        let mesh = triangulate(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 4, 3, 2.0);
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.uvs.len(), 16);
        assert_eq!(mesh.tangents.len(), 16);
        assert_eq!(mesh.indices.len(), 108);
        assert_eq!(mesh.triangle_count(), 36);
    }

    #[test]
    fn test_degenerate_grid_is_empty() {
        assert!(triangulate(Vec3::ZERO, Vec3::X, 1, 3, 2.0).is_empty());
        assert!(triangulate(Vec3::ZERO, Vec3::X, 3, 0, 2.0).is_empty());
    }

    #[test]
    fn test_indices_stay_in_bounds() {
        let mesh = triangulate(Vec3::ZERO, Vec3::new(7.0, 1.0, 2.0), 5, 6, 2.0);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
    }

    #[test]
    fn test_first_cell_winding() {
        let mesh = triangulate(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), 3, 2, 2.0);
        assert_eq!(&mesh.indices[..12], &[3, 4, 0, 0, 4, 1, 3, 0, 4, 0, 1, 4]);
        // Second row of cells starts after the row's last vertex
        assert_eq!(mesh.indices[24], 6);
    }

    #[test]
    fn test_travel_along_z_spreads_along_x() {
        let mesh = triangulate(Vec3::ZERO, Vec3::new(0.0, 0.0, 4.0), 2, 2, 2.0);
        // Endpoints shifted by -width/rows on x, then one band per row
        assert_eq!(mesh.vertices[0], Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices[1], Vec3::new(-1.0, 0.0, 2.0));
        assert_eq!(mesh.vertices[2], Vec3::new(-1.0, 0.0, 4.0));
        assert_eq!(mesh.vertices[3], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(mesh.uvs[2], Vec2::new(-0.5, 2.0));
        assert!(mesh.tangents.iter().all(|t| *t == Vec4::new(1.0, 0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_travel_along_x_spreads_along_z() {
        let mesh = triangulate(Vec3::ZERO, Vec3::new(6.0, 2.0, 1.0), 2, 3, 4.0);
        assert_eq!(mesh.vertices[0], Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(mesh.vertices[3], Vec3::new(6.0, 2.0, -1.0));
        assert_eq!(mesh.vertices[4], Vec3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_diagonal_is_not_offset() {
        let mesh = triangulate(Vec3::ZERO, Vec3::new(3.0, 0.0, 3.0), 2, 1, 2.0);
        assert_eq!(mesh.vertices[0], Vec3::ZERO);
        assert_eq!(mesh.vertices[2], Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_segment_width_comes_from_weight() {
        let segment = RoutedSegment {
            start: SegmentPoint::corner(Vec3::ZERO),
            end: SegmentPoint::corner(Vec3::new(0.0, 0.0, 8.0)),
            weight: 3.0,
        };
        let mesh = triangulate_segment(&segment, 3, 4);
        assert_eq!(mesh.vertices.len(), 15);
        assert_eq!(mesh.vertices[0].x, -1.0);
        assert_eq!(mesh.vertices[10].x, 1.0);
    }
}
