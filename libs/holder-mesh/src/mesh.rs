//! # Mesh Data Structure
//!
//! Indexed triangle mesh used by primitives and the boolean kernel.

use glam::{DMat4, DVec3};
use std::collections::HashMap;

/// A triangle mesh with vertices and indices.
///
/// All geometry calculations use f64 internally. Conversion to f32 only
/// happens when the mesh is flattened into an export vertex buffer.
///
/// # Example
///
/// ```rust
/// use holder_mesh::Mesh;
/// use glam::DVec3;
///
/// let mut mesh = Mesh::new();
/// mesh.add_vertex(DVec3::new(0.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
/// mesh.add_vertex(DVec3::new(0.0, 1.0, 0.0));
/// mesh.add_triangle(0, 1, 2);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions (f64 for precision)
    vertices: Vec<DVec3>,
    /// Triangle indices, counter-clockwise seen from outside
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mesh with pre-allocated capacity.
    pub fn with_capacity(vertex_count: usize, triangle_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            triangles: Vec::with_capacity(triangle_count),
        }
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of triangles.
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Returns true if the mesh has no triangles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, position: DVec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Adds a triangle by vertex indices.
    pub fn add_triangle(&mut self, v0: u32, v1: u32, v2: u32) {
        self.triangles.push([v0, v1, v2]);
    }

    /// Returns a reference to the vertices.
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Returns a reference to the triangles.
    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Iterates over triangles as resolved corner positions.
    pub fn triangle_positions(&self) -> impl Iterator<Item = [DVec3; 3]> + '_ {
        self.triangles.iter().map(move |tri| {
            [
                self.vertices[tri[0] as usize],
                self.vertices[tri[1] as usize],
                self.vertices[tri[2] as usize],
            ]
        })
    }

    /// Axis-aligned bounds as `(min, max)`. An empty mesh reports the origin.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        let Some((&first, rest)) = self.vertices.split_first() else {
            return (DVec3::ZERO, DVec3::ZERO);
        };
        rest.iter()
            .fold((first, first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Returns a copy with every vertex transformed by a 4x4 matrix.
    ///
    /// Winding is reversed when the matrix mirrors space so normals keep
    /// pointing outward.
    pub fn transformed(&self, matrix: &DMat4) -> Mesh {
        let vertices = self
            .vertices
            .iter()
            .map(|v| matrix.transform_point3(*v))
            .collect();

        let triangles = if matrix.determinant() < 0.0 {
            self.triangles.iter().map(|t| [t[0], t[2], t[1]]).collect()
        } else {
            self.triangles.clone()
        };

        Mesh {
            vertices,
            triangles,
        }
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive for closed meshes with outward-facing winding.
    pub fn signed_volume(&self) -> f64 {
        self.triangle_positions()
            .map(|[a, b, c]| a.dot(b.cross(c)))
            .sum::<f64>()
            / 6.0
    }

    /// Returns true if every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.vertices.iter().all(|v| v.is_finite())
    }

    /// Validates the mesh for correctness.
    ///
    /// Checks:
    /// - All triangle indices are valid
    /// - No triangle repeats a vertex index
    /// - All coordinates are finite
    pub fn validate(&self) -> bool {
        let vertex_count = self.vertices.len() as u32;

        let indices_ok = self.triangles.iter().all(|tri| {
            tri.iter().all(|&i| i < vertex_count)
                && tri[0] != tri[1]
                && tri[1] != tri[2]
                && tri[0] != tri[2]
        });

        indices_ok && self.is_finite()
    }

    /// Number of directed edges without exactly one opposite twin.
    ///
    /// Zero for a closed, edge-manifold surface with consistent winding.
    pub fn open_edge_count(&self) -> usize {
        let mut counts: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in &self.triangles {
            for k in 0..3 {
                *counts.entry((tri[k], tri[(k + 1) % 3])).or_default() += 1;
            }
        }
        counts
            .iter()
            .filter(|((a, b), count)| **count != 1 || counts.get(&(*b, *a)) != Some(&1))
            .map(|(_, count)| count)
            .sum()
    }

    /// Exports the triangle soup as a flat f32 array.
    ///
    /// Returns [x0, y0, z0, x1, y1, z1, x2, y2, z2, ...], 9 floats per triangle.
    pub fn triangle_soup_f32(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.triangles.len() * 9);
        for corners in self.triangle_positions() {
            for v in corners {
                result.push(v.x as f32);
                result.push(v.y as f32);
                result.push(v.z as f32);
            }
        }
        result
    }
}
