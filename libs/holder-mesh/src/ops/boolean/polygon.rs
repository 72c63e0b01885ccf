//! # Polygon for BSP Operations
//!
//! Convex planar polygon carried through the BSP tree.

use super::plane::Plane;
use glam::DVec3;

/// A convex polygon with its supporting plane.
#[derive(Debug, Clone)]
pub struct Polygon {
    /// Vertices in counter-clockwise order seen from the front.
    vertices: Vec<DVec3>,
    plane: Plane,
}

impl Polygon {
    /// Create polygon from vertices.
    ///
    /// Returns `None` if the first three vertices don't span a plane.
    pub fn from_vertices(vertices: Vec<DVec3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2])?;
        Some(Self { vertices, plane })
    }

    /// Create a fragment that keeps the plane of its parent polygon.
    pub fn with_plane(vertices: Vec<DVec3>, plane: Plane) -> Self {
        Self { vertices, plane }
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Reverse winding order and plane.
    pub fn flip(&mut self) {
        self.vertices.reverse();
        self.plane.flip();
    }
}
