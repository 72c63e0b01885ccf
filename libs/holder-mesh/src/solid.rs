//! # Solid
//!
//! A CSG brush: a local mesh plus a placement transform.
//!
//! Solids are values. Placement methods consume the solid and return a new
//! one with the composed transform, so a brush can be built as a chain:
//!
//! ```rust
//! use holder_mesh::primitives::Primitive;
//! use glam::DVec3;
//!
//! let hole = Primitive::Box { width: 2.0, height: 4.0, depth: 3.0 }
//!     .build()
//!     .unwrap()
//!     .rotated_z(-30.0)
//!     .translated(DVec3::new(10.0, -5.0, 2.0));
//! let (min, _max) = hole.world_mesh().bounding_box();
//! assert!((min.z - 2.0).abs() < 1e-9);
//! ```

use crate::mesh::Mesh;
use glam::{DMat4, DVec3};

/// Triangle mesh with a world placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Solid {
    mesh: Mesh,
    transform: DMat4,
}

impl Solid {
    /// Wraps a mesh that is already in world space.
    pub fn from_mesh(mesh: Mesh) -> Self {
        Self {
            mesh,
            transform: DMat4::IDENTITY,
        }
    }

    /// Mesh in its local frame.
    pub fn local_mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Current placement transform.
    pub fn transform(&self) -> DMat4 {
        self.transform
    }

    /// Moves the solid by `offset` in world space.
    pub fn translated(self, offset: DVec3) -> Self {
        self.with_applied(DMat4::from_translation(offset))
    }

    /// Rotates the solid about the world Z axis. Positive degrees turn
    /// counter-clockwise when viewed from above.
    pub fn rotated_z(self, degrees: f64) -> Self {
        self.with_applied(DMat4::from_rotation_z(degrees.to_radians()))
    }

    /// Rotates the solid about the world X axis.
    pub fn rotated_x(self, degrees: f64) -> Self {
        self.with_applied(DMat4::from_rotation_x(degrees.to_radians()))
    }

    fn with_applied(self, matrix: DMat4) -> Self {
        Self {
            mesh: self.mesh,
            transform: matrix * self.transform,
        }
    }

    /// Mesh with the placement baked into every vertex.
    pub fn world_mesh(&self) -> Mesh {
        if self.transform == DMat4::IDENTITY {
            self.mesh.clone()
        } else {
            self.mesh.transformed(&self.transform)
        }
    }

    /// Consumes the solid and returns its world-space mesh.
    pub fn into_world_mesh(self) -> Mesh {
        if self.transform == DMat4::IDENTITY {
            self.mesh
        } else {
            self.mesh.transformed(&self.transform)
        }
    }

    /// Axis-aligned bounds in world space.
    pub fn bounding_box(&self) -> (DVec3, DVec3) {
        self.world_mesh().bounding_box()
    }

    /// Enclosed volume in world space.
    pub fn volume(&self) -> f64 {
        self.world_mesh().signed_volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Primitive;
    use approx::assert_relative_eq;

    fn unit_box() -> Solid {
        Primitive::Box {
            width: 2.0,
            height: 4.0,
            depth: 1.0,
        }
        .build()
        .unwrap()
    }

    #[test]
    fn test_translation_composes() {
        let solid = unit_box()
            .translated(DVec3::new(1.0, 0.0, 0.0))
            .translated(DVec3::new(0.0, 2.0, 3.0));
        let (min, max) = solid.bounding_box();
        assert_relative_eq!(min.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(min.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(min.z, 3.0, epsilon = 1e-12);
        assert_relative_eq!(max.z, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotate_then_translate_keeps_center() {
        let solid = unit_box()
            .rotated_z(90.0)
            .translated(DVec3::new(5.0, 5.0, 0.0));
        let (min, max) = solid.bounding_box();
        // 2x4 footprint turned a quarter becomes 4x2
        assert_relative_eq!(max.x - min.x, 4.0, epsilon = 1e-9);
        assert_relative_eq!(max.y - min.y, 2.0, epsilon = 1e-9);
        assert_relative_eq!((min.x + max.x) / 2.0, 5.0, epsilon = 1e-9);
    }

    #[test]
    fn test_placement_preserves_volume() {
        let base = unit_box();
        let moved = base.clone().rotated_x(90.0).translated(DVec3::splat(7.0));
        assert_relative_eq!(base.volume(), 8.0, epsilon = 1e-9);
        assert_relative_eq!(moved.volume(), 8.0, epsilon = 1e-9);
        // Source untouched by placement of its clone
        assert_eq!(base.transform(), DMat4::IDENTITY);
    }
}
