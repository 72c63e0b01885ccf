//! # Box Primitive
//!
//! Generates the rectangular brush used for shells, pockets, holes and legs.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;

/// Creates a box mesh centered on X/Y with its base at z = 0.
///
/// # Arguments
///
/// * `width` - Extent along X
/// * `height` - Extent along Y
/// * `depth` - Extent along Z, from z = 0 up to z = depth
///
/// # Returns
///
/// A mesh with 8 vertices and 12 triangles (2 per face).
///
/// # Example
///
/// ```rust
/// use holder_mesh::primitives::create_box;
///
/// let mesh = create_box(10.0, 20.0, 5.0).unwrap();
/// let (min, max) = mesh.bounding_box();
/// assert_eq!(min.z, 0.0);
/// assert_eq!(max.z, 5.0);
/// assert_eq!(max.x, 5.0);
/// ```
pub fn create_box(width: f64, height: f64, depth: f64) -> MeshResult<Mesh> {
    if !(width > 0.0 && height > 0.0 && depth > 0.0) || !(width * height * depth).is_finite() {
        return Err(MeshError::construction(format!(
            "Box size must be positive: {width} x {height} x {depth}"
        )));
    }

    let mut mesh = Mesh::with_capacity(8, 12);

    let min = DVec3::new(-width / 2.0, -height / 2.0, 0.0);
    let max = DVec3::new(width / 2.0, height / 2.0, depth);

    // Bottom face (z = 0)
    let v0 = mesh.add_vertex(DVec3::new(min.x, min.y, min.z)); // left-front-bottom
    let v1 = mesh.add_vertex(DVec3::new(max.x, min.y, min.z)); // right-front-bottom
    let v2 = mesh.add_vertex(DVec3::new(max.x, max.y, min.z)); // right-back-bottom
    let v3 = mesh.add_vertex(DVec3::new(min.x, max.y, min.z)); // left-back-bottom

    // Top face (z = depth)
    let v4 = mesh.add_vertex(DVec3::new(min.x, min.y, max.z));
    let v5 = mesh.add_vertex(DVec3::new(max.x, min.y, max.z));
    let v6 = mesh.add_vertex(DVec3::new(max.x, max.y, max.z));
    let v7 = mesh.add_vertex(DVec3::new(min.x, max.y, max.z));

    // Counter-clockwise seen from outside
    mesh.add_triangle(v0, v2, v1);
    mesh.add_triangle(v0, v3, v2);

    mesh.add_triangle(v4, v5, v6);
    mesh.add_triangle(v4, v6, v7);

    mesh.add_triangle(v0, v1, v5);
    mesh.add_triangle(v0, v5, v4);

    mesh.add_triangle(v2, v3, v7);
    mesh.add_triangle(v2, v7, v6);

    mesh.add_triangle(v3, v0, v4);
    mesh.add_triangle(v3, v4, v7);

    mesh.add_triangle(v1, v2, v6);
    mesh.add_triangle(v1, v6, v5);

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_counts() {
        let mesh = create_box(10.0, 10.0, 10.0).unwrap();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate());
    }

    #[test]
    fn test_box_base_centered() {
        let mesh = create_box(4.0, 6.0, 3.0).unwrap();
        let (min, max) = mesh.bounding_box();
        assert_eq!(min, DVec3::new(-2.0, -3.0, 0.0));
        assert_eq!(max, DVec3::new(2.0, 3.0, 3.0));
    }

    #[test]
    fn test_box_outward_winding() {
        let mesh = create_box(4.0, 6.0, 3.0).unwrap();
        assert_relative_eq!(mesh.signed_volume(), 72.0, epsilon = 1e-9);
    }

    #[test]
    fn test_box_is_deterministic() {
        assert_eq!(
            create_box(1.5, 2.5, 3.5).unwrap(),
            create_box(1.5, 2.5, 3.5).unwrap()
        );
    }

    #[test]
    fn test_box_invalid_size() {
        assert!(create_box(0.0, 10.0, 10.0).is_err());
        assert!(create_box(5.0, -1.0, 10.0).is_err());
        assert!(create_box(5.0, 1.0, f64::NAN).is_err());
        assert!(create_box(5.0, 1.0, f64::INFINITY).is_err());
    }
}
