//! # Cylinder Primitive
//!
//! Generates the round brush used for circular component holes and pillars.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use glam::DVec3;
use std::f64::consts::PI;

/// Creates a capped cylinder mesh with its axis along +Z.
///
/// The cylinder is centered on X/Y, the bottom cap sits at z = 0 and the top
/// cap at z = height. Use [`config::constants::cylinder_segments`] to pick a
/// radius-dependent resolution.
///
/// # Example
///
/// ```rust
/// use holder_mesh::primitives::create_cylinder;
///
/// let mesh = create_cylinder(5.0, 10.0, 32).unwrap();
/// // Two cap centers plus two rings
/// assert_eq!(mesh.vertex_count(), 2 + 2 * 32);
/// assert_eq!(mesh.triangle_count(), 4 * 32);
/// ```
pub fn create_cylinder(radius: f64, height: f64, segments: u32) -> MeshResult<Mesh> {
    if !(radius > 0.0) || !radius.is_finite() {
        return Err(MeshError::construction(format!(
            "Cylinder radius must be positive: {radius}"
        )));
    }

    if !(height > 0.0) || !height.is_finite() {
        return Err(MeshError::construction(format!(
            "Cylinder height must be positive: {height}"
        )));
    }

    if segments < 3 {
        return Err(MeshError::construction(format!(
            "Cylinder segments must be at least 3: {segments}"
        )));
    }

    let n = segments as usize;
    let mut mesh = Mesh::with_capacity(2 + 2 * n, 4 * n);

    let bottom_center = mesh.add_vertex(DVec3::ZERO);
    let top_center = mesh.add_vertex(DVec3::new(0.0, 0.0, height));

    let ring = |z: f64, mesh: &mut Mesh| -> Vec<u32> {
        (0..segments)
            .map(|j| {
                let theta = 2.0 * PI * j as f64 / segments as f64;
                mesh.add_vertex(DVec3::new(radius * theta.cos(), radius * theta.sin(), z))
            })
            .collect()
    };

    let bottom = ring(0.0, &mut mesh);
    let top = ring(height, &mut mesh);

    for j in 0..n {
        let next = (j + 1) % n;

        // Side quad
        mesh.add_triangle(bottom[j], bottom[next], top[next]);
        mesh.add_triangle(bottom[j], top[next], top[j]);

        // Caps
        mesh.add_triangle(bottom_center, bottom[next], bottom[j]);
        mesh.add_triangle(top_center, top[j], top[next]);
    }

    Ok(mesh)
}
