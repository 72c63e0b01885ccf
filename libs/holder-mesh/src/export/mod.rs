//! # Mesh Export
//!
//! Flattening solids into triangle-soup vertex buffers and serializing
//! those buffers as STL.

pub mod stl;

pub use stl::{
    estimate_binary_stl_size_bytes, estimate_binary_stl_size_kb, to_ascii_stl, to_ascii_stl_named,
    to_binary_stl, write_binary_stl,
};

use crate::solid::Solid;
use serde::{Deserialize, Serialize};

/// Bounding box extents of a mesh (millimeters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDimensions {
    /// Extent along X.
    pub width: f64,
    /// Extent along Y.
    pub height: f64,
    /// Extent along Z.
    pub depth: f64,
}

/// Flat vertex buffer plus its bounding box.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshOutput {
    /// `[x0, y0, z0, x1, y1, z1, x2, y2, z2, ...]`, 9 floats per triangle.
    pub vertex_array: Vec<f32>,
    pub dimensions: MeshDimensions,
}

impl MeshOutput {
    pub fn triangle_count(&self) -> usize {
        self.vertex_array.len() / config::constants::FLOATS_PER_TRIANGLE
    }
}

/// Flattens a solid into an export buffer.
///
/// The dimensions are measured on the solid itself, so they always agree
/// with the geometry that is written out.
pub fn flatten(solid: &Solid) -> MeshOutput {
    let mesh = solid.world_mesh();
    let (min, max) = if mesh.is_empty() {
        Default::default()
    } else {
        mesh.bounding_box()
    };
    let extent = max - min;
    MeshOutput {
        vertex_array: mesh.triangle_soup_f32(),
        dimensions: MeshDimensions {
            width: extent.x,
            height: extent.y,
            depth: extent.z,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::Primitive;
    use glam::DVec3;

    #[test]
    fn test_flatten_box() {
        let solid = Primitive::Box {
            width: 3.0,
            height: 4.0,
            depth: 5.0,
        }
        .build()
        .unwrap()
        .translated(DVec3::new(10.0, 0.0, 1.0));

        let output = flatten(&solid);
        assert_eq!(output.vertex_array.len(), 12 * 9);
        assert_eq!(output.triangle_count(), 12);
        assert_eq!(
            output.dimensions,
            MeshDimensions {
                width: 3.0,
                height: 4.0,
                depth: 5.0
            }
        );
    }

    #[test]
    fn test_output_serializes_camel_case() {
        let output = MeshOutput::default();
        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("vertexArray"));
        assert!(json.contains("\"depth\":0.0"));
    }
}
