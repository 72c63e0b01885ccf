//! # Holder Mesh Handle
//!
//! WASM-friendly wrapper around one holder build.

use holder_mesh::{HolderMeshes, MeshDimensions, MeshOutput};
use wasm_bindgen::prelude::*;

/// Bounding box of one variant in millimeters.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

impl From<MeshDimensions> for Dimensions {
    fn from(d: MeshDimensions) -> Self {
        Self {
            width: d.width,
            height: d.height,
            depth: d.depth,
        }
    }
}

/// The three holder variants returned from `build_holder_mesh`.
///
/// # Example (JavaScript)
///
/// ```javascript
/// const meshes = build_holder_mesh(JSON.stringify(project));
///
/// const geometry = new THREE.BufferGeometry();
/// geometry.setAttribute('position', new THREE.BufferAttribute(meshes.main_vertices(), 3));
///
/// console.log(meshes.main_dimensions().depth, meshes.hidden_legs_count);
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct HolderMeshHandle {
    meshes: HolderMeshes,
}

#[wasm_bindgen]
impl HolderMeshHandle {
    /// Full-depth holder as a Float32Array, 9 floats per triangle.
    pub fn main_vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.meshes.main.vertex_array[..])
    }

    /// Shallow holder as a Float32Array.
    pub fn hollow_vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.meshes.hollow.vertex_array[..])
    }

    /// Board mockup as a Float32Array.
    pub fn positive_vertices(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(&self.meshes.positive.vertex_array[..])
    }

    pub fn main_dimensions(&self) -> Dimensions {
        self.meshes.main.dimensions.into()
    }

    pub fn hollow_dimensions(&self) -> Dimensions {
        self.meshes.hollow.dimensions.into()
    }

    pub fn positive_dimensions(&self) -> Dimensions {
        self.meshes.positive.dimensions.into()
    }

    /// Legs left out because they overlap a component.
    #[wasm_bindgen(getter)]
    pub fn hidden_legs_count(&self) -> u32 {
        u32::try_from(self.meshes.hidden_legs_count).unwrap_or(u32::MAX)
    }

    /// True if the configured label did not fit on the holder.
    #[wasm_bindgen(getter)]
    pub fn label_skipped(&self) -> bool {
        self.meshes.label_skipped
    }
}

impl HolderMeshHandle {
    pub fn new(meshes: HolderMeshes) -> Self {
        Self { meshes }
    }

    pub fn meshes(&self) -> &HolderMeshes {
        &self.meshes
    }

    pub fn main(&self) -> &MeshOutput {
        &self.meshes.main
    }
}
