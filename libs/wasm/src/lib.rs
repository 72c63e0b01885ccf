//! WASM-facing entry points for the holder pipeline.
//!
//! This crate is compiled to a `cdylib` and consumed from JavaScript via
//! `wasm-bindgen`. Native tests use the `*_internal` helpers, which return
//! Rust errors and never touch a JS host.
//!
//! ```
//! let json = r#"{ "panelSettings": { "width": 20, "height": 20, "pcbThickness": 1.6, "smdHeight": 2 } }"#;
//! let meshes = holder_wasm::build_holder_mesh_internal(json, None).unwrap();
//! assert_eq!(meshes.main.vertex_array.len() % 9, 0);
//! ```

use holder_mesh::{FontHandle, HolderMeshes, MeshError, MeshResult, Project};
use std::sync::{Arc, Mutex, PoisonError};
use wasm_bindgen::prelude::*;

mod diagnostics;
mod mesh_handle;

pub use diagnostics::{Diagnostic, ErrorKind};
pub use mesh_handle::{Dimensions, HolderMeshHandle};

use diagnostics::to_js_error;

/// Label font shared by every build in this module instance.
static LABEL_FONT: Mutex<Option<Arc<FontHandle>>> = Mutex::new(None);

/// Installs a panic hook that forwards Rust panics to the browser console.
///
/// # Examples
/// ```no_run
/// // In JavaScript: import and call once at startup.
/// // import { init_panic_hook } from "holder-wasm";
/// // init_panic_hook();
/// ```
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Registers the TrueType/OpenType font used for labels.
///
/// The bytes are parsed on the first build that needs a label, so a bad
/// font surfaces as a `ResourceLoad` error from that build.
#[wasm_bindgen]
pub fn set_label_font(bytes: Vec<u8>) {
    set_label_font_internal(bytes);
}

/// Host-only helper behind `set_label_font`.
pub fn set_label_font_internal(bytes: Vec<u8>) {
    let handle = Arc::new(FontHandle::from_bytes(bytes));
    *LABEL_FONT.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
}

fn label_font() -> Option<Arc<FontHandle>> {
    LABEL_FONT
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Builds the main, hollow and positive holder meshes from a project
/// snapshot in the editor's JSON format.
///
/// # Errors
/// Throws a plain `{ kind, message }` object when decoding or synthesis
/// fails.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // const meshes = build_holder_mesh(JSON.stringify(project));
/// // console.log(meshes.main_dimensions().width);
/// ```
#[wasm_bindgen]
pub fn build_holder_mesh(project_json: &str) -> Result<HolderMeshHandle, JsValue> {
    let fonts = label_font();
    build_holder_mesh_internal(project_json, fonts.as_deref())
        .map(HolderMeshHandle::new)
        .map_err(to_js_error)
}

/// Host-only helper that decodes the project and runs the builder.
pub fn build_holder_mesh_internal(
    project_json: &str,
    fonts: Option<&FontHandle>,
) -> MeshResult<HolderMeshes> {
    let project = parse_project(project_json)?;
    holder_mesh::build_holder_mesh(&project, fonts)
}

/// Decodes a project snapshot.
pub fn parse_project(project_json: &str) -> MeshResult<Project> {
    serde_json::from_str(project_json).map_err(|err| MeshError::invalid_project(err.to_string()))
}

/// ASCII STL lines for a flat vertex buffer.
#[wasm_bindgen]
pub fn to_ascii_stl(vertices: &[f32]) -> Result<Vec<String>, JsValue> {
    holder_mesh::to_ascii_stl(vertices).map_err(to_js_error)
}

/// Binary STL bytes for a flat vertex buffer.
#[wasm_bindgen]
pub fn to_binary_stl(vertices: &[f32]) -> Result<Vec<u8>, JsValue> {
    holder_mesh::to_binary_stl(vertices).map_err(to_js_error)
}

/// Binary STL size in bytes for `vertex_count` floats.
#[wasm_bindgen]
pub fn estimate_binary_stl_size_bytes(vertex_count: usize) -> usize {
    holder_mesh::estimate_binary_stl_size_bytes(vertex_count)
}

/// Binary STL size rounded to whole kilobytes.
#[wasm_bindgen]
pub fn estimate_binary_stl_size_kb(vertex_count: usize) -> f64 {
    holder_mesh::estimate_binary_stl_size_kb(vertex_count) as f64
}

#[cfg(test)]
mod tests;
