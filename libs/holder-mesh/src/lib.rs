//! # Holder Mesh
//!
//! Solid synthesis and STL export for 3D-printable THT PCB holders.
//!
//! ## Architecture
//!
//! ```text
//! Project → HolderPipeline (primitives + CSG + overlap) → Solid → MeshOutput → STL
//! ```
//!
//! ## Modules
//!
//! - [`primitives`]: box, cylinder and extruded-text brushes
//! - [`ops`]: BSP union and subtraction
//! - [`overlap`]: leg vs. component footprint tests
//! - [`label`]: font handle and front-face text
//! - [`builder`]: main / hollow / positive holder variants
//! - [`export`]: vertex buffers, ASCII and binary STL
//!
//! ## Example
//!
//! ```rust
//! use holder_mesh::{build_holder_mesh, to_binary_stl, PanelSettings, Project};
//!
//! let project = Project::new(PanelSettings {
//!     width: 40.0,
//!     height: 25.0,
//!     pcb_thickness: 1.6,
//!     smd_height: 2.0,
//!     print_tolerance: 0.2,
//! });
//! let meshes = build_holder_mesh(&project, None).unwrap();
//! let stl = to_binary_stl(&meshes.main.vertex_array).unwrap();
//! assert_eq!(stl.len(), 84 + 50 * meshes.main.triangle_count());
//! ```

pub mod builder;
pub mod error;
pub mod export;
pub mod label;
pub mod mesh;
pub mod model;
pub mod ops;
pub mod overlap;
pub mod primitives;
pub mod solid;

pub use builder::{build_holder_mesh, build_holder_mesh_with_config, HolderMeshes, HolderPipeline, Stage};
pub use error::{MeshError, MeshResult};
pub use export::{
    estimate_binary_stl_size_bytes, estimate_binary_stl_size_kb, flatten, to_ascii_stl,
    to_binary_stl, write_binary_stl, MeshDimensions, MeshOutput,
};
pub use label::FontHandle;
pub use mesh::Mesh;
pub use model::{CircleComponent, LegPlacement, PanelSettings, Project, RectangleComponent};
pub use solid::Solid;
