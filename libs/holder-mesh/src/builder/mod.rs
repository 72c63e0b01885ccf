//! # Holder Mesh Builder
//!
//! Turns a [`Project`] into the three holder variants:
//!
//! - **main**: full-depth holder sized to the deepest component
//! - **hollow**: shallow holder covering only the PCB and SMD clearance
//! - **positive**: the board as a plate with component pillars
//!
//! `main` and `hollow` are carved together by [`HolderPipeline`]; the
//! positive variant is built independently.

mod dimensions;
mod positive;
mod stages;


pub use dimensions::HolderDimensions;
pub use positive::build_positive;
pub use stages::{HolderPipeline, Stage};

use crate::error::MeshResult;
use crate::export::{flatten, MeshOutput};
use crate::label::FontHandle;
use crate::model::Project;
use config::constants::HolderConfig;
use serde::Serialize;

/// Result of one holder build.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolderMeshes {
    pub main: MeshOutput,
    pub hollow: MeshOutput,
    pub positive: MeshOutput,
    /// Legs left out because they overlap a component.
    pub hidden_legs_count: usize,
    /// A label was requested but did not fit.
    pub label_skipped: bool,
}

/// Builds all holder variants with the default wall parameters.
///
/// `fonts` is only touched when the project has a label.
///
/// # Example
///
/// ```rust
/// use holder_mesh::builder::build_holder_mesh;
/// use holder_mesh::model::{PanelSettings, Project};
///
/// let project = Project::new(PanelSettings {
///     width: 30.0,
///     height: 20.0,
///     pcb_thickness: 1.6,
///     smd_height: 3.0,
///     print_tolerance: 0.0,
/// });
/// let meshes = build_holder_mesh(&project, None).unwrap();
/// assert!((meshes.main.dimensions.width - 34.0).abs() < 1e-6);
/// assert_eq!(meshes.main.vertex_array.len() % 9, 0);
/// ```
pub fn build_holder_mesh(project: &Project, fonts: Option<&FontHandle>) -> MeshResult<HolderMeshes> {
    build_holder_mesh_with_config(project, fonts, HolderConfig::default())
}

/// Builds all holder variants with explicit wall parameters.
///
/// `config` is validated first, so a struct literal with impossible
/// thicknesses fails with [`MeshError::InvalidConfig`](crate::error::MeshError::InvalidConfig).
pub fn build_holder_mesh_with_config(
    project: &Project,
    fonts: Option<&FontHandle>,
    config: HolderConfig,
) -> MeshResult<HolderMeshes> {
    let _span = tracing::info_span!(
        "build_holder_mesh",
        circles = project.circles.len(),
        rectangles = project.rectangles.len(),
        legs = project.legs.len()
    )
    .entered();

    let mut pipeline = HolderPipeline::with_config(project, fonts, config)?;
    pipeline.run_through(Stage::Label)?;
    let hidden_legs_count = pipeline.hidden_legs_count();
    let label_skipped = pipeline.label_skipped();
    let (main, hollow) = pipeline.into_solids()?;

    let positive = build_positive(project, &config)?;

    let meshes = HolderMeshes {
        main: flatten(&main),
        hollow: flatten(&hollow),
        positive: flatten(&positive),
        hidden_legs_count,
        label_skipped,
    };

    tracing::info!(
        main_triangles = meshes.main.triangle_count(),
        hollow_triangles = meshes.hollow.triangle_count(),
        positive_triangles = meshes.positive.triangle_count(),
        hidden_legs_count,
        label_skipped,
        "holder meshes built"
    );

    Ok(meshes)
}
