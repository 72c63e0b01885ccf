//! # Holder Pipeline
//!
//! The holder is carved in a fixed order of named stages. Each stage reads
//! the project and the previous solids and replaces them with new ones, so
//! the pipeline can be stopped after any stage and inspected.

use super::dimensions::HolderDimensions;
use crate::error::{MeshError, MeshResult};
use crate::label::{label_solid, FontHandle};
use crate::model::Project;
use crate::ops::{subtract, union};
use crate::overlap::leg_is_blocked;
use crate::primitives::Primitive;
use crate::solid::Solid;
use config::constants::{HolderConfig, LABEL_EMBED_DEPTH, LABEL_FIT_RATIO};
use glam::DVec3;
use std::fmt;

/// Steps of the main/hollow pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    OuterShell,
    CavityPocket,
    EdgeCutouts,
    RectangleHoles,
    CircleHoles,
    Legs,
    Label,
}

impl Stage {
    pub const ALL: [Stage; 7] = [
        Stage::OuterShell,
        Stage::CavityPocket,
        Stage::EdgeCutouts,
        Stage::RectangleHoles,
        Stage::CircleHoles,
        Stage::Legs,
        Stage::Label,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Stage::OuterShell => "outer-shell",
            Stage::CavityPocket => "cavity-pocket",
            Stage::EdgeCutouts => "edge-cutouts",
            Stage::RectangleHoles => "rectangle-holes",
            Stage::CircleHoles => "circle-holes",
            Stage::Legs => "legs",
            Stage::Label => "label",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stage-by-stage builder for the `main` and `hollow` solids.
///
/// # Example
///
/// ```rust
/// use holder_mesh::builder::{HolderPipeline, Stage};
/// use holder_mesh::model::{PanelSettings, Project};
///
/// let project = Project::new(PanelSettings {
///     width: 20.0,
///     height: 20.0,
///     pcb_thickness: 1.6,
///     smd_height: 2.0,
///     print_tolerance: 0.0,
/// });
/// let mut pipeline = HolderPipeline::new(&project, None).unwrap();
/// pipeline.run_through(Stage::CavityPocket).unwrap();
/// assert_eq!(pipeline.completed(), Some(Stage::CavityPocket));
/// assert!(pipeline.main().is_some());
/// ```
#[derive(Debug)]
pub struct HolderPipeline<'a> {
    project: &'a Project,
    fonts: Option<&'a FontHandle>,
    config: HolderConfig,
    dims: HolderDimensions,
    main: Option<Solid>,
    hollow: Option<Solid>,
    hidden_legs_count: usize,
    label_skipped: bool,
    next: usize,
}

impl<'a> HolderPipeline<'a> {
    /// Pipeline with the default wall parameters.
    pub fn new(project: &'a Project, fonts: Option<&'a FontHandle>) -> MeshResult<Self> {
        Self::with_config(project, fonts, HolderConfig::default())
    }

    pub fn with_config(
        project: &'a Project,
        fonts: Option<&'a FontHandle>,
        config: HolderConfig,
    ) -> MeshResult<Self> {
        config.validate()?;
        let dims = HolderDimensions::new(project, &config)?;
        Ok(Self {
            project,
            fonts,
            config,
            dims,
            main: None,
            hollow: None,
            hidden_legs_count: 0,
            label_skipped: false,
            next: 0,
        })
    }

    pub fn dimensions(&self) -> &HolderDimensions {
        &self.dims
    }

    pub fn config(&self) -> &HolderConfig {
        &self.config
    }

    /// Full-depth solid as of the last completed stage.
    pub fn main(&self) -> Option<&Solid> {
        self.main.as_ref()
    }

    /// Shallow solid as of the last completed stage.
    pub fn hollow(&self) -> Option<&Solid> {
        self.hollow.as_ref()
    }

    /// Legs dropped because they collide with a component.
    pub fn hidden_legs_count(&self) -> usize {
        self.hidden_legs_count
    }

    /// True if a label was requested but no font size fit.
    pub fn label_skipped(&self) -> bool {
        self.label_skipped
    }

    /// Last stage that ran.
    pub fn completed(&self) -> Option<Stage> {
        self.next.checked_sub(1).map(|i| Stage::ALL[i])
    }

    /// Runs every pending stage up to and including `last`.
    ///
    /// Stages that already ran are not repeated.
    pub fn run_through(&mut self, last: Stage) -> MeshResult<()> {
        while self.next <= last.index() {
            let stage = Stage::ALL[self.next];
            self.run_stage(stage)?;
            self.next += 1;
            tracing::debug!(
                stage = stage.name(),
                main_triangles = self.main.as_ref().map_or(0, |s| s.local_mesh().triangle_count()),
                hollow_triangles = self.hollow.as_ref().map_or(0, |s| s.local_mesh().triangle_count()),
                "stage complete"
            );
        }
        Ok(())
    }

    /// Consumes the pipeline and returns `(main, hollow)`.
    ///
    /// Fails if the outer shell stage has not run yet.
    pub fn into_solids(self) -> MeshResult<(Solid, Solid)> {
        match (self.main, self.hollow) {
            (Some(main), Some(hollow)) => Ok((main, hollow)),
            _ => Err(MeshError::construction("holder pipeline has not built a shell yet")),
        }
    }

    fn run_stage(&mut self, stage: Stage) -> MeshResult<()> {
        match stage {
            Stage::OuterShell => self.outer_shell(),
            Stage::CavityPocket => self.cavity_pocket(),
            Stage::EdgeCutouts => self.edge_cutouts(),
            Stage::RectangleHoles => self.rectangle_holes(),
            Stage::CircleHoles => self.circle_holes(),
            Stage::Legs => self.legs(),
            Stage::Label => self.label(),
        }
    }

    // =========================================================================
    // STAGES
    // =========================================================================

    fn outer_shell(&mut self) -> MeshResult<()> {
        let d = &self.dims;
        let b = self.config.bottom_thickness;

        let main = Primitive::Box {
            width: d.outer_width,
            height: d.outer_height,
            depth: d.outer_depth,
        }
        .build()?;
        let hollow = Primitive::Box {
            width: d.outer_width,
            height: d.outer_height,
            depth: d.empty_height + b,
        }
        .build()?
        .translated(DVec3::new(0.0, 0.0, d.need_height - d.empty_height));

        self.main = Some(main);
        self.hollow = Some(hollow);
        Ok(())
    }

    /// Base height of the cavity and everything cut into it.
    fn cavity_floor(&self) -> f64 {
        self.config.bottom_thickness + self.dims.need_height - self.dims.empty_height
    }

    fn cavity_pocket(&mut self) -> MeshResult<()> {
        let d = self.dims;
        let pocket = Primitive::Box {
            width: d.adjusted_width,
            height: d.adjusted_height,
            depth: d.empty_height + self.config.round_correction,
        }
        .build()?
        .translated(DVec3::new(0.0, 0.0, self.cavity_floor()));

        self.cut_both(&pocket)
    }

    fn edge_cutouts(&mut self) -> MeshResult<()> {
        let d = self.dims;
        let cutout = Primitive::Box {
            width: d.adjusted_width / 3.0,
            height: d.adjusted_height / 3.0,
            depth: d.empty_height + self.config.round_correction,
        }
        .build()?;
        let z = self.cavity_floor();

        let offsets = [
            (d.adjusted_width / 2.0, 0.0),
            (-d.adjusted_width / 2.0, 0.0),
            (0.0, d.adjusted_height / 2.0),
            (0.0, -d.adjusted_height / 2.0),
        ];
        for (dx, dy) in offsets {
            let brush = cutout.clone().translated(DVec3::new(dx, dy, z));
            self.cut_both(&brush)?;
        }
        Ok(())
    }

    fn rectangle_holes(&mut self) -> MeshResult<()> {
        let project = self.project;
        let tol = project.panel_settings.print_tolerance;
        for rect in &project.rectangles {
            let shape = |depth: f64| Primitive::Box {
                width: rect.width + 2.0 * tol,
                height: rect.height + 2.0 * tol,
                depth,
            };
            self.cut_component(shape, rect.x, rect.y, rect.depth, -rect.rotation)?;
        }
        Ok(())
    }

    fn circle_holes(&mut self) -> MeshResult<()> {
        let project = self.project;
        let tol = project.panel_settings.print_tolerance;
        for circle in &project.circles {
            let shape = |depth: f64| Primitive::cylinder(circle.radius + tol, depth);
            self.cut_component(shape, circle.x, circle.y, circle.depth, 0.0)?;
        }
        Ok(())
    }

    /// Subtracts one component hole from both variants.
    ///
    /// `shape` builds the brush for a given depth; the brush is turned by
    /// `rotation_z` degrees and centered on the component.
    fn cut_component(
        &mut self,
        shape: impl Fn(f64) -> Primitive,
        x: f64,
        y: f64,
        depth: f64,
        rotation_z: f64,
    ) -> MeshResult<()> {
        let d = self.dims;
        let b = self.config.bottom_thickness;
        let rc = self.config.round_correction;
        let center_x = x - d.adjusted_width / 2.0;
        let center_y = d.adjusted_height / 2.0 - y;
        let place = |brush: Solid, z: f64| {
            brush
                .rotated_z(rotation_z)
                .translated(DVec3::new(center_x, center_y, z))
        };

        let hole = place(shape(depth + rc).build()?, b + d.component_height - depth);
        cut(&mut self.main, &hole)?;

        if depth < d.hollow_height {
            // Shallow components go straight through the thin variant
            let hollow_base = d.need_height - d.empty_height;
            let through = place(
                shape(2.0 * d.hollow_height).build()?,
                hollow_base - d.hollow_height / 2.0,
            );
            cut(&mut self.hollow, &through)
        } else {
            cut(&mut self.hollow, &hole)
        }
    }

    fn legs(&mut self) -> MeshResult<()> {
        let d = self.dims;
        let b = self.config.bottom_thickness;
        let rc = self.config.round_correction;
        let project = self.project;
        let smd = project.panel_settings.smd_height;
        let top = b + d.component_height;

        let mut hidden = 0;
        for leg in &project.legs {
            if leg_is_blocked(leg, &project.circles, &project.rectangles) {
                hidden += 1;
                continue;
            }

            let center = DVec3::new(
                leg.x + leg.width / 2.0 - d.adjusted_width / 2.0,
                d.adjusted_height / 2.0 - (leg.y + leg.height / 2.0),
                0.0,
            );
            let pillar = |height: f64| -> MeshResult<Solid> {
                Ok(Primitive::Box {
                    width: leg.width,
                    height: leg.height,
                    depth: height + rc,
                }
                .build()?
                .translated(center + DVec3::new(0.0, 0.0, top - height - rc)))
            };

            join(&mut self.main, &pillar(d.component_height)?)?;
            join(&mut self.hollow, &pillar(smd)?)?;
        }

        if hidden > 0 {
            tracing::debug!(hidden, "legs overlapping components were skipped");
        }
        self.hidden_legs_count = hidden;
        Ok(())
    }

    fn label(&mut self) -> MeshResult<()> {
        let project = self.project;
        let Some(text) = project.label_text() else {
            return Ok(());
        };
        let fonts = self
            .fonts
            .ok_or_else(|| MeshError::resource("a label is set but no label font was provided"))?;
        let font = fonts.font()?;

        let d = self.dims;
        let solid = label_solid(
            font,
            text,
            LABEL_FIT_RATIO * d.adjusted_width,
            LABEL_FIT_RATIO * d.empty_height,
            self.config.text_thickness + LABEL_EMBED_DEPTH,
        )?;

        let Some(solid) = solid else {
            tracing::warn!(label = text, "label does not fit on the front face, skipping");
            self.label_skipped = true;
            return Ok(());
        };

        // Centered on the cavity band of the front wall
        let placed = solid.translated(DVec3::new(
            0.0,
            -d.outer_height / 2.0 + LABEL_EMBED_DEPTH,
            self.cavity_floor() + d.empty_height / 2.0,
        ));
        join(&mut self.main, &placed)
    }

    fn cut_both(&mut self, brush: &Solid) -> MeshResult<()> {
        cut(&mut self.main, brush)?;
        cut(&mut self.hollow, brush)
    }
}

fn cut(target: &mut Option<Solid>, brush: &Solid) -> MeshResult<()> {
    if let Some(solid) = target.as_ref() {
        *target = Some(subtract(solid, brush)?);
    }
    Ok(())
}

fn join(target: &mut Option<Solid>, brush: &Solid) -> MeshResult<()> {
    if let Some(solid) = target.as_ref() {
        *target = Some(union(solid, brush)?);
    }
    Ok(())
}
