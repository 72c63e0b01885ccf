//! Positive (mockup) variant: the PCB as a plate with every component as a
//! pillar of its true depth.

use crate::error::MeshResult;
use crate::model::Project;
use crate::ops::union;
use crate::primitives::Primitive;
use crate::solid::Solid;
use config::constants::HolderConfig;
use glam::DVec3;

/// Builds the positive solid.
///
/// Uses exact component sizes (no print tolerance) and ignores legs.
/// Components with zero depth add nothing.
pub fn build_positive(project: &Project, config: &HolderConfig) -> MeshResult<Solid> {
    config.validate()?;
    let panel = &project.panel_settings;
    let base = config.positive_base_thickness;
    let rc = config.round_correction;

    let mut solid = Primitive::Box {
        width: panel.width,
        height: panel.height,
        depth: base,
    }
    .build()?;

    // Pillars start inside the plate so they never share its top face
    let place = |brush: Solid, x: f64, y: f64, rotation: f64| {
        brush.rotated_z(-rotation).translated(DVec3::new(
            x - panel.width / 2.0,
            panel.height / 2.0 - y,
            base - rc,
        ))
    };

    for rect in project.rectangles.iter().filter(|r| r.depth > 0.0) {
        let pillar = Primitive::Box {
            width: rect.width,
            height: rect.height,
            depth: rect.depth + rc,
        }
        .build()?;
        solid = union(&solid, &place(pillar, rect.x, rect.y, rect.rotation))?;
    }

    for circle in project.circles.iter().filter(|c| c.depth > 0.0) {
        let pillar = Primitive::cylinder(circle.radius, circle.depth + rc).build()?;
        solid = union(&solid, &place(pillar, circle.x, circle.y, 0.0))?;
    }

    Ok(solid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CircleComponent, PanelSettings, RectangleComponent};
    use approx::assert_relative_eq;

    fn project() -> Project {
        Project::new(PanelSettings {
            width: 40.0,
            height: 30.0,
            pcb_thickness: 1.6,
            smd_height: 3.0,
            print_tolerance: 0.5,
        })
    }

    #[test]
    fn test_plain_plate() {
        let solid = build_positive(&project(), &HolderConfig::default()).unwrap();
        assert_relative_eq!(solid.volume(), 40.0 * 30.0 * 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_pillars_use_exact_sizes() {
        let mut p = project();
        p.rectangles.push(RectangleComponent {
            x: 10.0,
            y: 10.0,
            width: 4.0,
            height: 2.0,
            depth: 5.0,
            rotation: 0.0,
        });
        p.circles.push(CircleComponent {
            x: 30.0,
            y: 20.0,
            radius: 1.0,
            depth: 0.0,
        });

        let solid = build_positive(&p, &HolderConfig::default()).unwrap();
        // Tolerance is ignored and the zero-depth circle adds nothing
        assert_relative_eq!(solid.volume(), 2400.0 + 4.0 * 2.0 * 5.0, epsilon = 1e-6);

        let (min, max) = solid.bounding_box();
        assert_relative_eq!(max.z, 7.0, epsilon = 1e-9);
        assert_relative_eq!(min.x, -20.0, epsilon = 1e-9);
    }
}
