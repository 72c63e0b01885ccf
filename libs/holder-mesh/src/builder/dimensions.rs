//! Derived holder measurements.

use crate::error::{MeshError, MeshResult};
use crate::model::Project;
use config::constants::HolderConfig;

/// Heights and extents every stage works from (millimeters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderDimensions {
    /// PCB width plus tolerance on both sides.
    pub adjusted_width: f64,
    /// PCB height plus tolerance on both sides.
    pub adjusted_height: f64,
    /// `pcbThickness + smdHeight`: minimum cavity depth.
    pub empty_height: f64,
    /// Deepest component or SMD clearance, whichever is larger.
    pub component_height: f64,
    /// `pcbThickness + component_height`.
    pub need_height: f64,
    /// Total height of the shallow variant.
    pub hollow_height: f64,
    pub outer_width: f64,
    pub outer_height: f64,
    /// Total height of the full-depth variant.
    pub outer_depth: f64,
}

impl HolderDimensions {
    /// Derives the dimensions, rejecting panels that cannot form a cavity.
    pub fn new(project: &Project, config: &HolderConfig) -> MeshResult<Self> {
        let panel = &project.panel_settings;
        let fields = [
            ("width", panel.width),
            ("height", panel.height),
            ("pcbThickness", panel.pcb_thickness),
            ("smdHeight", panel.smd_height),
            ("printTolerance", panel.print_tolerance),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(MeshError::construction(format!(
                    "Panel {name} must be a non-negative number: {value}"
                )));
            }
        }
        if panel.width == 0.0 || panel.height == 0.0 {
            return Err(MeshError::construction(format!(
                "Panel size must be positive: {} x {}",
                panel.width, panel.height
            )));
        }

        let component_height = project
            .rectangles
            .iter()
            .map(|r| r.depth)
            .chain(project.circles.iter().map(|c| c.depth))
            .fold(panel.smd_height, f64::max);

        let adjusted_width = panel.width + 2.0 * panel.print_tolerance;
        let adjusted_height = panel.height + 2.0 * panel.print_tolerance;
        let empty_height = panel.empty_height();
        let need_height = panel.pcb_thickness + component_height;

        Ok(Self {
            adjusted_width,
            adjusted_height,
            empty_height,
            component_height,
            need_height,
            hollow_height: empty_height + config.bottom_thickness,
            outer_width: adjusted_width + 2.0 * config.edge_thickness,
            outer_height: adjusted_height + 2.0 * config.edge_thickness,
            outer_depth: need_height + config.bottom_thickness,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CircleComponent, PanelSettings, RectangleComponent};
    use approx::assert_relative_eq;

    fn panel() -> PanelSettings {
        PanelSettings {
            width: 100.0,
            height: 50.0,
            pcb_thickness: 1.6,
            smd_height: 3.0,
            print_tolerance: 0.2,
        }
    }

    #[test]
    fn test_dimensions_without_components() {
        let dims = HolderDimensions::new(&Project::new(panel()), &HolderConfig::default()).unwrap();
        assert_relative_eq!(dims.adjusted_width, 100.4, epsilon = 1e-12);
        assert_relative_eq!(dims.outer_height, 54.4, epsilon = 1e-12);
        assert_relative_eq!(dims.component_height, 3.0);
        assert_relative_eq!(dims.need_height, 4.6, epsilon = 1e-12);
        assert_relative_eq!(dims.outer_depth, 6.6, epsilon = 1e-12);
        assert_relative_eq!(dims.hollow_height, 6.6, epsilon = 1e-12);
    }

    #[test]
    fn test_deepest_component_sets_height() {
        let mut project = Project::new(panel());
        project.circles.push(CircleComponent {
            x: 1.0,
            y: 1.0,
            radius: 1.0,
            depth: 8.0,
        });
        project.rectangles.push(RectangleComponent {
            x: 1.0,
            y: 1.0,
            width: 1.0,
            height: 1.0,
            depth: 5.0,
            rotation: 0.0,
        });
        let dims = HolderDimensions::new(&project, &HolderConfig::default()).unwrap();
        assert_relative_eq!(dims.component_height, 8.0);
        assert_relative_eq!(dims.outer_depth, 11.6, epsilon = 1e-12);
        // The shallow variant ignores component depth
        assert_relative_eq!(dims.hollow_height, 6.6, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_panel() {
        let mut p = panel();
        p.width = 0.0;
        assert!(HolderDimensions::new(&Project::new(p), &HolderConfig::default()).is_err());
        p.width = 10.0;
        p.smd_height = f64::NAN;
        assert!(HolderDimensions::new(&Project::new(p), &HolderConfig::default()).is_err());
    }
}
