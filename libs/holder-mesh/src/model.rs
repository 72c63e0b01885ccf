//! # Project Model
//!
//! Plain data consumed by the holder pipeline. Field names follow the
//! editor's JSON (camelCase); editor-only fields such as ids, fill or
//! opacity are ignored on input.

use serde::{Deserialize, Serialize};

/// Physical panel and printer compensation settings (millimeters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    pub width: f64,
    pub height: f64,
    pub pcb_thickness: f64,
    pub smd_height: f64,
    /// Enlarges holes and the PCB cavity to absorb printer inaccuracy.
    #[serde(default)]
    pub print_tolerance: f64,
}

impl PanelSettings {
    /// Minimum cavity depth: board plus bottom-side clearance.
    pub fn empty_height(&self) -> f64 {
        self.pcb_thickness + self.smd_height
    }
}

/// Round component footprint, centered at (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleComponent {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    /// Protrusion below the PCB.
    pub depth: f64,
}

/// Rectangular component footprint, centered at (x, y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectangleComponent {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub depth: f64,
    /// Clockwise degrees about the center.
    #[serde(default)]
    pub rotation: f64,
}

/// Axis-aligned support leg; (x, y) is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "LegWire")]
pub struct LegPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegWire {
    Flat {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    // Older project files keep the canvas shape config nested.
    #[serde(rename_all = "camelCase")]
    Canvas { konva_config: LegRect },
}

#[derive(Deserialize)]
struct LegRect {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl From<LegWire> for LegPlacement {
    fn from(wire: LegWire) -> Self {
        match wire {
            LegWire::Flat {
                x,
                y,
                width,
                height,
            }
            | LegWire::Canvas {
                konva_config:
                    LegRect {
                        x,
                        y,
                        width,
                        height,
                    },
            } => Self {
                x,
                y,
                width,
                height,
            },
        }
    }
}

/// Everything the builder needs for one holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub panel_settings: PanelSettings,
    #[serde(default)]
    pub circles: Vec<CircleComponent>,
    #[serde(default)]
    pub rectangles: Vec<RectangleComponent>,
    #[serde(default)]
    pub legs: Vec<LegPlacement>,
    /// Text engraved on the front face. Empty or absent means no label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Project {
    /// Project with no components, legs or label.
    pub fn new(panel_settings: PanelSettings) -> Self {
        Self {
            panel_settings,
            circles: Vec::new(),
            rectangles: Vec::new(),
            legs: Vec::new(),
            label: None,
        }
    }

    /// Label text if one is set and not blank.
    pub fn label_text(&self) -> Option<&str> {
        self.label
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}
