//! # Configuration Constants
//!
//! Centralized constants for the holder geometry pipeline. Every wall
//! thickness, safety margin, tessellation policy and STL layout value is
//! defined here.
//!
//! ## Categories
//!
//! - **Holder**: Wall, floor and label thicknesses (millimeters)
//! - **Precision**: Floating-point comparison tolerances
//! - **Tessellation**: Cylinder segment policy
//! - **Label**: Font size search parameters
//! - **STL**: Binary layout sizes

use std::fmt;

// =============================================================================
// HOLDER CONSTANTS
// =============================================================================

/// Thickness of the holder floor below the deepest component (mm).
///
/// # Example
///
/// ```rust
/// use config::constants::BOTTOM_THICKNESS;
///
/// let need_height = 4.6;
/// let outer_depth = need_height + BOTTOM_THICKNESS;
/// assert!((outer_depth - 6.6).abs() < 1e-9);
/// ```
pub const BOTTOM_THICKNESS: f64 = 2.0;

/// Thickness of the holder side walls around the PCB cavity (mm).
pub const EDGE_THICKNESS: f64 = 2.0;

/// Safety margin added to every subtracted volume (mm).
///
/// Subtracted brushes are extended by this amount past the face they open
/// through so that no two operands share a coplanar face.
///
/// # Example
///
/// ```rust
/// use config::constants::ROUND_CORRECTION;
///
/// let component_depth = 5.0;
/// let hole_depth = component_depth + ROUND_CORRECTION;
/// assert_eq!(hole_depth, 6.0);
/// ```
pub const ROUND_CORRECTION: f64 = 1.0;

/// Height of the engraved label relief above the front face (mm).
pub const TEXT_THICKNESS: f64 = 1.0;

/// Depth the label solid is sunk into the front wall (mm).
///
/// Must stay below [`EDGE_THICKNESS`] so the label never pierces the cavity.
pub const LABEL_EMBED_DEPTH: f64 = 0.5;

/// Thickness of the plate under the positive (mockup) mesh (mm).
pub const POSITIVE_BASE_THICKNESS: f64 = 2.0;

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Plane classification tolerance used by the BSP boolean kernel.
///
/// Points closer than this to a splitting plane are treated as coplanar.
pub const PLANE_EPSILON: f64 = 1e-5;

/// Minimum absolute signed volume (mm³) for a CSG operand to count as a solid.
pub const MIN_SOLID_VOLUME: f64 = 1e-9;

/// Distance (mm) below which boolean output vertices are merged into one.
///
/// Also the distance at which a vertex counts as lying on an edge when
/// T-junctions are repaired. Matches [`PLANE_EPSILON`] so that points the
/// BSP kernel treated as coplanar are welded the same way.
pub const WELD_TOLERANCE: f64 = 1e-5;

/// Quantization step for grouping coplanar fragments before re-triangulation.
///
/// Applied to both the unit normal and the plane offset. Fragments that land
/// in different buckets are simply not merged.
pub const COPLANAR_TOLERANCE: f64 = 1e-6;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Remaining stack below which BSP recursion grows a fresh segment.
///
/// The `stacker` crate is used to handle deep recursion safely.
pub const STACKER_RED_ZONE_BYTES: usize = 64 * 1024;

/// Bytes of stack space allocated each time BSP recursion grows the stack.
///
/// # Examples
/// ```
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_STACK_SIZE_BYTES > STACKER_RED_ZONE_BYTES);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 1024 * 1024;

// =============================================================================
// TESSELLATION CONSTANTS
// =============================================================================

/// Segments generated per millimeter of cylinder radius.
pub const SEGMENTS_PER_MM: f64 = 8.0;

/// Lower bound on cylinder segments.
pub const MIN_CYLINDER_SEGMENTS: u32 = 16;

/// Upper bound on cylinder segments.
pub const MAX_CYLINDER_SEGMENTS: u32 = 48;

/// Line segments used to flatten one quadratic or cubic glyph curve.
pub const CURVE_FLATTEN_STEPS: u32 = 8;

// =============================================================================
// LABEL CONSTANTS
// =============================================================================

/// Font size the label search starts from.
pub const LABEL_MAX_FONT_SIZE: f32 = 20.0;

/// Smallest font size the label search will try.
pub const LABEL_MIN_FONT_SIZE: f32 = 1.0;

/// Decrement applied between label fitting attempts.
pub const LABEL_FONT_SIZE_STEP: f32 = 1.0;

/// Fraction of panel width / cavity depth the label may occupy.
pub const LABEL_FIT_RATIO: f64 = 0.75;

// =============================================================================
// STL CONSTANTS
// =============================================================================

/// Solid name written into ASCII STL output.
pub const STL_SOLID_NAME: &str = "THT-holder";

/// Size of the binary STL header in bytes.
pub const STL_HEADER_BYTES: usize = 80;

/// Size of the binary STL triangle count field in bytes.
pub const STL_COUNT_BYTES: usize = 4;

/// Size of one binary STL triangle record in bytes.
///
/// 12 bytes normal, 36 bytes vertices, 2 bytes attribute.
pub const STL_TRIANGLE_BYTES: usize = 50;

/// Floats per triangle in a flat vertex buffer (3 vertices × xyz).
pub const FLOATS_PER_TRIANGLE: usize = 9;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the number of segments used to tessellate a cylinder.
///
/// Resolution scales with radius so small holes stay cheap and large holes
/// stay round: `clamp(round(radius * 8), 16, 48)`.
///
/// # Example
///
/// ```rust
/// use config::constants::cylinder_segments;
///
/// assert_eq!(cylinder_segments(0.5), 16);
/// assert_eq!(cylinder_segments(3.0), 24);
/// assert_eq!(cylinder_segments(20.0), 48);
/// ```
pub fn cylinder_segments(radius: f64) -> u32 {
    let raw = (radius * SEGMENTS_PER_MM).round();
    if !raw.is_finite() || raw <= MIN_CYLINDER_SEGMENTS as f64 {
        return MIN_CYLINDER_SEGMENTS;
    }
    (raw as u32).clamp(MIN_CYLINDER_SEGMENTS, MAX_CYLINDER_SEGMENTS)
}

// =============================================================================
// HOLDER CONFIG
// =============================================================================

/// Immutable snapshot of the holder wall parameters.
///
/// The builder reads its thicknesses from this struct so tests can tweak a
/// single value without touching the constants.
///
/// # Examples
/// ```
/// use config::constants::HolderConfig;
/// let config = HolderConfig::default();
/// assert_eq!(config.bottom_thickness, 2.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderConfig {
    /// Floor thickness below the deepest component.
    pub bottom_thickness: f64,
    /// Side wall thickness around the cavity.
    pub edge_thickness: f64,
    /// Margin added to subtracted volumes.
    pub round_correction: f64,
    /// Label relief height.
    pub text_thickness: f64,
    /// Positive mesh plate thickness.
    pub positive_base_thickness: f64,
}

impl HolderConfig {
    /// Builds a configuration, rejecting non-positive thicknesses.
    ///
    /// # Examples
    /// ```
    /// use config::constants::HolderConfig;
    /// let cfg = HolderConfig::new(3.0, 2.0, 1.0, 1.0, 2.0).expect("valid config");
    /// assert_eq!(cfg.bottom_thickness, 3.0);
    /// assert!(HolderConfig::new(0.0, 2.0, 1.0, 1.0, 2.0).is_err());
    /// ```
    pub fn new(
        bottom_thickness: f64,
        edge_thickness: f64,
        round_correction: f64,
        text_thickness: f64,
        positive_base_thickness: f64,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            bottom_thickness,
            edge_thickness,
            round_correction,
            text_thickness,
            positive_base_thickness,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks a configuration that may have been built as a struct literal.
    ///
    /// Every thickness must be positive, and the subtraction margin must stay
    /// inside both floors it is sunk into (leg pillars sink into the holder
    /// floor, component pillars into the positive plate).
    ///
    /// # Examples
    /// ```
    /// use config::constants::HolderConfig;
    /// let sunk = HolderConfig { round_correction: 2.5, ..HolderConfig::default() };
    /// assert!(sunk.validate().is_err());
    /// assert!(HolderConfig::default().validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            ("bottom_thickness", self.bottom_thickness),
            ("edge_thickness", self.edge_thickness),
            ("round_correction", self.round_correction),
            ("text_thickness", self.text_thickness),
            ("positive_base_thickness", self.positive_base_thickness),
        ];
        for (name, value) in values {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ConfigError::NonPositive { name, value });
            }
        }

        let floors = [
            ("bottom_thickness", self.bottom_thickness),
            ("positive_base_thickness", self.positive_base_thickness),
        ];
        for (floor, limit) in floors {
            if self.round_correction >= limit {
                return Err(ConfigError::MarginTooLarge {
                    margin: self.round_correction,
                    floor,
                    limit,
                });
            }
        }
        Ok(())
    }
}

impl Default for HolderConfig {
    fn default() -> Self {
        Self {
            bottom_thickness: BOTTOM_THICKNESS,
            edge_thickness: EDGE_THICKNESS,
            round_correction: ROUND_CORRECTION,
            text_thickness: TEXT_THICKNESS,
            positive_base_thickness: POSITIVE_BASE_THICKNESS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Raised when a thickness is zero, negative or NaN.
    NonPositive {
        /// Field name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// Raised when `round_correction` would reach through a floor.
    MarginTooLarge {
        /// Rejected margin.
        margin: f64,
        /// Field name of the floor it must fit inside.
        floor: &'static str,
        /// Thickness of that floor.
        limit: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive { name, value } => {
                write!(f, "{name} must be positive: {value}")
            }
            ConfigError::MarginTooLarge {
                margin,
                floor,
                limit,
            } => write!(
                f,
                "round_correction ({margin}) must be smaller than {floor} ({limit})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}
