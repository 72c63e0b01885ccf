//! # Config Crate
//!
//! Centralized configuration constants for the THT holder pipeline.
//! Wall thicknesses, CSG safety margins, tessellation policy and STL layout
//! values are defined here so the geometry and export crates agree on them.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{BOTTOM_THICKNESS, EDGE_THICKNESS, cylinder_segments};
//!
//! let panel_width = 100.0;
//! let outer_width = panel_width + 2.0 * EDGE_THICKNESS;
//! assert_eq!(outer_width, 104.0);
//! assert!(BOTTOM_THICKNESS > 0.0);
//! assert_eq!(cylinder_segments(1.0), 16);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Browser-Safe**: No platform-specific values
//! - **Millimeters**: Every length is in mm

pub mod constants;
