//! # Primitives
//!
//! Brush generation for the holder pipeline (box, cylinder, extruded text).
//!
//! Every primitive follows the same local convention: centered on X/Y, base
//! on z = 0, extruded along +Z. Callers place brushes with
//! [`Solid::translated`](crate::Solid::translated) and friends.

pub mod cube;
pub mod cylinder;
pub mod text;

pub use cube::create_box;
pub use cylinder::create_cylinder;
pub use text::{create_text, TextOutline, TextShape};

use crate::error::MeshResult;
use crate::solid::Solid;

/// Brush description, built into a [`Solid`] with [`Primitive::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Rectangular solid.
    Box { width: f64, height: f64, depth: f64 },
    /// Capped cylinder.
    Cylinder {
        radius: f64,
        height: f64,
        segments: u32,
    },
    /// Extruded planar outline.
    Text { outline: TextOutline, thickness: f64 },
}

impl Primitive {
    /// Cylinder with the radius-dependent segment count.
    ///
    /// # Example
    ///
    /// ```rust
    /// use holder_mesh::primitives::Primitive;
    ///
    /// let Primitive::Cylinder { segments, .. } = Primitive::cylinder(3.0, 1.0) else {
    ///     unreachable!()
    /// };
    /// assert_eq!(segments, 24);
    /// ```
    pub fn cylinder(radius: f64, height: f64) -> Self {
        Self::Cylinder {
            radius,
            height,
            segments: config::constants::cylinder_segments(radius),
        }
    }

    /// Short label used in logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Box { .. } => "box",
            Self::Cylinder { .. } => "cylinder",
            Self::Text { .. } => "text",
        }
    }

    /// Generates the brush at the local origin.
    pub fn build(&self) -> MeshResult<Solid> {
        let mesh = match self {
            Self::Box {
                width,
                height,
                depth,
            } => create_box(*width, *height, *depth)?,
            Self::Cylinder {
                radius,
                height,
                segments,
            } => create_cylinder(*radius, *height, *segments)?,
            Self::Text { outline, thickness } => create_text(outline, *thickness)?,
        };
        Ok(Solid::from_mesh(mesh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;

    #[test]
    fn test_build_dispatches_by_variant() {
        let cube = Primitive::Box {
            width: 1.0,
            height: 1.0,
            depth: 1.0,
        }
        .build()
        .unwrap();
        assert_eq!(cube.local_mesh().triangle_count(), 12);

        let cyl = Primitive::cylinder(1.0, 1.0).build().unwrap();
        assert_eq!(cyl.local_mesh().triangle_count(), 4 * 16);
    }

    #[test]
    fn test_build_reports_construction_error() {
        let err = Primitive::Box {
            width: 1.0,
            height: 0.0,
            depth: 1.0,
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, MeshError::GeometryConstruction { .. }));

        let err = Primitive::Text {
            outline: TextOutline::default(),
            thickness: 1.0,
        }
        .build()
        .unwrap_err();
        assert!(matches!(err, MeshError::GeometryConstruction { .. }));
    }

    #[test]
    fn test_kind() {
        assert_eq!(Primitive::cylinder(1.0, 1.0).kind(), "cylinder");
    }
}
