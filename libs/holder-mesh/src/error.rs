//! # Mesh Errors
//!
//! Error types for holder synthesis and STL export.
//!
//! ## Error Policy
//!
//! - No fallback meshes: a failed build is always a visible failure
//! - Partial builds are never returned
//! - Errors carry enough context to point at the offending stage or input

use config::constants::ConfigError;
use thiserror::Error;

/// Errors that can occur while building or exporting a holder mesh.
#[derive(Debug, Error)]
pub enum MeshError {
    /// A primitive was requested with invalid parameters
    #[error("Geometry construction failed: {message}")]
    GeometryConstruction { message: String },

    /// A boolean operation could not produce a valid solid
    #[error("CSG {operation} failed: {message}")]
    CsgEvaluation {
        operation: &'static str,
        message: String,
    },

    /// The label font could not be loaded or parsed
    #[error("Resource load failed: {message}")]
    ResourceLoad { message: String },

    /// A flat vertex buffer does not hold whole triangles
    #[error("Malformed vertex buffer: length {len} is not a multiple of 9")]
    MalformedVertexBuffer { len: usize },

    /// The mesh has more triangles than the binary STL count field can hold
    #[error("STL export failed: {triangles} triangles exceed the 32-bit triangle count")]
    StlTooLarge { triangles: usize },

    /// Wall parameters that cannot produce a printable holder
    #[error("Invalid holder configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The project snapshot could not be decoded
    #[error("Invalid project: {message}")]
    InvalidProject { message: String },

    /// Writing exported data failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Creates a geometry construction error.
    pub fn construction(message: impl Into<String>) -> Self {
        Self::GeometryConstruction {
            message: message.into(),
        }
    }

    /// Creates a CSG evaluation error for the named operation.
    pub fn csg(operation: &'static str, message: impl Into<String>) -> Self {
        Self::CsgEvaluation {
            operation,
            message: message.into(),
        }
    }

    /// Creates a resource load error.
    pub fn resource(message: impl Into<String>) -> Self {
        Self::ResourceLoad {
            message: message.into(),
        }
    }

    /// Creates an invalid project error.
    pub fn invalid_project(message: impl Into<String>) -> Self {
        Self::InvalidProject {
            message: message.into(),
        }
    }
}

/// Result type alias for holder mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MeshError::csg("subtraction", "operand has zero volume");
        assert!(err.to_string().contains("subtraction"));
        assert!(err.to_string().contains("zero volume"));

        let err = MeshError::MalformedVertexBuffer { len: 10 };
        assert!(err.to_string().contains("10"));

        let err = MeshError::from(ConfigError::NonPositive {
            name: "edge_thickness",
            value: 0.0,
        });
        assert!(matches!(err, MeshError::InvalidConfig(_)));
        assert!(err.to_string().contains("edge_thickness"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshError>();
    }
}
