//! WASM-compatible error reporting.
//!
//! Converts [`MeshError`] into values JavaScript can inspect.

use holder_mesh::MeshError;
use wasm_bindgen::prelude::*;

/// Error category for JavaScript.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    GeometryConstruction,
    CsgEvaluation,
    ResourceLoad,
    MalformedVertexBuffer,
    InvalidProject,
    InvalidConfig,
    StlTooLarge,
    Io,
}

impl From<&MeshError> for ErrorKind {
    fn from(err: &MeshError) -> Self {
        match err {
            MeshError::GeometryConstruction { .. } => ErrorKind::GeometryConstruction,
            MeshError::CsgEvaluation { .. } => ErrorKind::CsgEvaluation,
            MeshError::ResourceLoad { .. } => ErrorKind::ResourceLoad,
            MeshError::MalformedVertexBuffer { .. } => ErrorKind::MalformedVertexBuffer,
            MeshError::InvalidProject { .. } => ErrorKind::InvalidProject,
            MeshError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            MeshError::StlTooLarge { .. } => ErrorKind::StlTooLarge,
            MeshError::Io(_) => ErrorKind::Io,
        }
    }
}

/// A build or export failure.
///
/// # Examples
/// ```no_run
/// // In JavaScript:
/// // try { build_holder_mesh(json); }
/// // catch (e) { console.log(e.kind, e.message); }
/// ```
#[wasm_bindgen]
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: ErrorKind,
    message: String,
}

#[wasm_bindgen]
impl Diagnostic {
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> String {
        self.message.clone()
    }

    /// Converts this diagnostic to a plain JavaScript object.
    ///
    /// Plain objects survive `postMessage` between the worker and the main
    /// thread; wasm-bindgen wrappers do not.
    pub fn to_js_object(&self) -> JsValue {
        use js_sys::{Object, Reflect};

        let obj = Object::new();
        // Setting a property on a fresh plain object cannot fail.
        let _ = Reflect::set(&obj, &JsValue::from_str("kind"), &JsValue::from(self.kind as i32));
        let _ = Reflect::set(&obj, &JsValue::from_str("message"), &JsValue::from_str(&self.message));
        JsValue::from(obj)
    }
}

impl From<MeshError> for Diagnostic {
    fn from(err: MeshError) -> Self {
        Self {
            kind: ErrorKind::from(&err),
            message: err.to_string(),
        }
    }
}

/// Maps a Rust error into the value thrown to JavaScript.
pub(crate) fn to_js_error(err: MeshError) -> JsValue {
    Diagnostic::from(err).to_js_object()
}
