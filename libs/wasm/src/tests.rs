//! Tests for the WASM-facing helpers.

use super::*;

const PROJECT: &str = r#"{
    "image": "",
    "filename": "board.png",
    "panelSettings": { "width": 100, "height": 100, "pcbThickness": 1.6, "smdHeight": 3, "printTolerance": 0 },
    "circles": [],
    "rectangles": [],
    "legs": []
}"#;

#[test]
fn build_from_editor_json() {
    let meshes = build_holder_mesh_internal(PROJECT, None).expect("build succeeds");
    assert!((meshes.main.dimensions.width - 104.0).abs() < 1e-9);
    assert!((meshes.main.dimensions.depth - 6.6).abs() < 1e-9);
    assert_eq!(meshes.hidden_legs_count, 0);

    let handle = HolderMeshHandle::new(meshes);
    assert_eq!(handle.hidden_legs_count(), 0);
    assert!(!handle.label_skipped());
    assert_eq!(handle.main_dimensions().width, handle.main().dimensions.width);
}

#[test]
fn malformed_json_is_invalid_project() {
    let err = build_holder_mesh_internal("{ not json", None).unwrap_err();
    assert!(matches!(err, MeshError::InvalidProject { .. }));
    assert_eq!(ErrorKind::from(&err), ErrorKind::InvalidProject);
}

#[test]
fn oversized_stl_has_own_kind() {
    let diagnostic = Diagnostic::from(MeshError::StlTooLarge { triangles: usize::MAX });
    assert_eq!(diagnostic.kind(), ErrorKind::StlTooLarge);
    assert!(diagnostic.message().contains(&usize::MAX.to_string()));
}

#[test]
fn diagnostic_keeps_message() {
    let diagnostic = Diagnostic::from(MeshError::MalformedVertexBuffer { len: 4 });
    assert_eq!(diagnostic.kind(), ErrorKind::MalformedVertexBuffer);
    assert!(diagnostic.message().contains('4'));
}

#[test]
fn label_without_registered_font_fails() {
    let json = PROJECT.replace("\"legs\": []", "\"legs\": [], \"label\": \"X\"");
    let err = build_holder_mesh_internal(&json, None).unwrap_err();
    assert!(matches!(err, MeshError::ResourceLoad { .. }));
}

#[test]
fn registered_font_is_shared() {
    set_label_font_internal(vec![1, 2, 3]);
    let font = label_font().expect("font registered");
    // Garbage bytes are accepted here and rejected on first use
    assert!(font.font().is_err());
}

#[test]
fn stl_helpers_match_core() {
    let triangle = [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let lines = holder_mesh::to_ascii_stl(&triangle).unwrap();
    assert_eq!(lines[1], "facet normal 0 0 1");
    assert_eq!(estimate_binary_stl_size_bytes(9), 134);
    assert_eq!(estimate_binary_stl_size_kb(9 * 1000), 49.0);
}
