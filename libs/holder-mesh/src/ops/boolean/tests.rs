//! # Boolean Operation Tests
//!
//! Volume-based checks for union and subtraction.

use super::*;
use crate::primitives::Primitive;
use approx::assert_relative_eq;
use glam::DVec3;
use std::f64::consts::PI;

/// Box with base-centered local frame, moved to `pos`.
fn box_at(pos: DVec3, size: f64) -> Solid {
    Primitive::Box {
        width: size,
        height: size,
        depth: size,
    }
    .build()
    .unwrap()
    .translated(pos)
}

fn triangle_only() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_vertex(DVec3::ZERO);
    mesh.add_vertex(DVec3::X);
    mesh.add_vertex(DVec3::Y);
    mesh.add_triangle(0, 1, 2);
    mesh
}

// =============================================================================
// UNION TESTS
// =============================================================================

#[test]
fn test_union_disjoint_adds_volume() {
    let a = box_at(DVec3::new(-5.0, 0.0, 0.0), 2.0);
    let b = box_at(DVec3::new(5.0, 0.0, 0.0), 2.0);

    let result = union(&a, &b).unwrap();
    assert_relative_eq!(result.volume(), 16.0, epsilon = 1e-6);
}

#[test]
fn test_union_overlapping() {
    let a = box_at(DVec3::ZERO, 2.0);
    let b = box_at(DVec3::new(1.0, 0.5, 0.5), 2.0);

    // Overlap is 1.0 x 1.5 x 1.5
    let result = union(&a, &b).unwrap();
    assert_relative_eq!(result.volume(), 16.0 - 2.25, epsilon = 1e-6);

    let (min, max) = result.bounding_box();
    assert_relative_eq!(min.x, -1.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 2.0, epsilon = 1e-9);
    assert_relative_eq!(max.z, 2.5, epsilon = 1e-9);
}

#[test]
fn test_union_contained_keeps_outer() {
    let outer = box_at(DVec3::ZERO, 4.0);
    let inner = box_at(DVec3::new(0.0, 0.0, 1.0), 1.0);
    let result = union(&outer, &inner).unwrap();
    assert_relative_eq!(result.volume(), 64.0, epsilon = 1e-6);
}

#[test]
fn test_union_empty_operand_fails() {
    let a = box_at(DVec3::ZERO, 1.0).into_world_mesh();
    let err = union_meshes(&a, &Mesh::new()).unwrap_err();
    assert!(matches!(err, MeshError::CsgEvaluation { operation: "union", .. }));
}

// =============================================================================
// SUBTRACTION TESTS
// =============================================================================

#[test]
fn test_subtract_overlapping() {
    let a = box_at(DVec3::ZERO, 2.0);
    let b = box_at(DVec3::new(1.0, 0.5, 0.5), 2.0);

    let result = subtract(&a, &b).unwrap();
    assert_relative_eq!(result.volume(), 8.0 - 2.25, epsilon = 1e-6);
}

#[test]
fn test_subtract_through_hole() {
    let plate = Primitive::Box {
        width: 10.0,
        height: 10.0,
        depth: 2.0,
    }
    .build()
    .unwrap();
    let drill = Primitive::Cylinder {
        radius: 2.0,
        height: 4.0,
        segments: 16,
    }
    .build()
    .unwrap()
    .translated(DVec3::new(0.0, 0.0, -1.0));

    let result = subtract(&plate, &drill).unwrap();
    let disc = 0.5 * 16.0 * 4.0 * (2.0 * PI / 16.0).sin();
    assert_relative_eq!(result.volume(), 200.0 - 2.0 * disc, epsilon = 1e-6);

    let mesh = result.world_mesh();
    assert!(mesh.validate());
    assert_eq!(mesh.open_edge_count(), 0);
    // Two holed faces, four sides and the bore
    assert!(mesh.triangle_count() <= 100, "{} triangles", mesh.triangle_count());
}

#[test]
fn test_subtract_disjoint_is_identity_in_volume() {
    let a = box_at(DVec3::ZERO, 2.0);
    let b = box_at(DVec3::new(10.0, 0.0, 0.0), 2.0);
    let result = subtract(&a, &b).unwrap();
    assert_relative_eq!(result.volume(), a.volume(), epsilon = 1e-9);
}

#[test]
fn test_subtract_is_monotonic() {
    let mut solid = box_at(DVec3::ZERO, 10.0);
    let mut previous = solid.volume();
    for offset in [-3.0, 0.0, 3.0] {
        let hole = Primitive::cylinder(1.0, 12.0)
            .build()
            .unwrap()
            .translated(DVec3::new(offset, offset, -1.0));
        solid = subtract(&solid, &hole).unwrap();
        let volume = solid.volume();
        assert!(volume < previous);
        previous = volume;
    }
}

#[test]
fn test_subtract_zero_volume_operand_fails() {
    let a = box_at(DVec3::ZERO, 1.0).into_world_mesh();
    let err = subtract_meshes(&a, &triangle_only()).unwrap_err();
    assert!(err.to_string().contains("zero volume"));
}

#[test]
fn test_subtract_non_finite_operand_fails() {
    let a = box_at(DVec3::ZERO, 1.0).into_world_mesh();
    let b = a.transformed(&glam::DMat4::from_translation(DVec3::new(f64::NAN, 0.0, 0.0)));
    assert!(subtract_meshes(&a, &b).is_err());
}

#[test]
fn test_operands_are_not_modified() {
    let a = box_at(DVec3::ZERO, 2.0);
    let b = box_at(DVec3::new(1.0, 0.5, 0.5), 2.0);
    let (a_before, b_before) = (a.clone(), b.clone());
    let _ = subtract(&a, &b).unwrap();
    let _ = union(&a, &b).unwrap();
    assert_eq!(a, a_before);
    assert_eq!(b, b_before);
}

#[test]
fn test_sequential_application_stays_closed() {
    let shell = box_at(DVec3::ZERO, 10.0);
    let pocket = box_at(DVec3::new(0.0, 0.0, 2.0), 6.0).translated(DVec3::new(0.0, 0.0, 3.0));
    // Half buried in the pocket floor
    let leg = box_at(DVec3::new(0.0, 0.0, 4.5), 1.0);

    let cut = subtract(&shell, &pocket).unwrap();
    let filled = union(&cut, &leg).unwrap();

    // 1000 - 6*6*5 (pocket clipped at the top) + exposed half of the leg
    assert_relative_eq!(filled.volume(), 1000.0 - 180.0 + 0.5, epsilon = 1e-6);
    assert_eq!(cut.world_mesh().open_edge_count(), 0);
    assert_eq!(filled.world_mesh().open_edge_count(), 0);
}

// =============================================================================
// OUTPUT TOPOLOGY
// =============================================================================

#[test]
fn test_results_are_closed() {
    let a = box_at(DVec3::ZERO, 2.0);
    let b = box_at(DVec3::new(1.0, 0.5, 0.5), 2.0);
    for result in [union(&a, &b).unwrap(), subtract(&a, &b).unwrap()] {
        let mesh = result.world_mesh();
        assert!(mesh.validate());
        assert_eq!(mesh.open_edge_count(), 0);
    }
}

#[test]
fn test_coplanar_fragments_are_merged() {
    let mut plate = Primitive::Box {
        width: 40.0,
        height: 40.0,
        depth: 2.0,
    }
    .build()
    .unwrap();
    let start = plate.world_mesh().triangle_count();

    // Each pocket adds a square hole to the bottom face plus its own walls
    for i in 0..6 {
        let pocket = box_at(DVec3::new(-15.0 + 6.0 * i as f64, 0.0, -1.0), 2.0);
        plate = subtract(&plate, &pocket).unwrap();
    }
    let mesh = plate.world_mesh();
    assert_eq!(mesh.open_edge_count(), 0);
    assert!(
        mesh.triangle_count() <= start + 6 * 24,
        "{} triangles",
        mesh.triangle_count()
    );
    assert_relative_eq!(plate.volume(), 3200.0 - 6.0 * 4.0, epsilon = 1e-6);
}
