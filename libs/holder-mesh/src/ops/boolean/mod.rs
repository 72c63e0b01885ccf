//! # Boolean Operations (CSG)
//!
//! Union and subtraction of solids using BSP trees.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine
//! - Subtraction: A.invert(); A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine; invert
//!
//! ## Contract
//!
//! - Both operands must be closed solids with non-zero volume
//! - Results are returned as new solids; operands are never modified
//! - Non-finite output or a union that loses all geometry is an error
//!
//! ## Example
//!
//! ```rust
//! use holder_mesh::ops::boolean::subtract;
//! use holder_mesh::primitives::Primitive;
//! use glam::DVec3;
//!
//! let block = Primitive::Box { width: 10.0, height: 10.0, depth: 2.0 }.build().unwrap();
//! let hole = Primitive::cylinder(2.0, 4.0).build().unwrap().translated(DVec3::new(0.0, 0.0, -1.0));
//! let drilled = subtract(&block, &hole).unwrap();
//! assert!(drilled.volume() < block.volume());
//! ```

mod bsp;
mod junction;
mod merge;
mod plane;
mod polygon;
mod spatial;

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use crate::solid::Solid;
use bsp::BspNode;
use config::constants::{MIN_SOLID_VOLUME, WELD_TOLERANCE};
use junction::{repair_triangles, split_ring_edges};
use merge::{merge_coplanar, Ring};
use plane::Plane;
use polygon::Polygon;
use spatial::{PointGrid, VertexWelder};

// =============================================================================
// PUBLIC API
// =============================================================================

/// Compute the union of two solids (A ∪ B).
pub fn union(a: &Solid, b: &Solid) -> MeshResult<Solid> {
    union_meshes(&a.world_mesh(), &b.world_mesh()).map(Solid::from_mesh)
}

/// Compute the subtraction of two solids (A \ B).
pub fn subtract(a: &Solid, b: &Solid) -> MeshResult<Solid> {
    subtract_meshes(&a.world_mesh(), &b.world_mesh()).map(Solid::from_mesh)
}

/// Union of two world-space meshes.
pub fn union_meshes(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    const OP: &str = "union";
    check_operand(OP, "left", a)?;
    check_operand(OP, "right", b)?;

    let mut bsp_a = BspNode::new(mesh_to_polygons(a));
    let mut bsp_b = BspNode::new(mesh_to_polygons(b));

    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();

    let mut result_polys = bsp_a.all_polygons();
    result_polys.extend(bsp_b.all_polygons());

    let result = polygons_to_mesh(&result_polys);
    if result.is_empty() {
        return Err(MeshError::csg(OP, "result lost all geometry"));
    }
    check_result(OP, a, b, result)
}

/// Subtraction of two world-space meshes.
pub fn subtract_meshes(a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
    const OP: &str = "subtraction";
    check_operand(OP, "left", a)?;
    check_operand(OP, "right", b)?;

    let mut bsp_a = BspNode::new(mesh_to_polygons(a));
    let mut bsp_b = BspNode::new(mesh_to_polygons(b));

    // A - B = ~(~A | B)
    bsp_a.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();

    let mut result_polys = bsp_a.all_polygons();
    result_polys.extend(bsp_b.all_polygons());
    for polygon in &mut result_polys {
        polygon.flip();
    }

    check_result(OP, a, b, polygons_to_mesh(&result_polys))
}

// =============================================================================
// VALIDATION
// =============================================================================

fn check_operand(operation: &'static str, side: &str, mesh: &Mesh) -> MeshResult<()> {
    if mesh.is_empty() {
        return Err(MeshError::csg(operation, format!("{side} operand is empty")));
    }
    if !mesh.is_finite() {
        return Err(MeshError::csg(
            operation,
            format!("{side} operand has non-finite coordinates"),
        ));
    }
    let volume = mesh.signed_volume();
    if volume.abs() < MIN_SOLID_VOLUME {
        return Err(MeshError::csg(
            operation,
            format!("{side} operand has zero volume ({volume:e})"),
        ));
    }
    Ok(())
}

fn check_result(operation: &'static str, a: &Mesh, b: &Mesh, result: Mesh) -> MeshResult<Mesh> {
    if !result.is_finite() {
        return Err(MeshError::csg(operation, "result has non-finite coordinates"));
    }
    let open_edges = result.open_edge_count();
    if open_edges > 0 {
        tracing::warn!(operation, open_edges, "boolean result is not closed");
    }
    tracing::trace!(
        operation,
        left = a.triangle_count(),
        right = b.triangle_count(),
        result = result.triangle_count(),
        "boolean evaluated"
    );
    Ok(result)
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

/// Convert mesh to list of polygons, one per non-degenerate triangle.
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    mesh.triangle_positions()
        .filter_map(|[v0, v1, v2]| Polygon::from_vertices(vec![v0, v1, v2]))
        .collect()
}

/// Convert list of polygons back to a closed indexed mesh.
///
/// Nearby positions are welded, vertices lying on fragment edges are
/// inserted into them, coplanar fragments are merged and triangulated
/// together, and a last pass splits triangles at the T-junctions the
/// triangulation leaves behind.
fn polygons_to_mesh(polygons: &[Polygon]) -> Mesh {
    let mut welder = VertexWelder::new(WELD_TOLERANCE);
    let welded: Vec<(Vec<u32>, Plane)> = polygons
        .iter()
        .filter_map(|polygon| {
            let mut ids: Vec<u32> = polygon.vertices().iter().map(|v| welder.weld(*v)).collect();
            ids.dedup();
            while ids.len() > 1 && ids.first() == ids.last() {
                ids.pop();
            }
            (ids.len() >= 3).then(|| (ids, *polygon.plane()))
        })
        .collect();
    let mut positions = welder.into_positions();

    let rings: Vec<Ring> = {
        let used = welded.iter().flat_map(|(ids, _)| ids.iter().copied());
        let mut grid = PointGrid::new(&positions, used, WELD_TOLERANCE);
        welded
            .iter()
            .map(|(ids, plane)| Ring {
                ids: split_ring_edges(ids, &mut grid),
                plane: *plane,
            })
            .collect()
    };

    let triangles = merge_coplanar(&rings, &positions);
    let triangles = repair_triangles(triangles, &mut positions, WELD_TOLERANCE);

    let mut remap = vec![u32::MAX; positions.len()];
    let mut mesh = Mesh::with_capacity(positions.len(), triangles.len());
    for tri in triangles {
        let [a, b, c] = tri.map(|id| {
            let slot = &mut remap[id as usize];
            if *slot == u32::MAX {
                *slot = mesh.add_vertex(positions[id as usize]);
            }
            *slot
        });
        mesh.add_triangle(a, b, c);
    }
    mesh
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests;
