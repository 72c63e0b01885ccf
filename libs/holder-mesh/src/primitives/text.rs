//! # Text Primitive
//!
//! Extrudes planar glyph outlines into a closed solid.
//!
//! Outlines arrive as shapes: one outer ring plus any number of hole rings.
//! Rings are re-oriented (outer counter-clockwise, holes clockwise), the
//! face is triangulated with `earcutr`, and the side walls are stitched
//! between the bottom (z = 0) and top (z = thickness) copies.

use crate::error::{MeshError, MeshResult};
use crate::mesh::Mesh;
use config::constants::EPSILON;
use glam::{DVec2, DVec3};

/// One filled region of a glyph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextShape {
    /// Boundary ring.
    pub outer: Vec<DVec2>,
    /// Counters cut out of the region (the inside of "o", "A", ...).
    pub holes: Vec<Vec<DVec2>>,
}

/// Flattened outline of a whole text run, in millimeters, y-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOutline {
    pub shapes: Vec<TextShape>,
}

impl TextOutline {
    /// Returns true if there is nothing to extrude.
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// 2D bounding box over every outer ring.
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        let mut points = self.shapes.iter().flat_map(|s| s.outer.iter());
        let first = *points.next()?;
        Some(points.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p))))
    }
}

/// Twice the signed area of a ring; positive for counter-clockwise.
pub(crate) fn signed_area2(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum()
}

/// Drops repeated consecutive points and an explicit closing point.
fn clean_ring(ring: &[DVec2]) -> Vec<DVec2> {
    let mut out: Vec<DVec2> = Vec::with_capacity(ring.len());
    for p in ring {
        if out.last().map_or(true, |last| last.distance(*p) > EPSILON) {
            out.push(*p);
        }
    }
    while out.len() > 1 && out[0].distance(out[out.len() - 1]) <= EPSILON {
        out.pop();
    }
    out
}

/// Cleans a ring and orients it. Returns `None` for rings without area.
fn oriented(ring: &[DVec2], counter_clockwise: bool) -> Option<Vec<DVec2>> {
    let mut ring = clean_ring(ring);
    if ring.len() < 3 {
        return None;
    }
    let area = signed_area2(&ring);
    if area.abs() <= EPSILON {
        return None;
    }
    if (area > 0.0) != counter_clockwise {
        ring.reverse();
    }
    Some(ring)
}

/// Creates a text mesh extruded from z = 0 to z = `thickness`.
///
/// # Example
///
/// ```rust
/// use holder_mesh::primitives::{create_text, TextOutline, TextShape};
/// use glam::DVec2;
///
/// let square = TextShape {
///     outer: vec![
///         DVec2::new(0.0, 0.0),
///         DVec2::new(2.0, 0.0),
///         DVec2::new(2.0, 2.0),
///         DVec2::new(0.0, 2.0),
///     ],
///     holes: vec![],
/// };
/// let mesh = create_text(&TextOutline { shapes: vec![square] }, 1.0).unwrap();
/// assert!((mesh.signed_volume() - 4.0).abs() < 1e-9);
/// ```
pub fn create_text(outline: &TextOutline, thickness: f64) -> MeshResult<Mesh> {
    if !(thickness > 0.0) || !thickness.is_finite() {
        return Err(MeshError::construction(format!(
            "Text thickness must be positive: {thickness}"
        )));
    }

    let mut mesh = Mesh::new();

    for shape in &outline.shapes {
        let Some(outer) = oriented(&shape.outer, true) else {
            continue;
        };
        let holes: Vec<Vec<DVec2>> = shape
            .holes
            .iter()
            .filter_map(|hole| oriented(hole, false))
            .collect();

        extrude_shape(&mut mesh, &outer, &holes, thickness)?;
    }

    if mesh.is_empty() {
        return Err(MeshError::construction(
            "Text outline contains no contour with area",
        ));
    }

    Ok(mesh)
}

fn extrude_shape(
    mesh: &mut Mesh,
    outer: &[DVec2],
    holes: &[Vec<DVec2>],
    thickness: f64,
) -> MeshResult<()> {
    let rings: Vec<&[DVec2]> = std::iter::once(outer)
        .chain(holes.iter().map(Vec::as_slice))
        .collect();
    let points: Vec<DVec2> = rings.iter().flat_map(|r| r.iter().copied()).collect();
    let count = points.len() as u32;

    let mut flat = Vec::with_capacity(points.len() * 2);
    let mut hole_starts = Vec::with_capacity(holes.len());
    let mut ring_starts = Vec::with_capacity(rings.len());
    for (i, ring) in rings.iter().enumerate() {
        let start = flat.len() / 2;
        if i > 0 {
            hole_starts.push(start);
        }
        ring_starts.push((start as u32, ring.len() as u32));
        for p in ring.iter() {
            flat.push(p.x);
            flat.push(p.y);
        }
    }

    let indices = earcutr::earcut(&flat, &hole_starts, 2).map_err(|e| {
        MeshError::construction(format!("Text outline triangulation failed: {e:?}"))
    })?;

    let base = mesh.vertex_count() as u32;
    for p in &points {
        mesh.add_vertex(DVec3::new(p.x, p.y, 0.0));
    }
    for p in &points {
        mesh.add_vertex(DVec3::new(p.x, p.y, thickness));
    }

    for tri in indices.chunks_exact(3) {
        let (mut a, mut b, c) = (tri[0], tri[1], tri[2]);
        if signed_area2(&[points[a], points[b], points[c]]) < 0.0 {
            std::mem::swap(&mut a, &mut b);
        }
        let (a, b, c) = (a as u32, b as u32, c as u32);
        mesh.add_triangle(base + a, base + c, base + b);
        mesh.add_triangle(base + count + a, base + count + b, base + count + c);
    }

    // Walls: outer rings run counter-clockwise and holes clockwise, so the
    // same stitching faces away from the material on both.
    for (start, len) in ring_starts {
        for k in 0..len {
            let a = base + start + k;
            let b = base + start + (k + 1) % len;
            mesh.add_triangle(a, b, b + count);
            mesh.add_triangle(a, b + count, a + count);
        }
    }

    Ok(())
}
