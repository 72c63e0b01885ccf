//! # Coplanar Merge
//!
//! BSP clipping cuts every face into many convex fragments. Before the
//! result becomes a mesh, fragments that share a plane are joined back into
//! one region and triangulated once, so the triangle count follows the
//! shape instead of the number of cuts.
//!
//! ## Algorithm
//!
//! 1. Group rings by plane (quantized normal + distance)
//! 2. Within a group, drop every directed edge that meets its reverse
//! 3. Chain the remaining edges into boundary loops
//! 4. Split loops into outers and holes by orientation and triangulate
//!    each outer with its holes using earcut
//!
//! A group whose triangulation does not cover the same area as its
//! fragments falls back to fan-triangulating the fragments.

use super::plane::Plane;
use config::constants::{COPLANAR_TOLERANCE, WELD_TOLERANCE};
use glam::{DVec2, DVec3};
use std::collections::HashMap;
use std::f64::consts::TAU;

/// Largest accepted relative area difference between a merged group and
/// its fragments.
const AREA_TOLERANCE: f64 = 1e-6;

/// A welded convex fragment: vertex ids in counter-clockwise order.
#[derive(Debug, Clone)]
pub struct Ring {
    pub ids: Vec<u32>,
    pub plane: Plane,
}

/// Triangulates `rings`, merging fragments that lie in the same plane.
pub fn merge_coplanar(rings: &[Ring], positions: &[DVec3]) -> Vec<[u32; 3]> {
    let mut slots: HashMap<[i64; 4], usize> = HashMap::new();
    let mut groups: Vec<Vec<&Ring>> = Vec::new();
    for ring in rings {
        let slot = *slots.entry(plane_key(&ring.plane)).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(ring);
    }

    let mut triangles = Vec::new();
    for group in &groups {
        match triangulate_group(group, positions) {
            Some(merged) => triangles.extend(merged),
            None => {
                tracing::trace!(fragments = group.len(), "coplanar merge fell back to fans");
                for ring in group {
                    fan(&ring.ids, &mut triangles);
                }
            }
        }
    }
    triangles
}

fn plane_key(plane: &Plane) -> [i64; 4] {
    let q = |v: f64| (v / COPLANAR_TOLERANCE).round() as i64;
    let n = plane.normal();
    [q(n.x), q(n.y), q(n.z), q(plane.w())]
}

fn fan(ids: &[u32], out: &mut Vec<[u32; 3]>) {
    for i in 1..ids.len().saturating_sub(1) {
        out.push([ids[0], ids[i], ids[i + 1]]);
    }
}

// =============================================================================
// PROJECTION
// =============================================================================

/// Drops the dominant normal axis, keeping counter-clockwise loops
/// counter-clockwise.
#[derive(Debug, Clone, Copy)]
struct Projection {
    u: usize,
    v: usize,
}

impl Projection {
    fn new(normal: DVec3) -> Self {
        let a = normal.abs();
        let k = if a.x >= a.y && a.x >= a.z {
            0
        } else if a.y >= a.z {
            1
        } else {
            2
        };
        let (u, v) = ((k + 1) % 3, (k + 2) % 3);
        if normal[k] >= 0.0 {
            Self { u, v }
        } else {
            Self { u: v, v: u }
        }
    }

    fn apply(self, p: DVec3) -> DVec2 {
        DVec2::new(p[self.u], p[self.v])
    }
}

fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}

/// Angle swept clockwise from `reference` to `direction`, in `(0, 2π]`.
fn clockwise_angle(reference: DVec2, direction: DVec2) -> f64 {
    let angle = direction.perp_dot(reference).atan2(reference.dot(direction));
    if angle <= 0.0 {
        angle + TAU
    } else {
        angle
    }
}

/// Even-odd point in polygon test.
fn ring_contains(ring: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

// =============================================================================
// GROUP TRIANGULATION
// =============================================================================

struct Boundary {
    ids: Vec<u32>,
    points: Vec<DVec2>,
    area: f64,
}

fn triangulate_group(group: &[&Ring], positions: &[DVec3]) -> Option<Vec<[u32; 3]>> {
    let first = group.first()?;
    if group.len() == 1 && first.ids.len() == 3 {
        return Some(vec![[first.ids[0], first.ids[1], first.ids[2]]]);
    }

    let projection = Projection::new(first.plane.normal());
    let point = |id: u32| projection.apply(positions[id as usize]);

    let mut fragment_area = 0.0;
    for ring in group {
        let points: Vec<DVec2> = ring.ids.iter().map(|&id| point(id)).collect();
        fragment_area += signed_area(&points);
    }
    if fragment_area <= 0.0 {
        return None;
    }

    let loops = boundary_loops(group, &point)?;
    let min_area = WELD_TOLERANCE * WELD_TOLERANCE;
    let mut outers = Vec::new();
    let mut holes = Vec::new();
    for ids in loops {
        let points: Vec<DVec2> = ids.iter().map(|&id| point(id)).collect();
        let area = signed_area(&points);
        let boundary = Boundary { ids, points, area };
        if area > min_area {
            outers.push(boundary);
        } else if area < -min_area {
            holes.push(boundary);
        }
    }

    let mut owned: Vec<Vec<&Boundary>> = vec![Vec::new(); outers.len()];
    for hole in &holes {
        let owner = if outers.len() == 1 {
            0
        } else {
            hole_owner(hole, &outers)?
        };
        owned[owner].push(hole);
    }

    let mut triangles = Vec::new();
    let mut covered = 0.0;
    for (outer, holes) in outers.iter().zip(&owned) {
        let mut ids = outer.ids.clone();
        let mut flat: Vec<f64> = outer.points.iter().flat_map(|p| [p.x, p.y]).collect();
        let mut hole_starts = Vec::with_capacity(holes.len());
        for hole in holes {
            hole_starts.push(ids.len());
            ids.extend(&hole.ids);
            flat.extend(hole.points.iter().flat_map(|p| [p.x, p.y]));
        }

        let indices = earcutr::earcut(&flat, &hole_starts, 2).ok()?;
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = [ids[tri[0]], ids[tri[1]], ids[tri[2]]];
            let area = (point(b) - point(a)).perp_dot(point(c) - point(a)) / 2.0;
            covered += area.abs();
            triangles.push(if area < 0.0 { [a, c, b] } else { [a, b, c] });
        }
    }

    let fragment_triangles: usize = group.iter().map(|r| r.ids.len() - 2).sum();
    if (covered - fragment_area).abs() > AREA_TOLERANCE * fragment_area
        || triangles.len() > fragment_triangles
    {
        return None;
    }
    Some(triangles)
}

/// Cancels shared edges and chains what is left into closed loops.
///
/// At a vertex with several unused outgoing edges, the walk takes the one
/// reached first turning clockwise from the incoming edge, which keeps
/// regions that only touch at a vertex in separate loops.
fn boundary_loops(group: &[&Ring], point: &impl Fn(u32) -> DVec2) -> Option<Vec<Vec<u32>>> {
    let mut edges: Vec<(u32, u32)> = Vec::new();
    let mut live: Vec<bool> = Vec::new();
    let mut unmatched: HashMap<(u32, u32), Vec<usize>> = HashMap::new();
    for ring in group {
        let n = ring.ids.len();
        for k in 0..n {
            let (u, v) = (ring.ids[k], ring.ids[(k + 1) % n]);
            if let Some(twin) = unmatched.get_mut(&(v, u)).and_then(Vec::pop) {
                live[twin] = false;
                continue;
            }
            unmatched.entry((u, v)).or_default().push(edges.len());
            edges.push((u, v));
            live.push(true);
        }
    }

    let mut outgoing: HashMap<u32, Vec<usize>> = HashMap::new();
    for (index, &(u, _)) in edges.iter().enumerate() {
        if live[index] {
            outgoing.entry(u).or_default().push(index);
        }
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for start in 0..edges.len() {
        if !live[start] || used[start] {
            continue;
        }
        used[start] = true;
        let mut ids = vec![edges[start].0];
        let mut current = start;
        loop {
            let (from, to) = edges[current];
            let back = point(from) - point(to);
            let here = point(to);
            let next = outgoing
                .get(&to)?
                .iter()
                .copied()
                .filter(|&e| !used[e] || e == start)
                .map(|e| (clockwise_angle(back, point(edges[e].1) - here), e))
                .min_by(|l, r| l.0.total_cmp(&r.0).then(l.1.cmp(&r.1)))?
                .1;
            if next == start {
                break;
            }
            if ids.len() > edges.len() {
                return None;
            }
            used[next] = true;
            ids.push(edges[next].0);
            current = next;
        }
        loops.push(ids);
    }
    Some(loops)
}

/// Index of the smallest outer loop enclosing `hole`.
///
/// Tested with a point just outside the hole, on the material side of its
/// first edge.
fn hole_owner(hole: &Boundary, outers: &[Boundary]) -> Option<usize> {
    let (a, b) = (hole.points[0], hole.points[1]);
    let edge = b - a;
    let sample = (a + b) / 2.0 + edge.perp() * 1e-3;
    outers
        .iter()
        .enumerate()
        .filter(|(_, outer)| ring_contains(&outer.points, sample))
        .min_by(|l, r| l.1.area.total_cmp(&r.1.area))
        .map(|(index, _)| index)
}
