//! # T-Junction Repair
//!
//! Two faces meet along an edge only when both sides carry the same
//! vertices on it. BSP splitting and triangulation both break that: one side
//! may end an edge at a vertex that lies halfway along the other side's
//! edge. These passes insert such vertices into the longer edge.

use super::spatial::PointGrid;
use glam::DVec3;

/// Inserts every indexed vertex lying on a ring edge into that edge.
pub fn split_ring_edges(ids: &[u32], grid: &mut PointGrid<'_>) -> Vec<u32> {
    let mut out = Vec::with_capacity(ids.len());
    for (k, &a) in ids.iter().enumerate() {
        let b = ids[(k + 1) % ids.len()];
        out.push(a);
        out.extend(grid.points_on_segment(a, b));
    }
    out
}

/// True if the triangle repeats a vertex or is thinner than `tolerance`.
///
/// The height is taken over the longest edge, so a sliver is exactly a
/// triangle whose middle vertex sits on that edge.
pub fn is_sliver(positions: &[DVec3], [a, b, c]: [u32; 3], tolerance: f64) -> bool {
    if a == b || b == c || a == c {
        return true;
    }
    let [pa, pb, pc] = [a, b, c].map(|id| positions[id as usize]);
    let longest = pa.distance(pb).max(pb.distance(pc)).max(pc.distance(pa));
    (pb - pa).cross(pc - pa).length() <= tolerance * longest
}

/// Drops slivers and re-triangulates every triangle that has other vertices
/// on its edges.
///
/// A triangle with a single split edge is fanned from the opposite corner.
/// Otherwise a vertex is added at its centroid and the whole boundary is
/// fanned around it; those vertices are appended to `positions`.
pub fn repair_triangles(
    triangles: Vec<[u32; 3]>,
    positions: &mut Vec<DVec3>,
    tolerance: f64,
) -> Vec<[u32; 3]> {
    let kept: Vec<[u32; 3]> = triangles
        .into_iter()
        .filter(|tri| !is_sliver(positions, *tri, tolerance))
        .collect();

    let mut referenced = vec![false; positions.len()];
    for tri in &kept {
        for &id in tri {
            referenced[id as usize] = true;
        }
    }
    let ids = (0..positions.len() as u32).filter(|&id| referenced[id as usize]);

    let base = positions.len() as u32;
    let mut centroids = Vec::new();
    let mut out = Vec::with_capacity(kept.len());
    {
        let mut grid = PointGrid::new(positions, ids, tolerance);
        for [a, b, c] in kept {
            let ab = grid.points_on_segment(a, b);
            let bc = grid.points_on_segment(b, c);
            let ca = grid.points_on_segment(c, a);
            if ab.is_empty() && bc.is_empty() && ca.is_empty() {
                out.push([a, b, c]);
                continue;
            }

            let mut ring = Vec::with_capacity(3 + ab.len() + bc.len() + ca.len());
            ring.push(a);
            ring.extend(&ab);
            ring.push(b);
            ring.extend(&bc);
            ring.push(c);
            ring.extend(&ca);

            let corner = match (ab.is_empty(), bc.is_empty(), ca.is_empty()) {
                (true, _, true) => Some(0),
                (true, true, _) => Some(1),
                (_, true, true) => Some(2 + ab.len() + bc.len()),
                _ => None,
            };
            match corner {
                Some(start) => fan_from(&ring, start, &mut out),
                None => {
                    let center = base + centroids.len() as u32;
                    let [pa, pb, pc] = [a, b, c].map(|id| positions[id as usize]);
                    centroids.push((pa + pb + pc) / 3.0);
                    for (k, &v) in ring.iter().enumerate() {
                        out.push([center, v, ring[(k + 1) % ring.len()]]);
                    }
                }
            }
        }
    }
    positions.extend(centroids);
    out
}

fn fan_from(ring: &[u32], start: usize, out: &mut Vec<[u32; 3]>) {
    let n = ring.len();
    for i in 1..n - 1 {
        out.push([ring[start], ring[(start + i) % n], ring[(start + i + 1) % n]]);
    }
}
