//! # Vertex Spatial Hash
//!
//! Grid lookups used while turning BSP fragments back into an indexed mesh:
//! welding positions that nearly coincide, and finding vertices that sit on
//! the inside of an edge (T-junctions).

use glam::DVec3;
use std::collections::HashMap;

/// Smallest segment-query cell, in multiples of the tolerance.
const MIN_CELL_FACTOR: f64 = 64.0;

/// 3D cell coordinate for spatial hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CellCoord {
    x: i64,
    y: i64,
    z: i64,
}

impl CellCoord {
    fn from_position(pos: DVec3, cell_size: f64) -> Self {
        Self {
            x: (pos.x / cell_size).floor() as i64,
            y: (pos.y / cell_size).floor() as i64,
            z: (pos.z / cell_size).floor() as i64,
        }
    }

    fn offset(self, dx: i64, dy: i64, dz: i64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

// =============================================================================
// WELDING
// =============================================================================

/// Assigns one vertex id to all positions within `tolerance` of each other.
///
/// The first position seen for an id is the one kept.
#[derive(Debug)]
pub struct VertexWelder {
    tolerance: f64,
    positions: Vec<DVec3>,
    grid: HashMap<CellCoord, Vec<u32>>,
}

impl VertexWelder {
    pub fn new(tolerance: f64) -> Self {
        Self {
            tolerance,
            positions: Vec::new(),
            grid: HashMap::new(),
        }
    }

    /// Id of the nearest stored position within the tolerance, or a new id.
    pub fn weld(&mut self, pos: DVec3) -> u32 {
        // Cells are one tolerance wide, so any match is in the 3x3x3 block
        let cell = CellCoord::from_position(pos, self.tolerance);
        let mut nearest: Option<(f64, u32)> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(ids) = self.grid.get(&cell.offset(dx, dy, dz)) else {
                        continue;
                    };
                    for &id in ids {
                        let distance = self.positions[id as usize].distance(pos);
                        let closer = match nearest {
                            None => true,
                            Some((best, best_id)) => {
                                distance < best || (distance == best && id < best_id)
                            }
                        };
                        if distance <= self.tolerance && closer {
                            nearest = Some((distance, id));
                        }
                    }
                }
            }
        }

        if let Some((_, id)) = nearest {
            return id;
        }
        let id = self.positions.len() as u32;
        self.positions.push(pos);
        self.grid.entry(cell).or_default().push(id);
        id
    }

    pub fn into_positions(self) -> Vec<DVec3> {
        self.positions
    }
}

// =============================================================================
// SEGMENT QUERIES
// =============================================================================

/// A subset of vertices bucketed for "which vertices lie on this edge".
///
/// Answers are cached per undirected edge, so both sides of a shared edge
/// always receive the same points in mirrored order.
#[derive(Debug)]
pub struct PointGrid<'a> {
    positions: &'a [DVec3],
    tolerance: f64,
    cell_size: f64,
    point_count: usize,
    grid: HashMap<CellCoord, Vec<u32>>,
    cache: HashMap<(u32, u32), Vec<u32>>,
}

impl<'a> PointGrid<'a> {
    /// Indexes the vertices `ids` of `positions`.
    pub fn new(positions: &'a [DVec3], ids: impl IntoIterator<Item = u32>, tolerance: f64) -> Self {
        let ids: Vec<u32> = ids.into_iter().collect();
        let (min, max) = ids.iter().map(|&id| positions[id as usize]).fold(
            (DVec3::splat(f64::MAX), DVec3::splat(f64::MIN)),
            |(min, max), p| (min.min(p), max.max(p)),
        );
        let extent = if ids.is_empty() {
            0.0
        } else {
            (max - min).max_element()
        };
        let cell_size = (extent / (ids.len().max(1) as f64).cbrt())
            .max(tolerance * MIN_CELL_FACTOR);

        let mut grid: HashMap<CellCoord, Vec<u32>> = HashMap::new();
        for &id in &ids {
            grid.entry(CellCoord::from_position(positions[id as usize], cell_size))
                .or_default()
                .push(id);
        }

        Self {
            positions,
            tolerance,
            cell_size,
            point_count: ids.len(),
            grid,
            cache: HashMap::new(),
        }
    }

    /// Indexed vertices lying strictly inside the segment `a`-`b`, ordered
    /// from `a` to `b`.
    ///
    /// A vertex counts when it is within the tolerance of the segment,
    /// projects between the endpoints and is not within the tolerance of
    /// either of them.
    pub fn points_on_segment(&mut self, a: u32, b: u32) -> Vec<u32> {
        let key = (a.min(b), a.max(b));
        let points = match self.cache.get(&key) {
            Some(points) => points.clone(),
            None => {
                let points = self.scan_segment(key.0, key.1);
                self.cache.insert(key, points.clone());
                points
            }
        };
        if a > b {
            points.into_iter().rev().collect()
        } else {
            points
        }
    }

    fn scan_segment(&self, a: u32, b: u32) -> Vec<u32> {
        let tol = self.tolerance;
        let p = self.positions[a as usize];
        let q = self.positions[b as usize];
        let dir = q - p;
        let len2 = dir.length_squared();
        if len2 <= 4.0 * tol * tol {
            return Vec::new();
        }

        let mut hits: Vec<(f64, u32)> = Vec::new();
        let mut test = |id: u32| {
            if id == a || id == b {
                return;
            }
            let v = self.positions[id as usize];
            let t = (v - p).dot(dir) / len2;
            if t <= 0.0 || t >= 1.0 {
                return;
            }
            if (p + dir * t).distance(v) > tol || v.distance(p) <= tol || v.distance(q) <= tol {
                return;
            }
            hits.push((t, id));
        };

        let lo = CellCoord::from_position(p.min(q) - DVec3::splat(tol), self.cell_size);
        let hi = CellCoord::from_position(p.max(q) + DVec3::splat(tol), self.cell_size);
        let span = |l: i64, h: i64| (h - l + 1) as f64;
        let cells = span(lo.x, hi.x) * span(lo.y, hi.y) * span(lo.z, hi.z);

        if cells > self.point_count as f64 {
            // Walking the cells would cost more than looking at every point
            for ids in self.grid.values() {
                ids.iter().for_each(|&id| test(id));
            }
        } else {
            for x in lo.x..=hi.x {
                for y in lo.y..=hi.y {
                    for z in lo.z..=hi.z {
                        if let Some(ids) = self.grid.get(&CellCoord { x, y, z }) {
                            ids.iter().for_each(|&id| test(id));
                        }
                    }
                }
            }
        }

        hits.sort_by(|l, r| l.0.total_cmp(&r.0).then(l.1.cmp(&r.1)));
        hits.into_iter().map(|(_, id)| id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weld_merges_close_positions() {
        let mut welder = VertexWelder::new(1e-5);
        let a = welder.weld(DVec3::new(1.0, 2.0, 3.0));
        let b = welder.weld(DVec3::new(1.0 + 4e-6, 2.0, 3.0 - 4e-6));
        let c = welder.weld(DVec3::new(1.0 + 5e-5, 2.0, 3.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        // Negative zero lands next to positive zero
        assert_eq!(welder.weld(DVec3::ZERO), welder.weld(DVec3::new(-0.0, 0.0, -0.0)));
        assert_eq!(welder.into_positions()[a as usize], DVec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_weld_across_cell_boundary() {
        let mut welder = VertexWelder::new(1e-5);
        let a = welder.weld(DVec3::new(0.999_999_999, 0.0, 0.0));
        let b = welder.weld(DVec3::new(1.000_000_001, 0.0, 0.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_points_on_segment_are_ordered_and_mirrored() {
        let positions = vec![
            DVec3::ZERO,
            DVec3::new(10.0, 0.0, 0.0),
            DVec3::new(7.0, 0.0, 0.0),
            DVec3::new(2.0, 1e-6, 0.0),
            DVec3::new(5.0, 0.5, 0.0),
            DVec3::new(12.0, 0.0, 0.0),
        ];
        let mut grid = PointGrid::new(&positions, 0..6, 1e-5);

        assert_eq!(grid.points_on_segment(0, 1), vec![3, 2]);
        assert_eq!(grid.points_on_segment(1, 0), vec![2, 3]);
        assert!(grid.points_on_segment(0, 3).is_empty());
    }

    #[test]
    fn test_diagonal_segment_scans_every_point() {
        let mut positions: Vec<DVec3> = (0..4)
            .flat_map(|i| (0..4).map(move |j| DVec3::new(i as f64, j as f64, 0.0)))
            .collect();
        positions.push(DVec3::new(1.5, 1.5, 0.0));
        let mut grid = PointGrid::new(&positions, 0..positions.len() as u32, 1e-5);

        // (0,0) -> (3,3) passes (1,1), (1.5,1.5) and (2,2)
        assert_eq!(grid.points_on_segment(0, 15), vec![5, 16, 10]);
    }
}
