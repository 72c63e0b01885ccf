//! # BSP Tree
//!
//! Binary Space Partitioning tree for CSG boolean operations.
//! Based on the csg.js algorithm by Evan Wallace.
//!
//! ## Algorithm
//!
//! Each BSP node contains:
//! - A dividing plane
//! - Polygons coplanar with the plane
//! - Front subtree (polygons in front of plane)
//! - Back subtree (polygons behind plane)
//!
//! ## Stack Safety
//!
//! Tree depth grows with polygon count, so every recursive step runs
//! through `stacker::maybe_grow`. This keeps deep trees safe on the small
//! default stacks of WASM and worker threads.

use super::plane::Plane;
use super::polygon::Polygon;
use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
use stacker::maybe_grow;

/// A node in the BSP tree.
#[derive(Debug, Clone, Default)]
pub struct BspNode {
    plane: Option<Plane>,
    /// Polygons coplanar with this node's plane
    polygons: Vec<Polygon>,
    front: Option<Box<BspNode>>,
    back: Option<Box<BspNode>>,
}

impl BspNode {
    /// Creates a BSP tree from polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Inserts polygons into the tree, splitting where they cross planes.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            if polygons.is_empty() {
                return;
            }

            let plane = *self.plane.get_or_insert(*polygons[0].plane());

            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for polygon in polygons {
                plane.split_polygon(
                    polygon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            self.polygons.append(&mut coplanar_front);
            self.polygons.append(&mut coplanar_back);

            if !front.is_empty() {
                self.front.get_or_insert_with(Default::default).build(front);
            }
            if !back.is_empty() {
                self.back.get_or_insert_with(Default::default).build(back);
            }
        })
    }

    /// Converts solid space to empty space and vice versa.
    pub fn invert(&mut self) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            for polygon in &mut self.polygons {
                polygon.flip();
            }
            if let Some(plane) = &mut self.plane {
                plane.flip();
            }
            if let Some(front) = &mut self.front {
                front.invert();
            }
            if let Some(back) = &mut self.back {
                back.invert();
            }
            std::mem::swap(&mut self.front, &mut self.back);
        })
    }

    /// Removes the parts of `polygons` that lie inside this tree.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let Some(plane) = self.plane else {
                return polygons;
            };

            let mut front = Vec::new();
            let mut back = Vec::new();
            let mut coplanar_front = Vec::new();
            let mut coplanar_back = Vec::new();
            for polygon in polygons {
                plane.split_polygon(
                    polygon,
                    &mut coplanar_front,
                    &mut coplanar_back,
                    &mut front,
                    &mut back,
                );
            }
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);

            let mut front = match &self.front {
                Some(node) => node.clip_polygons(front),
                None => front,
            };
            // Behind a leaf is inside the solid.
            let back = match &self.back {
                Some(node) => node.clip_polygons(back),
                None => Vec::new(),
            };
            front.extend(back);
            front
        })
    }

    /// Removes all polygons in this tree that are inside `other`.
    pub fn clip_to(&mut self, other: &BspNode) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            let polygons = std::mem::take(&mut self.polygons);
            self.polygons = other.clip_polygons(polygons);
            if let Some(front) = &mut self.front {
                front.clip_to(other);
            }
            if let Some(back) = &mut self.back {
                back.clip_to(other);
            }
        })
    }

    /// Collects every polygon in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<Polygon>) {
        maybe_grow(STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES, || {
            out.extend(self.polygons.iter().cloned());
            if let Some(front) = &self.front {
                front.collect_into(out);
            }
            if let Some(back) = &self.back {
                back.collect_into(out);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec3;

    fn tri(z: f64) -> Polygon {
        Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, z),
            DVec3::new(1.0, 0.0, z),
            DVec3::new(0.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_keeps_all_polygons() {
        let tree = BspNode::new(vec![tri(0.0), tri(1.0), tri(-1.0), tri(0.0)]);
        assert_eq!(tree.all_polygons().len(), 4);
        assert_eq!(tree.polygons.len(), 2);
    }

    #[test]
    fn test_empty_tree_clips_nothing() {
        let tree = BspNode::new(Vec::new());
        assert_eq!(tree.clip_polygons(vec![tri(3.0)]).len(), 1);
    }

    #[test]
    fn test_clip_discards_behind_leaf() {
        // Single upward plane: everything below counts as inside
        let tree = BspNode::new(vec![tri(0.0)]);
        assert_eq!(tree.clip_polygons(vec![tri(1.0)]).len(), 1);
        assert!(tree.clip_polygons(vec![tri(-1.0)]).is_empty());
    }

    #[test]
    fn test_invert_flips_sides() {
        let mut tree = BspNode::new(vec![tri(0.0)]);
        tree.invert();
        assert!(tree.clip_polygons(vec![tri(1.0)]).is_empty());
        assert_eq!(tree.clip_polygons(vec![tri(-1.0)]).len(), 1);
    }
}
