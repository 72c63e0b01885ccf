//! # Plane for BSP Operations
//!
//! Plane representation with point classification and polygon splitting.

use super::polygon::Polygon;
use config::constants::{EPSILON, PLANE_EPSILON};
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point or polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// In front of the plane (positive side).
    Front,
    /// Behind the plane (negative side).
    Back,
    /// Within [`PLANE_EPSILON`] of the plane.
    Coplanar,
    /// Polygon with vertices on both sides.
    Spanning,
}

impl Classification {
    fn combine(self, other: Classification) -> Classification {
        match (self, other) {
            (a, Classification::Coplanar) => a,
            (Classification::Coplanar, b) => b,
            (a, b) if a == b => a,
            _ => Classification::Spanning,
        }
    }
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane in 3D space defined by unit normal and distance from origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    normal: DVec3,
    w: f64,
}

impl Plane {
    /// Create plane from three points in counter-clockwise order.
    ///
    /// Returns `None` for collinear or coincident points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let n = (b - a).cross(c - a);
        let length = n.length();
        if !(length > EPSILON) || !length.is_finite() {
            return None;
        }
        let normal = n / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Unit normal.
    pub fn normal(&self) -> DVec3 {
        self.normal
    }

    /// Signed distance of the plane from the origin along the normal.
    pub fn w(&self) -> f64 {
        self.w
    }

    /// Reverse the facing of the plane.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.w = -self.w;
    }

    /// Classify a point against the plane.
    pub fn classify_point(&self, point: DVec3) -> Classification {
        let t = self.normal.dot(point) - self.w;
        if t < -PLANE_EPSILON {
            Classification::Back
        } else if t > PLANE_EPSILON {
            Classification::Front
        } else {
            Classification::Coplanar
        }
    }

    /// Split `polygon` by this plane into the matching buckets.
    ///
    /// Coplanar polygons go to `coplanar_front` or `coplanar_back` depending
    /// on which way they face. Spanning polygons are cut in two.
    pub fn split_polygon(
        &self,
        polygon: Polygon,
        coplanar_front: &mut Vec<Polygon>,
        coplanar_back: &mut Vec<Polygon>,
        front: &mut Vec<Polygon>,
        back: &mut Vec<Polygon>,
    ) {
        let types: Vec<Classification> = polygon
            .vertices()
            .iter()
            .map(|v| self.classify_point(*v))
            .collect();
        let polygon_type = types
            .iter()
            .fold(Classification::Coplanar, |acc, t| acc.combine(*t));

        match polygon_type {
            Classification::Coplanar => {
                if self.normal.dot(polygon.plane().normal()) > 0.0 {
                    coplanar_front.push(polygon);
                } else {
                    coplanar_back.push(polygon);
                }
            }
            Classification::Front => front.push(polygon),
            Classification::Back => back.push(polygon),
            Classification::Spanning => {
                let vertices = polygon.vertices();
                let n = vertices.len();
                let mut f = Vec::with_capacity(n + 1);
                let mut b = Vec::with_capacity(n + 1);

                for i in 0..n {
                    let j = (i + 1) % n;
                    let (ti, tj) = (types[i], types[j]);
                    let (vi, vj) = (vertices[i], vertices[j]);

                    if ti != Classification::Back {
                        f.push(vi);
                    }
                    if ti != Classification::Front {
                        b.push(vi);
                    }
                    if ti.combine(tj) == Classification::Spanning {
                        let t = (self.w - self.normal.dot(vi)) / self.normal.dot(vj - vi);
                        let v = vi.lerp(vj, t);
                        f.push(v);
                        b.push(v);
                    }
                }

                let plane = *polygon.plane();
                if f.len() >= 3 {
                    front.push(Polygon::with_plane(f, plane));
                }
                if b.len() >= 3 {
                    back.push(Polygon::with_plane(b, plane));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_plane() -> Plane {
        Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::Y).unwrap()
    }

    #[test]
    fn test_from_points_normal() {
        assert_eq!(xy_plane().normal(), DVec3::Z);
        assert!(Plane::from_points(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn test_classify_point() {
        let plane = xy_plane();
        assert_eq!(plane.classify_point(DVec3::Z), Classification::Front);
        assert_eq!(plane.classify_point(-DVec3::Z), Classification::Back);
        assert_eq!(
            plane.classify_point(DVec3::new(5.0, 5.0, 1e-7)),
            Classification::Coplanar
        );
    }

    #[test]
    fn test_split_spanning_triangle() {
        let plane = xy_plane();
        let tri = Polygon::from_vertices(vec![
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(0.0, 1.0, 1.0),
        ])
        .unwrap();

        let (mut cf, mut cb, mut f, mut b) = (vec![], vec![], vec![], vec![]);
        plane.split_polygon(tri, &mut cf, &mut cb, &mut f, &mut b);

        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(f.len(), 1);
        assert_eq!(b.len(), 1);
        assert_eq!(f[0].vertices().len(), 4);
        assert_eq!(b[0].vertices().len(), 3);
        for v in b[0].vertices() {
            assert!(v.z <= 1e-12);
        }
    }

    #[test]
    fn test_split_coplanar_by_facing() {
        let plane = xy_plane();
        let up = Polygon::from_vertices(vec![DVec3::ZERO, DVec3::X, DVec3::Y]).unwrap();
        let mut down = up.clone();
        down.flip();

        let (mut cf, mut cb, mut f, mut b) = (vec![], vec![], vec![], vec![]);
        plane.split_polygon(up, &mut cf, &mut cb, &mut f, &mut b);
        plane.split_polygon(down, &mut cf, &mut cb, &mut f, &mut b);
        assert_eq!(cf.len(), 1);
        assert_eq!(cb.len(), 1);
    }
}
