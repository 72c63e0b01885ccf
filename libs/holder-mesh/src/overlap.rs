//! # Overlap Predicates
//!
//! Footprint tests deciding whether a support leg collides with a component.
//! All coordinates are panel-local millimeters with y pointing down, as on
//! the editor canvas.

use crate::model::{CircleComponent, LegPlacement, RectangleComponent};
use glam::DVec2;

/// Rotates `point` about `center` by `degrees` (positive is clockwise on a
/// y-down canvas).
///
/// # Example
///
/// ```rust
/// use holder_mesh::overlap::rotate_point;
/// use glam::DVec2;
///
/// let p = rotate_point(DVec2::new(1.0, 0.0), DVec2::ZERO, 90.0);
/// assert!((p - DVec2::new(0.0, 1.0)).length() < 1e-12);
/// ```
pub fn rotate_point(point: DVec2, center: DVec2, degrees: f64) -> DVec2 {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let d = point - center;
    center + DVec2::new(d.x * cos - d.y * sin, d.x * sin + d.y * cos)
}

/// Corners of a rectangle after rotation about its center.
pub fn rectangle_corners(rect: &RectangleComponent) -> [DVec2; 4] {
    let center = DVec2::new(rect.x, rect.y);
    let half = DVec2::new(rect.width / 2.0, rect.height / 2.0);
    [
        DVec2::new(-half.x, -half.y),
        DVec2::new(half.x, -half.y),
        DVec2::new(half.x, half.y),
        DVec2::new(-half.x, half.y),
    ]
    .map(|offset| rotate_point(center + offset, center, rect.rotation))
}

fn leg_corners(leg: &LegPlacement) -> [DVec2; 4] {
    [
        DVec2::new(leg.x, leg.y),
        DVec2::new(leg.x + leg.width, leg.y),
        DVec2::new(leg.x + leg.width, leg.y + leg.height),
        DVec2::new(leg.x, leg.y + leg.height),
    ]
}

fn leg_contains(leg: &LegPlacement, p: DVec2) -> bool {
    p.x >= leg.x && p.x <= leg.x + leg.width && p.y >= leg.y && p.y <= leg.y + leg.height
}

/// True if the circle reaches strictly inside the leg rectangle.
///
/// Tangency is not an overlap.
pub fn leg_overlaps_circle(leg: &LegPlacement, circle: &CircleComponent) -> bool {
    let closest_x = circle.x.clamp(leg.x, leg.x + leg.width);
    let closest_y = circle.y.clamp(leg.y, leg.y + leg.height);
    let dx = circle.x - closest_x;
    let dy = circle.y - closest_y;
    dx * dx + dy * dy < circle.radius * circle.radius
}

/// True if the leg and the (possibly rotated) rectangle intersect.
pub fn leg_overlaps_rectangle(leg: &LegPlacement, rect: &RectangleComponent) -> bool {
    if rect.rotation == 0.0 {
        let rect_left = rect.x - rect.width / 2.0;
        let rect_right = rect.x + rect.width / 2.0;
        let rect_top = rect.y - rect.height / 2.0;
        let rect_bottom = rect.y + rect.height / 2.0;

        return leg.x < rect_right
            && leg.x + leg.width > rect_left
            && leg.y < rect_bottom
            && leg.y + leg.height > rect_top;
    }

    if rectangle_corners(rect)
        .iter()
        .any(|corner| leg_contains(leg, *corner))
    {
        return true;
    }

    let center = DVec2::new(rect.x, rect.y);
    let (half_w, half_h) = (rect.width / 2.0, rect.height / 2.0);
    leg_corners(leg).iter().any(|corner| {
        let local = rotate_point(*corner, center, -rect.rotation) - center;
        local.x.abs() <= half_w && local.y.abs() <= half_h
    })
}

/// True if the leg collides with any component.
pub fn leg_is_blocked(
    leg: &LegPlacement,
    circles: &[CircleComponent],
    rectangles: &[RectangleComponent],
) -> bool {
    circles.iter().any(|c| leg_overlaps_circle(leg, c))
        || rectangles.iter().any(|r| leg_overlaps_rectangle(leg, r))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leg(x: f64, y: f64) -> LegPlacement {
        LegPlacement {
            x,
            y,
            width: 2.0,
            height: 2.0,
        }
    }

    fn rect(x: f64, y: f64, rotation: f64) -> RectangleComponent {
        RectangleComponent {
            x,
            y,
            width: 4.0,
            height: 2.0,
            depth: 1.0,
            rotation,
        }
    }

    #[test]
    fn test_circle_tangency_is_not_overlap() {
        let circle = CircleComponent {
            x: 5.0,
            y: 1.0,
            radius: 3.0,
            depth: 1.0,
        };
        // Leg right edge at x = 2, circle reaches exactly x = 2
        assert!(!leg_overlaps_circle(&leg(0.0, 0.0), &circle));
        let closer = CircleComponent { x: 4.99, ..circle };
        assert!(leg_overlaps_circle(&leg(0.0, 0.0), &closer));
    }

    #[test]
    fn test_circle_center_inside_leg() {
        let circle = CircleComponent {
            x: 1.0,
            y: 1.0,
            radius: 0.1,
            depth: 1.0,
        };
        assert!(leg_overlaps_circle(&leg(0.0, 0.0), &circle));
    }

    #[test]
    fn test_axis_aligned_touching_edges_do_not_overlap() {
        // Rectangle spans x in [2, 6]
        assert!(!leg_overlaps_rectangle(&leg(0.0, 0.0), &rect(4.0, 1.0, 0.0)));
        assert!(leg_overlaps_rectangle(&leg(0.5, 0.0), &rect(4.0, 1.0, 0.0)));
    }

    #[test]
    fn test_rotated_rectangle_corner_inside_leg() {
        // 4x2 turned 90 degrees spans y in [-1, 3] around (1, 1)
        assert!(leg_overlaps_rectangle(&leg(0.5, 2.5), &rect(1.0, 1.0, 90.0)));
        assert!(!leg_overlaps_rectangle(&leg(10.0, 10.0), &rect(1.0, 1.0, 90.0)));
    }

    #[test]
    fn test_leg_inside_rotated_rectangle() {
        let big = RectangleComponent {
            x: 1.0,
            y: 1.0,
            width: 20.0,
            height: 20.0,
            depth: 1.0,
            rotation: 45.0,
        };
        // No rectangle corner lands in the leg; the leg corners land in the rectangle
        assert!(leg_overlaps_rectangle(&leg(0.0, 0.0), &big));
    }

    #[test]
    fn test_rotation_round_trip() {
        let center = DVec2::new(3.0, -2.0);
        let p = DVec2::new(7.5, 11.25);
        for degrees in [0.0, 15.0, 90.0, 181.0, 359.0] {
            let back = rotate_point(rotate_point(p, center, degrees), center, -degrees);
            assert!((back - p).length() < 1e-9);
        }
    }

    #[test]
    fn test_rectangle_corners_full_turn() {
        let plain = rectangle_corners(&rect(10.0, 20.0, 0.0));
        let turned = rectangle_corners(&rect(10.0, 20.0, 90.0));
        let center = DVec2::new(10.0, 20.0);
        for (corner, expected) in turned.iter().zip(plain) {
            let back = rotate_point(*corner, center, 270.0);
            assert!((back - expected).length() < 1e-9);
        }
    }

    #[test]
    fn test_circle_touching_leg_edge() {
        let circle = CircleComponent {
            x: 0.0,
            y: 0.0,
            radius: 5.0,
            depth: 1.0,
        };
        let touching = LegPlacement {
            x: 5.0,
            y: -1.0,
            width: 5.0,
            height: 2.0,
        };
        assert!(!leg_overlaps_circle(&touching, &circle));

        let inside = LegPlacement {
            x: 4.0,
            width: 6.0,
            ..touching
        };
        assert!(leg_overlaps_circle(&inside, &circle));
    }

    #[test]
    fn test_leg_is_blocked_by_any_component() {
        let circles = [CircleComponent {
            x: 50.0,
            y: 50.0,
            radius: 1.0,
            depth: 1.0,
        }];
        let rects = [rect(1.0, 1.0, 0.0)];
        assert!(leg_is_blocked(&leg(0.0, 0.0), &circles, &rects));
        assert!(!leg_is_blocked(&leg(20.0, 20.0), &circles, &rects));
        assert!(!leg_is_blocked(&leg(0.0, 0.0), &[], &[]));
    }
}
