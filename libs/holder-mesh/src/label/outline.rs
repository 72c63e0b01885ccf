//! # Glyph Outlines
//!
//! Turns laid-out glyphs into flat contours, then groups them into filled
//! shapes with holes ready for extrusion.

use crate::primitives::text::signed_area2;
use crate::primitives::{TextOutline, TextShape};
use config::constants::{CURVE_FLATTEN_STEPS, LABEL_FONT_SIZE_STEP, LABEL_MAX_FONT_SIZE, LABEL_MIN_FONT_SIZE};
use glam::DVec2;
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};

/// Collects glyph contours as polylines, flipping rusttype's y-down
/// coordinates to y-up.
#[derive(Debug, Default)]
struct ContourCollector {
    contours: Vec<Vec<DVec2>>,
    current: Vec<DVec2>,
}

impl ContourCollector {
    fn point(x: f32, y: f32) -> DVec2 {
        DVec2::new(x as f64, -(y as f64))
    }

    fn last(&self) -> DVec2 {
        self.current.last().copied().unwrap_or(DVec2::ZERO)
    }

    fn finish_contour(&mut self) {
        if self.current.len() >= 3 {
            self.contours.push(std::mem::take(&mut self.current));
        } else {
            self.current.clear();
        }
    }
}

impl OutlineBuilder for ContourCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        self.finish_contour();
        self.current.push(Self::point(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.current.push(Self::point(x, y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let p0 = self.last();
        let p1 = Self::point(x1, y1);
        let p2 = Self::point(x, y);
        for i in 1..=CURVE_FLATTEN_STEPS {
            let t = i as f64 / CURVE_FLATTEN_STEPS as f64;
            let mt = 1.0 - t;
            self.current
                .push(p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t));
        }
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let p0 = self.last();
        let p1 = Self::point(x1, y1);
        let p2 = Self::point(x2, y2);
        let p3 = Self::point(x, y);
        for i in 1..=CURVE_FLATTEN_STEPS {
            let t = i as f64 / CURVE_FLATTEN_STEPS as f64;
            let mt = 1.0 - t;
            self.current.push(
                p0 * (mt * mt * mt)
                    + p1 * (3.0 * mt * mt * t)
                    + p2 * (3.0 * mt * t * t)
                    + p3 * (t * t * t),
            );
        }
    }

    fn close(&mut self) {
        self.finish_contour();
    }
}

/// Even-odd point in polygon test.
fn contains(ring: &[DVec2], p: DVec2) -> bool {
    let mut inside = false;
    let n = ring.len();
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Groups raw contours into shapes by nesting depth.
///
/// A contour inside an even number of others is filled; one inside an odd
/// number is a hole of the smallest filled contour around it.
pub fn group_contours(contours: Vec<Vec<DVec2>>) -> TextOutline {
    let areas: Vec<f64> = contours.iter().map(|c| signed_area2(c).abs()).collect();

    // Containers of each contour, tested with its first vertex
    let parents: Vec<Vec<usize>> = contours
        .iter()
        .enumerate()
        .map(|(i, contour)| {
            (0..contours.len())
                .filter(|&j| j != i && areas[j] > areas[i] && contains(&contours[j], contour[0]))
                .collect()
        })
        .collect();

    let mut shape_of = vec![None; contours.len()];
    let mut shapes: Vec<TextShape> = Vec::new();
    for (i, contour) in contours.iter().enumerate() {
        if parents[i].len() % 2 == 0 {
            shape_of[i] = Some(shapes.len());
            shapes.push(TextShape {
                outer: contour.clone(),
                holes: Vec::new(),
            });
        }
    }

    for (i, contour) in contours.iter().enumerate() {
        if parents[i].len() % 2 == 1 {
            let owner = parents[i]
                .iter()
                .filter(|&&j| shape_of[j].is_some())
                .min_by(|&&a, &&b| areas[a].total_cmp(&areas[b]))
                .and_then(|&j| shape_of[j]);
            if let Some(shape) = owner {
                shapes[shape].holes.push(contour.clone());
            }
        }
    }

    TextOutline { shapes }
}

/// Lays out `text` at `size` (one font unit = one millimeter) and returns its
/// grouped outline, y-up with the baseline at y = 0.
pub fn text_outline(font: &Font<'static>, text: &str, size: f32) -> TextOutline {
    let scale = Scale::uniform(size);
    let mut collector = ContourCollector::default();
    for glyph in font.layout(text, scale, rt_point(0.0, 0.0)) {
        glyph.build_outline(&mut collector);
        collector.finish_contour();
    }
    group_contours(collector.contours)
}

/// Width and height of the text at `size`, or `None` if nothing is drawn.
pub fn measure_text(font: &Font<'static>, text: &str, size: f32) -> Option<(f64, f64)> {
    let (min, max) = text_outline(font, text, size).bounds()?;
    let extent = max - min;
    Some((extent.x, extent.y))
}

/// Largest font size whose measured extent fits within `max_width` x
/// `max_height`, searching downward in whole steps.
///
/// # Example
///
/// ```rust
/// use holder_mesh::label::fit_font_size;
///
/// // Text 0.6 mm wide per point of size, 1 mm tall per point
/// let measure = |size: f32| Some((size as f64 * 0.6, size as f64));
/// assert_eq!(fit_font_size(measure, 6.0, 100.0), Some(10.0));
/// assert_eq!(fit_font_size(measure, 0.1, 100.0), None);
/// ```
pub fn fit_font_size(
    measure: impl Fn(f32) -> Option<(f64, f64)>,
    max_width: f64,
    max_height: f64,
) -> Option<f32> {
    let mut size = LABEL_MAX_FONT_SIZE;
    while size >= LABEL_MIN_FONT_SIZE {
        if let Some((width, height)) = measure(size) {
            if width <= max_width && height <= max_height {
                return Some(size);
            }
        }
        size -= LABEL_FONT_SIZE_STEP;
    }
    None
}
