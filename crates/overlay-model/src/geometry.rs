//! Crop frame layout and the pure geometry used for hit-testing.
//!
//! Everything here is total over finite inputs: degenerate viewports and
//! zero-length segments produce well-defined (if degenerate) answers.

use serde::{Deserialize, Serialize};

use crate::annotation::GuideLine;
use crate::ratio::AspectRatio;

/// Fraction of the limiting viewport dimension the frame occupies.
pub const FRAME_MARGIN: f64 = 0.92;

/// Pointer distance (px) under which a guide line counts as hit.
pub const DEFAULT_HIT_THRESHOLD: f64 = 18.0;

/// A point in viewport pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Size of the live viewport in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are finite and positive.
    pub fn is_drawable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// The centered crop rectangle of a fixed aspect ratio.
///
/// Recomputed on viewport resize or ratio change, immutable otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
    /// Requested width/height ratio.
    pub ratio: AspectRatio,
}

impl Frame {
    /// Largest rectangle of `ratio` fitting in `margin` of the viewport, centered.
    ///
    /// A viewport that is not drawable yields a zero-size frame at its center.
    pub fn compute_with_margin(viewport: ViewportSize, ratio: AspectRatio, margin: f64) -> Self {
        if !viewport.is_drawable() {
            let cx = if viewport.width.is_finite() { viewport.width.max(0.0) / 2.0 } else { 0.0 };
            let cy = if viewport.height.is_finite() { viewport.height.max(0.0) / 2.0 } else { 0.0 };
            return Self {
                x: cx,
                y: cy,
                w: 0.0,
                h: 0.0,
                ratio,
            };
        }

        let margin = if margin.is_finite() { margin.clamp(0.0, 1.0) } else { FRAME_MARGIN };
        let (vw, vh) = (viewport.width, viewport.height);
        let r = ratio.get();

        let (w, h) = if vw / vh > r {
            let h = vh * margin;
            (h * r, h)
        } else {
            let w = vw * margin;
            (w, w / r)
        };

        Self {
            x: (vw - w) / 2.0,
            y: (vh - h) / 2.0,
            w,
            h,
            ratio,
        }
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Clamp a horizontal offset into `[x, x + w]`.
    pub fn clamp_x(&self, x: f64) -> f64 {
        x.max(self.x).min(self.right())
    }

    /// Clamp a vertical offset into `[y, y + h]`.
    pub fn clamp_y(&self, y: f64) -> f64 {
        y.max(self.y).min(self.bottom())
    }

    /// Clamp a point into the frame.
    pub fn clamp_point(&self, p: Point) -> Point {
        Point::new(self.clamp_x(p.x), self.clamp_y(p.y))
    }

    /// Whether the frame lies fully inside the viewport.
    pub fn fits_within(&self, viewport: ViewportSize) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.right() <= viewport.width
            && self.bottom() <= viewport.height
    }
}

/// Compute the crop frame for a viewport with the standard margin.
pub fn compute_frame(viewport: ViewportSize, ratio: AspectRatio) -> Frame {
    Frame::compute_with_margin(viewport, ratio, FRAME_MARGIN)
}

/// Inclusive point-in-frame test.
pub fn is_inside_frame(p: Point, frame: &Frame) -> bool {
    frame.contains(p)
}

/// Euclidean distance from `p` to the finite segment `a`–`b`.
///
/// The projection parameter is clamped to the segment. A zero-length
/// segment yields the distance to its (single) endpoint.
pub fn distance_point_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;

    let t = if len_sq > 0.0 {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };

    p.distance_to(&Point::new(a.x + dx * t, a.y + dy * t))
}

/// Index of the first guide line (in storage order) within `threshold` of `p`.
///
/// Vertical and horizontal lines also require `p` to lie within the frame's
/// extent along the line. Slanted lines use plain segment distance.
pub fn hit_test_line(p: Point, lines: &[GuideLine], frame: &Frame, threshold: f64) -> Option<usize> {
    lines.iter().position(|line| match *line {
        GuideLine::Vertical { x } => {
            (p.x - x).abs() < threshold && p.y >= frame.y && p.y <= frame.bottom()
        }
        GuideLine::Horizontal { y } => {
            (p.y - y).abs() < threshold && p.x >= frame.x && p.x <= frame.right()
        }
        GuideLine::Slanted { x1, y1, x2, y2 } => {
            distance_point_to_segment(p, Point::new(x1, y1), Point::new(x2, y2)) < threshold
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn square_frame_800x600() -> Frame {
        compute_frame(ViewportSize::new(800.0, 600.0), AspectRatio::SQUARE)
    }

    #[test]
    fn test_square_frame_in_landscape_viewport() {
        let frame = square_frame_800x600();
        assert!((frame.w - 552.0).abs() < 1e-9);
        assert!((frame.h - 552.0).abs() < 1e-9);
        assert!((frame.x - 124.0).abs() < 1e-9);
        assert!((frame.y - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_tall_ratio_is_width_limited_in_portrait() {
        let ratio = AspectRatio::new(16.0 / 9.0).unwrap();
        let frame = compute_frame(ViewportSize::new(400.0, 800.0), ratio);
        assert!((frame.w - 368.0).abs() < 1e-9);
        assert!((frame.h - 368.0 * 9.0 / 16.0).abs() < 1e-9);
        assert!((frame.x - 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_viewport_yields_zero_frame() {
        let frame = compute_frame(ViewportSize::new(0.0, 600.0), AspectRatio::SQUARE);
        assert_eq!(frame.w, 0.0);
        assert_eq!(frame.h, 0.0);
        assert_eq!(frame.x, 0.0);
        assert_eq!(frame.y, 300.0);

        let frame = compute_frame(ViewportSize::new(f64::NAN, -5.0), AspectRatio::SQUARE);
        assert_eq!((frame.x, frame.y, frame.w, frame.h), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn test_inside_frame_is_inclusive() {
        let frame = square_frame_800x600();
        assert!(is_inside_frame(Point::new(124.0, 24.0), &frame));
        assert!(is_inside_frame(Point::new(676.0, 576.0), &frame));
        assert!(!is_inside_frame(Point::new(123.9, 300.0), &frame));
        assert!(!is_inside_frame(Point::new(400.0, 576.1), &frame));
    }

    #[test]
    fn test_segment_distance_projection_and_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_point_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((distance_point_to_segment(Point::new(-3.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((distance_point_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert_eq!(distance_point_to_segment(Point::new(7.0, 0.0), a, b), 0.0);
    }

    #[test]
    fn test_zero_length_segment_uses_endpoint() {
        let a = Point::new(2.0, 2.0);
        assert!((distance_point_to_segment(Point::new(5.0, 6.0), a, a) - 5.0).abs() < 1e-12);
        assert_eq!(distance_point_to_segment(a, a, a), 0.0);
    }

    #[test]
    fn test_vertical_hit_respects_frame_span() {
        let frame = square_frame_800x600();
        let lines = [GuideLine::Vertical { x: 400.0 }];
        assert_eq!(hit_test_line(Point::new(400.0, 300.0), &lines, &frame, 18.0), Some(0));
        assert_eq!(hit_test_line(Point::new(417.9, 24.0), &lines, &frame, 18.0), Some(0));
        assert_eq!(hit_test_line(Point::new(400.0, 10.0), &lines, &frame, 18.0), None);
        assert_eq!(hit_test_line(Point::new(400.0, 590.0), &lines, &frame, 18.0), None);
        // strictly less than the threshold
        assert_eq!(hit_test_line(Point::new(418.0, 300.0), &lines, &frame, 18.0), None);
    }

    #[test]
    fn test_horizontal_hit_respects_frame_span() {
        let frame = square_frame_800x600();
        let lines = [GuideLine::Horizontal { y: 300.0 }];
        assert_eq!(hit_test_line(Point::new(130.0, 310.0), &lines, &frame, 18.0), Some(0));
        assert_eq!(hit_test_line(Point::new(100.0, 300.0), &lines, &frame, 18.0), None);
    }

    #[test]
    fn test_slanted_hit_ignores_frame() {
        let frame = square_frame_800x600();
        let lines = [GuideLine::Slanted {
            x1: 0.0,
            y1: 0.0,
            x2: 100.0,
            y2: 0.0,
        }];
        assert_eq!(hit_test_line(Point::new(50.0, 5.0), &lines, &frame, 18.0), Some(0));
        assert_eq!(hit_test_line(Point::new(50.0, 30.0), &lines, &frame, 18.0), None);
    }

    #[test]
    fn test_first_hit_wins_over_nearest() {
        let frame = square_frame_800x600();
        let lines = [
            GuideLine::Vertical { x: 390.0 },
            GuideLine::Vertical { x: 400.0 },
        ];
        // The pointer sits exactly on line 1, yet line 0 is also within range.
        assert_eq!(hit_test_line(Point::new(400.0, 300.0), &lines, &frame, 18.0), Some(0));
    }

    #[test]
    fn test_empty_lines_never_hit() {
        let frame = square_frame_800x600();
        assert_eq!(hit_test_line(Point::new(400.0, 300.0), &[], &frame, 18.0), None);
    }

    proptest! {
        #[test]
        fn prop_frame_is_centered_contained_and_ratio_preserving(
            vw in 1.0f64..4000.0,
            vh in 1.0f64..4000.0,
            r in 0.05f64..20.0,
        ) {
            let viewport = ViewportSize::new(vw, vh);
            let frame = compute_frame(viewport, AspectRatio::new(r).unwrap());

            prop_assert!(frame.fits_within(viewport));
            prop_assert!(((frame.x + frame.w / 2.0) - vw / 2.0).abs() < 1e-6);
            prop_assert!(((frame.y + frame.h / 2.0) - vh / 2.0).abs() < 1e-6);
            prop_assert!((frame.w / frame.h - r).abs() < 1e-9 * r.max(1.0));
        }

        #[test]
        fn prop_segment_distance_is_symmetric(
            px in -500.0f64..500.0, py in -500.0f64..500.0,
            ax in -500.0f64..500.0, ay in -500.0f64..500.0,
            bx in -500.0f64..500.0, by in -500.0f64..500.0,
        ) {
            let (p, a, b) = (Point::new(px, py), Point::new(ax, ay), Point::new(bx, by));
            let forward = distance_point_to_segment(p, a, b);
            let backward = distance_point_to_segment(p, b, a);
            prop_assert!(forward >= 0.0);
            prop_assert!((forward - backward).abs() < 1e-6);
        }

        #[test]
        fn prop_points_on_segment_have_zero_distance(
            ax in -500i32..500, ay in -500i32..500,
            bx in -500i32..500, by in -500i32..500,
            step in 0u32..=4,
        ) {
            // Quarter steps along an integer segment are exactly representable.
            let (a, b) = (Point::new(ax as f64, ay as f64), Point::new(bx as f64, by as f64));
            let t = step as f64 / 4.0;
            let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
            prop_assert!(distance_point_to_segment(p, a, b) < 1e-9);
        }

        #[test]
        fn prop_points_off_the_line_have_positive_distance(
            ax in -500.0f64..500.0,
            len in 1.0f64..500.0,
            y in -500.0f64..500.0,
            offset in 0.5f64..100.0,
            along in 0.0f64..1.0,
        ) {
            let (a, b) = (Point::new(ax, y), Point::new(ax + len, y));
            let p = Point::new(ax + len * along, y + offset);
            prop_assert!(distance_point_to_segment(p, a, b) > 0.0);
        }
    }
}
