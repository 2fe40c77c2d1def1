//! Point markers, guide lines, and the store that owns them.
//!
//! The store is the only place annotations are mutated. Selection is a
//! validated index into the line list and is cleared by every removal, so
//! it can never dangle.

use serde::{Deserialize, Serialize};

use crate::geometry::{Frame, Point};

/// A fixed marker placed inside the frame. Never moved after creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMarker {
    pub x: f64,
    pub y: f64,
}

impl PointMarker {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Orientation tag of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
    Slanted,
}

/// An alignment guide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "orientation", rename_all = "snake_case")]
pub enum GuideLine {
    /// Spans the frame's vertical extent at horizontal offset `x`.
    Vertical { x: f64 },
    /// Spans the frame's horizontal extent at vertical offset `y`.
    Horizontal { y: f64 },
    /// A free segment, not tied to the frame.
    Slanted { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl GuideLine {
    /// Vertical line with `x` clamped into the frame.
    pub fn vertical_in(frame: &Frame, x: f64) -> Self {
        Self::Vertical { x: frame.clamp_x(x) }
    }

    /// Horizontal line with `y` clamped into the frame.
    pub fn horizontal_in(frame: &Frame, y: f64) -> Self {
        Self::Horizontal { y: frame.clamp_y(y) }
    }

    /// Segment of `length` at `angle_rad`, centered on `center`.
    pub fn slanted_through(center: Point, length: f64, angle_rad: f64) -> Self {
        let dx = angle_rad.cos() * length / 2.0;
        let dy = angle_rad.sin() * length / 2.0;
        Self::Slanted {
            x1: center.x - dx,
            y1: center.y - dy,
            x2: center.x + dx,
            y2: center.y + dy,
        }
    }

    pub fn orientation(&self) -> Orientation {
        match self {
            Self::Vertical { .. } => Orientation::Vertical,
            Self::Horizontal { .. } => Orientation::Horizontal,
            Self::Slanted { .. } => Orientation::Slanted,
        }
    }

    /// Move by `(dx, dy)`. Vertical/horizontal lines only move along their
    /// free axis and stay clamped into the frame; slanted lines move freely.
    pub fn translate(&mut self, dx: f64, dy: f64, frame: &Frame) {
        match self {
            Self::Vertical { x } => *x = frame.clamp_x(*x + dx),
            Self::Horizontal { y } => *y = frame.clamp_y(*y + dy),
            Self::Slanted { x1, y1, x2, y2 } => {
                *x1 += dx;
                *y1 += dy;
                *x2 += dx;
                *y2 += dy;
            }
        }
    }

    /// Drawn endpoints: axis lines are clipped to the frame, slanted lines are literal.
    pub fn endpoints(&self, frame: &Frame) -> (Point, Point) {
        match *self {
            Self::Vertical { x } => (Point::new(x, frame.y), Point::new(x, frame.bottom())),
            Self::Horizontal { y } => (Point::new(frame.x, y), Point::new(frame.right(), y)),
            Self::Slanted { x1, y1, x2, y2 } => (Point::new(x1, y1), Point::new(x2, y2)),
        }
    }
}

/// In-memory owner of markers, lines, and the line selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnotationStore {
    dots: Vec<PointMarker>,
    lines: Vec<GuideLine>,
    selected: Option<usize>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dots(&self) -> &[PointMarker] {
        &self.dots
    }

    pub fn lines(&self) -> &[GuideLine] {
        &self.lines
    }

    /// Index of the selected line, if any.
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_line(&self) -> Option<&GuideLine> {
        self.selected.and_then(|idx| self.lines.get(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty() && self.lines.is_empty()
    }

    /// Append a marker. Markers are append-only.
    pub fn push_dot(&mut self, dot: PointMarker) {
        self.dots.push(dot);
    }

    /// Append a line and select it. Returns its index.
    pub fn push_line(&mut self, line: GuideLine) -> usize {
        self.lines.push(line);
        let idx = self.lines.len() - 1;
        self.selected = Some(idx);
        idx
    }

    /// Select the line at `idx`. Out-of-range indices leave the selection untouched.
    pub fn select(&mut self, idx: usize) -> bool {
        if idx < self.lines.len() {
            self.selected = Some(idx);
            true
        } else {
            false
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Remove the selected line and clear the selection.
    ///
    /// With nothing selected this is a no-op returning `None`.
    pub fn remove_selected(&mut self) -> Option<GuideLine> {
        let idx = self.selected.take()?;
        (idx < self.lines.len()).then(|| self.lines.remove(idx))
    }

    /// Translate the line at `idx` with orientation-specific clamping.
    pub fn translate_line(&mut self, idx: usize, dx: f64, dy: f64, frame: &Frame) -> bool {
        match self.lines.get_mut(idx) {
            Some(line) => {
                line.translate(dx, dy, frame);
                true
            }
            None => false,
        }
    }
}
