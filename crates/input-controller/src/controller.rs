//! Pointer state machine.
//!
//! Precedence on pointer-down: an existing guide under the pointer always
//! wins over creating something new, in every mode. Only hits arm a drag;
//! freshly created guides are selected but not dragged.

use framecam_overlay_model::annotation::{AnnotationStore, GuideLine, PointMarker};
use framecam_overlay_model::geometry::{hit_test_line, Frame, Point, DEFAULT_HIT_THRESHOLD};
use framecam_overlay_model::mode::Mode;

/// Parameters for hit-testing and guide creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreationSettings {
    /// Pointer distance (px) under which a guide is hit.
    pub hit_threshold: f64,
    /// Slanted guide length as a fraction of the frame width.
    pub slant_length_factor: f64,
    /// Slanted guide angle in radians (screen space, y down).
    pub slant_angle_rad: f64,
}

impl Default for CreationSettings {
    fn default() -> Self {
        Self {
            hit_threshold: DEFAULT_HIT_THRESHOLD,
            slant_length_factor: 0.75,
            slant_angle_rad: -std::f64::consts::FRAC_PI_4,
        }
    }
}

/// Why a pointer-down was dropped without effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Creation was requested outside the crop frame.
    OutsideFrame,
}

/// What a pointer event did to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// An existing guide was hit, selected, and armed for dragging.
    Selected { index: usize },
    /// Empty space was clicked in select mode; the selection was cleared.
    Deselected,
    /// A point marker was appended.
    DotPlaced,
    /// A guide was appended and selected.
    LineCreated { index: usize },
    /// Nothing was created.
    Ignored(IgnoreReason),
    /// The selected guide moved.
    Dragged { index: usize },
    /// A drag finished.
    DragEnded,
    /// The event had no effect.
    Idle,
}

impl PointerOutcome {
    /// Whether the overlay changed and should be repainted right away.
    pub fn needs_redraw(&self) -> bool {
        !matches!(self, PointerOutcome::Idle | PointerOutcome::DragEnded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragState {
    last: Point,
}

/// Mode-parameterized pointer state machine.
#[derive(Debug, Clone, Default)]
pub struct InputController {
    mode: Mode,
    drag: Option<DragState>,
    settings: CreationSettings,
}

impl InputController {
    pub fn new(mode: Mode, settings: CreationSettings) -> Self {
        Self {
            mode,
            drag: None,
            settings,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Switch modes. Any drag in progress is cancelled.
    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            tracing::debug!(from = %self.mode, to = %mode, "Mode changed");
        }
        self.mode = mode;
        self.cancel_drag();
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Drop the drag state so no stale drag continues.
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    pub fn pointer_down(
        &mut self,
        p: Point,
        store: &mut AnnotationStore,
        frame: &Frame,
    ) -> PointerOutcome {
        if let Some(index) = hit_test_line(p, store.lines(), frame, self.settings.hit_threshold) {
            store.select(index);
            self.drag = Some(DragState { last: p });
            tracing::trace!(index, x = p.x, y = p.y, "Guide hit");
            return PointerOutcome::Selected { index };
        }

        store.clear_selection();
        self.drag = None;

        if !self.mode.creates_annotations() {
            return PointerOutcome::Deselected;
        }

        if !frame.contains(p) {
            tracing::trace!(x = p.x, y = p.y, mode = %self.mode, "Creation outside frame ignored");
            return PointerOutcome::Ignored(IgnoreReason::OutsideFrame);
        }

        let line = match self.mode {
            Mode::Dot => {
                store.push_dot(PointMarker::new(p.x, p.y));
                return PointerOutcome::DotPlaced;
            }
            Mode::Vertical => GuideLine::vertical_in(frame, p.x),
            Mode::Horizontal => GuideLine::horizontal_in(frame, p.y),
            Mode::Slanted => GuideLine::slanted_through(
                frame.clamp_point(p),
                frame.w * self.settings.slant_length_factor,
                self.settings.slant_angle_rad,
            ),
            Mode::Select => return PointerOutcome::Deselected,
        };

        let index = store.push_line(line);
        tracing::debug!(index, orientation = ?line.orientation(), "Guide created");
        PointerOutcome::LineCreated { index }
    }

    pub fn pointer_move(
        &mut self,
        p: Point,
        store: &mut AnnotationStore,
        frame: &Frame,
    ) -> PointerOutcome {
        let Some(drag) = self.drag.as_mut() else {
            return PointerOutcome::Idle;
        };
        let Some(index) = store.selected() else {
            return PointerOutcome::Idle;
        };

        let (dx, dy) = (p.x - drag.last.x, p.y - drag.last.y);
        if !store.translate_line(index, dx, dy, frame) {
            return PointerOutcome::Idle;
        }
        drag.last = p;
        PointerOutcome::Dragged { index }
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        match self.drag.take() {
            Some(_) => PointerOutcome::DragEnded,
            None => PointerOutcome::Idle,
        }
    }
}
