//! The overlay editing session.
//!
//! Owns the viewport, the crop frame, the annotations, and the input
//! controller, and applies UI requests (resize, ratio, mode, delete) to them.

use framecam_common::config::OverlayConfig;
use framecam_common::error::FramecamResult;
use framecam_overlay_model::annotation::{AnnotationStore, GuideLine};
use framecam_overlay_model::event::PointerEvent;
use framecam_overlay_model::geometry::{Frame, Point, ViewportSize, FRAME_MARGIN};
use framecam_overlay_model::mode::Mode;
use framecam_overlay_model::ratio::{parse_ratio, AspectRatio};
use framecam_overlay_model::scene::OverlayScene;

use crate::controller::{CreationSettings, InputController, PointerOutcome};

/// Layout and creation parameters for an editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorSettings {
    pub frame_margin: f64,
    pub creation: CreationSettings,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            frame_margin: FRAME_MARGIN,
            creation: CreationSettings::default(),
        }
    }
}

impl From<&OverlayConfig> for EditorSettings {
    fn from(config: &OverlayConfig) -> Self {
        Self {
            frame_margin: config.frame_margin,
            creation: CreationSettings {
                hit_threshold: config.hit_threshold,
                slant_length_factor: config.slant_length_factor,
                slant_angle_rad: config.slant_angle_deg.to_radians(),
            },
        }
    }
}

/// Single-threaded overlay session driven by UI and pointer events.
#[derive(Debug, Clone)]
pub struct OverlayEditor {
    viewport: ViewportSize,
    ratio: AspectRatio,
    frame_margin: f64,
    frame: Frame,
    store: AnnotationStore,
    controller: InputController,
}

impl OverlayEditor {
    /// Create an editor in dot mode with default settings.
    pub fn new(viewport: ViewportSize, ratio: AspectRatio) -> Self {
        Self::with_settings(viewport, ratio, Mode::default(), EditorSettings::default())
    }

    pub fn with_settings(
        viewport: ViewportSize,
        ratio: AspectRatio,
        mode: Mode,
        settings: EditorSettings,
    ) -> Self {
        Self {
            viewport,
            ratio,
            frame_margin: settings.frame_margin,
            frame: Frame::compute_with_margin(viewport, ratio, settings.frame_margin),
            store: AnnotationStore::new(),
            controller: InputController::new(mode, settings.creation),
        }
    }

    /// Build an editor from the overlay config section.
    ///
    /// An invalid default ratio or mode falls back to 1:1 / dot mode.
    pub fn from_config(config: &OverlayConfig, viewport: ViewportSize) -> Self {
        let ratio = parse_ratio(&config.default_ratio).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid default ratio in config, using 1");
            AspectRatio::SQUARE
        });
        let mode = config.default_mode.parse::<Mode>().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Invalid default mode in config, using dot");
            Mode::Dot
        });
        Self::with_settings(viewport, ratio, mode, EditorSettings::from(config))
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn ratio(&self) -> AspectRatio {
        self.ratio
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn mode(&self) -> Mode {
        self.controller.mode()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    /// The delete affordance is shown exactly while a guide is selected.
    pub fn delete_control_visible(&self) -> bool {
        self.store.selected_line().is_some()
    }

    /// Recompute the frame for a new viewport size. Returns whether anything changed.
    pub fn resize(&mut self, viewport: ViewportSize) -> bool {
        if viewport == self.viewport {
            return false;
        }
        self.viewport = viewport;
        self.recompute_frame();
        true
    }

    pub fn set_ratio(&mut self, ratio: AspectRatio) {
        self.ratio = ratio;
        self.recompute_frame();
    }

    /// Parse and apply a ratio expression. Rejected input leaves the frame untouched.
    pub fn set_ratio_expr(&mut self, expr: &str) -> FramecamResult<AspectRatio> {
        match parse_ratio(expr) {
            Ok(ratio) => {
                self.set_ratio(ratio);
                Ok(ratio)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Ratio request rejected");
                Err(e)
            }
        }
    }

    /// Switch the interaction mode, cancelling any drag.
    pub fn set_mode(&mut self, mode: Mode) {
        self.controller.set_mode(mode);
    }

    /// Delete the selected guide. No-op without a selection.
    pub fn delete_selected(&mut self) -> Option<GuideLine> {
        self.controller.cancel_drag();
        let removed = self.store.remove_selected();
        if let Some(line) = removed {
            tracing::debug!(orientation = ?line.orientation(), "Guide deleted");
        }
        removed
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        match event {
            PointerEvent::Down { x, y } => self.pointer_down(Point::new(x, y)),
            PointerEvent::Move { x, y } => self.pointer_move(Point::new(x, y)),
            PointerEvent::Up => self.pointer_up(),
        }
    }

    pub fn pointer_down(&mut self, p: Point) -> PointerOutcome {
        self.controller.pointer_down(p, &mut self.store, &self.frame)
    }

    pub fn pointer_move(&mut self, p: Point) -> PointerOutcome {
        self.controller.pointer_move(p, &mut self.store, &self.frame)
    }

    pub fn pointer_up(&mut self) -> PointerOutcome {
        self.controller.pointer_up()
    }

    /// Immutable snapshot for one paint pass.
    pub fn scene(&self) -> OverlayScene<'_> {
        OverlayScene::new(self.viewport, &self.frame, &self.store)
    }

    fn recompute_frame(&mut self) {
        self.frame = Frame::compute_with_margin(self.viewport, self.ratio, self.frame_margin);
        tracing::debug!(
            x = self.frame.x,
            y = self.frame.y,
            w = self.frame.w,
            h = self.frame.h,
            ratio = %self.ratio,
            "Frame recomputed"
        );
    }
}
