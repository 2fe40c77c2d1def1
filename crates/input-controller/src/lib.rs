//! Framecam Input Controller
//!
//! Interprets pointer events against the active mode and the annotation
//! store: hit-testing existing guides, creating markers and guides, and
//! drag-translating the selected guide. Everything runs on one logical
//! thread; events are applied in arrival order.
//!
//! Pointer events come from a pluggable [`PointerSource`] so that the
//! interactive window and scripted replays share one code path.

pub mod controller;
pub mod editor;
pub mod source;

pub use controller::{CreationSettings, IgnoreReason, InputController, PointerOutcome};
pub use editor::{EditorSettings, OverlayEditor};
pub use source::ScriptedPointerSource;

use framecam_overlay_model::event::PointerEvent;

/// Trait for pointer event sources.
pub trait PointerSource {
    /// Poll for the next pointer event. Returns `None` once the source is drained.
    fn poll(&mut self) -> Option<PointerEvent>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Feed every event from `source` into `editor`, returning the outcomes in order.
pub fn replay(source: &mut dyn PointerSource, editor: &mut OverlayEditor) -> Vec<PointerOutcome> {
    tracing::debug!(source = %source.name(), "Replaying pointer events");

    let mut outcomes = Vec::new();
    while let Some(event) = source.poll() {
        outcomes.push(editor.handle_pointer(event));
    }

    tracing::debug!(events = outcomes.len(), "Pointer replay finished");
    outcomes
}
