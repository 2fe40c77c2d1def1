//! Mapping between egui input and canvas coordinates.

use eframe::egui::{self, PointerButton};
use framecam_overlay_model::event::PointerEvent;

/// Texture coordinates covering a whole texture.
pub const FULL_UV: egui::Rect =
    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));

/// Translate a raw egui event into a canvas-relative pointer event.
///
/// Presses count only when `accept_press` is set (the canvas is hovered and
/// not covered by another window). Moves and releases always pass through
/// so drags that leave the canvas keep tracking and always end.
pub fn map_pointer_event(
    event: &egui::Event,
    canvas: egui::Rect,
    accept_press: bool,
) -> Option<PointerEvent> {
    let to_canvas = |pos: egui::Pos2| {
        let rel = pos - canvas.min;
        (rel.x as f64, rel.y as f64)
    };

    match *event {
        egui::Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed: true,
            ..
        } if accept_press && canvas.contains(pos) => {
            let (x, y) = to_canvas(pos);
            Some(PointerEvent::down(x, y))
        }
        egui::Event::PointerButton {
            button: PointerButton::Primary,
            pressed: false,
            ..
        } => Some(PointerEvent::Up),
        egui::Event::PointerMoved(pos) => {
            let (x, y) = to_canvas(pos);
            Some(PointerEvent::moved(x, y))
        }
        _ => None,
    }
}
