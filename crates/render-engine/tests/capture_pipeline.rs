use framecam_common::error::FramecamResult;
use framecam_input::OverlayEditor;
use framecam_overlay_model::{AspectRatio, Mode, Point, ViewportSize};
use framecam_render_engine::{
    new_surface, render_overlay, CaptureExporter, CapturedImage, ImagePresenter, RenderOptions,
};
use image::{Rgba, RgbaImage};

#[derive(Default)]
struct CollectingPresenter {
    shown: Vec<CapturedImage>,
}

impl ImagePresenter for CollectingPresenter {
    fn present(&mut self, image: CapturedImage) -> FramecamResult<()> {
        self.shown.push(image);
        Ok(())
    }

    fn name(&self) -> &str {
        "collecting"
    }
}

fn annotated_editor() -> OverlayEditor {
    let mut editor = OverlayEditor::new(ViewportSize::new(800.0, 600.0), AspectRatio::SQUARE);
    editor.pointer_down(Point::new(300.0, 300.0));
    editor.pointer_up();
    editor.set_mode(Mode::Vertical);
    editor.pointer_down(Point::new(500.0, 300.0));
    editor.pointer_up();
    editor
}

#[test]
fn capture_flattens_video_and_overlay_at_viewport_size() {
    let editor = annotated_editor();
    let video = RgbaImage::from_pixel(1280, 720, Rgba([200, 200, 200, 255]));
    let mut presenter = CollectingPresenter::default();

    CaptureExporter::new()
        .capture_and_present(Some(&video), &editor.scene(), &mut presenter)
        .expect("capture should succeed");

    assert_eq!(presenter.shown.len(), 1);
    let captured = &presenter.shown[0];
    assert_eq!((captured.width, captured.height), (800, 600));
    assert!(captured.file_name().starts_with("framecam-"));

    let pixels = captured.decode().expect("capture should decode");
    assert_eq!(pixels.get_pixel(400, 300).0, [200, 200, 200, 255]);
    assert_eq!(pixels.get_pixel(300, 300).0, [0x4d, 0xa3, 0xff, 255]);
    assert_eq!(pixels.get_pixel(500, 300).0, [0, 255, 0, 255]);

    let masked = pixels.get_pixel(40, 300).0;
    assert_eq!(masked[3], 255);
    assert!((109..=111).contains(&masked[0]));
}

#[test]
fn capture_uses_frozen_state_and_plain_line_style() {
    let mut editor = annotated_editor();
    assert!(editor.delete_control_visible());

    let captured = CaptureExporter::new()
        .capture(None, &editor.scene())
        .expect("capture should succeed");

    editor.delete_selected();
    let mut preview = new_surface(editor.viewport()).expect("surface");
    render_overlay(&mut preview, &editor.scene(), &RenderOptions::preview());
    assert_eq!(preview.pixel(500, 300).map(|p| p.alpha()), Some(0));

    let pixels = captured.decode().expect("capture should decode");
    assert_eq!(pixels.get_pixel(500, 300).0, [0, 255, 0, 255]);
    assert_eq!(pixels.get_pixel(502, 300).0[3], 0);
}
