//! Still capture: flatten the video frame and overlay into a PNG.

use std::io::Cursor;

use chrono::{DateTime, Utc};
use framecam_common::config::CaptureConfig;
use framecam_common::error::{FramecamError, FramecamResult};
use framecam_overlay_model::scene::OverlayScene;
use image::{ImageFormat, RgbaImage};
use tiny_skia::Pixmap;

use crate::pipeline::{new_surface, render_composite, RenderOptions};

/// An encoded capture, sized like the viewport it was taken from.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    /// PNG-encoded bytes.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub captured_at: DateTime<Utc>,
}

impl CapturedImage {
    /// Decode the PNG back into pixels for display.
    pub fn decode(&self) -> FramecamResult<RgbaImage> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)
            .map_err(|e| FramecamError::encode(format!("Failed to decode capture: {e}")))?;
        Ok(image.to_rgba8())
    }

    /// Suggested file name, e.g. `framecam-20260101-120000.png`.
    pub fn file_name(&self) -> String {
        format!("framecam-{}.png", self.captured_at.format("%Y%m%d-%H%M%S"))
    }
}

/// Receives finished captures, e.g. by opening them in a new view.
pub trait ImagePresenter {
    fn present(&mut self, image: CapturedImage) -> FramecamResult<()>;

    /// Presenter name for logging.
    fn name(&self) -> &str;
}

/// Runs the render pipeline against a frozen video frame.
#[derive(Debug, Clone, Copy)]
pub struct CaptureExporter {
    options: RenderOptions,
}

impl CaptureExporter {
    /// Exporter using the plain capture line style.
    pub fn new() -> Self {
        Self::with_options(RenderOptions::capture())
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::with_options(RenderOptions::capture().with_highlight(config.highlight_selection))
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Flatten `video` (if any) and the overlay in `scene` into a PNG.
    pub fn capture(
        &self,
        video: Option<&RgbaImage>,
        scene: &OverlayScene<'_>,
    ) -> FramecamResult<CapturedImage> {
        let mut pixmap = new_surface(scene.viewport)?;
        render_composite(&mut pixmap, video, scene, &self.options);

        let rgba = pixmap_to_rgba_image(&pixmap)?;
        let png = encode_png(&rgba)?;

        tracing::info!(
            width = rgba.width(),
            height = rgba.height(),
            bytes = png.len(),
            with_video = video.is_some(),
            "Capture encoded"
        );

        Ok(CapturedImage {
            png,
            width: rgba.width(),
            height: rgba.height(),
            captured_at: Utc::now(),
        })
    }

    /// Capture and hand the result to `presenter`.
    pub fn capture_and_present(
        &self,
        video: Option<&RgbaImage>,
        scene: &OverlayScene<'_>,
        presenter: &mut dyn ImagePresenter,
    ) -> FramecamResult<()> {
        let image = self.capture(video, scene)?;
        tracing::debug!(presenter = presenter.name(), "Presenting capture");
        presenter.present(image)
    }
}

impl Default for CaptureExporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a premultiplied surface into straight-alpha RGBA pixels.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> FramecamResult<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .ok_or_else(|| FramecamError::render("Surface size does not match pixel data"))
}

fn encode_png(image: &RgbaImage) -> FramecamResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| FramecamError::encode(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use framecam_overlay_model::annotation::AnnotationStore;
    use framecam_overlay_model::geometry::{compute_frame, ViewportSize};
    use framecam_overlay_model::ratio::AspectRatio;

    #[test]
    fn test_pixmap_conversion_demultiplies() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(200, 100, 0, 128));
        let image = pixmap_to_rgba_image(&pixmap).unwrap();
        let px = image.get_pixel(1, 0).0;
        assert_eq!(px[3], 128);
        assert!((px[0] as i32 - 200).abs() <= 2);
        assert!((px[1] as i32 - 100).abs() <= 2);
    }

    #[test]
    fn test_capture_without_video_is_overlay_only() {
        let viewport = ViewportSize::new(160.0, 120.0);
        let frame = compute_frame(viewport, AspectRatio::SQUARE);
        let store = AnnotationStore::new();
        let scene = OverlayScene::new(viewport, &frame, &store);

        let captured = CaptureExporter::new().capture(None, &scene).unwrap();
        assert_eq!((captured.width, captured.height), (160, 120));
        assert_eq!(&captured.png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = captured.decode().unwrap();
        assert_eq!(decoded.get_pixel(80, 60).0, [0, 0, 0, 0]);
        assert_eq!(decoded.get_pixel(5, 60).0[3], 115);
    }

    #[test]
    fn test_capture_rejects_empty_viewport() {
        let viewport = ViewportSize::new(0.0, 0.0);
        let frame = compute_frame(viewport, AspectRatio::SQUARE);
        let store = AnnotationStore::new();
        let scene = OverlayScene::new(viewport, &frame, &store);

        let err = CaptureExporter::new().capture(None, &scene).unwrap_err();
        assert!(matches!(err, FramecamError::Render { .. }));
    }

    #[test]
    fn test_from_config_controls_highlight() {
        let plain = CaptureExporter::from_config(&CaptureConfig::default());
        assert!(!plain.options().highlight_selection);
        assert_eq!(plain.options().line_width, 4.0);

        let glowing = CaptureExporter::from_config(&CaptureConfig {
            highlight_selection: true,
        });
        assert!(glowing.options().highlight_selection);
    }
}
