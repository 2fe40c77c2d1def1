//! Deterministic overlay paint sequence.
//!
//! The same steps run for the live preview and for captures; only the
//! [`RenderOptions`] and the optional video layer differ. Painting reads the
//! scene and never mutates it.

use framecam_common::error::{FramecamError, FramecamResult};
use framecam_overlay_model::geometry::{Point, ViewportSize};
use framecam_overlay_model::scene::OverlayScene;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use tiny_skia::{
    Color, ColorU8, FillRule, LineCap, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::style;

/// Per-target paint settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Paint the selected guide with the cyan glow style.
    pub highlight_selection: bool,
    /// Stroke width of unselected guides.
    pub line_width: f32,
    /// Opacity of the frame border.
    pub border_alpha: f32,
}

impl RenderOptions {
    /// Live preview: selection glow, 3px guides, slightly translucent border.
    pub fn preview() -> Self {
        Self {
            highlight_selection: true,
            line_width: style::LINE_WIDTH_PREVIEW,
            border_alpha: style::BORDER_ALPHA_PREVIEW,
        }
    }

    /// Still capture: every guide plain at 4px, opaque border.
    pub fn capture() -> Self {
        Self {
            highlight_selection: false,
            line_width: style::LINE_WIDTH_CAPTURE,
            border_alpha: style::BORDER_ALPHA_CAPTURE,
        }
    }

    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight_selection = highlight;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::preview()
    }
}

/// Pixel size of a surface covering `viewport`, or `None` if it has no area.
pub fn surface_size(viewport: ViewportSize) -> Option<(u32, u32)> {
    if !viewport.is_drawable() {
        return None;
    }
    let w = viewport.width.round() as u32;
    let h = viewport.height.round() as u32;
    (w > 0 && h > 0).then_some((w, h))
}

/// Allocate a transparent surface matching the viewport.
pub fn new_surface(viewport: ViewportSize) -> FramecamResult<Pixmap> {
    let (w, h) = surface_size(viewport).ok_or_else(|| {
        FramecamError::render(format!(
            "Viewport {}x{} has no drawable area",
            viewport.width, viewport.height
        ))
    })?;
    Pixmap::new(w, h)
        .ok_or_else(|| FramecamError::render(format!("Cannot allocate {w}x{h} surface")))
}

/// Paint mask, border, markers, and guides over a cleared surface.
pub fn render_overlay(pixmap: &mut Pixmap, scene: &OverlayScene<'_>, options: &RenderOptions) {
    pixmap.fill(Color::TRANSPARENT);
    paint_overlay(pixmap, scene, options);
}

/// Paint the video frame opaquely, stretched to the surface, then the overlay.
///
/// Without a frame the video layer is omitted and the result is overlay-only.
pub fn render_composite(
    pixmap: &mut Pixmap,
    video: Option<&RgbaImage>,
    scene: &OverlayScene<'_>,
    options: &RenderOptions,
) {
    pixmap.fill(Color::TRANSPARENT);
    if let Some(frame) = video {
        paint_video(pixmap, frame);
    }
    paint_overlay(pixmap, scene, options);
}

/// Reusable preview surface, reallocated only when the viewport size changes.
#[derive(Default)]
pub struct OverlayCanvas {
    pixmap: Option<Pixmap>,
}

impl OverlayCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repaint the overlay for `scene` and return the surface.
    pub fn render(
        &mut self,
        scene: &OverlayScene<'_>,
        options: &RenderOptions,
    ) -> FramecamResult<&Pixmap> {
        let size = surface_size(scene.viewport);
        let reuse = matches!(
            (&self.pixmap, size),
            (Some(p), Some((w, h))) if p.width() == w && p.height() == h
        );
        if !reuse {
            self.pixmap = Some(new_surface(scene.viewport)?);
        }

        let pixmap = self
            .pixmap
            .as_mut()
            .ok_or_else(|| FramecamError::render("Preview surface missing"))?;
        render_overlay(pixmap, scene, options);
        Ok(&*pixmap)
    }
}

fn paint_overlay(pixmap: &mut Pixmap, scene: &OverlayScene<'_>, options: &RenderOptions) {
    paint_mask(pixmap, scene);
    paint_border(pixmap, scene, options);
    paint_dots(pixmap, scene);
    paint_lines(pixmap, scene, options);
}

fn paint_video(pixmap: &mut Pixmap, frame: &RgbaImage) {
    let (w, h) = (pixmap.width(), pixmap.height());
    let stretched;
    let source = if frame.width() == w && frame.height() == h {
        frame
    } else {
        stretched = imageops::resize(frame, w, h, FilterType::Triangle);
        &stretched
    };

    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(source.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
}

fn paint_mask(pixmap: &mut Pixmap, scene: &OverlayScene<'_>) {
    let (vw, vh) = (pixmap.width() as f32, pixmap.height() as f32);
    let frame = scene.frame;
    let (fx, fy) = (frame.x as f32, frame.y as f32);
    let (fr, fb) = (frame.right() as f32, frame.bottom() as f32);

    let paint = solid_paint([0, 0, 0], alpha_u8(style::MASK_ALPHA));
    let bands = [
        Rect::from_xywh(0.0, 0.0, vw, fy),
        Rect::from_xywh(0.0, fb, vw, vh - fb),
        Rect::from_xywh(0.0, fy, fx, fb - fy),
        Rect::from_xywh(fr, fy, vw - fr, fb - fy),
    ];
    for band in bands.into_iter().flatten() {
        pixmap.fill_rect(band, &paint, Transform::identity(), None);
    }
}

fn paint_border(pixmap: &mut Pixmap, scene: &OverlayScene<'_>, options: &RenderOptions) {
    let frame = scene.frame;
    let inset = style::BORDER_INSET;
    let Some(rect) = Rect::from_xywh(
        frame.x as f32 + inset,
        frame.y as f32 + inset,
        frame.w as f32 - 2.0 * inset,
        frame.h as f32 - 2.0 * inset,
    ) else {
        return;
    };

    let path = PathBuilder::from_rect(rect);
    let paint = solid_paint([255, 255, 255], alpha_u8(options.border_alpha));
    let stroke = Stroke {
        width: style::BORDER_WIDTH,
        ..Default::default()
    };
    pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
}

fn paint_dots(pixmap: &mut Pixmap, scene: &OverlayScene<'_>) {
    let fill = solid_paint(style::DOT_FILL, 255);
    let outline = solid_paint([255, 255, 255], 255);
    let stroke = Stroke {
        width: style::DOT_OUTLINE_WIDTH,
        ..Default::default()
    };

    for dot in scene.dots() {
        let Some(circle) = PathBuilder::from_circle(dot.x as f32, dot.y as f32, style::DOT_RADIUS)
        else {
            continue;
        };
        pixmap.fill_path(&circle, &fill, FillRule::Winding, Transform::identity(), None);
        pixmap.stroke_path(&circle, &outline, &stroke, Transform::identity(), None);
    }
}

fn paint_lines(pixmap: &mut Pixmap, scene: &OverlayScene<'_>, options: &RenderOptions) {
    for (index, line) in scene.lines().iter().enumerate() {
        let (a, b) = line.endpoints(scene.frame);
        let Some(path) = segment_path(a, b) else {
            continue;
        };

        if options.highlight_selection && scene.selected() == Some(index) {
            paint_glow(pixmap, &path);
            stroke_segment(pixmap, &path, style::SELECTED_COLOR, 255, style::SELECTED_WIDTH);
        } else {
            stroke_segment(pixmap, &path, style::LINE_COLOR, 255, options.line_width);
        }
    }
}

/// Approximate a blurred shadow with widening translucent strokes.
fn paint_glow(pixmap: &mut Pixmap, path: &Path) {
    for pass in 1..=style::GLOW_PASSES {
        let spread = style::GLOW_RADIUS * pass as f32 / style::GLOW_PASSES as f32;
        stroke_segment(
            pixmap,
            path,
            style::SELECTED_COLOR,
            style::GLOW_PASS_ALPHA,
            style::SELECTED_WIDTH + spread,
        );
    }
}

fn stroke_segment(pixmap: &mut Pixmap, path: &Path, rgb: [u8; 3], alpha: u8, width: f32) {
    let paint = solid_paint(rgb, alpha);
    let stroke = Stroke {
        width,
        line_cap: LineCap::Butt,
        ..Default::default()
    };
    pixmap.stroke_path(path, &paint, &stroke, Transform::identity(), None);
}

fn segment_path(a: Point, b: Point) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(a.x as f32, a.y as f32);
    pb.line_to(b.x as f32, b.y as f32);
    pb.finish()
}

fn solid_paint([r, g, b]: [u8; 3], alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, alpha);
    paint.anti_alias = true;
    paint
}

fn alpha_u8(alpha: f32) -> u8 {
    (alpha.clamp(0.0, 1.0) * 255.0).round() as u8
}
