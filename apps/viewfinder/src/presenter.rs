//! Shows finished captures in their own windows.

use eframe::egui;
use framecam_common::error::FramecamResult;
use framecam_render_engine::{CapturedImage, ImagePresenter};

struct CaptureView {
    id: u64,
    title: String,
    image: egui::ColorImage,
    texture: Option<egui::TextureHandle>,
    open: bool,
}

/// [`ImagePresenter`] that opens each capture in a new egui window.
#[derive(Default)]
pub struct WindowPresenter {
    views: Vec<CaptureView>,
    next_id: u64,
}

impl WindowPresenter {
    /// Draw every open capture window and drop the closed ones.
    pub fn show(&mut self, ctx: &egui::Context) {
        for view in &mut self.views {
            let texture = view.texture.get_or_insert_with(|| {
                ctx.load_texture(
                    format!("capture-{}", view.id),
                    view.image.clone(),
                    egui::TextureOptions::LINEAR,
                )
            });
            let size = texture.size_vec2();
            let id = texture.id();

            egui::Window::new(view.title.as_str())
                .id(egui::Id::new(("capture", view.id)))
                .open(&mut view.open)
                .default_width(480.0)
                .show(ctx, |ui| {
                    ui.add(
                        egui::Image::from_texture(egui::load::SizedTexture::new(id, size))
                            .shrink_to_fit(),
                    );
                    ui.label(format!("{} x {}", size.x, size.y));
                });
        }
        self.views.retain(|view| view.open);
    }
}

impl ImagePresenter for WindowPresenter {
    fn present(&mut self, image: CapturedImage) -> FramecamResult<()> {
        let pixels = image.decode()?;
        let color = egui::ColorImage::from_rgba_unmultiplied(
            [pixels.width() as usize, pixels.height() as usize],
            pixels.as_raw(),
        );

        self.next_id += 1;
        self.views.push(CaptureView {
            id: self.next_id,
            title: image.file_name(),
            image: color,
            texture: None,
            open: true,
        });
        Ok(())
    }

    fn name(&self) -> &str {
        "window"
    }
}
