use std::time::Instant;

use eframe::egui::{self, Color32};
use framecam_camera::{CameraSession, CameraStatus};
use framecam_common::config::AppConfig;
use framecam_common::tick::RedrawTicker;
use framecam_input::OverlayEditor;
use framecam_overlay_model::{Mode, ViewportSize};
use framecam_render_engine::{CaptureExporter, OverlayCanvas, RenderOptions};

use crate::camera::{CameraLink, CameraMessage};
use crate::canvas::{map_pointer_event, FULL_UV};
use crate::menu::{Menu, MenuState};
use crate::presenter::WindowPresenter;

const CREATION_MODES: [Mode; 4] = [Mode::Dot, Mode::Vertical, Mode::Horizontal, Mode::Slanted];

pub struct ViewfinderApp {
    _runtime: tokio::runtime::Runtime,
    camera: CameraLink,
    editor: OverlayEditor,
    ratio_presets: Vec<String>,
    canvas: OverlayCanvas,
    preview_options: RenderOptions,
    exporter: CaptureExporter,
    presenter: WindowPresenter,
    ticker: RedrawTicker,
    menus: MenuState,
    ratio_input: String,
    status: String,
    video_texture: Option<egui::TextureHandle>,
    video_sequence: u64,
    overlay_texture: Option<egui::TextureHandle>,
}

impl ViewfinderApp {
    pub fn new(config: AppConfig, runtime: tokio::runtime::Runtime, session: CameraSession) -> Self {
        let editor = OverlayEditor::from_config(&config.overlay, ViewportSize::new(0.0, 0.0));
        let mut camera = CameraLink::new(runtime.handle().clone(), session);
        camera.start();

        Self {
            _runtime: runtime,
            camera,
            ratio_input: config.overlay.default_ratio.clone(),
            editor,
            ratio_presets: config.overlay.ratio_presets.clone(),
            canvas: OverlayCanvas::new(),
            preview_options: RenderOptions::preview(),
            exporter: CaptureExporter::from_config(&config.capture),
            presenter: WindowPresenter::default(),
            ticker: RedrawTicker::new(config.preview.tick_hz),
            menus: MenuState::default(),
            status: "Starting camera\u{2026}".to_string(),
            video_texture: None,
            video_sequence: 0,
            overlay_texture: None,
        }
    }

    fn apply_ratio(&mut self, expr: &str) {
        match self.editor.set_ratio_expr(expr) {
            Ok(ratio) => {
                self.status = format!("Frame ratio {:.3}", ratio.get());
                self.ticker.mark_dirty();
            }
            Err(e) => self.status = e.to_string(),
        }
    }

    fn set_mode(&mut self, mode: Mode) {
        self.editor.set_mode(mode);
        self.menus.close();
        self.status = format!("Mode: {}", mode.label());
    }

    fn delete_selected(&mut self) {
        if self.editor.delete_selected().is_some() {
            self.ticker.mark_dirty();
        }
    }

    fn switch_camera(&mut self) {
        if self.camera.switch_to_next() {
            self.status = "Switching camera\u{2026}".to_string();
        }
    }

    fn poll_camera(&mut self) {
        match self.camera.poll() {
            Some(CameraMessage::Attached {
                label,
                position,
                count,
                ..
            }) => {
                self.video_sequence = 0;
                self.status = format!("Camera {position}/{count}: {label}");
            }
            Some(CameraMessage::Failed { job, error }) => {
                if error.is_recoverable() {
                    tracing::warn!(?job, error = %error, "Continuing without camera");
                } else {
                    tracing::error!(?job, error = %error, "Camera failed");
                }
                self.video_texture = None;
                self.status = format!("No camera, overlay only ({error})");
            }
            None => {}
        }
    }

    fn capture(&mut self) {
        let frame = self.camera.latest_frame();
        let video = frame.as_ref().map(|f| &f.image);
        match self
            .exporter
            .capture_and_present(video, &self.editor.scene(), &mut self.presenter)
        {
            Ok(()) => self.status = "Captured".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Capture failed");
                self.status = format!("Capture failed: {e}");
            }
        }
    }

    fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let frame_label = format!("Frame {:.2}", self.editor.ratio().get());
                if ui
                    .selectable_label(self.menus.is_open(Menu::Frame), frame_label)
                    .clicked()
                {
                    self.menus.toggle(Menu::Frame);
                }

                let line_label = format!("Draw: {}", self.editor.mode().label());
                if ui
                    .selectable_label(self.menus.is_open(Menu::Line), line_label)
                    .clicked()
                {
                    self.menus.toggle(Menu::Line);
                }

                if ui
                    .selectable_label(self.editor.mode() == Mode::Select, "Select")
                    .clicked()
                {
                    self.set_mode(Mode::Select);
                }

                if self.editor.delete_control_visible()
                    && ui
                        .add(egui::Button::new("Delete").fill(Color32::from_rgb(160, 48, 48)))
                        .clicked()
                {
                    self.delete_selected();
                }

                ui.separator();
                if ui
                    .add_enabled(!self.camera.is_busy(), egui::Button::new("Switch camera"))
                    .clicked()
                {
                    self.switch_camera();
                }
                if ui.button("Capture").clicked() {
                    self.capture();
                }

                ui.separator();
                ui.label(self.status.as_str());
            });

            match self.menus.open() {
                Some(Menu::Frame) => self.frame_menu(ui),
                Some(Menu::Line) => self.line_menu(ui),
                None => {}
            }
        });
    }

    fn frame_menu(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let mut picked = None;
            for preset in &self.ratio_presets {
                if ui.button(preset.as_str()).clicked() {
                    picked = Some(preset.clone());
                }
            }

            ui.separator();
            let entry = ui.add(egui::TextEdit::singleline(&mut self.ratio_input).desired_width(80.0));
            let submitted = entry.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Apply").clicked() || submitted {
                picked = Some(self.ratio_input.clone());
            }

            if let Some(expr) = picked {
                self.apply_ratio(&expr);
                self.menus.close();
            }
        });
    }

    fn line_menu(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for mode in CREATION_MODES {
                if ui
                    .selectable_label(self.editor.mode() == mode, mode.label())
                    .clicked()
                {
                    self.set_mode(mode);
                }
            }
        });
    }

    fn viewfinder(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        let viewport = ViewportSize::new(rect.width() as f64, rect.height() as f64);
        if self.editor.resize(viewport) {
            self.ticker.mark_dirty();
        }

        self.handle_pointer(ui.ctx(), rect, response.hovered());
        self.refresh_video_texture(ui.ctx());
        if self.ticker.should_redraw(Instant::now()) {
            self.refresh_overlay_texture(ui.ctx());
        }

        let painter = ui.painter_at(rect);
        match (&self.video_texture, self.camera.status()) {
            (Some(texture), Some(CameraStatus::Live)) => {
                painter.image(texture.id(), rect, FULL_UV, Color32::WHITE);
            }
            _ => {
                let note = if self.camera.is_busy() {
                    "Connecting camera\u{2026}"
                } else {
                    "No camera"
                };
                painter.text(
                    rect.center_bottom() - egui::vec2(0.0, 16.0),
                    egui::Align2::CENTER_BOTTOM,
                    note,
                    egui::FontId::proportional(14.0),
                    Color32::from_gray(160),
                );
            }
        }
        if let Some(texture) = &self.overlay_texture {
            painter.image(texture.id(), rect, FULL_UV, Color32::WHITE);
        }
    }

    fn handle_pointer(&mut self, ctx: &egui::Context, rect: egui::Rect, hovered: bool) {
        let events = ctx.input(|i| i.events.clone());
        for event in &events {
            let Some(pointer) = map_pointer_event(event, rect, hovered) else {
                continue;
            };
            let outcome = self.editor.handle_pointer(pointer);
            tracing::trace!(?pointer, ?outcome, "Pointer event");
            if outcome.needs_redraw() {
                self.ticker.mark_dirty();
            }
        }
    }

    fn refresh_video_texture(&mut self, ctx: &egui::Context) {
        let Some(frame) = self.camera.latest_frame() else {
            return;
        };
        if self.video_texture.is_some() && frame.sequence == self.video_sequence {
            return;
        }

        let (w, h) = frame.image.dimensions();
        let image =
            egui::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], frame.image.as_raw());
        upload(ctx, &mut self.video_texture, "camera", image);
        self.video_sequence = frame.sequence;
    }

    fn refresh_overlay_texture(&mut self, ctx: &egui::Context) {
        match self
            .canvas
            .render(&self.editor.scene(), &self.preview_options)
        {
            Ok(pixmap) => {
                let size = [pixmap.width() as usize, pixmap.height() as usize];
                let image = egui::ColorImage::from_rgba_premultiplied(size, pixmap.data());
                upload(ctx, &mut self.overlay_texture, "overlay", image);
            }
            Err(e) => tracing::debug!(error = %e, "Overlay not drawable"),
        }
    }
}

fn upload(
    ctx: &egui::Context,
    slot: &mut Option<egui::TextureHandle>,
    name: &str,
    image: egui::ColorImage,
) {
    match slot {
        Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
        None => *slot = Some(ctx.load_texture(name, image, egui::TextureOptions::LINEAR)),
    }
}

impl eframe::App for ViewfinderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_camera();
        self.toolbar(ctx);
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::BLACK))
            .show(ctx, |ui| self.viewfinder(ui));
        self.presenter.show(ctx);

        ctx.request_repaint_after(self.ticker.interval());
    }
}
