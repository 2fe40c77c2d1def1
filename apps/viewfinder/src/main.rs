mod app;
mod camera;
mod canvas;
mod menu;
mod presenter;

use eframe::egui;
use framecam_camera::{CameraSession, FfmpegCameraBackend};
use framecam_common::{config::AppConfig, logging::init_logging};

use crate::app::ViewfinderApp;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load();
    init_logging(&config.logging);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Framecam");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let backend = FfmpegCameraBackend::from_config(&config.camera);
    let camera = CameraSession::new(Box::new(backend), &config.camera);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Framecam")
            .with_inner_size([960.0, 720.0])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Framecam",
        options,
        Box::new(move |_cc| Box::new(ViewfinderApp::new(config, runtime, camera))),
    )
    .map_err(|e| anyhow::anyhow!("viewfinder launch failed: {e}"))
}
