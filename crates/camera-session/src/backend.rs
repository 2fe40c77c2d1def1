//! Camera backends.

use std::process::Stdio;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use framecam_common::config::CameraConfig;
use framecam_common::error::{FramecamError, FramecamResult};
use image::{Rgba, RgbaImage};
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStdout, Command};
use tokio::sync::watch;

use crate::device::{list_video_inputs, DeviceDescriptor};
use crate::stream::{VideoFrame, VideoStream};

/// Requested stream parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConstraints {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl StreamConstraints {
    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            fps: config.fps,
        }
    }

    fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Source of camera devices and streams.
#[async_trait::async_trait]
pub trait CameraBackend: Send + Sync {
    /// Enumerate video inputs.
    async fn list_video_inputs(&self) -> FramecamResult<Vec<DeviceDescriptor>>;

    /// Open `device`. Succeeds only once the first frame has arrived.
    async fn open(
        &self,
        device: &DeviceDescriptor,
        constraints: &StreamConstraints,
    ) -> FramecamResult<VideoStream>;

    /// Backend name.
    fn name(&self) -> &str;
}

/// Reads V4L2 devices through an `ffmpeg` child emitting raw RGBA frames.
pub struct FfmpegCameraBackend {
    binary: String,
    first_frame_timeout: Duration,
}

impl FfmpegCameraBackend {
    pub fn new(binary: impl Into<String>, first_frame_timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            first_frame_timeout,
        }
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.ffmpeg_binary.clone(),
            Duration::from_millis(config.first_frame_timeout_ms),
        )
    }

    fn spawn(
        &self,
        device: &DeviceDescriptor,
        constraints: &StreamConstraints,
    ) -> FramecamResult<Child> {
        let (w, h) = (constraints.width, constraints.height);
        Command::new(&self.binary)
            .args([
                "-loglevel",
                "error",
                "-nostats",
                "-f",
                "video4linux2",
                "-framerate",
                &constraints.fps.to_string(),
                "-i",
                &device.id,
                "-vf",
                &format!("scale={w}:{h}"),
                "-f",
                "rawvideo",
                "-pix_fmt",
                "rgba",
                "-",
            ])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                FramecamError::camera_unavailable(format!("Failed to start {}: {e}", self.binary))
            })
    }
}

#[async_trait::async_trait]
impl CameraBackend for FfmpegCameraBackend {
    async fn list_video_inputs(&self) -> FramecamResult<Vec<DeviceDescriptor>> {
        Ok(list_video_inputs())
    }

    async fn open(
        &self,
        device: &DeviceDescriptor,
        constraints: &StreamConstraints,
    ) -> FramecamResult<VideoStream> {
        if constraints.frame_len() == 0 {
            return Err(FramecamError::config(format!(
                "Invalid camera size {}x{}",
                constraints.width, constraints.height
            )));
        }

        let mut child = self.spawn(device, constraints)?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| FramecamError::camera_unavailable("ffmpeg stdout not captured"))?;

        let (tx, mut rx) = watch::channel(None);
        let reader = tokio::spawn(pump_frames(
            stdout,
            tx,
            (constraints.width, constraints.height),
            device.id.clone(),
        ));

        match tokio::time::timeout(self.first_frame_timeout, rx.changed()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => {
                reader.abort();
                reap(&mut child, &device.id).await;
                return Err(FramecamError::camera_unavailable(format!(
                    "{} closed before the first frame",
                    device.id
                )));
            }
            Err(_) => {
                reader.abort();
                reap(&mut child, &device.id).await;
                return Err(FramecamError::camera_unavailable(format!(
                    "No frame from {} within {} ms",
                    device.id,
                    self.first_frame_timeout.as_millis()
                )));
            }
        }

        tracing::info!(
            device = %device.id,
            label = %device.label,
            width = constraints.width,
            height = constraints.height,
            "Camera stream attached"
        );
        Ok(VideoStream::new(device.clone(), rx)
            .with_process(child)
            .with_reader(reader))
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

async fn reap(child: &mut Child, device_id: &str) {
    if let Err(e) = child.kill().await {
        tracing::debug!(device = %device_id, error = %e, "ffmpeg already exited");
    }
}

async fn pump_frames(
    mut stdout: ChildStdout,
    tx: watch::Sender<Option<Arc<VideoFrame>>>,
    (width, height): (u32, u32),
    device_id: String,
) {
    let mut buf = vec![0u8; width as usize * height as usize * 4];
    let mut sequence = 0u64;

    loop {
        if let Err(e) = stdout.read_exact(&mut buf).await {
            tracing::info!(device = %device_id, error = %e, "Camera stream ended");
            break;
        }
        let Some(image) = RgbaImage::from_raw(width, height, buf.clone()) else {
            break;
        };
        sequence += 1;
        if tx.send(Some(Arc::new(VideoFrame { image, sequence }))).is_err() {
            break;
        }
    }
}

/// Counters shared between a [`StubCameraBackend`] and test code.
#[derive(Debug, Clone, Default)]
pub struct StubProbe {
    live: Arc<AtomicUsize>,
    max_live: Arc<AtomicUsize>,
    opened: Arc<Mutex<Vec<String>>>,
}

impl StubProbe {
    /// Streams currently holding a device.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously live streams observed.
    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    /// Device ids passed to `open`, in call order.
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

/// In-memory backend producing solid-color frames.
pub struct StubCameraBackend {
    devices: Vec<DeviceDescriptor>,
    failing: Vec<String>,
    enumeration_fails: bool,
    open_delay: Option<Duration>,
    fill: [u8; 4],
    probe: StubProbe,
}

impl StubCameraBackend {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            devices,
            failing: Vec::new(),
            enumeration_fails: false,
            open_delay: None,
            fill: [200, 200, 200, 255],
            probe: StubProbe::default(),
        }
    }

    /// Make `open` fail for the device with this id.
    pub fn with_failing(mut self, id: impl Into<String>) -> Self {
        self.failing.push(id.into());
        self
    }

    pub fn with_failing_enumeration(mut self) -> Self {
        self.enumeration_fails = true;
        self
    }

    /// Make every `open` take `delay` before it succeeds or fails.
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    pub fn with_fill(mut self, fill: [u8; 4]) -> Self {
        self.fill = fill;
        self
    }

    pub fn probe(&self) -> StubProbe {
        self.probe.clone()
    }
}

#[async_trait::async_trait]
impl CameraBackend for StubCameraBackend {
    async fn list_video_inputs(&self) -> FramecamResult<Vec<DeviceDescriptor>> {
        if self.enumeration_fails {
            return Err(FramecamError::camera_unavailable("device enumeration failed"));
        }
        Ok(self.devices.clone())
    }

    async fn open(
        &self,
        device: &DeviceDescriptor,
        constraints: &StreamConstraints,
    ) -> FramecamResult<VideoStream> {
        if let Ok(mut opened) = self.probe.opened.lock() {
            opened.push(device.id.clone());
        }
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.contains(&device.id) {
            return Err(FramecamError::camera_unavailable(format!(
                "{} is busy",
                device.id
            )));
        }

        let live = self.probe.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.probe.max_live.fetch_max(live, Ordering::SeqCst);

        let image = RgbaImage::from_pixel(constraints.width, constraints.height, Rgba(self.fill));
        let (_tx, rx) = watch::channel(Some(Arc::new(VideoFrame { image, sequence: 1 })));
        let counter = self.probe.live.clone();
        Ok(VideoStream::new(device.clone(), rx).with_release_hook(move || {
            counter.fetch_sub(1, Ordering::SeqCst);
        }))
    }

    fn name(&self) -> &str {
        "stub"
    }
}
