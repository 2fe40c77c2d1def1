//! A live video stream exposing its most recent frame.

use std::sync::Arc;

use image::RgbaImage;
use tokio::process::Child;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::device::DeviceDescriptor;

/// One decoded camera frame.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: RgbaImage,
    /// Increments per frame, starting at 1.
    pub sequence: u64,
}

type ReleaseHook = Box<dyn FnOnce() + Send + Sync>;

/// Handle to an attached camera.
///
/// Holds the capture hardware until [`VideoStream::stop`] is called or the
/// handle is dropped. [`VideoStream::shutdown`] additionally waits for the
/// capture process to exit, so the device is free when it returns.
pub struct VideoStream {
    device: DeviceDescriptor,
    frames: watch::Receiver<Option<Arc<VideoFrame>>>,
    process: Option<Child>,
    reader: Option<JoinHandle<()>>,
    on_release: Option<ReleaseHook>,
    active: bool,
}

impl VideoStream {
    pub fn new(device: DeviceDescriptor, frames: watch::Receiver<Option<Arc<VideoFrame>>>) -> Self {
        Self {
            device,
            frames,
            process: None,
            reader: None,
            on_release: None,
            active: true,
        }
    }

    /// Attach the capture process. It is killed on stop.
    pub fn with_process(mut self, process: Child) -> Self {
        self.process = Some(process);
        self
    }

    /// Attach the task that feeds frames. It is aborted on stop.
    pub fn with_reader(mut self, reader: JoinHandle<()>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Run `hook` once when the stream is released.
    pub fn with_release_hook(mut self, hook: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Most recent frame, if any has arrived.
    pub fn latest_frame(&self) -> Option<Arc<VideoFrame>> {
        if !self.active {
            return None;
        }
        self.frames.borrow().clone()
    }

    pub fn is_active(&self) -> bool {
        self.active && self.reader.as_ref().map_or(true, |r| !r.is_finished())
    }

    /// Release the device. Idempotent.
    ///
    /// The capture process is signalled before this returns but may not
    /// have exited yet; use [`VideoStream::shutdown`] to wait for it.
    pub fn stop(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Some(process) = self.process.as_mut() {
            if let Err(e) = process.start_kill() {
                tracing::debug!(device = %self.device.id, error = %e, "Capture process already exited");
            }
        }
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
        if let Some(hook) = self.on_release.take() {
            hook();
        }
        tracing::debug!(device = %self.device.id, "Video stream released");
    }

    /// Stop and wait until the capture process has exited.
    pub async fn shutdown(&mut self) {
        self.stop();
        if let Some(mut process) = self.process.take() {
            if let Err(e) = process.wait().await {
                tracing::warn!(device = %self.device.id, error = %e, "Failed to reap capture process");
            }
        }
    }
}

impl Drop for VideoStream {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for VideoStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoStream")
            .field("device", &self.device)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}
