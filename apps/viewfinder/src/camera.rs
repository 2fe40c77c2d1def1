//! Camera acquisition off the UI thread.
//!
//! Opening a device can take up to the first-frame timeout, so start and
//! switch requests run on the tokio runtime and report back through a
//! channel that the UI polls once per frame.

use std::sync::{mpsc, Arc};

use framecam_camera::{CameraSession, CameraStatus, VideoFrame};
use framecam_common::error::FramecamError;
use tokio::runtime::Handle;
use tokio::sync::Mutex;

/// Background acquisition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraJob {
    Start,
    Switch,
}

/// Outcome of a finished [`CameraJob`].
#[derive(Debug)]
pub enum CameraMessage {
    Attached {
        job: CameraJob,
        label: String,
        /// 1-based position in the device list.
        position: usize,
        count: usize,
    },
    Failed {
        job: CameraJob,
        error: FramecamError,
    },
}

/// Shared handle to the camera session used by the UI.
///
/// At most one job runs at a time. While it runs, frame and status reads
/// return `None` instead of waiting, and the preview stays overlay-only.
pub struct CameraLink {
    runtime: Handle,
    session: Arc<Mutex<CameraSession>>,
    pending: Option<(CameraJob, mpsc::Receiver<CameraMessage>)>,
}

impl CameraLink {
    pub fn new(runtime: Handle, session: CameraSession) -> Self {
        Self {
            runtime,
            session: Arc::new(Mutex::new(session)),
            pending: None,
        }
    }

    /// Whether a start or switch is in flight.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Begin acquiring a camera, rear-facing first. False if busy.
    pub fn start(&mut self) -> bool {
        self.spawn(CameraJob::Start)
    }

    /// Begin cycling to the next device. False if busy.
    pub fn switch_to_next(&mut self) -> bool {
        self.spawn(CameraJob::Switch)
    }

    fn spawn(&mut self, job: CameraJob) -> bool {
        if self.is_busy() {
            return false;
        }

        let (tx, rx) = mpsc::channel();
        let session = Arc::clone(&self.session);
        self.runtime.spawn(async move {
            let mut session = session.lock().await;
            let result = match job {
                CameraJob::Start => session.start_prefer_rear().await,
                CameraJob::Switch => session.switch_to_next().await,
            };
            let message = match result {
                Ok(device) => CameraMessage::Attached {
                    job,
                    position: session
                        .devices()
                        .iter()
                        .position(|d| d.id == device.id)
                        .map_or(0, |i| i + 1),
                    count: session.devices().len(),
                    label: device.label,
                },
                Err(error) => CameraMessage::Failed { job, error },
            };
            let _ = tx.send(message);
        });

        tracing::debug!(?job, "Camera job started");
        self.pending = Some((job, rx));
        true
    }

    /// Take the result of the running job if it has finished. Never blocks.
    pub fn poll(&mut self) -> Option<CameraMessage> {
        let (job, receiver) = self.pending.as_ref()?;
        let message = match receiver.try_recv() {
            Ok(message) => message,
            Err(mpsc::TryRecvError::Empty) => return None,
            Err(mpsc::TryRecvError::Disconnected) => CameraMessage::Failed {
                job: *job,
                error: FramecamError::camera_unavailable("Camera worker disconnected"),
            },
        };
        self.pending = None;
        Some(message)
    }

    /// Latest frame, or `None` while a job holds the session.
    pub fn latest_frame(&self) -> Option<Arc<VideoFrame>> {
        self.session.try_lock().ok()?.latest_frame()
    }

    /// Session status, or `None` while a job holds the session.
    pub fn status(&self) -> Option<CameraStatus> {
        self.session.try_lock().ok().map(|s| s.status())
    }
}
