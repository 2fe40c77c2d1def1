//! Camera acquisition with rear-first fallback.

use std::sync::Arc;

use framecam_common::config::CameraConfig;
use framecam_common::error::{FramecamError, FramecamResult};

use crate::backend::{CameraBackend, StreamConstraints};
use crate::device::{CameraFacing, DeviceDescriptor};
use crate::stream::{VideoFrame, VideoStream};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraStatus {
    /// Nothing attempted yet, or released.
    Idle,
    /// A stream is attached.
    Live,
    /// Acquisition failed; the preview runs overlay-only.
    Unavailable,
}

/// Owns at most one attached stream at a time.
pub struct CameraSession {
    backend: Box<dyn CameraBackend>,
    constraints: StreamConstraints,
    prefer_rear: bool,
    devices: Vec<DeviceDescriptor>,
    current: Option<usize>,
    stream: Option<VideoStream>,
    status: CameraStatus,
}

impl CameraSession {
    pub fn new(backend: Box<dyn CameraBackend>, config: &CameraConfig) -> Self {
        Self {
            backend,
            constraints: StreamConstraints::from_config(config),
            prefer_rear: config.prefer_rear,
            devices: Vec::new(),
            current: None,
            stream: None,
            status: CameraStatus::Idle,
        }
    }

    /// Current state. A stream whose capture process has ended reports
    /// [`CameraStatus::Unavailable`].
    pub fn status(&self) -> CameraStatus {
        match &self.stream {
            Some(stream) if self.status == CameraStatus::Live && !stream.is_active() => {
                CameraStatus::Unavailable
            }
            _ => self.status,
        }
    }

    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    /// Most recent frame of the attached stream.
    pub fn latest_frame(&self) -> Option<Arc<VideoFrame>> {
        self.stream.as_ref().and_then(VideoStream::latest_frame)
    }

    /// Refresh the device list from the backend.
    pub async fn enumerate_devices(&mut self) -> FramecamResult<&[DeviceDescriptor]> {
        let devices = self.backend.list_video_inputs().await?;
        tracing::debug!(
            backend = self.backend.name(),
            count = devices.len(),
            "Enumerated video inputs"
        );
        self.devices = devices;
        if self.current.is_some_and(|i| i >= self.devices.len()) {
            self.current = None;
        }
        Ok(&self.devices)
    }

    /// Attach a camera, trying environment-facing devices first when
    /// `prefer_rear` is set, then every other device in enumeration order.
    ///
    /// Total failure leaves the session [`CameraStatus::Unavailable`] and
    /// returns `CameraUnavailable`.
    pub async fn start_prefer_rear(&mut self) -> FramecamResult<DeviceDescriptor> {
        if let Err(e) = self.enumerate_devices().await {
            self.mark_unavailable().await;
            return Err(FramecamError::camera_unavailable(e.to_string()));
        }
        if self.devices.is_empty() {
            self.mark_unavailable().await;
            return Err(FramecamError::camera_unavailable("No video inputs found"));
        }

        for index in self.candidate_order() {
            match self.attach(index).await {
                Ok(device) => return Ok(device),
                Err(e) => {
                    tracing::warn!(
                        device = %self.devices[index].id,
                        error = %e,
                        "Camera failed, trying next"
                    );
                }
            }
        }

        self.mark_unavailable().await;
        Err(FramecamError::camera_unavailable(format!(
            "All {} video inputs failed",
            self.devices.len()
        )))
    }

    /// Attach the device at `index`. Any current stream is fully released,
    /// capture process included, before the new device is opened.
    pub async fn attach(&mut self, index: usize) -> FramecamResult<DeviceDescriptor> {
        self.release().await;

        let device = self
            .devices
            .get(index)
            .cloned()
            .ok_or_else(|| FramecamError::camera_unavailable(format!("No device at index {index}")))?;

        let stream = self.backend.open(&device, &self.constraints).await?;
        tracing::info!(device = %device.id, label = %device.label, facing = ?device.facing, "Camera attached");

        self.stream = Some(stream);
        self.current = Some(index);
        self.status = CameraStatus::Live;
        Ok(device)
    }

    /// Cycle to the next enumerated device.
    pub async fn switch_to_next(&mut self) -> FramecamResult<DeviceDescriptor> {
        if self.devices.is_empty() {
            self.enumerate_devices().await?;
        }
        if self.devices.is_empty() {
            self.mark_unavailable().await;
            return Err(FramecamError::camera_unavailable("No video inputs found"));
        }

        let next = self.current.map_or(0, |i| (i + 1) % self.devices.len());
        match self.attach(next).await {
            Ok(device) => Ok(device),
            Err(e) => {
                self.current = Some(next);
                self.mark_unavailable().await;
                Err(e)
            }
        }
    }

    /// Release the attached stream, if any.
    pub async fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.shutdown().await;
        }
        if self.status == CameraStatus::Live {
            self.status = CameraStatus::Idle;
        }
    }

    fn candidate_order(&self) -> Vec<usize> {
        let all = 0..self.devices.len();
        if !self.prefer_rear {
            return all.collect();
        }
        let (mut rear, rest): (Vec<usize>, Vec<usize>) =
            all.partition(|&i| self.devices[i].facing == CameraFacing::Environment);
        rear.extend(rest);
        rear
    }

    async fn mark_unavailable(&mut self) {
        self.release().await;
        self.status = CameraStatus::Unavailable;
        tracing::warn!("No camera available, continuing overlay-only");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{FfmpegCameraBackend, StubCameraBackend};
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    fn config() -> CameraConfig {
        CameraConfig {
            width: 8,
            height: 6,
            ..CameraConfig::default()
        }
    }

    fn devices() -> Vec<DeviceDescriptor> {
        vec![
            DeviceDescriptor::new("/dev/video0", "Integrated Webcam"),
            DeviceDescriptor::new("/dev/video2", "Rear Camera"),
            DeviceDescriptor::new("/dev/video4", "USB Capture"),
        ]
    }

    #[tokio::test]
    async fn test_prefers_rear_camera() {
        let backend = StubCameraBackend::new(devices());
        let probe = backend.probe();
        let mut session = CameraSession::new(Box::new(backend), &config());

        let device = session.start_prefer_rear().await.unwrap();
        assert_eq!(device.id, "/dev/video2");
        assert_eq!(session.status(), CameraStatus::Live);
        assert_eq!(probe.opened(), ["/dev/video2"]);
        assert_eq!(session.latest_frame().unwrap().image.dimensions(), (8, 6));
    }

    #[tokio::test]
    async fn test_falls_back_to_any_camera() {
        let backend = StubCameraBackend::new(devices()).with_failing("/dev/video2");
        let probe = backend.probe();
        let mut session = CameraSession::new(Box::new(backend), &config());

        let device = session.start_prefer_rear().await.unwrap();
        assert_eq!(device.id, "/dev/video0");
        assert_eq!(probe.opened(), ["/dev/video2", "/dev/video0"]);
    }

    #[tokio::test]
    async fn test_without_rear_preference_uses_enumeration_order() {
        let backend = StubCameraBackend::new(devices());
        let mut session = CameraSession::new(
            Box::new(backend),
            &CameraConfig {
                prefer_rear: false,
                ..config()
            },
        );
        assert_eq!(session.start_prefer_rear().await.unwrap().id, "/dev/video0");
    }

    #[tokio::test]
    async fn test_total_failure_is_non_fatal() {
        let backend = StubCameraBackend::new(devices())
            .with_failing("/dev/video0")
            .with_failing("/dev/video2")
            .with_failing("/dev/video4");
        let mut session = CameraSession::new(Box::new(backend), &config());

        let err = session.start_prefer_rear().await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(session.status(), CameraStatus::Unavailable);
        assert!(session.latest_frame().is_none());
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_camera_unavailable() {
        let backend = StubCameraBackend::new(devices()).with_failing_enumeration();
        let mut session = CameraSession::new(Box::new(backend), &config());

        let err = session.start_prefer_rear().await.unwrap_err();
        assert!(matches!(err, FramecamError::CameraUnavailable { .. }));
        assert_eq!(session.status(), CameraStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_no_devices_is_camera_unavailable() {
        let mut session = CameraSession::new(Box::new(StubCameraBackend::new(vec![])), &config());
        assert!(session.start_prefer_rear().await.is_err());
        assert_eq!(session.status(), CameraStatus::Unavailable);
    }

    #[tokio::test]
    async fn test_switch_releases_before_attaching() {
        let backend = StubCameraBackend::new(devices());
        let probe = backend.probe();
        let mut session = CameraSession::new(Box::new(backend), &config());

        session.start_prefer_rear().await.unwrap();
        assert_eq!(session.switch_to_next().await.unwrap().id, "/dev/video4");
        assert_eq!(session.switch_to_next().await.unwrap().id, "/dev/video0");
        assert_eq!(session.switch_to_next().await.unwrap().id, "/dev/video2");

        assert_eq!(probe.live(), 1);
        assert_eq!(probe.max_live(), 1);

        session.release().await;
        assert_eq!(probe.live(), 0);
        assert_eq!(session.status(), CameraStatus::Idle);
    }

    #[tokio::test]
    async fn test_ended_stream_reports_unavailable() {
        let mut session = CameraSession::new(Box::new(StubCameraBackend::new(devices())), &config());
        session.start_prefer_rear().await.unwrap();
        assert_eq!(session.status(), CameraStatus::Live);

        if let Some(stream) = session.stream.as_mut() {
            stream.stop();
        }
        assert_eq!(session.status(), CameraStatus::Unavailable);
        assert!(session.latest_frame().is_none());
    }

    #[tokio::test]
    async fn test_switch_past_failing_device_keeps_cycling() {
        let backend = StubCameraBackend::new(devices()).with_failing("/dev/video4");
        let mut session = CameraSession::new(Box::new(backend), &config());

        session.start_prefer_rear().await.unwrap();
        assert!(session.switch_to_next().await.is_err());
        assert_eq!(session.status(), CameraStatus::Unavailable);
        assert_eq!(session.switch_to_next().await.unwrap().id, "/dev/video0");
        assert_eq!(session.status(), CameraStatus::Live);
    }

    /// Stand-in for ffmpeg that streams zeros and notes, at startup, every
    /// earlier instance that is still running.
    #[cfg(target_os = "linux")]
    fn fake_ffmpeg(dir: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("fake-ffmpeg");
        let log = dir.display();
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\n\
                 for pid in $(cat '{log}/pids' 2>/dev/null); do\n\
                 \x20 [ -d /proc/$pid ] && echo $pid >> '{log}/overlap'\n\
                 done\n\
                 echo $$ >> '{log}/pids'\n\
                 exec cat /dev/zero\n"
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_reopening_same_device_waits_for_previous_capture_to_exit() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FfmpegCameraBackend::new(
            fake_ffmpeg(dir.path()).to_string_lossy(),
            Duration::from_secs(5),
        );
        let mut session = CameraSession::new(Box::new(backend), &config());
        session.devices = vec![DeviceDescriptor::new("/dev/video0", "Integrated Webcam")];

        session.attach(0).await.unwrap();
        assert!(session.latest_frame().is_some());
        assert_eq!(session.switch_to_next().await.unwrap().id, "/dev/video0");
        assert_eq!(session.switch_to_next().await.unwrap().id, "/dev/video0");
        session.release().await;

        let pids = std::fs::read_to_string(dir.path().join("pids")).unwrap();
        assert_eq!(pids.lines().count(), 3);
        assert!(!dir.path().join("overlap").exists());
        for pid in pids.lines() {
            assert!(!Path::new(&format!("/proc/{pid}")).exists());
        }
    }
}
