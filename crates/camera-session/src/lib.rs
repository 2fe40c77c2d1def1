//! Framecam Camera Session
//!
//! Enumerates video inputs, acquires a live stream with a rear-first
//! fallback policy, and exposes the most recent frame to the preview and
//! the capture exporter. Losing the camera is never fatal: the session
//! reports [`CameraStatus::Unavailable`] and callers render overlay-only.

pub mod backend;
pub mod device;
pub mod session;
pub mod stream;

pub use backend::{
    CameraBackend, FfmpegCameraBackend, StreamConstraints, StubCameraBackend, StubProbe,
};
pub use device::{list_video_inputs, CameraFacing, DeviceDescriptor};
pub use session::{CameraSession, CameraStatus};
pub use stream::{VideoFrame, VideoStream};
