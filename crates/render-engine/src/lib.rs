//! Framecam Render Engine
//!
//! Paints the overlay (mask, frame border, point markers, guide lines) onto
//! a `tiny-skia` surface, and flattens video + overlay into a PNG still.
//!
//! # Pipeline
//!
//! ```text
//! video frame ──► stretch to viewport ──┐   (capture only)
//!                                       ├── mask bands
//! OverlayScene ─────────────────────────┤
//!                                       ├── frame border
//!                                       ├── point markers
//!                                       └── guide lines ──► Pixmap ──► PNG
//! ```
//!
//! The live preview runs the same steps without the video layer and is
//! composited over the camera texture by the window.

pub mod capture;
pub mod pipeline;
pub mod style;

pub use capture::*;
pub use pipeline::*;
