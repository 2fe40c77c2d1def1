//! Framecam Common Utilities
//!
//! Shared infrastructure for all Framecam crates:
//! - Error types and result aliases
//! - Redraw tick control for the live preview loop
//! - Tracing/logging initialization
//! - Configuration loading

pub mod config;
pub mod error;
pub mod logging;
pub mod tick;

pub use config::*;
pub use error::*;
pub use tick::*;
