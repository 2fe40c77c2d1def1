//! Framecam Overlay Model
//!
//! Defines the data contracts and pure geometry of the composition overlay:
//! - **Geometry:** Crop frame layout, containment, and segment distance
//! - **Annotations:** Point markers, guide lines, and the selection they share
//! - **Mode:** The active pointer interaction behaviour
//! - **Ratio:** Hardened parsing of frame ratio expressions
//! - **Events:** Pointer input in viewport coordinates
//! - **Scene:** Immutable snapshot consumed by the render pipeline
//!
//! All coordinates are viewport pixels with the origin at the top-left
//! corner and `y` growing downwards.

pub mod annotation;
pub mod event;
pub mod geometry;
pub mod mode;
pub mod ratio;
pub mod scene;

pub use annotation::*;
pub use event::*;
pub use geometry::*;
pub use mode::*;
pub use ratio::*;
pub use scene::*;
