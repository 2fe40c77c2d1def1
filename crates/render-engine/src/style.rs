//! Paint constants for the overlay.

/// Mask over everything outside the frame: black at 45%.
pub const MASK_ALPHA: f32 = 0.45;

pub const BORDER_WIDTH: f32 = 3.0;
/// The border stroke is inset by half its width so it stays inside the frame.
pub const BORDER_INSET: f32 = BORDER_WIDTH / 2.0;
pub const BORDER_ALPHA_PREVIEW: f32 = 0.95;
pub const BORDER_ALPHA_CAPTURE: f32 = 1.0;

pub const DOT_RADIUS: f32 = 8.0;
pub const DOT_FILL: [u8; 3] = [0x4d, 0xa3, 0xff];
pub const DOT_OUTLINE_WIDTH: f32 = 2.0;

pub const LINE_COLOR: [u8; 3] = [0, 255, 0];
pub const LINE_WIDTH_PREVIEW: f32 = 3.0;
pub const LINE_WIDTH_CAPTURE: f32 = 4.0;

pub const SELECTED_COLOR: [u8; 3] = [0, 255, 255];
pub const SELECTED_WIDTH: f32 = 4.0;
/// Blur radius of the selection glow.
pub const GLOW_RADIUS: f32 = 14.0;
/// Number of translucent passes that approximate the glow.
pub const GLOW_PASSES: u32 = 4;
pub const GLOW_PASS_ALPHA: u8 = 36;
