//! Pointer interaction modes.

use std::fmt;
use std::str::FromStr;

use framecam_common::error::{FramecamError, FramecamResult};
use serde::{Deserialize, Serialize};

/// The active interaction behaviour. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Place a point marker.
    #[default]
    Dot,
    /// Place a vertical guide.
    Vertical,
    /// Place a horizontal guide.
    Horizontal,
    /// Place a slanted guide.
    #[serde(alias = "slant")]
    Slanted,
    /// Select and drag existing guides; never creates anything.
    Select,
}

impl Mode {
    /// Every mode, in menu order.
    pub const ALL: [Mode; 5] = [
        Mode::Dot,
        Mode::Vertical,
        Mode::Horizontal,
        Mode::Slanted,
        Mode::Select,
    ];

    /// Whether pointer-down on empty space creates an annotation.
    pub fn creates_annotations(self) -> bool {
        !matches!(self, Mode::Select)
    }

    /// Short user-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Dot => "Dot",
            Mode::Vertical => "Vertical",
            Mode::Horizontal => "Horizontal",
            Mode::Slanted => "Slanted",
            Mode::Select => "Select",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Dot => "dot",
            Mode::Vertical => "vertical",
            Mode::Horizontal => "horizontal",
            Mode::Slanted => "slanted",
            Mode::Select => "select",
        };
        f.write_str(name)
    }
}

impl FromStr for Mode {
    type Err = FramecamError;

    fn from_str(s: &str) -> FramecamResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dot" => Ok(Mode::Dot),
            "vertical" => Ok(Mode::Vertical),
            "horizontal" => Ok(Mode::Horizontal),
            "slant" | "slanted" => Ok(Mode::Slanted),
            "select" => Ok(Mode::Select),
            other => Err(FramecamError::config(format!(
                "unknown mode {other:?} (expected dot, vertical, horizontal, slant, or select)"
            ))),
        }
    }
}
