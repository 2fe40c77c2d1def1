//! Error types shared across Framecam crates.

/// Top-level error type for Framecam operations.
#[derive(Debug, thiserror::Error)]
pub enum FramecamError {
    #[error("Camera unavailable: {message}")]
    CameraUnavailable { message: String },

    #[error("Invalid ratio expression {input:?}: {reason}")]
    InvalidRatio { input: String, reason: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using FramecamError.
pub type FramecamResult<T> = Result<T, FramecamError>;

impl FramecamError {
    pub fn camera_unavailable(msg: impl Into<String>) -> Self {
        Self::CameraUnavailable {
            message: msg.into(),
        }
    }

    pub fn invalid_ratio(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRatio {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
        }
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether the preview can keep running in overlay-only mode after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::CameraUnavailable { .. } | Self::InvalidRatio { .. }
        )
    }
}
