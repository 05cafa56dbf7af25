use crate::messages;
use crate::models::capture::CaptureStep;
use thiserror::Error;

/// Camera acquisition and capture failures.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CameraError {
    /// The user refused camera access.
    #[error("camera permission denied: {0}")]
    PermissionDenied(String),

    /// No camera hardware answered the request.
    #[error("no camera available")]
    NotFound,

    /// Capture attempted before the stream delivered a sized frame.
    #[error("camera not ready")]
    NotReady,

    /// The frame could not be read or encoded.
    #[error("failed to read camera frame: {0}")]
    Frame(String),

    /// Step change not in the transition table.
    #[error("invalid capture step transition {from:?} -> {to:?}")]
    InvalidTransition { from: CaptureStep, to: CaptureStep },
}

impl CameraError {
    /// Message shown in the capture view
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied(_) | Self::NotFound => messages::CAMERA_UNAVAILABLE.to_string(),
            Self::NotReady => messages::CAMERA_NOT_READY.to_string(),
            Self::Frame(_) | Self::InvalidTransition { .. } => self.to_string(),
        }
    }
}

/// Submission failures. `Display` is the message the window shows.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmitError {
    /// One or both images missing; no request was made.
    #[error("{0}")]
    Validation(String),

    /// Another submission is still in flight; nothing was sent.
    #[error("{}", messages::SUBMISSION_BUSY)]
    Busy,

    /// Non-2xx response from the OCR server.
    #[error("{0}")]
    Server(String),

    /// 2xx response without any recognizable field.
    #[error("{}", messages::NO_DATA)]
    NoData,

    /// Network failure or unreadable body.
    #[error("{0}")]
    Transport(String),

    /// Anything else raised while submitting.
    #[error("{0}")]
    Unexpected(String),
}

impl SubmitError {
    /// Build a transport error, falling back to the generic message when empty
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(non_empty_or_unknown(message.into()))
    }

    /// Build an unexpected error, falling back to the generic message when empty
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(non_empty_or_unknown(message.into()))
    }
}

fn non_empty_or_unknown(message: String) -> String {
    if message.trim().is_empty() {
        messages::UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}

/// PDF export failures.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{}", messages::NO_CROPPED_IMAGES)]
    NoImages,

    #[error("failed to decode card image: {0}")]
    Decode(String),

    #[error("failed to build PDF: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}
