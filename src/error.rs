use thiserror::Error;

use crate::device::AccessMode;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Camera error: {0}")]
    Camera(#[from] CameraError),

    #[error("Image saving error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure reported by the vendor side of the device boundary.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct DeviceError {
    pub operation: String,
    pub message: String,
}

impl DeviceError {
    pub fn new(operation: impl Into<String>, message: impl Into<String>) -> Self {
        DeviceError {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("Camera not found: {0}")]
    NotFound(String),

    #[error("Camera is not valid")]
    InvalidDevice,

    #[error("Camera is not initialized")]
    NotInitialized,

    #[error("Camera is not streaming. Please start_acquisition() it")]
    NotStreaming,

    #[error("Failed to resolve \"{segment}\" in \"{path}\"")]
    Resolution { path: String, segment: String },

    #[error("Access mode check failed for \"{path}\": expected {expected}, found {actual}")]
    AccessMode {
        path: String,
        expected: AccessMode,
        actual: AccessMode,
    },

    #[error("Unsupported argument: {0}")]
    UnsupportedArgument(String),

    #[error("Unknown node method: {0}")]
    UnknownMethod(String),

    #[error("Cannot average {0} frames")]
    InvalidFrameCount(usize),

    #[error("Frame shape {actual:?} does not match {expected:?}")]
    FrameShape {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("None of the {requested} requested frames were complete")]
    NoValidFrames { requested: usize },

    #[error("Device error: {0}")]
    Device(#[from] DeviceError),
}

pub type Result<T> = std::result::Result<T, AppError>;

pub type CameraResult<T> = std::result::Result<T, CameraError>;

// Helper functions for creating errors
impl CameraError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        CameraError::NotFound(msg.into())
    }

    pub fn resolution(path: impl Into<String>, segment: impl Into<String>) -> Self {
        CameraError::Resolution {
            path: path.into(),
            segment: segment.into(),
        }
    }

    pub fn unsupported_argument(msg: impl Into<String>) -> Self {
        CameraError::UnsupportedArgument(msg.into())
    }
}
