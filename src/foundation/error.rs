/// Convenience result type used across snapjoy.
pub type SnapResult<T> = Result<T, SnapError>;

/// Failures reported by the camera collaborator while acquiring a stream.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraError {
    /// The host refused access to the camera.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No camera matching the requested facing mode could be opened.
    #[error("camera device unavailable")]
    DeviceUnavailable,
}

/// Top-level error taxonomy used by booth, editor and renderer APIs.
#[derive(thiserror::Error, Debug)]
pub enum SnapError {
    /// Invalid caller-provided configuration or editor input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Camera acquisition failed; the capture flow must not start.
    #[error("camera error: {0}")]
    Camera(#[from] CameraError),

    /// A capture was attempted before the video stream delivered a frame.
    #[error("no frame available from video source")]
    NoFrameAvailable,

    /// A slot write addressed an index past the configured slot count.
    #[error("slot index {index} out of range for {count} slots")]
    SlotIndexOutOfRange {
        /// Requested slot.
        index: usize,
        /// Configured slot count.
        count: usize,
    },

    /// A sequential write targeted a slot that already holds an image.
    #[error("slot {index} is already filled")]
    SlotAlreadyFilled {
        /// Requested slot.
        index: usize,
    },

    /// An image, SVG or font could not be resolved or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// The compositing pipeline could not produce an output raster.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing configuration.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from codecs or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnapError {
    /// Build a [`SnapError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`SnapError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`SnapError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`SnapError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Sequencing faults that leave the collage in an unknown state.
    pub fn is_sequencing_fault(&self) -> bool {
        matches!(
            self,
            Self::SlotIndexOutOfRange { .. } | Self::SlotAlreadyFilled { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
