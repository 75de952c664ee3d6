use crate::capture::frame::FrameSource;
use crate::collage::config::FacingMode;
use crate::foundation::error::{CameraError, SnapResult};

/// Host collaborator that opens and closes camera streams.
pub trait VideoSource {
    /// Live stream handed out by [`VideoSource::get_stream`].
    type Stream: FrameSource;

    /// Open a stream for `facing`.
    fn get_stream(&mut self, facing: FacingMode) -> Result<Self::Stream, CameraError>;

    /// Stop every track of `stream`.
    fn release_stream(&mut self, stream: Self::Stream);
}

/// Owns at most one open stream and releases it on facing change, stop and drop.
pub struct Camera<V: VideoSource> {
    source: V,
    stream: Option<V::Stream>,
    facing: FacingMode,
}

impl<V: VideoSource> Camera<V> {
    /// Wrap `source` without opening a stream yet.
    pub fn new(source: V, facing: FacingMode) -> Self {
        Self {
            source,
            stream: None,
            facing,
        }
    }

    /// Facing mode of the current or next stream.
    pub fn facing(&self) -> FacingMode {
        self.facing
    }

    /// Return `true` while a stream is open.
    pub fn is_ready(&self) -> bool {
        self.stream.is_some()
    }

    /// Open a stream for the current facing mode if none is open.
    #[tracing::instrument(skip(self), fields(facing = ?self.facing))]
    pub fn start(&mut self) -> SnapResult<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        match self.source.get_stream(self.facing) {
            Ok(stream) => {
                self.stream = Some(stream);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "camera stream unavailable");
                Err(e.into())
            }
        }
    }

    /// Release the current stream and open one for `facing`.
    ///
    /// The facing mode is switched even when the new stream cannot be opened.
    pub fn set_facing(&mut self, facing: FacingMode) -> SnapResult<()> {
        self.stop();
        self.facing = facing;
        self.start()
    }

    /// Release the current stream, if any.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            tracing::debug!(facing = ?self.facing, "camera stream released");
            self.source.release_stream(stream);
        }
    }

    /// The open stream as a frame source.
    pub fn frame_source(&mut self) -> Option<&mut dyn FrameSource> {
        self.stream.as_mut().map(|s| s as &mut dyn FrameSource)
    }

    /// The host collaborator.
    pub fn source(&self) -> &V {
        &self.source
    }
}

impl<V: VideoSource> Drop for Camera<V> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/camera.rs"]
mod tests;
