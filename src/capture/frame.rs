use crate::assets::encoded::{EncodedImage, ImageEncoding};
use crate::collage::config::FacingMode;
use crate::foundation::error::{SnapError, SnapResult};

/// One decoded frame of a live video stream in straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Tightly packed row-major RGBA8 pixels.
    pub rgba8: Vec<u8>,
}

impl VideoFrame {
    /// Build a frame filled with a single color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            width,
            height,
            rgba8: rgba.repeat(width as usize * height as usize),
        }
    }
}

/// A live stream the capturer can sample frames from.
pub trait FrameSource {
    /// Current intrinsic frame dimensions; `(0, 0)` before the stream delivers metadata.
    fn frame_size(&self) -> (u32, u32);

    /// Sample the current frame.
    fn grab_frame(&mut self) -> SnapResult<VideoFrame>;
}

/// Center-crop `frame` to a square of `min(width, height)` and mirror it for front cameras.
pub fn crop_square(frame: &VideoFrame, facing: FacingMode) -> SnapResult<image::RgbaImage> {
    if frame.width == 0 || frame.height == 0 {
        return Err(SnapError::NoFrameAvailable);
    }
    let img = image::RgbaImage::from_raw(frame.width, frame.height, frame.rgba8.clone())
        .ok_or(SnapError::NoFrameAvailable)?;

    let size = frame.width.min(frame.height);
    let x = (frame.width - size) / 2;
    let y = (frame.height - size) / 2;
    let cropped = image::imageops::crop_imm(&img, x, y, size, size).to_image();

    Ok(match facing {
        FacingMode::Front => image::imageops::flip_horizontal(&cropped),
        FacingMode::Back => cropped,
    })
}

/// Grab the current frame from `source`, crop it square and encode it.
///
/// Fails with [`SnapError::NoFrameAvailable`] while the stream reports no dimensions.
#[tracing::instrument(skip(source), fields(facing = ?facing))]
pub fn capture_frame(
    source: &mut dyn FrameSource,
    facing: FacingMode,
    encoding: ImageEncoding,
) -> SnapResult<EncodedImage> {
    let (w, h) = source.frame_size();
    if w == 0 || h == 0 {
        return Err(SnapError::NoFrameAvailable);
    }

    let frame = source.grab_frame()?;
    let square = crop_square(&frame, facing)?;
    let size = square.width();
    tracing::debug!(size, "captured square frame");
    EncodedImage::encode_rgba8(size, size, square.as_raw(), encoding)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/frame.rs"]
mod tests;
