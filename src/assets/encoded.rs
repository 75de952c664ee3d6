use std::{io::Cursor, sync::Arc};

use anyhow::Context;
use image::ImageEncoder;

use crate::{
    assets::{decode::decode_image, store::PreparedImage},
    foundation::error::{SnapError, SnapResult},
    foundation::math::Fnv1a64,
};

/// Lossy quality used for captures and exports unless configured otherwise.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Compressed raster codec of an [`EncodedImage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEncoding {
    /// Baseline JPEG at `quality` (1..=100). Alpha is flattened onto black.
    Jpeg {
        /// Encoder quality, 1..=100.
        quality: u8,
    },
    /// Lossless PNG with alpha.
    Png,
}

impl Default for ImageEncoding {
    fn default() -> Self {
        Self::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl ImageEncoding {
    /// File extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "jpg",
            Self::Png => "png",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Jpeg { .. } => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    pub(crate) fn validate(self) -> SnapResult<Self> {
        if let Self::Jpeg { quality } = self
            && !(1..=100).contains(&quality)
        {
            return Err(SnapError::validation("jpeg quality must be in 1..=100"));
        }
        Ok(self)
    }
}

/// An encoded still image: the unit passed between capture, collage, editor and export.
///
/// Clones share the encoded bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    encoding: ImageEncoding,
    width: u32,
    height: u32,
    bytes: Arc<Vec<u8>>,
}

impl EncodedImage {
    /// Encode tightly packed straight-alpha RGBA8 pixels.
    pub fn encode_rgba8(
        width: u32,
        height: u32,
        rgba8: &[u8],
        encoding: ImageEncoding,
    ) -> SnapResult<Self> {
        let encoding = encoding.validate()?;
        if width == 0 || height == 0 {
            return Err(SnapError::validation("cannot encode an empty image"));
        }
        if rgba8.len() != width as usize * height as usize * 4 {
            return Err(SnapError::validation(
                "encode_rgba8 expects a buffer matching width*height*4",
            ));
        }

        let mut buf = Vec::new();
        match encoding {
            ImageEncoding::Jpeg { quality } => {
                let rgb = flatten_onto_black(rgba8);
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality)
                    .write_image(&rgb, width, height, image::ExtendedColorType::Rgb8)
                    .context("encode jpeg")?;
            }
            ImageEncoding::Png => {
                image::codecs::png::PngEncoder::new(&mut buf)
                    .write_image(rgba8, width, height, image::ExtendedColorType::Rgba8)
                    .context("encode png")?;
            }
        }

        Ok(Self {
            encoding,
            width,
            height,
            bytes: Arc::new(buf),
        })
    }

    /// Wrap already-encoded bytes, probing their dimensions and codec.
    ///
    /// JPEG headers do not record the encoder quality, so any JPEG is labelled with the default
    /// quality ([`DEFAULT_JPEG_QUALITY`]). The wrapped bytes are kept as given; the label only
    /// picks the export file extension and MIME type.
    pub fn from_encoded_bytes(bytes: Vec<u8>) -> SnapResult<Self> {
        let format = image::guess_format(&bytes).context("guess image format")?;
        let encoding = match format {
            image::ImageFormat::Png => ImageEncoding::Png,
            image::ImageFormat::Jpeg => ImageEncoding::default(),
            other => {
                return Err(SnapError::asset(format!(
                    "unsupported encoded image format {other:?}"
                )));
            }
        };
        let (width, height) = image::ImageReader::new(Cursor::new(bytes.as_slice()))
            .with_guessed_format()
            .context("read image header")?
            .into_dimensions()
            .context("read image dimensions")?;
        Ok(Self {
            encoding,
            width,
            height,
            bytes: Arc::new(bytes),
        })
    }

    /// Codec of the encoded bytes.
    pub fn encoding(&self) -> ImageEncoding {
        self.encoding
    }

    /// Pixel width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        self.bytes.as_slice()
    }

    /// Decode into premultiplied RGBA8.
    pub fn decode(&self) -> SnapResult<PreparedImage> {
        decode_image(self.bytes())
    }

    pub(crate) fn fingerprint_into(&self, h: &mut Fnv1a64) {
        h.write_u32(self.width);
        h.write_u32(self.height);
        h.write_u64(self.bytes.len() as u64);
        h.write_bytes(self.bytes());
    }
}

fn flatten_onto_black(rgba8: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba8.len() / 4 * 3);
    for px in rgba8.chunks_exact(4) {
        let a = u16::from(px[3]);
        for &c in &px[..3] {
            rgb.push(crate::foundation::math::mul_div255_u8(u16::from(c), a));
        }
    }
    rgb
}

#[cfg(test)]
#[path = "../../tests/unit/assets/encoded.rs"]
mod tests;
