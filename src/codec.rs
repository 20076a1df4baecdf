//! Image decode / encode
//!
//! [`ImageCodec`] wraps the `image` crate so the planner only sees decoded
//! rasters and encoded bytes.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat, RgbImage};
use serde::Serialize;
use std::io::Cursor;
use thiserror::Error;

/// Codec error types
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Decode failed: {0}")]
    Decode(String),

    #[error("Encode failed ({format}): {message}")]
    Encode { format: OutputFormat, message: String },
}

pub type Result<T> = std::result::Result<T, CodecError>;

/// Default JPEG encoding quality
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Output file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl OutputFormat {
    /// Pick the output format for a detected input format.
    /// Unrecognized or unknown formats are written as JPEG.
    pub fn from_detected(format: Option<ImageFormat>) -> Self {
        match format {
            Some(ImageFormat::Png) => OutputFormat::Png,
            Some(ImageFormat::Gif) => OutputFormat::Gif,
            Some(ImageFormat::WebP) => OutputFormat::WebP,
            _ => OutputFormat::Jpeg,
        }
    }

    /// File extension (without dot)
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Gif => "gif",
            OutputFormat::WebP => "webp",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Gif => ImageFormat::Gif,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// A decoded image and the container format it was read from
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub image: DynamicImage,
    pub format: Option<ImageFormat>,
}

/// Decodes downloaded bytes and encodes processed rasters
pub trait ImageCodec {
    /// Decode bytes into a raster, detecting the format from content
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage>;

    /// Encode an RGB raster. `jpeg_quality` applies to JPEG output only.
    fn encode(&self, image: &RgbImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>>;
}

/// [`ImageCodec`] backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCodec;

impl ImageCodec for StandardCodec {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage> {
        let format = image::guess_format(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
        let image = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| CodecError::Decode(e.to_string()))?;

        Ok(DecodedImage {
            image,
            format: Some(format),
        })
    }

    fn encode(&self, image: &RgbImage, format: OutputFormat, jpeg_quality: u8) -> Result<Vec<u8>> {
        let encode_error = |e: image::ImageError| CodecError::Encode {
            format,
            message: e.to_string(),
        };
        let mut bytes = Vec::new();

        match format {
            OutputFormat::Jpeg => {
                JpegEncoder::new_with_quality(&mut bytes, jpeg_quality)
                    .write_image(
                        image.as_raw(),
                        image.width(),
                        image.height(),
                        ExtendedColorType::Rgb8,
                    )
                    .map_err(encode_error)?;
            }
            _ => {
                image
                    .write_to(&mut Cursor::new(&mut bytes), format.image_format())
                    .map_err(encode_error)?;
            }
        }

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn sample() -> RgbImage {
        RgbImage::from_fn(8, 6, |x, y| Rgb([(x * 30) as u8, (y * 40) as u8, 90]))
    }

    #[test]
    fn test_format_mapping() {
        assert_eq!(OutputFormat::from_detected(Some(ImageFormat::Jpeg)).extension(), "jpg");
        assert_eq!(OutputFormat::from_detected(Some(ImageFormat::Png)).extension(), "png");
        assert_eq!(OutputFormat::from_detected(Some(ImageFormat::Gif)).extension(), "gif");
        assert_eq!(OutputFormat::from_detected(Some(ImageFormat::WebP)).extension(), "webp");
        assert_eq!(OutputFormat::from_detected(Some(ImageFormat::Bmp)).extension(), "jpg");
        assert_eq!(OutputFormat::from_detected(None).extension(), "jpg");
    }

    #[test]
    fn test_decode_detects_png() {
        let codec = StandardCodec;
        let bytes = codec.encode(&sample(), OutputFormat::Png, DEFAULT_JPEG_QUALITY).unwrap();
        let decoded = codec.decode(&bytes).unwrap();

        assert_eq!(decoded.format, Some(ImageFormat::Png));
        assert_eq!(decoded.image.to_rgb8(), sample());
    }

    #[test]
    fn test_jpeg_output_is_jpeg() {
        let codec = StandardCodec;
        let bytes = codec.encode(&sample(), OutputFormat::Jpeg, 95).unwrap();

        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_gif_output() {
        let bytes = StandardCodec.encode(&sample(), OutputFormat::Gif, 95).unwrap();
        assert_eq!(&bytes[..3], b"GIF");
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result = StandardCodec.decode(b"<html>not an image</html>");
        assert!(matches!(result, Err(CodecError::Decode(_))));
    }

    #[test]
    fn test_format_display() {
        assert_eq!(OutputFormat::WebP.to_string(), "webp");
    }
}
