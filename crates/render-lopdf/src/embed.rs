use crate::error::ImageEmbedError;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{ColorType, DynamicImage, ImageDecoder, ImageFormat};
use std::io::Cursor;

/// JPEG quality used when a non-JPEG source has to be re-encoded for embedding.
const EMBED_QUALITY: u8 = 90;

/// A JPEG stream ready to be written as a `/DCTDecode` image XObject.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub width: u32,
    pub height: u32,
    pub color_space: &'static str,
    pub data: Vec<u8>,
}

impl EmbeddedImage {
    /// Prepares arbitrary image bytes for embedding.
    ///
    /// Grayscale and RGB JPEGs are passed through untouched; every other
    /// supported format (PNG, GIF, unusual JPEG layouts) is decoded and
    /// re-encoded as an RGB JPEG.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageEmbedError> {
        if let Ok(ImageFormat::Jpeg) = image::guess_format(bytes)
            && let Some(image) = Self::passthrough_jpeg(bytes)
        {
            return Ok(image);
        }

        let decoded = image::load_from_memory(bytes)?;
        let data = encode_jpeg(&decoded, EMBED_QUALITY)?;
        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            color_space: "DeviceRGB",
            data,
        })
    }

    fn passthrough_jpeg(bytes: &[u8]) -> Option<Self> {
        let decoder = JpegDecoder::new(Cursor::new(bytes)).ok()?;
        let (width, height) = decoder.dimensions();
        let color_space = match decoder.color_type() {
            ColorType::L8 => "DeviceGray",
            ColorType::Rgb8 => "DeviceRGB",
            _ => return None,
        };
        Some(Self {
            width,
            height,
            color_space,
            data: bytes.to_vec(),
        })
    }
}

/// Encodes an image as an RGB JPEG at the given quality (1-100).
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ImageEmbedError> {
    let rgb = image.to_rgb8();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality).encode_image(&rgb)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgba([10u8, 200, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_pixel(width, height, Rgb([120u8, 80, 40]));
        encode_jpeg(&DynamicImage::ImageRgb8(img), 80).unwrap()
    }

    #[test]
    fn test_jpeg_passes_through() {
        let bytes = jpeg_bytes(40, 20);
        let embedded = EmbeddedImage::from_bytes(&bytes).unwrap();
        assert_eq!((embedded.width, embedded.height), (40, 20));
        assert_eq!(embedded.color_space, "DeviceRGB");
        assert_eq!(embedded.data, bytes);
    }

    #[test]
    fn test_png_is_reencoded_as_jpeg() {
        let bytes = png_bytes(16, 32);
        let embedded = EmbeddedImage::from_bytes(&bytes).unwrap();
        assert_eq!((embedded.width, embedded.height), (16, 32));
        assert_eq!(image::guess_format(&embedded.data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let result = EmbeddedImage::from_bytes(b"<html>404 not found</html>");
        assert!(matches!(result, Err(ImageEmbedError::Decode(_))));
    }
}
