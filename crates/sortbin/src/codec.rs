//! Conversion between transport bytes and the in-memory RGB image the
//! pipeline works on.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};

use crate::error::CodecError;

/// JPEG quality used for annotated images.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Decodes any supported image format into 8-bit RGB.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::Decode("empty input".to_string()));
    }

    let image = image::load_from_memory(bytes).map_err(|e| CodecError::Decode(e.to_string()))?;
    if image.width() == 0 || image.height() == 0 {
        return Err(CodecError::Decode("image dimensions are zero".to_string()));
    }

    Ok(image.to_rgb8())
}

pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, CodecError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
    image
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buffer)
}

pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, CodecError> {
    let mut cursor = Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(cursor.into_inner())
}

/// Sniffs the MIME type from the leading bytes, if the format is known.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes)
        .ok()
        .map(|format| format.to_mime_type())
}
