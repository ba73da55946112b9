// ============================================================================
// CAPTURE — PNG data URLs handed to the owning form
// ============================================================================

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder, ImageError, ImageFormat, RgbaImage};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode an RGBA raster as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(buf)
}

/// Encode the raster as `data:image/png;base64,...`.
pub fn to_data_url(image: &RgbaImage) -> Result<String, ImageError> {
    let png = encode_png(image)?;
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png)))
}

/// Everything after the first comma, which is what goes into a submission
/// payload. Values without a header are returned unchanged.
pub fn strip_data_url_header(value: &str) -> &str {
    match value.split_once(',') {
        Some((_, payload)) => payload,
        None => value,
    }
}

/// Decode a capture (with or without header) back to PNG bytes.
pub fn decode_png_bytes(value: &str) -> Result<Vec<u8>, String> {
    STANDARD
        .decode(strip_data_url_header(value).trim())
        .map_err(|e| format!("invalid base64 payload: {}", e))
}

/// Decode a capture back to a raster.
pub fn decode_image(value: &str) -> Result<RgbaImage, String> {
    let bytes = decode_png_bytes(value)?;
    image::load_from_memory_with_format(&bytes, ImageFormat::Png)
        .map(|img| img.into_rgba8())
        .map_err(|e| format!("invalid PNG: {}", e))
}
