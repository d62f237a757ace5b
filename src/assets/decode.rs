use std::io::Cursor;

use anyhow::Context;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::core::Raster;
use crate::foundation::error::{ThumbError, ThumbResult};

/// Decode encoded image bytes (PNG, JPEG, WebP, ...) into a premultiplied [`Raster`].
///
/// Images without an alpha channel come in opaque.
pub fn decode_raster(bytes: &[u8]) -> ThumbResult<Raster> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ThumbError::decode(format!("decode image from memory: {e}")))?;

    if dyn_img.color().has_alpha() {
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Raster::from_straight_rgba8(width, height, rgba.into_raw())
    } else {
        let rgb = dyn_img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Raster::from_rgb8(width, height, rgb.as_raw())
    }
}

/// Encode a raster as straight-alpha PNG bytes.
pub fn encode_png(raster: &Raster) -> ThumbResult<Vec<u8>> {
    let img = raster.to_rgba_image()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

/// Decode a base64 payload, or a `data:image/...;base64,` URL, into a [`Raster`].
pub fn decode_base64_raster(payload: &str) -> ThumbResult<Raster> {
    let b64 = strip_data_url(payload.trim())?;
    let bytes = STANDARD
        .decode(b64)
        .map_err(|e| ThumbError::decode(format!("invalid base64 image payload: {e}")))?;
    decode_raster(&bytes)
}

/// Encode a raster as PNG and return the base64 text (no data-URL prefix).
pub fn encode_png_base64(raster: &Raster) -> ThumbResult<String> {
    Ok(STANDARD.encode(encode_png(raster)?))
}

/// Encode a raster as a `data:image/png;base64,` URL.
pub fn encode_png_data_url(raster: &Raster) -> ThumbResult<String> {
    Ok(format!("data:image/png;base64,{}", encode_png_base64(raster)?))
}

fn strip_data_url(payload: &str) -> ThumbResult<&str> {
    let Some(rest) = payload.strip_prefix("data:") else {
        return Ok(payload);
    };
    let Some((header, body)) = rest.split_once(',') else {
        return Err(ThumbError::decode("data url is missing ',' separator"));
    };
    if !header.ends_with(";base64") {
        return Err(ThumbError::decode("data url must be base64-encoded"));
    }
    Ok(body)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
