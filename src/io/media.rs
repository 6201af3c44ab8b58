// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame image encoding and decoding.
//!
//! Frames are stored as PNG (lossless, so every pixel survives a round trip)
//! inside base64 data URIs. Decoding accepts any format the `image` crate
//! recognizes and redraws the result onto the target canvas size.

use crate::error::{EditorError, EditorResult};
use crate::models::pixel_buffer::{PixelBuffer, Rgba};
use base64ct::{Base64, Encoding};
use image::imageops::FilterType;
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;

const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

/// Encode a buffer as PNG bytes.
pub fn encode_png(buffer: &PixelBuffer) -> EditorResult<Vec<u8>> {
    let mut bytes = Vec::new();
    buffer
        .to_image()
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| EditorError::encode(e.to_string()))?;
    Ok(bytes)
}

/// Encode a buffer as a `data:image/png;base64,...` URI.
pub fn encode_data_url(buffer: &PixelBuffer) -> EditorResult<String> {
    let png = encode_png(buffer)?;
    Ok(format!("{}{}", PNG_DATA_URI_PREFIX, Base64::encode_string(&png)))
}

/// Extract the payload bytes of a base64 data URI.
pub fn parse_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| "not a data URI".to_string())?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| "data URI has no payload".to_string())?;
    if !header.ends_with(";base64") {
        return Err(format!("unsupported data URI encoding '{}'", header));
    }
    Base64::decode_vec(payload.trim()).map_err(|e| format!("invalid base64: {}", e))
}

/// Decode image bytes into a buffer of exactly `width` x `height`.
///
/// Images of another size are rescaled to fill the canvas.
pub fn decode_image(bytes: &[u8], width: u32, height: u32) -> Result<PixelBuffer, String> {
    let image = image::load_from_memory(bytes).map_err(|e| e.to_string())?.to_rgba8();
    let image = fit_to(&image, width, height);
    PixelBuffer::from_image(&image).map_err(|e| e.to_string())
}

/// Decode one frame's data URI onto the target canvas size.
pub fn decode_data_url(
    index: usize,
    data_url: &str,
    width: u32,
    height: u32,
) -> EditorResult<PixelBuffer> {
    parse_data_url(data_url)
        .and_then(|bytes| decode_image(&bytes, width, height))
        .map_err(|reason| EditorError::DecodeFailure { index, reason })
}

/// Scale an image to `width` x `height`, leaving same-size images untouched.
pub fn fit_to(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    if image.dimensions() == (width, height) {
        image.clone()
    } else {
        image::imageops::resize(image, width, height, FilterType::Triangle)
    }
}

/// Composite straight-alpha pixels over an opaque background.
pub fn flatten_onto(image: &mut RgbaImage, background: Rgba) {
    let bg = [background.r, background.g, background.b];
    for px in image.pixels_mut() {
        let a = px.0[3] as u16;
        for c in 0..3 {
            let v = px.0[c] as u16 * a + bg[c] as u16 * (255 - a);
            px.0[c] = ((v + 127) / 255) as u8;
        }
        px.0[3] = 255;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PixelBuffer {
        let mut buf = PixelBuffer::filled(5, 4, Rgba::WHITE).unwrap();
        buf.set(0, 0, Rgba::new(1, 2, 3, 4)).unwrap();
        buf.set(4, 3, Rgba::TRANSPARENT).unwrap();
        buf.set(2, 1, Rgba::opaque(250, 0, 17)).unwrap();
        buf
    }

    #[test]
    fn test_png_round_trip_is_exact() {
        let buf = sample();
        let url = encode_data_url(&buf).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let back = decode_data_url(0, &url, 5, 4).unwrap();
        assert_eq!(back, buf);
    }

    #[test]
    fn test_decode_rescales_to_target() {
        let buf = PixelBuffer::filled(4, 4, Rgba::opaque(0, 0, 255)).unwrap();
        let url = encode_data_url(&buf).unwrap();
        let back = decode_data_url(0, &url, 8, 2).unwrap();
        assert_eq!(back.dimensions(), (8, 2));
        assert_eq!(back.get(7, 1).unwrap(), Rgba::opaque(0, 0, 255));
    }

    #[test]
    fn test_parse_data_url_errors() {
        assert!(parse_data_url("image/png;base64,AAAA").is_err());
        assert!(parse_data_url("data:image/png;base64").is_err());
        assert!(parse_data_url("data:text/plain,hello").is_err());
        assert!(parse_data_url("data:image/png;base64,@@@@").is_err());
    }

    #[test]
    fn test_garbage_image_reports_frame_index() {
        let url = format!("data:image/png;base64,{}", Base64::encode_string(b"not a png"));
        let err = decode_data_url(3, &url, 2, 2).unwrap_err();
        assert!(matches!(err, EditorError::DecodeFailure { index: 3, .. }));
    }

    #[test]
    fn test_flatten_onto_white() {
        let mut image = RgbaImage::from_raw(2, 1, vec![0, 0, 0, 0, 10, 20, 30, 255]).unwrap();
        flatten_onto(&mut image, Rgba::WHITE);
        assert_eq!(image.as_raw(), &vec![255, 255, 255, 255, 10, 20, 30, 255]);
    }
}
