// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! RGBA pixel storage for a single frame.
//!
//! A [`PixelBuffer`] is a fixed-size grid of straight-alpha RGBA8 samples
//! stored row-major. Every access is bounds checked; coordinates outside
//! the buffer produce [`EditorError::OutOfBounds`] instead of wrapping.

use crate::error::{EditorError, EditorResult};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// A straight-alpha RGBA8 color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    #[cfg(test)]
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// A fully opaque color, the form every paint operation writes.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Exact RGB equality. Alpha is not compared.
    pub fn same_rgb(&self, other: &Rgba) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// The same color with alpha forced to 255.
    pub fn to_opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    /// Parse a `#rrggbb` color as produced by a color picker.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::opaque(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Fixed-size RGBA8 pixel grid.
///
/// Cloning performs a deep copy; two buffers never share sample storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Create a buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba) -> EditorResult<Self> {
        let len = sample_len(width, height)?;
        let mut buffer = Self {
            width,
            height,
            samples: vec![0; len],
        };
        buffer.fill(color);
        Ok(buffer)
    }

    /// Wrap raw row-major RGBA8 samples.
    pub fn from_raw(width: u32, height: u32, samples: Vec<u8>) -> EditorResult<Self> {
        let len = sample_len(width, height)?;
        if samples.len() != len {
            return Err(EditorError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                width: (samples.len() / 4 / height.max(1) as usize) as u32,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Copy pixels out of an [`RgbaImage`].
    pub fn from_image(image: &RgbaImage) -> EditorResult<Self> {
        Self::from_raw(image.width(), image.height(), image.as_raw().clone())
    }

    /// Copy pixels into a new [`RgbaImage`].
    pub fn to_image(&self) -> RgbaImage {
        // Length is checked at construction, so this cannot fail.
        RgbaImage::from_raw(self.width, self.height, self.samples.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw row-major RGBA8 samples.
    pub fn as_raw(&self) -> &[u8] {
        &self.samples
    }

    /// Check if signed coordinates are within bounds.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    fn offset(&self, x: u32, y: u32) -> EditorResult<usize> {
        if x >= self.width || y >= self.height {
            return Err(EditorError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }
        Ok((y as usize * self.width as usize + x as usize) * 4)
    }

    /// Read the pixel at `(x, y)`.
    pub fn get(&self, x: u32, y: u32) -> EditorResult<Rgba> {
        let i = self.offset(x, y)?;
        let s = &self.samples[i..i + 4];
        Ok(Rgba::new(s[0], s[1], s[2], s[3]))
    }

    /// Write the pixel at `(x, y)` exactly as given.
    ///
    /// Paint operations pass opaque colors; partial transparency is only
    /// written when the caller supplies it explicitly.
    pub fn set(&mut self, x: u32, y: u32, color: Rgba) -> EditorResult<()> {
        let i = self.offset(x, y)?;
        self.samples[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
        Ok(())
    }

    /// Set every pixel to `color`.
    pub fn fill(&mut self, color: Rgba) {
        for px in self.samples.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Overwrite this buffer with the contents of `other`, reusing storage.
    pub fn copy_from(&mut self, other: &PixelBuffer) -> EditorResult<()> {
        if self.dimensions() != other.dimensions() {
            return Err(EditorError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: other.width,
                height: other.height,
            });
        }
        self.samples.copy_from_slice(&other.samples);
        Ok(())
    }
}

fn sample_len(width: u32, height: u32) -> EditorResult<usize> {
    if width == 0 || height == 0 {
        return Err(EditorError::DimensionMismatch {
            expected_width: width.max(1),
            expected_height: height.max(1),
            width,
            height,
        });
    }
    Ok(width as usize * height as usize * 4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_has_exact_length() {
        let buf = PixelBuffer::filled(7, 3, Rgba::WHITE).unwrap();
        assert_eq!(buf.as_raw().len(), 7 * 3 * 4);
        assert!(buf.as_raw().iter().all(|&s| s == 255));
    }

    #[test]
    fn test_zero_dimensions_rejected() {
        assert!(PixelBuffer::filled(0, 10, Rgba::WHITE).is_err());
        assert!(PixelBuffer::filled(10, 0, Rgba::WHITE).is_err());
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelBuffer::from_raw(2, 2, vec![0; 15]),
            Err(EditorError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_get_set_bounds() {
        let mut buf = PixelBuffer::filled(4, 3, Rgba::WHITE).unwrap();
        let red = Rgba::opaque(255, 0, 0);
        buf.set(3, 2, red).unwrap();
        assert_eq!(buf.get(3, 2).unwrap(), red);

        assert!(matches!(buf.get(4, 0), Err(EditorError::OutOfBounds { .. })));
        assert!(matches!(buf.get(0, 3), Err(EditorError::OutOfBounds { .. })));
        assert!(matches!(
            buf.set(4, 2, red),
            Err(EditorError::OutOfBounds { x: 4, y: 2, width: 4, height: 3 })
        ));
    }

    #[test]
    fn test_no_row_wraparound() {
        let mut buf = PixelBuffer::filled(4, 4, Rgba::WHITE).unwrap();
        assert!(buf.set(4, 0, Rgba::BLACK).is_err());
        // Would alias (0, 1) with naive offset arithmetic.
        assert_eq!(buf.get(0, 1).unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = PixelBuffer::filled(2, 2, Rgba::WHITE).unwrap();
        let mut copy = original.clone();
        copy.set(0, 0, Rgba::BLACK).unwrap();
        assert_eq!(original.get(0, 0).unwrap(), Rgba::WHITE);
        assert_eq!(copy.get(0, 0).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_fill_sets_every_sample() {
        let mut buf = PixelBuffer::filled(3, 3, Rgba::TRANSPARENT).unwrap();
        let c = Rgba::new(1, 2, 3, 4);
        buf.fill(c);
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(buf.get(x, y).unwrap(), c);
            }
        }
    }

    #[test]
    fn test_image_conversion_preserves_pixels() {
        let mut buf = PixelBuffer::filled(3, 2, Rgba::WHITE).unwrap();
        buf.set(1, 1, Rgba::new(10, 20, 30, 40)).unwrap();
        let image = buf.to_image();
        assert_eq!(image.get_pixel(1, 1).0, [10, 20, 30, 40]);
        assert_eq!(PixelBuffer::from_image(&image).unwrap(), buf);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(Rgba::from_hex("#ff8000"), Some(Rgba::opaque(255, 128, 0)));
        assert_eq!(Rgba::from_hex("ff8000"), None);
        assert_eq!(Rgba::from_hex("#ff80"), None);
        assert_eq!(Rgba::from_hex("#gg0000"), None);
        assert_eq!(Rgba::opaque(1, 171, 255).to_hex(), "#01abff");
    }

    #[test]
    fn test_same_rgb_ignores_alpha() {
        assert!(Rgba::new(5, 6, 7, 0).same_rgb(&Rgba::opaque(5, 6, 7)));
        assert!(!Rgba::opaque(5, 6, 8).same_rgb(&Rgba::opaque(5, 6, 7)));
    }
}
