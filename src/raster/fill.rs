// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Bucket fill.
//!
//! 4-connected region replacement driven by an explicit work stack. The
//! region is every pixel reachable through axis neighbors whose RGB exactly
//! equals the seed pixel's RGB. Alpha takes no part in the match, and every
//! filled pixel is written fully opaque.

use crate::error::EditorResult;
use crate::models::pixel_buffer::{PixelBuffer, Rgba};

/// Flood fill the region containing `(x, y)` with `fill`.
///
/// Returns `Ok(false)` without touching the buffer when the seed already has
/// the fill color. A seed outside the buffer is an `OutOfBounds` error.
pub fn flood_fill(buffer: &mut PixelBuffer, x: u32, y: u32, fill: Rgba) -> EditorResult<bool> {
    let target = buffer.get(x, y)?;
    if target.same_rgb(&fill) {
        return Ok(false);
    }

    let fill = fill.to_opaque();
    let (width, height) = buffer.dimensions();
    let mut stack: Vec<(u32, u32)> = vec![(x, y)];

    while let Some((px, py)) = stack.pop() {
        // Already-filled pixels fail this check since fill != target.
        if !buffer.get(px, py)?.same_rgb(&target) {
            continue;
        }
        buffer.set(px, py, fill)?;

        if px > 0 {
            stack.push((px - 1, py));
        }
        if px + 1 < width {
            stack.push((px + 1, py));
        }
        if py > 0 {
            stack.push((px, py - 1));
        }
        if py + 1 < height {
            stack.push((px, py + 1));
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EditorError;
    use proptest::prelude::*;

    const A: Rgba = Rgba::opaque(200, 10, 10);
    const B: Rgba = Rgba::opaque(10, 10, 200);
    const C: Rgba = Rgba::opaque(10, 200, 10);

    fn paint_rect(buf: &mut PixelBuffer, x0: u32, y0: u32, x1: u32, y1: u32, color: Rgba) {
        for y in y0..y1 {
            for x in x0..x1 {
                buf.set(x, y, color).unwrap();
            }
        }
    }

    #[test]
    fn test_same_color_is_noop() {
        let mut buf = PixelBuffer::filled(8, 8, A).unwrap();
        buf.set(3, 3, B).unwrap();
        let before = buf.clone();

        assert!(!flood_fill(&mut buf, 0, 0, A).unwrap());
        assert_eq!(buf, before);
    }

    #[test]
    fn test_same_rgb_different_alpha_is_noop() {
        let mut buf = PixelBuffer::filled(4, 4, Rgba::new(1, 2, 3, 0)).unwrap();
        let before = buf.clone();
        assert!(!flood_fill(&mut buf, 1, 1, Rgba::opaque(1, 2, 3)).unwrap());
        assert_eq!(buf, before);
    }

    #[test]
    fn test_fill_is_contained_by_border() {
        let mut buf = PixelBuffer::filled(10, 10, B).unwrap();
        paint_rect(&mut buf, 2, 3, 7, 8, A);

        assert!(flood_fill(&mut buf, 4, 5, C).unwrap());

        for y in 0..10 {
            for x in 0..10 {
                let inside = (2..7).contains(&x) && (3..8).contains(&y);
                let expected = if inside { C } else { B };
                assert_eq!(buf.get(x, y).unwrap(), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_diagonal_contact_does_not_connect() {
        // Two A pixels touching only at a corner.
        let mut buf = PixelBuffer::filled(4, 4, B).unwrap();
        buf.set(1, 1, A).unwrap();
        buf.set(2, 2, A).unwrap();

        flood_fill(&mut buf, 1, 1, C).unwrap();

        assert_eq!(buf.get(1, 1).unwrap(), C);
        assert_eq!(buf.get(2, 2).unwrap(), A);
    }

    #[test]
    fn test_fill_forces_opaque_alpha() {
        let mut buf = PixelBuffer::filled(3, 3, Rgba::TRANSPARENT).unwrap();
        flood_fill(&mut buf, 0, 0, Rgba::new(9, 9, 9, 17)).unwrap();
        assert!(buf.as_raw().chunks_exact(4).all(|px| px == [9, 9, 9, 255]));
    }

    #[test]
    fn test_transparent_and_opaque_same_rgb_are_one_region() {
        let mut buf = PixelBuffer::filled(3, 1, Rgba::opaque(0, 0, 0)).unwrap();
        buf.set(1, 0, Rgba::TRANSPARENT).unwrap();
        flood_fill(&mut buf, 0, 0, C).unwrap();
        assert!(buf.as_raw().chunks_exact(4).all(|px| px == [10, 200, 10, 255]));
    }

    #[test]
    fn test_seed_out_of_bounds() {
        let mut buf = PixelBuffer::filled(3, 3, A).unwrap();
        assert!(matches!(
            flood_fill(&mut buf, 3, 0, C),
            Err(EditorError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_large_canvas_does_not_overflow_stack() {
        let mut buf = PixelBuffer::filled(1024, 768, Rgba::WHITE).unwrap();
        flood_fill(&mut buf, 512, 384, A).unwrap();
        assert!(buf.as_raw().chunks_exact(4).all(|px| px == [200, 10, 10, 255]));
    }

    #[test]
    fn test_serpentine_region() {
        // Walls on alternating rows with a gap on alternating ends.
        let mut buf = PixelBuffer::filled(9, 9, Rgba::WHITE).unwrap();
        for row in (1..9).step_by(2) {
            let gap = if (row / 2) % 2 == 0 { 8 } else { 0 };
            for x in 0..9 {
                if x != gap {
                    buf.set(x, row, B).unwrap();
                }
            }
        }
        flood_fill(&mut buf, 0, 0, A).unwrap();
        assert_eq!(buf.get(0, 8).unwrap(), A);
        assert_eq!(buf.get(4, 1).unwrap(), B);
    }

    proptest! {
        #[test]
        fn prop_fill_only_changes_target_pixels(
            cells in prop::collection::vec(0u8..3, 36),
            sx in 0u32..6,
            sy in 0u32..6,
        ) {
            let palette = [A, B, Rgba::WHITE];
            let mut buf = PixelBuffer::filled(6, 6, Rgba::WHITE).unwrap();
            for (i, c) in cells.iter().enumerate() {
                buf.set(i as u32 % 6, i as u32 / 6, palette[*c as usize]).unwrap();
            }
            let before = buf.clone();
            let target = before.get(sx, sy).unwrap();

            flood_fill(&mut buf, sx, sy, C).unwrap();

            for y in 0..6 {
                for x in 0..6 {
                    let old = before.get(x, y).unwrap();
                    let new = buf.get(x, y).unwrap();
                    if new != old {
                        prop_assert!(old.same_rgb(&target));
                        prop_assert_eq!(new, C);
                    }
                }
            }
            prop_assert_eq!(buf.get(sx, sy).unwrap(), C);
        }

        #[test]
        fn prop_refill_with_same_color_is_noop(
            cells in prop::collection::vec(0u8..2, 25),
            sx in 0u32..5,
            sy in 0u32..5,
        ) {
            let mut buf = PixelBuffer::filled(5, 5, Rgba::WHITE).unwrap();
            for (i, c) in cells.iter().enumerate() {
                let color = if *c == 0 { A } else { B };
                buf.set(i as u32 % 5, i as u32 / 5, color).unwrap();
            }
            flood_fill(&mut buf, sx, sy, C).unwrap();
            let once = buf.clone();
            prop_assert!(!flood_fill(&mut buf, sx, sy, C).unwrap());
            prop_assert_eq!(buf, once);
        }
    }
}
