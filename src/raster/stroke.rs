// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Round-capped line segments for the pencil and eraser.

use crate::models::pixel_buffer::{PixelBuffer, Rgba};

/// A point in canvas pixel space (fractional).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f32,
    pub y: f32,
}

impl CanvasPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The pixel containing this point, if it lies on the buffer.
    pub fn to_pixel(self, buffer: &PixelBuffer) -> Option<(u32, u32)> {
        let (x, y) = (self.x.floor() as i64, self.y.floor() as i64);
        buffer.contains(x, y).then_some((x as u32, y as u32))
    }
}

/// Paint a segment of the given stroke width with round caps.
///
/// Pixels whose centers lie within `width / 2` of the segment are set to
/// `color`. Anything falling off the buffer is clipped.
pub fn draw_segment(buffer: &mut PixelBuffer, from: CanvasPoint, to: CanvasPoint, width: f32, color: Rgba) {
    let radius = (width / 2.0).max(0.5);
    let (w, h) = buffer.dimensions();

    let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
    let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
    let max_x = ((from.x.max(to.x) + radius).ceil().max(0.0) as u32).min(w);
    let max_y = ((from.y.max(to.y) + radius).ceil().max(0.0) as u32).min(h);

    let r2 = radius * radius;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let center = CanvasPoint::new(x as f32 + 0.5, y as f32 + 0.5);
            if distance_sq_to_segment(center, from, to) <= r2 {
                let written = buffer.set(x, y, color);
                debug_assert!(written.is_ok(), "stroke pixel ({x}, {y}) escaped clipping");
            }
        }
    }
}

fn distance_sq_to_segment(p: CanvasPoint, a: CanvasPoint, b: CanvasPoint) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq <= f32::EPSILON {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    (p.x - cx) * (p.x - cx) + (p.y - cy) * (p.y - cy)
}
