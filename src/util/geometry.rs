// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module maps between the on-screen canvas rectangle and canvas
//! pixel coordinates.

use crate::raster::stroke::CanvasPoint;

/// Where the canvas is drawn inside the available area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Largest rectangle with the canvas aspect ratio that fits in the
/// available area, centered. Never scales the canvas above 1:1.
pub fn fit_canvas(canvas_width: u32, canvas_height: u32, available_w: f32, available_h: f32) -> DisplayRect {
    let cw = canvas_width as f32;
    let ch = canvas_height as f32;
    let scale = (available_w / cw).min(available_h / ch).min(1.0).max(0.0);
    let (width, height) = (cw * scale, ch * scale);
    DisplayRect {
        x: (available_w - width) / 2.0,
        y: (available_h - height) / 2.0,
        width,
        height,
    }
}

/// Convert a position relative to the display rectangle's top-left corner
/// into canvas pixel space.
pub fn screen_to_canvas(
    rel_x: f32,
    rel_y: f32,
    display: &DisplayRect,
    canvas_width: u32,
    canvas_height: u32,
) -> CanvasPoint {
    if display.width <= 0.0 || display.height <= 0.0 {
        return CanvasPoint::new(0.0, 0.0);
    }
    CanvasPoint::new(
        rel_x / display.width * canvas_width as f32,
        rel_y / display.height * canvas_height as f32,
    )
}
