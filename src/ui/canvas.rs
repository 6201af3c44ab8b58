// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Paint surface.
//!
//! This module draws the working buffer and turns pointer input into
//! canvas-space paint actions for the active tool.

use crate::raster::stroke::CanvasPoint;
use crate::session::Tool;
use crate::util::geometry;

/// Result of canvas interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CanvasAction {
    None,
    /// Pointer pressed on the canvas.
    Press(CanvasPoint),
    /// Pointer held and moved over the canvas.
    Drag(CanvasPoint),
    /// Pointer released or left the canvas.
    Release,
    /// Bucket click.
    Fill(CanvasPoint),
}

/// Display the canvas and handle pointer interaction.
pub fn show(
    ui: &mut egui::Ui,
    texture: &egui::TextureHandle,
    canvas_size: (u32, u32),
    current_tool: Tool,
    interactive: bool,
) -> CanvasAction {
    let (canvas_w, canvas_h) = canvas_size;
    let available = ui.available_size();
    let (area, response) = ui.allocate_exact_size(available, egui::Sense::click_and_drag());

    let fit = geometry::fit_canvas(canvas_w, canvas_h, area.width(), area.height());
    let image_rect = egui::Rect::from_min_size(
        area.min + egui::vec2(fit.x, fit.y),
        egui::vec2(fit.width, fit.height),
    );

    let painter = ui.painter_at(area);
    painter.rect_filled(area, 0.0, egui::Color32::from_gray(40));
    painter.image(
        texture.id(),
        image_rect,
        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
        egui::Color32::WHITE,
    );

    if !interactive {
        return CanvasAction::None;
    }

    let to_canvas = |pos: egui::Pos2| {
        geometry::screen_to_canvas(
            pos.x - image_rect.min.x,
            pos.y - image_rect.min.y,
            &fit,
            canvas_w,
            canvas_h,
        )
    };
    let pointer = response
        .interact_pointer_pos()
        .filter(|pos| image_rect.contains(*pos));

    match current_tool {
        Tool::Bucket => match pointer {
            Some(pos) if response.clicked() => CanvasAction::Fill(to_canvas(pos)),
            _ => CanvasAction::None,
        },
        Tool::Pencil | Tool::Eraser => {
            let pressed = ui.input(|i| i.pointer.primary_pressed());
            match pointer {
                Some(pos) if response.is_pointer_button_down_on() => {
                    if pressed {
                        CanvasAction::Press(to_canvas(pos))
                    } else {
                        CanvasAction::Drag(to_canvas(pos))
                    }
                }
                _ => CanvasAction::Release,
            }
        }
    }
}
