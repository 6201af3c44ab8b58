// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.
//!
//! This module provides the toolbar for choosing the paint tool and color
//! and for the frame operations (clear, add, duplicate, delete).

use crate::session::Tool;

/// Frame operation requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Clear,
    AddFrame,
    DuplicateFrame,
    DeleteFrame,
}

/// Display the toolbar. Tool and color are edited in place.
pub fn show(
    ui: &mut egui::Ui,
    current_tool: &mut Tool,
    color: &mut [u8; 3],
    enabled: bool,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.add_enabled_ui(enabled, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 8.0;

            ui.label("Tools:");
            ui.separator();

            if ui.selectable_label(*current_tool == Tool::Pencil, "✏ Pencil").clicked() {
                *current_tool = Tool::Pencil;
            }
            if ui.selectable_label(*current_tool == Tool::Eraser, "⌫ Eraser").clicked() {
                *current_tool = Tool::Eraser;
            }
            if ui.selectable_label(*current_tool == Tool::Bucket, "🪣 Bucket").clicked() {
                *current_tool = Tool::Bucket;
            }

            ui.separator();
            ui.label("Color:");
            ui.color_edit_button_srgb(color);

            ui.separator();
            if ui.button("Clear").clicked() {
                action = ToolbarAction::Clear;
            }
            if ui.button("➕ Add Frame").clicked() {
                action = ToolbarAction::AddFrame;
            }
            if ui.button("⧉ Duplicate").clicked() {
                action = ToolbarAction::DuplicateFrame;
            }
            if ui.button("🗑 Delete").clicked() {
                action = ToolbarAction::DeleteFrame;
            }

            ui.separator();
            let tool_text = match current_tool {
                Tool::Pencil => "Drag to draw",
                Tool::Eraser => "Drag to erase to white",
                Tool::Bucket => "Click to fill a region",
            };
            ui.label(egui::RichText::new(tool_text).italics().weak());
        });
    });

    action
}
