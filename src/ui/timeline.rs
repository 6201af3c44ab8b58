// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame timeline strip.
//!
//! This module shows one thumbnail per frame in order, highlights the
//! frame open for editing and lets the user pick another one.

/// Result of timeline interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimelineAction {
    None,
    Select(usize),
}

/// One thumbnail ready for display.
pub struct Thumbnail {
    pub texture: egui::TextureId,
    pub size: egui::Vec2,
}

/// Display the thumbnail strip.
pub fn show(ui: &mut egui::Ui, thumbnails: &[Thumbnail], active: usize, enabled: bool) -> TimelineAction {
    let mut action = TimelineAction::None;

    egui::ScrollArea::horizontal().show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 6.0;
            for (i, thumb) in thumbnails.iter().enumerate() {
                ui.vertical(|ui| {
                    let (rect, response) = ui.allocate_exact_size(thumb.size, egui::Sense::click());
                    let painter = ui.painter();
                    painter.rect_filled(rect, 0.0, egui::Color32::from_gray(60));
                    painter.image(
                        thumb.texture,
                        rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                    if i == active {
                        painter.rect_stroke(
                            rect.expand(2.0),
                            2.0,
                            egui::Stroke::new(2.0, egui::Color32::LIGHT_BLUE),
                        );
                    }
                    ui.label(egui::RichText::new(format!("{}", i + 1)).small().weak());

                    if enabled && response.clicked() {
                        action = TimelineAction::Select(i);
                    }
                });
            }
        });
    });

    action
}
