// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback and project panel.
//!
//! This module provides the side panel with the frame rate, play/stop
//! controls, export resolution and the project save/load/export buttons.

use crate::io::export::ExportResolution;

/// Action requested from the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertiesAction {
    None,
    Play,
    Stop,
    SaveProject,
    LoadProject,
    ExportVideo,
}

/// Read-only state shown in the panel.
pub struct PanelState {
    /// Rate of the running preview, if playing.
    pub playing_fps: Option<u32>,
    /// File name of the project being loaded, if any.
    pub loading: Option<String>,
    pub frame_count: usize,
    pub cursor: usize,
}

impl PanelState {
    fn playing(&self) -> bool {
        self.playing_fps.is_some()
    }

    fn loading(&self) -> bool {
        self.loading.is_some()
    }
}

/// Display the panel.
pub fn show(
    ui: &mut egui::Ui,
    fps: &mut i64,
    resolution: &mut ExportResolution,
    state: &PanelState,
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading("Playback");
    ui.horizontal(|ui| {
        ui.label("FPS:");
        ui.add(egui::DragValue::new(fps).speed(0.2));
    });
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!state.loading(), egui::Button::new("▶ Play"))
            .clicked()
        {
            action = PropertiesAction::Play;
        }
        if ui
            .add_enabled(state.playing(), egui::Button::new("⏹ Stop"))
            .clicked()
        {
            action = PropertiesAction::Stop;
        }
    });
    match state.playing_fps {
        Some(fps) => ui.label(format!("Playing {} frames at {} fps", state.frame_count, fps)),
        None => ui.label(format!("Frame {} of {}", state.cursor + 1, state.frame_count)),
    };

    ui.separator();
    ui.heading("Project");

    let idle = !state.playing() && !state.loading();
    egui::ComboBox::from_label("Resolution")
        .selected_text(resolution.label())
        .show_ui(ui, |ui| {
            for option in ExportResolution::ALL {
                ui.selectable_value(resolution, option, option.label());
            }
        });
    if ui
        .add_enabled(idle, egui::Button::new("Export Video..."))
        .clicked()
    {
        action = PropertiesAction::ExportVideo;
    }
    if ui
        .add_enabled(idle, egui::Button::new("Save .qau1..."))
        .clicked()
    {
        action = PropertiesAction::SaveProject;
    }
    if ui
        .add_enabled(!state.playing(), egui::Button::new("Load .qau1..."))
        .clicked()
    {
        action = PropertiesAction::LoadProject;
    }

    if let Some(name) = &state.loading {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(format!("Loading {}...", name));
        });
    }

    action
}
