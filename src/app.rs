// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module owns the frame store, the editing session, the playback
//! scheduler and the project loader, routes UI actions into them and turns
//! their errors into status messages.

use crate::config::EditorConfig;
use crate::error::EditorResult;
use crate::io::export::{export_video, ExportResolution, FfmpegEncoder};
use crate::io::loader::ProjectLoader;
use crate::io::serialization::{save_project, CanvasSpec, LoadedProject};
use crate::models::frame::{FrameId, FrameStore};
use crate::models::pixel_buffer::Rgba;
use crate::models::project::PROJECT_EXTENSION;
use crate::playback::{effective_fps, PlaybackScheduler};
use crate::session::EditSession;
use crate::ui::{canvas, properties, timeline, toolbar};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Instant;

/// Default file name offered when saving a project.
const PROJECT_FILE_NAME: &str = "quan-project.qau1";

/// Main application state.
pub struct QuanApp {
    config: EditorConfig,

    /// Committed frames
    store: FrameStore,

    /// Tool, color and the working buffer shown on the canvas
    session: EditSession,

    playback: PlaybackScheduler,

    /// Background `.qau1` loading
    loader: ProjectLoader,

    /// Frame rate as typed by the user; invalid values fall back to 12
    fps: i64,

    resolution: ExportResolution,

    canvas_texture: Option<egui::TextureHandle>,
    canvas_dirty: bool,

    /// Preview textures keyed by frame, with the revision they show
    thumbnails: HashMap<FrameId, (u64, egui::TextureHandle)>,

    /// Timeline entries as of `strip_generation` of the store
    strip: Vec<timeline::Thumbnail>,
    strip_generation: Option<u64>,

    /// Last user-facing message
    status: Option<String>,
}

impl QuanApp {
    /// Create an editor with one blank frame.
    pub fn new(config: EditorConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let store = FrameStore::with_thumbnail_width(
            config.canvas_width,
            config.canvas_height,
            config.blank_color,
            config.thumbnail_width,
        )?;
        let session = EditSession::new(&store, config.brush_widths())?;

        Ok(Self {
            fps: config.default_fps as i64,
            config,
            store,
            session,
            playback: PlaybackScheduler::new(),
            loader: ProjectLoader::new(),
            resolution: ExportResolution::default(),
            canvas_texture: None,
            canvas_dirty: true,
            thumbnails: HashMap::new(),
            strip: Vec::new(),
            strip_generation: None,
            status: None,
        })
    }

    fn editing_enabled(&self) -> bool {
        !self.playback.is_playing() && !self.loader.is_loading()
    }

    /// Report the outcome of a user action.
    fn report(&mut self, result: EditorResult<()>) {
        if let Err(e) = result {
            debug_assert!(e.is_user_actionable(), "editor invariant violated: {e}");
            if e.is_user_actionable() {
                log::warn!("{}", e);
            } else {
                log::error!("Editor invariant violated: {}", e);
            }
            self.status = Some(e.to_string());
        }
    }

    /// Show the store's active frame on the canvas.
    fn show_current(&mut self) -> EditorResult<()> {
        self.session.load_frame(&self.store)?;
        self.canvas_dirty = true;
        Ok(())
    }

    fn add_frame(&mut self) -> EditorResult<()> {
        self.store.add_frame()?;
        self.show_current()
    }

    fn duplicate_frame(&mut self) -> EditorResult<()> {
        self.store.duplicate_current()?;
        self.show_current()
    }

    fn delete_frame(&mut self) -> EditorResult<()> {
        self.store.delete_current()?;
        self.show_current()
    }

    fn select_frame(&mut self, index: usize) -> EditorResult<()> {
        self.store.select_frame(index)?;
        self.show_current()
    }

    fn clear_frame(&mut self) -> EditorResult<()> {
        self.session.clear(&mut self.store)?;
        self.canvas_dirty = true;
        Ok(())
    }

    fn play(&mut self) -> EditorResult<()> {
        let result = self.playback.start(&self.store, self.fps, Instant::now());
        if result.is_err() {
            // A rejected restart leaves playback stopped.
            self.show_current()?;
        }
        result
    }

    fn stop(&mut self) {
        self.playback.stop(&self.store, &mut self.session);
        self.canvas_dirty = true;
    }

    fn handle_canvas(&mut self, action: canvas::CanvasAction) -> EditorResult<()> {
        match action {
            canvas::CanvasAction::Press(point) => {
                self.session.begin_stroke(point);
                self.canvas_dirty = true;
            }
            canvas::CanvasAction::Drag(point) => {
                if self.session.is_drawing() {
                    self.session.continue_stroke(point);
                    self.canvas_dirty = true;
                }
            }
            canvas::CanvasAction::Release => {
                self.session.end_stroke(&mut self.store)?;
            }
            canvas::CanvasAction::Fill(point) => {
                if self.session.bucket_fill(point, &mut self.store)? {
                    self.canvas_dirty = true;
                }
            }
            canvas::CanvasAction::None => {}
        }
        Ok(())
    }

    fn save_to(&mut self, path: PathBuf) {
        let fps = effective_fps(self.fps);
        match save_project(&path, &self.store, fps) {
            Ok(()) => self.status = Some(format!("Saved {}", path.display())),
            Err(e) => {
                log::error!("Failed to save project: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn export_to(&mut self, path: PathBuf) {
        let mut encoder = FfmpegEncoder::new(path);
        let fps = effective_fps(self.fps);
        match export_video(&self.store, fps, self.resolution, &mut encoder) {
            Ok(n) => {
                self.status = Some(format!(
                    "Exported {} frames to {}",
                    n,
                    encoder.out_path().display()
                ))
            }
            Err(e) => {
                log::error!("Failed to export video: {}", e);
                self.status = Some(e.to_string());
            }
        }
    }

    fn request_load(&mut self, path: PathBuf) {
        log::info!("Loading project {}", path.display());
        self.loader.request(path, CanvasSpec::of(&self.store));
    }

    /// Install a loaded project, replacing the current one.
    fn install_project(&mut self, loaded: LoadedProject) -> EditorResult<()> {
        let LoadedProject { mut store, fps } = loaded;
        store.select_frame(0)?;
        self.session.reset(&store)?;
        self.store = store;
        self.fps = fps as i64;
        self.thumbnails.clear();
        self.strip_generation = None;
        self.canvas_dirty = true;
        self.status = Some("Project loaded!".to_string());
        log::info!("Project installed: {} frames at {} fps", self.store.len(), fps);
        Ok(())
    }

    fn poll_loader(&mut self) {
        match self.loader.poll() {
            Some(Ok(loaded)) => {
                let result = self.install_project(loaded);
                self.report(result);
            }
            Some(Err(e)) => {
                log::error!("Failed to load project: {}", e);
                self.status = Some(e.to_string());
            }
            None => {}
        }
    }

    fn refresh_canvas_texture(&mut self, ctx: &egui::Context) {
        if !self.canvas_dirty && self.canvas_texture.is_some() {
            return;
        }
        let working = self.session.working();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [working.width() as usize, working.height() as usize],
            working.as_raw(),
        );
        match self.canvas_texture.as_mut() {
            Some(texture) => texture.set(image, egui::TextureOptions::NEAREST),
            None => {
                self.canvas_texture =
                    Some(ctx.load_texture("canvas", image, egui::TextureOptions::NEAREST));
            }
        }
        self.canvas_dirty = false;
    }

    /// Rebuild the timeline entries if the store changed since last time.
    fn refresh_thumbnails(&mut self, ctx: &egui::Context) {
        let generation = self.store.generation();
        if self.strip_generation == Some(generation) {
            return;
        }

        let live: std::collections::HashSet<FrameId> =
            self.store.frames().iter().map(|f| f.id()).collect();
        self.thumbnails.retain(|id, _| live.contains(id));

        self.strip.clear();
        for frame in self.store.frames() {
            let preview = frame.preview();
            let stale = self
                .thumbnails
                .get(&frame.id())
                .map_or(true, |(revision, _)| *revision != frame.revision());
            if stale {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [preview.width() as usize, preview.height() as usize],
                    preview.as_raw(),
                );
                let texture = ctx.load_texture(
                    format!("frame-{}", frame.id().0),
                    image,
                    egui::TextureOptions::LINEAR,
                );
                self.thumbnails.insert(frame.id(), (frame.revision(), texture));
            }
            if let Some((_, texture)) = self.thumbnails.get(&frame.id()) {
                self.strip.push(timeline::Thumbnail {
                    texture: texture.id(),
                    size: egui::vec2(preview.width() as f32, preview.height() as f32),
                });
            }
        }
        self.strip_generation = Some(generation);
        log::trace!("Timeline rebuilt at generation {}", generation);
    }

    fn panel_state(&self) -> properties::PanelState {
        properties::PanelState {
            playing_fps: self.playback.fps(),
            loading: self.loader.pending_path().map(|path| {
                path.file_name()
                    .unwrap_or(path.as_os_str())
                    .to_string_lossy()
                    .into_owned()
            }),
            frame_count: self.store.len(),
            cursor: self.store.cursor(),
        }
    }
}

impl eframe::App for QuanApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_loader();
        if self.loader.is_loading() {
            ctx.request_repaint();
        }

        // Advance playback
        if self.playback.is_playing() {
            let now = Instant::now();
            if self
                .playback
                .tick(&self.store, now, &mut self.session)
                .is_some()
            {
                self.canvas_dirty = true;
            }
            if let Some(deadline) = self.playback.next_deadline() {
                ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
            }
        }

        let editing = self.editing_enabled();

        // Toolbar
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| {
                let mut tool = self.session.tool();
                let color = self.session.color();
                let mut rgb = [color.r, color.g, color.b];
                let action = toolbar::show(ui, &mut tool, &mut rgb, editing);
                self.session.set_tool(tool);
                self.session.set_color(Rgba::opaque(rgb[0], rgb[1], rgb[2]));
                action
            })
            .inner;

        let result = match toolbar_action {
            toolbar::ToolbarAction::Clear => self.clear_frame(),
            toolbar::ToolbarAction::AddFrame => self.add_frame(),
            toolbar::ToolbarAction::DuplicateFrame => self.duplicate_frame(),
            toolbar::ToolbarAction::DeleteFrame => self.delete_frame(),
            toolbar::ToolbarAction::None => Ok(()),
        };
        self.report(result);

        // Status line
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Current tool: {:?}", self.session.tool()));
                ui.separator();
                ui.label(self.status.as_deref().unwrap_or("Ready"));
            });
        });

        // Timeline strip
        self.refresh_thumbnails(ctx);
        let timeline_action = egui::TopBottomPanel::bottom("timeline")
            .resizable(false)
            .show(ctx, |ui| timeline::show(ui, &self.strip, self.store.cursor(), editing))
            .inner;
        if let timeline::TimelineAction::Select(index) = timeline_action {
            let result = self.select_frame(index);
            self.report(result);
        }

        // Playback and project panel (right side)
        let panel_state = self.panel_state();
        let properties_action = egui::SidePanel::right("properties")
            .default_width(220.0)
            .show(ctx, |ui| {
                properties::show(ui, &mut self.fps, &mut self.resolution, &panel_state)
            })
            .inner;

        match properties_action {
            properties::PropertiesAction::Play => {
                let result = self.play();
                self.report(result);
            }
            properties::PropertiesAction::Stop => self.stop(),
            properties::PropertiesAction::SaveProject => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Quan project", &[PROJECT_EXTENSION])
                    .set_file_name(PROJECT_FILE_NAME)
                    .save_file()
                {
                    self.save_to(path);
                }
            }
            properties::PropertiesAction::LoadProject => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Quan project", &[PROJECT_EXTENSION])
                    .pick_file()
                {
                    self.request_load(path);
                }
            }
            properties::PropertiesAction::ExportVideo => {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("WebM video", &["webm"])
                    .set_file_name(format!("{}.webm", self.config.export_basename))
                    .save_file()
                {
                    self.export_to(path);
                }
            }
            properties::PropertiesAction::None => {}
        }

        // Main canvas (center)
        self.refresh_canvas_texture(ctx);
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| match self.canvas_texture.as_ref() {
                Some(texture) => canvas::show(
                    ui,
                    texture,
                    (self.store.width(), self.store.height()),
                    self.session.tool(),
                    self.editing_enabled(),
                ),
                None => canvas::CanvasAction::None,
            })
            .inner;

        let result = self.handle_canvas(canvas_action);
        self.report(result);
    }
}

impl std::fmt::Debug for QuanApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuanApp")
            .field("frames", &self.store.len())
            .field("cursor", &self.store.cursor())
            .field("playing", &self.playback.is_playing())
            .finish()
    }
}
