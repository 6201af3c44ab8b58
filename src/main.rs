// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Quan Antemudio - frame-by-frame raster animation editor
//!
//! Draw frames with pencil, eraser and bucket fill, play them back at a
//! chosen frame rate, save and load `.qau1` projects and export video.

mod app;
mod config;
mod error;
mod io;
mod models;
mod playback;
mod raster;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::QuanApp;
use config::{EditorConfig, CONFIG_FILE};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = EditorConfig::load_or_default(Path::new(CONFIG_FILE));
    log::info!(
        "Canvas {}x{} at {} fps",
        config.canvas_width,
        config.canvas_height,
        config.default_fps
    );
    let app = QuanApp::new(config)?;

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Quan Antemudio"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Quan Antemudio",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
