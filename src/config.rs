// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Settings are read from an optional YAML file. A missing file means
//! defaults; a file that fails to parse or validate is reported and the
//! defaults are used instead.

use crate::error::{EditorError, EditorResult};
use crate::models::pixel_buffer::Rgba;
use crate::playback::DEFAULT_FPS;
use crate::session::BrushWidths;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "quan.yaml";

/// Editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Fixed canvas width in pixels.
    pub canvas_width: u32,
    /// Fixed canvas height in pixels.
    pub canvas_height: u32,
    /// Frame rate shown in the playback panel at startup.
    pub default_fps: u32,
    /// Color new frames are cleared to, written `"#rrggbb"`.
    #[serde(with = "hex_color")]
    pub blank_color: Rgba,
    pub pencil_width: f32,
    pub eraser_width: f32,
    /// Width of timeline thumbnails.
    pub thumbnail_width: u32,
    /// File name (without extension) used for saves and exports.
    pub export_basename: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            default_fps: DEFAULT_FPS,
            blank_color: Rgba::WHITE,
            pencil_width: 5.0,
            eraser_width: 12.0,
            thumbnail_width: 96,
            export_basename: "quan-antemudio".to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse configuration from YAML text.
    pub fn from_yaml(yaml: &str) -> EditorResult<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| EditorError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> EditorResult<Self> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Load `path` if it exists, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Reject settings the editor cannot run with.
    pub fn validate(&self) -> EditorResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(EditorError::config("canvas dimensions must be positive"));
        }
        if self.default_fps == 0 {
            return Err(EditorError::config("default_fps must be positive"));
        }
        if !(self.pencil_width > 0.0 && self.eraser_width > 0.0) {
            return Err(EditorError::config("brush widths must be positive"));
        }
        if self.export_basename.trim().is_empty() {
            return Err(EditorError::config("export_basename must not be empty"));
        }
        Ok(())
    }

    pub fn brush_widths(&self) -> BrushWidths {
        BrushWidths {
            pencil: self.pencil_width,
            eraser: self.eraser_width,
        }
    }
}

mod hex_color {
    use crate::models::pixel_buffer::Rgba;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgba, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgba, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Rgba::from_hex(raw.trim())
            .ok_or_else(|| de::Error::custom(format!("invalid color '{raw}', expected \"#rrggbb\"")))
    }
}
