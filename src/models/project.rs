// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project document model.
//!
//! The on-disk `.qau1` format is a JSON object holding the frame rate, the
//! canvas size and one lossless image per frame, embedded as a data URI.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Format version written by this editor. Informational only.
pub const PROJECT_VERSION: &str = "1.0";

/// File extension of project documents.
pub const PROJECT_EXTENSION: &str = "qau1";

/// Complete project data for serialization.
///
/// Only `frames` decides whether a document is usable. The other fields are
/// read leniently: a value of the wrong type reads as its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: String,
    /// Frames per second. Zero means the default rate.
    #[serde(default, deserialize_with = "lenient_count")]
    pub fps: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub width: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub height: u32,
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
}

/// One serialized frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    #[serde(rename = "dataURL")]
    pub data_url: String,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// A positive whole number, from a JSON number or numeric string; 0 for
/// anything else.
fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let number = match &value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(match number {
        Some(n) if n >= 1.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => n as u32,
        _ => 0,
    })
}
