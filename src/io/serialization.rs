// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Project serialization and deserialization.
//!
//! This module converts a [`FrameStore`] to and from the `.qau1` project
//! document. Frame images are encoded and decoded in parallel; results are
//! joined in document order and the first failure aborts the whole batch,
//! so a failed load never yields a partial store.

use crate::error::{EditorError, EditorResult};
use crate::io::media;
use crate::models::frame::{Frame, FrameStore};
use crate::models::pixel_buffer::{PixelBuffer, Rgba};
use crate::models::project::{FrameEntry, ProjectDocument, PROJECT_VERSION};
use crate::playback::effective_fps;
use rayon::prelude::*;
use std::path::Path;

/// Canvas a project is loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    pub blank: Rgba,
    /// Width previews are built at.
    pub thumbnail_width: u32,
}

impl CanvasSpec {
    /// The canvas a store is currently using.
    pub fn of(store: &FrameStore) -> Self {
        Self {
            width: store.width(),
            height: store.height(),
            blank: store.blank_color(),
            thumbnail_width: store.thumbnail_width(),
        }
    }
}

/// A successfully loaded project.
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub store: FrameStore,
    pub fps: u32,
}

/// Snapshot a store into a project document.
pub fn serialize(store: &FrameStore, fps: u32) -> EditorResult<ProjectDocument> {
    let frames = encode_frames(store.frames())?;
    Ok(ProjectDocument {
        version: PROJECT_VERSION.to_string(),
        fps: effective_fps(fps as i64),
        width: store.width(),
        height: store.height(),
        frames,
    })
}

/// Encode frames as data URIs in parallel, keeping their order.
fn encode_frames(frames: &[Frame]) -> EditorResult<Vec<FrameEntry>> {
    if frames.is_empty() {
        return Err(EditorError::EmptyProject);
    }
    frames
        .par_iter()
        .map(|frame| {
            media::encode_data_url(frame.buffer()).map(|data_url| FrameEntry { data_url })
        })
        .collect()
}

/// Rebuild a store from a parsed document, decoding onto `canvas`.
pub fn deserialize(document: &ProjectDocument, canvas: CanvasSpec) -> EditorResult<LoadedProject> {
    if document.frames.is_empty() {
        return Err(EditorError::malformed("No frames found"));
    }

    let buffers = document
        .frames
        .par_iter()
        .enumerate()
        .map(|(index, entry)| {
            media::decode_data_url(index, &entry.data_url, canvas.width, canvas.height)
        })
        .collect::<EditorResult<Vec<PixelBuffer>>>()
        .map_err(|e| EditorError::malformed(e.to_string()))?;

    let store = FrameStore::from_buffers(
        canvas.width,
        canvas.height,
        canvas.blank,
        canvas.thumbnail_width,
        buffers,
    )
    .map_err(|e| EditorError::malformed(e.to_string()))?;

    Ok(LoadedProject {
        store,
        fps: effective_fps(document.fps as i64),
    })
}

/// Parse raw `.qau1` text and rebuild a store.
pub fn deserialize_str(raw: &str, canvas: CanvasSpec) -> EditorResult<LoadedProject> {
    let document: ProjectDocument =
        serde_json::from_str(raw).map_err(|e| EditorError::malformed(e.to_string()))?;
    deserialize(&document, canvas)
}

/// Render a document as pretty-printed JSON.
pub fn to_json(document: &ProjectDocument) -> EditorResult<String> {
    serde_json::to_string_pretty(document).map_err(|e| EditorError::encode(e.to_string()))
}

/// Save a store to a `.qau1` file.
pub fn save_project(path: &Path, store: &FrameStore, fps: u32) -> EditorResult<()> {
    let json = to_json(&serialize(store, fps)?)?;
    std::fs::write(path, json)?;
    log::info!("Saved {} frames to {}", store.len(), path.display());
    Ok(())
}

/// Read the raw text of a `.qau1` file.
pub fn read_project(path: &Path) -> EditorResult<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Read and decode a `.qau1` file.
pub fn load_project(path: &Path, canvas: CanvasSpec) -> EditorResult<LoadedProject> {
    let raw = read_project(path)?;
    let loaded = deserialize_str(&raw, canvas)?;
    log::info!("Loaded {} frames from {}", loaded.store.len(), path.display());
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> CanvasSpec {
        CanvasSpec {
            width: 6,
            height: 4,
            blank: Rgba::WHITE,
            thumbnail_width: 3,
        }
    }

    fn painted_store() -> FrameStore {
        let mut store = FrameStore::new(6, 4, Rgba::WHITE).unwrap();
        for i in 0..3u8 {
            if i > 0 {
                store.add_frame().unwrap();
            }
            let mut buf = store.current().unwrap().buffer().clone();
            buf.set(i as u32, 1, Rgba::opaque(10 * i, 200, 0)).unwrap();
            buf.set(5, 3, Rgba::new(0, 0, 0, 7 * i)).unwrap();
            store.commit_active(&buf).unwrap();
        }
        store.select_frame(1).unwrap();
        store
    }

    #[test]
    fn test_round_trip_preserves_frames_and_order() {
        let store = painted_store();
        let doc = serialize(&store, 8).unwrap();
        assert_eq!(doc.frames.len(), 3);
        assert_eq!((doc.width, doc.height, doc.fps), (6, 4, 8));

        let loaded = deserialize(&doc, canvas()).unwrap();
        assert_eq!(loaded.fps, 8);
        assert_eq!(loaded.store.len(), 3);
        assert_eq!(loaded.store.cursor(), 0);
        for (a, b) in store.frames().iter().zip(loaded.store.frames()) {
            assert_eq!(a.buffer(), b.buffer());
        }
    }

    #[test]
    fn test_json_round_trip() {
        let store = painted_store();
        let json = to_json(&serialize(&store, 12).unwrap()).unwrap();
        let loaded = deserialize_str(&json, canvas()).unwrap();
        assert_eq!(loaded.store.frames()[2].buffer(), store.frames()[2].buffer());
    }

    #[test]
    fn test_empty_or_missing_frames_rejected() {
        for raw in [
            r#"{"version":"1.0","fps":12,"width":6,"height":4,"frames":[]}"#,
            r#"{"version":"1.0","fps":12,"width":6,"height":4}"#,
        ] {
            assert!(matches!(
                deserialize_str(raw, canvas()),
                Err(EditorError::MalformedProject(_))
            ));
        }
    }

    #[test]
    fn test_not_json_rejected() {
        assert!(matches!(
            deserialize_str("frames: nope", canvas()),
            Err(EditorError::MalformedProject(_))
        ));
    }

    #[test]
    fn test_one_bad_frame_fails_whole_load() {
        let store = painted_store();
        let mut doc = serialize(&store, 12).unwrap();
        doc.frames[1].data_url = "data:image/png;base64,AAAA".to_string();
        let err = deserialize(&doc, canvas()).unwrap_err();
        match err {
            EditorError::MalformedProject(msg) => assert!(msg.contains("frame 1")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_fps_defaults_to_twelve() {
        let store = painted_store();
        let mut doc = serialize(&store, 12).unwrap();
        doc.fps = 0;
        assert_eq!(deserialize(&doc, canvas()).unwrap().fps, 12);
    }

    #[test]
    fn test_previews_built_at_canvas_thumbnail_width() {
        let doc = serialize(&painted_store(), 12).unwrap();
        let loaded = deserialize(&doc, canvas()).unwrap();
        assert_eq!(loaded.store.thumbnail_width(), 3);
        assert_eq!(loaded.store.frames()[0].preview().width(), 3);
    }

    #[test]
    fn test_encoding_no_frames_is_empty_project() {
        assert!(matches!(encode_frames(&[]), Err(EditorError::EmptyProject)));
    }

    /// Re-parse a saved document with one top-level field replaced.
    fn with_field(field: &str, value: serde_json::Value) -> String {
        let doc = serialize(&painted_store(), 12).unwrap();
        let mut json = serde_json::to_value(&doc).unwrap();
        json[field] = value;
        json.to_string()
    }

    #[test]
    fn test_odd_fps_values_fall_back_to_twelve() {
        for fps in [
            serde_json::json!(null),
            serde_json::json!(0),
            serde_json::json!(-5),
            serde_json::json!(12.5),
            serde_json::json!("fast"),
            serde_json::json!([24]),
        ] {
            let loaded = deserialize_str(&with_field("fps", fps.clone()), canvas())
                .unwrap_or_else(|e| panic!("fps {fps} rejected: {e}"));
            assert_eq!(loaded.fps, 12, "fps {fps}");
        }
    }

    #[test]
    fn test_numeric_fps_spellings_accepted() {
        let loaded = deserialize_str(&with_field("fps", serde_json::json!("24")), canvas()).unwrap();
        assert_eq!(loaded.fps, 24);
        let loaded = deserialize_str(&with_field("fps", serde_json::json!(30.0)), canvas()).unwrap();
        assert_eq!(loaded.fps, 30);
    }

    #[test]
    fn test_informational_fields_never_block_load() {
        for (field, value) in [
            ("version", serde_json::json!(1)),
            ("version", serde_json::json!(null)),
            ("width", serde_json::json!(800.0)),
            ("width", serde_json::json!("wide")),
            ("height", serde_json::json!(null)),
            ("height", serde_json::json!(-3)),
        ] {
            let loaded = deserialize_str(&with_field(field, value.clone()), canvas())
                .unwrap_or_else(|e| panic!("{field} = {value} rejected: {e}"));
            assert_eq!(loaded.store.len(), 3);
        }
    }

    #[test]
    fn test_loads_into_target_canvas_size() {
        let store = painted_store();
        let doc = serialize(&store, 12).unwrap();
        let bigger = CanvasSpec {
            width: 12,
            height: 8,
            ..canvas()
        };
        let loaded = deserialize(&doc, bigger).unwrap();
        assert!(loaded
            .store
            .frames()
            .iter()
            .all(|f| f.buffer().dimensions() == (12, 8)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quan-project.qau1");
        let store = painted_store();
        save_project(&path, &store, 5).unwrap();

        let raw = read_project(&path).unwrap();
        assert!(raw.contains("\"dataURL\""));

        let loaded = load_project(&path, canvas()).unwrap();
        assert_eq!(loaded.fps, 5);
        assert_eq!(loaded.store.frames()[0].buffer(), store.frames()[0].buffer());
    }
}
