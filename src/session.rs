// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing session: tool state and the working buffer.
//!
//! The session owns the single buffer the paint surface mutates. Edits land
//! there first and reach the [`FrameStore`] only through
//! [`FrameStore::commit_active`] at the end of a discrete action (stroke
//! release, bucket fill, clear), so intermediate stroke states are never
//! stored.

use crate::error::EditorResult;
use crate::models::frame::FrameStore;
use crate::models::pixel_buffer::{PixelBuffer, Rgba};
use crate::playback::DisplaySink;
use crate::raster::fill::flood_fill;
use crate::raster::stroke::{draw_segment, CanvasPoint};

/// Current painting tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Pencil,
    Eraser,
    Bucket,
}

/// Stroke widths in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushWidths {
    pub pencil: f32,
    pub eraser: f32,
}

impl Default for BrushWidths {
    fn default() -> Self {
        Self {
            pencil: 5.0,
            eraser: 12.0,
        }
    }
}

/// Explicit editing context held by the application shell.
#[derive(Debug, Clone)]
pub struct EditSession {
    tool: Tool,
    color: Rgba,
    brush: BrushWidths,
    drawing: bool,
    last_point: Option<CanvasPoint>,
    working: PixelBuffer,
}

impl EditSession {
    /// Open a session on the store's active frame.
    pub fn new(store: &FrameStore, brush: BrushWidths) -> EditorResult<Self> {
        Ok(Self {
            tool: Tool::default(),
            color: Rgba::BLACK,
            brush,
            drawing: false,
            last_point: None,
            working: store.current()?.buffer().clone(),
        })
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Set the paint color. Painting is always opaque.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color.to_opaque();
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// The buffer currently shown on the canvas.
    pub fn working(&self) -> &PixelBuffer {
        &self.working
    }

    /// Replace the working buffer with a copy of the store's active frame.
    ///
    /// An unfinished stroke is discarded.
    pub fn load_frame(&mut self, store: &FrameStore) -> EditorResult<()> {
        self.drawing = false;
        self.last_point = None;
        self.working.copy_from(store.current()?.buffer())
    }

    /// Replace the working buffer outright, e.g. after a project load
    /// changes the canvas.
    pub fn reset(&mut self, store: &FrameStore) -> EditorResult<()> {
        self.drawing = false;
        self.last_point = None;
        self.working = store.current()?.buffer().clone();
        Ok(())
    }

    fn stroke_style(&self) -> (f32, Rgba) {
        match self.tool {
            Tool::Eraser => (self.brush.eraser, Rgba::WHITE),
            _ => (self.brush.pencil, self.color),
        }
    }

    /// Press: start a pencil or eraser stroke at `point`.
    pub fn begin_stroke(&mut self, point: CanvasPoint) {
        if self.tool == Tool::Bucket {
            return;
        }
        self.drawing = true;
        self.last_point = None;
        self.continue_stroke(point);
    }

    /// Drag: extend the stroke to `point`.
    pub fn continue_stroke(&mut self, point: CanvasPoint) {
        if !self.drawing {
            return;
        }
        let (width, color) = self.stroke_style();
        let from = self.last_point.unwrap_or(point);
        draw_segment(&mut self.working, from, point, width, color);
        self.last_point = Some(point);
    }

    /// Release: finish the stroke and commit it. Returns whether a stroke
    /// was in progress.
    pub fn end_stroke(&mut self, store: &mut FrameStore) -> EditorResult<bool> {
        if !self.drawing {
            return Ok(false);
        }
        self.drawing = false;
        self.last_point = None;
        store.commit_active(&self.working)?;
        Ok(true)
    }

    /// Bucket fill at `point` and commit. Returns whether anything changed.
    pub fn bucket_fill(&mut self, point: CanvasPoint, store: &mut FrameStore) -> EditorResult<bool> {
        if self.tool != Tool::Bucket {
            return Ok(false);
        }
        let Some((x, y)) = point.to_pixel(&self.working) else {
            return Ok(false);
        };
        if !flood_fill(&mut self.working, x, y, self.color)? {
            return Ok(false);
        }
        store.commit_active(&self.working)?;
        Ok(true)
    }

    /// Clear the working buffer to opaque white and commit.
    pub fn clear(&mut self, store: &mut FrameStore) -> EditorResult<()> {
        self.drawing = false;
        self.last_point = None;
        self.working.fill(Rgba::WHITE);
        store.commit_active(&self.working)
    }
}

impl DisplaySink for EditSession {
    fn present(&mut self, index: usize, buffer: &PixelBuffer) {
        if let Err(e) = self.working.copy_from(buffer) {
            log::error!("Cannot display frame {}: {}", index, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (FrameStore, EditSession) {
        let store = FrameStore::new(20, 20, Rgba::WHITE).unwrap();
        let session = EditSession::new(&store, BrushWidths::default()).unwrap();
        (store, session)
    }

    #[test]
    fn test_stroke_commits_only_on_release() {
        let (mut store, mut session) = setup();
        session.begin_stroke(CanvasPoint::new(2.0, 10.0));
        session.continue_stroke(CanvasPoint::new(18.0, 10.0));

        assert_eq!(session.working().get(10, 10).unwrap(), Rgba::BLACK);
        assert_eq!(store.current().unwrap().buffer().get(10, 10).unwrap(), Rgba::WHITE);

        assert!(session.end_stroke(&mut store).unwrap());
        assert_eq!(store.current().unwrap().buffer().get(10, 10).unwrap(), Rgba::BLACK);
        assert!(!session.end_stroke(&mut store).unwrap());
    }

    #[test]
    fn test_eraser_paints_white() {
        let (mut store, mut session) = setup();
        session.set_tool(Tool::Bucket);
        session.bucket_fill(CanvasPoint::new(1.0, 1.0), &mut store).unwrap();
        assert_eq!(session.working().get(5, 5).unwrap(), Rgba::BLACK);

        session.set_tool(Tool::Eraser);
        session.begin_stroke(CanvasPoint::new(5.0, 5.0));
        session.end_stroke(&mut store).unwrap();
        assert_eq!(store.current().unwrap().buffer().get(5, 5).unwrap(), Rgba::WHITE);
    }

    #[test]
    fn test_bucket_fill_commits_once_and_skips_noop() {
        let (mut store, mut session) = setup();
        session.set_tool(Tool::Bucket);
        session.set_color(Rgba::opaque(0, 128, 0));

        assert!(session.bucket_fill(CanvasPoint::new(3.0, 3.0), &mut store).unwrap());
        assert_eq!(store.current().unwrap().revision(), 1);

        assert!(!session.bucket_fill(CanvasPoint::new(3.0, 3.0), &mut store).unwrap());
        assert_eq!(store.current().unwrap().revision(), 1);
    }

    #[test]
    fn test_bucket_outside_canvas_is_ignored() {
        let (mut store, mut session) = setup();
        session.set_tool(Tool::Bucket);
        assert!(!session.bucket_fill(CanvasPoint::new(25.0, 3.0), &mut store).unwrap());
    }

    #[test]
    fn test_bucket_tool_does_not_stroke() {
        let (mut store, mut session) = setup();
        session.set_tool(Tool::Bucket);
        session.begin_stroke(CanvasPoint::new(5.0, 5.0));
        assert!(!session.is_drawing());
        assert!(!session.end_stroke(&mut store).unwrap());
    }

    #[test]
    fn test_clear_is_white_and_committed() {
        let (mut store, mut session) = setup();
        session.begin_stroke(CanvasPoint::new(5.0, 5.0));
        session.end_stroke(&mut store).unwrap();
        session.clear(&mut store).unwrap();
        assert!(store.current().unwrap().buffer().as_raw().iter().all(|&b| b == 255));
    }

    #[test]
    fn test_switching_frames_reloads_working_buffer() {
        let (mut store, mut session) = setup();
        session.begin_stroke(CanvasPoint::new(5.0, 5.0));
        session.end_stroke(&mut store).unwrap();

        store.add_frame().unwrap();
        session.load_frame(&store).unwrap();
        assert_eq!(session.working().get(5, 5).unwrap(), Rgba::WHITE);

        store.select_frame(0).unwrap();
        session.load_frame(&store).unwrap();
        assert_eq!(session.working().get(5, 5).unwrap(), Rgba::BLACK);
    }

    #[test]
    fn test_color_is_forced_opaque() {
        let (_, mut session) = setup();
        session.set_color(Rgba::new(1, 2, 3, 50));
        assert_eq!(session.color(), Rgba::opaque(1, 2, 3));
    }
}
