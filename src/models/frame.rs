// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frames and the ordered frame store.
//!
//! The [`FrameStore`] owns every committed frame buffer. Callers read frames
//! through shared references and change them only by committing a copy of
//! their working buffer, so no committed buffer is ever aliased.
//!
//! Invariants held after every public operation:
//! - the store holds at least one frame
//! - the cursor indexes an existing frame
//! - every frame has the canvas dimensions

use super::pixel_buffer::{PixelBuffer, Rgba};
use crate::error::{EditorError, EditorResult};
use image::RgbaImage;

/// Default preview width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 96;

/// Stable identity of a frame within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// One painted image of the animation plus its cached preview.
#[derive(Debug, Clone)]
pub struct Frame {
    id: FrameId,
    revision: u64,
    buffer: PixelBuffer,
    preview: RgbaImage,
}

impl Frame {
    pub fn id(&self) -> FrameId {
        self.id
    }

    /// Bumped every time new content is committed to the frame.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Display-only thumbnail. Never a source of pixel data.
    pub fn preview(&self) -> &RgbaImage {
        &self.preview
    }
}

/// Ordered frames with a cursor on the frame open for editing.
#[derive(Debug, Clone)]
pub struct FrameStore {
    frames: Vec<Frame>,
    cursor: usize,
    width: u32,
    height: u32,
    blank: Rgba,
    thumbnail_width: u32,
    next_id: u64,
    generation: u64,
}

impl FrameStore {
    /// Create a store seeded with one blank frame.
    pub fn new(width: u32, height: u32, blank: Rgba) -> EditorResult<Self> {
        Self::with_thumbnail_width(width, height, blank, THUMBNAIL_WIDTH)
    }

    /// Create a store seeded with one blank frame and custom preview width.
    pub fn with_thumbnail_width(
        width: u32,
        height: u32,
        blank: Rgba,
        thumbnail_width: u32,
    ) -> EditorResult<Self> {
        let first = PixelBuffer::filled(width, height, blank)?;
        let mut store = Self::empty(width, height, blank, thumbnail_width);
        store.push_frame(first);
        Ok(store)
    }

    /// Build a store from already decoded buffers, cursor on the first.
    /// Previews are made once, at `thumbnail_width`.
    ///
    /// Fails with `EmptyStore` for an empty list and `DimensionMismatch` if
    /// any buffer is not `width` x `height`.
    pub fn from_buffers(
        width: u32,
        height: u32,
        blank: Rgba,
        thumbnail_width: u32,
        buffers: Vec<PixelBuffer>,
    ) -> EditorResult<Self> {
        if buffers.is_empty() {
            return Err(EditorError::EmptyStore);
        }
        let mut store = Self::empty(width, height, blank, thumbnail_width);
        for buffer in &buffers {
            store.check_dimensions(buffer)?;
        }
        for buffer in buffers {
            store.push_frame(buffer);
        }
        store.cursor = 0;
        Ok(store)
    }

    fn empty(width: u32, height: u32, blank: Rgba, thumbnail_width: u32) -> Self {
        Self {
            frames: Vec::new(),
            cursor: 0,
            width,
            height,
            blank,
            thumbnail_width: thumbnail_width.max(1),
            next_id: 0,
            generation: 0,
        }
    }

    /// Width previews are made at.
    pub fn thumbnail_width(&self) -> u32 {
        self.thumbnail_width
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The color new blank frames are cleared to.
    pub fn blank_color(&self) -> Rgba {
        self.blank
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Index of the active frame.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Counter bumped on every mutation, for listing views to refresh.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// The active frame.
    pub fn current(&self) -> EditorResult<&Frame> {
        self.frames.get(self.cursor).ok_or(EditorError::EmptyStore)
    }

    /// Append a blank frame and make it active. Returns its index.
    pub fn add_frame(&mut self) -> EditorResult<usize> {
        let buffer = PixelBuffer::filled(self.width, self.height, self.blank)?;
        self.add_frame_with(buffer)
    }

    /// Append a frame holding `buffer` and make it active. Returns its index.
    pub fn add_frame_with(&mut self, buffer: PixelBuffer) -> EditorResult<usize> {
        self.check_dimensions(&buffer)?;
        self.push_frame(buffer);
        self.cursor = self.frames.len() - 1;
        log::info!("Added frame {}, total: {}", self.cursor, self.frames.len());
        Ok(self.cursor)
    }

    /// Insert a deep copy of the active frame right after it and make the
    /// copy active. Returns the copy's index.
    pub fn duplicate_current(&mut self) -> EditorResult<usize> {
        let source = self.current()?;
        let copy = Frame {
            id: FrameId(self.next_id),
            revision: 0,
            buffer: source.buffer.clone(),
            preview: source.preview.clone(),
        };
        self.next_id += 1;
        self.frames.insert(self.cursor + 1, copy);
        self.cursor += 1;
        self.generation += 1;
        log::info!("Duplicated frame into {}, total: {}", self.cursor, self.frames.len());
        Ok(self.cursor)
    }

    /// Remove the active frame. The cursor stays at the same index, or
    /// moves to the new last frame if the last one was removed.
    pub fn delete_current(&mut self) -> EditorResult<()> {
        match self.frames.len() {
            0 => return Err(EditorError::EmptyStore),
            1 => return Err(EditorError::LastFrameProtected),
            _ => {}
        }
        self.frames.remove(self.cursor);
        self.cursor = self.cursor.min(self.frames.len() - 1);
        self.generation += 1;
        log::info!("Deleted frame, cursor: {}, total: {}", self.cursor, self.frames.len());
        Ok(())
    }

    /// Make `index` the active frame.
    pub fn select_frame(&mut self, index: usize) -> EditorResult<()> {
        if index >= self.frames.len() {
            return Err(EditorError::IndexOutOfRange {
                index,
                len: self.frames.len(),
            });
        }
        if index != self.cursor {
            self.cursor = index;
            self.generation += 1;
        }
        Ok(())
    }

    /// Replace the active frame's content with a copy of `buffer` and
    /// regenerate its preview.
    pub fn commit_active(&mut self, buffer: &PixelBuffer) -> EditorResult<()> {
        self.check_dimensions(buffer)?;
        let thumbnail_width = self.thumbnail_width;
        let cursor = self.cursor;
        let frame = self.frames.get_mut(cursor).ok_or(EditorError::EmptyStore)?;
        frame.buffer.copy_from(buffer)?;
        frame.preview = make_preview(&frame.buffer, thumbnail_width);
        frame.revision += 1;
        self.generation += 1;
        log::debug!("Committed frame {} (revision {})", cursor, frame.revision);
        Ok(())
    }

    fn push_frame(&mut self, buffer: PixelBuffer) {
        let preview = make_preview(&buffer, self.thumbnail_width);
        self.frames.push(Frame {
            id: FrameId(self.next_id),
            revision: 0,
            buffer,
            preview,
        });
        self.next_id += 1;
        self.generation += 1;
    }

    fn check_dimensions(&self, buffer: &PixelBuffer) -> EditorResult<()> {
        if buffer.dimensions() != (self.width, self.height) {
            return Err(EditorError::DimensionMismatch {
                expected_width: self.width,
                expected_height: self.height,
                width: buffer.width(),
                height: buffer.height(),
            });
        }
        Ok(())
    }
}

fn make_preview(buffer: &PixelBuffer, thumbnail_width: u32) -> RgbaImage {
    let (w, h) = buffer.dimensions();
    let tw = thumbnail_width.min(w).max(1);
    let th = ((h as u64 * tw as u64) / w as u64).max(1) as u32;
    image::imageops::thumbnail(&buffer.to_image(), tw, th)
}
