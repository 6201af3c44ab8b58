// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video export.
//!
//! Frames are rendered to the output size in parallel, joined in sequence
//! order, handed to a [`VideoEncoder`] one by one and finalized only after
//! the last frame. Encoding itself is delegated to the system `ffmpeg`.

use crate::error::{EditorError, EditorResult};
use crate::io::media::{fit_to, flatten_onto};
use crate::models::frame::FrameStore;
use crate::models::pixel_buffer::{PixelBuffer, Rgba};
use crate::playback::effective_fps;
use image::RgbaImage;
use rayon::prelude::*;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

/// Output resolution choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportResolution {
    /// The canvas size.
    #[default]
    Native,
    Hd720,
    Hd1080,
}

impl ExportResolution {
    pub const ALL: [ExportResolution; 3] = [Self::Native, Self::Hd720, Self::Hd1080];

    /// Output size for a canvas of `width` x `height`.
    pub fn dimensions(self, width: u32, height: u32) -> (u32, u32) {
        match self {
            Self::Native => (width, height),
            Self::Hd720 => (1280, 720),
            Self::Hd1080 => (1920, 1080),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Native => "Native",
            Self::Hd720 => "720p",
            Self::Hd1080 => "1080p",
        }
    }
}

/// Parameters given to an encoder before the first frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

/// Consumer of rendered frames.
///
/// `submit` is called with strictly increasing indices starting at 0, and
/// `finalize` once after the last frame.
pub trait VideoEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> EditorResult<()>;
    fn submit(&mut self, index: usize, frame: &RgbaImage) -> EditorResult<()>;
    fn finalize(&mut self) -> EditorResult<()>;

    /// Discard a partially written export.
    fn abort(&mut self) {}
}

/// Render one frame for output: scaled to size and flattened onto white.
pub fn render_frame(buffer: &PixelBuffer, width: u32, height: u32) -> RgbaImage {
    let mut image = fit_to(&buffer.to_image(), width, height);
    flatten_onto(&mut image, Rgba::WHITE);
    image
}

/// Export every frame of `store` through `encoder`. Returns the frame count.
///
/// Frames are rendered in parallel a batch at a time, so only one batch of
/// output-sized images is alive at once.
pub fn export_video(
    store: &FrameStore,
    fps: u32,
    resolution: ExportResolution,
    encoder: &mut dyn VideoEncoder,
) -> EditorResult<usize> {
    let batch = rayon::current_num_threads().max(1) * 2;
    export_video_batched(store, fps, resolution, encoder, batch)
}

fn export_video_batched(
    store: &FrameStore,
    fps: u32,
    resolution: ExportResolution,
    encoder: &mut dyn VideoEncoder,
    batch: usize,
) -> EditorResult<usize> {
    if store.is_empty() {
        return Err(EditorError::EmptyStore);
    }
    let (width, height) = resolution.dimensions(store.width(), store.height());
    let cfg = EncoderConfig {
        width,
        height,
        fps: effective_fps(fps as i64),
    };

    encoder.begin(cfg)?;
    let mut index = 0;
    for chunk in store.frames().chunks(batch.max(1)) {
        let rendered: Vec<RgbaImage> = chunk
            .par_iter()
            .map(|frame| render_frame(frame.buffer(), width, height))
            .collect();
        for image in &rendered {
            if let Err(e) = encoder.submit(index, image) {
                encoder.abort();
                return Err(e);
            }
            index += 1;
        }
    }
    encoder.finalize()?;
    log::info!(
        "Exported {} frames at {}x{} / {} fps",
        index,
        width,
        height,
        cfg.fps
    );
    Ok(index)
}

/// In-memory encoder that keeps every submitted frame.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryEncoder {
    pub config: Option<EncoderConfig>,
    pub frames: Vec<(usize, RgbaImage)>,
    pub finalized: bool,
}

#[cfg(test)]
impl VideoEncoder for MemoryEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> EditorResult<()> {
        self.config = Some(cfg);
        self.frames.clear();
        self.finalized = false;
        Ok(())
    }

    fn submit(&mut self, index: usize, frame: &RgbaImage) -> EditorResult<()> {
        if self.finalized {
            return Err(EditorError::encode("encoder already finalized"));
        }
        self.frames.push((index, frame.clone()));
        Ok(())
    }

    fn finalize(&mut self) -> EditorResult<()> {
        self.finalized = true;
        Ok(())
    }
}

/// Encoder that streams raw RGBA frames into a system `ffmpeg` process
/// producing a WebM file.
pub struct FfmpegEncoder {
    out_path: PathBuf,
    cfg: Option<EncoderConfig>,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,
    next_index: usize,
}

impl FfmpegEncoder {
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            cfg: None,
            child: None,
            stdin: None,
            stderr_drain: None,
            next_index: 0,
        }
    }

    pub fn out_path(&self) -> &Path {
        &self.out_path
    }
}

impl VideoEncoder for FfmpegEncoder {
    fn begin(&mut self, cfg: EncoderConfig) -> EditorResult<()> {
        if cfg.width == 0 || cfg.height == 0 || cfg.fps == 0 {
            return Err(EditorError::encode("output size and fps must be non-zero"));
        }
        if !is_ffmpeg_on_path() {
            return Err(EditorError::encode(
                "ffmpeg is required for video export, but was not found on PATH",
            ));
        }
        if let Some(parent) = self.out_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .args(["-y", "-loglevel", "error", "-f", "rawvideo", "-pix_fmt", "rgba"])
            .args(["-s", &format!("{}x{}", cfg.width, cfg.height)])
            .args(["-r", &cfg.fps.to_string()])
            .args(["-i", "pipe:0"])
            // yuv420p needs even dimensions.
            .args(["-vf", "pad=ceil(iw/2)*2:ceil(ih/2)*2:color=white"])
            .args(["-c:v", "libvpx-vp9", "-b:v", "0", "-crf", "30", "-pix_fmt", "yuv420p"])
            .arg(&self.out_path);

        let mut child = cmd
            .spawn()
            .map_err(|e| EditorError::encode(format!("failed to spawn ffmpeg: {e}")))?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EditorError::encode("failed to open ffmpeg stdin"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| EditorError::encode("failed to open ffmpeg stderr"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut bytes = Vec::new();
            stderr.read_to_end(&mut bytes)?;
            Ok(bytes)
        });

        self.cfg = Some(cfg);
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.next_index = 0;
        Ok(())
    }

    fn submit(&mut self, index: usize, frame: &RgbaImage) -> EditorResult<()> {
        let cfg = self
            .cfg
            .ok_or_else(|| EditorError::encode("ffmpeg encoder not started"))?;
        if index != self.next_index {
            return Err(EditorError::encode(format!(
                "frame {index} submitted out of order (expected {})",
                self.next_index
            )));
        }
        if frame.dimensions() != (cfg.width, cfg.height) {
            return Err(EditorError::encode(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| EditorError::encode("ffmpeg encoder already finalized"))?;
        stdin
            .write_all(frame.as_raw())
            .map_err(|e| EditorError::encode(format!("failed to write frame to ffmpeg: {e}")))?;
        self.next_index += 1;
        Ok(())
    }

    fn finalize(&mut self) -> EditorResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| EditorError::encode("ffmpeg encoder not started"))?;
        let status = child.wait()?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| EditorError::encode("ffmpeg stderr drain thread panicked"))??,
            None => Vec::new(),
        };
        self.cfg = None;

        if !status.success() {
            return Err(EditorError::encode(format!(
                "ffmpeg exited with status {}: {}",
                status,
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        log::info!("Wrote {}", self.out_path.display());
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.stderr_drain = None;
        self.cfg = None;
        let _ = std::fs::remove_file(&self.out_path);
    }
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
