// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Fixed-rate preview loop over the frame store.
//!
//! The scheduler is polled from the UI thread: `tick` emits the next frame
//! once its deadline has passed, and `next_deadline` tells the shell when to
//! repaint. Because nothing runs between polls, `stop` takes effect
//! immediately and no tick can fire after it returns.

use crate::error::{EditorError, EditorResult};
use crate::models::frame::FrameStore;
use crate::models::pixel_buffer::PixelBuffer;
use std::time::{Duration, Instant};

/// Frame rate used when none (or an invalid one) is given.
pub const DEFAULT_FPS: u32 = 12;

/// Resolve a user-supplied frame rate, falling back to [`DEFAULT_FPS`].
pub fn effective_fps(requested: i64) -> u32 {
    if requested > 0 {
        u32::try_from(requested).unwrap_or(u32::MAX)
    } else {
        DEFAULT_FPS
    }
}

/// Receiver of the frames chosen for display.
pub trait DisplaySink {
    fn present(&mut self, index: usize, buffer: &PixelBuffer);
}

/// Transient state of a running preview.
#[derive(Debug, Clone)]
struct PlaybackSession {
    fps: u32,
    period: Duration,
    play_index: usize,
    next_tick: Instant,
}

#[derive(Debug, Clone, Default)]
enum PlaybackState {
    #[default]
    Stopped,
    Playing(PlaybackSession),
}

/// Two-state (stopped / playing) preview scheduler.
#[derive(Debug, Clone, Default)]
pub struct PlaybackScheduler {
    state: PlaybackState,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing(_))
    }

    /// Rate of the running session, if any.
    pub fn fps(&self) -> Option<u32> {
        match &self.state {
            PlaybackState::Playing(session) => Some(session.fps),
            PlaybackState::Stopped => None,
        }
    }

    /// When the next frame is due, if playing.
    pub fn next_deadline(&self) -> Option<Instant> {
        match &self.state {
            PlaybackState::Playing(session) => Some(session.next_tick),
            PlaybackState::Stopped => None,
        }
    }

    /// Start looping from the first frame at `fps` (<= 0 means default).
    ///
    /// Any running loop is cancelled first. Fails with
    /// `InsufficientFrames` when the store holds fewer than two frames, in
    /// which case the scheduler is left stopped.
    pub fn start(&mut self, store: &FrameStore, fps: i64, now: Instant) -> EditorResult<()> {
        self.cancel();

        if store.len() < 2 {
            log::warn!("Playback rejected: {} frame(s)", store.len());
            return Err(EditorError::InsufficientFrames { count: store.len() });
        }

        let fps = effective_fps(fps);
        let period = Duration::from_secs(1) / fps;
        self.state = PlaybackState::Playing(PlaybackSession {
            fps,
            period,
            play_index: 0,
            next_tick: now + period,
        });
        log::info!("Playback started at {} fps over {} frames", fps, store.len());
        Ok(())
    }

    /// Emit the due frame, if any. Returns the index emitted.
    ///
    /// At most one frame is emitted per call. If the caller fell more than a
    /// period behind, the schedule restarts from `now` rather than bursting.
    pub fn tick(
        &mut self,
        store: &FrameStore,
        now: Instant,
        sink: &mut dyn DisplaySink,
    ) -> Option<usize> {
        let PlaybackState::Playing(session) = &mut self.state else {
            return None;
        };
        if now < session.next_tick || store.is_empty() {
            return None;
        }

        let index = session.play_index % store.len();
        let frame = store.get(index)?;
        sink.present(index, frame.buffer());
        log::trace!("Playback tick: frame {}", index);

        session.play_index = (index + 1) % store.len();
        session.next_tick += session.period;
        if session.next_tick <= now {
            session.next_tick = now + session.period;
        }
        Some(index)
    }

    /// Stop the loop and show the frame under the store's edit cursor.
    pub fn stop(&mut self, store: &FrameStore, sink: &mut dyn DisplaySink) {
        if self.cancel() {
            log::info!("Playback stopped");
        }
        if let Ok(frame) = store.current() {
            sink.present(store.cursor(), frame.buffer());
        }
    }

    /// Drop the running session. Returns whether one was running.
    fn cancel(&mut self) -> bool {
        matches!(
            std::mem::take(&mut self.state),
            PlaybackState::Playing(_)
        )
    }
}
