// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Background project loading.
//!
//! Each request reads and decodes a project on a worker thread and reports
//! back over a channel. Only the most recent request is honored: issuing a
//! new one drops the previous receiver, so a superseded load can never
//! reach the frame store.

use super::serialization::{load_project, CanvasSpec, LoadedProject};
use crate::error::EditorResult;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, TryRecvError};

struct PendingLoad {
    ticket: u64,
    path: PathBuf,
    receiver: Receiver<(u64, EditorResult<LoadedProject>)>,
}

/// Last-request-wins project loader.
#[derive(Default)]
pub struct ProjectLoader {
    next_ticket: u64,
    pending: Option<PendingLoad>,
}

impl ProjectLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Path of the load in flight, if any.
    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|p| p.path.as_path())
    }

    /// Start loading `path`, superseding any load in flight. Returns the
    /// request's ticket.
    pub fn request(&mut self, path: PathBuf, canvas: CanvasSpec) -> u64 {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        if let Some(old) = self.pending.take() {
            log::info!("Load of {} superseded", old.path.display());
        }

        let (sender, receiver) = channel();
        let worker_path = path.clone();
        std::thread::spawn(move || {
            let result = load_project(&worker_path, canvas);
            // The receiver is gone if this request was superseded.
            let _ = sender.send((ticket, result));
        });

        self.pending = Some(PendingLoad {
            ticket,
            path,
            receiver,
        });
        ticket
    }

    /// Take the result of the current request if it has finished.
    pub fn poll(&mut self) -> Option<EditorResult<LoadedProject>> {
        let pending = self.pending.as_ref()?;
        match pending.receiver.try_recv() {
            Ok((ticket, result)) => self.finish(ticket, result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                log::error!("Loader thread for {} died", pending.path.display());
                self.pending = None;
                None
            }
        }
    }

    /// Block up to `timeout` for the current request.
    #[cfg(test)]
    pub fn wait(
        &mut self,
        timeout: std::time::Duration,
    ) -> Option<EditorResult<LoadedProject>> {
        use std::sync::mpsc::RecvTimeoutError;

        let pending = self.pending.as_ref()?;
        match pending.receiver.recv_timeout(timeout) {
            Ok((ticket, result)) => self.finish(ticket, result),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.pending = None;
                None
            }
        }
    }

    fn finish(
        &mut self,
        ticket: u64,
        result: EditorResult<LoadedProject>,
    ) -> Option<EditorResult<LoadedProject>> {
        let pending = self.pending.take()?;
        if pending.ticket != ticket {
            log::warn!("Discarding stale load result #{}", ticket);
            self.pending = Some(pending);
            return None;
        }
        Some(result)
    }
}
