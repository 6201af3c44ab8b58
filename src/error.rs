// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types shared by the editor core.
//!
//! Pixel-access errors indicate a caller bug; frame-store, playback and
//! project errors are user-actionable and are reported as notices by the
//! application shell.

/// Convenience result type used across the editor core.
pub type EditorResult<T> = Result<T, EditorError>;

/// Error taxonomy for the editor core.
#[derive(thiserror::Error, Debug)]
pub enum EditorError {
    /// Pixel access outside the buffer extents.
    #[error("pixel ({x}, {y}) is outside the {width}x{height} buffer")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: u32,
        height: u32,
    },

    /// The frame store holds no frames.
    #[error("the frame store is empty")]
    EmptyStore,

    /// Deleting the only remaining frame.
    #[error("can't delete the last frame")]
    LastFrameProtected,

    /// Selecting a frame that does not exist.
    #[error("frame {index} does not exist (store holds {len} frames)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Playback needs at least two frames.
    #[error("need at least 2 frames to play, have {count}")]
    InsufficientFrames { count: usize },

    /// A buffer does not match the canvas size.
    #[error("expected a {expected_width}x{expected_height} buffer, got {width}x{height}")]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    /// Serializing a project with no frames.
    #[error("a project needs at least one frame")]
    EmptyProject,

    /// A project document failed structural or content validation.
    #[error("invalid .qau1 project: {0}")]
    MalformedProject(String),

    /// A single frame image could not be decoded.
    #[error("frame {index} failed to decode: {reason}")]
    DecodeFailure { index: usize, reason: String },

    /// Image or video encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Editor configuration is unreadable or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EditorError {
    /// Build a [`EditorError::MalformedProject`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedProject(msg.into())
    }

    /// Build a [`EditorError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`EditorError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether the error is a user-facing blocked action rather than a bug.
    pub fn is_user_actionable(&self) -> bool {
        !matches!(self, Self::OutOfBounds { .. } | Self::DimensionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_problem() {
        let err = EditorError::InsufficientFrames { count: 1 };
        assert_eq!(err.to_string(), "need at least 2 frames to play, have 1");

        let err = EditorError::EmptyProject;
        assert_eq!(err.to_string(), "a project needs at least one frame");

        let err = EditorError::malformed("No frames found");
        assert_eq!(err.to_string(), "invalid .qau1 project: No frames found");
    }

    #[test]
    fn test_user_actionable_split() {
        assert!(EditorError::LastFrameProtected.is_user_actionable());
        assert!(EditorError::malformed("x").is_user_actionable());
        let bug = EditorError::OutOfBounds {
            x: -1,
            y: 0,
            width: 4,
            height: 4,
        };
        assert!(!bug.is_user_actionable());
    }
}
