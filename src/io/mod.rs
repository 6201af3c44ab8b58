// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: project files, frame images and video export.

pub mod export;
pub mod loader;
pub mod media;
pub mod serialization;
