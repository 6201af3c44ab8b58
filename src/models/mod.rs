// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: pixel buffers, frames and project documents.

pub mod frame;
pub mod pixel_buffer;
pub mod project;
