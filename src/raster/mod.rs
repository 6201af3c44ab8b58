// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Pixel algorithms applied to frame buffers.

pub mod fill;
pub mod stroke;
