// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! control logic. Drivers are written against `embedded-hal` traits so they run unchanged on the
//! board and against host fakes.
//!
//! ## Existing drivers
//!
//! - [`clearpath`] – Teknic ClearPath servo over enable / A / B / HLFB / alert lines

pub mod clearpath;

pub use clearpath::{ActiveLevel, ClearPath, MotorAxis};
