// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Stir/Cannula Controller Firmware
//!
//! This crate contains the firmware for a two-axis ClearPath servo controller driven from a serial
//! command stream, written in Rust, targeting an STM32F777 MCU.
//!
//! - The **stir** axis runs at a continuously variable speed, set by quadrature steps.
//! - The **cannula** axis moves between two programmed positions and homes against a switch.
//!
//! Commands arrive as ASCII frames, e.g. `<RPM:120>`, `<UP+:0>`, `<DN-:0>`.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`protocol`] | Frame reader and command decoder |
//! | [`drivers`] | Device-level drivers (ClearPath) |
//! | [`control`] | Velocity/position control, homing observer, command dispatch |
//! | [`app`] | Serial command loop and status reporting |
//! | [`config`] | Build-time constants |
//! | `hw` | MCU-level wrappers around GPIO, USART, delays (`firmware` feature) |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo run --release --features firmware --target thumbv7em-none-eabihf
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod protocol;

#[cfg(feature = "firmware")]
pub mod hw;

#[cfg(test)]
mod testing;

pub use error::{DecodeError, DispatchError, MoveError};
