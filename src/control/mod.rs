// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Motion control for the two axes and the glue that routes serial commands to them.
//!
//! ## Modules
//!
//! - [`velocity`] - Quadrature-stepped velocity control for the stir axis.
//! - [`position`] - Two-position control for the cannula axis.
//! - [`homing`] - Debounced home switch observer and its interrupt-safe mailbox.
//! - [`wait`] - HLFB polling with timeout, and idle-aware settle delays.
//! - [`dispatcher`] - Command to controller mapping.

pub mod dispatcher;
pub mod homing;
pub mod position;
pub mod velocity;
pub mod wait;

pub use dispatcher::{Dispatcher, Outcome};
pub use homing::{HomingObserver, SensorMailbox};
pub use position::{CannulaPosition, PositionController};
pub use velocity::{Direction, VelocityController, VelocityReached};
pub use wait::CompletionWait;
