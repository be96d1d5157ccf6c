// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error types for the command link and both axes.
//!
//! None of these are fatal. A rejected move leaves the axis state untouched and the command loop
//! carries on with the next frame. The `Display` text is what gets printed on the status line.

use thiserror::Error;

/// A frame that could not be split into a command name and value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// No `:` between name and value.
    #[error("missing ':' between name and value")]
    MissingDelimiter,

    /// Frame bytes are not valid ASCII/UTF-8.
    #[error("frame is not valid text")]
    NotText,
}

/// A decoded command the dispatcher has no mapping for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("unknown command")]
    UnknownCommand,
}

/// Why a stir or cannula move did not complete.
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum MoveError {
    /// Requested velocity equals the commanded one; nothing to do.
    #[error("velocity already commanded")]
    NoChange,

    #[error("velocity {requested} outside -{max_reverse}..{max_forward} RPM")]
    OutOfRange {
        requested: f32,
        max_forward: u32,
        max_reverse: u32,
    },

    /// The ClearPath is reporting an alert.
    #[error("motor alert present")]
    FaultPresent,

    #[error("invalid position index {0}")]
    InvalidPosition(i32),

    /// HLFB never asserted within the configured timeout.
    #[error("timed out waiting for HLFB")]
    Timeout,
}
