// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Build-time configuration for both axes and the serial command link.
//!
//! The constants are the values the board ships with. The config structs wrap them so a caller
//! (or a test) can override individual values with the `with_*` setters.

use static_assertions::const_assert;

/// Serial frame buffer size, including the terminator slot.
pub const FRAME_BUFFER_SIZE: usize = 32;

/// Maximum frame content length in bytes.
pub const FRAME_CAPACITY: usize = FRAME_BUFFER_SIZE - 1;

/// Frame start marker.
pub const FRAME_START: u8 = b'<';

/// Frame end marker.
pub const FRAME_END: u8 = b'>';

/// Separator between command name and value.
pub const FIELD_DELIMITER: char = ':';

/// Fastest forward (CW) stir speed accepted, in RPM.
pub const MAX_FORWARD_RPM: u32 = 1000;

/// Fastest reverse (CCW) stir speed accepted, in RPM.
pub const MAX_REVERSE_RPM: u32 = 1000;

/// RPM change encoded by one quadrature step. Must match the MSP "Max speed / knob resolution"
/// setting of the stir motor.
pub const VELOCITY_RESOLUTION: f32 = 2.0;

/// Finest resolution [`StirConfig::with_resolution`] accepts.
pub const MIN_VELOCITY_RESOLUTION: f32 = 0.001;

/// Hold time of each of the four quadrature phases.
pub const PULSE_PHASE_DELAY_US: u32 = 5;

/// Input A/B filter window configured in the ClearPath MSP.
pub const INPUT_FILTER_MS: u32 = 20;

/// Extra wait on top of the filter window before a cannula input is trusted.
pub const SETTLE_MARGIN_MS: u32 = 2;

/// Quiet time after each RPM command before the next frame is dispatched.
pub const POST_VELOCITY_SETTLE_MS: u32 = 1000;

/// Delay between a homing sensor edge and its resample.
pub const HOME_DEBOUNCE_US: u32 = 1000;

/// Interval between HLFB polls while a move is in progress.
pub const HLFB_POLL_INTERVAL_US: u32 = 1000;

/// Give up on HLFB after this long.
pub const HLFB_TIMEOUT_MS: u32 = 30_000;

// The sensor mirror must be written before the cannula's input filter window closes.
const_assert!(HOME_DEBOUNCE_US < INPUT_FILTER_MS * 1000);
const_assert!(SETTLE_MARGIN_MS > 0);
const_assert!(FRAME_BUFFER_SIZE >= 2);

/// Stir axis (continuous velocity) parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StirConfig {
    pub max_forward: u32,
    pub max_reverse: u32,
    pub resolution: f32,
    pub phase_delay_us: u32,
    pub post_move_settle_ms: u32,
}

impl Default for StirConfig {
    fn default() -> Self {
        Self {
            max_forward: MAX_FORWARD_RPM,
            max_reverse: MAX_REVERSE_RPM,
            resolution: VELOCITY_RESOLUTION,
            phase_delay_us: PULSE_PHASE_DELAY_US,
            post_move_settle_ms: POST_VELOCITY_SETTLE_MS,
        }
    }
}

impl StirConfig {
    /// Set the accepted speed envelope.
    pub fn with_limits(mut self, max_forward: u32, max_reverse: u32) -> Self {
        self.max_forward = max_forward;
        self.max_reverse = max_reverse;
        self
    }

    /// Set the RPM-per-step quantization. Non-positive values are ignored; anything finer than
    /// [`MIN_VELOCITY_RESOLUTION`] is raised to it.
    pub fn with_resolution(mut self, resolution: f32) -> Self {
        if resolution > 0.0 {
            self.resolution = resolution.max(MIN_VELOCITY_RESOLUTION);
        }
        self
    }

    pub fn with_post_move_settle_ms(mut self, ms: u32) -> Self {
        self.post_move_settle_ms = ms;
        self
    }
}

/// Cannula axis (two-position) parameters.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CannulaConfig {
    pub input_filter_ms: u32,
    pub settle_margin_ms: u32,
    pub debounce_us: u32,
}

impl Default for CannulaConfig {
    fn default() -> Self {
        Self {
            input_filter_ms: INPUT_FILTER_MS,
            settle_margin_ms: SETTLE_MARGIN_MS,
            debounce_us: HOME_DEBOUNCE_US,
        }
    }
}

impl CannulaConfig {
    /// Set the driver filter window. The margin is kept at least 1 ms.
    pub fn with_filter(mut self, input_filter_ms: u32, settle_margin_ms: u32) -> Self {
        self.input_filter_ms = input_filter_ms;
        self.settle_margin_ms = settle_margin_ms.max(1);
        self
    }

    /// Time to wait after writing input A before the driver acts on it.
    #[inline]
    pub fn settle_ms(&self) -> u32 {
        self.input_filter_ms + self.settle_margin_ms
    }
}

/// HLFB polling policy shared by both axes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct WaitConfig {
    pub poll_interval_us: u32,
    /// `None` waits forever.
    pub timeout_ms: Option<u32>,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_us: HLFB_POLL_INTERVAL_US,
            timeout_ms: Some(HLFB_TIMEOUT_MS),
        }
    }
}

impl WaitConfig {
    pub fn with_poll_interval_us(mut self, us: u32) -> Self {
        self.poll_interval_us = us;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: Option<u32>) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Wait for HLFB with no upper bound.
    pub fn unbounded() -> Self {
        Self::default().with_timeout_ms(None)
    }
}
