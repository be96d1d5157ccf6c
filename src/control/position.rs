// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-position control for the cannula axis.
//!
//! The cannula ClearPath runs "Move to Absolute Position (2 positions, home to switch)". Input A
//! picks the target (low = position 1, high = position 2) and input B carries the home switch,
//! mirrored from the [`HomingObserver`](crate::control::HomingObserver) mailbox.
//!
//! The driver filters its inputs, so after changing A we wait slightly longer than the filter
//! window before watching HLFB; otherwise HLFB may still report the previous move as done.

use embedded_hal::delay::DelayNs;

use crate::config::CannulaConfig;
use crate::control::homing::SensorMailbox;
use crate::control::wait::{settle, CompletionWait};
use crate::drivers::MotorAxis;
use crate::error::MoveError;

/// The two programmed cannula positions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CannulaPosition {
    /// Position 1, retracted.
    Up,
    /// Position 2, inserted.
    Down,
}

impl CannulaPosition {
    pub fn from_index(index: i32) -> Option<Self> {
        match index {
            1 => Some(CannulaPosition::Up),
            2 => Some(CannulaPosition::Down),
            _ => None,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            CannulaPosition::Up => 1,
            CannulaPosition::Down => 2,
        }
    }

    /// Input A level that selects this position. Fixed by the MSP configuration.
    #[inline]
    pub fn input_a_level(self) -> bool {
        match self {
            CannulaPosition::Up => false,
            CannulaPosition::Down => true,
        }
    }
}

/// Cannula axis controller.
pub struct PositionController<'a, M> {
    axis: M,
    config: CannulaConfig,
    wait: CompletionWait,
    home_events: &'a SensorMailbox,
    position: Option<CannulaPosition>,
    home_sensor: Option<bool>,
}

/// Move a pending sensor level from the mailbox onto input B.
fn mirror_home_sensor<M: MotorAxis>(
    mailbox: &SensorMailbox,
    axis: &mut M,
    mirrored: &mut Option<bool>,
) -> Option<bool> {
    let level = mailbox.take()?;
    axis.set_input_b(level);
    *mirrored = Some(level);
    Some(level)
}

impl<'a, M: MotorAxis> PositionController<'a, M> {
    pub fn new(
        axis: M,
        config: CannulaConfig,
        wait: CompletionWait,
        home_events: &'a SensorMailbox,
    ) -> Self {
        Self {
            axis,
            config,
            wait,
            home_events,
            position: None,
            home_sensor: None,
        }
    }

    /// Last position written to input A, if any.
    #[inline]
    pub fn position(&self) -> Option<CannulaPosition> {
        self.position
    }

    /// Last home sensor level written to input B, if any.
    #[inline]
    pub fn home_sensor(&self) -> Option<bool> {
        self.home_sensor
    }

    #[inline]
    pub fn config(&self) -> &CannulaConfig {
        &self.config
    }

    /// Access the underlying axis.
    pub fn axis(&mut self) -> &mut M {
        &mut self.axis
    }

    /// Release the axis.
    pub fn free(self) -> M {
        self.axis
    }

    /// Apply a pending homing sensor change to input B. Returns the level written, if any.
    pub fn sync_home_sensor(&mut self) -> Option<bool> {
        mirror_home_sensor(self.home_events, &mut self.axis, &mut self.home_sensor)
    }

    /// Enable the servo and wait for HLFB. With "home to switch" the driver homes on enable,
    /// so sensor changes keep being mirrored while waiting.
    pub fn enable<D: DelayNs>(&mut self, delay: &mut D) -> Result<u32, MoveError> {
        self.sync_home_sensor();
        self.axis.enable(true);

        let mailbox = self.home_events;
        let axis = &mut self.axis;
        let mirrored = &mut self.home_sensor;
        self.wait.until(delay, || {
            mirror_home_sensor(mailbox, axis, mirrored);
            axis.hlfb_asserted()
        })
    }

    /// Move to position `index` (1 or 2) and block until HLFB asserts.
    pub fn move_to_position<D: DelayNs>(
        &mut self,
        delay: &mut D,
        index: i32,
    ) -> Result<CannulaPosition, MoveError> {
        if self.axis.fault_present() {
            return Err(MoveError::FaultPresent);
        }

        let target = CannulaPosition::from_index(index).ok_or(MoveError::InvalidPosition(index))?;

        self.axis.set_input_a(target.input_a_level());
        self.position = Some(target);

        let mailbox = self.home_events;
        let axis = &mut self.axis;
        let mirrored = &mut self.home_sensor;

        settle(delay, self.config.settle_ms(), || {
            mirror_home_sensor(mailbox, axis, mirrored);
        });

        self.wait.until(delay, || {
            mirror_home_sensor(mailbox, axis, mirrored);
            axis.hlfb_asserted()
        })?;

        Ok(target)
    }
}
