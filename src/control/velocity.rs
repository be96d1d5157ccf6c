// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Velocity control for the stir axis.
//!
//! The stir ClearPath runs in "Manual Velocity Control" mode, where inputs A and B behave like a
//! quadrature knob. Every full A/B cycle moves the commanded speed by one resolution step, and
//! the order in which A and B lead tells the driver which way to turn the knob.
//!
//! Step counts are always computed from rounded grid positions, so repeated partial commands
//! never accumulate rounding error:
//!
//! ```text
//! steps = |round(requested / res) - round(commanded / res)|
//! ```

use embedded_hal::delay::DelayNs;
#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::StirConfig;
use crate::control::wait::CompletionWait;
use crate::drivers::MotorAxis;
use crate::error::MoveError;

/// Which way the virtual knob is turned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// A leads B; commanded speed increases.
    Forward,
    /// B leads A; commanded speed decreases.
    Reverse,
}

/// A velocity move that reached its target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VelocityReached {
    pub velocity: f32,
    pub pulses: u64,
    pub direction: Direction,
}

/// Stir axis controller. Owns the commanded velocity for the life of the firmware.
pub struct VelocityController<M> {
    axis: M,
    config: StirConfig,
    wait: CompletionWait,
    /// Last accepted request, in RPM.
    commanded: f32,
    /// Grid position of `commanded`.
    commanded_steps: i64,
}

impl<M: MotorAxis> VelocityController<M> {
    /// Create a controller for an axis currently at rest (0 RPM).
    pub fn new(axis: M, config: StirConfig, wait: CompletionWait) -> Self {
        Self {
            axis,
            config,
            wait,
            commanded: 0.0,
            commanded_steps: 0,
        }
    }

    /// Last velocity accepted by [`move_at_velocity`](Self::move_at_velocity), in RPM.
    #[inline]
    pub fn commanded_velocity(&self) -> f32 {
        self.commanded
    }

    /// Commanded velocity snapped to the resolution grid, i.e. what the driver is running at.
    #[inline]
    pub fn quantized_velocity(&self) -> f32 {
        self.commanded_steps as f32 * self.config.resolution
    }

    #[inline]
    pub fn commanded_steps(&self) -> i64 {
        self.commanded_steps
    }

    #[inline]
    pub fn config(&self) -> &StirConfig {
        &self.config
    }

    /// Access the underlying axis.
    pub fn axis(&mut self) -> &mut M {
        &mut self.axis
    }

    /// Enable the servo and wait for HLFB to report it ready. The driver starts at 0 RPM.
    pub fn enable<D: DelayNs>(&mut self, delay: &mut D) -> Result<u32, MoveError> {
        self.axis.enable(true);
        self.commanded = 0.0;
        self.commanded_steps = 0;

        let axis = &mut self.axis;
        self.wait.until(delay, || axis.hlfb_asserted())
    }

    /// Grid position of an arbitrary velocity.
    fn steps_for(&self, velocity: f32) -> i64 {
        (velocity / self.config.resolution).round() as i64
    }

    /// Check a request against the current state without touching any line.
    pub fn check(&mut self, requested: f32) -> Result<(), MoveError> {
        if requested == self.commanded {
            return Err(MoveError::NoChange);
        }

        let max_forward = self.config.max_forward;
        let max_reverse = self.config.max_reverse;
        if requested > max_forward as f32 || requested < -(max_reverse as f32) {
            return Err(MoveError::OutOfRange {
                requested,
                max_forward,
                max_reverse,
            });
        }

        if self.axis.fault_present() {
            return Err(MoveError::FaultPresent);
        }

        Ok(())
    }

    /// Command a new stir velocity (RPM, positive = forward) and block until HLFB asserts.
    pub fn move_at_velocity<D: DelayNs>(
        &mut self,
        delay: &mut D,
        requested: f32,
    ) -> Result<VelocityReached, MoveError> {
        self.move_at_velocity_with(delay, requested, || {})
    }

    /// Like [`move_at_velocity`](Self::move_at_velocity), calling `idle` after every pulse and
    /// between HLFB polls.
    ///
    /// Once pulses have gone out the new velocity is committed even if the wait then times out.
    pub fn move_at_velocity_with<D, I>(
        &mut self,
        delay: &mut D,
        requested: f32,
        mut idle: I,
    ) -> Result<VelocityReached, MoveError>
    where
        D: DelayNs,
        I: FnMut(),
    {
        self.check(requested)?;

        let target_steps = self.steps_for(requested);
        let delta = target_steps - self.commanded_steps;
        let pulses = delta.unsigned_abs();
        let direction = if requested > self.commanded {
            Direction::Forward
        } else {
            Direction::Reverse
        };

        for _ in 0..pulses {
            self.pulse(delay, direction);
            idle();
        }

        self.commanded = requested;
        self.commanded_steps = target_steps;

        let axis = &mut self.axis;
        self.wait.until(delay, || {
            idle();
            axis.hlfb_asserted()
        })?;

        Ok(VelocityReached {
            velocity: requested,
            pulses,
            direction,
        })
    }

    /// One full quadrature cycle (four edges).
    fn pulse<D: DelayNs>(&mut self, delay: &mut D, direction: Direction) {
        let phase_us = self.config.phase_delay_us;
        let edges: [(bool, bool); 4] = match direction {
            // (drive A?, level)
            Direction::Forward => [(true, true), (false, true), (true, false), (false, false)],
            Direction::Reverse => [(false, true), (true, true), (false, false), (true, false)],
        };

        for (line_a, level) in edges {
            if line_a {
                self.axis.set_input_a(level);
            } else {
                self.axis.set_input_b(level);
            }
            delay.delay_us(phase_us);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{WaitConfig, MIN_VELOCITY_RESOLUTION};
    use crate::testing::{FakeAxis, Line};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    fn controller(resolution: f32) -> VelocityController<FakeAxis> {
        VelocityController::new(
            FakeAxis::new(),
            StirConfig::default()
                .with_resolution(resolution)
                .with_limits(1000, 800),
            CompletionWait::default(),
        )
    }

    const FORWARD: [(Line, bool); 4] = [
        (Line::A, true),
        (Line::B, true),
        (Line::A, false),
        (Line::B, false),
    ];

    const REVERSE: [(Line, bool); 4] = [
        (Line::B, true),
        (Line::A, true),
        (Line::B, false),
        (Line::A, false),
    ];

    #[test]
    fn forward_move_emits_quantized_pulses() {
        let mut ctl = controller(2.0);
        let reached = ctl.move_at_velocity(&mut NoopDelay::new(), 10.0).unwrap();

        assert_eq!(reached.pulses, 5);
        assert_eq!(reached.direction, Direction::Forward);
        assert_eq!(ctl.commanded_velocity(), 10.0);

        let writes = ctl.axis().take_writes();
        assert_eq!(writes.len(), 20);
        for chunk in writes.chunks(4) {
            assert_eq!(chunk, &FORWARD[..]);
        }
    }

    #[test]
    fn reverse_move_emits_reverse_phase_order() {
        let mut ctl = controller(2.0);
        ctl.move_at_velocity(&mut NoopDelay::new(), 10.0).unwrap();
        ctl.axis().take_writes();

        let reached = ctl.move_at_velocity(&mut NoopDelay::new(), 4.0).unwrap();
        assert_eq!(reached.pulses, 3);
        assert_eq!(reached.direction, Direction::Reverse);

        let writes = ctl.axis().take_writes();
        assert_eq!(writes.len(), 12);
        for chunk in writes.chunks(4) {
            assert_eq!(chunk, &REVERSE[..]);
        }
    }

    #[test]
    fn negative_velocity_runs_reverse() {
        let mut ctl = controller(2.0);
        let reached = ctl.move_at_velocity(&mut NoopDelay::new(), -6.0).unwrap();
        assert_eq!(reached.pulses, 3);
        assert_eq!(reached.direction, Direction::Reverse);
        assert_eq!(ctl.commanded_steps(), -3);
    }

    #[test]
    fn same_velocity_is_no_change() {
        let mut ctl = controller(2.0);
        ctl.move_at_velocity(&mut NoopDelay::new(), 100.0).unwrap();
        ctl.axis().take_writes();

        assert_eq!(
            ctl.move_at_velocity(&mut NoopDelay::new(), 100.0),
            Err(MoveError::NoChange)
        );
        assert!(ctl.axis().take_writes().is_empty());
    }

    #[test]
    fn zero_at_rest_is_no_change() {
        let mut ctl = controller(2.0);
        assert_eq!(
            ctl.move_at_velocity(&mut NoopDelay::new(), 0.0),
            Err(MoveError::NoChange)
        );
    }

    #[test]
    fn out_of_range_leaves_state() {
        let mut ctl = controller(2.0);
        ctl.move_at_velocity(&mut NoopDelay::new(), 20.0).unwrap();
        ctl.axis().take_writes();

        let err = ctl.move_at_velocity(&mut NoopDelay::new(), 1001.0).unwrap_err();
        assert_eq!(
            err,
            MoveError::OutOfRange {
                requested: 1001.0,
                max_forward: 1000,
                max_reverse: 800,
            }
        );
        assert!(matches!(
            ctl.move_at_velocity(&mut NoopDelay::new(), -801.0),
            Err(MoveError::OutOfRange { .. })
        ));

        assert_eq!(ctl.commanded_velocity(), 20.0);
        assert!(ctl.axis().take_writes().is_empty());

        // Limits themselves are accepted.
        assert!(ctl.move_at_velocity(&mut NoopDelay::new(), -800.0).is_ok());
        assert!(ctl.move_at_velocity(&mut NoopDelay::new(), 1000.0).is_ok());
    }

    #[test]
    fn fault_rejects_without_pulses() {
        let mut ctl = controller(2.0);
        ctl.axis().set_fault(true);

        assert_eq!(
            ctl.move_at_velocity(&mut NoopDelay::new(), 50.0),
            Err(MoveError::FaultPresent)
        );
        assert_eq!(ctl.commanded_velocity(), 0.0);
        assert!(ctl.axis().take_writes().is_empty());
    }

    #[test]
    fn rounding_does_not_drift() {
        // 3 RPM steps from 0: round(2.5) = 3 -> 3 pulses, then 6 RPM is grid 3 as well.
        let mut ctl = controller(2.0);
        assert_eq!(ctl.move_at_velocity(&mut NoopDelay::new(), 5.0).unwrap().pulses, 3);
        assert_eq!(ctl.move_at_velocity(&mut NoopDelay::new(), 6.0).unwrap().pulses, 0);
        assert_eq!(ctl.quantized_velocity(), 6.0);

        // Walking back down by 1 RPM at a time lands exactly where a single jump would.
        for v in (0..6).rev() {
            ctl.move_at_velocity(&mut NoopDelay::new(), v as f32).unwrap();
        }
        assert_eq!(ctl.commanded_steps(), 0);
        assert_eq!(ctl.quantized_velocity(), 0.0);
    }

    #[test]
    fn blocks_until_hlfb() {
        let mut ctl = controller(2.0);
        ctl.axis().hlfb_after(7);

        let mut idles = 0;
        ctl.move_at_velocity_with(&mut NoopDelay::new(), 4.0, || idles += 1)
            .unwrap();
        assert_eq!(ctl.axis().hlfb_polls(), 8);
        // Two pulses, then eight polls.
        assert_eq!(idles, 2 + 8);
    }

    #[test]
    fn enable_resets_commanded_velocity() {
        let mut ctl = controller(2.0);
        ctl.move_at_velocity(&mut NoopDelay::new(), 40.0).unwrap();
        ctl.axis().take_writes();
        ctl.axis().hlfb_after(2);

        assert_eq!(ctl.enable(&mut NoopDelay::new()), Ok(2));
        assert_eq!(ctl.commanded_velocity(), 0.0);
        assert_eq!(ctl.commanded_steps(), 0);
        assert_eq!(ctl.axis().take_writes(), [(Line::Enable, true)]);
    }

    #[test]
    fn timeout_still_commits_velocity() {
        let mut ctl = VelocityController::new(
            FakeAxis::new(),
            StirConfig::default(),
            CompletionWait::new(WaitConfig::default().with_timeout_ms(Some(5))),
        );
        ctl.axis().hlfb_after(u32::MAX);

        assert_eq!(
            ctl.move_at_velocity(&mut NoopDelay::new(), 10.0),
            Err(MoveError::Timeout)
        );
        assert_eq!(ctl.commanded_velocity(), 10.0);
    }

    #[test]
    fn tiny_resolution_does_not_overflow() {
        let mut ctl = VelocityController::new(
            FakeAxis::new(),
            StirConfig::default()
                .with_limits(u32::MAX, u32::MAX)
                .with_resolution(1e-9),
            CompletionWait::default(),
        );
        assert_eq!(ctl.config().resolution, MIN_VELOCITY_RESOLUTION);

        ctl.move_at_velocity(&mut NoopDelay::new(), 0.004).unwrap();
        assert_eq!(ctl.commanded_steps(), 4);
        ctl.axis().take_writes();

        // Largest reversal the limits allow still fits the step arithmetic.
        let from = u32::MAX as f32;
        let to = -(u32::MAX as f32);
        let expected = (from / MIN_VELOCITY_RESOLUTION).round() as i64
            - (to / MIN_VELOCITY_RESOLUTION).round() as i64;
        assert!(expected > i64::from(i32::MAX));
        assert_eq!(ctl.steps_for(from) - ctl.steps_for(to), expected);
    }
}
