// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side fakes shared by the unit tests.

use core::cell::Cell;
use core::convert::Infallible;
use std::boxed::Box;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin};

use crate::drivers::MotorAxis;

/// Output line of a fake axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line {
    Enable,
    A,
    B,
}

/// Axis that logs every line write in order.
pub struct FakeAxis {
    writes: Vec<(Line, bool)>,
    fault: bool,
    hlfb_after: u32,
    hlfb_polls: u32,
    poll_hook: Option<Box<dyn FnMut(u32)>>,
}

impl FakeAxis {
    pub fn new() -> Self {
        Self {
            writes: Vec::new(),
            fault: false,
            hlfb_after: 0,
            hlfb_polls: 0,
            poll_hook: None,
        }
    }

    pub fn set_fault(&mut self, fault: bool) {
        self.fault = fault;
    }

    /// HLFB reads false for the next `polls` polls, then true.
    pub fn hlfb_after(&mut self, polls: u32) {
        self.hlfb_after = polls;
        self.hlfb_polls = 0;
    }

    pub fn hlfb_polls(&self) -> u32 {
        self.hlfb_polls
    }

    /// Run `hook` with the poll number on every HLFB read.
    pub fn on_hlfb_poll(&mut self, hook: impl FnMut(u32) + 'static) {
        self.poll_hook = Some(Box::new(hook));
    }

    pub fn take_writes(&mut self) -> Vec<(Line, bool)> {
        core::mem::take(&mut self.writes)
    }
}

impl MotorAxis for FakeAxis {
    fn enable(&mut self, on: bool) {
        self.writes.push((Line::Enable, on));
    }

    fn fault_present(&mut self) -> bool {
        self.fault
    }

    fn hlfb_asserted(&mut self) -> bool {
        self.hlfb_polls += 1;
        if let Some(hook) = self.poll_hook.as_mut() {
            hook(self.hlfb_polls);
        }
        self.hlfb_polls > self.hlfb_after
    }

    fn set_input_a(&mut self, high: bool) {
        self.writes.push((Line::A, high));
    }

    fn set_input_b(&mut self, high: bool) {
        self.writes.push((Line::B, high));
    }
}

/// Input pin whose level is set from the test body.
pub struct FakeSensor {
    level: Rc<Cell<bool>>,
}

impl FakeSensor {
    pub fn new(level: Rc<Cell<bool>>) -> Self {
        Self { level }
    }
}

impl ErrorType for FakeSensor {
    type Error = Infallible;
}

impl InputPin for FakeSensor {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.get())
    }
}

/// Delay that only adds up how long it was asked to wait.
#[derive(Default)]
pub struct RecordingDelay {
    total_ns: u64,
}

impl RecordingDelay {
    pub fn total_us(&self) -> u64 {
        self.total_ns / 1000
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
