// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Teknic ClearPath-MC/SD servo driven through discrete I/O.
//!
//! Each ClearPath takes four control lines and returns one feedback line:
//! - Enable: high enables the servo. Some MSP modes home on the enable edge.
//! - Input A / Input B: mode dependent. In "Manual Velocity" mode they form a quadrature knob;
//!   in "Move to Absolute Position (2 positions, home to switch)" A selects the position and B
//!   carries the home switch.
//! - HLFB: asserted once the commanded move has been reached (ASG mode).
//! - Alert: optional shutdown output routed from the driver's alert contact.

use embedded_hal::digital::{InputPin, OutputPin};

/// Electrical level at which an input is considered asserted.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ActiveLevel {
    High,
    Low,
}

impl ActiveLevel {
    #[inline]
    fn asserted(self, is_high: bool) -> bool {
        match self {
            ActiveLevel::High => is_high,
            ActiveLevel::Low => !is_high,
        }
    }
}

/// Line-level interface the axis controllers drive.
///
/// Input A is the primary line, input B the secondary.
pub trait MotorAxis {
    /// Drive the enable line.
    fn enable(&mut self, on: bool);

    /// True while the driver reports an alert.
    fn fault_present(&mut self) -> bool;

    /// True while HLFB reports the move is complete.
    fn hlfb_asserted(&mut self) -> bool;

    fn set_input_a(&mut self, high: bool);

    fn set_input_b(&mut self, high: bool);
}

/// ClearPath driver bound to its five I/O lines.
pub struct ClearPath<EN, A, B, HLFB, FLT> {
    enable: EN,
    input_a: A,
    input_b: B,
    hlfb: HLFB,
    alert: FLT,
    hlfb_level: ActiveLevel,
    alert_level: ActiveLevel,
    enabled: bool,
}

impl<EN, A, B, HLFB, FLT> ClearPath<EN, A, B, HLFB, FLT>
where
    EN: OutputPin,
    A: OutputPin,
    B: OutputPin,
    HLFB: InputPin,
    FLT: InputPin,
{
    /// Construct a driver with active-high HLFB and alert lines. No line is touched.
    pub fn new(enable: EN, input_a: A, input_b: B, hlfb: HLFB, alert: FLT) -> Self {
        Self {
            enable,
            input_a,
            input_b,
            hlfb,
            alert,
            hlfb_level: ActiveLevel::High,
            alert_level: ActiveLevel::High,
            enabled: false,
        }
    }

    /// Set the asserted level of the HLFB line (e.g. when read through an inverting opto).
    pub fn with_hlfb_level(mut self, level: ActiveLevel) -> Self {
        self.hlfb_level = level;
        self
    }

    /// Set the asserted level of the alert line.
    pub fn with_alert_level(mut self, level: ActiveLevel) -> Self {
        self.alert_level = level;
        self
    }

    /// Last state written to the enable line.
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Release the I/O lines.
    pub fn free(self) -> (EN, A, B, HLFB, FLT) {
        (
            self.enable,
            self.input_a,
            self.input_b,
            self.hlfb,
            self.alert,
        )
    }
}

#[inline]
fn drive<P: OutputPin>(pin: &mut P, high: bool) {
    if high {
        pin.set_high().ok();
    } else {
        pin.set_low().ok();
    }
}

impl<EN, A, B, HLFB, FLT> MotorAxis for ClearPath<EN, A, B, HLFB, FLT>
where
    EN: OutputPin,
    A: OutputPin,
    B: OutputPin,
    HLFB: InputPin,
    FLT: InputPin,
{
    fn enable(&mut self, on: bool) {
        drive(&mut self.enable, on);
        self.enabled = on;
    }

    fn fault_present(&mut self) -> bool {
        match self.alert.is_high() {
            Ok(high) => self.alert_level.asserted(high),
            // Can't tell: refuse to move.
            Err(_) => true,
        }
    }

    fn hlfb_asserted(&mut self) -> bool {
        match self.hlfb.is_high() {
            Ok(high) => self.hlfb_level.asserted(high),
            Err(_) => false,
        }
    }

    fn set_input_a(&mut self, high: bool) {
        drive(&mut self.input_a, high);
    }

    fn set_input_b(&mut self, high: bool) {
        drive(&mut self.input_b, high);
    }
}
