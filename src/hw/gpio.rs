// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `embedded-hal` 1.0 views of HAL GPIO pins.
//!
//! The drivers in this crate are written against `embedded_hal::digital`; these wrappers let the
//! STM32F7 pins plug straight into them. GPIO access on this part cannot fail.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use stm32f7xx_hal::gpio::{self, Floating, Input, Output, PushPull};

/// Push-pull output line.
pub struct OutputLine<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Output<PushPull>>,
}

impl<const P: char, const N: u8> OutputLine<P, N> {
    /// Take a pin in any mode and drive it low.
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        let mut pin = pin.into_push_pull_output();
        pin.set_low();
        Self { pin }
    }
}

impl<const P: char, const N: u8> ErrorType for OutputLine<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> OutputPin for OutputLine<P, N> {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low();
        Ok(())
    }
}

/// Floating input line (all ClearPath outputs are externally pulled).
pub struct InputLine<const P: char, const N: u8> {
    pin: gpio::Pin<P, N, Input<Floating>>,
}

impl<const P: char, const N: u8> InputLine<P, N> {
    pub fn new<MODE>(pin: gpio::Pin<P, N, MODE>) -> Self {
        Self {
            pin: pin.into_floating_input(),
        }
    }

    /// Raw pin, e.g. for EXTI configuration.
    #[inline]
    pub fn pin_mut(&mut self) -> &mut gpio::Pin<P, N, Input<Floating>> {
        &mut self.pin
    }
}

impl<const P: char, const N: u8> ErrorType for InputLine<P, N> {
    type Error = Infallible;
}

impl<const P: char, const N: u8> InputPin for InputLine<P, N> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(self.pin.is_low())
    }
}
