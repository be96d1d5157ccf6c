// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 stir/cannula controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpioc, gpiod, Alternate, Floating, Input},
    pac,
    prelude::*,
};

use crate::drivers::ClearPath;
use crate::hw::gpio::{InputLine, OutputLine};

/// Stir ClearPath on connector J1.
pub type StirAxis = ClearPath<
    OutputLine<'D', 12>,
    OutputLine<'D', 13>,
    OutputLine<'D', 14>,
    InputLine<'D', 11>,
    InputLine<'A', 2>,
>;

/// Cannula ClearPath on connector J2.
pub type CannulaAxis = ClearPath<
    OutputLine<'A', 4>,
    OutputLine<'A', 3>,
    OutputLine<'D', 15>,
    InputLine<'D', 0>,
    InputLine<'D', 3>,
>;

/// Home switch, EXTI line 6.
pub type HomeSensor = InputLine<'C', 6>;

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOC, dp.GPIOD);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub stir: StirAxis,
    pub cannula: CannulaAxis,
    pub home: gpioc::PC6<Input<Floating>>,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals. Every output starts low, so both
    /// servos come up disabled.
    pub fn new(gpioa: pac::GPIOA, gpioc: pac::GPIOC, gpiod: pac::GPIOD) -> Self {
        let gpioa = gpioa.split();
        let gpioc = gpioc.split();
        let gpiod = gpiod.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            stir: ClearPath::new(
                OutputLine::new(gpiod.pd12), // ENABLE
                OutputLine::new(gpiod.pd13), // INPUT A
                OutputLine::new(gpiod.pd14), // INPUT B
                InputLine::new(gpiod.pd11),  // HLFB
                InputLine::new(gpioa.pa2),   // ALERT
            ),

            cannula: ClearPath::new(
                OutputLine::new(gpioa.pa4),  // ENABLE
                OutputLine::new(gpioa.pa3),  // INPUT A
                OutputLine::new(gpiod.pd15), // INPUT B
                InputLine::new(gpiod.pd0),   // HLFB
                InputLine::new(gpiod.pd3),   // ALERT
            ),

            home: gpioc.pc6.into_floating_input(),
        }
    }
}
