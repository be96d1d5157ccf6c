// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Board Support
//!
//! MCU-level wrappers around GPIO, USART and delays for the STM32F777. Only built with the
//! `firmware` feature.

pub mod delay;
pub mod gpio;
pub mod pins;
pub mod usart;

pub use delay::{CycleDelay, SysDelay};
pub use gpio::{InputLine, OutputLine};
pub use pins::{BoardPins, CannulaAxis, HomeSensor, StirAxis};
pub use usart::SerialPort;
