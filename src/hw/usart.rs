// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! USART abstraction layer.
//!
//! The same port carries incoming command frames and the outgoing status lines. Status lines go
//! through `core::fmt::Write`, so use `write!` with an explicit `\r\n` for correct line endings
//! on the terminal.
//!
//! To access the terminal on the host machine, connect to the debug USB port and use
//! ```text
//! $ screen /dev/tty.usbmodem* <baud_rate>
//! ```
//!
//! To close the debug terminal, press `Ctrl+A` then `Ctrl+\` then `y`.

use core::fmt;
use nb::block;

use stm32f7xx_hal::{
    prelude::*,
    serial::{Instance, Pins, Rx, Serial, Tx},
};

pub struct SerialPort<U: Instance> {
    tx: Tx<U>,
    rx: Rx<U>,
}

impl<U: Instance> SerialPort<U> {
    pub fn new<PINS: Pins<U>>(serial: Serial<U, PINS>) -> Self {
        let (tx, rx) = serial.split();
        Self { tx, rx }
    }

    #[inline]
    pub fn write_byte(&mut self, b: u8) {
        let _ = block!(self.tx.write(b));
    }

    pub fn write_str(&mut self, s: &str) {
        for &b in s.as_bytes() {
            self.write_byte(b);
        }
    }

    /// Non-blocking read. Returns `None` if nothing has arrived; receive errors (overrun,
    /// framing, noise) drop the byte.
    pub fn read_byte(&mut self) -> Option<u8> {
        self.rx.read().ok()
    }
}

// Implement `core::fmt::Write` so the status output can use `write!`.
impl<U: Instance> fmt::Write for SerialPort<U> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        SerialPort::write_str(self, s);
        Ok(())
    }
}
