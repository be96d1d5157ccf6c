// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Delay providers.
//!
//! - `SysDelay` wraps the SysTick delay for the main loop.
//! - `CycleDelay` busy-waits on the cycle counter and is safe to use from interrupt handlers,
//!   which cannot borrow SysTick from the main loop.

use cortex_m::asm;
use cortex_m::delay::Delay;
use embedded_hal::delay::DelayNs;

/// SysTick-backed blocking delay.
pub struct SysDelay {
    inner: Delay,
}

impl SysDelay {
    pub fn new(inner: Delay) -> Self {
        Self { inner }
    }
}

impl DelayNs for SysDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.inner.delay_us(ns.div_ceil(1000));
    }

    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.inner.delay_us(us);
    }

    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.inner.delay_ms(ms);
    }
}

/// Instruction-cycle busy wait.
#[derive(Copy, Clone)]
pub struct CycleDelay {
    sysclk_hz: u32,
}

impl CycleDelay {
    pub fn new(sysclk_hz: u32) -> Self {
        Self { sysclk_hz }
    }
}

impl DelayNs for CycleDelay {
    fn delay_ns(&mut self, ns: u32) {
        let cycles = u64::from(ns) * u64::from(self.sysclk_hz) / 1_000_000_000;
        asm::delay(cycles.max(1) as u32);
    }
}
