// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Homing sensor observer for the cannula axis.
//!
//! The home switch is wired to an EXTI-capable pin. On every edge the interrupt handler calls
//! [`HomingObserver::on_edge`], which waits out the switch bounce, resamples the pin and posts the
//! level into a [`SensorMailbox`]. The cannula controller drains the mailbox from thread context
//! and mirrors the level onto its input B, so input B is only ever written from one place.
//!
//! The mailbox holds a single value. A newer level overwrites an unread one, which is what the
//! driver wants: only the latest switch state matters.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;

/// Single-slot handoff from interrupt context to the control loop.
pub struct SensorMailbox {
    slot: Signal<CriticalSectionRawMutex, bool>,
}

impl Default for SensorMailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorMailbox {
    pub const fn new() -> Self {
        Self {
            slot: Signal::new(),
        }
    }

    /// Publish a sensor level, replacing any unread one.
    #[inline]
    pub fn post(&self, level: bool) {
        self.slot.signal(level);
    }

    /// Take the pending level, if any.
    #[inline]
    pub fn take(&self) -> Option<bool> {
        self.slot.try_take()
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.slot.signaled()
    }
}

/// Debounced reader for the home switch.
pub struct HomingObserver<P> {
    sensor: P,
    debounce_us: u32,
    last: bool,
}

impl<P: InputPin> HomingObserver<P> {
    pub fn new(sensor: P, debounce_us: u32) -> Self {
        Self {
            sensor,
            debounce_us,
            last: false,
        }
    }

    /// Read the sensor now. A failed read repeats the previous level.
    pub fn sample(&mut self) -> bool {
        if let Ok(level) = self.sensor.is_high() {
            self.last = level;
        }
        self.last
    }

    /// Last level read from the sensor.
    #[inline]
    pub fn level(&self) -> bool {
        self.last
    }

    /// Edge handler. Debounces, resamples, and posts the level to `mailbox`.
    pub fn on_edge<D: DelayNs>(&mut self, delay: &mut D, mailbox: &SensorMailbox) -> bool {
        delay.delay_us(self.debounce_us);
        let level = self.sample();
        mailbox.post(level);
        level
    }

    /// Access the sensor pin, e.g. to acknowledge its interrupt.
    #[inline]
    pub fn sensor_mut(&mut self) -> &mut P {
        &mut self.sensor
    }

    /// Release the sensor pin.
    pub fn free(self) -> P {
        self.sensor
    }
}
