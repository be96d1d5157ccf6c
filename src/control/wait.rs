// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Blocking waits used while an axis is moving.
//!
//! Both axes report completion on HLFB and the firmware has nothing else to do while a move is
//! in flight, so the wait is a simple poll loop. The poll closure runs once per interval and is
//! also where callers do housekeeping (e.g. mirroring the homing sensor) while blocked.

use embedded_hal::delay::DelayNs;

use crate::config::WaitConfig;
use crate::error::MoveError;

/// Poll-until-done with an optional timeout.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CompletionWait {
    config: WaitConfig,
}

impl Default for CompletionWait {
    fn default() -> Self {
        Self::new(WaitConfig::default())
    }
}

impl CompletionWait {
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Call `poll` until it returns true, sleeping `poll_interval_us` between calls.
    ///
    /// Returns the number of failed polls before completion, or [`MoveError::Timeout`] once the
    /// configured timeout has elapsed.
    pub fn until<D, F>(&self, delay: &mut D, mut poll: F) -> Result<u32, MoveError>
    where
        D: DelayNs,
        F: FnMut() -> bool,
    {
        let interval = self.config.poll_interval_us;
        let limit_us = self.config.timeout_ms.map(|ms| u64::from(ms) * 1000);

        let mut elapsed_us: u64 = 0;
        let mut polls: u32 = 0;

        loop {
            if poll() {
                return Ok(polls);
            }
            if let Some(limit) = limit_us {
                if elapsed_us >= limit {
                    return Err(MoveError::Timeout);
                }
            }
            delay.delay_us(interval);
            elapsed_us += u64::from(interval.max(1));
            polls = polls.saturating_add(1);
        }
    }
}

/// Sleep for `ms` milliseconds in 1 ms slices, calling `idle` around each slice.
pub fn settle<D, I>(delay: &mut D, ms: u32, mut idle: I)
where
    D: DelayNs,
    I: FnMut(),
{
    idle();
    for _ in 0..ms {
        delay.delay_ms(1);
        idle();
    }
}
