// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Frame reader for the serial command protocol.
//!
//! Bytes are pushed in one at a time as they arrive on the USART. Anything outside a
//! `<`...`>` pair is dropped. A frame longer than [`FRAME_CAPACITY`] keeps its first
//! `FRAME_CAPACITY - 1` bytes and the most recent byte in the last slot, and is flagged as
//! truncated so the caller can warn about it.

use core::mem;

use heapless::Vec;

use crate::config::{FRAME_CAPACITY, FRAME_END, FRAME_START};

/// One complete frame, markers stripped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8, FRAME_CAPACITY>,
    truncated: bool,
}

impl Frame {
    /// Build a frame from raw content, applying the same overflow rule as the reader.
    pub fn new(content: &[u8]) -> Self {
        let mut frame = Self::default();
        for &b in content {
            frame.push(b);
        }
        frame
    }

    fn push(&mut self, byte: u8) {
        if self.bytes.push(byte).is_err() {
            // Full: the newest byte replaces the last slot.
            if let Some(last) = self.bytes.last_mut() {
                *last = byte;
            }
            self.truncated = true;
        }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Frame content as text, if it is valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// True if bytes were dropped because the frame outgrew the buffer.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

enum State {
    WaitStart,
    InFrame,
}

pub struct FrameReader {
    state: State,
    frame: Frame,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameReader {
    pub const fn new() -> Self {
        Self {
            state: State::WaitStart,
            frame: Frame {
                bytes: Vec::new(),
                truncated: false,
            },
        }
    }

    /// True while between a start marker and its end marker.
    #[inline]
    pub fn in_frame(&self) -> bool {
        matches!(self.state, State::InFrame)
    }

    /// Process a single incoming byte. Returns `Some(Frame)` when an end marker closes a frame.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            State::WaitStart => {
                if byte == FRAME_START {
                    self.state = State::InFrame;
                    self.frame = Frame::default();
                }
            }
            State::InFrame => {
                if byte == FRAME_END {
                    self.state = State::WaitStart;
                    return Some(mem::take(&mut self.frame));
                }
                // A second start marker is ordinary content here.
                self.frame.push(byte);
            }
        }
        None
    }
}
