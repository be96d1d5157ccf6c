// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Splits a frame into a command name and integer value.
//!
//! The value is read the way `atoi` reads it: optional leading whitespace and sign, then as many
//! decimal digits as follow. Anything else, including no digits at all, leaves the value at 0
//! rather than failing, so `DN-:xyz` decodes to `DN-` with value 0. Out-of-range values
//! saturate.

use heapless::String;

use crate::config::FIELD_DELIMITER;
use crate::error::DecodeError;
use crate::protocol::messages::Command;
use crate::protocol::parser::Frame;

/// Decode a complete frame into a [`Command`].
pub fn decode(frame: &Frame) -> Result<Command, DecodeError> {
    let text = frame.as_str().ok_or(DecodeError::NotText)?;
    decode_str(text)
}

/// Decode frame content that is already known to be text.
pub fn decode_str(text: &str) -> Result<Command, DecodeError> {
    let (name, value) = text
        .split_once(FIELD_DELIMITER)
        .ok_or(DecodeError::MissingDelimiter)?;

    let mut owned = String::new();
    // Frame content never exceeds the name capacity.
    owned.push_str(name).map_err(|_| DecodeError::NotText)?;

    Ok(Command {
        name: owned,
        value: parse_leading_int(value),
    })
}

/// Parse the leading decimal integer of `s`, or 0 if there is none.
pub fn parse_leading_int(s: &str) -> i32 {
    let bytes = s.trim_start().as_bytes();

    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };

    let mut acc: i64 = 0;
    for &b in digits.iter().take_while(|b| b.is_ascii_digit()) {
        acc = acc * 10 + i64::from(b - b'0');
        if acc > i64::from(i32::MAX) + 1 {
            break;
        }
    }

    let signed = if negative { -acc } else { acc };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
