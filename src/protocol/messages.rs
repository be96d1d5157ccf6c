// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Command message protocol used to drive the stir and cannula axes.
//!
//! Frames are ASCII and look like `<NAME:VALUE>`, e.g. `<RPM:120>` or `<UP+:0>`. Names are
//! case-sensitive. Delimiters cannot be escaped.

use heapless::String;

use crate::config::FRAME_CAPACITY;

// Command names
pub const CMD_RPM: &str = "RPM";
pub const CMD_UP: &str = "UP+";
pub const CMD_DOWN: &str = "DN-";

/// A command name and its integer argument, decoded from one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub name: String<FRAME_CAPACITY>,
    pub value: i32,
}

impl Command {
    /// The known opcode for this command, if any.
    #[inline]
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_name(&self.name)
    }
}

/// Commands the dispatcher knows how to run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// Stir at the given RPM.
    Rpm,
    /// Raise the cannula (position 1).
    Up,
    /// Lower the cannula (position 2).
    Down,
}

impl Opcode {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            CMD_RPM => Some(Opcode::Rpm),
            CMD_UP => Some(Opcode::Up),
            CMD_DOWN => Some(Opcode::Down),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::Rpm => CMD_RPM,
            Opcode::Up => CMD_UP,
            Opcode::Down => CMD_DOWN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(Opcode::from_name("RPM"), Some(Opcode::Rpm));
        assert_eq!(Opcode::from_name("rpm"), None);
        assert_eq!(Opcode::from_name("UP+"), Some(Opcode::Up));
        assert_eq!(Opcode::from_name("DN-"), Some(Opcode::Down));
        assert_eq!(Opcode::from_name("DN"), None);
    }
}
