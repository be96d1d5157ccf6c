// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod decoder;
pub mod messages;
pub mod parser;

pub use decoder::decode;
pub use messages::{Command, Opcode};
pub use parser::{Frame, FrameReader};
