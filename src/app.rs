// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Serial command loop.
//!
//! Bytes from the USART go in through [`CommandLoop::on_byte`]; every complete frame is decoded,
//! dispatched and reported on the status output. The status output is any `core::fmt::Write`
//! sink, normally the USART itself. Lines end in `\r\n` for the terminal.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! app.bring_up(&mut delay, &mut usart)?;
//!
//! loop {
//!     if let Some(byte) = usart.read_byte() {
//!         app.on_byte(&mut delay, &mut usart, byte);
//!     }
//!     app.idle();
//! }
//! ```

use core::fmt::Write;

use embedded_hal::delay::DelayNs;

use crate::config::FRAME_CAPACITY;
use crate::control::{Dispatcher, Outcome};
use crate::drivers::MotorAxis;
use crate::error::MoveError;
use crate::protocol::{decode, Frame, FrameReader};

pub struct CommandLoop<'a, S, C> {
    reader: FrameReader,
    dispatcher: Dispatcher<'a, S, C>,
}

impl<'a, S: MotorAxis, C: MotorAxis> CommandLoop<'a, S, C> {
    pub fn new(dispatcher: Dispatcher<'a, S, C>) -> Self {
        Self {
            reader: FrameReader::new(),
            dispatcher,
        }
    }

    pub fn dispatcher(&mut self) -> &mut Dispatcher<'a, S, C> {
        &mut self.dispatcher
    }

    /// Enable both servos and wait until each reports ready on HLFB.
    ///
    /// Post the current home switch level to the mailbox before calling this, so the cannula
    /// sees the right input B while it homes.
    pub fn bring_up<D, W>(&mut self, delay: &mut D, out: &mut W) -> Result<(), MoveError>
    where
        D: DelayNs,
        W: Write,
    {
        let _ = write!(out, "Enabling stir motor\r\n");
        let _ = write!(out, "Waiting for HLFB...\r\n");
        self.dispatcher.stir().enable(delay)?;
        let _ = write!(out, "Stir motor ready\r\n");

        let _ = write!(out, "Enabling cannula motor\r\n");
        let _ = write!(out, "Waiting for HLFB...\r\n");
        self.dispatcher.cannula().enable(delay)?;
        let _ = write!(out, "Cannula motor ready\r\n");

        let _ = write!(out, "Ready\r\n");
        Ok(())
    }

    /// Feed one received byte. Runs and reports a command when it closes a frame.
    pub fn on_byte<D, W>(&mut self, delay: &mut D, out: &mut W, byte: u8) -> Option<Outcome>
    where
        D: DelayNs,
        W: Write,
    {
        let frame = self.reader.push(byte)?;
        self.run_frame(delay, out, &frame)
    }

    /// Decode, dispatch and report a complete frame.
    pub fn run_frame<D, W>(&mut self, delay: &mut D, out: &mut W, frame: &Frame) -> Option<Outcome>
    where
        D: DelayNs,
        W: Write,
    {
        if frame.is_truncated() {
            let _ = write!(out, "Frame truncated to {} bytes\r\n", FRAME_CAPACITY);
        }

        let command = match decode(frame) {
            Ok(command) => command,
            Err(e) => {
                let _ = write!(out, "Malformed command: ");
                write_frame(out, frame);
                let _ = write!(out, " ({})\r\n", e);
                return None;
            }
        };

        let _ = write!(out, "Command: {} Value: {}\r\n", command.name, command.value);

        let outcome = self.dispatcher.dispatch(delay, &command);
        report(out, &command.name, &outcome);
        Some(outcome)
    }

    /// Housekeeping while no command is running.
    pub fn idle(&mut self) {
        self.dispatcher.idle();
    }
}

/// Print frame content, replacing non-printable bytes with `.`.
fn write_frame<W: Write>(out: &mut W, frame: &Frame) {
    for &b in frame.as_bytes() {
        let c = if b.is_ascii_graphic() || b == b' ' {
            b as char
        } else {
            '.'
        };
        let _ = out.write_char(c);
    }
}

/// Write the status line for a finished command.
pub fn report<W: Write>(out: &mut W, name: &str, outcome: &Outcome) {
    let _ = match outcome {
        Outcome::Stir(reached) => write!(
            out,
            "Stir at {} RPM ({} steps)\r\n",
            reached.velocity, reached.pulses
        ),
        Outcome::Cannula(pos) => write!(out, "Cannula at position {}\r\n", pos.index()),
        Outcome::Rejected(e) => write!(out, "Move rejected: {}\r\n", e),
        Outcome::Unknown(_) => write!(out, "Unknown command: {}\r\n", name),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CannulaConfig, StirConfig};
    use crate::control::{CompletionWait, PositionController, SensorMailbox, VelocityController};
    use crate::testing::{FakeAxis, Line};
    use embedded_hal_mock::eh1::delay::NoopDelay;
    use std::string::String;

    fn app(mailbox: &SensorMailbox) -> CommandLoop<'_, FakeAxis, FakeAxis> {
        CommandLoop::new(Dispatcher::new(
            VelocityController::new(
                FakeAxis::new(),
                StirConfig::default().with_post_move_settle_ms(0),
                CompletionWait::default(),
            ),
            PositionController::new(
                FakeAxis::new(),
                CannulaConfig::default(),
                CompletionWait::default(),
                mailbox,
            ),
        ))
    }

    fn feed(
        app: &mut CommandLoop<'_, FakeAxis, FakeAxis>,
        out: &mut String,
        bytes: &[u8],
    ) -> Option<Outcome> {
        let mut last = None;
        for &b in bytes {
            if let Some(outcome) = app.on_byte(&mut NoopDelay::new(), out, b) {
                last = Some(outcome);
            }
        }
        last
    }

    #[test]
    fn echoes_and_reports_rpm() {
        let mailbox = SensorMailbox::new();
        let mut app = app(&mailbox);
        let mut out = String::new();

        feed(&mut app, &mut out, b"<RPM:20>");
        assert_eq!(out, "Command: RPM Value: 20\r\nStir at 20 RPM (10 steps)\r\n");
    }

    #[test]
    fn reports_rejection_and_keeps_going() {
        let mailbox = SensorMailbox::new();
        let mut app = app(&mailbox);
        let mut out = String::new();

        feed(&mut app, &mut out, b"<RPM:20><RPM:20>");
        assert!(out.ends_with("Move rejected: velocity already commanded\r\n"));

        out.clear();
        feed(&mut app, &mut out, b"<UP+:0>");
        assert_eq!(out, "Command: UP+ Value: 0\r\nCannula at position 1\r\n");
    }

    #[test]
    fn reports_unknown_and_malformed() {
        let mailbox = SensorMailbox::new();
        let mut app = app(&mailbox);
        let mut out = String::new();

        assert_eq!(
            feed(&mut app, &mut out, b"<FOO:1>"),
            Some(Outcome::Unknown(crate::error::DispatchError::UnknownCommand))
        );
        assert!(out.ends_with("Unknown command: FOO\r\n"));

        out.clear();
        assert_eq!(feed(&mut app, &mut out, b"<RPM100>"), None);
        assert_eq!(
            out,
            "Malformed command: RPM100 (missing ':' between name and value)\r\n"
        );

        // Still ready for the next frame.
        out.clear();
        assert!(feed(&mut app, &mut out, b"<DN-:0>").is_some());
    }

    #[test]
    fn warns_on_truncated_frame() {
        let mailbox = SensorMailbox::new();
        let mut app = app(&mailbox);
        let mut out = String::new();

        feed(&mut app, &mut out, b"<RPM:0000000000000000000000000000000000002>");
        assert!(out.starts_with("Frame truncated to 31 bytes\r\n"));
    }

    #[test]
    fn bring_up_enables_both_axes() {
        let mailbox = SensorMailbox::new();
        let mut app = app(&mailbox);
        let mut out = String::new();
        mailbox.post(false);

        app.bring_up(&mut NoopDelay::new(), &mut out).unwrap();

        assert!(out.ends_with("Ready\r\n"));
        assert_eq!(
            app.dispatcher().stir().axis().take_writes(),
            [(Line::Enable, true)]
        );
        assert_eq!(
            app.dispatcher().cannula().axis().take_writes(),
            [(Line::B, false), (Line::Enable, true)]
        );
    }

    #[test]
    fn bring_up_stops_on_hlfb_timeout() {
        let mailbox = SensorMailbox::new();
        let mut app = CommandLoop::new(Dispatcher::new(
            VelocityController::new(
                FakeAxis::new(),
                StirConfig::default(),
                CompletionWait::new(
                    crate::config::WaitConfig::default().with_timeout_ms(Some(3)),
                ),
            ),
            PositionController::new(
                FakeAxis::new(),
                CannulaConfig::default(),
                CompletionWait::default(),
                &mailbox,
            ),
        ));
        app.dispatcher().stir().axis().hlfb_after(u32::MAX);
        let mut out = String::new();

        assert_eq!(
            app.bring_up(&mut NoopDelay::new(), &mut out),
            Err(MoveError::Timeout)
        );
        assert!(!out.contains("Ready"));
        assert!(app.dispatcher().cannula().axis().take_writes().is_empty());
    }
}
