// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Maps decoded commands onto the two axis controllers.
//!
//! | Command | Action |
//! | ------- | ------ |
//! | `RPM:n` | stir at `n` RPM, then hold off for the post-move settle time |
//! | `UP+:_` | cannula to position 1 |
//! | `DN-:_` | cannula to position 2 |
//!
//! Only one command runs at a time: `dispatch` blocks until the move finishes. Homing sensor
//! changes are still mirrored to the cannula while blocked.

use embedded_hal::delay::DelayNs;

use crate::control::position::{CannulaPosition, PositionController};
use crate::control::velocity::{VelocityController, VelocityReached};
use crate::control::wait::settle;
use crate::drivers::MotorAxis;
use crate::error::{DispatchError, MoveError};
use crate::protocol::{Command, Opcode};

/// Result of dispatching one command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Outcome {
    Stir(VelocityReached),
    Cannula(CannulaPosition),
    Rejected(MoveError),
    Unknown(DispatchError),
}

pub struct Dispatcher<'a, S, C> {
    stir: VelocityController<S>,
    cannula: PositionController<'a, C>,
}

impl<'a, S: MotorAxis, C: MotorAxis> Dispatcher<'a, S, C> {
    pub fn new(stir: VelocityController<S>, cannula: PositionController<'a, C>) -> Self {
        Self { stir, cannula }
    }

    pub fn stir(&mut self) -> &mut VelocityController<S> {
        &mut self.stir
    }

    pub fn cannula(&mut self) -> &mut PositionController<'a, C> {
        &mut self.cannula
    }

    /// Housekeeping between commands.
    pub fn idle(&mut self) {
        self.cannula.sync_home_sensor();
    }

    /// Run one command to completion.
    pub fn dispatch<D: DelayNs>(&mut self, delay: &mut D, command: &Command) -> Outcome {
        let Some(opcode) = command.opcode() else {
            return Outcome::Unknown(DispatchError::UnknownCommand);
        };

        match opcode {
            Opcode::Rpm => {
                let cannula = &mut self.cannula;
                let result =
                    self.stir
                        .move_at_velocity_with(delay, command.value as f32, || {
                            cannula.sync_home_sensor();
                        });

                // Let the stir motor spin up before taking the next command.
                settle(delay, self.stir.config().post_move_settle_ms, || {
                    cannula.sync_home_sensor();
                });

                match result {
                    Ok(reached) => Outcome::Stir(reached),
                    Err(e) => Outcome::Rejected(e),
                }
            }
            Opcode::Up => self.move_cannula(delay, CannulaPosition::Up),
            Opcode::Down => self.move_cannula(delay, CannulaPosition::Down),
        }
    }

    fn move_cannula<D: DelayNs>(&mut self, delay: &mut D, target: CannulaPosition) -> Outcome {
        match self.cannula.move_to_position(delay, target.index()) {
            Ok(pos) => Outcome::Cannula(pos),
            Err(e) => Outcome::Rejected(e),
        }
    }
}
