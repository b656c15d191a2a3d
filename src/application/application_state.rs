// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use crate::application::command::Command;
use crate::config::ScaleConfig;
use crate::weight::{CalibrationFactor, TareOffset};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SessionState {
    Idle,
    Calibrating { working_factor: CalibrationFactor },
}

/// What the control loop has to do after a command has been applied.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateEffect {
    Ignored,
    /// Re-zero the scale and show the calibration instructions.
    CalibrationStarted,
    WorkingFactorChanged(CalibrationFactor),
    /// Persist the factor. It is already the active factor.
    CommitRequested(CalibrationFactor),
    /// Re-zero the scale and resume normal measurement.
    CalibrationEnded,
}

/// Calibration and zero reference owned by the control loop.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleState {
    active_factor: CalibrationFactor,
    tare_offset: TareOffset,
    session: SessionState,
}

impl ScaleState {
    pub fn new(active_factor: CalibrationFactor) -> Self {
        Self {
            active_factor,
            tare_offset: 0,
            session: SessionState::Idle,
        }
    }

    pub fn active_factor(&self) -> CalibrationFactor {
        self.active_factor
    }

    pub fn tare_offset(&self) -> TareOffset {
        self.tare_offset
    }

    pub fn set_tare_offset(&mut self, tare_offset: TareOffset) {
        self.tare_offset = tare_offset;
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn is_calibrating(&self) -> bool {
        matches!(self.session, SessionState::Calibrating { .. })
    }

    /// Factor used for conversion in the current state.
    pub fn conversion_factor(&self) -> CalibrationFactor {
        match self.session {
            SessionState::Idle => self.active_factor,
            SessionState::Calibrating { working_factor } => working_factor,
        }
    }

    /// Apply a command. Commands with no meaning in the current state are ignored.
    pub fn apply(&mut self, command: Command, config: &ScaleConfig) -> StateEffect {
        match self.session {
            SessionState::Idle => match command {
                Command::EnterCalibration => {
                    self.session = SessionState::Calibrating {
                        working_factor: self.active_factor,
                    };
                    StateEffect::CalibrationStarted
                }
                _ => StateEffect::Ignored,
            },
            SessionState::Calibrating { working_factor } => match command {
                Command::Increase => {
                    self.set_working_factor(working_factor.adjusted_by(config.calibration_step))
                }
                Command::Decrease => {
                    self.set_working_factor(working_factor.adjusted_by(-config.calibration_step))
                }
                Command::ResetToDefault => self.set_working_factor(config.fallback_factor),
                Command::Commit => {
                    self.active_factor = working_factor;
                    StateEffect::CommitRequested(working_factor)
                }
                Command::Quit => {
                    self.session = SessionState::Idle;
                    StateEffect::CalibrationEnded
                }
                Command::EnterCalibration | Command::None => StateEffect::Ignored,
            },
        }
    }

    fn set_working_factor(&mut self, working_factor: CalibrationFactor) -> StateEffect {
        self.session = SessionState::Calibrating { working_factor };
        StateEffect::WorkingFactorChanged(working_factor)
    }
}
