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

/// Single character commands accepted on the serial console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    EnterCalibration,
    Increase,
    Decrease,
    ResetToDefault,
    Commit,
    Quit,
    None,
}

impl Command {
    pub fn parse(byte: u8) -> Self {
        match byte {
            b'c' => Command::EnterCalibration,
            b'+' | b'a' => Command::Increase,
            b'-' | b'z' => Command::Decrease,
            b'r' => Command::ResetToDefault,
            b'w' => Command::Commit,
            b'q' => Command::Quit,
            _ => Command::None,
        }
    }
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        Command::parse(byte)
    }
}
