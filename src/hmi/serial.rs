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

use core::fmt;
use core::fmt::Write as _;
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};
use heapless::String;

const LINE_BUFFER_SIZE: usize = 96;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerialError<PortE> {
    Port(PortE),
    LineTooLong,
}

/// Line oriented console on top of a byte stream. Commands come in as single
/// bytes, diagnostics go out as CRLF terminated lines.
pub struct SerialConsole<S> {
    port: S,
}

impl<S> SerialConsole<S>
where
    S: Read + Write + ReadReady,
{
    pub fn new(port: S) -> Self {
        Self { port }
    }

    pub fn release(self) -> S {
        self.port
    }

    /// Next received byte, or `None` straight away if nothing is waiting.
    pub async fn try_read_byte(&mut self) -> Result<Option<u8>, SerialError<S::Error>> {
        if !self.port.read_ready().map_err(SerialError::Port)? {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        let count = self.port.read(&mut byte).await.map_err(SerialError::Port)?;
        Ok((count == 1).then_some(byte[0]))
    }

    pub async fn write_line(
        &mut self,
        args: fmt::Arguments<'_>,
    ) -> Result<(), SerialError<S::Error>> {
        let mut line = String::<LINE_BUFFER_SIZE>::new();
        line.write_fmt(args)
            .and_then(|_| line.write_str("\r\n"))
            .map_err(|_| SerialError::LineTooLong)?;

        self.port
            .write_all(line.as_bytes())
            .await
            .map_err(SerialError::Port)
    }
}
