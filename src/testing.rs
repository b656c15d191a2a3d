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

//! Test doubles shared by the unit tests. Each one is a cheap handle onto shared
//! state, so a test keeps a clone to inspect after handing one to the manager.

use crate::hmi::display::WeightDisplay;
use crate::storage::{CalibrationStore, StorageError};
use crate::weight::{CalibrationFactor, LoadCell, RawSample, WeightReading};
use embedded_io::ErrorKind;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// Failure reported by the switchable test doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockIoError;

impl embedded_io::Error for MockIoError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Default)]
struct SerialBuffers {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    fail_reads: bool,
    fail_writes: bool,
}

/// Byte stream with scripted input and captured output.
#[derive(Clone, Default)]
pub struct MockSerialPort {
    buffers: Rc<RefCell<SerialBuffers>>,
}

impl MockSerialPort {
    pub fn with_input(input: &[u8]) -> Self {
        let port = Self::default();
        port.push_input(input);
        port
    }

    pub fn push_input(&self, input: &[u8]) {
        self.buffers.borrow_mut().rx.extend(input.iter().copied());
    }

    pub fn pending_input(&self) -> usize {
        self.buffers.borrow().rx.len()
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffers.borrow().tx).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.output()
            .split_terminator("\r\n")
            .map(String::from)
            .collect()
    }

    pub fn clear_output(&self) {
        self.buffers.borrow_mut().tx.clear();
    }

    pub fn fail_reads(&self, failing: bool) {
        self.buffers.borrow_mut().fail_reads = failing;
    }

    pub fn fail_writes(&self, failing: bool) {
        self.buffers.borrow_mut().fail_writes = failing;
    }
}

impl embedded_io::ErrorType for MockSerialPort {
    type Error = MockIoError;
}

impl embedded_io::ReadReady for MockSerialPort {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        let buffers = self.buffers.borrow();
        if buffers.fail_reads {
            return Err(MockIoError);
        }
        Ok(!buffers.rx.is_empty())
    }
}

impl embedded_io_async::Read for MockSerialPort {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let mut buffers = self.buffers.borrow_mut();
        if buffers.fail_reads {
            return Err(MockIoError);
        }
        let mut count = 0;
        for slot in buf.iter_mut() {
            match buffers.rx.pop_front() {
                Some(byte) => {
                    *slot = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }
}

impl embedded_io_async::Write for MockSerialPort {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let mut buffers = self.buffers.borrow_mut();
        if buffers.fail_writes {
            return Err(MockIoError);
        }
        buffers.tx.extend_from_slice(buf);
        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

struct LoadCellSim {
    present: bool,
    raw: RawSample,
    not_ready_polls: usize,
    ready_polls: usize,
    reads: usize,
    fail_ready_checks: bool,
    fail_reads: bool,
}

/// Load cell that returns a fixed raw value. It can be absent, report not-ready
/// for a number of polls before a conversion arrives, or fail outright.
#[derive(Clone)]
pub struct MockLoadCell {
    sim: Rc<RefCell<LoadCellSim>>,
}

impl MockLoadCell {
    pub fn new(raw: RawSample) -> Self {
        Self {
            sim: Rc::new(RefCell::new(LoadCellSim {
                present: true,
                raw,
                not_ready_polls: 0,
                ready_polls: 0,
                reads: 0,
                fail_ready_checks: false,
                fail_reads: false,
            })),
        }
    }

    pub fn set_present(&self, present: bool) {
        self.sim.borrow_mut().present = present;
    }

    pub fn set_raw(&self, raw: RawSample) {
        self.sim.borrow_mut().raw = raw;
    }

    pub fn delay_ready_by(&self, polls: usize) {
        self.sim.borrow_mut().not_ready_polls = polls;
    }

    pub fn ready_polls(&self) -> usize {
        self.sim.borrow().ready_polls
    }

    pub fn reads(&self) -> usize {
        self.sim.borrow().reads
    }

    pub fn fail_ready_checks(&self, failing: bool) {
        self.sim.borrow_mut().fail_ready_checks = failing;
    }

    pub fn fail_reads(&self, failing: bool) {
        self.sim.borrow_mut().fail_reads = failing;
    }
}

impl LoadCell for MockLoadCell {
    type Error = MockIoError;

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        let mut sim = self.sim.borrow_mut();
        sim.ready_polls += 1;
        if sim.fail_ready_checks {
            return Err(MockIoError);
        }
        if !sim.present {
            return Ok(false);
        }
        if sim.not_ready_polls > 0 {
            sim.not_ready_polls -= 1;
            return Ok(false);
        }
        Ok(true)
    }

    async fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        let mut sim = self.sim.borrow_mut();
        sim.reads += 1;
        if sim.fail_reads {
            return Err(MockIoError);
        }
        Ok(sim.raw)
    }
}

#[derive(Default)]
struct DisplayLog {
    clears: usize,
    shown: Vec<(WeightReading, String)>,
    failing: bool,
}

/// Display that remembers every frame it was asked to show.
#[derive(Clone, Default)]
pub struct RecordingDisplay {
    log: Rc<RefCell<DisplayLog>>,
}

impl RecordingDisplay {
    pub fn clears(&self) -> usize {
        self.log.borrow().clears
    }

    pub fn shown(&self) -> Vec<(WeightReading, String)> {
        self.log.borrow().shown.clone()
    }

    pub fn last_reading(&self) -> Option<WeightReading> {
        self.log.borrow().shown.last().map(|(reading, _)| *reading)
    }

    /// While failing, nothing reaches the screen and every call errors.
    pub fn fail_updates(&self, failing: bool) {
        self.log.borrow_mut().failing = failing;
    }
}

impl WeightDisplay for RecordingDisplay {
    type Error = MockIoError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        if log.failing {
            return Err(MockIoError);
        }
        log.clears += 1;
        Ok(())
    }

    fn show_weight(
        &mut self,
        reading: WeightReading,
        unit_label: &str,
    ) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        if log.failing {
            return Err(MockIoError);
        }
        log.shown.push((reading, String::from(unit_label)));
        Ok(())
    }
}

#[derive(Default)]
struct StoreContents {
    value: Option<CalibrationFactor>,
    fail_loads: bool,
    fail_saves: bool,
    saves: usize,
}

/// Calibration store held in memory, with switchable failures.
#[derive(Clone, Default)]
pub struct MemoryStore {
    contents: Rc<RefCell<StoreContents>>,
}

impl MemoryStore {
    pub fn holding(factor: CalibrationFactor) -> Self {
        let store = Self::default();
        store.contents.borrow_mut().value = Some(factor);
        store
    }

    pub fn value(&self) -> Option<CalibrationFactor> {
        self.contents.borrow().value
    }

    pub fn saves(&self) -> usize {
        self.contents.borrow().saves
    }

    pub fn fail_loads(&self) {
        self.contents.borrow_mut().fail_loads = true;
    }

    pub fn fail_saves(&self) {
        self.contents.borrow_mut().fail_saves = true;
    }
}

impl CalibrationStore for MemoryStore {
    type Error = StorageError;

    async fn load(&mut self) -> Result<Option<CalibrationFactor>, Self::Error> {
        let contents = self.contents.borrow();
        if contents.fail_loads {
            return Err(StorageError::RetrieveError);
        }
        Ok(contents.value)
    }

    async fn save(&mut self, factor: CalibrationFactor) -> Result<(), Self::Error> {
        let mut contents = self.contents.borrow_mut();
        if contents.fail_saves {
            return Err(StorageError::SaveError);
        }
        contents.value = Some(factor);
        contents.saves += 1;
        Ok(())
    }
}

/// Delay that returns immediately and records millisecond sleeps.
#[derive(Clone, Default)]
pub struct RecordingDelay {
    sleeps_ms: Rc<RefCell<Vec<u32>>>,
}

impl RecordingDelay {
    pub fn sleeps_ms(&self) -> Vec<u32> {
        self.sleeps_ms.borrow().clone()
    }
}

impl embedded_hal_async::delay::DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, _ns: u32) {}

    async fn delay_ms(&mut self, ms: u32) {
        self.sleeps_ms.borrow_mut().push(ms);
    }
}
