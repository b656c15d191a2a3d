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

use crate::application::application_state::{ScaleState, StateEffect};
use crate::application::command::Command;
use crate::config::ScaleConfig;
use crate::hmi::display::WeightDisplay;
use crate::hmi::serial::SerialConsole;
use crate::storage::CalibrationStore;
use crate::weight::{convert, tare, CalibrationFactor, LoadCell};
use core::fmt;
use embassy_futures::yield_now;
use embedded_hal_async::delay::DelayNs;
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};

const CALIBRATION_INSTRUCTIONS: [&str; 7] = [
    "HX711 calibration sketch",
    "Remove all weight from scale",
    "After readings begin, place known weight on scale",
    "Press + or a to increase calibration factor",
    "Press - or z to decrease calibration factor",
    "Press w to write value to EEPROM",
    "Press q to quit",
];

/// Single control loop for the scale. Owns the peripherals and the scale state
/// and advances one measurement or calibration cycle per `step`.
pub struct ApplicationManager<LC, WD, S, CS, D> {
    load_cell: LC,
    display: WD,
    console: SerialConsole<S>,
    store: CS,
    delay: D,
    config: ScaleConfig,
    state: ScaleState,
}

impl<LC, WD, S, CS, D> ApplicationManager<LC, WD, S, CS, D>
where
    LC: LoadCell,
    WD: WeightDisplay,
    S: Read + Write + ReadReady,
    CS: CalibrationStore,
    D: DelayNs,
{
    pub fn new(
        load_cell: LC,
        display: WD,
        serial_port: S,
        store: CS,
        delay: D,
        config: ScaleConfig,
    ) -> Self {
        let state = ScaleState::new(config.fallback_factor);
        Self {
            load_cell,
            display,
            console: SerialConsole::new(serial_port),
            store,
            delay,
            config,
            state,
        }
    }

    pub fn state(&self) -> &ScaleState {
        &self.state
    }

    pub fn release(self) -> (LC, WD, S, CS, D) {
        (
            self.load_cell,
            self.display,
            self.console.release(),
            self.store,
            self.delay,
        )
    }

    pub async fn run(&mut self) -> ! {
        self.startup().await;
        loop {
            self.step().await;
        }
    }

    /// Load the calibration, zero the scale and blank the display.
    pub async fn startup(&mut self) {
        self.report(format_args!("Type 'c' to enter calibration mode")).await;
        self.report(format_args!("Initializing the scale")).await;

        let factor = self.load_calibration_factor().await;
        self.state = ScaleState::new(factor);
        info!("Calibration factor: {}", factor.0);
        self.report(format_args!("Calibration factor: {}", factor)).await;

        self.rezero().await;
        self.delay.delay_ms(self.config.startup_settle_ms).await;

        if self.display.clear().is_err() {
            warn!("Unable to clear display");
        }
    }

    pub async fn step(&mut self) {
        if self.state.is_calibrating() {
            self.calibration_cycle().await;
        } else {
            self.measurement_cycle().await;
        }
    }

    async fn measurement_cycle(&mut self) {
        if let Some(command) = self.poll_command().await {
            if self.handle_command(command).await == StateEffect::CalibrationStarted {
                return;
            }
        }

        match self.load_cell.is_ready() {
            Ok(true) => self.measure_and_show().await,
            Ok(false) => self.report(format_args!("HX711 not found.")).await,
            Err(_) => {
                warn!("Load cell ready check failed");
                self.report(format_args!("HX711 not found.")).await;
            }
        }

        self.delay.delay_ms(self.config.measurement_period_ms).await;
    }

    async fn measure_and_show(&mut self) {
        let raw = match self.load_cell.read_raw_average(self.config.live_samples).await {
            Ok(raw) => raw,
            Err(_) => {
                warn!("Load cell read failed");
                return;
            }
        };

        let reading = convert(raw, self.state.tare_offset(), self.state.active_factor());
        if self.display.show_weight(reading, self.config.unit_label).is_err() {
            warn!("Unable to update display");
        }
        self.report(format_args!("HX711 reading: {}", reading)).await;
    }

    async fn calibration_cycle(&mut self) {
        if self.wait_for_load_cell().await {
            match self.load_cell.read_raw_average(self.config.live_samples).await {
                Ok(raw) => {
                    let factor = self.state.conversion_factor();
                    let reading = convert(raw, self.state.tare_offset(), factor);
                    let unit = self.config.unit_label;
                    self.report(format_args!(
                        "Reading: {} {} calibration_factor: {}",
                        reading, unit, factor
                    ))
                    .await;
                }
                Err(_) => warn!("Load cell read failed"),
            }
        }

        if let Some(command) = self.poll_command().await {
            self.handle_command(command).await;
        }
    }

    // Yields to the executor between polls. False if the ready check itself failed.
    async fn wait_for_load_cell(&mut self) -> bool {
        loop {
            match self.load_cell.is_ready() {
                Ok(true) => return true,
                Ok(false) => yield_now().await,
                Err(_) => {
                    warn!("Load cell ready check failed");
                    return false;
                }
            }
        }
    }

    async fn handle_command(&mut self, command: Command) -> StateEffect {
        let effect = self.state.apply(command, &self.config);
        match effect {
            StateEffect::Ignored => {}
            StateEffect::CalibrationStarted => {
                debug!("Entering calibration");
                for line in CALIBRATION_INSTRUCTIONS {
                    self.report(format_args!("{}", line)).await;
                }
                self.rezero().await;
            }
            StateEffect::WorkingFactorChanged(factor) => {
                debug!("Working calibration factor {}", factor.0);
            }
            StateEffect::CommitRequested(factor) => self.commit(factor).await,
            StateEffect::CalibrationEnded => {
                debug!("Leaving calibration");
                self.rezero().await;
            }
        }
        effect
    }

    async fn commit(&mut self, factor: CalibrationFactor) {
        match self.store.save(factor).await {
            Ok(()) => {
                info!("Calibration factor {} written", factor.0);
                self.report(format_args!("calibration written!")).await;
            }
            Err(_) => {
                error!("Calibration factor {} not written", factor.0);
                self.report(format_args!("calibration write failed!")).await;
            }
        }
    }

    async fn load_calibration_factor(&mut self) -> CalibrationFactor {
        let fallback = self.config.fallback_factor;
        match self.store.load().await {
            Ok(Some(factor)) => factor,
            Ok(None) => {
                warn!("No calibration factor stored, using {}", fallback.0);
                self.report(format_args!("No calibration stored, type 'c' to calibrate")).await;
                fallback
            }
            Err(_) => {
                warn!("Calibration factor unreadable, using {}", fallback.0);
                self.report(format_args!("Calibration read failed, type 'c' to calibrate")).await;
                fallback
            }
        }
    }

    async fn rezero(&mut self) {
        match tare(&mut self.load_cell, self.config.tare_samples).await {
            Ok(offset) => self.state.set_tare_offset(offset),
            Err(_) => warn!("Tare failed, keeping previous zero"),
        }
    }

    async fn poll_command(&mut self) -> Option<Command> {
        match self.console.try_read_byte().await {
            Ok(byte) => byte.map(Command::from),
            Err(_) => {
                warn!("Serial read failed");
                None
            }
        }
    }

    async fn report(&mut self, args: fmt::Arguments<'_>) {
        if self.console.write_line(args).await.is_err() {
            warn!("Serial write failed");
        }
    }
}
