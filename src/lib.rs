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

//! Calibration and measurement control for a single load-cell scale.
//!
//! Hardware is reached through small traits (`LoadCell`, `WeightDisplay`,
//! `CalibrationStore`) and the `embedded-io-async` serial traits, so the control
//! loop runs unchanged on the board and under host tests.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// Must come first so the logging macros are visible to every other module.
mod fmt;

pub mod application;
pub mod config;
pub mod hmi;
pub mod storage;
pub mod weight;

#[cfg(test)]
mod testing;

pub use application::application_manager::ApplicationManager;
pub use config::ScaleConfig;
pub use weight::{CalibrationFactor, WeightReading};
