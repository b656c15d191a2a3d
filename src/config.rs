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

use crate::weight::CalibrationFactor;

/// Factor used by the reset command and when no factor has ever been stored.
pub const FALLBACK_CALIBRATION_FACTOR: CalibrationFactor = CalibrationFactor(-2230);
pub const CALIBRATION_STEP: i32 = 10;

const TARE_SAMPLES: usize = 10;
const LIVE_SAMPLES: usize = 1;
const MEASUREMENT_PERIOD_MS: u32 = 1000;
const STARTUP_SETTLE_MS: u32 = 2000;

#[cfg(feature = "metric")]
const UNIT_LABEL: &str = "kg";
#[cfg(not(feature = "metric"))]
const UNIT_LABEL: &str = "Lbs";

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScaleConfig {
    pub calibration_step: i32,
    pub fallback_factor: CalibrationFactor,
    /// Readings averaged to establish the zero reference
    pub tare_samples: usize,
    /// Readings averaged for each displayed value
    pub live_samples: usize,
    pub measurement_period_ms: u32,
    pub startup_settle_ms: u32,
    pub unit_label: &'static str,
}

impl ScaleConfig {
    pub const DEFAULT: Self = Self {
        calibration_step: CALIBRATION_STEP,
        fallback_factor: FALLBACK_CALIBRATION_FACTOR,
        tare_samples: TARE_SAMPLES,
        live_samples: LIVE_SAMPLES,
        measurement_period_ms: MEASUREMENT_PERIOD_MS,
        startup_settle_ms: STARTUP_SETTLE_MS,
        unit_label: UNIT_LABEL,
    };
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
