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

pub mod interface;
pub mod weight;

pub use weight::{convert, tare};

/// Raw count produced by the load cell amplifier.
pub type RawSample = i32;

/// Raw count read with nothing on the scale. Subtracted from every sample.
pub type TareOffset = i32;

/// Counts per unit of weight. Negative values are valid and depend on how the
/// load cell is wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationFactor(pub i32);

impl CalibrationFactor {
    pub fn adjusted_by(self, step: i32) -> Self {
        Self(self.0.saturating_add(step))
    }
}

impl fmt::Display for CalibrationFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Weight in physical units. Shown with a single decimal place.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WeightReading(pub f32);

impl fmt::Display for WeightReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

pub trait LoadCell {
    type Error;

    /// True when a conversion is waiting to be clocked out.
    fn is_ready(&mut self) -> Result<bool, Self::Error>;

    /// Read the next conversion, waiting for the device to become ready if needed.
    async fn read_raw(&mut self) -> Result<RawSample, Self::Error>;

    /// Mean of `samples` consecutive conversions. A count of zero is treated as one.
    async fn read_raw_average(&mut self, samples: usize) -> Result<RawSample, Self::Error> {
        let samples = samples.max(1);
        let mut sum: i64 = 0;
        for _ in 0..samples {
            sum += self.read_raw().await? as i64;
        }
        Ok((sum / samples as i64) as RawSample)
    }
}
