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

use crate::weight::{CalibrationFactor, LoadCell, RawSample, TareOffset, WeightReading};

/// Convert a raw sample into units of weight.
///
/// A zero factor is not rejected, the result is then infinite or NaN and shows up
/// as an obviously wrong value on the display.
pub fn convert(raw: RawSample, tare: TareOffset, factor: CalibrationFactor) -> WeightReading {
    let tared_reading = raw as i64 - tare as i64;
    trace!("Tared reading = {}", tared_reading);
    WeightReading(tared_reading as f32 / factor.0 as f32)
}

/// Establish a new zero reference from the average of `samples` readings.
pub async fn tare<LC>(load_cell: &mut LC, samples: usize) -> Result<TareOffset, LC::Error>
where
    LC: LoadCell,
{
    let tare_offset = load_cell.read_raw_average(samples).await?;
    debug!("Tare offset = {}", tare_offset);
    Ok(tare_offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    struct ConstantCell(RawSample, usize);

    impl LoadCell for ConstantCell {
        type Error = ();

        fn is_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }

        async fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
            self.1 += 1;
            Ok(self.0)
        }
    }

    #[test]
    fn reference_weight_reads_one_unit() {
        let reading = convert(-2230, 0, CalibrationFactor(-2230));
        assert_eq!(reading, WeightReading(1.0));
    }

    #[test]
    fn conversion_matches_formula() {
        let factors = [-2230, -7, 1, 3, 420, 2180];
        let tares = [-100_000, 0, 8_388_607];
        let raws = [-8_388_608, -1234, 0, 1, 55_555, 8_388_607];
        for f in factors {
            for t in tares {
                for r in raws {
                    let expected = (r as f64 - t as f64) / f as f64;
                    let WeightReading(actual) = convert(r, t, CalibrationFactor(f));
                    let tolerance = (expected.abs() * 1e-6).max(1e-6);
                    assert!(
                        (actual as f64 - expected).abs() <= tolerance,
                        "convert({r}, {t}, {f}) = {actual}, expected {expected}"
                    );
                }
            }
        }
    }

    #[test]
    fn tare_subtracts_from_reading() {
        let reading = convert(10_500, 10_000, CalibrationFactor(100));
        assert_eq!(reading, WeightReading(5.0));
    }

    #[test]
    fn zero_factor_does_not_panic() {
        assert!(!convert(5, 0, CalibrationFactor(0)).0.is_finite());
        assert!(convert(0, 0, CalibrationFactor(0)).0.is_nan());
    }

    #[test]
    fn tare_averages_requested_samples() {
        let mut cell = ConstantCell(8_123, 0);
        assert_eq!(block_on(tare(&mut cell, 10)), Ok(8_123));
        assert_eq!(cell.1, 10);
    }
}
