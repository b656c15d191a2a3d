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

use crate::storage::{CalibrationStore, StorageError};
use crate::weight::CalibrationFactor;
use core::ops::Range;
use embedded_storage_async::nor_flash::MultiwriteNorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map;
use sequential_storage::map::{SerializationError, Value};

type StorageKey = u16;
const CALIBRATION_FACTOR_KEY: StorageKey = 0;

// Must hold the largest serialised item rounded up to the flash word size.
const DATA_BUFFER_SIZE: usize = 128;

impl Value<'_> for CalibrationFactor {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        let bytes = self.0.to_le_bytes();
        if buffer.len() < bytes.len() {
            return Err(SerializationError::BufferTooSmall);
        }
        buffer[..bytes.len()].copy_from_slice(&bytes);
        Ok(bytes.len())
    }

    fn deserialize_from(buffer: &[u8]) -> Result<Self, SerializationError>
    where
        Self: Sized,
    {
        let bytes: [u8; 4] = buffer
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or(SerializationError::BufferTooSmall)?;
        Ok(CalibrationFactor(i32::from_le_bytes(bytes)))
    }
}

/// Keeps the calibration factor under a fixed key in a sequential-storage map.
pub struct FlashCalibrationStore<F>
where
    F: MultiwriteNorFlash,
{
    flash: F,
    storage_range: Range<u32>,
    flash_cache: NoCache,
}

impl<F> FlashCalibrationStore<F>
where
    F: MultiwriteNorFlash,
{
    /// `storage_range` must be aligned to erase pages and span at least two of them.
    pub fn new(flash: F, storage_range: Range<u32>) -> Self {
        debug!(
            "Calibration storage flash address range: 0x{:x} to 0x{:x}",
            storage_range.start,
            storage_range.end,
        );
        Self {
            flash,
            storage_range,
            flash_cache: NoCache::new(),
        }
    }

    pub fn release(self) -> F {
        self.flash
    }
}

impl<F> CalibrationStore for FlashCalibrationStore<F>
where
    F: MultiwriteNorFlash,
{
    type Error = StorageError;

    async fn load(&mut self) -> Result<Option<CalibrationFactor>, Self::Error> {
        let mut data_buffer = [0; DATA_BUFFER_SIZE];

        let value = map::fetch_item::<StorageKey, CalibrationFactor, _>(
            &mut self.flash,
            self.storage_range.clone(),
            &mut self.flash_cache,
            &mut data_buffer,
            &CALIBRATION_FACTOR_KEY,
        )
        .await
        .map_err(|_| {
            warn!("Unable to read calibration factor from flash");
            StorageError::RetrieveError
        })?;

        Ok(value)
    }

    async fn save(&mut self, factor: CalibrationFactor) -> Result<(), Self::Error> {
        let mut data_buffer = [0; DATA_BUFFER_SIZE];

        map::store_item(
            &mut self.flash,
            self.storage_range.clone(),
            &mut self.flash_cache,
            &mut data_buffer,
            &CALIBRATION_FACTOR_KEY,
            &factor,
        )
        .await
        .map_err(|_| {
            warn!("Unable to save calibration factor to flash");
            StorageError::SaveError
        })?;

        debug!("Calibration factor saved - {}", factor.0);
        Ok(())
    }
}
