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
use core::fmt::Debug;

pub mod calibration_store;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    SaveError,
    RetrieveError,
}

/// Non-volatile home of the last committed calibration factor.
pub trait CalibrationStore {
    type Error: Debug;

    /// Read the persisted factor. `None` when nothing has ever been written.
    async fn load(&mut self) -> Result<Option<CalibrationFactor>, Self::Error>;

    /// Persist `factor`, replacing whatever was stored before.
    async fn save(&mut self, factor: CalibrationFactor) -> Result<(), Self::Error>;
}
