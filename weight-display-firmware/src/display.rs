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

use defmt::error;
use sh1106::interface::DisplayInterface;
use sh1106::mode::GraphicsMode;
use weight_display::WeightReading;
use weight_display::hmi::display::{WeightDisplay, draw_weight_screen};

#[derive(Debug, defmt::Format)]
pub enum OledError {
    Draw,
    Flush,
}

/// SH1106 OLED showing the weight screen. Every update redraws the full frame.
pub struct OledWeightDisplay<DI>
where
    DI: DisplayInterface,
{
    display: GraphicsMode<DI>,
}

impl<DI> OledWeightDisplay<DI>
where
    DI: DisplayInterface,
{
    pub fn new(mut display: GraphicsMode<DI>) -> Self {
        let _ = display.init().map_err(|_| error!("Failed to init display"));
        display.clear();
        let _ = display
            .flush()
            .map_err(|_| error!("Failed to flush display"));
        Self { display }
    }
}

impl<DI> WeightDisplay for OledWeightDisplay<DI>
where
    DI: DisplayInterface,
{
    type Error = OledError;

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display.clear();
        self.display.flush().map_err(|_| OledError::Flush)
    }

    fn show_weight(&mut self, reading: WeightReading, unit_label: &str) -> Result<(), Self::Error> {
        self.display.clear();
        draw_weight_screen(&mut self.display, reading, unit_label).map_err(|_| OledError::Draw)?;
        self.display.flush().map_err(|_| OledError::Flush)
    }
}
