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

use crate::weight::WeightReading;
use core::fmt::Write;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::Point;
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10, FONT_9X15_BOLD};
use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};
use embedded_graphics::Drawable;
use heapless::String;

const LABEL_TEXT: &str = "Weight";
const VALUE_ROW_Y: i32 = 24;
const OVERFLOW_TEXT: &str = "----";

const LABEL_STYLE: MonoTextStyle<BinaryColor> = MonoTextStyleBuilder::new()
    .font(&FONT_9X15_BOLD)
    .text_color(BinaryColor::On)
    .build();
const VALUE_STYLE: MonoTextStyle<BinaryColor> = MonoTextStyleBuilder::new()
    .font(&FONT_10X20)
    .text_color(BinaryColor::On)
    .build();
const UNIT_STYLE: MonoTextStyle<BinaryColor> = MonoTextStyleBuilder::new()
    .font(&FONT_6X10)
    .text_color(BinaryColor::On)
    .build();

/// Output for the operator facing weight screen.
pub trait WeightDisplay {
    type Error;

    fn clear(&mut self) -> Result<(), Self::Error>;

    fn show_weight(&mut self, reading: WeightReading, unit_label: &str) -> Result<(), Self::Error>;
}

/// Reading with one decimal place. Values too long for the screen become dashes.
pub fn format_reading(reading: WeightReading) -> String<12> {
    let mut value = String::<12>::new();
    if write!(value, "{}", reading).is_err() {
        value.clear();
        let _ = value.push_str(OVERFLOW_TEXT);
    }
    value
}

/// Draw the label, the value and the unit. The caller clears and flushes the frame.
pub fn draw_weight_screen<D>(
    display: &mut D,
    reading: WeightReading,
    unit_label: &str,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let top_left = TextStyleBuilder::new()
        .alignment(Alignment::Left)
        .baseline(Baseline::Top)
        .build();
    let bottom_right = TextStyleBuilder::new()
        .alignment(Alignment::Right)
        .baseline(Baseline::Bottom)
        .build();

    Text::with_text_style(LABEL_TEXT, Point::zero(), LABEL_STYLE, top_left).draw(display)?;

    let value = format_reading(reading);
    Text::with_text_style(
        value.as_str(),
        Point::new(0, VALUE_ROW_Y),
        VALUE_STYLE,
        top_left,
    )
    .draw(display)?;

    let corner = display.bounding_box().bottom_right().unwrap_or_default();
    Text::with_text_style(unit_label, corner, UNIT_STYLE, bottom_right).draw(display)?;

    Ok(())
}
