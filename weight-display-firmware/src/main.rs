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

#![no_std]
#![no_main]

mod display;

use core::ops::Range;

use {defmt_rtt as _, panic_probe as _};

use crate::display::OledWeightDisplay;
use assign_resources::assign_resources;
use defmt::info;
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_executor::Spawner;
use embassy_rp::flash::{self, Flash};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, Config};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::uart::{self, BufferedInterruptHandler, BufferedUart};
use embassy_rp::{bind_interrupts, peripherals};
use embassy_time::Delay;
use sh1106::{prelude::*, Builder};
use static_cell::StaticCell;
use weight_display::storage::calibration_store::FlashCalibrationStore;
use weight_display::weight::interface::hx711::{Hx711, Hx711Gain};
use weight_display::{ApplicationManager, ScaleConfig};

mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const FLASH_SIZE: usize = 2 * 1024 * 1024;
const FLASH_SECTOR_SIZE: usize = 4096;
// Last two sectors, so sequential-storage always has a spare page to migrate into.
pub const CALIBRATION_NVM_FLASH_OFFSET_RANGE: Range<u32> =
    (FLASH_SIZE - 2 * FLASH_SECTOR_SIZE) as u32..FLASH_SIZE as u32;

const SERIAL_BAUD_RATE: u32 = 9600;
const SERIAL_BUFFER_SIZE: usize = 64;

assign_resources! {
    display_i2c: DisplayI2cPins {
        sda_pin: PIN_4,
        scl_pin: PIN_5,
        i2c_peripheral: I2C0,
    },
    strain_gauge_io: StrainGaugeResources {
        clk_pin: PIN_14,
        data_pin: PIN_15,
    },
    serial: SerialResources {
        uart: UART0,
        tx_pin: PIN_0,
        rx_pin: PIN_1,
    },
    storage: StorageResources {
        flash: FLASH,
    },
}

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

static SERIAL_TX_BUFFER: StaticCell<[u8; SERIAL_BUFFER_SIZE]> = StaticCell::new();
static SERIAL_RX_BUFFER: StaticCell<[u8; SERIAL_BUFFER_SIZE]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    let resources = split_resources!{p};

    info!(
        "{} {} ({})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown")
    );

    spawner
        .spawn(scale_task(
            resources.strain_gauge_io,
            resources.display_i2c,
            resources.serial,
            resources.storage,
        ))
        .unwrap();
}

#[embassy_executor::task]
async fn scale_task(
    strain_gauge_resources: StrainGaugeResources,
    display_i2c_pins: DisplayI2cPins,
    serial_resources: SerialResources,
    storage_resources: StorageResources,
) {
    let clk_pin_out = Output::new(strain_gauge_resources.clk_pin, Level::Low);
    let data_pin = Input::new(strain_gauge_resources.data_pin, Pull::Up);
    let load_cell = Hx711::new(clk_pin_out, data_pin, Delay, Hx711Gain::Gain128);

    let i2c = i2c::I2c::new_async(
        display_i2c_pins.i2c_peripheral,
        display_i2c_pins.scl_pin,
        display_i2c_pins.sda_pin,
        Irqs,
        Config::default(),
    );
    let oled: GraphicsMode<_> = Builder::new().connect_i2c(i2c).into();
    let display = OledWeightDisplay::new(oled);

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = SERIAL_BAUD_RATE;
    let serial_port = BufferedUart::new(
        serial_resources.uart,
        Irqs,
        serial_resources.tx_pin,
        serial_resources.rx_pin,
        SERIAL_TX_BUFFER.init([0; SERIAL_BUFFER_SIZE]),
        SERIAL_RX_BUFFER.init([0; SERIAL_BUFFER_SIZE]),
        uart_config,
    );

    let flash = Flash::<_, flash::Blocking, FLASH_SIZE>::new_blocking(storage_resources.flash);
    let store = FlashCalibrationStore::new(
        BlockingAsync::new(flash),
        CALIBRATION_NVM_FLASH_OFFSET_RANGE,
    );

    let mut application_manager = ApplicationManager::new(
        load_cell,
        display,
        serial_port,
        store,
        Delay,
        ScaleConfig::default(),
    );
    application_manager.run().await;
}
