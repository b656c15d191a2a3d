use crate::weight::{LoadCell, RawSample};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Hx711Gain {
    Gain128,
    Gain64,
    Gain32ChannelB,
}

impl Hx711Gain {
    fn tick_count(&self) -> usize {
        match self {
            Hx711Gain::Gain128 => 25,
            Hx711Gain::Gain64 => 27,
            Hx711Gain::Gain32ChannelB => 26,
        }
    }
}

const POWER_MODE_CHANGE_DELAY_US: u32 = 60;
const CLK_HALF_PERIOD_US: u32 = 1;
const READY_POLL_INTERVAL_US: u32 = 100;
const VALID_DATA_BITS: usize = 24;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<OutPinE, InPinE> {
    OutPin(OutPinE),
    InPin(InPinE),
}

pub struct Hx711<CLK, DATA, D> {
    clock_pin: CLK,
    data_pin: DATA,
    delay: D,
    gain_clocks: usize,
    powered_up: bool,
}

impl<CLK, DATA, D, ClkE, DataE> Hx711<CLK, DATA, D>
where
    CLK: OutputPin<Error = ClkE>,
    DATA: InputPin<Error = DataE>,
    D: DelayNs,
{
    pub fn new(clock_pin: CLK, data_pin: DATA, delay: D, gain: Hx711Gain) -> Self {
        Self {
            clock_pin,
            data_pin,
            delay,
            gain_clocks: gain.tick_count(),
            powered_up: false,
        }
    }

    /// Takes effect from the conversion after the next read.
    pub fn set_gain(&mut self, gain: Hx711Gain) {
        self.gain_clocks = gain.tick_count();
    }

    pub async fn power_up(&mut self) -> Result<(), Error<ClkE, DataE>> {
        self.clock_pin.set_low().map_err(Error::OutPin)?;
        self.delay.delay_us(POWER_MODE_CHANGE_DELAY_US).await;
        self.powered_up = true;
        Ok(())
    }

    pub async fn power_down(&mut self) -> Result<(), Error<ClkE, DataE>> {
        self.clock_pin.set_high().map_err(Error::OutPin)?;
        self.delay.delay_us(POWER_MODE_CHANGE_DELAY_US).await;
        self.powered_up = false;
        Ok(())
    }

    pub fn release(self) -> (CLK, DATA, D) {
        (self.clock_pin, self.data_pin, self.delay)
    }

    async fn clock_out_sample(&mut self) -> Result<RawSample, Error<ClkE, DataE>> {
        let mut data: i32 = 0;

        for _ in 0..self.gain_clocks {
            data <<= 1;
            self.clock_pin.set_high().map_err(Error::OutPin)?;
            self.delay.delay_us(CLK_HALF_PERIOD_US).await;
            self.clock_pin.set_low().map_err(Error::OutPin)?;
            if self.data_pin.is_high().map_err(Error::InPin)? {
                data |= 0x1;
            }
            self.delay.delay_us(CLK_HALF_PERIOD_US).await;
        }

        // trailing gain pulses shift in nothing useful
        let data_bits_to_discard = self.gain_clocks - VALID_DATA_BITS;
        data >>= data_bits_to_discard;
        let data_mask = (1 << VALID_DATA_BITS) - 1;
        data &= data_mask;
        // extend sign if bit 24 is 1
        if (data >> 23) & 0x1 == 0x1 {
            data |= 0xFF000000u32 as i32;
        }
        Ok(data)
    }
}

impl<CLK, DATA, D, ClkE, DataE> LoadCell for Hx711<CLK, DATA, D>
where
    CLK: OutputPin<Error = ClkE>,
    DATA: InputPin<Error = DataE>,
    D: DelayNs,
{
    type Error = Error<ClkE, DataE>;

    fn is_ready(&mut self) -> Result<bool, Self::Error> {
        // DOUT goes low when conversion is ready
        Ok(self.powered_up && self.data_pin.is_low().map_err(Error::InPin)?)
    }

    async fn read_raw(&mut self) -> Result<RawSample, Self::Error> {
        if !self.powered_up {
            self.power_up().await?;
        }

        while !self.is_ready()? {
            self.delay.delay_us(READY_POLL_INTERVAL_US).await;
        }

        let sample = self.clock_out_sample().await?;
        trace!("HX711 sample = {}", sample);
        Ok(sample)
    }
}
