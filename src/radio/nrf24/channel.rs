use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::radio::{prelude::EsbChannel, Nrf24, Nrf24Error};

use super::registers;

/// Lowest frequency (in MHz) of the 2.4 GHz band; channel 0.
const BASE_FREQUENCY_MHZ: u16 = 2400;
const MAX_CHANNEL: u8 = 125;

impl<SPI, DO, IRQ, DELAY> EsbChannel for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type ChannelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// The nRF24L01 support 126 channels. The specified `channel` is
    /// clamped to the range [0, 125].
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType> {
        self._regs
            .write_register(registers::RF_CH, channel.min(MAX_CHANNEL))
    }

    /// See also [`EsbChannel::set_channel()`].
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType> {
        self._regs.read_register(registers::RF_CH)
    }

    fn set_frequency(&mut self, channel_or_mhz: u16) -> Result<(), Self::ChannelErrorType> {
        let channel = if channel_or_mhz >= BASE_FREQUENCY_MHZ {
            channel_or_mhz - BASE_FREQUENCY_MHZ
        } else {
            channel_or_mhz
        };
        self.set_channel(channel.min(MAX_CHANNEL as u16) as u8)
    }
}
