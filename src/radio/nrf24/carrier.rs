use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use super::{mnemonics, registers, timing, MAX_PAYLOAD};
use crate::{
    radio::{
        prelude::{EsbChannel, EsbPower},
        Nrf24, Nrf24Error,
    },
    CrcLength,
};

impl<SPI, DO, IRQ, DELAY> Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    /// Broadcast an unmodulated carrier at `channel_or_mhz` for RF testing.
    ///
    /// The radio keeps repeating an all-ones payload to an all-ones address
    /// without CRC or auto-ack, at the PA level from the applied
    /// [`RadioConfig`](struct@crate::radio::RadioConfig), until
    /// [`Nrf24::stop_carrier()`] is called. Not for use alongside normal
    /// transmissions.
    pub fn broadcast_carrier(
        &mut self,
        channel_or_mhz: u16,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self.power_up(None)?;
        self.write_config(self._config_reg.as_tx())?;
        self._regs.write_register(registers::EN_AA, 0)?;
        self._regs
            .set_bit(registers::RF_SETUP, mnemonics::PLL_LOCK, true)?;

        let ones = [0xFF; MAX_PAYLOAD];
        self._regs.write_registers(registers::TX_ADDR, &ones[..5])?;
        self._regs.write_payload(&ones)?;
        self.write_config(self._config_reg.with_crc_length(CrcLength::Disabled))?;
        self.set_frequency(channel_or_mhz)?;

        // one transmission to load the payload, then repeat it
        self.set_ce(true)?;
        self._delay_impl.delay_us(timing::CE_PULSE_US);
        self.set_ce(false)?;
        self._delay_impl.delay_ms(1);
        self.set_ce(true)?;
        self._regs.reuse_tx_payload()
    }

    /// Stop the carrier started by [`Nrf24::broadcast_carrier()`].
    ///
    /// The radio is powered down with the CRC and auto-ack settings restored.
    /// The transmit address is restored as well, but its payload width is not.
    pub fn stop_carrier(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._config_reg = self._config_reg.with_crc_length(self._base_config.crc_length());
        self.power_down()?;
        self._regs
            .set_bit(registers::RF_SETUP, mnemonics::PLL_LOCK, false)?;
        self._regs.write_register(registers::EN_AA, self._auto_ack)?;
        self._regs
            .write_registers(registers::TX_ADDR, &self._tx_address)?;
        self._regs.flush_tx()
    }
}
