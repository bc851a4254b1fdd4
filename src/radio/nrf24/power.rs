use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::radio::{prelude::EsbPower, Nrf24, Nrf24Error};

use super::timing;

impl<SPI, DO, IRQ, DELAY> EsbPower for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type PowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA). Register values are retained.
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType> {
        self.set_ce(false)?; // Guarantee CE is low on powerDown
        self.write_config(self._config_reg.with_power(false))
    }

    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType> {
        // if not powered up then power up and wait for the radio to initialize
        if self._config_reg.power() {
            return Ok(());
        }
        self.write_config(self._config_reg.with_power(true))?;

        // The crystal oscillator needs Tpd2stby before CE may go high.
        let delay = delay.unwrap_or(timing::POWER_UP_US);
        if delay > 0 {
            self._delay_impl.delay_us(delay);
        }
        Ok(())
    }

    /// Is the radio powered up?
    fn is_powered(&self) -> bool {
        self._config_reg.power()
    }
}
