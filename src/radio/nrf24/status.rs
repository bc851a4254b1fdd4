use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use super::registers;
use crate::{
    radio::{prelude::EsbStatus, Nrf24, Nrf24Error},
    StatusFlags,
};

impl<SPI, DO, IRQ, DELAY> EsbStatus for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type StatusErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_status_flags(&self, flags: &mut StatusFlags) {
        *flags = self._regs.status();
    }

    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType> {
        self._regs.write_register(
            registers::STATUS,
            flags.into_bits() & StatusFlags::IRQ_MASK,
        )
    }

    fn update(&mut self) -> Result<(), Self::StatusErrorType> {
        self._regs.read_register(registers::STATUS)?;
        Ok(())
    }
}
