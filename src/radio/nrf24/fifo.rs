use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use crate::radio::{
    prelude::{EsbFifo, EsbStatus},
    Nrf24, Nrf24Error,
};

impl<SPI, DO, IRQ, DELAY> EsbFifo for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType> {
        self._regs.flush_rx()
    }

    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType> {
        self._regs.flush_tx()
    }

    fn available(&mut self) -> Result<bool, Self::FifoErrorType> {
        let mut pipe = 0;
        self.available_pipe(&mut pipe)
    }

    fn available_pipe(&mut self, pipe: &mut u8) -> Result<bool, Self::FifoErrorType> {
        self.update()?;
        let status = self._regs.status();
        // RX_DR is cleared per payload read; a second queued payload
        // only shows up as a valid pipe number.
        if status.rx_dr() || status.rx_fifo_occupied() {
            *pipe = status.rx_pipe();
            return Ok(true);
        }
        Ok(false)
    }
}
