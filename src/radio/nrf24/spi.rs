use embedded_hal::{digital::OutputPin, spi::SpiBus};

use super::{commands, registers, Nrf24Error};
use crate::StatusFlags;

/// The largest payload (and SPI frame after the command byte) the radio handles.
pub const MAX_PAYLOAD: usize = 32;

/// Holds the radio's CSN pin low for as long as it lives.
///
/// The pin is released in [`Drop`], so every exit path of a transaction
/// (including `?` on a failed bus transfer) deselects the radio.
pub struct ChipSelectGuard<'a, CS: OutputPin> {
    cs_pin: &'a mut CS,
}

impl<'a, CS: OutputPin> ChipSelectGuard<'a, CS> {
    /// Select the radio by pulling `cs_pin` low.
    pub fn acquire(cs_pin: &'a mut CS) -> Result<Self, CS::Error> {
        cs_pin.set_low()?;
        Ok(Self { cs_pin })
    }
}

impl<CS: OutputPin> Drop for ChipSelectGuard<'_, CS> {
    fn drop(&mut self) {
        // nothing can be propagated from here
        let _ = self.cs_pin.set_high();
    }
}

/// Register and FIFO level access to the nRF24L01 over a [`SpiBus`].
///
/// Each method is one SPI transaction wrapped in its own [`ChipSelectGuard`].
/// The STATUS byte clocked out with every command is cached and available via
/// [`RegisterInterface::status()`].
///
/// None of these methods may be called from an interrupt handler that could
/// preempt another call; [`RegisterInterface::set_bit()`] in particular is a
/// read-modify-write over two transactions.
pub struct RegisterInterface<SPI, CS> {
    spi: SPI,
    cs_pin: CS,
    buf: [u8; MAX_PAYLOAD + 1],
    status: StatusFlags,
}

impl<SPI, CS> RegisterInterface<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs_pin: CS) -> Self {
        Self {
            spi,
            cs_pin,
            buf: [0u8; MAX_PAYLOAD + 1],
            status: StatusFlags::from_bits(0),
        }
    }

    /// Give back the bus and the CSN pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs_pin)
    }

    /// The STATUS byte returned by the latest transaction.
    pub fn status(&self) -> StatusFlags {
        self.status
    }

    fn transfer(&mut self, len: usize) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        let _guard = ChipSelectGuard::acquire(&mut self.cs_pin).map_err(Nrf24Error::Gpo)?;
        self.spi
            .transfer_in_place(&mut self.buf[..len])
            .map_err(Nrf24Error::Spi)?;
        self.spi.flush().map_err(Nrf24Error::Spi)?;
        self.status = StatusFlags::from_bits(self.buf[0]);
        Ok(())
    }

    /// Send `command` followed by `len` zero bytes; the reply is left in `self.buf[1..]`.
    fn command(
        &mut self,
        command: u8,
        len: usize,
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.buf[0] = command;
        self.buf[1..=len].fill(0);
        self.transfer(len + 1)
    }

    fn command_with_data(
        &mut self,
        command: u8,
        data: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        let len = data.len().min(MAX_PAYLOAD);
        self.buf[0] = command;
        self.buf[1..=len].copy_from_slice(&data[..len]);
        self.transfer(len + 1)
    }

    pub fn read_register(&mut self, addr: u8) -> Result<u8, Nrf24Error<SPI::Error, CS::Error>> {
        self.command(addr & registers::ADDRESS_MASK, 1)?;
        Ok(self.buf[1])
    }

    pub fn write_register(
        &mut self,
        addr: u8,
        value: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.command_with_data(
            commands::W_REGISTER | (addr & registers::ADDRESS_MASK),
            &[value],
        )
    }

    /// Read `out.len()` bytes (at most 32) from a multi-byte register.
    pub fn read_registers(
        &mut self,
        addr: u8,
        out: &mut [u8],
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        let len = out.len().min(MAX_PAYLOAD);
        self.command(addr & registers::ADDRESS_MASK, len)?;
        out[..len].copy_from_slice(&self.buf[1..=len]);
        Ok(())
    }

    pub fn write_registers(
        &mut self,
        addr: u8,
        data: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.command_with_data(
            commands::W_REGISTER | (addr & registers::ADDRESS_MASK),
            data,
        )
    }

    /// Width of the payload at the top of the RX FIFO.
    pub fn read_payload_width(&mut self) -> Result<u8, Nrf24Error<SPI::Error, CS::Error>> {
        self.command(commands::R_RX_PL_WID, 1)?;
        Ok(self.buf[1])
    }

    /// Pop the top of the RX FIFO into `out`.
    ///
    /// `out` should be sliced to [`RegisterInterface::read_payload_width()`]; at most
    /// 32 bytes are clocked. Returns the number of bytes transferred.
    pub fn read_payload(
        &mut self,
        out: &mut [u8],
    ) -> Result<usize, Nrf24Error<SPI::Error, CS::Error>> {
        let len = out.len().min(MAX_PAYLOAD);
        self.command(commands::R_RX_PAYLOAD, len)?;
        out[..len].copy_from_slice(&self.buf[1..=len]);
        Ok(len)
    }

    pub fn write_payload(&mut self, data: &[u8]) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.command_with_data(commands::W_TX_PAYLOAD, data)
    }

    /// Queue a payload sent along with the next auto-ack on `pipe`.
    ///
    /// Does nothing if `pipe` is greater than 5.
    pub fn write_ack_payload(
        &mut self,
        pipe: u8,
        data: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        if pipe > 5 {
            return Ok(());
        }
        self.command_with_data(commands::W_ACK_PAYLOAD | pipe, data)
    }

    pub fn flush_tx(&mut self) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.command(commands::FLUSH_TX, 0)
    }

    pub fn flush_rx(&mut self) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.command(commands::FLUSH_RX, 0)
    }

    /// Keep retransmitting the last payload for as long as CE stays high.
    pub fn reuse_tx_payload(&mut self) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        self.command(commands::REUSE_TX_PL, 0)
    }

    /// Read-modify-write a single `bit` of a register.
    pub fn set_bit(
        &mut self,
        addr: u8,
        bit: u8,
        value: bool,
    ) -> Result<(), Nrf24Error<SPI::Error, CS::Error>> {
        let current = self.read_register(addr)?;
        let mask = 1u8 << (bit & 7);
        let new_val = if value { current | mask } else { current & !mask };
        self.write_register(addr, new_val)
    }
}
