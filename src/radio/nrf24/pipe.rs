use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use super::{registers, MAX_PAYLOAD};
use crate::radio::{prelude::EsbPipe, Nrf24, Nrf24Error};

const ADDRESS_LENGTH: usize = 5;

fn clamp_width(payload_width: u8) -> u8 {
    payload_width.clamp(1, MAX_PAYLOAD as u8)
}

impl<SPI, DO, IRQ, DELAY> EsbPipe for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_transmit_address(
        &mut self,
        address: &[u8],
        payload_width: u8,
    ) -> Result<(), Self::PipeErrorType> {
        let len = address.len().min(ADDRESS_LENGTH);
        self._tx_address[..len].copy_from_slice(&address[..len]);
        self._regs.write_registers(registers::TX_ADDR, &self._tx_address)?;
        // pipe 0 receives the auto-ack for this address
        self._regs
            .write_registers(registers::RX_ADDR_P0, &self._tx_address)?;
        self._tx_payload_width = clamp_width(payload_width);
        self._regs
            .write_register(registers::RX_PW_P0, self._tx_payload_width)?;
        self._regs.set_bit(registers::EN_RXADDR, 0, true)
    }

    fn configure_receive_pipe(
        &mut self,
        pipe: u8,
        address: &[u8],
        payload_width: u8,
    ) -> Result<(), Self::PipeErrorType> {
        if pipe > 5 || address.is_empty() {
            return Ok(());
        }
        if pipe < 2 {
            let len = address.len().min(ADDRESS_LENGTH);
            self._regs
                .write_registers(registers::RX_ADDR_P0 + pipe, &address[..len])?;
            if pipe == 0 {
                // start_listening() restores this after set_transmit_address() overwrites it
                let mut cached = self._tx_address;
                cached[..len].copy_from_slice(&address[..len]);
                self._pipe0_rx_addr = Some(cached);
            }
        } else {
            // pipes 2-5 borrow the 4 MSBytes of pipe 1
            self._regs
                .write_register(registers::RX_ADDR_P0 + pipe, address[0])?;
        }
        self._regs
            .write_register(registers::RX_PW_P0 + pipe, clamp_width(payload_width))?;
        self._regs.set_bit(registers::EN_RXADDR, pipe, true)
    }

    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType> {
        if pipe > 5 {
            return Ok(());
        }
        self._regs.set_bit(registers::EN_RXADDR, pipe, false)?;
        if pipe == 0 {
            self._pipe0_rx_addr = None;
        }
        Ok(())
    }

    fn get_transmit_address(&mut self, address: &mut [u8]) -> Result<(), Self::PipeErrorType> {
        let len = address.len().min(ADDRESS_LENGTH);
        self._regs
            .read_registers(registers::TX_ADDR, &mut address[..len])
    }

    fn get_rx_address(&mut self, pipe: u8, address: &mut [u8]) -> Result<(), Self::PipeErrorType> {
        if pipe > 5 || address.is_empty() {
            return Ok(());
        }
        let len = if pipe < 2 {
            address.len().min(ADDRESS_LENGTH)
        } else {
            1
        };
        self._regs
            .read_registers(registers::RX_ADDR_P0 + pipe, &mut address[..len])
    }
}
