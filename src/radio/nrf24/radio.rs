use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use super::{registers, timing, MAX_PAYLOAD};
use crate::{
    radio::{
        prelude::{EsbFifo, EsbPower, EsbRadio, EsbStatus},
        Nrf24, Nrf24Error,
    },
    StatusFlags,
};

impl<SPI, DO, IRQ, DELAY> EsbRadio for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type RadioErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// See [`EsbRadio::start_listening()`] for implementation-agnostic detail.
    ///
    /// This also restores the address cached by
    /// [`EsbPipe::configure_receive_pipe()`](fn@crate::radio::prelude::EsbPipe::configure_receive_pipe)
    /// for pipe 0, or closes pipe 0 if
    /// it was only used for auto-ack reception.
    fn start_listening(&mut self) -> Result<(), Self::RadioErrorType> {
        let was_powered = self._config_reg.power();
        self.write_config(self._config_reg.with_power(true).as_rx())?;
        if !was_powered {
            self._delay_impl.delay_us(timing::POWER_UP_US);
        }
        self.clear_status_flags(StatusFlags::new())?;
        self.flush_rx()?;
        self.flush_tx()?;

        match self._pipe0_rx_addr {
            Some(address) => self
                ._regs
                .write_registers(registers::RX_ADDR_P0, &address)?,
            None => self._regs.set_bit(registers::EN_RXADDR, 0, false)?,
        }

        self.set_ce(true)?;
        self._delay_impl.delay_us(timing::SETTLE_US);
        Ok(())
    }

    /// See [`EsbRadio::stop_listening()`] for implementation-agnostic detail.
    fn stop_listening(&mut self) -> Result<(), Self::RadioErrorType> {
        self.write_config(self._config_reg.with_power(false).as_tx())?;
        self.clear_status_flags(StatusFlags::new())?;
        self.flush_rx()?;
        self.flush_tx()?;

        // pipe 0 goes back to receiving auto-acks for the transmit address
        self._regs.set_bit(registers::EN_RXADDR, 0, true)?;
        if self._pipe0_rx_addr.is_some() {
            self._regs
                .write_registers(registers::RX_ADDR_P0, &self._tx_address)?;
        }
        self.set_ce(false)
    }

    fn is_listening(&self) -> bool {
        self._config_reg.is_rx()
    }

    /// See [`EsbRadio::send()`] for implementation-agnostic detail.
    ///
    /// The wait is a polling loop on the STATUS register with
    /// [`timing::POLL_INTERVAL_US`] between polls. The hardware always ends
    /// with TX_DS or MAX_RT, so the poll cap only guards against a dead chip.
    /// It is the worst case retransmit time (`(ARC + 1)` attempts of ARD,
    /// TX settling and [`timing::MAX_AIR_TIME_US`]).
    fn send(&mut self, buf: &[u8]) -> Result<(), Self::RadioErrorType> {
        if buf.is_empty() {
            return Ok(());
        }
        self.set_ce(false)?;
        let was_powered = self._config_reg.power();
        self.write_config(self._config_reg.with_power(true).as_tx())?;
        self._delay_impl.delay_us(if was_powered {
            self.tx_delay
        } else {
            timing::POWER_UP_US
        });
        self.clear_status_flags(StatusFlags::default().with_tx_ds(true).with_tx_df(true))?;

        let len = buf.len().min(MAX_PAYLOAD);
        let width = len.max(self._tx_payload_width as usize);
        let mut payload = [0u8; MAX_PAYLOAD];
        payload[..len].copy_from_slice(&buf[..len]);
        self._regs.write_payload(&payload[..width])?;

        self.set_ce(true)?;
        self._delay_impl.delay_us(timing::CE_PULSE_US);
        self.set_ce(false)?;

        let budget = self._auto_retries.budget_us();
        let polls = (budget + timing::POLL_INTERVAL_US - 1) / timing::POLL_INTERVAL_US;
        let mut status = StatusFlags::default();
        for _ in 0..polls {
            self.update()?;
            self.get_status_flags(&mut status);
            if status.tx_ds() || status.tx_df() {
                break;
            }
            self._delay_impl.delay_us(timing::POLL_INTERVAL_US);
        }
        #[cfg(feature = "defmt")]
        #[cfg(target_os = "none")]
        {
            if status.tx_ds() {
                defmt::debug!("payload acknowledged");
            } else if status.tx_df() {
                defmt::debug!("payload not acknowledged; retransmits exhausted");
            } else {
                defmt::warn!("no TX result after {=u32} us", budget);
            }
        }

        self.power_down()?;
        self.flush_tx()
    }

    /// See [`EsbRadio::receive()`] for implementation-agnostic detail.
    ///
    /// A reported payload width above 32 means the RX FIFO is corrupt;
    /// it is flushed and a length of 0 is returned.
    fn receive(&mut self, buf: &mut [u8]) -> Result<(usize, u8), Self::RadioErrorType> {
        let ce_was_high = self._ce_high;
        self.set_ce(false)?;

        let width = self._regs.read_payload_width()? as usize;
        let pipe = self._regs.status().rx_pipe();
        let len = if width > MAX_PAYLOAD {
            self.flush_rx()?;
            0
        } else {
            let len = width.min(buf.len());
            if len > 0 {
                self._regs.read_payload(&mut buf[..len])?;
            }
            len
        };
        self.clear_status_flags(StatusFlags::default().with_rx_dr(true))?;

        if ce_was_high {
            self.set_ce(true)?;
        }
        Ok((len, pipe))
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::EsbRadio;
    use crate::radio::nrf24::{commands, registers};
    use crate::radio::prelude::{EsbFifo, EsbInit, EsbPipe};
    use crate::radio::RadioConfig;
    use crate::test::{mk_radio, mk_sim_radio, mk_sim_radio_with_clock, SimChip, SimClock};
    use crate::{spi_test_expects, RadioState};
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::{vec, vec::Vec};

    #[test]
    fn start_listening_restores_pipe0() {
        let mut p0_addr = vec![registers::RX_ADDR_P0 | commands::W_REGISTER];
        p0_addr.extend_from_slice(b"0Node");
        let spi_expectations = spi_test_expects![
            // configure_receive_pipe(0, ..)
            (p0_addr.clone(), vec![0xEu8; 6]),
            (
                vec![registers::RX_PW_P0 | commands::W_REGISTER, 4u8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 0u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
            // start_listening()
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x7Fu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (p0_addr, vec![0xEu8; 6]),
        ];
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        radio.configure_receive_pipe(0, b"0Node", 4).unwrap();
        radio.start_listening().unwrap();
        assert!(radio.is_listening());
        assert_eq!(radio.state(), RadioState::Listening);
        mocks.done();
    }

    #[test]
    fn stop_listening() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x7Cu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (vec![registers::EN_RXADDR, 0u8], vec![0xEu8, 2u8]),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        radio.stop_listening().unwrap();
        assert!(!radio.is_listening());
        assert_eq!(radio.state(), RadioState::PowerDown);
        mocks.done();
    }

    /// STATUS polls of one `send()` on a radio that is already powered up.
    fn send_expectations(status_replies: &[u8]) -> Vec<SpiTransaction<u8>> {
        let mut expectations = spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x7Eu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x30u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::W_TX_PAYLOAD, b'+'], vec![0xEu8, 0u8]),
        ]
        .to_vec();
        for reply in status_replies {
            expectations.extend(spi_test_expects![(
                vec![registers::STATUS, 0u8],
                vec![*reply, *reply],
            ),]);
        }
        expectations.extend(spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x7Cu8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ]);
        expectations
    }

    fn send_ce_expectations() -> [PinTransaction; 4] {
        [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            // power_down()
            PinTransaction::set(PinState::Low),
        ]
    }

    #[test]
    fn send_acknowledged() {
        // not yet, not yet, TX_DS
        let spi_expectations = send_expectations(&[0xE, 0xE, 0x2E]);
        let (mut radio, mut mocks) = mk_radio(&send_ce_expectations(), &spi_expectations);
        radio._config_reg = radio._config_reg.with_power(true);
        radio.send(b"+").unwrap();
        assert_eq!(radio.state(), RadioState::PowerDown);
        mocks.done();
    }

    #[test]
    fn send_retransmits_exhausted() {
        let spi_expectations = send_expectations(&[0x1E]);
        let (mut radio, mut mocks) = mk_radio(&send_ce_expectations(), &spi_expectations);
        radio._config_reg = radio._config_reg.with_power(true);
        // MAX_RT is not surfaced as an error
        assert!(radio.send(b"+").is_ok());
        mocks.done();
    }

    #[test]
    fn send_gives_up_on_dead_chip() {
        // ARD = 0, ARC = 0: one attempt of 250 + 130 + 1320 us, 34 polls of 50 us
        let spi_expectations = send_expectations(&[0xE; 34]);
        let (mut radio, mut mocks) = mk_radio(&send_ce_expectations(), &spi_expectations);
        radio._auto_retries = RadioConfig::default().with_auto_retries(0, 0).setup_retr;
        radio._config_reg = radio._config_reg.with_power(true);
        radio.send(b"+").unwrap();
        mocks.done();
    }

    #[test]
    fn send_nothing() {
        let (mut radio, mut mocks) = mk_radio(&[], &[]);
        radio.send(&[]).unwrap();
        mocks.done();
    }

    #[test]
    fn send_pads_to_payload_width() {
        let chip = SimChip::default();
        let mut radio = mk_sim_radio(&chip);
        radio.init().unwrap();
        radio.set_transmit_address(b"BNode", 4).unwrap();
        radio.send(b"+").unwrap();
        radio.send(&[0x55; 40]).unwrap();
        let sent = chip.sent();
        assert_eq!(sent[0], [b'+', 0, 0, 0]);
        assert_eq!(sent[1].len(), 32);
    }

    #[test]
    fn send_bounded_with_simulated_chip() {
        for acknowledge in [true, false] {
            let chip = SimChip::default();
            chip.set_acknowledge(acknowledge);
            let mut radio = mk_sim_radio(&chip);
            radio.init().unwrap();
            radio.set_transmit_address(b"BNode", 1).unwrap();
            chip.clear_opcodes();
            radio.send(b"-").unwrap();
            // the first poll already sees the outcome
            assert_eq!(chip.count_opcode(registers::STATUS), 1);
            assert_eq!(chip.sent(), [vec![b'-']]);
            assert_eq!(radio.state(), RadioState::PowerDown);
        }
    }

    #[test]
    fn send_bounded_when_chip_is_silent() {
        let chip = SimChip::default();
        chip.set_silent(true);
        let mut radio = mk_sim_radio(&chip);
        radio.init().unwrap();
        chip.clear_opcodes();
        radio.send(b"?").unwrap();
        // default cap: 11 attempts of 2450 us, polled every 50 us
        assert_eq!(chip.count_opcode(registers::STATUS), 539);
        assert_eq!(chip.count_opcode(commands::FLUSH_TX), 1);
    }

    #[test]
    fn send_waits_for_late_max_rt() {
        let chip = SimChip::default();
        let clock = SimClock::default();
        chip.set_acknowledge(false);
        // 11 attempts of ARD (1000 us) plus TX settling (130 us)
        let air_ns = 11 * 1_130_000;
        chip.set_outcome_delay(&clock, air_ns);
        let mut radio = mk_sim_radio_with_clock(&chip, &clock);
        radio.init().unwrap();
        chip.clear_opcodes();
        let start = clock.now_ns();
        radio.send(b"+").unwrap();
        // polls at 10 us + k * 50 us after the payload write; 12430 us needs 250
        assert_eq!(chip.count_opcode(registers::STATUS), 250);
        assert!(clock.now_ns() - start >= air_ns);
        assert_ne!(chip.register(registers::STATUS) & 0x10, 0);
        assert_eq!(chip.count_opcode(commands::FLUSH_TX), 1);
        assert_eq!(radio.state(), RadioState::PowerDown);
    }

    #[test]
    fn receive() {
        let spi_expectations = spi_test_expects![
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x42u8, 1u8]),
            (vec![commands::R_RX_PAYLOAD, 0u8], vec![0x42u8, b'+']),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x42u8, 0u8],
            ),
        ];
        let ce_expectations = [
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ];
        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        radio._ce_high = true;
        let mut buf = [0u8; 32];
        assert_eq!(radio.receive(&mut buf).unwrap(), (1, 1));
        assert_eq!(buf[0], b'+');
        mocks.done();
    }

    #[test]
    fn receive_corrupt_width() {
        let spi_expectations = spi_test_expects![
            (vec![commands::R_RX_PL_WID, 0u8], vec![0x40u8, 0xFFu8]),
            (vec![commands::FLUSH_RX], vec![0x40u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x40u8, 0u8],
            ),
        ];
        // CE was low before, so it stays low
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        let mut buf = [0u8; 32];
        assert_eq!(radio.receive(&mut buf).unwrap(), (0, 0));
        mocks.done();
    }

    #[test]
    fn listen_and_receive_with_simulated_chip() {
        let chip = SimChip::default();
        let mut radio = mk_sim_radio(&chip);
        radio.init().unwrap();
        radio.configure_receive_pipe(1, b"BNode", 1).unwrap();
        radio.start_listening().unwrap();
        assert!(!radio.available().unwrap());

        chip.deliver(1, b"+");
        chip.deliver(1, b"-");
        let mut buf = [0u8; 32];
        let mut pipe = 0;
        assert!(radio.available_pipe(&mut pipe).unwrap());
        assert_eq!(pipe, 1);
        assert_eq!(radio.receive(&mut buf).unwrap(), (1, 1));
        assert_eq!(buf[0], b'+');
        // RX_DR was cleared but the second payload is still queued
        assert!(radio.available().unwrap());
        assert_eq!(radio.receive(&mut buf).unwrap(), (1, 1));
        assert_eq!(buf[0], b'-');
        assert!(!radio.available().unwrap());
        assert_eq!(radio.state(), RadioState::Listening);
    }
}
