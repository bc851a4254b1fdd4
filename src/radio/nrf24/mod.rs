use core::fmt::{Display, Formatter, Result as FmtResult};

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

pub(crate) mod bit_fields;
mod carrier;
mod channel;
mod constants;
mod fifo;
mod init;
mod pipe;
mod power;
mod radio;
mod spi;
mod status;
use bit_fields::{Config, SetupRetry};
pub use constants::{commands, mnemonics, registers, timing};
pub use spi::{ChipSelectGuard, RegisterInterface, MAX_PAYLOAD};

use crate::RadioState;

/// An collection of error types to describe hardware malfunctions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error (CE or CSN pin).
    Gpo(DO),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    ///
    /// Reported by [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init) when
    /// the CONFIG register does not read back what was written.
    BinaryCorruption,
}

impl<SPI, DO> Display for Nrf24Error<SPI, DO> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Nrf24Error::Spi(_) => write!(f, "SPI transaction failed"),
            Nrf24Error::Gpo(_) => write!(f, "digital output pin failed"),
            Nrf24Error::BinaryCorruption => write!(f, "radio did not echo its configuration"),
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl<SPI, DO> defmt::Format for Nrf24Error<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Nrf24Error::Spi(_) => defmt::write!(fmt, "SPI transaction failed"),
            Nrf24Error::Gpo(_) => defmt::write!(fmt, "digital output pin failed"),
            Nrf24Error::BinaryCorruption => {
                defmt::write!(fmt, "radio did not echo its configuration")
            }
        }
    }
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// It exclusively owns the SPI bus and the radio's three control lines:
/// CE (chip enable), CSN (chip select) and IRQ. CE is only ever driven by
/// the methods of this struct, so [`Nrf24::state()`] always agrees with the
/// hardware.
pub struct Nrf24<SPI, DO, IRQ, DELAY> {
    /// The delay (in microseconds) that [`EsbRadio::send()`](fn@crate::radio::prelude::EsbRadio::send)
    /// waits between entering TX mode and loading the payload, when the radio
    /// is already powered up.
    ///
    /// <div class="warning">
    ///
    /// The radio needs 130 microseconds to settle after switching between RX and TX.
    ///
    /// </div>
    pub tx_delay: u32,
    _regs: RegisterInterface<SPI, DO>,
    _ce_pin: DO,
    _ce_high: bool,
    _irq_pin: IRQ,
    _delay_impl: DELAY,
    _config_reg: Config,
    /// The CONFIG value applied by `with_config()`; restored by `stop_carrier()`.
    _base_config: Config,
    _auto_retries: SetupRetry,
    _auto_ack: u8,
    _tx_address: [u8; 5],
    _tx_payload_width: u8,
    _pipe0_rx_addr: Option<[u8; 5]>,
}

impl<SPI, DO, IRQ, DELAY> Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    /// Instantiate a [`Nrf24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`, `cs_pin` and `irq_pin`.
    ///
    /// The `spi` bus must not toggle the radio's CSN pin on its own;
    /// that is done per transaction by [`ChipSelectGuard`].
    ///
    /// Call [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init) before anything else.
    pub fn new(spi: SPI, ce_pin: DO, cs_pin: DO, irq_pin: IRQ, delay_impl: DELAY) -> Self {
        Nrf24 {
            tx_delay: timing::SETTLE_US,
            _regs: RegisterInterface::new(spi, cs_pin),
            _ce_pin: ce_pin,
            _ce_high: false,
            _irq_pin: irq_pin,
            _delay_impl: delay_impl,
            _config_reg: Config::default(),
            _base_config: Config::default(),
            _auto_retries: SetupRetry::default(),
            _auto_ack: 0x3F,
            _tx_address: [0xE7; 5],
            _tx_payload_width: 1,
            _pipe0_rx_addr: None,
        }
    }

    /// Give back the owned peripherals: `(spi, ce_pin, cs_pin, irq_pin, delay_impl)`.
    pub fn release(self) -> (SPI, DO, DO, IRQ, DELAY) {
        let (spi, cs_pin) = self._regs.release();
        (spi, self._ce_pin, cs_pin, self._irq_pin, self._delay_impl)
    }

    /// The logical state the radio was last put into.
    pub fn state(&self) -> RadioState {
        match (self._config_reg.power(), self._ce_high) {
            (false, _) => RadioState::PowerDown,
            (true, false) => RadioState::Standby,
            (true, true) if self._config_reg.is_rx() => RadioState::Listening,
            (true, true) => RadioState::Transmitting,
        }
    }

    /// Is the (active low) IRQ pin asserted?
    ///
    /// Only events enabled in
    /// [`RadioConfig`](struct@crate::radio::RadioConfig) drive the pin.
    pub fn irq_active(&mut self) -> Result<bool, IRQ::Error> {
        self._irq_pin.is_low()
    }

    /// The number of retransmissions used by the last transmission.
    pub fn get_last_arc(&mut self) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        Ok(self._regs.read_register(registers::OBSERVE_TX)? & 0xF)
    }

    fn set_ce(&mut self, high: bool) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if high {
            self._ce_pin.set_high().map_err(Nrf24Error::Gpo)?;
        } else {
            self._ce_pin.set_low().map_err(Nrf24Error::Gpo)?;
        }
        self._ce_high = high;
        Ok(())
    }

    fn write_config(&mut self, config: Config) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._config_reg = config;
        self._regs.write_register(registers::CONFIG, config.into_bits())
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, Nrf24Error};
    use crate::radio::prelude::{EsbPower, EsbRadio};
    use crate::test::{mk_radio, mk_radio_with_irq};
    use crate::{spi_test_expects, RadioState};
    use embedded_hal::digital::ErrorKind;
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::{format, vec};

    #[test]
    fn last_arc() {
        let spi_expectations = spi_test_expects![
            (vec![registers::OBSERVE_TX, 0], vec![0xEu8, 0x13]),
        ];
        let (mut radio, mut mocks) = mk_radio(&[], &spi_expectations);
        assert_eq!(radio.get_last_arc(), Ok(3));
        mocks.done();
    }

    #[test]
    fn irq_pin() {
        let irq_expectations = [
            PinTransaction::get(PinState::High),
            PinTransaction::get(PinState::Low),
        ];
        let (mut radio, mut mocks) = mk_radio_with_irq(&[], &[], &irq_expectations);
        assert_eq!(radio.irq_active(), Ok(false));
        assert_eq!(radio.irq_active(), Ok(true));
        mocks.done();
    }

    #[test]
    fn state_tracks_config_and_ce() {
        let spi_expectations = spi_test_expects![
            // power_up()
            (vec![registers::CONFIG | 0x20, 0x7E], vec![0xEu8, 0]),
            // start_listening()
            (vec![registers::CONFIG | 0x20, 0x7F], vec![0xEu8, 0]),
            (vec![registers::STATUS | 0x20, 0x70], vec![0xEu8, 0]),
            (vec![0xE2], vec![0xEu8]),
            (vec![0xE1], vec![0xEu8]),
            (vec![registers::EN_RXADDR, 0], vec![0xEu8, 3]),
            (vec![registers::EN_RXADDR | 0x20, 2], vec![0xEu8, 0]),
        ];
        let ce_expectations = [PinTransaction::set(PinState::High)];
        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        assert_eq!(radio.state(), RadioState::PowerDown);
        radio.power_up(Some(0)).unwrap();
        assert_eq!(radio.state(), RadioState::Standby);
        radio.start_listening().unwrap();
        assert_eq!(radio.state(), RadioState::Listening);
        mocks.done();
    }

    #[test]
    fn ce_failure_is_reported() {
        let ce_expectations = [PinTransaction::set(PinState::Low).with_error(ErrorKind::Other)];
        let spi_expectations = spi_test_expects![
            (vec![registers::CONFIG | 0x20, 0x7E], vec![0xEu8, 0]),
        ];
        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        radio.power_up(Some(0)).unwrap();
        assert_eq!(radio.power_down(), Err(Nrf24Error::Gpo(ErrorKind::Other)));
        // CE never changed, so the radio still reports being powered
        assert!(radio.is_powered());
        mocks.done();
    }

    #[test]
    fn error_display() {
        let err: Nrf24Error<(), ()> = Nrf24Error::BinaryCorruption;
        assert_eq!(format!("{err}"), "radio did not echo its configuration");
        let err: Nrf24Error<(), ()> = Nrf24Error::Spi(());
        assert_eq!(format!("{err}"), "SPI transaction failed");
    }
}
