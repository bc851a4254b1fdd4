use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiBus,
};

use super::{mnemonics, registers, timing};
use crate::radio::{
    prelude::{EsbChannel, EsbFifo, EsbInit, EsbStatus},
    Nrf24, Nrf24Error, RadioConfig,
};
use crate::StatusFlags;

impl<SPI, DO, IRQ, DELAY> EsbInit for Nrf24<SPI, DO, IRQ, DELAY>
where
    SPI: SpiBus,
    DO: OutputPin,
    IRQ: InputPin,
    DELAY: DelayNs,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Initialize the radio's hardware using the [`SpiBus`] and [`OutputPin`] given
    /// to [`Nrf24::new()`].
    fn init(&mut self) -> Result<(), Self::ConfigErrorType> {
        // Configuration bits written before the power-on reset settles do not stick
        // (4.5ms + 14us worst case).
        self._delay_impl.delay_ns(timing::POWER_ON_RESET_NS);

        self.set_ce(false)?;
        self.with_config(&RadioConfig::default())?;

        // a missing or miswired radio reads back 0x00 or 0xFF
        let config = self._regs.read_register(registers::CONFIG)?;
        if config != self._config_reg.into_bits() {
            #[cfg(feature = "defmt")]
            #[cfg(target_os = "none")]
            defmt::warn!("CONFIG read back {=u8:#x}; is the radio connected?", config);
            return Err(Nrf24Error::BinaryCorruption);
        }
        #[cfg(feature = "defmt")]
        #[cfg(target_os = "none")]
        defmt::debug!("radio initialized on channel {=u8}", RadioConfig::default().channel());
        Ok(())
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType> {
        self.write_config(config.config_reg.with_power(false).as_tx())?;
        self._base_config = self._config_reg;

        self._auto_retries = config.setup_retr;
        self._regs
            .write_register(registers::SETUP_RETR, config.setup_retr.into_bits())?;
        self._regs
            .write_register(registers::RF_SETUP, config.setup_rf.into_bits())?;
        self._auto_ack = config.auto_ack();
        self._regs.write_register(registers::EN_AA, self._auto_ack)?;
        self._regs
            .write_register(registers::SETUP_AW, mnemonics::ADDRESS_WIDTH_5)?;

        // static payloads only
        self._regs.write_register(registers::DYNPD, 0)?;
        self._regs.write_register(registers::FEATURE, 0)?;

        // all RX pipes stay closed until configured
        self._regs.write_register(registers::EN_RXADDR, 0)?;
        self._pipe0_rx_addr = None;

        self.clear_status_flags(StatusFlags::new())?;
        self.set_channel(config.channel())?;
        self.flush_rx()?;
        self.flush_tx()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{registers, EsbInit};
    use crate::radio::{nrf24::commands, Nrf24Error, RadioConfig};
    use crate::{spi_test_expects, test::mk_radio, DataRate, PaLevel, RadioState, StatusFlags};
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::vec;

    fn init_parametrized(corrupted_binary: bool) {
        let ce_expectations = [PinTransaction::set(PinState::Low)];
        let mut spi_expectations = spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x7Cu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::SETUP_RETR | commands::W_REGISTER, 0x3Au8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RF_SETUP | commands::W_REGISTER, 0x07u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::EN_AA | commands::W_REGISTER, 0x3Fu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::SETUP_AW | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::FEATURE | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RF_CH | commands::W_REGISTER, 76u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ]
        .to_vec();

        // read back CONFIG register to verify SPI lines are working
        let readback = if corrupted_binary { 0xFF } else { 0x7C };
        spi_expectations.extend(spi_test_expects![(
            vec![registers::CONFIG, 0u8],
            vec![0xEu8, readback],
        ),]);

        let (mut radio, mut mocks) = mk_radio(&ce_expectations, &spi_expectations);
        let result = radio.init();
        if corrupted_binary {
            assert_eq!(result, Err(Nrf24Error::BinaryCorruption));
        } else {
            assert!(result.is_ok());
            assert_eq!(radio.state(), RadioState::PowerDown);
        }
        mocks.done();
    }

    #[test]
    fn init() {
        init_parametrized(false);
    }

    #[test]
    fn init_corrupted_binary() {
        init_parametrized(true);
    }

    #[test]
    fn custom_config() {
        let config = RadioConfig::default()
            .with_channel(2)
            .with_data_rate(DataRate::Kbps250)
            .with_pa_level(PaLevel::Low)
            .with_auto_retries(1, 3)
            .with_auto_ack(0x3)
            .with_irq_events(StatusFlags::default().with_rx_dr(true));
        let spi_expectations = spi_test_expects![
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x3Cu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::SETUP_RETR | commands::W_REGISTER, 0x13u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RF_SETUP | commands::W_REGISTER, 0x23u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::EN_AA | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::SETUP_AW | commands::W_REGISTER, 3u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::FEATURE | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::EN_RXADDR | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x70u8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::RF_CH | commands::W_REGISTER, 2u8],
                vec![0xEu8, 0u8],
            ),
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
        ];
        let (mut radio, mut mocks) = mk_radio(&[], &spi_expectations);
        radio.with_config(&config).unwrap();
        mocks.done();
    }
}
