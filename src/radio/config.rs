use crate::radio::nrf24::bit_fields::{Config, SetupRetry, SetupRf};
use crate::{CrcLength, DataRate, PaLevel, StatusFlags};

/// Register values applied by
/// [`EsbInit::with_config()`](fn@crate::radio::prelude::EsbInit::with_config).
///
/// Both nodes of a link must agree on channel, data rate and CRC length.
/// ```
/// use volume_link::{radio::RadioConfig, DataRate};
/// let config = RadioConfig::default()
///     .with_channel(110)
///     .with_data_rate(DataRate::Kbps250);
/// assert_eq!((config.channel(), config.data_rate()), (110, DataRate::Kbps250));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RadioConfig {
    pub(crate) config_reg: Config,
    pub(crate) setup_retr: SetupRetry,
    pub(crate) setup_rf: SetupRf,
    channel: u8,
    auto_ack: u8,
}

/// The chip's reset values, except for auto-ack and the channel:
///
/// - channel 76, 1 Mbps, 0 dBm, LNA gain on, CRC-16;
/// - auto-ack on all six pipes;
/// - up to 10 retransmits, 1000 µs apart;
/// - no event routed to the IRQ pin.
impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            config_reg: Config::default(),
            setup_retr: SetupRetry::default(),
            setup_rf: SetupRf::default(),
            channel: 76,
            auto_ack: 0x3F,
        }
    }
}

impl RadioConfig {
    pub const fn crc_length(&self) -> CrcLength {
        self.config_reg.crc_length()
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        Self {
            config_reg: self.config_reg.with_crc_length(length),
            ..self
        }
    }

    pub const fn data_rate(&self) -> DataRate {
        self.setup_rf.data_rate()
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        Self {
            setup_rf: self.setup_rf.with_data_rate(data_rate),
            ..self
        }
    }

    pub const fn pa_level(&self) -> PaLevel {
        self.setup_rf.pa_level()
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        Self {
            setup_rf: self.setup_rf.with_pa_level(level),
            ..self
        }
    }

    pub const fn lna_enable(&self) -> bool {
        self.setup_rf.lna_enable()
    }

    /// The LNA_HCURR bit. Ignored by the nRF24L01+ and most clones.
    pub fn with_lna_enable(self, enable: bool) -> Self {
        Self {
            setup_rf: self.setup_rf.with_lna_enable(enable),
            ..self
        }
    }

    pub const fn channel(&self) -> u8 {
        self.channel
    }

    /// RF channel, `2400 + channel` MHz. Saturates at 125.
    pub fn with_channel(self, channel: u8) -> Self {
        Self {
            channel: channel.min(125),
            ..self
        }
    }

    /// EN_AA, one bit per pipe.
    pub const fn auto_ack(&self) -> u8 {
        self.auto_ack
    }

    /// Bits above pipe 5 are dropped.
    ///
    /// Keep bit 0 set: the sender's acknowledgements come back on pipe 0.
    pub fn with_auto_ack(self, pipes: u8) -> Self {
        Self {
            auto_ack: pipes & 0x3F,
            ..self
        }
    }

    /// `(delay, count)` as given to [`RadioConfig::with_auto_retries()`].
    pub const fn auto_retries(&self) -> (u8, u8) {
        (self.setup_retr.ard(), self.setup_retr.arc())
    }

    /// `delay` is in 250 µs steps on top of a 250 µs minimum. Both
    /// arguments saturate at 15.
    pub fn with_auto_retries(self, delay: u8, count: u8) -> Self {
        Self {
            setup_retr: self.setup_retr.with_ard(delay.min(15)).with_arc(count.min(15)),
            ..self
        }
    }

    /// How long [`EsbRadio::send()`](fn@crate::radio::prelude::EsbRadio::send)
    /// keeps polling for an outcome with these retry settings.
    pub const fn max_send_time_us(&self) -> u32 {
        self.setup_retr.budget_us()
    }

    /// The events that pull the IRQ pin low, as set flags.
    pub fn irq_events(&self) -> StatusFlags {
        StatusFlags::default()
            .with_rx_dr(self.config_reg.rx_dr())
            .with_tx_ds(self.config_reg.tx_ds())
            .with_tx_df(self.config_reg.tx_df())
    }

    /// Route each flag set in `events` to the IRQ pin and mask the others.
    pub fn with_irq_events(self, events: StatusFlags) -> Self {
        let config_reg = self
            .config_reg
            .with_rx_dr(events.rx_dr())
            .with_tx_ds(events.tx_ds())
            .with_tx_df(events.tx_df());
        Self { config_reg, ..self }
    }
}
