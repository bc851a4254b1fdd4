use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, PaLevel};

use super::{mnemonics, timing};

/// The CONFIG register.
///
/// The IRQ fields are stored as the hardware stores them: a set bit masks
/// (disables) the event on the IRQ pin.
#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    #[bits(1, access = None, default = true)]
    pub mask_rx_dr: bool,

    #[bits(1, access = None, default = true)]
    pub mask_tx_ds: bool,

    #[bits(1, access = None, default = true)]
    pub mask_max_rt: bool,

    #[bits(2, access = None, default = 3)]
    pub crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = 0b1100;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !Self::CRC_MASK | length.into_bits();
        Self::from_bits(new_val)
    }

    const fn irq_enabled(&self, mask: u8) -> bool {
        (self.into_bits() & mask) == 0
    }

    fn with_irq(self, mask: u8, enable: bool) -> Self {
        Self::from_bits(self.into_bits() & !mask | ((!enable as u8) * mask))
    }

    pub const fn rx_dr(&self) -> bool {
        self.irq_enabled(mnemonics::MASK_RX_DR)
    }

    pub fn with_rx_dr(self, enable: bool) -> Self {
        self.with_irq(mnemonics::MASK_RX_DR, enable)
    }

    pub const fn tx_ds(&self) -> bool {
        self.irq_enabled(mnemonics::MASK_TX_DS)
    }

    pub fn with_tx_ds(self, enable: bool) -> Self {
        self.with_irq(mnemonics::MASK_TX_DS, enable)
    }

    pub const fn tx_df(&self) -> bool {
        self.irq_enabled(mnemonics::MASK_MAX_RT)
    }

    pub fn with_tx_df(self, enable: bool) -> Self {
        self.with_irq(mnemonics::MASK_MAX_RT, enable)
    }

    pub fn as_rx(self) -> Self {
        Self::from_bits(self.into_bits() | 1)
    }

    pub fn as_tx(self) -> Self {
        Self::from_bits(self.into_bits() & !1)
    }
}

/// The SETUP_RETR register.
#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// Auto-retransmit delay in steps of 250 µs (plus 250 µs).
    #[bits(4, default = 3)]
    pub ard: u8,

    /// Auto-retransmit count.
    #[bits(4, default = 10)]
    pub arc: u8,
}

impl SetupRetry {
    /// The longest time the hardware can spend on one payload before it
    /// gives up and asserts MAX_RT.
    ///
    /// Every attempt costs the retransmit delay, the TX settling time and
    /// the worst case air time, so this bound holds at any data rate.
    pub const fn budget_us(&self) -> u32 {
        let attempt =
            (self.ard() as u32 + 1) * 250 + timing::SETTLE_US + timing::MAX_AIR_TIME_US;
        (self.arc() as u32 + 1) * attempt
    }
}

/// The RF_SETUP register.
#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRf {
    pub cont_wave: bool,

    #[bits(1)]
    _padding: u8,

    /// Spans RF_DR_LOW, PLL_LOCK and RF_DR_HIGH.
    #[bits(3, access = None)]
    data_rate: u8,

    #[bits(2, access = None, default = 3)]
    pa_level: u8,

    #[bits(1, default = true)]
    pub lna_enable: bool,
}

impl SetupRf {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits() & DataRate::MASK)
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits() & PaLevel::MASK)
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}
