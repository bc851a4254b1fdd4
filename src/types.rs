//! Register-level enums and the STATUS byte, shared by the driver and the
//! command link.
//!
//! Each enum knows its own RF_SETUP or CONFIG bit pattern, so the register
//! views in `bit_fields` only have to mask and splice.

use core::fmt::{Display, Formatter, Result};

use bitfield_struct::bitfield;

/// Transmit output power, RF_SETUP bits 2:1.
///
/// The discriminant is the 2-bit register value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    Min = 0,
    Low = 1,
    High = 2,
    Max = 3,
}

impl PaLevel {
    pub(crate) const MASK: u8 = 0b110;

    /// Output power at the antenna pin, in dBm.
    pub const fn dbm(self) -> i8 {
        (self as i8 - 3) * 6
    }

    pub(crate) const fn into_bits(self) -> u8 {
        (self as u8) << 1
    }

    pub(crate) const fn from_bits(value: u8) -> Self {
        match (value & Self::MASK) >> 1 {
            0 => PaLevel::Min,
            1 => PaLevel::Low,
            2 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

impl Display for PaLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} dBm", self.dbm())
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for PaLevel {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=i8} dBm", self.dbm())
    }
}

/// Air data rate, selected by RF_DR_LOW (bit 5) and RF_DR_HIGH (bit 3).
///
/// Both nodes must agree on it. 250 kbps has the longest range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    Mbps1,
    Mbps2,
    Kbps250,
}

impl DataRate {
    pub(crate) const MASK: u8 = 0x28;

    pub const fn kbps(self) -> u16 {
        match self {
            DataRate::Mbps1 => 1000,
            DataRate::Mbps2 => 2000,
            DataRate::Kbps250 => 250,
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 1 << 3,
            DataRate::Kbps250 => 1 << 5,
        }
    }

    /// RF_DR_LOW wins over RF_DR_HIGH; both set is reserved and reads as 250 kbps.
    pub(crate) const fn from_bits(value: u8) -> Self {
        if value & (1 << 5) != 0 {
            DataRate::Kbps250
        } else if value & (1 << 3) != 0 {
            DataRate::Mbps2
        } else {
            DataRate::Mbps1
        }
    }
}

impl Display for DataRate {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "{} kbps", self.kbps())
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for DataRate {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=u16} kbps", self.kbps())
    }
}

/// Packet checksum, CONFIG bits EN_CRC (3) and CRCO (2).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrcLength {
    Disabled,
    Bit8,
    Bit16,
}

impl CrcLength {
    const EN_CRC: u8 = 1 << 3;
    const CRCO: u8 = 1 << 2;

    /// Checksum bytes appended to every packet.
    pub const fn bytes(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 1,
            CrcLength::Bit16 => 2,
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => Self::EN_CRC,
            CrcLength::Bit16 => Self::EN_CRC | Self::CRCO,
        }
    }

    /// CRCO is ignored while EN_CRC is cleared.
    pub(crate) const fn from_bits(value: u8) -> Self {
        if value & Self::EN_CRC == 0 {
            CrcLength::Disabled
        } else if value & Self::CRCO == 0 {
            CrcLength::Bit8
        } else {
            CrcLength::Bit16
        }
    }
}

impl Display for CrcLength {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.bytes() {
            0 => f.write_str("no CRC"),
            n => write!(f, "CRC-{}", n * 8),
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for CrcLength {
    fn format(&self, fmt: defmt::Formatter) {
        match self.bytes() {
            0 => defmt::write!(fmt, "no CRC"),
            n => defmt::write!(fmt, "CRC-{=u8}", n * 8),
        }
    }
}

/// The logical operating state of the transceiver.
///
/// This is derived from the CONFIG register's power and primary-RX bits
/// together with the level of the CE pin, so it can never disagree with
/// what the hardware was told.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RadioState {
    /// Power down mode. Registers are retained, nothing else runs.
    PowerDown,
    /// Powered up with CE low.
    Standby,
    /// Powered up in RX mode with CE high.
    Listening,
    /// Powered up in TX mode with CE high.
    Transmitting,
}

impl RadioState {
    const fn label(self) -> &'static str {
        match self {
            RadioState::PowerDown => "powered down",
            RadioState::Standby => "standby",
            RadioState::Listening => "listening",
            RadioState::Transmitting => "transmitting",
        }
    }
}

impl Display for RadioState {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.label())
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for RadioState {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=str}", self.label())
    }
}

/// The STATUS byte the chip clocks out at the start of every SPI transaction.
///
/// Only the three interrupt flags can be set from outside the crate, to
/// pick which of them [`EsbStatus::clear_status_flags()`] resets:
/// ```
/// use volume_link::StatusFlags;
/// let sent = StatusFlags::default().with_tx_ds(true);
/// assert!(sent.tx_ds() && !sent.rx_dr());
/// assert!(StatusFlags::new().tx_df());
/// ```
///
/// [`EsbStatus::clear_status_flags()`]: fn@crate::radio::prelude::EsbStatus::clear_status_flags
#[bitfield(u8, new = false, order = Msb)]
pub struct StatusFlags {
    #[bits(1)]
    _reserved: u8,

    /// RX_DR: a payload arrived.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// TX_DS: the last payload was acknowledged.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// MAX_RT: the last payload ran out of retransmits.
    #[bits(1, access = RO)]
    pub tx_df: bool,

    /// Pipe of the payload at the head of the RX FIFO; `0b111` when empty.
    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    #[bits(1, access = RO)]
    pub(crate) tx_full: bool,
}

impl StatusFlags {
    /// RX_DR, TX_DS and MAX_RT. The same bits mask the IRQ pin in CONFIG.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    pub(crate) const RX_FIFO_EMPTY: u8 = 7;

    /// All three interrupt flags set.
    pub fn new() -> Self {
        Self::from_bits(Self::IRQ_MASK)
    }

    fn with_flag(self, offset: usize, flag: bool) -> Self {
        let cleared = self.into_bits() & !(1 << offset);
        Self::from_bits(cleared | ((flag as u8) << offset))
    }

    pub fn with_rx_dr(self, flag: bool) -> Self {
        self.with_flag(Self::RX_DR_OFFSET, flag)
    }

    pub fn with_tx_ds(self, flag: bool) -> Self {
        self.with_flag(Self::TX_DS_OFFSET, flag)
    }

    pub fn with_tx_df(self, flag: bool) -> Self {
        self.with_flag(Self::TX_DF_OFFSET, flag)
    }

    /// At least one payload is waiting in the RX FIFO.
    pub const fn rx_fifo_occupied(&self) -> bool {
        self.rx_pipe() != Self::RX_FIFO_EMPTY
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "STATUS {:#04x} [", self.into_bits())?;
        for (set, name) in [
            (self.rx_dr(), " RX_DR"),
            (self.tx_ds(), " TX_DS"),
            (self.tx_df(), " MAX_RT"),
        ] {
            if set {
                f.write_str(name)?;
            }
        }
        f.write_str(" ]")
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "STATUS {=u8:#x} rx_dr={=bool} tx_ds={=bool} max_rt={=bool}",
            self.into_bits(),
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}
