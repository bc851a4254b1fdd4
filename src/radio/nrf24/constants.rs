/// Register addresses of the nRF24L01.
pub mod registers {
    pub const CONFIG: u8 = 0x00;
    pub const EN_AA: u8 = 0x01;
    pub const EN_RXADDR: u8 = 0x02;
    pub const SETUP_AW: u8 = 0x03;
    pub const SETUP_RETR: u8 = 0x04;
    pub const RF_CH: u8 = 0x05;
    pub const RF_SETUP: u8 = 0x06;
    pub const STATUS: u8 = 0x07;
    pub const OBSERVE_TX: u8 = 0x08;
    pub const RPD: u8 = 0x09;
    pub const RX_ADDR_P0: u8 = 0x0A;
    pub const RX_ADDR_P1: u8 = 0x0B;
    pub const TX_ADDR: u8 = 0x10;
    pub const RX_PW_P0: u8 = 0x11;
    pub const FIFO_STATUS: u8 = 0x17;
    pub const DYNPD: u8 = 0x1C;
    pub const FEATURE: u8 = 0x1D;

    /// Register addresses are 5 bits wide inside an SPI opcode.
    pub const ADDRESS_MASK: u8 = 0x1F;
}

/// SPI commands of the nRF24L01.
pub mod commands {
    pub const W_REGISTER: u8 = 0x20;
    pub const R_RX_PL_WID: u8 = 0x60;
    pub const R_RX_PAYLOAD: u8 = 0x61;
    pub const W_TX_PAYLOAD: u8 = 0xA0;
    pub const W_ACK_PAYLOAD: u8 = 0xA8;
    pub const FLUSH_TX: u8 = 0xE1;
    pub const FLUSH_RX: u8 = 0xE2;
    pub const REUSE_TX_PL: u8 = 0xE3;
}

/// Bit mnemonics
pub mod mnemonics {
    pub const MASK_RX_DR: u8 = 1 << 6;
    pub const MASK_TX_DS: u8 = 1 << 5;
    pub const MASK_MAX_RT: u8 = 1 << 4;
    /// `RF_SETUP`: force PLL lock (carrier wave testing).
    pub const PLL_LOCK: u8 = 4;
    /// `SETUP_AW` value for 5 byte addresses.
    pub const ADDRESS_WIDTH_5: u8 = 3;
}

/// Timing constraints, in microseconds.
pub mod timing {
    /// Power down to standby (Tpd2stby with an external clock margin).
    pub const POWER_UP_US: u32 = 1500;
    /// Standby to RX/TX settling (Tstby2a).
    pub const SETTLE_US: u32 = 130;
    /// Minimum CE high pulse to start one transmission (Thce).
    pub const CE_PULSE_US: u32 = 10;
    /// Interval between STATUS polls while waiting on a transmission.
    pub const POLL_INTERVAL_US: u32 = 50;
    /// One attempt on air at 250 kbps: a 32 byte payload with a 5 byte
    /// address, 2 byte CRC, preamble and control field, plus the ACK wait.
    pub const MAX_AIR_TIME_US: u32 = 1320;
    /// Settling time after power-on reset before the first SPI access.
    pub const POWER_ON_RESET_NS: u32 = 5_000_000;
}
