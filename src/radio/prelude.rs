//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use volume_link::radio::prelude::*;
//! ```

use crate::types::StatusFlags;

use super::RadioConfig;

/// A trait to represent manipulation of data pipes
/// for an ESB capable transceiver.
pub trait EsbPipe {
    type PipeErrorType;

    /// Set the address of the node to transmit to.
    ///
    /// The same address is written to the RX address of pipe 0, so the automatic
    /// acknowledgement addressed back to this node is received. `payload_width`
    /// (clamped to [1, 32]) is the static payload length used by both the
    /// outgoing payloads and pipe 0.
    fn set_transmit_address(
        &mut self,
        address: &[u8],
        payload_width: u8,
    ) -> Result<(), Self::PipeErrorType>;

    /// Open a specified `pipe` for receiving data when radio is in RX mode.
    ///
    /// If the specified `pipe` is not in range [0, 5], then this function does nothing.
    ///
    /// Pipes 0 and 1 store a full 5-byte address. Pipes 2-5 only store the
    /// first byte of `address`, borrowing the other 4 bytes from pipe 1.
    ///
    /// <div class="warning">
    ///
    /// If pipe 0 is opened for receiving by this function, the `address`
    /// is restored at every call to [`EsbRadio::start_listening()`] because
    /// [`EsbPipe::set_transmit_address()`] overwrites it.
    ///
    /// </div>
    fn configure_receive_pipe(
        &mut self,
        pipe: u8,
        address: &[u8],
        payload_width: u8,
    ) -> Result<(), Self::PipeErrorType>;

    /// Close a specified pipe from receiving data when radio is in RX mode.
    fn close_rx_pipe(&mut self, pipe: u8) -> Result<(), Self::PipeErrorType>;

    /// Read the transmit address into `address` (up to 5 bytes).
    fn get_transmit_address(&mut self, address: &mut [u8]) -> Result<(), Self::PipeErrorType>;

    /// Read the address of a RX `pipe` into `address`.
    ///
    /// Only 1 byte is read for pipes 2-5. Nothing is read if `pipe` is greater than 5.
    fn get_rx_address(&mut self, pipe: u8, address: &mut [u8]) -> Result<(), Self::PipeErrorType>;
}

/// A trait to represent manipulation of a channel (aka frequency)
/// for an ESB capable transceiver.
pub trait EsbChannel {
    type ChannelErrorType;

    /// Set the radio's currently selected channel.
    ///
    /// These channels translate to the RF frequency as an offset of Hz from 2400 MHz.
    /// The default channel is 76 (2400 + 76 = 2.476 GHz).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's currently selected channel.
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType>;

    /// Set the channel from either a channel number or a frequency in MHz.
    ///
    /// Values at or above 2400 are treated as MHz. The result is clamped to 125.
    fn set_frequency(&mut self, channel_or_mhz: u16) -> Result<(), Self::ChannelErrorType>;
}

/// A trait to represent manipulation of STATUS flags
/// for an ESB capable transceiver.
pub trait EsbStatus {
    type StatusErrorType;

    /// Get the [`StatusFlags`] state that was cached from the latest SPI transaction.
    fn get_status_flags(&self, flags: &mut StatusFlags);

    /// Clear the radio's IRQ status flags
    ///
    /// This needs to be done after the event has been handled.
    ///
    /// Set a flag to `true` to clear it. Default is all flags set to `true`.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;

    /// Refresh the cached STATUS byte from the radio.
    fn update(&mut self) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    ///
    /// This function is automatically called by [`EsbRadio::send()`].
    fn flush_tx(&mut self) -> Result<(), Self::FifoErrorType>;

    /// Is there a payload available in the radio's RX FIFO?
    ///
    /// True when the RX data ready flag is set, or when STATUS reports a pipe
    /// number for the top of the RX FIFO.
    fn available(&mut self) -> Result<bool, Self::FifoErrorType>;

    /// Same as [`EsbFifo::available()`], but also stores the pipe number
    /// the payload was received on into `pipe`.
    fn available_pipe(&mut self, pipe: &mut u8) -> Result<bool, Self::FifoErrorType>;
}

/// A trait to represent manipulation of the power state
/// for an ESB capable transceiver.
pub trait EsbPower {
    type PowerErrorType;

    /// Power down the radio and drop the CE pin.
    fn power_down(&mut self) -> Result<(), Self::PowerErrorType>;

    /// Power up the radio and block for `delay` microseconds (defaults to 1500).
    ///
    /// Does nothing if the radio is already powered up.
    fn power_up(&mut self, delay: Option<u32>) -> Result<(), Self::PowerErrorType>;

    /// Is the radio powered up?
    fn is_powered(&self) -> bool;
}

/// A trait to represent manipulation of an ESB capable transceiver.
///
/// Although the name is rather generic, this trait describes the
/// behavior of a radio's rudimentary roles (RX and TX).
pub trait EsbRadio {
    type RadioErrorType;

    /// Put the radio into active RX mode.
    ///
    /// Powers the radio up if needed, clears the status flags, flushes both
    /// FIFOs and raises CE. Blocks until the radio is monitoring the air.
    fn start_listening(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Leave RX mode.
    ///
    /// Clears the power and primary RX bits, the status flags and both FIFOs,
    /// then lowers CE. Pipe 0 is pointed back at the transmit address.
    fn stop_listening(&mut self) -> Result<(), Self::RadioErrorType>;

    /// Is the radio in RX mode?
    fn is_listening(&self) -> bool;

    /// Blocking transmission of `buf`.
    ///
    /// This waits for the hardware to report either a delivered payload or
    /// exhausted retransmits, bounded by the worst case retransmit time. The
    /// radio is then powered down and its TX FIFO flushed. Delivery is not
    /// reported back; use
    /// [`Nrf24::get_last_arc()`](fn@crate::radio::Nrf24::get_last_arc)
    /// before the next transmission for diagnostics.
    ///
    /// An empty `buf` is not transmitted. Payloads longer than 32 bytes are truncated
    /// and shorter ones are padded with zeros up to the transmit payload width.
    fn send(&mut self, buf: &[u8]) -> Result<(), Self::RadioErrorType>;

    /// Read the next payload from the RX FIFO into `buf`.
    ///
    /// Returns the number of bytes read and the pipe it was received on.
    /// Gate calls behind [`EsbFifo::available()`]; with nothing in the RX FIFO
    /// the result is whatever the hardware reports (usually a length of 0).
    fn receive(&mut self, buf: &mut [u8]) -> Result<(usize, u8), Self::RadioErrorType>;
}

/// A trait to represent initialization of an ESB capable transceiver.
pub trait EsbInit {
    type ConfigErrorType;

    /// Initialize the radio's hardware with [`RadioConfig::default()`].
    ///
    /// Blocks for the power-on settling time first. Fails with
    /// a binary corruption error if the radio does not echo back the CONFIG
    /// register, which usually means the radio is not connected.
    fn init(&mut self) -> Result<(), Self::ConfigErrorType>;

    /// Reconfigure the radio using the given `config` object.
    ///
    /// The radio is left powered down in TX mode with all RX pipes closed.
    fn with_config(&mut self, config: &RadioConfig) -> Result<(), Self::ConfigErrorType>;
}
