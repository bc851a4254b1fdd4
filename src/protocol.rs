//! The one-byte command link between the remote and the base node.
//!
//! Each decoded detent of the remote's encoder becomes exactly one packet
//! of [`COMMAND_WIDTH`] byte. Delivery is fire-and-forget: the radio's own
//! auto-ack and retransmits are the only reliability layer.
use core::fmt::{Display, Formatter, Result as FmtResult};

use crate::encoder::EdgeEvent;
use crate::radio::{
    prelude::{EsbFifo, EsbPipe, EsbPower, EsbRadio},
    MAX_PAYLOAD,
};

/// Station address of the remote (encoder) node.
pub const REMOTE_ADDRESS: [u8; 5] = *b"RNode";
/// Station address of the base (listening) node.
pub const BASE_ADDRESS: [u8; 5] = *b"BNode";
/// The pipe each node receives commands on.
pub const COMMAND_PIPE: u8 = 1;
/// Commands are static 1-byte payloads.
pub const COMMAND_WIDTH: u8 = 1;
/// Only transitions across this ring edge produce a command (once per detent).
pub const DETENT_EDGE: u8 = 0;

/// An application level command carried in a single byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// `'+'`
    VolumeUp,
    /// `'-'`
    VolumeDown,
    /// `'?'`: a resync/diagnostic request.
    Query,
    /// Any other byte, forwarded untouched for display.
    Raw(u8),
}

impl Command {
    /// Map an encoder delta to a command.
    ///
    /// Anything but a unit step is treated as lost sync and sent as [`Command::Query`].
    pub const fn from_delta(delta: i8) -> Self {
        match delta {
            1 => Command::VolumeUp,
            -1 => Command::VolumeDown,
            _ => Command::Query,
        }
    }

    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            b'+' => Command::VolumeUp,
            b'-' => Command::VolumeDown,
            b'?' => Command::Query,
            other => Command::Raw(other),
        }
    }

    pub const fn to_byte(self) -> u8 {
        match self {
            Command::VolumeUp => b'+',
            Command::VolumeDown => b'-',
            Command::Query => b'?',
            Command::Raw(byte) => byte,
        }
    }
}

impl From<u8> for Command {
    fn from(byte: u8) -> Self {
        Command::from_byte(byte)
    }
}

impl From<Command> for u8 {
    fn from(command: Command) -> Self {
        command.to_byte()
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Command::VolumeUp => write!(f, "volume up"),
            Command::VolumeDown => write!(f, "volume down"),
            Command::Query => write!(f, "query"),
            Command::Raw(byte) => write!(f, "raw {byte:#04x}"),
        }
    }
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for Command {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Command::VolumeUp => defmt::write!(f, "volume up"),
            Command::VolumeDown => defmt::write!(f, "volume down"),
            Command::Query => defmt::write!(f, "query"),
            Command::Raw(byte) => defmt::write!(f, "raw {=u8:#x}", byte),
        }
    }
}

/// Which end of the link a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Remote,
    Base,
}

#[cfg(feature = "defmt")]
#[cfg(target_os = "none")]
impl defmt::Format for Role {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Role::Remote => defmt::write!(f, "Remote"),
            Role::Base => defmt::write!(f, "Base"),
        }
    }
}

impl Role {
    /// The address this node receives on.
    pub const fn own_address(self) -> [u8; 5] {
        match self {
            Role::Remote => REMOTE_ADDRESS,
            Role::Base => BASE_ADDRESS,
        }
    }

    /// The address this node transmits to.
    pub const fn peer_address(self) -> [u8; 5] {
        match self {
            Role::Remote => BASE_ADDRESS,
            Role::Base => REMOTE_ADDRESS,
        }
    }
}

/// Owns the transceiver and speaks the command protocol over it.
///
/// The radio is injected here (and from here into
/// [`SleepCycleController`](struct@crate::remote::SleepCycleController)),
/// so the decoder's consumer never needs a global handle to it.
pub struct CommandLink<R> {
    radio: R,
}

impl<R> CommandLink<R>
where
    R: EsbRadio
        + EsbFifo<FifoErrorType = <R as EsbRadio>::RadioErrorType>
        + EsbPower<PowerErrorType = <R as EsbRadio>::RadioErrorType>
        + EsbPipe<PipeErrorType = <R as EsbRadio>::RadioErrorType>,
{
    /// Wrap an initialized radio.
    pub fn new(radio: R) -> Self {
        Self { radio }
    }

    /// Direct access to the radio, e.g. to start listening on the base node.
    pub fn radio(&mut self) -> &mut R {
        &mut self.radio
    }

    pub fn release(self) -> R {
        self.radio
    }

    /// Point the transmit address at the peer and open [`COMMAND_PIPE`] on
    /// this node's own address.
    pub fn configure(&mut self, role: Role) -> Result<(), R::RadioErrorType> {
        self.radio
            .set_transmit_address(&role.peer_address(), COMMAND_WIDTH)?;
        self.radio
            .configure_receive_pipe(COMMAND_PIPE, &role.own_address(), COMMAND_WIDTH)
    }

    /// Translate a decoded encoder edge into a transmitted command.
    ///
    /// Edges other than [`DETENT_EDGE`] are dropped. Returns the command
    /// that was sent, if any.
    pub fn handle_edge(&mut self, event: EdgeEvent) -> Result<Option<Command>, R::RadioErrorType> {
        if event.edge_id != DETENT_EDGE {
            return Ok(None);
        }
        let command = Command::from_delta(event.delta);
        self.send_command(command)?;
        Ok(Some(command))
    }

    /// Stop listening, send the command byte, and resume listening.
    ///
    /// The node cannot receive for the duration of the transmission.
    pub fn send_command(&mut self, command: Command) -> Result<(), R::RadioErrorType> {
        self.radio.stop_listening()?;
        self.radio.send(&[command.to_byte()])?;
        self.radio.start_listening()
    }

    /// Fetch the next received command, if one is waiting.
    pub fn poll(&mut self) -> Result<Option<Command>, R::RadioErrorType> {
        if !self.radio.available()? {
            return Ok(None);
        }
        let mut buf = [0u8; MAX_PAYLOAD];
        let (len, _pipe) = self.radio.receive(&mut buf)?;
        if len == 0 {
            return Ok(None);
        }
        let command = Command::from_byte(buf[0]);
        #[cfg(feature = "defmt")]
        #[cfg(target_os = "none")]
        if let Command::Raw(byte) = command {
            defmt::debug!("forwarding raw byte {=u8:#x} from pipe {=u8}", byte, _pipe);
        }
        Ok(Some(command))
    }
}
