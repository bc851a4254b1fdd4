#![doc = include_str!("../README.md")]
//!
//! ## Radio driver
//!
//! - [`Nrf24::new()`](fn@crate::radio::Nrf24::new)
//! - [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init)
//! - [`EsbInit::with_config()`](fn@crate::radio::prelude::EsbInit::with_config)
//! - [`EsbPower::power_up()`](fn@crate::radio::prelude::EsbPower::power_up)
//! - [`EsbPower::power_down()`](fn@crate::radio::prelude::EsbPower::power_down)
//! - [`EsbPipe::set_transmit_address()`](fn@crate::radio::prelude::EsbPipe::set_transmit_address)
//! - [`EsbPipe::configure_receive_pipe()`](fn@crate::radio::prelude::EsbPipe::configure_receive_pipe)
//! - [`EsbChannel::set_frequency()`](fn@crate::radio::prelude::EsbChannel::set_frequency)
//! - [`EsbRadio::send()`](fn@crate::radio::prelude::EsbRadio::send)
//! - [`EsbRadio::start_listening()`](fn@crate::radio::prelude::EsbRadio::start_listening)
//! - [`EsbRadio::stop_listening()`](fn@crate::radio::prelude::EsbRadio::stop_listening)
//! - [`EsbFifo::available()`](fn@crate::radio::prelude::EsbFifo::available)
//! - [`EsbRadio::receive()`](fn@crate::radio::prelude::EsbRadio::receive)
//! - [`Nrf24::broadcast_carrier()`](fn@crate::radio::Nrf24::broadcast_carrier)
//!
//! ## Application layer
//!
//! - [`EncoderDecoder::update()`](fn@crate::encoder::EncoderDecoder::update)
//! - [`CommandLink::handle_edge()`](fn@crate::protocol::CommandLink::handle_edge)
//! - [`CommandLink::poll()`](fn@crate::protocol::CommandLink::poll)
//! - [`SleepCycleController::step()`](fn@crate::remote::SleepCycleController::step)
//! - [`WakeCountdown::arm()`](fn@crate::remote::WakeCountdown::arm)
#![no_std]

mod types;
pub use types::{CrcLength, DataRate, PaLevel, RadioState, StatusFlags};
pub mod encoder;
pub mod protocol;
pub mod radio;
pub mod remote;
