//! A module to encapsulate all things related to radio operation.
pub mod prelude;

mod nrf24;
pub use nrf24::{
    commands, mnemonics, registers, timing, ChipSelectGuard, Nrf24, Nrf24Error,
    RegisterInterface, MAX_PAYLOAD,
};

mod config;
pub use config::RadioConfig;
