//! Bit-banged I2C bus master
//!
//! This crate drives a two-wire I2C bus in software when no hardware
//! controller is available. It owns no hardware: the clock and data lines
//! and the microsecond delay come from a [`BusLines`] implementation, either
//! board-specific glue or [`PinLines`] over embedded-hal pins.
//!
//! - Framing and handshakes (START, STOP, ACK, NAK, wait for ACK)
//! - Byte shifting, most significant bit first
//! - Stream transfers ([`BitBangMaster::send`], [`BitBangMaster::recv`])
//! - Register transfers ([`BitBangMaster::mem_write`], [`BitBangMaster::mem_read`])
//! - [`embedded_hal::i2c::I2c`] for use with existing device drivers
//!
//! Every transaction blocks until it completes or the first handshake
//! fails. A failed handshake always puts a STOP on the bus before the error
//! is returned, so the bus is idle and the master reusable.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod error;
mod hal_i2c;
pub mod master;
pub mod pins;
mod signal;

#[cfg(test)]
mod sim;

pub use error::{AckPhase, Error};
pub use master::BitBangMaster;
pub use pins::{LineError, PinLines};
pub use qiic_hal::{BusConfig, BusLines, I2cBus, PinState, RestartMode};
