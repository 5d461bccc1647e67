//! qiic Hardware Abstraction Layer
//!
//! This crate defines the seams between the bit-banged bus master and the
//! platform it runs on. The master never touches hardware itself: it drives
//! the clock and data lines and waits through a [`gpio::BusLines`]
//! implementation supplied by the board code.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Device drivers / application code      │
//! └─────────────────────────────────────────┘
//!                     │  i2c::I2cBus
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  qiic (bit-banged bus master engine)    │
//! └─────────────────────────────────────────┘
//!                     │  gpio::BusLines
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │  board glue / │
//! │ pins + delay  │       │  callbacks    │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::BusLines`] - SCL/SDA drive, SDA sampling, microsecond delay
//! - [`i2c::I2cBus`] - Stream and register-addressed transfers

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod gpio;
pub mod i2c;

// Re-export key traits at crate root for convenience
pub use gpio::{BusLines, PinState};
pub use i2c::{BusConfig, I2cBus, RestartMode};
