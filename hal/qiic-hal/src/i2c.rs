//! I2C bus abstractions
//!
//! Provides the bus master trait and bus configuration shared by the
//! bit-banged engine and the code that talks to devices through it.
//!
//! Addresses passed to [`I2cBus`] are in 8-bit form: the 7-bit device
//! address shifted left by one. Bit 0 is the direction bit and is
//! overwritten by the bus master (cleared for writes, set for reads).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Microseconds in one second
const US_PER_SECOND: u32 = 1_000_000;

/// Delay ticks per SCL period (two for data setup, two for clock high/low)
pub const TICKS_PER_PERIOD: u32 = 4;

/// Highest frequency that still yields a non-zero tick
pub const MAX_FREQUENCY: u32 = US_PER_SECOND / TICKS_PER_PERIOD;

/// I2C bus master
///
/// Provides stream and register-addressed transfers. Every method returns
/// the number of bytes moved on success, which always equals the buffer
/// length.
pub trait I2cBus {
    /// Error type for I2C operations
    type Error;

    /// Write a byte stream to a device
    ///
    /// # Arguments
    /// * `address` - Device address in 8-bit form
    /// * `data` - Bytes to write (must not be empty)
    fn send(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read a byte stream from a device
    ///
    /// # Arguments
    /// * `address` - Device address in 8-bit form
    /// * `buf` - Buffer to read into (must not be empty)
    fn recv(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write to a register (or memory offset) inside a device
    ///
    /// # Arguments
    /// * `address` - Device address in 8-bit form
    /// * `register` - Register/offset byte sent before the data
    /// * `data` - Bytes to write (must not be empty)
    fn mem_write(&mut self, address: u8, register: u8, data: &[u8]) -> Result<usize, Self::Error>;

    /// Read from a register (or memory offset) inside a device
    ///
    /// # Arguments
    /// * `address` - Device address in 8-bit form
    /// * `register` - Register/offset byte selected before reading
    /// * `buf` - Buffer to read into (must not be empty)
    fn mem_read(&mut self, address: u8, register: u8, buf: &mut [u8])
        -> Result<usize, Self::Error>;
}

/// How a register read joins its offset-write phase to its read phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RestartMode {
    /// Close the offset write with STOP, then start the read afresh
    #[default]
    StopThenStart,
    /// Go straight from the offset write into a repeated START
    RepeatedStart,
}

/// Bus configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Clock frequency of zero
    ZeroFrequency,
    /// Clock frequency so high that the tick truncates to zero
    FrequencyTooHigh,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::ZeroFrequency => f.write_str("clock frequency is zero"),
            ConfigError::FrequencyTooHigh => {
                write!(f, "clock frequency exceeds {} Hz", MAX_FREQUENCY)
            }
        }
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BusConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Seam between the two phases of a register read
    #[cfg_attr(feature = "serde", serde(default))]
    pub restart: RestartMode,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl BusConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self::with_frequency(100_000);

    /// Slow mode (10 kHz), for long wires and weak pull-ups
    pub const SLOW: Self = Self::with_frequency(10_000);

    /// Fast mode (400 kHz)
    ///
    /// Listed for completeness; a microsecond tick cannot express it, so
    /// [`BusConfig::tick_us`] rejects it.
    pub const FAST: Self = Self::with_frequency(400_000);

    /// Configuration at the given frequency with the default restart mode
    pub const fn with_frequency(frequency: u32) -> Self {
        Self {
            frequency,
            restart: RestartMode::StopThenStart,
        }
    }

    /// Builder-style restart mode override
    pub const fn restart(mut self, restart: RestartMode) -> Self {
        self.restart = restart;
        self
    }

    /// Quarter-period delay in microseconds
    ///
    /// `(1_000_000 / frequency) / 4`, truncated. Fails when the frequency is
    /// zero or the result would be zero.
    pub const fn tick_us(&self) -> Result<u32, ConfigError> {
        if self.frequency == 0 {
            return Err(ConfigError::ZeroFrequency);
        }
        let tick = (US_PER_SECOND / self.frequency) / TICKS_PER_PERIOD;
        if tick == 0 {
            return Err(ConfigError::FrequencyTooHigh);
        }
        Ok(tick)
    }
}
