//! Bus line abstractions
//!
//! Provides the capability trait through which the bus master drives the
//! clock (SCL) and data (SDA) lines. Implementations wrap whatever the board
//! offers: open-drain GPIOs, register pokes, or a test simulator.

use core::ops::Not;

/// Logic level of a bus line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinState {
    /// Line pulled low (logic 0)
    Low,
    /// Line released / driven high (logic 1)
    High,
}

impl PinState {
    /// Check if the state is high
    pub const fn is_high(self) -> bool {
        matches!(self, PinState::High)
    }

    /// Check if the state is low
    pub const fn is_low(self) -> bool {
        matches!(self, PinState::Low)
    }

    /// State carrying the most significant bit of `byte`
    pub const fn from_msb(byte: u8) -> Self {
        if byte & 0x80 != 0 {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl From<bool> for PinState {
    fn from(high: bool) -> Self {
        if high {
            PinState::High
        } else {
            PinState::Low
        }
    }
}

impl From<PinState> for bool {
    fn from(state: PinState) -> Self {
        state.is_high()
    }
}

impl Not for PinState {
    type Output = PinState;

    fn not(self) -> Self::Output {
        match self {
            PinState::Low => PinState::High,
            PinState::High => PinState::Low,
        }
    }
}

/// Two-wire bus line capabilities
///
/// Everything the bus master needs from the platform: drive SCL, drive SDA,
/// sample SDA, and busy-wait. Setting a line [`PinState::High`] must release
/// it (open-drain) so a slave can still pull it low.
pub trait BusLines {
    /// Error reported by the pin primitives
    type Error;

    /// Drive the clock line
    fn set_scl(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Drive (or release) the data line
    fn set_sda(&mut self, state: PinState) -> Result<(), Self::Error>;

    /// Sample the data line
    fn sda(&mut self) -> Result<PinState, Self::Error>;

    /// Block for `us` microseconds
    fn delay_us(&mut self, us: u32);
}

impl<T: BusLines + ?Sized> BusLines for &mut T {
    type Error = T::Error;

    fn set_scl(&mut self, state: PinState) -> Result<(), Self::Error> {
        T::set_scl(self, state)
    }

    fn set_sda(&mut self, state: PinState) -> Result<(), Self::Error> {
        T::set_sda(self, state)
    }

    fn sda(&mut self) -> Result<PinState, Self::Error> {
        T::sda(self)
    }

    fn delay_us(&mut self, us: u32) {
        T::delay_us(self, us)
    }
}
