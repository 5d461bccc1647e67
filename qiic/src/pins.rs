//! Bus lines over embedded-hal pins
//!
//! [`PinLines`] adapts an SCL output, an open-drain SDA pin that can also be
//! read back, and a [`DelayNs`] provider into [`BusLines`]. SDA must be
//! configured open-drain with a pull-up so that driving it high releases
//! the line to the slave.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, InputPin, OutputPin};
use qiic_hal::{BusLines, PinState};

/// Pin error, tagged with the line that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError<C, D> {
    /// Clock pin failed
    Scl(C),
    /// Data pin failed
    Sda(D),
}

/// Bus lines backed by embedded-hal GPIOs and a delay
pub struct PinLines<SCL, SDA, D> {
    scl: SCL,
    sda: SDA,
    delay: D,
}

impl<SCL, SDA, D> PinLines<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: OutputPin + InputPin,
    D: DelayNs,
{
    /// Wrap the pins and delay
    pub fn new(scl: SCL, sda: SDA, delay: D) -> Self {
        Self { scl, sda, delay }
    }

    /// Give the pins and delay back
    pub fn release(self) -> (SCL, SDA, D) {
        (self.scl, self.sda, self.delay)
    }
}

fn level(state: PinState) -> digital::PinState {
    match state {
        PinState::Low => digital::PinState::Low,
        PinState::High => digital::PinState::High,
    }
}

impl<SCL, SDA, D> BusLines for PinLines<SCL, SDA, D>
where
    SCL: OutputPin,
    SDA: OutputPin + InputPin,
    D: DelayNs,
{
    type Error = LineError<SCL::Error, SDA::Error>;

    fn set_scl(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.scl.set_state(level(state)).map_err(LineError::Scl)
    }

    fn set_sda(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.sda.set_state(level(state)).map_err(LineError::Sda)
    }

    fn sda(&mut self) -> Result<PinState, Self::Error> {
        self.sda
            .is_high()
            .map(PinState::from)
            .map_err(LineError::Sda)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
