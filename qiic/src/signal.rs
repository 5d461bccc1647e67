//! Bus conditions and byte shifting
//!
//! Every step below is a line write or a one-tick delay, issued in a fixed
//! order. The line timing is the protocol, so nothing here may be reordered.

use qiic_hal::{BusLines, PinState};

use crate::error::Error;
use crate::master::BitBangMaster;

/// Outcome of the acknowledge clock after a byte was sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ack {
    /// Slave pulled SDA low
    Ack,
    /// SDA stayed high
    Nak,
}

impl<L: BusLines> BitBangMaster<L> {
    fn scl(&mut self, state: PinState) -> Result<(), Error<L::Error>> {
        self.lines.set_scl(state).map_err(Error::Line)
    }

    fn sda(&mut self, state: PinState) -> Result<(), Error<L::Error>> {
        self.lines.set_sda(state).map_err(Error::Line)
    }

    fn sample(&mut self) -> Result<PinState, Error<L::Error>> {
        self.lines.sda().map_err(Error::Line)
    }

    fn wait(&mut self) {
        self.lines.delay_us(self.tick);
    }

    /// START: SDA falls while SCL is high
    pub(crate) fn start(&mut self) -> Result<(), Error<L::Error>> {
        self.scl(PinState::High)?;
        self.sda(PinState::High)?;
        self.wait();
        self.sda(PinState::Low)?;
        self.wait();
        self.scl(PinState::Low)?;
        self.wait();
        Ok(())
    }

    /// STOP: SDA rises while SCL is high, leaving both lines idle
    pub(crate) fn stop(&mut self) -> Result<(), Error<L::Error>> {
        self.sda(PinState::Low)?;
        self.scl(PinState::Low)?;
        self.wait();
        self.scl(PinState::High)?;
        self.wait();
        self.sda(PinState::High)?;
        self.wait();
        Ok(())
    }

    /// Acknowledge a received byte
    pub(crate) fn ack(&mut self) -> Result<(), Error<L::Error>> {
        self.scl(PinState::Low)?;
        self.sda(PinState::Low)?;
        self.wait();
        self.scl(PinState::High)?;
        self.wait();
        self.scl(PinState::Low)
    }

    /// Decline a received byte, telling the slave it was the last one
    pub(crate) fn nak(&mut self) -> Result<(), Error<L::Error>> {
        self.scl(PinState::Low)?;
        self.sda(PinState::High)?;
        self.wait();
        self.scl(PinState::High)?;
        self.wait();
        self.scl(PinState::Low)
    }

    /// Release SDA and clock in the slave's acknowledge bit
    pub(crate) fn wait_ack(&mut self) -> Result<Ack, Error<L::Error>> {
        self.sda(PinState::High)?;
        self.wait();
        self.scl(PinState::High)?;
        self.wait();
        let ack = match self.sample()? {
            PinState::Low => Ack::Ack,
            PinState::High => Ack::Nak,
        };
        self.scl(PinState::Low)?;
        Ok(ack)
    }

    /// Shift out one byte, MSB first. Does not clock the acknowledge bit.
    pub(crate) fn send_byte(&mut self, byte: u8) -> Result<(), Error<L::Error>> {
        self.scl(PinState::Low)?;
        let mut bits = byte;
        for _ in 0..8 {
            self.sda(PinState::from_msb(bits))?;
            self.wait();
            self.scl(PinState::High)?;
            self.wait();
            self.scl(PinState::Low)?;
            self.wait();
            bits <<= 1;
        }
        Ok(())
    }

    /// Shift in one byte, MSB first. Does not clock the acknowledge bit.
    pub(crate) fn recv_byte(&mut self) -> Result<u8, Error<L::Error>> {
        // SDA may still be held low by our own ACK; let the slave drive it
        self.scl(PinState::Low)?;
        self.sda(PinState::High)?;
        let mut byte = 0u8;
        for _ in 0..8 {
            self.scl(PinState::Low)?;
            self.wait();
            self.scl(PinState::High)?;
            byte <<= 1;
            if self.sample()?.is_high() {
                byte |= 0x01;
            }
            self.wait();
        }
        Ok(byte)
    }
}
