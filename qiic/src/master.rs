//! Bus master engine
//!
//! [`BitBangMaster`] composes the bus conditions and byte shifts into the
//! four transactions. It is the only stateful object in the crate, and its
//! state never changes after construction: transactions borrow it mutably
//! only to drive the lines.
//!
//! # Transactions
//!
//! ```text
//! send       S | ADDR+W A | DATA A | ... | P
//! recv       S | ADDR+R A | DATA ack | ... | DATA nak | P
//! mem_write  S | ADDR+W A | REG A | DATA A | ... | P
//! mem_read   S | ADDR+W A | REG A | [P] S | ADDR+R A | DATA ack | ... | DATA nak | P
//! ```
//!
//! Whether `mem_read` puts a STOP between its two phases is set by
//! [`RestartMode`].

use qiic_hal::{BusConfig, BusLines, I2cBus, PinState, RestartMode};

use crate::error::{AckPhase, Error};
use crate::signal::Ack;

/// Address byte for a write: direction bit cleared
pub(crate) const fn write_address(address: u8) -> u8 {
    address & 0xFE
}

/// Address byte for a read: direction bit set
pub(crate) const fn read_address(address: u8) -> u8 {
    address | 0x01
}

/// Bit-banged I2C bus master
///
/// Owns a set of [`BusLines`] and the quarter-period tick derived from the
/// clock frequency. Pass `&mut lines` instead of `lines` to keep ownership
/// on the caller's side.
pub struct BitBangMaster<L: BusLines> {
    pub(crate) lines: L,
    pub(crate) tick: u32,
    config: BusConfig,
}

impl<L: BusLines> BitBangMaster<L> {
    /// Create a master clocking the bus at `frequency` Hz
    ///
    /// See [`BitBangMaster::from_config`].
    pub fn new(lines: L, frequency: u32) -> Result<Self, (Error<L::Error>, L)> {
        Self::from_config(lines, BusConfig::with_frequency(frequency))
    }

    /// Create a master from a bus configuration
    ///
    /// Derives the tick and drives both lines high (bus idle). On failure
    /// the lines are handed back together with the error; an unusable
    /// frequency is rejected with [`Error::InvalidArgument`] before any
    /// line is touched.
    pub fn from_config(
        mut lines: L,
        config: BusConfig,
    ) -> Result<Self, (Error<L::Error>, L)> {
        let tick = match config.tick_us() {
            Ok(tick) => tick,
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Rejected bus frequency {=u32} Hz: {}", config.frequency, _e);
                return Err((Error::InvalidArgument, lines));
            }
        };

        if let Err(e) = lines
            .set_scl(PinState::High)
            .and_then(|()| lines.set_sda(PinState::High))
        {
            return Err((Error::Line(e), lines));
        }

        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Bit-banged I2C at {=u32} Hz (tick {=u32} us)",
            config.frequency,
            tick
        );

        Ok(Self {
            lines,
            tick,
            config,
        })
    }

    /// Quarter-period delay in microseconds
    pub fn tick_us(&self) -> u32 {
        self.tick
    }

    /// Get the configuration
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Borrow the bus lines
    pub fn lines(&self) -> &L {
        &self.lines
    }

    /// Mutably borrow the bus lines
    ///
    /// Anything done to the lines between transactions must leave the bus
    /// idle (both lines high).
    pub fn lines_mut(&mut self) -> &mut L {
        &mut self.lines
    }

    /// Give the bus lines back
    pub fn release(self) -> L {
        self.lines
    }

    /// Write a byte stream to the device at `address` (8-bit form)
    ///
    /// Returns the number of bytes sent, which is `data.len()`.
    pub fn send(&mut self, address: u8, data: &[u8]) -> Result<usize, Error<L::Error>> {
        if data.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.start()?;
        self.write_acked(write_address(address), AckPhase::Address)?;
        for &byte in data {
            self.write_acked(byte, AckPhase::Data)?;
        }
        self.stop()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Sent {=usize} bytes to {=u8:#x}", data.len(), address);

        Ok(data.len())
    }

    /// Read a byte stream from the device at `address` (8-bit form)
    ///
    /// Every byte but the last is acknowledged; the last is declined so the
    /// device stops driving the bus. Returns `buf.len()`.
    pub fn recv(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Error<L::Error>> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.start()?;
        self.write_acked(read_address(address), AckPhase::Address)?;
        self.read_bytes(buf, true)?;
        self.stop()?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Received {=usize} bytes from {=u8:#x}", buf.len(), address);

        Ok(buf.len())
    }

    /// Write `data` starting at `register` inside the device at `address`
    ///
    /// The failing handshake is reported as [`AckPhase::Address`],
    /// [`AckPhase::Register`] or [`AckPhase::Data`].
    pub fn mem_write(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<usize, Error<L::Error>> {
        if data.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.start()?;
        self.write_acked(write_address(address), AckPhase::Address)?;
        self.write_acked(register, AckPhase::Register)?;
        for &byte in data {
            self.write_acked(byte, AckPhase::Data)?;
        }
        self.stop()?;

        Ok(data.len())
    }

    /// Read into `buf` starting at `register` inside the device at `address`
    ///
    /// Selects the register with a write, then performs a complete
    /// [`recv`](Self::recv). Any failure of that read phase other than a
    /// line error is reported as [`Error::ShortRead`].
    pub fn mem_read(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Error<L::Error>> {
        if buf.is_empty() {
            return Err(Error::InvalidArgument);
        }

        self.start()?;
        self.write_acked(write_address(address), AckPhase::Address)?;
        self.write_acked(register, AckPhase::Register)?;
        if self.config.restart == RestartMode::StopThenStart {
            self.stop()?;
        }

        let expected = buf.len();
        match self.recv(read_address(address), buf) {
            Ok(count) if count == expected => Ok(count),
            Err(Error::Line(e)) => Err(Error::Line(e)),
            _ => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Register read from {=u8:#x} came back short", address);
                Err(Error::ShortRead)
            }
        }
    }

    /// Check whether a device answers at `address` (8-bit form)
    ///
    /// Sends the write address alone and reports the acknowledge bit.
    pub fn probe(&mut self, address: u8) -> Result<bool, Error<L::Error>> {
        self.start()?;
        self.send_byte(write_address(address))?;
        let ack = self.wait_ack()?;
        self.stop()?;
        Ok(ack == Ack::Ack)
    }

    /// Send one byte and require an acknowledge
    ///
    /// A refusal puts STOP on the bus and fails with `phase`.
    pub(crate) fn write_acked(
        &mut self,
        byte: u8,
        phase: AckPhase,
    ) -> Result<(), Error<L::Error>> {
        self.send_byte(byte)?;
        match self.wait_ack()? {
            Ack::Ack => Ok(()),
            Ack::Nak => {
                self.stop()?;
                #[cfg(feature = "defmt")]
                defmt::debug!("No ack for {=u8:#x} ({})", byte, phase);
                Err(Error::NoAck(phase))
            }
        }
    }

    /// Receive `buf.len()` bytes, acknowledging each one
    ///
    /// With `nak_last` the final byte is declined instead.
    pub(crate) fn read_bytes(
        &mut self,
        buf: &mut [u8],
        nak_last: bool,
    ) -> Result<(), Error<L::Error>> {
        let len = buf.len();
        for (index, slot) in buf.iter_mut().enumerate() {
            *slot = self.recv_byte()?;
            if nak_last && index + 1 == len {
                self.nak()?;
            } else {
                self.ack()?;
            }
        }
        Ok(())
    }
}

impl<L: BusLines> I2cBus for BitBangMaster<L> {
    type Error = Error<L::Error>;

    fn send(&mut self, address: u8, data: &[u8]) -> Result<usize, Self::Error> {
        BitBangMaster::send(self, address, data)
    }

    fn recv(&mut self, address: u8, buf: &mut [u8]) -> Result<usize, Self::Error> {
        BitBangMaster::recv(self, address, buf)
    }

    fn mem_write(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<usize, Self::Error> {
        BitBangMaster::mem_write(self, address, register, data)
    }

    fn mem_read(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        BitBangMaster::mem_read(self, address, register, buf)
    }
}
