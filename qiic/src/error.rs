//! Bus master errors

use core::fmt;

/// Handshake that the addressed device refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AckPhase {
    /// Device address byte
    Address,
    /// Register/offset byte of a register transfer
    Register,
    /// A data byte
    Data,
}

/// Errors from bus master operations
///
/// `E` is the error type of the underlying [`BusLines`](qiic_hal::BusLines).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Malformed call: empty buffer, unusable clock frequency, address out of range
    InvalidArgument,
    /// The device did not acknowledge
    NoAck(AckPhase),
    /// The read phase of a register read did not deliver the requested bytes
    ShortRead,
    /// A line primitive failed; the transaction was abandoned mid-way
    Line(E),
}

impl<E> Error<E> {
    /// Negative status code for this failure
    ///
    /// `-1` for argument and address failures, `-2` for the register phase,
    /// `-3` for the data phase and short reads. Line failures map to `-4`.
    pub fn code(&self) -> i32 {
        match self {
            Error::InvalidArgument | Error::NoAck(AckPhase::Address) => -1,
            Error::NoAck(AckPhase::Register) => -2,
            Error::NoAck(AckPhase::Data) | Error::ShortRead => -3,
            Error::Line(_) => -4,
        }
    }

    /// Check if the device refused a handshake
    pub fn is_no_ack(&self) -> bool {
        matches!(self, Error::NoAck(_))
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::NoAck(AckPhase::Address) => f.write_str("address not acknowledged"),
            Error::NoAck(AckPhase::Register) => f.write_str("register not acknowledged"),
            Error::NoAck(AckPhase::Data) => f.write_str("data not acknowledged"),
            Error::ShortRead => f.write_str("register read returned short"),
            Error::Line(e) => write!(f, "line error: {:?}", e),
        }
    }
}

impl<E: fmt::Debug> embedded_hal::i2c::Error for Error<E> {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

        match self {
            Error::NoAck(AckPhase::Address) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            Error::NoAck(AckPhase::Register | AckPhase::Data) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data)
            }
            Error::InvalidArgument | Error::ShortRead | Error::Line(_) => ErrorKind::Other,
        }
    }
}
