//! embedded-hal I2C support
//!
//! Lets [`BitBangMaster`] stand in for a hardware controller under any
//! driver written against [`embedded_hal::i2c::I2c`]. Addresses here are
//! plain 7-bit values, as embedded-hal defines them.
//!
//! A transaction starts with START plus address, repeats START plus address
//! whenever the direction changes, and ends with STOP. Within a run of
//! reads every byte is acknowledged except the last one of the run. Empty
//! read buffers are skipped without touching the bus: an addressed slave
//! would otherwise be left driving its first data bit.

use core::fmt::Debug;

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
use qiic_hal::BusLines;

use crate::error::{AckPhase, Error};
use crate::master::{read_address, write_address, BitBangMaster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Write,
    Read,
}

impl<L> ErrorType for BitBangMaster<L>
where
    L: BusLines,
    L::Error: Debug,
{
    type Error = Error<L::Error>;
}

impl<L> I2c<SevenBitAddress> for BitBangMaster<L>
where
    L: BusLines,
    L::Error: Debug,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address > 0x7F {
            return Err(Error::InvalidArgument);
        }
        let address = address << 1;
        let mut current = None;

        for index in 0..operations.len() {
            // Bytes still to come in this read run decide whether our last byte gets NAK
            let run_continues = operations[index + 1..]
                .iter()
                .take_while(|op| matches!(op, Operation::Read(_)))
                .any(|op| matches!(op, Operation::Read(buf) if !buf.is_empty()));

            match &mut operations[index] {
                Operation::Write(bytes) => {
                    if current != Some(Direction::Write) {
                        self.start()?;
                        self.write_acked(write_address(address), AckPhase::Address)?;
                        current = Some(Direction::Write);
                    }
                    for &byte in bytes.iter() {
                        self.write_acked(byte, AckPhase::Data)?;
                    }
                }
                Operation::Read(buf) => {
                    if buf.is_empty() {
                        continue;
                    }
                    if current != Some(Direction::Read) {
                        self.start()?;
                        self.write_acked(read_address(address), AckPhase::Address)?;
                        current = Some(Direction::Read);
                    }
                    self.read_bytes(buf, !run_continues)?;
                }
            }
        }

        if current.is_some() {
            self.stop()?;
        }
        Ok(())
    }
}
