//! Simulated bus for tests
//!
//! [`SimBus`] resolves SDA as a wired-AND of the master's output and a
//! register-file slave, records every capability call, and lets the slave
//! react to clock edges the way a real device would: it samples on the
//! rising edge and changes its output on the falling edge.

use heapless::Vec;
use qiic_hal::{BusLines, PinState};

/// Recorded capability call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// `set_scl`
    Scl(PinState),
    /// `set_sda`
    Sda(PinState),
    /// `sda`, with the level returned
    Sample(PinState),
    /// `delay_us`
    Delay(u32),
}

/// Injected line failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimFault;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlaveState {
    /// Not addressed; waiting for START
    Idle,
    /// Shifting in a byte from the master
    Receiving,
    /// Driving (or not) the acknowledge bit for a received byte
    AckSlot { ack: bool },
    /// Shifting out a byte to the master
    Transmitting,
    /// Waiting for the master's acknowledge bit
    MasterAckSlot,
    /// Master's acknowledge bit has been sampled
    MasterAckDone { ack: bool },
}

/// Register-file slave
///
/// The first byte written after the address sets the register pointer;
/// later bytes are stored at the pointer, which then advances. Reads start
/// at the pointer and advance it too.
#[derive(Debug)]
pub struct Slave {
    /// Address in 8-bit form (direction bit clear)
    pub address: u8,
    pub memory: [u8; 256],
    pub pointer: u8,
    /// Refuse every address byte
    pub refuse_address: bool,
    /// Refuse read-direction address bytes
    pub refuse_reads: bool,
    /// Refuse the n-th byte written after the address (0 = register byte)
    pub refuse_byte: Option<usize>,
    pub starts: usize,
    pub stops: usize,
    /// Address byte of the most recent transaction
    pub last_address: Option<u8>,
    /// Every byte written after an address, across transactions
    pub received: Vec<u8, 256>,
    /// Master acknowledge bits for transmitted bytes (`true` = ACK)
    pub master_acks: Vec<bool, 256>,
    state: SlaveState,
    shift: u8,
    bits: u8,
    index: usize,
    reading: bool,
    drive: PinState,
}

impl Slave {
    fn new(address: u8) -> Self {
        Self {
            address,
            memory: [0; 256],
            pointer: 0,
            refuse_address: false,
            refuse_reads: false,
            refuse_byte: None,
            starts: 0,
            stops: 0,
            last_address: None,
            received: Vec::new(),
            master_acks: Vec::new(),
            state: SlaveState::Idle,
            shift: 0,
            bits: 0,
            index: 0,
            reading: false,
            drive: PinState::High,
        }
    }

    fn on_start(&mut self) {
        self.starts += 1;
        self.state = SlaveState::Receiving;
        self.shift = 0;
        self.bits = 0;
        self.index = 0;
        self.reading = false;
        self.drive = PinState::High;
    }

    fn on_stop(&mut self) {
        self.stops += 1;
        self.state = SlaveState::Idle;
        self.drive = PinState::High;
    }

    fn on_rise(&mut self, sda: PinState) {
        match self.state {
            SlaveState::Receiving => {
                self.shift = (self.shift << 1) | sda.is_high() as u8;
                self.bits += 1;
            }
            SlaveState::Transmitting => self.bits += 1,
            SlaveState::MasterAckSlot => {
                let ack = sda.is_low();
                self.master_acks.push(ack).unwrap();
                self.state = SlaveState::MasterAckDone { ack };
            }
            _ => {}
        }
    }

    fn on_fall(&mut self) {
        match self.state {
            SlaveState::Receiving if self.bits == 8 => {
                let ack = self.accept(self.shift);
                self.drive = if ack { PinState::Low } else { PinState::High };
                self.state = SlaveState::AckSlot { ack };
            }
            SlaveState::AckSlot { ack } => {
                self.drive = PinState::High;
                if !ack {
                    self.state = SlaveState::Idle;
                } else if self.reading {
                    self.begin_transmit();
                } else {
                    self.state = SlaveState::Receiving;
                    self.shift = 0;
                    self.bits = 0;
                }
            }
            SlaveState::Transmitting if self.bits == 8 => {
                self.drive = PinState::High;
                self.state = SlaveState::MasterAckSlot;
            }
            SlaveState::Transmitting => {
                self.drive = PinState::from_msb(self.shift << self.bits);
            }
            SlaveState::MasterAckDone { ack: true } => self.begin_transmit(),
            SlaveState::MasterAckDone { ack: false } => self.state = SlaveState::Idle,
            _ => {}
        }
    }

    fn begin_transmit(&mut self) {
        self.shift = self.memory[self.pointer as usize];
        self.pointer = self.pointer.wrapping_add(1);
        self.bits = 0;
        self.drive = PinState::from_msb(self.shift);
        self.state = SlaveState::Transmitting;
    }

    /// Handle a received byte; returns whether to acknowledge it
    fn accept(&mut self, byte: u8) -> bool {
        let index = self.index;
        self.index += 1;

        if index == 0 {
            self.last_address = Some(byte);
            self.reading = byte & 0x01 != 0;
            return byte & 0xFE == self.address
                && !self.refuse_address
                && !(self.reading && self.refuse_reads);
        }

        self.received.push(byte).unwrap();
        if self.refuse_byte == Some(index - 1) {
            return false;
        }
        if index == 1 {
            self.pointer = byte;
        } else {
            self.memory[self.pointer as usize] = byte;
            self.pointer = self.pointer.wrapping_add(1);
        }
        true
    }
}

/// Simulated two-wire bus with one slave attached
#[derive(Debug)]
pub struct SimBus {
    events: Vec<Event, 4096>,
    scl: PinState,
    sda: PinState,
    slave: Slave,
    writes_left: Option<usize>,
}

impl SimBus {
    /// Bus with a slave answering at the 7-bit `address`
    pub fn new(address: u8) -> Self {
        Self {
            events: Vec::new(),
            scl: PinState::High,
            sda: PinState::High,
            slave: Slave::new(address << 1),
            writes_left: None,
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    pub fn slave(&self) -> &Slave {
        &self.slave
    }

    pub fn slave_mut(&mut self) -> &mut Slave {
        &mut self.slave
    }

    /// Pull both master outputs low without recording anything
    pub fn hold_low(&mut self) {
        self.scl = PinState::Low;
        self.sda = PinState::Low;
    }

    /// Let `writes` more line writes succeed, then fail every one after
    pub fn fail_after(&mut self, writes: usize) {
        self.writes_left = Some(writes);
    }

    /// Resolved SDA level
    pub fn line(&self) -> PinState {
        if self.sda.is_high() && self.slave.drive.is_high() {
            PinState::High
        } else {
            PinState::Low
        }
    }

    /// Both lines high
    pub fn is_idle(&self) -> bool {
        self.scl.is_high() && self.line().is_high()
    }

    fn record(&mut self, event: Event) {
        self.events.push(event).unwrap();
    }

    fn check_fault(&mut self) -> Result<(), SimFault> {
        match self.writes_left {
            Some(0) => Err(SimFault),
            Some(ref mut left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl BusLines for SimBus {
    type Error = SimFault;

    fn set_scl(&mut self, state: PinState) -> Result<(), SimFault> {
        self.check_fault()?;
        self.record(Event::Scl(state));
        if state != self.scl {
            self.scl = state;
            match state {
                PinState::High => {
                    let sda = self.line();
                    self.slave.on_rise(sda);
                }
                PinState::Low => self.slave.on_fall(),
            }
        }
        Ok(())
    }

    fn set_sda(&mut self, state: PinState) -> Result<(), SimFault> {
        self.check_fault()?;
        self.record(Event::Sda(state));
        let before = self.line();
        self.sda = state;
        let after = self.line();
        if self.scl.is_high() && before != after {
            match after {
                PinState::Low => self.slave.on_start(),
                PinState::High => self.slave.on_stop(),
            }
        }
        Ok(())
    }

    fn sda(&mut self) -> Result<PinState, SimFault> {
        let level = self.line();
        self.record(Event::Sample(level));
        Ok(level)
    }

    fn delay_us(&mut self, us: u32) {
        self.record(Event::Delay(us));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock_byte(bus: &mut SimBus, byte: u8) {
        for bit in 0..8 {
            bus.set_sda(PinState::from_msb(byte << bit)).unwrap();
            bus.set_scl(PinState::High).unwrap();
            bus.set_scl(PinState::Low).unwrap();
        }
    }

    #[test]
    fn test_detects_framing() {
        let mut bus = SimBus::new(0x50);

        bus.set_sda(PinState::Low).unwrap();
        assert_eq!(bus.slave().starts, 1);

        bus.set_scl(PinState::Low).unwrap();
        bus.set_scl(PinState::High).unwrap();
        bus.set_sda(PinState::High).unwrap();
        assert_eq!(bus.slave().stops, 1);
        assert!(bus.is_idle());
    }

    #[test]
    fn test_slave_acks_own_address() {
        let mut bus = SimBus::new(0x50);
        bus.set_sda(PinState::Low).unwrap();
        bus.set_scl(PinState::Low).unwrap();

        clock_byte(&mut bus, 0xA0);
        bus.set_sda(PinState::High).unwrap();

        assert_eq!(bus.line(), PinState::Low);
        assert_eq!(bus.slave().last_address, Some(0xA0));
    }

    #[test]
    fn test_slave_ignores_other_address() {
        let mut bus = SimBus::new(0x50);
        bus.set_sda(PinState::Low).unwrap();
        bus.set_scl(PinState::Low).unwrap();

        clock_byte(&mut bus, 0x22);
        bus.set_sda(PinState::High).unwrap();

        assert_eq!(bus.line(), PinState::High);
    }

    #[test]
    fn test_fault_injection() {
        let mut bus = SimBus::new(0x50);
        bus.fail_after(1);

        assert_eq!(bus.set_scl(PinState::Low), Ok(()));
        assert_eq!(bus.set_scl(PinState::High), Err(SimFault));
        assert_eq!(bus.events().len(), 1);
    }
}
