//! Register-file model of an AKC695X on an async I2C bus.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use akc695x::{Akc695x, Config, NoResetPin};
use embedded_hal_async::i2c::{ErrorKind, ErrorType, I2c, Operation};
use embedded_hal_mock::eh1::delay::NoopDelay;

pub const STATUS: usize = 0x14;
pub const READ_CHANNEL: usize = 0x15;
pub const STC: u8 = 1 << 6;

#[derive(Debug, Default)]
pub struct ChipState {
    pub regs: [u8; 0x1C],
    pointer: u8,
    /// Every (register, value) write in bus order.
    pub writes: Vec<(u8, u8)>,
    /// Reads of 0x14 before STC is raised, `None` leaves STC alone.
    pub stc_after_reads: Option<usize>,
    status_reads: usize,
    /// Channel the chip reports once STC is raised by `stc_after_reads`.
    pub seek_target: Option<u16>,
    /// Set STC as soon as a tune is triggered.
    pub stc_on_tune: bool,
    pub fail: bool,
    pub addresses: Vec<u8>,
}

/// Cloneable handle: one copy goes into the driver, the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct FakeChip(pub Rc<RefCell<ChipState>>);

impl FakeChip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regs(regs: &[(usize, u8)]) -> Self {
        let chip = Self::new();
        for &(reg, value) in regs {
            chip.0.borrow_mut().regs[reg] = value;
        }
        chip
    }

    pub fn reg(&self, reg: usize) -> u8 {
        self.0.borrow().regs[reg]
    }

    pub fn set_reg(&self, reg: usize, value: u8) {
        self.0.borrow_mut().regs[reg] = value;
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.0.borrow().writes.clone()
    }

    pub fn writes_to(&self, reg: u8) -> Vec<u8> {
        self.0
            .borrow()
            .writes
            .iter()
            .filter(|(r, _)| *r == reg)
            .map(|(_, v)| *v)
            .collect()
    }

    pub fn clear_writes(&self) {
        self.0.borrow_mut().writes.clear();
    }

    pub fn raise_stc_after(&self, reads: usize) {
        let mut state = self.0.borrow_mut();
        state.stc_after_reads = Some(reads);
        state.status_reads = 0;
    }

    /// Make the next completed seek land on `channel`.
    pub fn seek_lands_on(&self, channel: u16) {
        self.0.borrow_mut().seek_target = Some(channel);
    }

    pub fn set_read_channel(&self, channel: u16) {
        let mut state = self.0.borrow_mut();
        state.regs[STATUS] = (state.regs[STATUS] & 0xE0) | ((channel >> 8) as u8 & 0x1F);
        state.regs[READ_CHANNEL] = (channel & 0xFF) as u8;
    }
}

impl ChipState {
    fn write(&mut self, reg: u8, value: u8) {
        self.writes.push((reg, value));
        let reg = reg as usize;
        let triggers_tune = reg == 0x00 && value & (1 << 5) != 0 && self.regs[0] & (1 << 5) == 0;
        self.regs[reg] = value;
        if triggers_tune {
            self.regs[STATUS] = (self.regs[STATUS] & 0xE0) | (self.regs[0x02] & 0x1F);
            self.regs[READ_CHANNEL] = self.regs[0x03];
            if self.stc_on_tune {
                self.regs[STATUS] |= STC;
            }
        }
    }

    fn read(&mut self) -> u8 {
        let reg = self.pointer as usize;
        if reg == STATUS {
            if let Some(after) = self.stc_after_reads {
                if self.status_reads >= after {
                    self.regs[STATUS] |= STC;
                    if let Some(channel) = self.seek_target.take() {
                        self.regs[STATUS] = (self.regs[STATUS] & 0xE0) | ((channel >> 8) as u8 & 0x1F);
                        self.regs[READ_CHANNEL] = (channel & 0xFF) as u8;
                    }
                }
            }
            self.status_reads += 1;
        }
        self.regs[reg]
    }
}

impl ErrorType for FakeChip {
    type Error = ErrorKind;
}

impl I2c for FakeChip {
    async fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            return Err(ErrorKind::Bus);
        }
        state.addresses.push(address);
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    state.pointer = bytes[0];
                    if bytes.len() == 2 {
                        state.write(bytes[0], bytes[1]);
                    }
                }
                Operation::Read(buf) => {
                    for byte in buf.iter_mut() {
                        *byte = state.read();
                    }
                }
            }
        }
        Ok(())
    }
}

pub type TestRadio = Akc695x<FakeChip, NoResetPin, NoopDelay>;

pub fn radio(chip: &FakeChip) -> TestRadio {
    Akc695x::new_without_reset(chip.clone(), NoopDelay)
}

pub fn radio_with_config(chip: &FakeChip, config: Config) -> TestRadio {
    radio(chip).with_config(config)
}
