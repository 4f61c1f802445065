// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for the board peripherals, used by unit tests.
//!
//! Handles are cheap clones sharing one state cell, so a test can keep a handle after moving the
//! peripheral into a driver and still observe what the driver did.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::WriteRead;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;
use embedded_hal::PwmPin;

use crate::drivers::as5600;

/// Output pin recording its level and how often it was written.
#[derive(Clone, Default)]
pub struct MockPin {
    high: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
    failing: Rc<Cell<bool>>,
}

impl MockPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_high(&self) -> bool {
        self.high.get()
    }

    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    fn drive(&mut self, high: bool) -> Result<(), ()> {
        if self.failing.get() {
            return Err(());
        }
        self.high.set(high);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl OutputPin for MockPin {
    type Error = ();

    fn set_low(&mut self) -> Result<(), ()> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), ()> {
        self.drive(true)
    }
}

/// PWM channel with a configurable full-scale duty.
#[derive(Clone)]
pub struct MockPwm {
    duty: Rc<Cell<u16>>,
    enabled: Rc<Cell<bool>>,
    max: u16,
}

impl MockPwm {
    pub fn new(max: u16) -> Self {
        Self {
            duty: Rc::new(Cell::new(0)),
            enabled: Rc::new(Cell::new(false)),
            max,
        }
    }

    pub fn duty(&self) -> u16 {
        self.duty.get()
    }

    pub fn enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl PwmPin for MockPwm {
    type Duty = u16;

    fn disable(&mut self) {
        self.enabled.set(false);
    }

    fn enable(&mut self) {
        self.enabled.set(true);
    }

    fn get_duty(&self) -> u16 {
        self.duty.get()
    }

    fn get_max_duty(&self) -> u16 {
        self.max
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty.set(duty);
    }
}

/// Bus error returned when the mock device does not acknowledge.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Nack;

/// Register file of a simulated AS5600, shared between the bus and the test.
#[derive(Clone)]
pub struct MockAs5600 {
    regs: Rc<RefCell<[u8; 256]>>,
    present: Rc<Cell<bool>>,
    reads: Rc<Cell<u32>>,
}

impl MockAs5600 {
    /// Set both the raw and scaled angle registers.
    pub fn set_angle(&self, angle: u16) {
        let [hi, lo] = (angle & 0x0FFF).to_be_bytes();
        let mut regs = self.regs.borrow_mut();
        for base in [as5600::reg::RAW_ANGLE, as5600::reg::ANGLE] {
            regs[base as usize] = hi;
            regs[base as usize + 1] = lo;
        }
    }

    pub fn set_register(&self, addr: u8, value: u8) {
        self.regs.borrow_mut()[addr as usize] = value;
    }

    /// Whether the chip acknowledges its address.
    pub fn set_present(&self, present: bool) {
        self.present.set(present);
    }

    pub fn reads(&self) -> u32 {
        self.reads.get()
    }
}

/// I2C bus with one simulated AS5600 on it.
pub struct MockI2c {
    chip: MockAs5600,
}

impl MockI2c {
    pub fn as5600() -> (Self, MockAs5600) {
        let chip = MockAs5600 {
            regs: Rc::new(RefCell::new([0; 256])),
            present: Rc::new(Cell::new(true)),
            reads: Rc::new(Cell::new(0)),
        };
        // Magnet detected, gain in range.
        chip.set_register(as5600::reg::STATUS, 1 << 5);
        (Self { chip: chip.clone() }, chip)
    }
}

impl WriteRead for MockI2c {
    type Error = Nack;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Nack> {
        if address != as5600::ADDRESS || !self.chip.present.get() {
            return Err(Nack);
        }
        let start = *bytes.first().ok_or(Nack)? as usize;
        let regs = self.chip.regs.borrow();
        for (i, b) in buffer.iter_mut().enumerate() {
            *b = regs[(start + i) & 0xFF];
        }
        self.chip.reads.set(self.chip.reads.get() + 1);
        Ok(())
    }
}

/// Serial port with a scripted receive queue and a captured transmit buffer.
#[derive(Default)]
pub struct MockSerial {
    pub rx: VecDeque<u8>,
    pub tx: String,
}

impl MockSerial {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn send(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    /// Take everything transmitted so far.
    pub fn take_tx(&mut self) -> String {
        std::mem::take(&mut self.tx)
    }
}

impl serial::Read<u8> for MockSerial {
    type Error = core::convert::Infallible;

    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

impl core::fmt::Write for MockSerial {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.tx.push_str(s);
        Ok(())
    }
}

/// Delay that only adds up the requested time.
#[derive(Default)]
pub struct MockDelay {
    pub total_ms: u64,
    pub calls: u32,
}

impl DelayMs<u32> for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += ms as u64;
        self.calls += 1;
    }
}
