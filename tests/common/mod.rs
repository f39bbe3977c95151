// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Host-side stand-ins for the board: pins, delay, link, storage, watchdog.

#![allow(dead_code)]

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

use forcerig::app::{CalibrationStore, Watchdog};
use forcerig::drivers::{Direction, LoadCells, SampleError, Stepper};
use forcerig::protocol::{send_packet, Parser};
use forcerig::serial::{SerialIo, TransportError};

/// Shared handle, so a test keeps access to a fake after moving it into a control loop.
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    pub fn new(inner: T) -> Self {
        Self(Rc::new(RefCell::new(inner)))
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: SerialIo> SerialIo for Shared<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        self.0.borrow_mut().write(bytes)
    }

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.0.borrow_mut().read()
    }
}

impl<T: CalibrationStore> CalibrationStore for Shared<T> {
    type Error = T::Error;

    fn load(&mut self, out: &mut [u8]) -> Result<(), T::Error> {
        self.0.borrow_mut().load(out)
    }

    fn store(&mut self, data: &[u8]) -> Result<(), T::Error> {
        self.0.borrow_mut().store(data)
    }
}

impl<T: Watchdog> Watchdog for Shared<T> {
    fn kick(&mut self) {
        self.0.borrow_mut().kick()
    }
}

impl<T: Stepper> Stepper for Shared<T> {
    fn step(&mut self, dir: Direction) {
        self.0.borrow_mut().step(dir)
    }

    fn stop(&mut self) {
        self.0.borrow_mut().stop()
    }
}

impl<T: LoadCells<N>, const N: usize> LoadCells<N> for Shared<T> {
    fn acquire(&mut self) -> Result<[i32; N], SampleError> {
        self.0.borrow_mut().acquire()
    }
}

/// Output pin whose level can be checked from outside.
#[derive(Clone, Default)]
pub struct SharedPin(Rc<Cell<bool>>);

impl SharedPin {
    pub fn is_high(&self) -> bool {
        self.0.get()
    }
}

impl ErrorType for SharedPin {
    type Error = Infallible;
}

impl OutputPin for SharedPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.0.set(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.0.set(true);
        Ok(())
    }
}

/// Delay that only adds up what it was asked for.
#[derive(Clone, Default)]
pub struct RecordingDelay(Rc<Cell<u64>>);

impl RecordingDelay {
    pub fn total_ns(&self) -> u64 {
        self.0.get()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.set(self.0.get() + u64::from(ns));
    }
}

/// A bank of HX711s behind one SCK line.
///
/// Each DOUT reports busy for `busy_polls` ready checks, then shifts out its 24-bit value MSB
/// first, one bit per rising SCK edge. The falling edge of the 25th pulse ends the conversion.
pub struct Hx711Bank {
    values: Vec<i32>,
    busy_polls: Cell<u32>,
    pulses: Cell<u32>,
    sck_high: Cell<bool>,
}

impl Hx711Bank {
    pub fn new(values: &[i32], busy_polls: u32) -> Rc<Self> {
        Rc::new(Self {
            values: values.to_vec(),
            busy_polls: Cell::new(busy_polls),
            pulses: Cell::new(0),
            sck_high: Cell::new(false),
        })
    }

    pub fn sck(self: &Rc<Self>) -> SimSck {
        SimSck(Rc::clone(self))
    }

    pub fn dout(self: &Rc<Self>, channel: usize) -> SimDout {
        SimDout {
            bank: Rc::clone(self),
            channel,
        }
    }

    pub fn pulses(&self) -> u32 {
        self.pulses.get()
    }
}

pub struct SimSck(Rc<Hx711Bank>);

impl ErrorType for SimSck {
    type Error = Infallible;
}

impl OutputPin for SimSck {
    fn set_low(&mut self) -> Result<(), Infallible> {
        let bank = &self.0;
        if bank.sck_high.replace(false) && bank.pulses.get() == 25 {
            bank.pulses.set(0);
        }
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        let bank = &self.0;
        if !bank.sck_high.replace(true) {
            bank.pulses.set(bank.pulses.get() + 1);
        }
        Ok(())
    }
}

pub struct SimDout {
    bank: Rc<Hx711Bank>,
    channel: usize,
}

impl ErrorType for SimDout {
    type Error = Infallible;
}

impl InputPin for SimDout {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        let bank = &self.bank;
        let pulse = bank.pulses.get();
        if pulse == 0 {
            let busy = bank.busy_polls.get();
            if busy > 0 {
                bank.busy_polls.set(busy - 1);
                return Ok(true);
            }
            return Ok(false);
        }
        if pulse > 24 {
            return Ok(true);
        }
        let word = (bank.values[self.channel] as u32) & 0x00FF_FFFF;
        Ok((word >> (24 - pulse)) & 1 == 1)
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        self.is_high().map(|high| !high)
    }
}

/// Byte link: everything written lands in `sent`, `read` drains `inbox`.
#[derive(Default)]
pub struct FakeLink {
    pub sent: Vec<u8>,
    pub inbox: VecDeque<u8>,
    pub fail_writes: bool,
}

impl FakeLink {
    pub fn deliver(&mut self, bytes: &[u8]) {
        self.inbox.extend(bytes.iter().copied());
    }
}

impl SerialIo for FakeLink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.fail_writes {
            return Err(TransportError::TxTimeout);
        }
        self.sent.extend_from_slice(bytes);
        Ok(())
    }

    fn read(&mut self) -> nb::Result<u8, Infallible> {
        self.inbox.pop_front().ok_or(nb::Error::WouldBlock)
    }
}

/// Calibration storage in RAM.
pub struct MemStore {
    pub data: Vec<u8>,
    pub writes: u32,
    pub fail: bool,
}

impl MemStore {
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
            writes: 0,
            fail: false,
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new(64)
    }
}

impl CalibrationStore for MemStore {
    type Error = &'static str;

    fn load(&mut self, out: &mut [u8]) -> Result<(), &'static str> {
        if self.fail {
            return Err("read failed");
        }
        let n = out.len().min(self.data.len());
        out[..n].copy_from_slice(&self.data[..n]);
        Ok(())
    }

    fn store(&mut self, data: &[u8]) -> Result<(), &'static str> {
        if self.fail {
            return Err("write failed");
        }
        if data.len() > self.data.len() {
            return Err("too large");
        }
        self.data[..data.len()].copy_from_slice(data);
        self.writes += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingWatchdog {
    pub kicks: u32,
}

impl Watchdog for CountingWatchdog {
    fn kick(&mut self) {
        self.kicks += 1;
    }
}

/// Load cells that hand out queued results, then report not ready.
#[derive(Default)]
pub struct ScriptedCells {
    pub script: VecDeque<Result<[i32; 2], SampleError>>,
}

impl LoadCells<2> for ScriptedCells {
    fn acquire(&mut self) -> Result<[i32; 2], SampleError> {
        self.script.pop_front().unwrap_or(Err(SampleError::NotReady))
    }
}

/// Records every call; `None` is a stop.
#[derive(Default)]
pub struct RecordingStepper {
    pub calls: Vec<Option<Direction>>,
}

impl Stepper for RecordingStepper {
    fn step(&mut self, dir: Direction) {
        self.calls.push(Some(dir));
    }

    fn stop(&mut self) {
        self.calls.push(None);
    }
}

/// Frame `payload` the way the firmware does.
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    send_packet(payload, |chunk: &[u8]| {
        out.extend_from_slice(chunk);
        Ok::<(), ()>(())
    })
    .unwrap();
    out
}

/// Every valid payload found in `bytes`.
pub fn payloads(bytes: &[u8]) -> Vec<Vec<u8>> {
    let mut parser: Parser = Parser::new();
    bytes
        .iter()
        .filter_map(|&b| parser.push(b).map(<[u8]>::to_vec))
        .collect()
}
