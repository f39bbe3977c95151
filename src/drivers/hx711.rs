// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Avia HX711 24-bit load-cell ADCs read in lock-step.
//!
//! Any number of HX711s share one SCK line, each with its own DOUT line. Every SCK pulse clocks
//! one bit out of all sensors at once, so all channels are sampled at the same clock edges.
//! Whether the analog conversions themselves are simultaneous is up to the sensors.
//!
//! Sequence for one acquisition:
//! 1. SCK low (also wakes sensors from power-down).
//! 2. Wait until every DOUT is low (conversion ready).
//! 3. 24 SCK pulses, shifting DOUT into each channel, MSB first.
//! 4. One extra pulse selecting channel A, gain 128 for the next conversion.
//! 5. Shift each 24-bit two's-complement result up by 8 to sign-extend it to 32 bits.
//!    Divide by 256 (arithmetic shift right) downstream to recover raw counts.

use core::fmt;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorKind, InputPin, OutputPin};

use crate::config::{SamplerConfig, WaitLimit};

/// Bits per conversion result.
pub const SAMPLE_BITS: u32 = 24;

/// Minimum SCK high/low time for data pulses (datasheet T3/T4: 0.2 µs).
pub const SCK_PULSE_NS: u32 = 200;

/// SCK high/low time for the gain-select pulse.
pub const GAIN_PULSE_US: u32 = 1;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SampleError {
    /// At least one sensor did not become ready within the configured wait.
    NotReady,
    /// A GPIO operation failed.
    Pin(ErrorKind),
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleError::NotReady => f.write_str("load cell not ready"),
            SampleError::Pin(kind) => write!(f, "gpio error: {}", kind),
        }
    }
}

fn pin_err<E: digital::Error>(e: E) -> SampleError {
    SampleError::Pin(e.kind())
}

/// Source of one synchronized sample per channel.
pub trait LoadCells<const N: usize> {
    fn acquire(&mut self) -> Result<[i32; N], SampleError>;
}

/// `N` HX711 sensors on a shared SCK line.
pub struct Hx711Array<SCK, DOUT, D, const N: usize> {
    sck: SCK,
    dout: [DOUT; N],
    delay: D,
    ready_wait: WaitLimit,
}

impl<SCK, DOUT, D, const N: usize> Hx711Array<SCK, DOUT, D, N>
where
    SCK: OutputPin,
    DOUT: InputPin,
    D: DelayNs,
{
    pub fn new(sck: SCK, dout: [DOUT; N], delay: D, config: SamplerConfig) -> Self {
        Self {
            sck,
            dout,
            delay,
            ready_wait: config.ready_wait,
        }
    }

    /// True if every sensor has a conversion ready (all DOUT lines low).
    pub fn is_ready(&mut self) -> Result<bool, SampleError> {
        for line in self.dout.iter_mut() {
            if line.is_high().map_err(pin_err)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Read one sample from every channel, sign-extended to 32 bits.
    pub fn read(&mut self) -> Result<[i32; N], SampleError> {
        self.sck.set_low().map_err(pin_err)?;
        self.wait_ready()?;

        let mut raw = [0i32; N];
        for _ in 0..SAMPLE_BITS {
            self.sck.set_high().map_err(pin_err)?;
            self.delay.delay_ns(SCK_PULSE_NS);
            for (acc, line) in raw.iter_mut().zip(self.dout.iter_mut()) {
                let bit = line.is_high().map_err(pin_err)?;
                *acc = (*acc << 1) | i32::from(bit);
            }
            self.sck.set_low().map_err(pin_err)?;
            self.delay.delay_ns(SCK_PULSE_NS);
        }

        // 25th pulse: channel A, gain 128 for the next conversion.
        self.sck.set_high().map_err(pin_err)?;
        self.delay.delay_us(GAIN_PULSE_US);
        self.sck.set_low().map_err(pin_err)?;
        self.delay.delay_us(GAIN_PULSE_US);

        for v in raw.iter_mut() {
            *v <<= 32 - SAMPLE_BITS;
        }
        Ok(raw)
    }

    /// Release the pins and delay provider.
    pub fn free(self) -> (SCK, [DOUT; N], D) {
        (self.sck, self.dout, self.delay)
    }

    fn wait_ready(&mut self) -> Result<(), SampleError> {
        let limit = self.ready_wait;
        let mut failure = None;
        let ready = limit.spin(|| match self.is_ready() {
            Ok(true) => Ok(()),
            Ok(false) => Err(nb::Error::WouldBlock),
            Err(e) => {
                failure = Some(e);
                Ok(())
            }
        });
        if let Some(e) = failure {
            return Err(e);
        }
        ready.ok_or_else(|| {
            log::warn!("hx711: sensors not ready after {:?}", limit);
            SampleError::NotReady
        })
    }
}

impl<SCK, DOUT, D, const N: usize> LoadCells<N> for Hx711Array<SCK, DOUT, D, N>
where
    SCK: OutputPin,
    DOUT: InputPin,
    D: DelayNs,
{
    fn acquire(&mut self) -> Result<[i32; N], SampleError> {
        self.read()
    }
}
