// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Status LED.
//!
//! The force sensor keeps it dark while it waits on the load cells and lights it once a sample
//! is in, so a stuck sensor shows as a dark LED. The stepper drive flips it on every accepted
//! command.

use embedded_hal::digital::{OutputPin, PinState};

/// Pin level that lights the LED.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    #[inline]
    fn level(self, lit: bool) -> PinState {
        PinState::from(lit == (self == Polarity::ActiveHigh))
    }
}

pub struct Led<P> {
    pin: P,
    polarity: Polarity,
    lit: bool,
}

impl<P: OutputPin> Led<P> {
    /// Take over `pin` and drive it dark.
    pub fn new(pin: P, polarity: Polarity) -> Self {
        let mut led = Self {
            pin,
            polarity,
            lit: false,
        };
        led.drive();
        led
    }

    pub fn light(&mut self, lit: bool) {
        self.lit = lit;
        self.drive();
    }

    pub fn toggle(&mut self) {
        self.light(!self.lit);
    }

    #[inline]
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    pub fn into_pin(self) -> P {
        self.pin
    }

    fn drive(&mut self) {
        // Pin errors are ignored.
        let _ = self.pin.set_state(self.polarity.level(self.lit));
    }
}
