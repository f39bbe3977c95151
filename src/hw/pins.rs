// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin assignments for the NUCLEO-F767ZI carrier used by both images.

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin};
use stm32f7xx_hal::{
    gpio::{gpiod, Alternate},
    pac,
    prelude::*,
};

use crate::config::LOAD_CELL_COUNT;
use crate::hw::gpio::{InputLine, OutputLine};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOB, dp.GPIOD, dp.GPIOE, dp.GPIOF);
/// ```
pub struct BoardPins {
    pub usart3: Usart3Pins,
    pub led: OutputLine<'B', 0>, // LD1 (green)
    pub load_cells: LoadCellPins,
    pub stepper: StepperPins,
}

/// ST-LINK virtual COM port
pub struct Usart3Pins {
    pub tx: gpiod::PD8<Alternate<7>>,
    pub rx: gpiod::PD9<Alternate<7>>,
}

/// HX711 boards share SCK; one DOUT per board.
pub struct LoadCellPins {
    pub sck: OutputLine<'F', 13>,
    pub dout: [DoutLine; LOAD_CELL_COUNT],
}

/// STEP/DIR/EN driver inputs.
pub struct StepperPins {
    pub step: OutputLine<'E', 9>,
    pub dir: OutputLine<'E', 11>,
    pub enable: OutputLine<'E', 13>, // active low
}

/// One HX711 DOUT line. The pins differ in type, so they meet in one array through this.
pub enum DoutLine {
    Pf14(InputLine<'F', 14>),
    Pf15(InputLine<'F', 15>),
}

impl ErrorType for DoutLine {
    type Error = Infallible;
}

impl InputPin for DoutLine {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        match self {
            DoutLine::Pf14(line) => line.is_high(),
            DoutLine::Pf15(line) => line.is_high(),
        }
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        match self {
            DoutLine::Pf14(line) => line.is_low(),
            DoutLine::Pf15(line) => line.is_low(),
        }
    }
}

impl BoardPins {
    pub fn new(gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE, gpiof: pac::GPIOF) -> Self {
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();
        let gpiof = gpiof.split();

        Self {
            usart3: Usart3Pins {
                tx: gpiod.pd8.into_alternate::<7>(),
                rx: gpiod.pd9.into_alternate::<7>(),
            },

            led: OutputLine::new(gpiob.pb0),

            load_cells: LoadCellPins {
                sck: OutputLine::new(gpiof.pf13),
                dout: [
                    DoutLine::Pf14(InputLine::new(gpiof.pf14)),
                    DoutLine::Pf15(InputLine::new(gpiof.pf15)),
                ],
            },

            stepper: StepperPins {
                step: OutputLine::new(gpioe.pe9),
                dir: OutputLine::new(gpioe.pe11),
                enable: OutputLine::new(gpioe.pe13),
            },
        }
    }
}
