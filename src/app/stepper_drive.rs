// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Stepper drive control loop.
//!
//! The host sends a [`StepCommand`] (`-1`, `0` or `1` as a little-endian `i32`). The drive keeps
//! stepping in the commanded direction until told otherwise and reports the active command back,
//! both immediately after accepting one and periodically so the host can poll it.

use embedded_hal::digital::OutputPin;

use crate::app::{AppError, Watchdog};
use crate::config::StepperConfig;
use crate::drivers::{Direction, Led, Stepper};
use crate::protocol::{send_packet, Parser, StepCommand};
use crate::serial::SerialIo;

pub struct StepperDrive<M, P, W, L>
where
    L: OutputPin,
{
    motor: M,
    port: P,
    watchdog: W,
    led: Led<L>,
    parser: Parser<{ StepCommand::PAYLOAD_SIZE }>,
    command: StepCommand,
    report_every: u32,
    ticks: u32,
}

impl<M, P, W, L> StepperDrive<M, P, W, L>
where
    M: Stepper,
    P: SerialIo,
    W: Watchdog,
    L: OutputPin,
{
    pub fn new(motor: M, port: P, watchdog: W, led: Led<L>, config: StepperConfig) -> Self {
        Self {
            motor,
            port,
            watchdog,
            led,
            parser: Parser::new(),
            command: StepCommand::Stop,
            report_every: config.report_every,
            ticks: 0,
        }
    }

    #[inline]
    pub fn command(&self) -> StepCommand {
        self.command
    }

    pub fn run_once(&mut self) -> Result<(), AppError> {
        match self.command {
            StepCommand::Forward => self.motor.step(Direction::Forward),
            StepCommand::Backward => self.motor.step(Direction::Backward),
            StepCommand::Stop => self.motor.stop(),
        }

        self.ticks = self.ticks.wrapping_add(1);
        let mut result = Ok(());
        if self.report_every != 0 && self.ticks % self.report_every == 0 {
            result = self.report();
        }

        self.watchdog.kick();

        while let Ok(byte) = self.port.read() {
            let parsed = match self.parser.push(byte) {
                Some(payload) => StepCommand::from_payload(payload),
                None => continue,
            };
            match parsed {
                Some(cmd) => {
                    log::debug!("step command {:?}", cmd);
                    self.command = cmd;
                    self.led.toggle();
                    result = result.and(self.report());
                }
                None => log::warn!("ignoring malformed step command"),
            }
        }
        result
    }

    pub fn run(mut self) -> ! {
        loop {
            if let Err(e) = self.run_once() {
                log::warn!("stepper drive: {}", e);
            }
        }
    }

    fn report(&mut self) -> Result<(), AppError> {
        let port = &mut self.port;
        send_packet(&self.command.to_payload(), |chunk: &[u8]| port.write(chunk))?;
        Ok(())
    }
}
