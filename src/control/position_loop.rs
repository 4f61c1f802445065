// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Closed-loop position controller for the single motor axis.
//!
//! The loop owns every piece of mutable state: the sensor, the H-bridge, the auxiliary outputs,
//! the command parser and the [`ControllerState`]. One call to [`step`](PositionLoop::step) is one
//! iteration:
//!
//! 1. read the position,
//! 2. drain the serial link and apply every complete command line,
//! 3. evaluate the PI law,
//! 4. drive the motor (or stop it inside the deadband),
//! 5. write the position as a status line.
//!
//! Typical usage pattern:
//!
//! ```ignore
//! let mut axis = PositionLoop::initialize(sensor, fwd, rev, (ch8, ch9, ch10), config)?;
//! let fatal = axis.run(&mut usart, &mut delay);
//! ```
//!
//! Commands received in an iteration are applied before the PI law runs, so a new target always
//! clears the integrator before it is used.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use embedded_hal::serial;
use embedded_hal::PwmPin;

use crate::config::ControlConfig;
use crate::control::pi::{Actuation, ControllerState, PiController};
use crate::drivers::{HBridge, PositionSensor};
use crate::error::{Error, Fatal};
use crate::hw::aux_output::{AuxBank, AuxState};
use crate::protocol::{write_status, Command, Parser};

/// What happened in one iteration.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Position used for control (rad); the last good reading if this one failed
    pub position: f32,
    /// `None` when the sensor read failed and control was skipped
    pub actuation: Option<Actuation>,
    /// Command lines applied this iteration
    pub commands: u16,
}

/// Single-axis position loop.
pub struct PositionLoop<S, Fwd, Rev, A, B, C>
where
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
{
    sensor: S,
    motor: HBridge<Fwd, Rev>,
    aux: AuxBank<A, B, C>,
    pi: PiController,
    state: ControllerState,
    parser: Parser,
    config: ControlConfig,

    /// Last good position (rad)
    position: f32,
    /// Consecutive failed sensor reads
    sensor_faults: u32,
}

impl<S, Fwd, Rev, A, B, C> PositionLoop<S, Fwd, Rev, A, B, C>
where
    S: PositionSensor,
    Fwd: PwmPin<Duty = u16>,
    Rev: PwmPin<Duty = u16>,
    A: OutputPin,
    B: OutputPin,
    C: OutputPin,
{
    /// Bring the axis up.
    ///
    /// Builds the H-bridge and the auxiliary bank from `config` with every output silenced, then
    /// probes the sensor and latches the current position as the target so the first iteration
    /// commands nothing. Any failure here is fatal; retrying is up to the caller.
    pub fn initialize(
        mut sensor: S,
        fwd: Fwd,
        rev: Rev,
        (a, b, c): (A, B, C),
        config: ControlConfig,
    ) -> Result<Self, Fatal> {
        let motor = HBridge::new(fwd, rev, config.min_pwm, config.max_pwm);
        let aux = AuxBank::new(a, b, c, config.aux_channels);

        if let Err(Error::InvalidConfig(why)) = config.validate() {
            return Err(Fatal::InvalidConfig(why));
        }
        if sensor.ticks_per_rev() != config.ticks_per_rev {
            return Err(Fatal::InvalidConfig("sensor scale differs from ticks_per_rev"));
        }

        sensor.probe().map_err(|_| Fatal::SensorNotDetected)?;
        let position = sensor
            .read_position()
            .map_err(|_| Fatal::SensorNotDetected)?;

        #[cfg(feature = "defmt")]
        defmt::info!("position loop up, holding {=f32} rad", position);

        Ok(Self {
            sensor,
            motor,
            aux,
            pi: PiController::from_config(&config),
            state: ControllerState::new(position),
            parser: Parser::new(),
            config,
            position,
            sensor_faults: 0,
        })
    }

    /// Run one iteration against `serial`, which carries both commands and status lines.
    ///
    /// Returns [`Error::SensorLost`] once `sensor_fault_limit` reads in a row have failed; the
    /// motor is stopped at that point. A single failed read holds the last good position, stops
    /// the motor for this iteration and writes no status line.
    pub fn step<SER>(&mut self, serial: &mut SER) -> Result<StepReport, Error>
    where
        SER: serial::Read<u8> + core::fmt::Write,
    {
        let reading = self.sensor.read_position();
        let fresh = match reading {
            Ok(position) => {
                self.sensor_faults = 0;
                self.position = position;
                true
            }
            Err(_) => {
                self.sensor_faults = self.sensor_faults.saturating_add(1);
                self.motor.stop();

                #[cfg(feature = "defmt")]
                if self.sensor_faults == 1 {
                    defmt::warn!("position read failed, holding {=f32} rad", self.position);
                }

                if self.sensor_faults >= self.config.sensor_fault_limit {
                    #[cfg(feature = "defmt")]
                    defmt::error!("position sensor lost after {} reads", self.sensor_faults);
                    return Err(Error::SensorLost {
                        consecutive: self.sensor_faults,
                    });
                }
                false
            }
        };

        let commands = self.drain_commands(serial);

        if !fresh {
            return Ok(StepReport {
                position: self.position,
                actuation: None,
                commands,
            });
        }

        let actuation = self.pi.update(&mut self.state, self.position);
        if actuation.in_deadband {
            self.motor.stop();
        } else {
            self.motor.drive(actuation.command);
        }

        write_status(serial, self.position)?;

        Ok(StepReport {
            position: self.position,
            actuation: Some(actuation),
            commands,
        })
    }

    /// Run forever at the configured cadence.
    ///
    /// Only returns when the sensor is lost, with the motor already stopped. Other iteration
    /// errors are logged and the loop carries on.
    pub fn run<SER, D>(&mut self, serial: &mut SER, delay: &mut D) -> Result<Infallible, Fatal>
    where
        SER: serial::Read<u8> + core::fmt::Write,
        D: DelayMs<u32>,
    {
        loop {
            match self.step(serial) {
                Ok(_) => {}
                Err(Error::SensorLost { consecutive }) => {
                    self.motor.stop();
                    return Err(Fatal::SensorLost { consecutive });
                }
                Err(_e) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("iteration error: {}", _e);
                }
            }
            delay.delay_ms(self.config.loop_delay_ms);
        }
    }

    /// Read every byte currently waiting (bounded per iteration) and apply complete lines.
    fn drain_commands<SER>(&mut self, serial: &mut SER) -> u16
    where
        SER: serial::Read<u8>,
    {
        let mut applied: u16 = 0;
        for _ in 0..self.config.max_rx_bytes_per_step {
            match serial.read() {
                Ok(byte) => {
                    if let Some(cmd) = self.parser.push(byte) {
                        self.apply(cmd);
                        applied = applied.saturating_add(1);
                    }
                }
                Err(nb::Error::WouldBlock) => break,
                Err(nb::Error::Other(_)) => {
                    // Framing/overrun: whatever line was in flight is corrupt.
                    self.parser.reset();
                }
            }
        }
        applied
    }

    /// Apply one command. Never fails: bad commands are dropped without a reply.
    fn apply(&mut self, cmd: Command) {
        match cmd {
            Command::TargetSet { value } => {
                self.state.set_target(value);
            }
            Command::AuxSet { channel, high } => {
                let Ok(channel) = u8::try_from(channel) else {
                    return;
                };
                match self.aux.set(channel, high) {
                    Ok(true) => {}
                    Ok(false) => {
                        #[cfg(feature = "defmt")]
                        defmt::debug!("aux channel {} not on allow-list", channel);
                    }
                    Err(_e) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("{}", _e);
                    }
                }
            }
        }
    }

    /// Replace the target as if it had arrived over the serial link.
    pub fn set_target(&mut self, target_rad: f32) {
        self.state.set_target(target_rad);
    }

    #[inline]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Last good position (rad).
    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[inline]
    pub fn aux_state(&self) -> AuxState {
        self.aux.state()
    }

    #[inline]
    pub fn motor(&self) -> &HBridge<Fwd, Rev> {
        &self.motor
    }

    /// Lines dropped so far for exceeding the line buffer.
    #[inline]
    pub fn dropped_lines(&self) -> u32 {
        self.parser.overflows()
    }

    /// Stop the motor and hand back the hardware.
    pub fn free(mut self) -> (S, HBridge<Fwd, Rev>, AuxBank<A, B, C>) {
        self.motor.stop();
        (self.sensor, self.motor, self.aux)
    }
}
