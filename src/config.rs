// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Compile-time configuration for the position loop.
//!
//! Every tunable lives in [`ControlConfig`]. The defaults match the tuned values for the vine
//! station spool axis; nothing is persisted, so changing a value means reflashing.

use crate::error::Error;

/// Counts per mechanical revolution of the AS5600 (12-bit).
pub const AS5600_TICKS_PER_REV: u32 = 4096;

/// Wire channel numbers of the three auxiliary outputs.
pub const AUX_CHANNELS: [u8; 3] = [8, 9, 10];

/// Tunables for the single-axis position loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ControlConfig {
    /// Proportional gain (PWM counts per radian)
    pub kp: f32,
    /// Integral gain (PWM counts per accumulated radian)
    pub ki: f32,

    /// Error below which the motor is not driven and the integrator is cleared (rad)
    pub deadband_rad: f32,
    /// Anti-windup clamp on the integrator, symmetric
    pub integral_limit: f32,

    /// PWM floor that overcomes static friction (0..=255)
    pub min_pwm: u16,
    /// PWM ceiling (0..=255)
    pub max_pwm: u16,

    /// Encoder counts per output shaft revolution
    pub ticks_per_rev: u32,

    /// Allow-list of auxiliary output channels, in bank order.
    pub aux_channels: [u8; 3],

    /// Sleep at the end of every loop iteration.
    pub loop_delay_ms: u32,
    /// Wait before restarting after the sensor failed to probe.
    pub probe_retry_delay_ms: u32,
    /// Consecutive failed sensor reads tolerated before the loop gives up.
    pub sensor_fault_limit: u32,
    /// Upper bound on command bytes consumed in a single iteration.
    pub max_rx_bytes_per_step: usize,

    pub serial_baud: u32,
    pub pwm_frequency_hz: u32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            kp: 50.0,
            ki: 2.0,

            deadband_rad: 0.2,
            integral_limit: 50.0,

            min_pwm: 100,
            max_pwm: 255,

            ticks_per_rev: AS5600_TICKS_PER_REV,

            aux_channels: AUX_CHANNELS,

            loop_delay_ms: 1,
            probe_retry_delay_ms: 2000,
            sensor_fault_limit: 250,
            max_rx_bytes_per_step: 256,

            serial_baud: 921_600,
            pwm_frequency_hz: 1000,
        }
    }
}

impl ControlConfig {
    /// Set the deadband (rad).
    pub fn with_deadband(mut self, deadband_rad: f32) -> Self {
        self.deadband_rad = deadband_rad;
        self
    }

    /// Set the integral anti-windup limit.
    pub fn with_integral_limit(mut self, limit: f32) -> Self {
        self.integral_limit = limit;
        self
    }

    /// Set the PWM floor and ceiling.
    pub fn with_pwm_limits(mut self, min: u16, max: u16) -> Self {
        self.min_pwm = min;
        self.max_pwm = max;
        self
    }

    pub fn with_sensor_fault_limit(mut self, limit: u32) -> Self {
        self.sensor_fault_limit = limit;
        self
    }

    /// Radians per encoder count.
    #[inline]
    pub fn rad_per_tick(&self) -> f32 {
        core::f32::consts::TAU / self.ticks_per_rev as f32
    }

    /// Reject combinations the loop cannot honor.
    pub fn validate(&self) -> Result<(), Error> {
        if self.ticks_per_rev == 0 {
            return Err(Error::InvalidConfig("ticks_per_rev must be nonzero"));
        }
        if !(self.deadband_rad >= 0.0) {
            return Err(Error::InvalidConfig("deadband must be non-negative"));
        }
        if !(self.integral_limit >= 0.0) {
            return Err(Error::InvalidConfig("integral limit must be non-negative"));
        }
        if self.min_pwm > self.max_pwm {
            return Err(Error::InvalidConfig("min_pwm exceeds max_pwm"));
        }
        if self.max_pwm > 255 {
            return Err(Error::InvalidConfig("max_pwm exceeds 8-bit range"));
        }
        if self.sensor_fault_limit == 0 {
            return Err(Error::InvalidConfig("sensor_fault_limit must be nonzero"));
        }
        Ok(())
    }
}
