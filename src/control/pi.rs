// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! PI position law with deadband and integral anti-windup.
//!
//! Works in `no_std` and does not allocate memory. The controller itself only holds gains and
//! limits; the mutable part (target and integrator) lives in [`ControllerState`], which the
//! position loop owns.

#[allow(unused_imports)]
use micromath::F32Ext;

use crate::config::ControlConfig;

/// Mutable controller state, owned by the position loop.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ControllerState {
    /// Commanded position (rad)
    target_rad: f32,
    /// Integrator, always within the configured anti-windup limit
    integral: f32,
}

impl ControllerState {
    /// State holding `target_rad` with an empty integrator.
    pub fn new(target_rad: f32) -> Self {
        Self {
            target_rad,
            integral: 0.0,
        }
    }

    /// Set a new target and clear the integrator.
    pub fn set_target(&mut self, target_rad: f32) {
        self.target_rad = target_rad;
        self.integral = 0.0;
    }

    #[inline]
    pub fn target(&self) -> f32 {
        self.target_rad
    }

    #[inline]
    pub fn integral(&self) -> f32 {
        self.integral
    }
}

/// Result of one controller evaluation.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Actuation {
    /// `target - position` (rad)
    pub error: f32,
    /// `kp * error + ki * integral`, before polarity inversion
    pub signal: f32,
    /// Signed PWM command for the H-bridge, 0 inside the deadband
    pub command: i32,
    /// Error was within the deadband; the motor must not be driven
    pub in_deadband: bool,
}

/// PI gains and limits.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PiController {
    /// Proportional gain
    kp: f32,
    /// Integral gain
    ki: f32,

    /// Error magnitude at or below which nothing is driven
    deadband: f32,

    /// Integral anti-windup clamp
    int_limit: f32,
}

impl PiController {
    /// Create a new PI controller with no deadband and no integral limit.
    pub fn new(kp: f32, ki: f32) -> Self {
        Self {
            kp,
            ki,
            deadband: 0.0,
            int_limit: f32::INFINITY,
        }
    }

    /// Build from the loop configuration.
    pub fn from_config(cfg: &ControlConfig) -> Self {
        Self::new(cfg.kp, cfg.ki)
            .with_deadband(cfg.deadband_rad)
            .with_integral_limit(cfg.integral_limit)
    }

    /// Set the deadband (rad).
    pub fn with_deadband(mut self, deadband: f32) -> Self {
        self.deadband = deadband;
        self
    }

    /// Set the symmetric integral limit for anti-windup. The sign of `limit` is ignored.
    pub fn with_integral_limit(mut self, limit: f32) -> Self {
        self.int_limit = limit.abs();
        self
    }

    /// Evaluate the control law once.
    ///
    /// Outside the deadband the error is accumulated (clamped to the integral limit) and the PI
    /// signal is turned into a motor command. Inside the deadband the integrator is cleared and the
    /// command is 0 regardless of the signal.
    ///
    /// The command is the *negated* signal, truncated toward zero: a positive error drives the
    /// reverse channel. This matches the motor wiring and must not be "corrected".
    pub fn update(&self, state: &mut ControllerState, position_rad: f32) -> Actuation {
        let error = state.target_rad - position_rad;

        if error.abs() > self.deadband {
            // A NaN limit leaves the integrator unbounded.
            state.integral = (state.integral + error)
                .max(-self.int_limit)
                .min(self.int_limit);
        } else {
            state.integral = 0.0;
            return Actuation {
                error,
                signal: 0.0,
                command: 0,
                in_deadband: true,
            };
        }

        let signal = self.kp * error + self.ki * state.integral;

        // Saturating float-to-int cast, truncates toward zero.
        let command = (-signal) as i32;

        Actuation {
            error,
            signal,
            command,
            in_deadband: false,
        }
    }
}
