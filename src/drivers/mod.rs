// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Device-Specific Drivers
//!
//! This module contains device-specific drivers that sit above the raw `hw/` layer and below the
//! application logic.
//!
//! ## Existing drivers
//!
//! - [`as5600`] – ams AS5600 12-bit magnetic angle sensor over I2C, with multi-turn tracking
//! - [`hbridge`] – Two-channel PWM H-bridge with duty floor and ceiling

pub mod as5600;
pub mod hbridge;

pub use as5600::{As5600, PositionSensor};
pub use hbridge::{Direction, HBridge};
