// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # Control Algorithms
//!
//! Closed-loop position control for the single motor axis.
//!
//! ## Modules
//!
//! - [`pi`] - PI law with deadband, anti-windup and inverted output polarity.
//! - [`position_loop`] - Sensor read, command intake, control and status reporting per iteration.

pub mod pi;
pub mod position_loop;

pub use pi::{Actuation, ControllerState, PiController};
pub use position_loop::{PositionLoop, StepReport};
