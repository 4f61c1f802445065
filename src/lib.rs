// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! # VineStation Firmware
//!
//! This crate contains the firmware for the VineStation single-axis position controller, written
//! in Rust, targeting an STM32F777 MCU.
//!
//! A host sends text lines over the serial link (a target angle in radians, or `P<ch>:<0|1>` for
//! an auxiliary output) and receives the measured angle back as one line per control iteration.
//!
//! ## Crate Structure
//!
//! | Module | Purpose |
//! | ------ | -------- |
//! | [`hw`] | MCU-level wrappers around USART, GPIO outputs and pin mapping |
//! | [`drivers`] | Device-level drivers (AS5600, PWM H-bridge) |
//! | [`protocol`] | Line-oriented command parser and status formatting |
//! | [`control`] | PI law and the position loop |
//! | [`config`] | Tunable constants |
//! | [`error`] | Error types |
//!
//! ## Getting Started
//!
//! Run the host tests:
//!
//! ```bash
//! cargo test
//! ```
//!
//! Flash the board:
//!
//! ```bash
//! cargo flash
//! ```
//!
//! ## License
//!
//! Licensed under the **MIT License**.
//! See the `LICENSE` file in the repository root for full terms.
//!
//! © 2025–2026 Christopher Liu

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod control;
pub mod drivers;
pub mod error;
pub mod hw;
pub mod protocol;

#[cfg(test)]
mod mock;

pub use config::ControlConfig;
pub use error::{Error, Fatal};
