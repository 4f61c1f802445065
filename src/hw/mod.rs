// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod aux_output;

#[cfg(feature = "board")]
pub mod pins;
#[cfg(feature = "board")]
pub mod usart;

pub use aux_output::{AuxBank, AuxOutput};

#[cfg(feature = "board")]
pub use pins::BoardPins;
#[cfg(feature = "board")]
pub use usart::Usart;
