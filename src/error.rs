// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Error and fatal-outcome types.
//!
//! [`Error`] covers everything a single loop iteration can run into. [`Fatal`] is the smaller set
//! of conditions after which the firmware stops controlling the motor; the binary decides what to
//! do about it (currently: report and reset the MCU).

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The position sensor did not answer on the bus.
    #[error("position sensor not detected")]
    SensorNotDetected,

    /// A single position read failed.
    #[error("position sensor read failed")]
    SensorRead,

    /// Too many position reads in a row failed.
    #[error("position sensor lost after {consecutive} failed reads")]
    SensorLost { consecutive: u32 },

    /// Driving an auxiliary output pin failed.
    #[error("failed to drive auxiliary output {channel}")]
    AuxOutput { channel: u8 },

    /// Writing to the status channel failed.
    #[error("failed to write status line")]
    StatusWrite,

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Unrecoverable outcome of bringing up or running the position loop.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fatal {
    #[error("position sensor not detected")]
    SensorNotDetected,

    #[error("position sensor lost after {consecutive} failed reads")]
    SensorLost { consecutive: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl Fatal {
    /// One-line report written to the serial link before the MCU resets.
    pub fn report(&self) -> &'static str {
        match self {
            Fatal::SensorNotDetected => "AS5600 not detected. Restarting...",
            Fatal::SensorLost { .. } => "AS5600 lost. Restarting...",
            Fatal::InvalidConfig(_) => "Invalid configuration. Restarting...",
        }
    }
}
