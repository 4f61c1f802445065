// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line-oriented text protocol spoken over the serial link.
//!
//! Inbound, one command per line:
//!
//! | Line | Meaning |
//! | ---- | ------- |
//! | `P<channel>:<state>` | Set auxiliary output `channel` HIGH (state != 0) or LOW |
//! | `<float>` | New target position in radians; anything unparsable reads as 0 |
//!
//! Outbound, one line per loop iteration: the measured position in radians with four decimals.

/// Prefix of an auxiliary output command.
pub const AUX_PREFIX: u8 = b'P';

/// Separator between channel and state in an auxiliary command.
pub const AUX_SEPARATOR: u8 = b':';

/// Decimal places in an outbound status line.
pub const STATUS_PRECISION: usize = 4;

/// Longest accepted inbound line, terminator excluded.
pub const MAX_LINE_LEN: usize = 64;

/// One classified inbound line.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Drive auxiliary output `channel` HIGH (`true`) or LOW.
    ///
    /// `channel` is whatever number the sender wrote; the allow-list is applied when the command is
    /// executed.
    AuxSet { channel: i32, high: bool },

    /// New target position (rad).
    TargetSet { value: f32 },
}
