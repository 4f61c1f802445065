// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Outbound status lines.

use core::fmt::Write;

use crate::error::Error;
use crate::protocol::messages::STATUS_PRECISION;

/// Write the measured position as one CRLF-terminated line, e.g. `-1.5708\r\n`.
pub fn write_status<W: Write>(out: &mut W, position_rad: f32) -> Result<(), Error> {
    write!(out, "{:.*}\r\n", STATUS_PRECISION, position_rad).map_err(|_| Error::StatusWrite)
}
