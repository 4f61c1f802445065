// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Line assembler and classifier for the text command protocol.
//!
//! Bytes are fed in one at a time as they come off the UART. A line ends at `\n` or `\r`, so CRLF
//! senders produce one command and an empty line (which is ignored). Nothing is ever reported back
//! to the sender: lines that cannot be classified are dropped.

use heapless::Vec;

use crate::protocol::messages::*;
use crate::protocol::numeric::{parse_float_or_zero, parse_int_or_zero};

enum State {
    Collecting,
    /// Current line overflowed the buffer; drop bytes until the next terminator.
    Discarding,
}

pub struct Parser {
    state: State,
    line: Vec<u8, MAX_LINE_LEN>,
    overflows: u32,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    pub fn new() -> Self {
        Self {
            state: State::Collecting,
            line: Vec::new(),
            overflows: 0,
        }
    }

    /// Process a single incoming byte. Returns `Some(Command)` when it completes a usable line.
    pub fn push(&mut self, byte: u8) -> Option<Command> {
        let terminator = byte == b'\n' || byte == b'\r';

        match self.state {
            State::Discarding => {
                if terminator {
                    self.state = State::Collecting;
                }
                None
            }
            State::Collecting if terminator => {
                let cmd = classify(&self.line);
                #[cfg(feature = "defmt")]
                if cmd.is_none() && !trim(&self.line).is_empty() {
                    defmt::debug!("ignored command line: {=[u8]:a}", &self.line[..]);
                }
                self.line.clear();
                cmd
            }
            State::Collecting => {
                if self.line.push(byte).is_err() {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("command line longer than {} bytes dropped", MAX_LINE_LEN);
                    self.line.clear();
                    self.overflows = self.overflows.wrapping_add(1);
                    self.state = State::Discarding;
                }
                None
            }
        }
    }

    /// Number of lines dropped for exceeding [`MAX_LINE_LEN`].
    #[inline]
    pub fn overflows(&self) -> u32 {
        self.overflows
    }

    /// Drop any partially received line.
    pub fn reset(&mut self) {
        self.line.clear();
        self.state = State::Collecting;
    }
}

/// Classify one complete line, terminator excluded.
///
/// Returns `None` for blank lines and for auxiliary commands without a separator. Any other line
/// becomes a command, with unparsable numbers read as zero.
pub fn classify(line: &[u8]) -> Option<Command> {
    let line = trim(line);
    let (&first, rest) = line.split_first()?;

    match first {
        AUX_PREFIX => {
            let sep = rest.iter().position(|&b| b == AUX_SEPARATOR)?;
            let channel = parse_int_or_zero(utf8_prefix(&rest[..sep]));
            let state = parse_int_or_zero(utf8_prefix(&rest[sep + 1..]));
            Some(Command::AuxSet {
                channel,
                high: state != 0,
            })
        }
        _ => Some(Command::TargetSet {
            value: parse_float_or_zero(utf8_prefix(line)),
        }),
    }
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    let end = bytes
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &bytes[start..end]
}

/// Longest valid UTF-8 prefix. Numbers are ASCII, so anything after a bad byte is irrelevant.
fn utf8_prefix(bytes: &[u8]) -> &str {
    match core::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or(""),
    }
}
