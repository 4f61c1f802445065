// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Auxiliary digital outputs switched from the command channel.
//!
//! The three outputs are addressed on the wire by channel number (see
//! [`AUX_CHANNELS`](crate::config::AUX_CHANNELS)), not by their position in the bank.

use embedded_hal::digital::v2::OutputPin;

use crate::error::Error;

/// Push-pull output that remembers its last commanded level.
pub struct AuxOutput<PIN: OutputPin> {
    pin: PIN,
    is_high: bool,
}

impl<PIN: OutputPin> AuxOutput<PIN> {
    /// Wrap a pin and drive it LOW.
    pub fn new(mut pin: PIN) -> Self {
        pin.set_low().ok();
        Self {
            pin,
            is_high: false,
        }
    }

    /// Drive the pin HIGH (true) or LOW (false).
    pub fn set(&mut self, high: bool) -> Result<(), PIN::Error> {
        if high {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.is_high = high;
        Ok(())
    }

    #[inline]
    pub fn is_high(&self) -> bool {
        self.is_high
    }
}

/// Snapshot of the three auxiliary levels, in bank order.
pub type AuxState = [bool; 3];

/// The three auxiliary outputs, addressed by wire channel number.
pub struct AuxBank<A: OutputPin, B: OutputPin, C: OutputPin> {
    a: AuxOutput<A>,
    b: AuxOutput<B>,
    c: AuxOutput<C>,
    channels: [u8; 3],
}

impl<A: OutputPin, B: OutputPin, C: OutputPin> AuxBank<A, B, C> {
    /// Build the bank with every output LOW. `channels[i]` is the wire number of the i-th pin.
    pub fn new(a: A, b: B, c: C, channels: [u8; 3]) -> Self {
        Self {
            a: AuxOutput::new(a),
            b: AuxOutput::new(b),
            c: AuxOutput::new(c),
            channels,
        }
    }

    fn slot(&self, channel: u8) -> Option<usize> {
        self.channels.iter().position(|&c| c == channel)
    }

    /// Drive the output for a wire channel.
    ///
    /// Returns `Ok(false)` without touching any pin if the channel is not on the allow-list.
    pub fn set(&mut self, channel: u8, high: bool) -> Result<bool, Error> {
        let failed = Error::AuxOutput { channel };
        match self.slot(channel) {
            Some(0) => self.a.set(high).map_err(|_| failed)?,
            Some(1) => self.b.set(high).map_err(|_| failed)?,
            Some(2) => self.c.set(high).map_err(|_| failed)?,
            _ => return Ok(false),
        }
        Ok(true)
    }

    /// Level last commanded on a wire channel, or `None` if not on the allow-list.
    pub fn get(&self, channel: u8) -> Option<bool> {
        match self.slot(channel)? {
            0 => Some(self.a.is_high()),
            1 => Some(self.b.is_high()),
            _ => Some(self.c.is_high()),
        }
    }

    pub fn state(&self) -> AuxState {
        [self.a.is_high(), self.b.is_high(), self.c.is_high()]
    }
}
