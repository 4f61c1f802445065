// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! AMS AS5600 12-bit magnetic rotary encoder over I2C.
//!
//! The chip only reports an absolute angle within one revolution. This driver tracks wraps between
//! consecutive reads and keeps a signed multi-turn tick counter, so the reported position is
//! continuous across revolutions as long as the shaft turns less than half a revolution between
//! reads.

use embedded_hal::blocking::i2c::WriteRead;

use crate::error::Error;

/// Fixed 7-bit bus address.
pub const ADDRESS: u8 = 0x36;

/// Counts per revolution.
pub const TICKS_PER_REV: i32 = 4096;

const HALF_REV: i32 = TICKS_PER_REV / 2;

// Register addresses
pub mod reg {
    pub const STATUS: u8 = 0x0B;
    pub const RAW_ANGLE: u8 = 0x0C;
    pub const ANGLE: u8 = 0x0E;
    pub const AGC: u8 = 0x1A;
    pub const MAGNITUDE: u8 = 0x1B;
}

/// STATUS register.
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    raw: u8,
}

impl Status {
    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Magnet was detected.
    #[inline]
    pub fn magnet_detected(&self) -> bool {
        (self.raw & (1 << 5)) != 0
    }

    /// AGC maximum gain overflow, magnet too weak.
    #[inline]
    pub fn magnet_too_weak(&self) -> bool {
        (self.raw & (1 << 4)) != 0
    }

    /// AGC minimum gain overflow, magnet too strong.
    #[inline]
    pub fn magnet_too_strong(&self) -> bool {
        (self.raw & (1 << 3)) != 0
    }
}

/// Source of the current shaft angle, in radians, unbounded across revolutions.
pub trait PositionSensor {
    /// Check the device answers on its bus.
    fn probe(&mut self) -> Result<(), Error>;

    /// Current cumulative angle in radians.
    fn read_position(&mut self) -> Result<f32, Error>;

    /// Counts per output revolution used to scale readings.
    fn ticks_per_rev(&self) -> u32;
}

/// AS5600 driver owning its I2C bus.
pub struct As5600<I2C> {
    i2c: I2C,
    /// Signed multi-turn count
    position: i32,
    /// Last 12-bit angle seen, used to detect wraps
    last_angle: i32,
    ticks_per_rev: u32,
    rad_per_tick: f32,
}

impl<I2C, E> As5600<I2C>
where
    I2C: WriteRead<Error = E>,
{
    /// Wrap an I2C bus. The multi-turn counter starts as if the previous angle was 0.
    pub fn new(i2c: I2C) -> Self {
        Self::with_ticks_per_rev(i2c, TICKS_PER_REV as u32)
    }

    /// Same as [`new`](Self::new), scaling radians by a custom counts-per-revolution.
    ///
    /// Useful when a gear train sits between the magnet and the output shaft.
    pub fn with_ticks_per_rev(i2c: I2C, ticks_per_rev: u32) -> Self {
        Self {
            i2c,
            position: 0,
            last_angle: 0,
            ticks_per_rev,
            rad_per_tick: core::f32::consts::TAU / ticks_per_rev as f32,
        }
    }

    fn read_u8(&mut self, addr: u8) -> Result<u8, E> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(ADDRESS, &[addr], &mut buf)?;
        Ok(buf[0])
    }

    /// Read a 12-bit value stored big-endian across `addr` and `addr + 1`.
    fn read_u12(&mut self, addr: u8) -> Result<u16, E> {
        let mut buf = [0u8; 2];
        self.i2c.write_read(ADDRESS, &[addr], &mut buf)?;
        Ok(u16::from_be_bytes(buf) & 0x0FFF)
    }

    /// Read the STATUS register.
    pub fn read_status(&mut self) -> Result<Status, E> {
        Ok(Status {
            raw: self.read_u8(reg::STATUS)?,
        })
    }

    /// Read the automatic gain control value.
    pub fn read_agc(&mut self) -> Result<u8, E> {
        self.read_u8(reg::AGC)
    }

    /// Read the scaled angle (0..4095), after the chip's start/stop position mapping.
    pub fn read_angle_raw(&mut self) -> Result<u16, E> {
        self.read_u12(reg::ANGLE)
    }

    /// Read the CORDIC magnitude (12-bit).
    pub fn read_magnitude(&mut self) -> Result<u16, E> {
        self.read_u12(reg::MAGNITUDE)
    }

    /// Read the angle and fold it into the multi-turn counter.
    pub fn cumulative_ticks(&mut self) -> Result<i32, E> {
        let angle = self.read_angle_raw()? as i32;
        self.position = accumulate(self.position, self.last_angle, angle);
        self.last_angle = angle;
        Ok(self.position)
    }

    /// Last multi-turn count, without touching the bus.
    #[inline]
    pub fn last_cumulative_ticks(&self) -> i32 {
        self.position
    }

    /// Re-zero the multi-turn counter at the current shaft angle.
    pub fn reset_cumulative(&mut self) -> Result<(), E> {
        self.last_angle = self.read_angle_raw()? as i32;
        self.position = 0;
        Ok(())
    }

    /// Convert a multi-turn count to radians.
    #[inline]
    pub fn ticks_to_rad(&self, ticks: i32) -> f32 {
        ticks as f32 * self.rad_per_tick
    }
}

impl<I2C, E> PositionSensor for As5600<I2C>
where
    I2C: WriteRead<Error = E>,
{
    fn probe(&mut self) -> Result<(), Error> {
        let _status = self.read_status().map_err(|_| Error::SensorNotDetected)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "AS5600 found: magnet detected={} weak={} strong={}",
            _status.magnet_detected(),
            _status.magnet_too_weak(),
            _status.magnet_too_strong()
        );

        Ok(())
    }

    fn read_position(&mut self) -> Result<f32, Error> {
        let ticks = self.cumulative_ticks().map_err(|_| Error::SensorRead)?;
        Ok(self.ticks_to_rad(ticks))
    }

    #[inline]
    fn ticks_per_rev(&self) -> u32 {
        self.ticks_per_rev
    }
}

/// Advance a multi-turn count from `last` to `angle`.
///
/// A jump of more than half a revolution is taken as a wrap through zero.
fn accumulate(position: i32, last: i32, angle: i32) -> i32 {
    if last > HALF_REV && angle < last - HALF_REV {
        // Forward through 4095 -> 0
        position.wrapping_add(TICKS_PER_REV - last + angle)
    } else if angle > HALF_REV && last < angle - HALF_REV {
        // Backward through 0 -> 4095
        position.wrapping_sub(TICKS_PER_REV + last - angle)
    } else {
        position.wrapping_add(angle - last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockAs5600, MockI2c};

    fn sensor() -> (As5600<MockI2c>, MockAs5600) {
        let (i2c, chip) = MockI2c::as5600();
        (As5600::new(i2c), chip)
    }

    #[test]
    fn first_read_counts_from_zero() {
        let (mut enc, chip) = sensor();
        chip.set_angle(1000);
        assert_eq!(enc.cumulative_ticks().unwrap(), 1000);
    }

    #[test]
    fn tracks_forward_wrap() {
        let (mut enc, chip) = sensor();
        for angle in [1000, 2000, 3000, 4000] {
            chip.set_angle(angle);
            enc.cumulative_ticks().unwrap();
        }
        chip.set_angle(100);
        assert_eq!(enc.cumulative_ticks().unwrap(), 4096 + 100);
    }

    #[test]
    fn first_read_past_half_turn_books_backward_wrap() {
        let (mut enc, chip) = sensor();
        chip.set_angle(4000);
        assert_eq!(enc.cumulative_ticks().unwrap(), -96);
        chip.set_angle(100);
        assert_eq!(enc.cumulative_ticks().unwrap(), 100);
    }

    #[test]
    fn tracks_backward_wrap() {
        let (mut enc, chip) = sensor();
        chip.set_angle(100);
        enc.cumulative_ticks().unwrap();
        chip.set_angle(4000);
        assert_eq!(enc.cumulative_ticks().unwrap(), 100 - 196);
    }

    #[test]
    fn multi_turn_position_is_unbounded() {
        let (mut enc, chip) = sensor();
        // Three full revolutions in 1024-count steps.
        for i in 1..=12 {
            chip.set_angle(((i * 1024) % 4096) as u16);
            enc.cumulative_ticks().unwrap();
        }
        let rad = enc.ticks_to_rad(enc.last_cumulative_ticks());
        assert!((rad - 3.0 * core::f32::consts::TAU).abs() < 1e-4);
    }

    #[test]
    fn read_position_scales_to_radians() {
        let (mut enc, chip) = sensor();
        chip.set_angle(1024);
        let rad = enc.read_position().unwrap();
        assert!((rad - core::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn masks_upper_nibble() {
        let (mut enc, chip) = sensor();
        chip.set_register(reg::ANGLE, 0xF4);
        chip.set_register(reg::ANGLE + 1, 0x00);
        assert_eq!(enc.read_angle_raw().unwrap(), 0x400);
    }

    #[test]
    fn reset_rezeroes_at_current_angle() {
        let (mut enc, chip) = sensor();
        chip.set_angle(3000);
        enc.cumulative_ticks().unwrap();
        enc.reset_cumulative().unwrap();
        chip.set_angle(3010);
        assert_eq!(enc.cumulative_ticks().unwrap(), 10);
    }

    #[test]
    fn probe_fails_when_absent() {
        let (mut enc, chip) = sensor();
        chip.set_present(false);
        assert_eq!(enc.probe(), Err(Error::SensorNotDetected));
        chip.set_present(true);
        assert_eq!(enc.probe(), Ok(()));
    }

    #[test]
    fn read_failure_maps_to_sensor_read() {
        let (mut enc, chip) = sensor();
        chip.set_present(false);
        assert_eq!(enc.read_position(), Err(Error::SensorRead));
    }

    #[test]
    fn status_flags() {
        let (mut enc, chip) = sensor();
        chip.set_register(reg::STATUS, 0b0011_0000);
        let status = enc.read_status().unwrap();
        assert!(status.magnet_detected());
        assert!(status.magnet_too_weak());
        assert!(!status.magnet_too_strong());
    }

    #[test]
    fn reports_scale() {
        let (i2c, _chip) = MockI2c::as5600();
        assert_eq!(As5600::new(i2c).ticks_per_rev(), 4096);
        let (i2c, _chip) = MockI2c::as5600();
        assert_eq!(As5600::with_ticks_per_rev(i2c, 8192).ticks_per_rev(), 8192);
    }

    #[test]
    fn magnitude_and_gain() {
        let (mut enc, chip) = sensor();
        chip.set_register(reg::MAGNITUDE, 0xF5);
        chip.set_register(reg::MAGNITUDE + 1, 0x5A);
        chip.set_register(reg::AGC, 128);
        assert_eq!(enc.read_magnitude(), Ok(0x055A));
        assert_eq!(enc.read_agc(), Ok(128));
    }
}
