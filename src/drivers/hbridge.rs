// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Two-input H-bridge driven by a pair of complementary PWM channels.
//!
//! IN1 carries the forward duty and IN2 the reverse duty; at most one of them is ever nonzero.
//! Commands are in 8-bit duty units (0..=255) and are rescaled to whatever resolution the timer
//! reports through `get_max_duty()`.

use embedded_hal::PwmPin;

/// Full-scale value of the 8-bit duty units used by [`HBridge::drive`].
pub const DUTY_FULL_SCALE: u16 = 255;

/// Logical drive direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Forward,
    Reverse,
    Stopped,
}

/// Motor output stage. This is the only writer to its two PWM channels.
pub struct HBridge<Fwd, Rev> {
    fwd: Fwd,
    rev: Rev,
    min_duty: u16,
    max_duty: u16,
    /// Last commanded (forward, reverse) pair in 8-bit units
    last: (u16, u16),
}

impl<Fwd, Rev> HBridge<Fwd, Rev>
where
    Fwd: PwmPin<Duty = u16>,
    Rev: PwmPin<Duty = u16>,
{
    /// Take ownership of both channels, silence them and enable the outputs.
    ///
    /// `min_duty`/`max_duty` are the floor and ceiling applied to every nonzero command.
    pub fn new(fwd: Fwd, rev: Rev, min_duty: u16, max_duty: u16) -> Self {
        let max_duty = max_duty.min(DUTY_FULL_SCALE);
        let mut bridge = Self {
            fwd,
            rev,
            min_duty: min_duty.min(max_duty),
            max_duty,
            last: (0, 0),
        };
        bridge.enable();
        bridge
    }

    /// Enable both channels at zero duty.
    pub fn enable(&mut self) {
        self.stop();
        self.fwd.enable();
        self.rev.enable();
    }

    /// Silence and disable both channels.
    pub fn disable(&mut self) {
        self.stop();
        self.fwd.disable();
        self.rev.disable();
    }

    /// Drive the motor with a signed 8-bit-unit command.
    ///
    /// Positive drives IN1, negative drives IN2, zero silences both. Nonzero magnitudes are
    /// clamped into `[min_duty, max_duty]`.
    pub fn drive(&mut self, command: i32) {
        match command.signum() {
            1 => {
                let duty = self.clamp(command.unsigned_abs());
                self.write(duty, 0);
            }
            -1 => {
                let duty = self.clamp(command.unsigned_abs());
                self.write(0, duty);
            }
            _ => self.stop(),
        }
    }

    /// Both channels to zero.
    #[inline]
    pub fn stop(&mut self) {
        self.write(0, 0);
    }

    /// Last commanded (forward, reverse) duty in 8-bit units.
    #[inline]
    pub fn duty(&self) -> (u16, u16) {
        self.last
    }

    pub fn direction(&self) -> Direction {
        match self.last {
            (0, 0) => Direction::Stopped,
            (_, 0) => Direction::Forward,
            _ => Direction::Reverse,
        }
    }

    #[inline]
    fn clamp(&self, magnitude: u32) -> u16 {
        magnitude.clamp(self.min_duty as u32, self.max_duty as u32) as u16
    }

    fn write(&mut self, fwd: u16, rev: u16) {
        let fwd_scaled = scale(fwd, self.fwd.get_max_duty());
        let rev_scaled = scale(rev, self.rev.get_max_duty());
        self.fwd.set_duty(fwd_scaled);
        self.rev.set_duty(rev_scaled);
        self.last = (fwd, rev);
    }
}

/// Map an 8-bit-unit duty onto a timer whose full scale is `max`.
#[inline]
fn scale(duty: u16, max: u16) -> u16 {
    ((duty as u32 * max as u32) / DUTY_FULL_SCALE as u32) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPwm;

    fn bridge(max: u16) -> (HBridge<MockPwm, MockPwm>, MockPwm, MockPwm) {
        let fwd = MockPwm::new(max);
        let rev = MockPwm::new(max);
        let b = HBridge::new(fwd.clone(), rev.clone(), 100, 255);
        (b, fwd, rev)
    }

    #[test]
    fn starts_enabled_and_silent() {
        let (b, fwd, rev) = bridge(255);
        assert!(fwd.enabled() && rev.enabled());
        assert_eq!((fwd.duty(), rev.duty()), (0, 0));
        assert_eq!(b.direction(), Direction::Stopped);
    }

    #[test]
    fn positive_drives_forward_only() {
        let (mut b, fwd, rev) = bridge(255);
        b.drive(180);
        assert_eq!((fwd.duty(), rev.duty()), (180, 0));
        assert_eq!(b.direction(), Direction::Forward);
    }

    #[test]
    fn negative_mirrors_onto_reverse() {
        let (mut b, fwd, rev) = bridge(255);
        b.drive(-180);
        assert_eq!((fwd.duty(), rev.duty()), (0, 180));
        assert_eq!(b.direction(), Direction::Reverse);
    }

    #[test]
    fn small_commands_lift_to_floor() {
        let (mut b, fwd, rev) = bridge(255);
        b.drive(1);
        assert_eq!(fwd.duty(), 100);
        b.drive(-3);
        assert_eq!((fwd.duty(), rev.duty()), (0, 100));
    }

    #[test]
    fn large_commands_saturate() {
        let (mut b, fwd, _rev) = bridge(255);
        b.drive(i32::MAX);
        assert_eq!(fwd.duty(), 255);
        b.drive(i32::MIN);
        assert_eq!(b.duty(), (0, 255));
    }

    #[test]
    fn zero_silences_both() {
        let (mut b, fwd, rev) = bridge(255);
        b.drive(200);
        b.drive(0);
        assert_eq!((fwd.duty(), rev.duty()), (0, 0));
    }

    #[test]
    fn clamp_law_holds_for_any_command() {
        let (mut b, _fwd, _rev) = bridge(255);
        for cmd in (-600..=600).step_by(7) {
            b.drive(cmd);
            let (f, r) = b.duty();
            if cmd == 0 {
                assert_eq!((f, r), (0, 0));
            } else {
                assert!((f == 0) ^ (r == 0), "exactly one channel for {cmd}");
                let d = f.max(r);
                assert!((100..=255).contains(&d), "duty {d} for {cmd}");
            }
        }
    }

    #[test]
    fn rescales_to_timer_resolution() {
        let (mut b, fwd, _rev) = bridge(1000);
        b.drive(255);
        assert_eq!(fwd.duty(), 1000);
        b.drive(100);
        assert_eq!(fwd.duty(), 392);
        assert_eq!(b.duty(), (100, 0));
    }

    #[test]
    fn disable_silences_and_disables() {
        let (mut b, fwd, rev) = bridge(255);
        b.drive(150);
        b.disable();
        assert_eq!((fwd.duty(), rev.duty()), (0, 0));
        assert!(!fwd.enabled() && !rev.enabled());
    }
}
