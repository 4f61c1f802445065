// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Pin definitions for the STM32F777 VineStation controller board.

use stm32f7xx_hal::{
    gpio::{gpioa, gpiob, gpiod, gpioe, Alternate, OpenDrain, Output, PushPull},
    pac,
    prelude::*,
};

/// All board pins. Construct this once at startup using:
///
/// ```ignore
/// let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);
/// ```
pub struct BoardPins {
    pub usart1: Usart1Pins,
    pub i2c1: I2c1Pins,
    pub motor: MotorPins,
    pub aux: AuxPins,
}

pub struct Usart1Pins {
    pub tx: gpioa::PA9<Alternate<7>>,
    pub rx: gpioa::PA10<Alternate<7>>,
}

/// I2C1 bus to the AS5600
pub struct I2c1Pins {
    pub scl: gpiob::PB8<Alternate<4, OpenDrain>>,
    pub sda: gpiob::PB9<Alternate<4, OpenDrain>>,
}

/// H-bridge inputs
pub struct MotorPins {
    pub fwd: gpiod::PD12<Alternate<2>>, // TIM4_CH1 (PWM)
    pub rev: gpiod::PD13<Alternate<2>>, // TIM4_CH2 (PWM)
}

/// Auxiliary outputs, wire channels 8/9/10
pub struct AuxPins {
    pub ch8: gpioe::PE7<Output<PushPull>>,
    pub ch9: gpioe::PE8<Output<PushPull>>,
    pub ch10: gpioe::PE9<Output<PushPull>>,
}

impl BoardPins {
    /// Create all named pins from raw GPIO peripherals.
    pub fn new(gpioa: pac::GPIOA, gpiob: pac::GPIOB, gpiod: pac::GPIOD, gpioe: pac::GPIOE) -> Self {
        let gpioa = gpioa.split();
        let gpiob = gpiob.split();
        let gpiod = gpiod.split();
        let gpioe = gpioe.split();

        Self {
            usart1: Usart1Pins {
                tx: gpioa.pa9.into_alternate::<7>(),
                rx: gpioa.pa10.into_alternate::<7>(),
            },

            i2c1: I2c1Pins {
                scl: gpiob.pb8.into_alternate_open_drain::<4>(),
                sda: gpiob.pb9.into_alternate_open_drain::<4>(),
            },

            motor: MotorPins {
                fwd: gpiod.pd12.into_alternate::<2>(),
                rev: gpiod.pd13.into_alternate::<2>(),
            },

            aux: AuxPins {
                ch8: gpioe.pe7.into_push_pull_output(),
                ch9: gpioe.pe8.into_push_pull_output(),
                ch10: gpioe.pe9.into_push_pull_output(),
            },
        }
    }
}
