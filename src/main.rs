// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

#![no_main]
#![no_std]

use cortex_m::{delay::Delay, peripheral::SCB};
use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use hal::{
    i2c::{BlockingI2c, Mode},
    pac,
    prelude::*,
    serial::{Config, Serial},
    timer::{Channel1, Channel2},
};
use stm32f7xx_hal as hal;

use vinestation::{
    control::PositionLoop,
    drivers::As5600,
    hw::{BoardPins, Usart},
    ControlConfig, Fatal,
};

#[entry]
fn main() -> ! {
    // Peripherals
    let (Some(dp), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) else {
        panic!("peripherals already taken");
    };

    let config = ControlConfig::default();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.sysclk(216.MHz()).freeze();
    let mut apb1 = rcc.apb1;

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOD, dp.GPIOE);

    // USART1 (host link)
    let usart_cfg = Config {
        baud_rate: config.serial_baud.bps(),
        ..Default::default()
    };
    let serial = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    let mut usart = Usart::new(serial);

    // SysTick delay from cortex-m, needs core clock in Hz (u32)
    let mut delay = Delay::new(cp.SYST, clocks.sysclk().raw());

    // I2C1 (AS5600)
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (pins.i2c1.scl, pins.i2c1.sda),
        Mode::fast(400_000.Hz()),
        &clocks,
        &mut apb1,
        50_000,
    );
    let sensor = As5600::with_ticks_per_rev(i2c, config.ticks_per_rev);

    // TIM4 CH1/CH2 (H-bridge)
    let (fwd, rev) = dp
        .TIM4
        .pwm_hz(
            (Channel1::new(pins.motor.fwd), Channel2::new(pins.motor.rev)),
            config.pwm_frequency_hz.Hz(),
            &clocks,
        )
        .split();
    let aux = (pins.aux.ch8, pins.aux.ch9, pins.aux.ch10);

    let fatal = match PositionLoop::initialize(sensor, fwd, rev, aux, config) {
        Ok(mut axis) => match axis.run(&mut usart, &mut delay) {
            Ok(never) => match never {},
            Err(fatal) => fatal,
        },
        Err(fatal) => fatal,
    };

    restart(&mut usart, &mut delay, fatal, config.probe_retry_delay_ms)
}

/// Report `fatal` on the host link, wait, and reset the MCU to retry from scratch.
fn restart<U: hal::serial::Instance>(
    usart: &mut Usart<U>,
    delay: &mut Delay,
    fatal: Fatal,
    wait_ms: u32,
) -> ! {
    defmt::error!("{}", fatal);
    usart.println(fatal.report());
    usart.flush();
    delay.delay_ms(wait_ms);
    SCB::sys_reset()
}
