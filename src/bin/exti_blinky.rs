//! STM32 Blue Pill Interrupt-Driven Button/LED Firmware
//! =============================================================================================
//!
//! Two buttons on EXTI lines toggle two LEDs. The EXTI handlers only acknowledge
//! their line and set a flag; the main loop turns flags into toggles and sleeps
//! in between.
//!
//! Hardware Connections:
//!   Yellow LED -> PB12 (through a resistor to GND)
//!   Blue LED   -> PB13 (through a resistor to GND)
//!   Button 1   -> PA0 to 3V3 (internal pull-down, rising edge)
//!   Button 2   -> PB1 to GND (internal pull-up, falling edge)
//!
//! Build / flash (the crate has no default target, host builds are for tests):
//!   cargo run --release --features stm32 --target thumbv7m-none-eabi
//!
//! Expected Behavior:
//!   - Pressing Button 1 toggles the yellow LED
//!   - Pressing Button 2 toggles the blue LED
//!   - Switch bounce is not filtered, a noisy button may toggle more than once

#![no_std]
#![no_main]

use cortex_m::asm;
use cortex_m_rt::entry;
use embassy_stm32::gpio::Flex;
use exti_blinky::board;
use exti_blinky::config::{self, IdleMode};
use exti_blinky::hardware::stm32::{Stm32Exti, Stm32Gpio};
use {defmt_rtt as _, panic_probe as _};

#[entry]
fn main() -> ! {
    // Default clock tree: HSI 8MHz
    let p = embassy_stm32::init(Default::default());
    defmt::info!("exti-blinky starting");

    // Physical pins behind the names in `config`
    let mut gpio = Stm32Gpio::new();
    for (pin, line) in [
        (config::YELLOW_LED.pin, Flex::new(p.PB12)),
        (config::BLUE_LED.pin, Flex::new(p.PB13)),
        (config::BUTTON_1.pin, Flex::new(p.PA0)),
        (config::BUTTON_2.pin, Flex::new(p.PB1)),
    ] {
        defmt::unwrap!(gpio.attach(pin, line));
    }

    let exti = Stm32Exti::new();

    // A misconfigured board must not reach the loop
    if let Err(e) = board::bring_up(&gpio, &exti) {
        defmt::error!("startup failed: {}", e);
        defmt::panic!("halting");
    }
    defmt::info!("buttons armed, idle mode {}", config::IDLE);

    let mut dispatcher = board::dispatcher(&gpio);
    match config::IDLE {
        IdleMode::Spin => dispatcher.run(|_| {}),
        IdleMode::WaitForInterrupt => dispatcher.run(|d| {
            // Check under PRIMASK so an edge between the check and WFI still
            // wakes the core; the handler runs once interrupts are back on.
            cortex_m::interrupt::free(|_| {
                if !d.is_pending() {
                    asm::wfi();
                }
            })
        }),
    }
}
