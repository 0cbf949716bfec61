//! Startup sequence and main-loop wiring for the board in [`crate::config`].

use crate::config::{self, BUTTON_1, BUTTON_2, BUTTON_PRIORITY};
use crate::dispatch::{Dispatcher, Route};
use crate::error::Error;
use crate::event::{BUTTON1_EVENT, BUTTON2_EVENT};
use crate::handlers;
use crate::hardware::gpio_led::GpioLed;
use crate::hardware::traits::{InterruptControl, PinControl};
use crate::irq;
use crate::pin::{self, PinConfig};

/// Configures all four pins, then arms both buttons.
///
/// Must run after clock bring-up and before the dispatch loop. Any error
/// leaves the board half configured; the caller should halt.
pub fn bring_up<G: PinControl, C: InterruptControl>(gpio: &G, exti: &C) -> Result<(), Error> {
    for led in [config::YELLOW_LED, config::BLUE_LED] {
        pin::configure(gpio, led.pin, PinConfig::output(led.initial))?;
    }
    for button in [BUTTON_1, BUTTON_2] {
        pin::configure(gpio, button.pin, PinConfig::input(button.pull))?;
    }

    irq::arm(
        exti,
        BUTTON_1.pin,
        BUTTON_1.edge,
        handlers::button1_edge::<C>,
        BUTTON_PRIORITY,
    )?;
    irq::arm(
        exti,
        BUTTON_2.pin,
        BUTTON_2.edge,
        handlers::button2_edge::<C>,
        BUTTON_PRIORITY,
    )?;

    info!("board up");
    Ok(())
}

/// Button 1 drives the Yellow LED, Button 2 the Blue one.
pub fn dispatcher<G: PinControl>(gpio: &G) -> Dispatcher<'static, GpioLed<'_, G>, 2> {
    Dispatcher::new([
        Route::new("yellow", &BUTTON1_EVENT, GpioLed::new(gpio, config::YELLOW_LED.pin)),
        Route::new("blue", &BUTTON2_EVENT, GpioLed::new(gpio, config::BLUE_LED.pin)),
    ])
}
