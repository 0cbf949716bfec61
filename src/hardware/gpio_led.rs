use super::traits::{Led, PinControl};
use crate::pin::{Level, PinId};

/// LED on a push-pull output, lit when driven high.
pub struct GpioLed<'d, G> {
    gpio: &'d G,
    pin: PinId,
}

impl<'d, G: PinControl> GpioLed<'d, G> {
    pub fn new(gpio: &'d G, pin: PinId) -> Self {
        Self { gpio, pin }
    }

    pub fn level(&self) -> Level {
        self.gpio.output_level(self.pin)
    }
}

impl<'d, G: PinControl> Led for GpioLed<'d, G> {
    fn on(&mut self) {
        self.gpio.set_output_level(self.pin, Level::High);
    }

    fn off(&mut self) {
        self.gpio.set_output_level(self.pin, Level::Low);
    }

    fn toggle(&mut self) {
        self.gpio.toggle_output_level(self.pin);
    }
}
