pub mod gpio_led;
#[cfg(feature = "stm32")]
pub mod stm32;
pub mod traits;
