//! Board wiring for the Blue Pill build.
//!
//! | Role       | Pin  | Mode                  | Trigger |
//! |------------|------|-----------------------|---------|
//! | Yellow LED | PB12 | push-pull, starts low | -       |
//! | Blue LED   | PB13 | push-pull, starts low | -       |
//! | Button 1   | PA0  | pull-down             | rising  |
//! | Button 2   | PB1  | pull-up               | falling |
//!
//! Button 1 connects PA0 to 3V3 when pressed, Button 2 connects PB1 to GND.

use crate::irq::{Edge, Priority};
use crate::pin::{DriveMode, Level, PinId, Port};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedConfig {
    pub pin: PinId,
    pub initial: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonConfig {
    pub pin: PinId,
    pub pull: DriveMode,
    pub edge: Edge,
}

/// What the main loop does between passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleMode {
    /// Re-check the flags immediately.
    Spin,
    /// Sleep until the next interrupt, unless a flag is already set.
    WaitForInterrupt,
}

pub const YELLOW_LED: LedConfig = LedConfig {
    pin: PinId::new(Port::B, 12),
    initial: Level::Low,
};

pub const BLUE_LED: LedConfig = LedConfig {
    pin: PinId::new(Port::B, 13),
    initial: Level::Low,
};

pub const BUTTON_1: ButtonConfig = ButtonConfig {
    pin: PinId::new(Port::A, 0),
    pull: DriveMode::PullDown,
    edge: Edge::Rising,
};

pub const BUTTON_2: ButtonConfig = ButtonConfig {
    pin: PinId::new(Port::B, 1),
    pull: DriveMode::PullUp,
    edge: Edge::Falling,
};

/// Shared by both buttons so neither handler preempts the other.
pub const BUTTON_PRIORITY: Priority = match Priority::new(3) {
    Ok(priority) => priority,
    Err(_) => panic!("button priority out of range"),
};

pub const IDLE: IdleMode = IdleMode::WaitForInterrupt;
