//! Pin identity, electrical configuration and the pin configurator.

use core::fmt;

pub use embedded_hal::digital::PinState as Level;

use crate::error::Error;
use crate::hardware::traits::PinControl;

/// GPIO port of the STM32F103.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
}

impl Port {
    /// Port number as used by the AFIO EXTI routing registers (A = 0).
    pub const fn index(self) -> u8 {
        match self {
            Port::A => 0,
            Port::B => 1,
            Port::C => 2,
            Port::D => 3,
        }
    }

    const fn letter(self) -> char {
        match self {
            Port::A => 'A',
            Port::B => 'B',
            Port::C => 'C',
            Port::D => 'D',
        }
    }
}

/// A physical GPIO line: port plus offset within the port (0..=15).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    port: Port,
    index: u8,
}

impl PinId {
    /// Ports have 16 lines; an `index` past 15 panics (at compile time when
    /// used in a `const`).
    pub const fn new(port: Port, index: u8) -> Self {
        assert!(index < 16, "GPIO index out of range");
        Self { port, index }
    }

    pub const fn port(self) -> Port {
        self.port
    }

    pub const fn index(self) -> u8 {
        self.index
    }
}

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port.letter(), self.index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Output,
    Input,
}

/// Electrical mode of a line.
///
/// Outputs are always strong push-pull; inputs carry an internal pull bias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveMode {
    PushPull,
    PullUp,
    PullDown,
}

/// Full startup configuration of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    pub direction: Direction,
    pub drive: DriveMode,
    /// Driven level for outputs, idle level implied by the pull for inputs.
    pub initial: Level,
}

impl PinConfig {
    /// Push-pull output starting at `initial`.
    pub const fn output(initial: Level) -> Self {
        Self {
            direction: Direction::Output,
            drive: DriveMode::PushPull,
            initial,
        }
    }

    /// Input idling at the level its pull resistor holds it to.
    pub const fn input(pull: DriveMode) -> Self {
        let initial = match pull {
            DriveMode::PullUp => Level::High,
            _ => Level::Low,
        };
        Self {
            direction: Direction::Input,
            drive: pull,
            initial,
        }
    }

    fn is_consistent(&self) -> bool {
        matches!(
            (self.direction, self.drive),
            (Direction::Output, DriveMode::PushPull)
                | (Direction::Input, DriveMode::PullUp | DriveMode::PullDown)
        )
    }
}

/// Configures `pin` once, before any interrupt on it is armed.
///
/// Errors are fatal to startup; the caller is expected to halt.
pub fn configure<G: PinControl>(gpio: &G, pin: PinId, config: PinConfig) -> Result<(), Error> {
    if !config.is_consistent() {
        error!("{}: drive mode does not match direction", pin);
        return Err(Error::InvalidDriveMode(pin));
    }

    gpio.configure_pin(pin, config)?;
    debug!(
        "{} configured as {:?}/{:?}, level {:?}",
        pin, config.direction, config.drive, config.initial
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;

    const LED: PinId = PinId::new(Port::B, 12);

    #[test]
    fn pin_display() {
        assert_eq!(std::format!("{}", LED), "PB12");
        assert_eq!(std::format!("{}", PinId::new(Port::A, 0)), "PA0");
    }

    #[test]
    fn pin_accessors() {
        let pin = PinId::new(Port::C, 15);
        assert_eq!(pin.port(), Port::C);
        assert_eq!(pin.index(), 15);
        assert_eq!(pin.port().index(), 2);
    }

    #[test]
    #[should_panic(expected = "GPIO index out of range")]
    fn pin_index_past_15_panics() {
        let _ = PinId::new(Port::A, 16);
    }

    #[test]
    fn input_initial_level_follows_pull() {
        assert_eq!(PinConfig::input(DriveMode::PullUp).initial, Level::High);
        assert_eq!(PinConfig::input(DriveMode::PullDown).initial, Level::Low);
    }

    #[test]
    fn configure_output_drives_initial_level() {
        let board = SimBoard::new();
        board.attach(LED);

        configure(&board, LED, PinConfig::output(Level::High)).unwrap();

        assert_eq!(board.config_of(LED), Some(PinConfig::output(Level::High)));
        assert_eq!(board.output_level(LED), Level::High);
    }

    #[test]
    fn configure_rejects_pulled_output() {
        let board = SimBoard::new();
        board.attach(LED);
        let bad = PinConfig {
            direction: Direction::Output,
            drive: DriveMode::PullUp,
            initial: Level::Low,
        };

        assert_eq!(configure(&board, LED, bad), Err(Error::InvalidDriveMode(LED)));
        assert_eq!(board.config_of(LED), None);
    }

    #[test]
    fn configure_unattached_pin_fails() {
        let board = SimBoard::new();

        assert_eq!(
            configure(&board, LED, PinConfig::output(Level::Low)),
            Err(Error::UnknownPin(LED))
        );
    }
}
