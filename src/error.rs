use core::fmt;

use crate::irq::InterruptLine;
use crate::pin::PinId;

/// Startup configuration failures.
///
/// None of these are recoverable: a board that cannot be configured as
/// described in [`crate::config`] must not enter the dispatch loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The platform has no line attached for this pin.
    UnknownPin(PinId),
    /// No room left to attach another line.
    PinTableFull(PinId),
    /// Direction and drive mode do not go together (e.g. a pulled output).
    InvalidDriveMode(PinId),
    /// Interrupt priority level above [`crate::irq::Priority::LOWEST`].
    PriorityOutOfRange(u8),
    /// The interrupt line already has a handler bound.
    LineInUse(InterruptLine),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnknownPin(pin) => write!(f, "pin {pin} is not attached"),
            Error::PinTableFull(pin) => write!(f, "no room to attach pin {pin}"),
            Error::InvalidDriveMode(pin) => {
                write!(f, "drive mode does not match direction on pin {pin}")
            }
            Error::PriorityOutOfRange(level) => {
                write!(f, "interrupt priority {level} out of range")
            }
            Error::LineInUse(line) => write!(f, "interrupt line {line:?} already bound"),
        }
    }
}

impl core::error::Error for Error {}
