use crate::error::Error;
use crate::irq::{Edge, Handler, InterruptLine, Priority};
use crate::pin::{Level, PinConfig, PinId};

pub trait Led {
    fn on(&mut self);
    fn off(&mut self);
    fn toggle(&mut self);
}

/// GPIO operations the board provides.
///
/// Methods take `&self`: the same board is reached from the main loop and from
/// interrupt handlers.
pub trait PinControl {
    /// Sets direction, drive and initial level. Called once per pin.
    fn configure_pin(&self, pin: PinId, config: PinConfig) -> Result<(), Error>;
    fn set_output_level(&self, pin: PinId, level: Level);
    fn toggle_output_level(&self, pin: PinId);
    /// Level currently driven on an output.
    fn output_level(&self, pin: PinId) -> Level;
}

/// Edge-interrupt operations the board provides.
pub trait InterruptControl: Sized {
    fn set_interrupt_edge(&self, pin: PinId, edge: Edge);
    /// Acknowledges `pin` at the peripheral so the next edge can latch.
    fn clear_pending_interrupt(&self, pin: PinId);
    /// Binds `handler` to `line`. A line is bound once.
    fn register_interrupt_handler(
        &self,
        line: InterruptLine,
        priority: Priority,
        handler: Handler<Self>,
    ) -> Result<(), Error>;
    fn enable_interrupt_line(&self, line: InterruptLine);
}
