//! Edge selection, interrupt lines and the interrupt configurator.

use crate::error::Error;
use crate::hardware::traits::InterruptControl;
use crate::pin::PinId;

/// Transition that asserts a pin's interrupt status bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
}

/// Interrupt-controller line serving a pin.
///
/// EXTI lines 0..=4 have their own vector; pins 5..=9 and 10..=15 of every
/// port share one vector each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InterruptLine {
    Exti0,
    Exti1,
    Exti2,
    Exti3,
    Exti4,
    Exti9_5,
    Exti15_10,
}

impl InterruptLine {
    pub const COUNT: usize = 7;

    pub const fn for_pin(pin: PinId) -> Self {
        match pin.index() {
            0 => InterruptLine::Exti0,
            1 => InterruptLine::Exti1,
            2 => InterruptLine::Exti2,
            3 => InterruptLine::Exti3,
            4 => InterruptLine::Exti4,
            5..=9 => InterruptLine::Exti9_5,
            _ => InterruptLine::Exti15_10,
        }
    }

    /// Slot of this line in a per-line table.
    pub const fn slot(self) -> usize {
        self as usize
    }
}

/// NVIC priority level, 0 being the most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(u8);

impl Priority {
    pub const HIGHEST: Priority = Priority(0);
    pub const LOWEST: Priority = Priority(15);

    pub const fn new(level: u8) -> Result<Self, Error> {
        if level > Self::LOWEST.0 {
            Err(Error::PriorityOutOfRange(level))
        } else {
            Ok(Priority(level))
        }
    }

    pub const fn level(self) -> u8 {
        self.0
    }
}

/// Interrupt service routine as bound at the controller.
///
/// It receives the controller so it can acknowledge its own line.
pub type Handler<C> = fn(&C);

/// Arms the edge interrupt of an already configured input pin.
///
/// The steps run strictly in this order:
/// 1. select the trigger edge,
/// 2. clear whatever is pending from power-up or configuration,
/// 3. bind `handler` to the pin's line,
/// 4. enable the line at `priority`.
///
/// Once this returns, `handler` may run at any moment.
pub fn arm<C: InterruptControl>(
    ctl: &C,
    pin: PinId,
    edge: Edge,
    handler: Handler<C>,
    priority: Priority,
) -> Result<InterruptLine, Error> {
    let line = InterruptLine::for_pin(pin);

    ctl.set_interrupt_edge(pin, edge);
    ctl.clear_pending_interrupt(pin);
    ctl.register_interrupt_handler(line, priority, handler)?;
    ctl.enable_interrupt_line(line);

    info!("{} armed on {:?} edge, line {:?}", pin, edge, line);
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pin::{self, DriveMode, PinConfig, Port};
    use crate::sim::{Op, SimBoard};

    const BUTTON: PinId = PinId::new(Port::A, 0);
    const SHARED_A: PinId = PinId::new(Port::A, 11);
    const SHARED_B: PinId = PinId::new(Port::B, 14);

    fn noop(_: &SimBoard) {}

    #[test]
    fn line_for_pin() {
        assert_eq!(InterruptLine::for_pin(BUTTON), InterruptLine::Exti0);
        assert_eq!(
            InterruptLine::for_pin(PinId::new(Port::B, 1)),
            InterruptLine::Exti1
        );
        assert_eq!(
            InterruptLine::for_pin(PinId::new(Port::C, 7)),
            InterruptLine::Exti9_5
        );
        assert_eq!(InterruptLine::for_pin(SHARED_A), InterruptLine::Exti15_10);
    }

    #[test]
    fn priority_range() {
        assert_eq!(Priority::new(0), Ok(Priority::HIGHEST));
        assert_eq!(Priority::new(15), Ok(Priority::LOWEST));
        assert_eq!(Priority::HIGHEST.level(), 0);
        assert_eq!(Priority::new(16), Err(Error::PriorityOutOfRange(16)));
    }

    #[test]
    fn arm_runs_steps_in_order() {
        let board = SimBoard::new();
        board.attach(BUTTON);
        pin::configure(&board, BUTTON, PinConfig::input(DriveMode::PullDown)).unwrap();
        board.clear_trace();

        let line = arm(&board, BUTTON, Edge::Rising, noop, Priority::LOWEST).unwrap();

        assert_eq!(line, InterruptLine::Exti0);
        assert_eq!(
            board.trace().as_slice(),
            &[
                Op::SetEdge(BUTTON, Edge::Rising),
                Op::ClearPending(BUTTON),
                Op::Register(InterruptLine::Exti0, Priority::LOWEST),
                Op::Enable(InterruptLine::Exti0),
            ]
        );
    }

    #[test]
    fn arm_discards_stale_pending() {
        let board = SimBoard::new();
        board.attach(BUTTON);
        pin::configure(&board, BUTTON, PinConfig::input(DriveMode::PullDown)).unwrap();
        board.force_pending(BUTTON);

        arm(&board, BUTTON, Edge::Rising, noop, Priority::LOWEST).unwrap();

        assert!(!board.is_pending(BUTTON));
        assert_eq!(board.handler_calls(InterruptLine::Exti0), 0);
    }

    #[test]
    fn shared_line_binds_once() {
        let board = SimBoard::new();
        board.attach(SHARED_A);
        board.attach(SHARED_B);

        arm(&board, SHARED_A, Edge::Falling, noop, Priority::LOWEST).unwrap();
        board.clear_trace();
        assert_eq!(
            arm(&board, SHARED_B, Edge::Falling, noop, Priority::LOWEST),
            Err(Error::LineInUse(InterruptLine::Exti15_10))
        );
        // the failed attempt stops before enabling anything
        assert_eq!(
            board.trace().as_slice(),
            &[
                Op::SetEdge(SHARED_B, Edge::Falling),
                Op::ClearPending(SHARED_B),
            ]
        );
    }
}
