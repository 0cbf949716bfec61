//! Interrupt service routines.
//!
//! A handler acknowledges its own pin at the peripheral and records the event.
//! It does nothing else: no LED access, no logging, no waiting. Everything
//! else happens in [`crate::dispatch`].

use crate::config;
use crate::event::{BUTTON1_EVENT, BUTTON2_EVENT, EventFlag};
use crate::hardware::traits::InterruptControl;
use crate::pin::PinId;

/// Clears `pin`'s pending status, then sets `event`.
///
/// Acknowledging first keeps the controller from re-entering the handler and
/// lets the next edge latch again.
#[inline]
pub fn acknowledge_and_record<C: InterruptControl>(ctl: &C, pin: PinId, event: &EventFlag) {
    ctl.clear_pending_interrupt(pin);
    event.record();
}

pub fn button1_edge<C: InterruptControl>(ctl: &C) {
    acknowledge_and_record(ctl, config::BUTTON_1.pin, &BUTTON1_EVENT);
}

pub fn button2_edge<C: InterruptControl>(ctl: &C) {
    acknowledge_and_record(ctl, config::BUTTON_2.pin, &BUTTON2_EVENT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irq::{self, Edge, Priority};
    use crate::pin::Port;
    use crate::sim::SimBoard;

    const PIN: PinId = PinId::new(Port::C, 3);
    static EVENT: EventFlag = EventFlag::new();

    fn isr(board: &SimBoard) {
        acknowledge_and_record(board, PIN, &EVENT);
    }

    #[test]
    fn acknowledges_and_records() {
        let board = SimBoard::new();
        board.attach(PIN);
        irq::arm(&board, PIN, Edge::Rising, isr, Priority::LOWEST).unwrap();

        board.raise(PIN);

        assert!(!board.is_pending(PIN));
        assert_eq!(board.unacknowledged(), 0);
        assert!(EVENT.take());

        // a second edge on a set flag leaves it set, once
        board.raise(PIN);
        board.raise(PIN);
        assert!(EVENT.take());
        assert!(!EVENT.take());
    }
}
