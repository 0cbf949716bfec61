//! In-memory board for running the control path off target.
//!
//! [`SimBoard`] keeps pin levels, latched pending bits and a handler table, and
//! models the two pending stages of the real chip: the per-pin EXTI bit and
//! the per-line request the NVIC latches once the pin's edge is selected.
//! Clearing the pin bit does not withdraw a request the controller already
//! holds. Interrupts are delivered synchronously: as soon as an armed edge latches, the
//! bound handler runs before the call that caused the edge returns. That is the
//! same ordering a real ISR has relative to the code it preempts.

use core::cell::{Cell, RefCell};

use heapless::Vec;

use crate::error::Error;
use crate::hardware::traits::{InterruptControl, PinControl};
use crate::irq::{Edge, Handler, InterruptLine, Priority};
use crate::pin::{Direction, DriveMode, Level, PinConfig, PinId};

pub const MAX_PINS: usize = 8;
pub const TRACE_DEPTH: usize = 32;

/// Platform call, as recorded in the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Configure(PinId),
    SetLevel(PinId, Level),
    Toggle(PinId),
    SetEdge(PinId, Edge),
    ClearPending(PinId),
    Register(InterruptLine, Priority),
    Enable(InterruptLine),
}

struct SimPin {
    id: PinId,
    config: Option<PinConfig>,
    level: Level,
    edge: Option<Edge>,
    pending: bool,
    toggles: usize,
}

#[derive(Clone, Copy)]
struct SimLine {
    handler: Option<Handler<SimBoard>>,
    enabled: bool,
    requested: bool,
    calls: usize,
}

impl SimLine {
    const IDLE: SimLine = SimLine {
        handler: None,
        enabled: false,
        requested: false,
        calls: 0,
    };
}

pub struct SimBoard {
    pins: RefCell<Vec<SimPin, MAX_PINS>>,
    lines: RefCell<[SimLine; InterruptLine::COUNT]>,
    trace: RefCell<Vec<Op, TRACE_DEPTH>>,
    edge_on_toggle: Cell<Option<PinId>>,
    unacknowledged: Cell<usize>,
}

impl SimBoard {
    pub fn new() -> Self {
        Self {
            pins: RefCell::new(Vec::new()),
            lines: RefCell::new([SimLine::IDLE; InterruptLine::COUNT]),
            trace: RefCell::new(Vec::new()),
            edge_on_toggle: Cell::new(None),
            unacknowledged: Cell::new(0),
        }
    }

    /// Board with the four lines of [`crate::config`] attached.
    pub fn blue_pill() -> Self {
        let board = Self::new();
        for pin in [
            crate::config::YELLOW_LED.pin,
            crate::config::BLUE_LED.pin,
            crate::config::BUTTON_1.pin,
            crate::config::BUTTON_2.pin,
        ] {
            board.attach(pin);
        }
        board
    }

    /// Makes `pin` known to the board, unconfigured and low.
    pub fn attach(&self, pin: PinId) {
        let mut pins = self.pins.borrow_mut();
        assert!(
            pins.iter().all(|p| p.id != pin),
            "{} attached twice",
            pin
        );
        let fresh = SimPin {
            id: pin,
            config: None,
            level: Level::Low,
            edge: None,
            pending: false,
            toggles: 0,
        };
        assert!(pins.push(fresh).is_ok(), "more than {} pins", MAX_PINS);
    }

    pub fn config_of(&self, pin: PinId) -> Option<PinConfig> {
        self.with_pin(pin, |p| p.config)
    }

    /// Current electrical level of any pin, input or output.
    pub fn level(&self, pin: PinId) -> Level {
        self.with_pin(pin, |p| p.level)
    }

    pub fn is_pending(&self, pin: PinId) -> bool {
        self.with_pin(pin, |p| p.pending)
    }

    pub fn toggle_count(&self, pin: PinId) -> usize {
        self.with_pin(pin, |p| p.toggles)
    }

    /// How many times the handler bound to `line` has run.
    pub fn handler_calls(&self, line: InterruptLine) -> usize {
        self.lines.borrow()[line.slot()].calls
    }

    /// Handler returns that left their pin pending.
    pub fn unacknowledged(&self) -> usize {
        self.unacknowledged.get()
    }

    /// Platform calls so far. Calls past [`TRACE_DEPTH`] are not recorded.
    pub fn trace(&self) -> Vec<Op, TRACE_DEPTH> {
        self.trace.borrow().clone()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    /// Drives an input to `level`, latching an edge if it matches the one
    /// selected for the pin.
    pub fn drive_input(&self, pin: PinId, level: Level) {
        let latched = self.with_pin_mut(pin, |p| {
            let edge = match (p.level, level) {
                (Level::Low, Level::High) => Some(Edge::Rising),
                (Level::High, Level::Low) => Some(Edge::Falling),
                _ => None,
            };
            p.level = level;
            if edge.is_some() && edge == p.edge {
                p.pending = true;
                true
            } else {
                false
            }
        });
        if latched {
            self.request(pin);
        }
    }

    /// Pushes the button on `pin`: drives it away from its pulled level.
    pub fn press(&self, pin: PinId) {
        let idle = self.pulled_level(pin);
        self.drive_input(pin, !idle);
    }

    /// Lets the button on `pin` go back to its pulled level.
    pub fn release(&self, pin: PinId) {
        let idle = self.pulled_level(pin);
        self.drive_input(pin, idle);
    }

    /// One press-and-release.
    pub fn click(&self, pin: PinId) {
        self.press(pin);
        self.release(pin);
    }

    /// Latches the selected edge on `pin` without moving its level, as an
    /// edge too short to observe would.
    pub fn raise(&self, pin: PinId) {
        let latched = self.with_pin_mut(pin, |p| {
            if p.edge.is_some() {
                p.pending = true;
            }
            p.edge.is_some()
        });
        if latched {
            self.request(pin);
        }
    }

    /// Sets the pin's pending bit with no delivery, as left behind by power-up.
    /// Selecting an edge afterwards forwards it to the controller.
    pub fn force_pending(&self, pin: PinId) {
        self.with_pin_mut(pin, |p| p.pending = true);
    }

    /// The next [`PinControl::toggle_output_level`] call raises `pin` before
    /// it inverts its output.
    pub fn raise_during_next_toggle(&self, pin: PinId) {
        self.edge_on_toggle.set(Some(pin));
    }

    fn pulled_level(&self, pin: PinId) -> Level {
        match self.config_of(pin) {
            Some(PinConfig {
                drive: DriveMode::PullUp,
                ..
            }) => Level::High,
            _ => Level::Low,
        }
    }

    /// Latches a controller request for `pin`'s line and delivers it.
    fn request(&self, pin: PinId) {
        self.lines.borrow_mut()[InterruptLine::for_pin(pin).slot()].requested = true;
        self.deliver();
    }

    /// Runs handlers for requested, enabled lines until nothing is left.
    fn deliver(&self) {
        loop {
            let next = {
                let mut lines = self.lines.borrow_mut();
                lines.iter_mut().enumerate().find_map(|(slot, l)| {
                    match (l.requested, l.enabled, l.handler) {
                        (true, true, Some(handler)) => {
                            l.requested = false;
                            Some((slot, handler))
                        }
                        _ => None,
                    }
                })
            };
            let Some((slot, handler)) = next else {
                return;
            };

            handler(self);

            self.lines.borrow_mut()[slot].calls += 1;
            let mut pins = self.pins.borrow_mut();
            for p in pins
                .iter_mut()
                .filter(|p| InterruptLine::for_pin(p.id).slot() == slot)
            {
                if core::mem::replace(&mut p.pending, false) {
                    self.unacknowledged.set(self.unacknowledged.get() + 1);
                }
            }
        }
    }

    fn record(&self, op: Op) {
        let _ = self.trace.borrow_mut().push(op);
    }

    fn with_pin<T>(&self, pin: PinId, f: impl FnOnce(&SimPin) -> T) -> T {
        let pins = self.pins.borrow();
        let found = pins.iter().find(|p| p.id == pin);
        match found {
            Some(p) => f(p),
            None => panic!("{} is not attached", pin),
        }
    }

    fn with_pin_mut<T>(&self, pin: PinId, f: impl FnOnce(&mut SimPin) -> T) -> T {
        let mut pins = self.pins.borrow_mut();
        let found = pins.iter_mut().find(|p| p.id == pin);
        match found {
            Some(p) => f(p),
            None => panic!("{} is not attached", pin),
        }
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl PinControl for SimBoard {
    fn configure_pin(&self, pin: PinId, config: PinConfig) -> Result<(), Error> {
        {
            let mut pins = self.pins.borrow_mut();
            let p = pins
                .iter_mut()
                .find(|p| p.id == pin)
                .ok_or(Error::UnknownPin(pin))?;
            p.config = Some(config);
            p.level = config.initial;
        }
        self.record(Op::Configure(pin));
        Ok(())
    }

    fn set_output_level(&self, pin: PinId, level: Level) {
        self.with_pin_mut(pin, |p| {
            if matches!(p.config, Some(c) if c.direction == Direction::Output) {
                p.level = level;
            }
        });
        self.record(Op::SetLevel(pin, level));
    }

    fn toggle_output_level(&self, pin: PinId) {
        if let Some(input) = self.edge_on_toggle.take() {
            self.raise(input);
        }
        self.with_pin_mut(pin, |p| {
            if matches!(p.config, Some(c) if c.direction == Direction::Output) {
                p.level = !p.level;
                p.toggles += 1;
            }
        });
        self.record(Op::Toggle(pin));
    }

    fn output_level(&self, pin: PinId) -> Level {
        self.level(pin)
    }
}

impl InterruptControl for SimBoard {
    fn set_interrupt_edge(&self, pin: PinId, edge: Edge) {
        let stale = self.with_pin_mut(pin, |p| {
            p.edge = Some(edge);
            p.pending
        });
        self.record(Op::SetEdge(pin, edge));
        if stale {
            self.request(pin);
        }
    }

    fn clear_pending_interrupt(&self, pin: PinId) {
        self.with_pin_mut(pin, |p| p.pending = false);
        self.record(Op::ClearPending(pin));
    }

    fn register_interrupt_handler(
        &self,
        line: InterruptLine,
        priority: Priority,
        handler: Handler<Self>,
    ) -> Result<(), Error> {
        {
            let mut lines = self.lines.borrow_mut();
            let slot = &mut lines[line.slot()];
            if slot.handler.is_some() {
                return Err(Error::LineInUse(line));
            }
            slot.handler = Some(handler);
        }
        self.record(Op::Register(line, priority));
        Ok(())
    }

    /// Drops any request latched while the line was disabled, then enables
    /// it.
    fn enable_interrupt_line(&self, line: InterruptLine) {
        {
            let mut lines = self.lines.borrow_mut();
            let slot = &mut lines[line.slot()];
            slot.requested = false;
            slot.enabled = true;
        }
        self.record(Op::Enable(line));
        self.deliver();
    }
}
