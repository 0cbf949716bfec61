//! STM32F1 backend.
//!
//! GPIO lines are embassy [`Flex`] pins owned by [`Stm32Gpio`]. Edge selection,
//! pending bits and AFIO port routing go straight to the EXTI/AFIO registers
//! through the embassy PAC, and every EXTI vector forwards to the handler bound
//! in [`HANDLERS`].

use core::cell::{Cell, RefCell};

use cortex_m::interrupt::Mutex;
use embassy_stm32::gpio::{Flex, Pull, Speed};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{Interrupt, InterruptExt, Priority as NvicPriority};
use embassy_stm32::pac;
use heapless::Vec;

use super::traits::{InterruptControl, PinControl};
use crate::error::Error;
use crate::irq::{Edge, Handler, InterruptLine, Priority};
use crate::pin::{Direction, DriveMode, Level, PinConfig, PinId};

const MAX_LINES: usize = 8;

/// The F103 implements the top four NVIC priority bits.
const PRIO_SHIFT: u8 = 4;

pub struct Stm32Gpio {
    lines: RefCell<Vec<(PinId, Flex<'static>), MAX_LINES>>,
}

impl Stm32Gpio {
    pub fn new() -> Self {
        Self {
            lines: RefCell::new(Vec::new()),
        }
    }

    /// Hands `line` over to the board under the name `pin`.
    ///
    /// The caller is responsible for `line` being the physical pin `pin`
    /// names.
    pub fn attach(&mut self, pin: PinId, line: Flex<'static>) -> Result<(), Error> {
        self.lines
            .get_mut()
            .push((pin, line))
            .map_err(|_| Error::PinTableFull(pin))
    }

    fn with_line<T>(&self, pin: PinId, f: impl FnOnce(&mut Flex<'static>) -> T) -> Result<T, Error> {
        let mut lines = self.lines.borrow_mut();
        let (_, line) = lines
            .iter_mut()
            .find(|(id, _)| *id == pin)
            .ok_or(Error::UnknownPin(pin))?;
        Ok(f(line))
    }
}

impl Default for Stm32Gpio {
    fn default() -> Self {
        Self::new()
    }
}

fn to_embassy(level: Level) -> embassy_stm32::gpio::Level {
    bool::from(level).into()
}

impl PinControl for Stm32Gpio {
    fn configure_pin(&self, pin: PinId, config: PinConfig) -> Result<(), Error> {
        self.with_line(pin, |line| match config.direction {
            Direction::Output => {
                // level before mode, no glitch when the driver turns on
                line.set_level(to_embassy(config.initial));
                line.set_as_output(Speed::Low);
            }
            Direction::Input => {
                let pull = match config.drive {
                    DriveMode::PullUp => Pull::Up,
                    DriveMode::PullDown => Pull::Down,
                    DriveMode::PushPull => Pull::None,
                };
                line.set_as_input(pull);
            }
        })
    }

    fn set_output_level(&self, pin: PinId, level: Level) {
        if self.with_line(pin, |line| line.set_level(to_embassy(level))).is_err() {
            warn!("write to unattached pin {}", pin);
        }
    }

    fn toggle_output_level(&self, pin: PinId) {
        if self.with_line(pin, |line| line.toggle()).is_err() {
            warn!("toggle of unattached pin {}", pin);
        }
    }

    fn output_level(&self, pin: PinId) -> Level {
        self.with_line(pin, |line| Level::from(line.is_set_high()))
            .unwrap_or(Level::Low)
    }
}

/// EXTI controller. Stateless: all state lives in the peripheral registers
/// and in [`HANDLERS`].
pub struct Stm32Exti {
    _private: (),
}

/// Instance handed to handlers from interrupt context.
const EXTI: Stm32Exti = Stm32Exti { _private: () };

static HANDLERS: [Mutex<Cell<Option<Handler<Stm32Exti>>>>; InterruptLine::COUNT] =
    [const { Mutex::new(Cell::new(None)) }; InterruptLine::COUNT];

impl Stm32Exti {
    /// Turns on the AFIO clock, which EXTI port routing needs.
    pub fn new() -> Self {
        pac::RCC.apb2enr().modify(|w| w.set_afioen(true));
        EXTI
    }
}

impl Default for Stm32Exti {
    fn default() -> Self {
        Self::new()
    }
}

fn nvic_line(line: InterruptLine) -> Interrupt {
    match line {
        InterruptLine::Exti0 => Interrupt::EXTI0,
        InterruptLine::Exti1 => Interrupt::EXTI1,
        InterruptLine::Exti2 => Interrupt::EXTI2,
        InterruptLine::Exti3 => Interrupt::EXTI3,
        InterruptLine::Exti4 => Interrupt::EXTI4,
        InterruptLine::Exti9_5 => Interrupt::EXTI9_5,
        InterruptLine::Exti15_10 => Interrupt::EXTI15_10,
    }
}

impl InterruptControl for Stm32Exti {
    fn set_interrupt_edge(&self, pin: PinId, edge: Edge) {
        let n = pin.index() as usize;
        pac::AFIO
            .exticr(n / 4)
            .modify(|w| w.set_exti(n % 4, pin.port().index()));
        pac::EXTI.rtsr(0).modify(|w| w.set_line(n, edge == Edge::Rising));
        pac::EXTI.ftsr(0).modify(|w| w.set_line(n, edge == Edge::Falling));
        pac::EXTI.imr(0).modify(|w| w.set_line(n, true));
    }

    fn clear_pending_interrupt(&self, pin: PinId) {
        // write-one-to-clear
        pac::EXTI
            .pr(0)
            .write(|w| w.set_line(pin.index() as usize, true));
    }

    fn register_interrupt_handler(
        &self,
        line: InterruptLine,
        priority: Priority,
        handler: Handler<Self>,
    ) -> Result<(), Error> {
        cortex_m::interrupt::free(|cs| {
            let slot = HANDLERS[line.slot()].borrow(cs);
            if slot.get().is_some() {
                return Err(Error::LineInUse(line));
            }
            slot.set(Some(handler));
            Ok(())
        })?;

        nvic_line(line).set_priority(NvicPriority::from(priority.level() << PRIO_SHIFT));
        Ok(())
    }

    fn enable_interrupt_line(&self, line: InterruptLine) {
        let irq = nvic_line(line);
        // IMR is unmasked since the edge was selected, so the NVIC may still
        // hold a request whose PR bit has been cleared since.
        irq.unpend();
        // SAFETY: the line has a handler bound and no critical section relies
        // on it staying masked.
        unsafe { irq.enable() };
    }
}

fn dispatch(line: InterruptLine) {
    let handler = cortex_m::interrupt::free(|cs| HANDLERS[line.slot()].borrow(cs).get());
    if let Some(handler) = handler {
        handler(&EXTI);
    }
}

#[interrupt]
fn EXTI0() {
    dispatch(InterruptLine::Exti0);
}

#[interrupt]
fn EXTI1() {
    dispatch(InterruptLine::Exti1);
}

#[interrupt]
fn EXTI2() {
    dispatch(InterruptLine::Exti2);
}

#[interrupt]
fn EXTI3() {
    dispatch(InterruptLine::Exti3);
}

#[interrupt]
fn EXTI4() {
    dispatch(InterruptLine::Exti4);
}

#[interrupt]
fn EXTI9_5() {
    dispatch(InterruptLine::Exti9_5);
}

#[interrupt]
fn EXTI15_10() {
    dispatch(InterruptLine::Exti15_10);
}
