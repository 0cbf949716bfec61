//! The main loop: drains event flags into LED toggles.

use crate::event::EventFlag;
use crate::hardware::traits::Led;

/// One event flag feeding one LED.
pub struct Route<'a, L> {
    label: &'static str,
    event: &'a EventFlag,
    led: L,
}

impl<'a, L: Led> Route<'a, L> {
    pub fn new(label: &'static str, event: &'a EventFlag, led: L) -> Self {
        Self { label, event, led }
    }

    pub fn led(&self) -> &L {
        &self.led
    }
}

pub struct Dispatcher<'a, L, const N: usize> {
    routes: [Route<'a, L>; N],
}

impl<'a, L: Led, const N: usize> Dispatcher<'a, L, N> {
    pub fn new(routes: [Route<'a, L>; N]) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route<'a, L>] {
        &self.routes
    }

    /// One pass over all routes. Returns the number of LEDs toggled.
    ///
    /// Each flag is cleared before its LED is touched, so an edge that fires
    /// during the toggle stays pending for the next pass.
    pub fn service(&mut self) -> usize {
        let mut toggled = 0;
        for route in self.routes.iter_mut() {
            if route.event.take() {
                route.led.toggle();
                info!("{} toggled", route.label);
                toggled += 1;
            }
        }
        toggled
    }

    /// Whether any flag is waiting to be serviced.
    pub fn is_pending(&self) -> bool {
        self.routes.iter().any(|route| route.event.is_set())
    }

    /// Services forever, calling `idle` after every pass.
    ///
    /// `idle` may sleep, but must not do so while [`Self::is_pending`] holds.
    pub fn run<F: FnMut(&Self)>(&mut self, mut idle: F) -> ! {
        loop {
            self.service();
            idle(self);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingLed {
        lit: bool,
        toggles: usize,
    }

    impl Led for CountingLed {
        fn on(&mut self) {
            self.lit = true;
        }

        fn off(&mut self) {
            self.lit = false;
        }

        fn toggle(&mut self) {
            self.lit = !self.lit;
            self.toggles += 1;
        }
    }

    #[test]
    fn idle_pass_touches_nothing() {
        let a = EventFlag::new();
        let b = EventFlag::new();
        let mut dispatcher = Dispatcher::new([
            Route::new("a", &a, CountingLed::default()),
            Route::new("b", &b, CountingLed::default()),
        ]);

        assert!(!dispatcher.is_pending());
        for _ in 0..10 {
            assert_eq!(dispatcher.service(), 0);
        }
        assert!(dispatcher.routes().iter().all(|r| r.led().toggles == 0));
    }

    #[test]
    fn services_only_set_flags() {
        let a = EventFlag::new();
        let b = EventFlag::new();
        let mut dispatcher = Dispatcher::new([
            Route::new("a", &a, CountingLed::default()),
            Route::new("b", &b, CountingLed::default()),
        ]);

        b.record();
        assert!(dispatcher.is_pending());
        assert_eq!(dispatcher.service(), 1);

        assert!(!b.is_set());
        assert_eq!(dispatcher.routes()[0].led().toggles, 0);
        assert_eq!(dispatcher.routes()[1].led().toggles, 1);
        assert!(dispatcher.routes()[1].led().lit);
        assert!(!dispatcher.is_pending());
    }

    #[test]
    fn coalesced_events_toggle_once() {
        let a = EventFlag::new();
        let mut dispatcher = Dispatcher::new([Route::new("a", &a, CountingLed::default())]);

        a.record();
        a.record();
        assert_eq!(dispatcher.service(), 1);
        assert_eq!(dispatcher.service(), 0);
        assert_eq!(dispatcher.routes()[0].led().toggles, 1);
    }
}
