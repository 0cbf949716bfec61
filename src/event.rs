//! Event flags bridging interrupt context and the main loop.

use core::sync::atomic::{AtomicBool, Ordering};

/// "An edge was seen and not yet handled."
///
/// Single slot, single producer (one handler), single consumer (one branch of
/// the dispatch loop). Setting an already set flag is a no-op, so edges that
/// arrive before the loop gets around to the flag are coalesced, not queued.
pub struct EventFlag {
    pending: AtomicBool,
}

impl EventFlag {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    /// Called from the interrupt handler only.
    #[inline]
    pub fn record(&self) {
        self.pending.store(true, Ordering::Release);
    }

    /// Clears the flag and reports whether it was set.
    ///
    /// The clear happens before the caller acts on the event, so an edge that
    /// lands while the caller is acting sets the flag again instead of being
    /// wiped out.
    #[inline]
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }
}

impl Default for EventFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Set by the Button 1 handler, drained by the Yellow LED route.
pub static BUTTON1_EVENT: EventFlag = EventFlag::new();

/// Set by the Button 2 handler, drained by the Blue LED route.
pub static BUTTON2_EVENT: EventFlag = EventFlag::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear() {
        let flag = EventFlag::new();
        assert!(!flag.is_set());
        assert!(!flag.take());
    }

    #[test]
    fn take_clears() {
        let flag = EventFlag::new();
        flag.record();
        assert!(flag.take());
        assert!(!flag.is_set());
        assert!(!flag.take());
    }

    #[test]
    fn repeated_records_coalesce() {
        let flag = EventFlag::new();
        flag.record();
        flag.record();
        flag.record();
        assert!(flag.take());
        assert!(!flag.take());
    }
}
