//! Trailing-edge debouncing.
//!
//! Timers here never fire on their own. The owning event loop calls
//! [`Debouncer::poll`] (or [`DebounceTimer::fire_if_due`]) from its tick, which
//! keeps the scheduling single-threaded and replayable under a manual clock.

use std::time::Duration;

use foundation::time::{Millis, SharedClock};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DebounceState {
    #[default]
    Idle,
    Pending { deadline: Millis },
}

/// The bare two-state timer, with time passed in by the caller.
///
/// Useful when the debounced payload lives next to the timer rather than in a
/// closure (see the camera-sync coordinator).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DebounceTimer {
    delay: Duration,
    state: DebounceState,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: DebounceState::Idle,
        }
    }

    pub fn from_millis(delay_ms: u64) -> Self {
        Self::new(Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DebounceState::Pending { .. })
    }

    pub fn deadline(&self) -> Option<Millis> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::Pending { deadline } => Some(deadline),
        }
    }

    /// `Idle -> Pending` or `Pending -> Pending` with a fresh deadline.
    pub fn arm(&mut self, now: Millis) -> Millis {
        let deadline = now.saturating_add(self.delay);
        self.state = DebounceState::Pending { deadline };
        deadline
    }

    /// Cancels without firing. Idempotent.
    pub fn disarm(&mut self) {
        self.state = DebounceState::Idle;
    }

    /// `Pending -> Idle` once `now` reaches the deadline.
    ///
    /// Returns `true` exactly once per armed burst.
    pub fn fire_if_due(&mut self, now: Millis) -> bool {
        match self.state {
            DebounceState::Pending { deadline } if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }
}

/// Coalesces bursts of [`trigger`](Debouncer::trigger) calls into one trailing
/// invocation of `action`, `delay` after the last trigger.
///
/// A zero delay still defers the action to the next [`poll`](Debouncer::poll);
/// `trigger` never runs it inline. Panics raised by `action` propagate to the
/// caller of `poll`.
pub struct Debouncer<A> {
    timer: DebounceTimer,
    clock: SharedClock,
    action: A,
}

impl<A: FnMut()> Debouncer<A> {
    pub fn new(action: A, delay: Duration, clock: SharedClock) -> Self {
        Self {
            timer: DebounceTimer::new(delay),
            clock,
            action,
        }
    }

    pub fn trigger(&mut self) {
        let now = self.clock.now();
        let was_pending = self.timer.is_pending();
        let deadline = self.timer.arm(now);
        tracing::trace!(%now, %deadline, rearmed = was_pending, "debounce triggered");
    }

    /// Runs the action if the quiet window has elapsed.
    pub fn poll(&mut self) -> bool {
        if !self.timer.fire_if_due(self.clock.now()) {
            return false;
        }
        (self.action)();
        true
    }

    /// Cancels any pending invocation. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        self.timer.disarm();
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_pending()
    }

    pub fn deadline(&self) -> Option<Millis> {
        self.timer.deadline()
    }

    pub fn delay(&self) -> Duration {
        self.timer.delay()
    }
}

impl<A> std::fmt::Debug for Debouncer<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::{DebounceState, DebounceTimer, Debouncer};
    use foundation::time::{ManualClock, Millis};
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    fn counting(clock: &ManualClock, delay_ms: u64) -> (Debouncer<impl FnMut()>, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let d = Debouncer::new(
            move || c.set(c.get() + 1),
            Duration::from_millis(delay_ms),
            clock.shared(),
        );
        (d, calls)
    }

    #[test]
    fn burst_coalesces_into_one_trailing_call() {
        let clock = ManualClock::new();
        let (mut d, calls) = counting(&clock, 100);

        d.trigger();
        clock.set(Millis(30));
        d.trigger();
        clock.set(Millis(60));
        d.trigger();

        clock.set(Millis(159));
        assert!(!d.poll());
        assert_eq!(calls.get(), 0);

        clock.set(Millis(160));
        assert!(d.poll());
        assert_eq!(calls.get(), 1);

        clock.set(Millis(500));
        assert!(!d.poll());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn cleanup_prevents_firing_and_is_idempotent() {
        let clock = ManualClock::new();
        let (mut d, calls) = counting(&clock, 100);

        d.cleanup();
        d.trigger();
        clock.set(Millis(50));
        d.cleanup();
        d.cleanup();
        assert!(!d.is_pending());

        clock.set(Millis(1_000));
        assert!(!d.poll());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn zero_delay_defers_to_next_poll() {
        let clock = ManualClock::new();
        let (mut d, calls) = counting(&clock, 0);

        d.trigger();
        assert_eq!(calls.get(), 0);
        assert!(d.is_pending());
        assert!(d.poll());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn trigger_after_cleanup_rearms() {
        let clock = ManualClock::new();
        let (mut d, calls) = counting(&clock, 10);

        d.trigger();
        d.cleanup();
        clock.set(Millis(20));
        d.trigger();
        assert_eq!(d.deadline(), Some(Millis(30)));
        clock.set(Millis(30));
        assert!(d.poll());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn action_panics_reach_the_poller() {
        let clock = ManualClock::new();
        let mut d = Debouncer::new(|| panic!("boom"), Duration::ZERO, clock.shared());
        d.trigger();
        d.poll();
    }

    #[test]
    fn timer_state_transitions() {
        let mut t = DebounceTimer::from_millis(5);
        assert_eq!(t.state(), DebounceState::Idle);
        assert!(!t.fire_if_due(Millis(100)));

        t.arm(Millis(1));
        assert_eq!(t.state(), DebounceState::Pending { deadline: Millis(6) });
        t.arm(Millis(3));
        assert_eq!(t.deadline(), Some(Millis(8)));
        assert!(!t.fire_if_due(Millis(7)));
        assert!(t.fire_if_due(Millis(8)));
        assert_eq!(t.state(), DebounceState::Idle);

        t.arm(Millis(10));
        t.disarm();
        assert!(!t.fire_if_due(Millis(100)));
    }
}
