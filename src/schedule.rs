//! Time sources and debouncing.
//!
//! Deferred work is driven by polling: callers pass the current
//! [`Instant`] to [`Debouncer::trigger`] and [`Debouncer::poll`], so tests
//! can step time explicitly with a [`ManualClock`].

use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The real monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    start: Instant,
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.start + self.elapsed.get()
    }
}

/// Collapses bursts of triggers into one firing.
///
/// Every trigger adds one to a pending counter and schedules its own
/// decrement `delay` later. The debouncer fires when a decrement brings
/// the counter back to zero, i.e. `delay` after the last trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadlines: VecDeque<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadlines: VecDeque::new(),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record one more pending operation.
    pub fn trigger(&mut self, now: Instant) {
        self.deadlines.push_back(now + self.delay);
    }

    /// Number of operations still counting down.
    pub fn pending(&self) -> usize {
        self.deadlines.len()
    }

    pub fn is_pending(&self) -> bool {
        !self.deadlines.is_empty()
    }

    /// When the next pending operation counts down.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.front().copied()
    }

    /// Count down every expired operation; true when the counter reached
    /// zero during this call.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut fired = false;
        while self.deadlines.front().is_some_and(|d| *d <= now) {
            self.deadlines.pop_front();
            fired = self.deadlines.is_empty();
        }
        fired
    }

    /// Drop all pending operations without firing.
    pub fn cancel(&mut self) {
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let t0 = clock.now();
        other.advance_ms(250);
        assert_eq!(clock.now() - t0, Duration::from_millis(250));
    }

    #[test]
    fn fires_once_after_delay() {
        let clock = ManualClock::new();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.trigger(clock.now());

        clock.advance_ms(99);
        assert!(!d.poll(clock.now()));
        clock.advance_ms(1);
        assert!(d.poll(clock.now()));
        assert!(!d.poll(clock.now()));
        assert!(!d.is_pending());
    }

    #[test]
    fn bursts_collapse_into_one_firing() {
        let clock = ManualClock::new();
        let mut d = Debouncer::new(Duration::from_millis(100));
        for _ in 0..3 {
            d.trigger(clock.now());
            clock.advance_ms(60);
            assert!(!d.poll(clock.now()));
        }
        assert_eq!(d.pending(), 1);

        clock.advance_ms(100);
        assert!(d.poll(clock.now()));
        assert_eq!(d.pending(), 0);
    }

    #[test]
    fn cancel_drops_pending_work() {
        let clock = ManualClock::new();
        let mut d = Debouncer::new(Duration::from_millis(10));
        d.trigger(clock.now());
        d.cancel();
        clock.advance_ms(20);
        assert!(!d.poll(clock.now()));
    }
}
