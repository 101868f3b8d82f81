//! Countdown timer with caller-supplied instants.
//!
//! The sequencing state machines never read a wall clock: the polling driver
//! captures one [`Instant`] per sweep and threads it through every step, and
//! a [`Countdown`] only compares that instant against its armed deadline.
//! Tests fabricate instants instead of sleeping.

use std::time::{Duration, Instant};

/// A one-shot countdown timer.
///
/// A countdown is in one of three conditions: stopped (never armed, or
/// explicitly stopped), armed but not yet elapsed, or fired (armed and the
/// deadline has passed). Firing does not stop the timer; callers stop it
/// explicitly when they consume the event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Countdown {
    deadline: Option<Instant>,
}

impl Countdown {
    /// Creates a stopped countdown.
    #[must_use]
    pub const fn new() -> Self {
        Self { deadline: None }
    }

    /// Arms the countdown to fire `duration` after `now`.
    ///
    /// Re-arming an already armed countdown replaces its deadline.
    pub fn arm(&mut self, now: Instant, duration: Duration) {
        self.deadline = Some(now + duration);
    }

    /// Returns `true` if the countdown is armed (fired or not).
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Returns `true` if the countdown is armed and its deadline has been
    /// reached at `now`.
    #[must_use]
    pub fn is_fired(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Stops the countdown. Idempotent.
    pub fn stop(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_countdown_is_stopped() {
        let timer = Countdown::new();
        assert!(!timer.is_armed());
        assert!(!timer.is_fired(Instant::now()));
    }

    #[test]
    fn armed_countdown_fires_at_deadline_not_before() {
        let start = Instant::now();
        let mut timer = Countdown::new();
        timer.arm(start, Duration::from_secs(5));

        assert!(timer.is_armed());
        assert!(!timer.is_fired(start));
        assert!(!timer.is_fired(start + Duration::from_millis(4999)));
        assert!(timer.is_fired(start + Duration::from_secs(5)));
        assert!(timer.is_fired(start + Duration::from_secs(6)));
    }

    #[test]
    fn stop_disarms() {
        let start = Instant::now();
        let mut timer = Countdown::new();
        timer.arm(start, Duration::from_millis(1));
        timer.stop();

        assert!(!timer.is_armed());
        assert!(!timer.is_fired(start + Duration::from_secs(1)));
    }

    #[test]
    fn rearm_replaces_deadline() {
        let start = Instant::now();
        let mut timer = Countdown::new();
        timer.arm(start, Duration::from_millis(100));
        timer.arm(start, Duration::from_secs(10));

        assert!(!timer.is_fired(start + Duration::from_secs(1)));
        assert!(timer.is_fired(start + Duration::from_secs(10)));
    }
}
