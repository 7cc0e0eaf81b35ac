//! Fixed-period round clock
//!
//! Elapsed time is derived from an integer tick count so that a countdown
//! lands on exactly zero after `duration / period` ticks.

use serde::{Deserialize, Serialize};

/// Outcome of a single clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Clock is stopped; nothing advanced
    Stopped,
    /// Time advanced, countdown (if any) still running
    Running,
    /// Countdown reached zero on this tick
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundClock {
    period: f64,
    ticks: u64,
    duration: Option<f64>,
    running: bool,
}

impl RoundClock {
    /// A stopped clock at zero
    pub fn new(period: f64, duration_secs: Option<u32>) -> Self {
        Self {
            period,
            ticks: 0,
            duration: duration_secs.map(f64::from),
            running: false,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the clock. Safe to call repeatedly.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn period(&self) -> f64 {
        self.period
    }

    /// Advance one period if running
    pub fn tick(&mut self) -> ClockTick {
        if !self.running {
            return ClockTick::Stopped;
        }
        if self.is_expired() {
            return ClockTick::Expired;
        }
        self.ticks += 1;
        if self.is_expired() {
            ClockTick::Expired
        } else {
            ClockTick::Running
        }
    }

    /// Seconds elapsed since the round started (pauses excluded)
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * self.period
    }

    /// Seconds left on the countdown, floored at zero
    pub fn remaining(&self) -> Option<f64> {
        let total = self.duration?;
        if self.is_expired() {
            Some(0.0)
        } else {
            Some((total - self.elapsed()).max(0.0))
        }
    }

    /// Countdown progress in [0, 1]
    pub fn progress(&self) -> Option<f64> {
        let total = self.duration?;
        let remaining = self.remaining()?;
        if total <= 0.0 {
            return Some(1.0);
        }
        Some(((total - remaining) / total).clamp(0.0, 1.0))
    }

    pub fn is_expired(&self) -> bool {
        match self.duration {
            Some(total) => self.ticks >= self.ticks_for(total),
            None => false,
        }
    }

    fn ticks_for(&self, secs: f64) -> u64 {
        (secs / self.period).round() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::ROUND_TICK_SECS;
    use proptest::prelude::*;

    #[test]
    fn test_stopped_clock_does_not_advance() {
        let mut clock = RoundClock::new(ROUND_TICK_SECS, Some(60));
        assert_eq!(clock.tick(), ClockTick::Stopped);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.remaining(), Some(60.0));
        assert_eq!(clock.progress(), Some(0.0));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut clock = RoundClock::new(ROUND_TICK_SECS, None);
        clock.stop();
        clock.stop();
        assert!(!clock.is_running());
        clock.start();
        clock.tick();
        clock.stop();
        clock.stop();
        assert_eq!(clock.tick(), ClockTick::Stopped);
        assert!((clock.elapsed() - ROUND_TICK_SECS).abs() < 1e-9);
    }

    #[test]
    fn test_untimed_clock_never_expires() {
        let mut clock = RoundClock::new(ROUND_TICK_SECS, None);
        clock.start();
        for _ in 0..10_000 {
            assert_eq!(clock.tick(), ClockTick::Running);
        }
        assert_eq!(clock.remaining(), None);
        assert_eq!(clock.progress(), None);
        assert!((clock.elapsed() - 500.0).abs() < 1e-6);
    }

    #[test]
    fn test_countdown_expires_exactly_once() {
        let mut clock = RoundClock::new(ROUND_TICK_SECS, Some(20));
        clock.start();
        let mut expired_at = None;
        for i in 1..=400 {
            if clock.tick() == ClockTick::Expired && expired_at.is_none() {
                expired_at = Some(i);
            }
        }
        assert_eq!(expired_at, Some(400));
        assert_eq!(clock.remaining(), Some(0.0));
        assert_eq!(clock.progress(), Some(1.0));
        // Further ticks do not run past the end
        assert_eq!(clock.tick(), ClockTick::Expired);
        assert!((clock.elapsed() - 20.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn remaining_and_progress_follow_tick_count(n in 0u32..1500) {
            let mut clock = RoundClock::new(ROUND_TICK_SECS, Some(60));
            clock.start();
            for _ in 0..n {
                clock.tick();
            }
            let expected_remaining = (60.0 - ROUND_TICK_SECS * n as f64).max(0.0);
            let remaining = clock.remaining().unwrap();
            prop_assert!((remaining - expected_remaining).abs() < 1e-9);
            let expected_progress = ((60.0 - expected_remaining) / 60.0).clamp(0.0, 1.0);
            prop_assert!((clock.progress().unwrap() - expected_progress).abs() < 1e-9);
        }
    }
}
