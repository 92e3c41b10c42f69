//! Timed, cancellable deferred actions
//!
//! The sim never blocks; anything delayed (damage recovery, staged track
//! population, cosmetic rotation) is a countdown advanced by the tick.
//! Cancellation is clearing the owning field, so a reset can never leave a
//! stale continuation that fires against new state.

use serde::{Deserialize, Serialize};

/// One-shot countdown timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickTimer {
    remaining: f32,
    duration: f32,
}

impl TickTimer {
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration,
            duration,
        }
    }

    /// Advance by `dt`. Returns true on the tick the timer expires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.remaining <= 0.0 {
            return false;
        }
        self.remaining -= dt;
        self.remaining <= 0.0
    }

    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    /// Fraction elapsed, clamped to [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (1.0 - self.remaining / self.duration).clamp(0.0, 1.0)
        }
    }
}

/// Repeating timer firing once per fixed interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cadence {
    interval: f32,
    accum: f32,
}

impl Cadence {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accum: 0.0,
        }
    }

    /// Advance by `dt`. Returns true on the tick the interval elapses.
    /// At most one fire per call; leftover time carries into the next cycle.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.accum += dt;
        if self.accum >= self.interval {
            self.accum -= self.interval;
            true
        } else {
            false
        }
    }

    pub fn restart(&mut self) {
        self.accum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_timer_fires_once() {
        let mut t = TickTimer::new(0.5);
        assert!(!t.tick(0.3));
        assert!(t.tick(0.3));
        assert!(t.expired());
        // Already expired, never fires again
        assert!(!t.tick(0.3));
    }

    #[test]
    fn test_tick_timer_progress() {
        let mut t = TickTimer::new(1.0);
        assert_eq!(t.progress(), 0.0);
        t.tick(0.25);
        assert!((t.progress() - 0.25).abs() < 1e-6);
        t.tick(2.0);
        assert_eq!(t.progress(), 1.0);
    }

    #[test]
    fn test_cadence_carries_remainder() {
        let mut c = Cadence::new(0.1);
        assert!(!c.tick(0.06));
        assert!(c.tick(0.06)); // 0.12 accumulated, 0.02 carried
        assert!(!c.tick(0.06));
        assert!(c.tick(0.06));
    }

    #[test]
    fn test_cadence_restart() {
        let mut c = Cadence::new(0.1);
        c.tick(0.09);
        c.restart();
        assert!(!c.tick(0.09));
        assert!(c.tick(0.02));
    }
}
