//! Millisecond clock for animation timestamps
//!
//! Keyframe timestamps are absolute milliseconds from the driving clock. The
//! default clock measures elapsed time since construction; tests swap in a
//! manual clock to make interpolation deterministic.

use std::time::Instant;

#[derive(Debug)]
enum ClockSource {
    Monotonic(Instant),
    Manual(f64),
}

/// Millisecond time source
#[derive(Debug)]
pub struct Clock {
    source: ClockSource,
}

impl Clock {
    /// A clock reporting milliseconds elapsed since this call
    pub fn monotonic() -> Self {
        Self {
            source: ClockSource::Monotonic(Instant::now()),
        }
    }

    /// A manually-driven clock starting at `now_ms`
    pub fn manual(now_ms: f64) -> Self {
        Self {
            source: ClockSource::Manual(now_ms),
        }
    }

    /// Current time in milliseconds
    pub fn now_ms(&self) -> f64 {
        match &self.source {
            ClockSource::Monotonic(start) => start.elapsed().as_secs_f64() * 1000.0,
            ClockSource::Manual(now) => *now,
        }
    }

    /// Set the current time of a manual clock; ignored for monotonic clocks
    pub fn set_ms(&mut self, now_ms: f64) {
        if let ClockSource::Manual(now) = &mut self.source {
            *now = now_ms;
        }
    }

    /// Advance a manual clock; ignored for monotonic clocks
    pub fn advance_ms(&mut self, delta_ms: f64) {
        if let ClockSource::Manual(now) = &mut self.source {
            *now += delta_ms;
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::monotonic()
    }
}
