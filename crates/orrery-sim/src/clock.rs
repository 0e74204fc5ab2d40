//! Variable-step frame clock.
//!
//! Each tick measures the wall time since the previous one. There is no fixed
//! step and no clamping: a long stall produces one large step.

use std::time::Instant;

use tracing::debug;

/// Frames longer than this are logged.
const SLOW_FRAME_SECS: f64 = 0.25;

/// Timing of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous tick; zero on the first.
    pub delta: f64,
    /// Seconds since the clock started. Keeps running while paused.
    pub elapsed: f64,
    /// Zero-based tick number.
    pub frame: u64,
}

impl FrameTime {
    pub fn new(delta: f64, elapsed: f64) -> Self {
        Self {
            delta,
            elapsed,
            frame: 0,
        }
    }
}

pub struct FrameClock {
    start: Instant,
    previous: Option<Instant>,
    frame_count: u64,
}

impl FrameClock {
    pub fn new(start: Instant) -> Self {
        Self {
            start,
            previous: None,
            frame_count: 0,
        }
    }

    /// Measure a tick ending at `now`. Instants earlier than the previous tick
    /// yield a zero delta.
    pub fn advance(&mut self, now: Instant) -> FrameTime {
        let delta = self
            .previous
            .map(|previous| now.saturating_duration_since(previous).as_secs_f64())
            .unwrap_or(0.0);
        if delta > SLOW_FRAME_SECS {
            debug!(delta_ms = delta * 1000.0, "slow frame");
        }
        self.previous = Some(now);
        let frame = self.frame_count;
        self.frame_count += 1;
        FrameTime {
            delta,
            elapsed: now.saturating_duration_since(self.start).as_secs_f64(),
            frame,
        }
    }

    /// Number of ticks measured so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_first_tick_has_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        let time = clock.advance(start + Duration::from_millis(40));
        assert_eq!(time.delta, 0.0);
        assert!((time.elapsed - 0.04).abs() < 1e-9);
        assert_eq!(time.frame, 0);
    }

    #[test]
    fn test_delta_is_wall_time_between_ticks() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        clock.advance(start);
        let time = clock.advance(start + Duration::from_millis(16));
        assert!((time.delta - 0.016).abs() < 1e-9);
        assert_eq!(time.frame, 1);
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_long_stall_is_not_clamped() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        clock.advance(start);
        let time = clock.advance(start + Duration::from_secs(3));
        assert!((time.delta - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_backwards_instant_gives_zero_delta() {
        let start = Instant::now();
        let mut clock = FrameClock::new(start);
        clock.advance(start + Duration::from_millis(50));
        let time = clock.advance(start + Duration::from_millis(10));
        assert_eq!(time.delta, 0.0);
    }
}
