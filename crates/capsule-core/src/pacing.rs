use std::time::Duration;

use instant::Instant;

use crate::constants::{FRAME_SLACK_MS, TARGET_FPS};

/// Throttles a display-driven callback to a fixed frame rate.
///
/// Ticks that arrive before the interval has elapsed are dropped outright, so
/// the next rendered frame always reads the newest inputs.
#[derive(Debug)]
pub struct FramePacer {
    interval: Duration,
    slack: Duration,
    last: Option<Instant>,
    skipped: u64,
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(TARGET_FPS)
    }
}

impl FramePacer {
    pub fn new(fps: f32) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 { fps } else { TARGET_FPS };
        Self {
            interval: Duration::from_secs_f32(1.0 / fps),
            slack: Duration::from_millis(FRAME_SLACK_MS),
            last: None,
            skipped: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Ticks skipped since construction.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    /// Seconds since the last rendered frame when a frame is due, else `None`.
    /// The first tick always renders with a zero delta.
    pub fn tick_at(&mut self, now: Instant) -> Option<f32> {
        let Some(last) = self.last else {
            self.last = Some(now);
            return Some(0.0);
        };
        let elapsed = if now > last { now - last } else { Duration::ZERO };
        if elapsed + self.slack < self.interval {
            self.skipped += 1;
            return None;
        }
        self.last = Some(now);
        Some(elapsed.as_secs_f32())
    }
}
