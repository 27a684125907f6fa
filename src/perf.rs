//! Frame timing

use std::time::{Duration, Instant};

/// Frames between FPS reports
pub const REPORT_INTERVAL: u32 = 100;

/// Counts presented frames and yields an FPS figure every [`REPORT_INTERVAL`]
#[derive(Debug)]
pub struct FrameCounter {
    frames: u32,
    window_start: Instant,
    last_frame: Instant,
}

impl FrameCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
            last_frame: now,
        }
    }

    /// Register a presented frame; returns the average FPS when a report is due
    pub fn frame(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;
        if self.frames < REPORT_INTERVAL {
            return None;
        }

        let elapsed = now.saturating_duration_since(self.window_start).as_secs_f64();
        let fps = self.frames as f64 / elapsed.max(f64::EPSILON);
        self.frames = 0;
        self.window_start = now;
        Some(fps)
    }

    /// Wall time since the previous call
    pub fn delta(&mut self, now: Instant) -> Duration {
        let delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        delta
    }
}
