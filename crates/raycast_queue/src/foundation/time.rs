//! Time management utilities

use serde::{Deserialize, Serialize};

/// Point in simulation time used to stamp request lifecycle transitions
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameStamp {
    /// Seconds of simulation time since the clock was created
    pub time: f64,
    /// Frame index at the moment of the stamp
    pub frame: u64,
}

/// Delta-driven frame clock
///
/// The scheduler owns one of these and advances it once per tick, so every
/// timestamp it hands to the contention policy is deterministic and does not
/// depend on wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    delta_time: f32,
    total_time: f64,
    frame_count: u64,
}

impl FrameClock {
    /// Create a new clock at frame 0, time 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one frame of `delta_time` seconds
    ///
    /// Negative or non-finite deltas are treated as zero so the clock stays
    /// monotonic.
    pub fn advance(&mut self, delta_time: f32) {
        let delta = if delta_time.is_finite() { delta_time.max(0.0) } else { 0.0 };
        self.delta_time = delta;
        self.total_time += f64::from(delta);
        self.frame_count += 1;
    }

    /// Get the time of the last advance in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed simulation time
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Stamp for "now"
    pub fn stamp(&self) -> FrameStamp {
        FrameStamp {
            time: self.total_time,
            frame: self.frame_count,
        }
    }

    /// Get the average tick rate since clock creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_tick_rate(&self) -> f64 {
        if self.total_time > 0.0 {
            self.frame_count as f64 / self.total_time
        } else {
            0.0
        }
    }
}
