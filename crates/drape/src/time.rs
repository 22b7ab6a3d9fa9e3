//! Frame timing and delta time.
//!
//! Systems never read a global clock. The driver builds a [`FrameTime`] for
//! each frame and hands it to every system's `update`, so tests can inject
//! any timestep they like.
//!
//! [`Time`] is the wall-clock source the interactive driver uses to produce
//! those values.

use std::time::{Duration, Instant};

/// Timing for the frame currently being simulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame (unclamped).
    pub delta: f32,
    /// Seconds since the first frame, including this one.
    pub elapsed: f32,
    /// Zero-based frame counter.
    pub frame: u64,
}

impl FrameTime {
    pub fn new(frame: u64, delta: f32, elapsed: f32) -> Self {
        Self {
            delta,
            elapsed,
            frame,
        }
    }

    /// A frame from a fixed-step clock: `elapsed = (frame + 1) * delta`.
    pub fn fixed(frame: u64, delta: f32) -> Self {
        Self::new(frame, delta, (frame + 1) as f32 * delta)
    }

    /// Delta time in seconds.
    pub fn delta_secs(&self) -> f32 {
        self.delta
    }
}

/// Wall-clock frame timer. Call [`tick`](Time::tick) once per frame.
#[derive(Clone, Copy)]
pub struct Time {
    /// When the clock started.
    startup: Instant,
    /// When the current frame started.
    frame_start: Instant,
    /// Duration of the previous frame.
    delta: Duration,
    /// Frame counter.
    frame_count: u64,
}

impl Time {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            startup: now,
            frame_start: now,
            delta: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Advance to a new frame and return its timing.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        self.delta = now - self.frame_start;
        self.frame_start = now;
        let frame = FrameTime::new(
            self.frame_count,
            self.delta.as_secs_f32(),
            (now - self.startup).as_secs_f32(),
        );
        self.frame_count += 1;
        frame
    }

    /// Duration of the previous frame.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Number of frames ticked so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Estimated FPS based on the last frame's delta.
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
