//! Frames-per-second bookkeeping.

use instant::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts rendered frames and publishes the total once per second.
///
/// The published value stays constant between updates, which keeps the overlay
/// text from changing every frame.
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    fps: u32,
    window_start: Instant,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            frames: 0,
            fps: 0,
            window_start: now,
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    /// Record a frame rendered at `now`.
    pub fn tick_at(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed >= WINDOW {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = now;
        }
    }

    pub fn frames_per_second(&self) -> u32 {
        self.fps
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
