//! Frame timing and periodic FPS reporting.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Rolling window of frame durations.
pub struct FrameTimer {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    last_report: Instant,
    max_samples: usize,
}

impl FrameTimer {
    /// A timer with a 120-sample window.
    pub fn new() -> Self {
        Self::with_window(120)
    }

    pub fn with_window(max_samples: usize) -> Self {
        let now = Instant::now();
        Self {
            frame_times: VecDeque::with_capacity(max_samples),
            last_frame: now,
            last_report: now,
            max_samples: max_samples.max(1),
        }
    }

    /// Record the start of a new frame.
    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        self.push(now - self.last_frame);
        self.last_frame = now;
    }

    fn push(&mut self, dt: Duration) {
        self.frame_times.push_back(dt);
        while self.frame_times.len() > self.max_samples {
            self.frame_times.pop_front();
        }
    }

    fn total_secs(&self) -> f64 {
        self.frame_times.iter().map(Duration::as_secs_f64).sum()
    }

    /// Average frames per second over the window.
    pub fn fps(&self) -> f64 {
        let total = self.total_secs();
        if total <= 0.0 {
            return 0.0;
        }
        self.frame_times.len() as f64 / total
    }

    /// Average frame time in milliseconds.
    pub fn frame_time_ms(&self) -> f64 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        self.total_secs() / self.frame_times.len() as f64 * 1000.0
    }

    pub fn sample_count(&self) -> usize {
        self.frame_times.len()
    }

    /// True at most once per `interval`. A zero interval never reports.
    pub fn report_due(&mut self, interval: Duration) -> bool {
        if interval.is_zero() || self.last_report.elapsed() < interval {
            return false;
        }
        self.last_report = Instant::now();
        true
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}
