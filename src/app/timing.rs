use std::cell::Cell;
use std::time::Instant;

/// Monotonic seconds. The run-loop and the scene widget read time through
/// this so tests can drive it by hand.
pub trait Clock {
    fn now(&self) -> f64;
}

pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        Instant::now()
            .saturating_duration_since(self.start)
            .as_secs_f64()
    }
}

#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Frame pacing for the window title, reported a couple of times a second.
pub struct FrameTiming {
    last_report: f64,
    frame_count: u32,
    base_title: String,
}

impl FrameTiming {
    pub fn new(base_title: String, now: f64) -> Self {
        Self {
            last_report: now,
            frame_count: 0,
            base_title,
        }
    }

    /// Counts a frame; returns a new title when it is time to show the rate.
    pub fn frame(&mut self, now: f64) -> Option<String> {
        self.frame_count = self.frame_count.saturating_add(1);
        let elapsed = now - self.last_report;
        if elapsed < 0.5 {
            return None;
        }
        let fps = self.frame_count as f64 / elapsed;
        self.frame_count = 0;
        self.last_report = now;
        Some(format!("{} - {:.1} fps", self.base_title, fps))
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FrameTiming, ManualClock};

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(1.0);
        clock.advance(0.25);
        assert_eq!(clock.now(), 1.25);
        clock.set(0.0);
        assert_eq!(clock.now(), 0.0);
    }

    #[test]
    fn frame_rate_reported_every_half_second() {
        let mut timing = FrameTiming::new("view".to_string(), 0.0);
        assert!(timing.frame(0.1).is_none());
        assert!(timing.frame(0.2).is_none());
        let title = timing.frame(0.5);
        assert_eq!(title.as_deref(), Some("view - 6.0 fps"));
    }
}
