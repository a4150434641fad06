//! Frame rate bookkeeping for the window host.
//!
//! The simulation advances a fixed amount per frame, so nothing here feeds
//! back into it; the clock only counts frames and reports a smoothed FPS
//! once per interval.
//!
//! ```ignore
//! let mut clock = FrameClock::new(Duration::from_millis(500));
//! // once per presented frame:
//! if let Some(fps) = clock.tick() {
//!     log::debug!("{fps:.1} fps");
//! }
//! ```

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    /// Total frames since start.
    frame_count: u64,
    /// Most recent FPS report.
    fps: f32,
    frames_at_report: u64,
    last_report: Instant,
    report_interval: Duration,
}

impl FrameClock {
    /// A clock reporting every `report_interval`.
    pub fn new(report_interval: Duration) -> Self {
        Self::starting_at(Instant::now(), report_interval)
    }

    fn starting_at(now: Instant, report_interval: Duration) -> Self {
        Self {
            start: now,
            frame_count: 0,
            fps: 0.0,
            frames_at_report: 0,
            last_report: now,
            report_interval,
        }
    }

    /// Count a frame. Returns the new FPS when an interval has elapsed.
    pub fn tick(&mut self) -> Option<f32> {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> Option<f32> {
        self.frame_count += 1;

        let since = now.duration_since(self.last_report);
        if since < self.report_interval {
            return None;
        }
        let frames = self.frame_count - self.frames_at_report;
        self.fps = frames as f32 / since.as_secs_f32();
        self.frames_at_report = self.frame_count;
        self.last_report = now;
        Some(self.fps)
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Last reported FPS, 0 before the first report.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(Duration::from_millis(500))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = FrameClock::default();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_no_report_before_interval() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0, Duration::from_secs(1));
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(100)), None);
        assert_eq!(clock.tick_at(t0 + Duration::from_millis(200)), None);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_reports_frames_per_second() {
        let t0 = Instant::now();
        let mut clock = FrameClock::starting_at(t0, Duration::from_secs(1));
        for i in 1..60 {
            assert!(clock.tick_at(t0 + Duration::from_millis(i * 16)).is_none());
        }
        let fps = clock.tick_at(t0 + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-3);

        // The next interval starts fresh.
        assert!(clock.tick_at(t0 + Duration::from_millis(1100)).is_none());
    }
}
