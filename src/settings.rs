//! Configuration read by every finder operation when an explicit argument is omitted

use crate::highlight::Color;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Default maximum wait for verify/exists/wait_vanish
    pub auto_wait_timeout: Duration,
    /// Match attempts per second while waiting
    pub wait_scan_rate: f32,
    /// Similarity threshold for patterns that do not set their own (0.0 to 1.0)
    pub min_similarity: f32,
    /// Highlight every successful match
    pub highlight_enabled: bool,
    /// Default highlight color
    pub highlight_color: Color,
    /// Default time a highlight stays visible
    pub highlight_duration: Duration,
}

pub const DEFAULT_WAIT_SCAN_RATE: f32 = 3.0;

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_wait_timeout: Duration::from_secs(3),
            wait_scan_rate: DEFAULT_WAIT_SCAN_RATE,
            min_similarity: 0.8,
            highlight_enabled: false,
            highlight_color: Color::Red,
            highlight_duration: Duration::from_secs(2),
        }
    }
}

impl Settings {
    /// Preset for scripted checks against static screenshots: short waits, fast polling
    pub fn quick() -> Self {
        Self {
            auto_wait_timeout: Duration::from_millis(500),
            wait_scan_rate: 20.0,
            highlight_duration: Duration::from_millis(200),
            ..Self::default()
        }
    }

    pub fn with_auto_wait_timeout(mut self, timeout: Duration) -> Self {
        self.auto_wait_timeout = timeout;
        self
    }

    pub fn with_wait_scan_rate(mut self, rate: f32) -> Self {
        self.wait_scan_rate = rate;
        self
    }

    pub fn with_min_similarity(mut self, similarity: f32) -> Self {
        self.min_similarity = similarity.clamp(0.0, 1.0);
        self
    }

    pub fn with_highlight(mut self, enabled: bool) -> Self {
        self.highlight_enabled = enabled;
        self
    }

    pub fn with_highlight_color(mut self, color: Color) -> Self {
        self.highlight_color = color;
        self
    }

    pub fn with_highlight_duration(mut self, duration: Duration) -> Self {
        self.highlight_duration = duration;
        self
    }

    /// Pause between two match attempts while waiting
    pub fn scan_interval(&self) -> Duration {
        let rate = self.wait_scan_rate;
        if rate.is_finite()
            && rate > 0.0
            && let Ok(interval) = Duration::try_from_secs_f32(1.0 / rate)
        {
            return interval;
        }

        log::warn!(
            "Invalid wait scan rate {}, using {}",
            rate,
            DEFAULT_WAIT_SCAN_RATE
        );
        Duration::from_secs_f32(1.0 / DEFAULT_WAIT_SCAN_RATE)
    }
}
