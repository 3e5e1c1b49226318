//! Per-frame post-processing of the decimated line shown in the FFT area.

use super::DB_FLOOR;

/// Value the hold trace restarts from when enabled.
const HOLD_RESET_DB: f32 = -1000.0;
/// Margin added on both sides by [`DisplayTrace::auto_range`].
pub const AUTO_RANGE_MARGIN_DB: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceConfig {
    pub hold: bool,
    /// dB the hold trace decays per pushed line.
    pub hold_speed: f32,
    pub smoothing: bool,
    /// Weight of the newest line, `0..=1`.
    pub smoothing_speed: f32,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            hold: false,
            hold_speed: 0.3,
            smoothing: false,
            smoothing_speed: 0.5,
        }
    }
}

impl TraceConfig {
    pub fn normalize(&mut self) {
        self.hold_speed = self.hold_speed.max(0.0);
        self.smoothing_speed = self.smoothing_speed.clamp(0.0, 1.0);
    }
}

/// Latest decimated line plus its hold and smoothing companions.
#[derive(Debug, Clone, Default)]
pub struct DisplayTrace {
    config: TraceConfig,
    latest: Vec<f32>,
    smoothed: Vec<f32>,
    hold: Vec<f32>,
    lines: usize,
}

impl DisplayTrace {
    pub fn new(config: TraceConfig) -> Self {
        let mut trace = Self::default();
        trace.set_config(config);
        trace
    }

    pub fn config(&self) -> TraceConfig {
        self.config
    }

    pub fn set_config(&mut self, mut config: TraceConfig) {
        config.normalize();
        if config.hold && !self.config.hold {
            self.hold.fill(HOLD_RESET_DB);
        }
        if config.smoothing && !self.config.smoothing {
            self.smoothed.clone_from(&self.latest);
        }
        self.config = config;
    }

    /// Width change discards derived state.
    pub fn resize(&mut self, width: usize) {
        if self.latest.len() == width {
            return;
        }
        self.latest = vec![DB_FLOOR; width];
        self.smoothed = vec![DB_FLOOR; width];
        self.hold = vec![HOLD_RESET_DB; width];
        self.lines = 0;
    }

    /// Takes the newest decimated line. Smoothing runs first so the hold
    /// trace follows the smoothed values.
    pub fn update(&mut self, decimated: &[f32]) {
        self.resize(decimated.len());
        let first = self.lines == 0;
        self.latest.copy_from_slice(decimated);
        self.lines = self.lines.saturating_add(1);

        if self.config.smoothing {
            if first {
                self.smoothed.copy_from_slice(decimated);
            } else {
                let alpha = self.config.smoothing_speed;
                let beta = 1.0 - alpha;
                for (smoothed, &value) in self.smoothed.iter_mut().zip(decimated) {
                    *smoothed = alpha * value + beta * *smoothed;
                }
            }
            self.latest.copy_from_slice(&self.smoothed);
        }

        if self.config.hold {
            let speed = self.config.hold_speed;
            for (hold, &value) in self.hold.iter_mut().zip(&self.latest) {
                *hold = value.max(*hold - speed);
            }
        }
    }

    pub fn latest(&self) -> &[f32] {
        &self.latest
    }

    pub fn hold(&self) -> Option<&[f32]> {
        (self.config.hold && self.lines > 0).then_some(self.hold.as_slice())
    }

    pub fn has_data(&self) -> bool {
        self.lines > 0
    }

    pub fn clear(&mut self) {
        self.latest.fill(DB_FLOOR);
        self.smoothed.fill(DB_FLOOR);
        self.hold.fill(HOLD_RESET_DB);
        self.lines = 0;
    }

    /// `(min - 5, max + 5)` over the latest line.
    pub fn auto_range(&self) -> Option<(f32, f32)> {
        if self.lines == 0 || self.latest.is_empty() {
            return None;
        }
        let (min, max) = self
            .latest
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        Some((min - AUTO_RANGE_MARGIN_DB, max + AUTO_RANGE_MARGIN_DB))
    }
}

/// Exponential smoothing of the selected channel's SNR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnrSmoother {
    pub enabled: bool,
    pub speed: f32,
    value: f32,
}

impl Default for SnrSmoother {
    fn default() -> Self {
        Self {
            enabled: false,
            speed: 0.2,
            value: 0.0,
        }
    }
}

impl SnrSmoother {
    pub fn update(&mut self, snr_db: f32) -> f32 {
        self.value = if self.enabled {
            let alpha = self.speed.clamp(0.0, 1.0);
            (1.0 - alpha) * self.value + alpha * snr_db
        } else {
            snr_db
        };
        self.value
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
