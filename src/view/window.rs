use super::projector::FrequencyProjector;

/// Visible slice of the acquired band.
///
/// The acquired band is `whole_bandwidth` Hz wide around `center_frequency`;
/// the view shows `view_bandwidth` Hz around `center_frequency + view_offset`
/// and never leaves the acquired band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    center_frequency: f64,
    whole_bandwidth: f64,
    view_bandwidth: f64,
    view_offset: f64,
    center_locked: bool,
}

impl Default for ViewWindow {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

impl ViewWindow {
    pub fn new(center_frequency: f64, whole_bandwidth: f64) -> Self {
        let whole_bandwidth = if whole_bandwidth > 0.0 {
            whole_bandwidth
        } else {
            1.0
        };
        Self {
            center_frequency,
            whole_bandwidth,
            view_bandwidth: whole_bandwidth,
            view_offset: 0.0,
            center_locked: false,
        }
    }

    pub fn center_frequency(&self) -> f64 {
        self.center_frequency
    }

    pub fn whole_bandwidth(&self) -> f64 {
        self.whole_bandwidth
    }

    pub fn view_bandwidth(&self) -> f64 {
        self.view_bandwidth
    }

    pub fn view_offset(&self) -> f64 {
        self.view_offset
    }

    pub fn lower_freq(&self) -> f64 {
        self.center_frequency + self.view_offset - self.view_bandwidth / 2.0
    }

    pub fn upper_freq(&self) -> f64 {
        self.center_frequency + self.view_offset + self.view_bandwidth / 2.0
    }

    pub fn is_zoomed(&self) -> bool {
        self.view_bandwidth != self.whole_bandwidth
    }

    pub fn center_locked(&self) -> bool {
        self.center_locked
    }

    pub fn set_center_locked(&mut self, locked: bool) {
        self.center_locked = locked;
    }

    pub fn projector(&self, origin_x: f64, width: f64) -> FrequencyProjector {
        FrequencyProjector::new(origin_x, width, self.lower_freq(), self.upper_freq())
    }

    pub fn set_center_frequency(&mut self, freq: f64) {
        self.center_frequency = freq;
    }

    /// Zooms to `bandwidth`, sliding the view back inside the acquired band.
    /// The bandwidth is limited to the whole band. Returns `true` on change.
    pub fn set_view_bandwidth(&mut self, bandwidth: f64) -> bool {
        if !(bandwidth > 0.0) {
            return false;
        }
        let bandwidth = bandwidth.min(self.whole_bandwidth);
        if bandwidth == self.view_bandwidth {
            return false;
        }
        self.fit_view(bandwidth);
        true
    }

    fn fit_view(&mut self, bandwidth: f64) {
        let half_whole = self.whole_bandwidth / 2.0;
        if self.view_offset.abs() + bandwidth / 2.0 > half_whole {
            self.view_offset = if self.view_offset < 0.0 {
                bandwidth / 2.0 - half_whole
            } else {
                half_whole - bandwidth / 2.0
            };
        }
        self.view_bandwidth = bandwidth;
    }

    /// Pans to `offset`, clamped so the view stays inside the acquired band.
    pub fn set_view_offset(&mut self, offset: f64) -> bool {
        if offset == self.view_offset {
            return false;
        }
        let limit = (self.whole_bandwidth - self.view_bandwidth) / 2.0;
        let offset = offset.clamp(-limit, limit);
        let changed = offset != self.view_offset;
        self.view_offset = offset;
        changed
    }

    /// Changes the acquired bandwidth keeping the zoom ratio.
    pub fn set_whole_bandwidth(&mut self, bandwidth: f64) -> bool {
        if !(bandwidth > 0.0) || bandwidth == self.whole_bandwidth {
            return false;
        }
        let ratio = self.view_bandwidth / self.whole_bandwidth;
        self.whole_bandwidth = bandwidth;
        self.fit_view(bandwidth * ratio);
        true
    }

    /// Moves the view by `delta` Hz. Movement past either band edge retunes
    /// the centre frequency by the overshoot unless it is locked; the
    /// applied retune is returned.
    pub fn pan(&mut self, delta: f64) -> Option<f64> {
        let half_whole = self.whole_bandwidth / 2.0;
        let half_view = self.view_bandwidth / 2.0;
        self.view_offset += delta;

        let overshoot = if self.view_offset + half_view > half_whole {
            let overshoot = self.view_offset + half_view - half_whole;
            self.view_offset = half_whole - half_view;
            overshoot
        } else if self.view_offset - half_view < -half_whole {
            let overshoot = self.view_offset - half_view + half_whole;
            self.view_offset = half_view - half_whole;
            overshoot
        } else {
            return None;
        };

        if self.center_locked || overshoot == 0.0 {
            return None;
        }
        self.center_frequency += overshoot;
        Some(overshoot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_keeps_view_inside_band() {
        let mut window = ViewWindow::new(100e6, 2e6);
        assert!(window.set_view_bandwidth(1e6));
        assert!(window.set_view_offset(10e6));
        assert_eq!(window.view_offset(), 0.5e6);
        assert_eq!(window.upper_freq(), 101e6);

        assert!(window.set_view_bandwidth(1.5e6));
        assert_eq!(window.view_offset(), 0.25e6);
        assert_eq!(window.upper_freq(), 101e6);
        assert!(!window.set_view_bandwidth(1.5e6));
    }

    #[test]
    fn whole_bandwidth_change_keeps_ratio() {
        let mut window = ViewWindow::new(0.0, 1000.0);
        window.set_view_bandwidth(250.0);
        window.set_whole_bandwidth(2000.0);
        assert_eq!(window.view_bandwidth(), 500.0);
    }

    #[test]
    fn pan_past_edge_retunes() {
        let mut window = ViewWindow::new(100e6, 2e6);
        window.set_view_bandwidth(1e6);
        assert_eq!(window.pan(0.4e6), None);
        assert_eq!(window.pan(0.3e6), Some(0.2e6));
        assert_eq!(window.center_frequency(), 100.2e6);
        assert_eq!(window.view_offset(), 0.5e6);

        window.set_center_locked(true);
        assert_eq!(window.pan(-2e6), None);
        assert_eq!(window.view_offset(), -0.5e6);
        assert_eq!(window.center_frequency(), 100.2e6);
    }
}
