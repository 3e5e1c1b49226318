//! Selectable channel overlay.
//!
//! A VFO keeps three offsets relative to the tuned centre frequency. The one
//! named by [`Reference`] is the anchor that user interaction drives; the
//! other two are always re-derived from it and the bandwidth, so
//! `upper - lower == bandwidth` and `center == (lower + upper) / 2` hold after
//! every mutation.

use super::projector::FrequencyProjector;
use super::{Point, Rect};
use crate::util::color::Rgba;
use crate::view::theme;
use serde::{Deserialize, Serialize};

/// Below this on-screen width the resize grips are disabled.
const MIN_RESIZABLE_WIDTH: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    Lower,
    #[default]
    Center,
    Upper,
}

/// Which derived values moved since the last [`Vfo::take_changes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VfoChanges {
    pub center_offset: bool,
    pub lower_offset: bool,
    pub upper_offset: bool,
    pub bandwidth: bool,
}

impl VfoChanges {
    pub fn any(&self) -> bool {
        self.center_offset || self.lower_offset || self.upper_offset || self.bandwidth
    }
}

#[derive(Debug, Clone)]
pub struct VfoConfig {
    pub reference: Reference,
    pub offset: f64,
    pub bandwidth: f64,
    pub min_bandwidth: f64,
    pub max_bandwidth: f64,
    pub snap_interval: f64,
    pub bandwidth_locked: bool,
    pub color: Rgba,
}

impl Default for VfoConfig {
    fn default() -> Self {
        Self {
            reference: Reference::Center,
            offset: 0.0,
            bandwidth: 12_500.0,
            min_bandwidth: 1_000.0,
            max_bandwidth: 200_000.0,
            snap_interval: 1.0,
            bandwidth_locked: false,
            color: theme::VFO_FILL,
        }
    }
}

/// Screen geometry derived from the offsets and the current projection.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VfoGeometry {
    pub rect: Rect,
    pub line: (Point, Point),
    pub line_visible: bool,
    pub left_clamped: bool,
    pub right_clamped: bool,
    pub lower_grip: Rect,
    pub upper_grip: Rect,
    pub notch: Rect,
    pub wf_rect: Rect,
    pub wf_line: (Point, Point),
    pub wf_lower_grip: Rect,
    pub wf_upper_grip: Rect,
}

/// Pixel areas the VFO is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VfoArea {
    pub fft: Rect,
    pub waterfall: Option<Rect>,
    pub grip: f32,
}

#[derive(Debug, Clone)]
pub struct Vfo {
    name: String,
    reference: Reference,
    general_offset: f64,
    center_offset: f64,
    lower_offset: f64,
    upper_offset: f64,
    bandwidth: f64,
    min_bandwidth: f64,
    max_bandwidth: f64,
    snap_interval: f64,
    bandwidth_locked: bool,
    notch_offset: f64,
    notch_visible: bool,
    color: Rgba,
    changes: VfoChanges,
    redraw_required: bool,
    geometry: VfoGeometry,
}

impl Vfo {
    pub fn new(name: impl Into<String>, config: VfoConfig) -> Self {
        let min_bandwidth = config.min_bandwidth.max(0.0);
        let max_bandwidth = config.max_bandwidth.max(min_bandwidth);
        let mut vfo = Self {
            name: name.into(),
            reference: config.reference,
            general_offset: 0.0,
            center_offset: 0.0,
            lower_offset: 0.0,
            upper_offset: 0.0,
            bandwidth: config.bandwidth.clamp(min_bandwidth, max_bandwidth),
            min_bandwidth,
            max_bandwidth,
            snap_interval: if config.snap_interval > 0.0 {
                config.snap_interval
            } else {
                1.0
            },
            bandwidth_locked: config.bandwidth_locked,
            notch_offset: 0.0,
            notch_visible: false,
            color: config.color,
            changes: VfoChanges::default(),
            redraw_required: true,
            geometry: VfoGeometry::default(),
        };
        vfo.set_offset(config.offset);
        vfo.changes = VfoChanges::default();
        vfo
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reference(&self) -> Reference {
        self.reference
    }

    /// Offset of the anchor edge.
    pub fn offset(&self) -> f64 {
        self.general_offset
    }

    pub fn center_offset(&self) -> f64 {
        self.center_offset
    }

    pub fn lower_offset(&self) -> f64 {
        self.lower_offset
    }

    pub fn upper_offset(&self) -> f64 {
        self.upper_offset
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn min_bandwidth(&self) -> f64 {
        self.min_bandwidth
    }

    pub fn max_bandwidth(&self) -> f64 {
        self.max_bandwidth
    }

    pub fn snap_interval(&self) -> f64 {
        self.snap_interval
    }

    pub fn bandwidth_locked(&self) -> bool {
        self.bandwidth_locked
    }

    pub fn notch_offset(&self) -> f64 {
        self.notch_offset
    }

    pub fn notch_visible(&self) -> bool {
        self.notch_visible
    }

    pub fn color(&self) -> Rgba {
        self.color
    }

    pub fn geometry(&self) -> &VfoGeometry {
        &self.geometry
    }

    pub fn redraw_required(&self) -> bool {
        self.redraw_required
    }

    fn mark_offsets_changed(&mut self) {
        self.changes.center_offset = true;
        self.changes.lower_offset = true;
        self.changes.upper_offset = true;
        self.redraw_required = true;
    }

    /// Moves the anchor edge to `offset`.
    pub fn set_offset(&mut self, offset: f64) {
        self.general_offset = offset;
        let half = self.bandwidth / 2.0;
        match self.reference {
            Reference::Center => {
                self.center_offset = offset;
                self.lower_offset = offset - half;
                self.upper_offset = offset + half;
            }
            Reference::Lower => {
                self.lower_offset = offset;
                self.center_offset = offset + half;
                self.upper_offset = offset + self.bandwidth;
            }
            Reference::Upper => {
                self.upper_offset = offset;
                self.center_offset = offset - half;
                self.lower_offset = offset - self.bandwidth;
            }
        }
        self.mark_offsets_changed();
    }

    /// Moves the channel so its centre sits at `offset`.
    pub fn set_center_offset(&mut self, offset: f64) {
        let half = self.bandwidth / 2.0;
        self.general_offset = match self.reference {
            Reference::Center => offset,
            Reference::Lower => offset - half,
            Reference::Upper => offset + half,
        };
        self.center_offset = offset;
        self.lower_offset = offset - half;
        self.upper_offset = offset + half;
        self.mark_offsets_changed();
    }

    /// Resizes around the anchor edge. Negative or unchanged values are
    /// ignored; everything else is clamped to the bandwidth limits. Returns
    /// `true` when the bandwidth changed.
    pub fn set_bandwidth(&mut self, bandwidth: f64) -> bool {
        if !(bandwidth >= 0.0) {
            return false;
        }
        let bandwidth = bandwidth.clamp(self.min_bandwidth, self.max_bandwidth);
        if bandwidth == self.bandwidth {
            return false;
        }

        self.bandwidth = bandwidth;
        let half = bandwidth / 2.0;
        match self.reference {
            Reference::Center => {
                self.lower_offset = self.center_offset - half;
                self.upper_offset = self.center_offset + half;
                self.changes.lower_offset = true;
                self.changes.upper_offset = true;
            }
            Reference::Lower => {
                self.center_offset = self.lower_offset + half;
                self.upper_offset = self.lower_offset + bandwidth;
                self.changes.center_offset = true;
                self.changes.upper_offset = true;
            }
            Reference::Upper => {
                self.center_offset = self.upper_offset - half;
                self.lower_offset = self.upper_offset - bandwidth;
                self.changes.center_offset = true;
                self.changes.lower_offset = true;
            }
        }
        self.changes.bandwidth = true;
        self.redraw_required = true;
        true
    }

    /// Changes the anchor edge without moving the channel.
    pub fn set_reference(&mut self, reference: Reference) {
        if reference == self.reference {
            return;
        }
        self.reference = reference;
        let anchor = match reference {
            Reference::Center => self.center_offset,
            Reference::Lower => self.lower_offset,
            Reference::Upper => self.upper_offset,
        };
        self.set_offset(anchor);
    }

    /// Narrows or widens the limits and re-clamps the current bandwidth.
    pub fn set_bandwidth_limits(&mut self, min: f64, max: f64) {
        self.min_bandwidth = min.max(0.0);
        self.max_bandwidth = max.max(self.min_bandwidth);
        let clamped = self.bandwidth.clamp(self.min_bandwidth, self.max_bandwidth);
        self.set_bandwidth(clamped);
    }

    pub fn set_bandwidth_locked(&mut self, locked: bool) {
        self.bandwidth_locked = locked;
    }

    /// Non-positive intervals are ignored.
    pub fn set_snap_interval(&mut self, interval: f64) {
        if interval > 0.0 {
            self.snap_interval = interval;
        }
    }

    /// Notch position relative to the centre offset.
    pub fn set_notch_offset(&mut self, offset: f64) {
        self.notch_offset = offset;
        self.redraw_required = true;
    }

    pub fn set_notch_visible(&mut self, visible: bool) {
        self.notch_visible = visible;
        self.redraw_required = true;
    }

    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
        self.redraw_required = true;
    }

    pub fn take_changes(&mut self) -> VfoChanges {
        std::mem::take(&mut self.changes)
    }

    /// Rounds an absolute frequency to the nearest snap multiple.
    pub fn snap(&self, frequency: f64) -> f64 {
        (frequency / self.snap_interval).round() * self.snap_interval
    }

    /// Recomputes the screen geometry. `projector` maps absolute frequencies
    /// across the FFT area; offsets are relative to `center_frequency`.
    pub fn update_geometry(
        &mut self,
        projector: &FrequencyProjector,
        center_frequency: f64,
        area: &VfoArea,
    ) {
        let origin = projector.origin_x();
        let data_width = projector.width().round() as i64;
        let pixel = |offset: f64| (projector.to_pixel(center_frequency + offset) - origin).round() as i64;

        let center = pixel(self.center_offset);
        let left = pixel(self.lower_offset);
        let right = pixel(self.upper_offset);
        let notch = pixel(self.center_offset + self.notch_offset);

        let anchor = match self.reference {
            Reference::Lower => left,
            Reference::Center => center,
            Reference::Upper => right,
        };

        let fft = area.fft;
        let grip = area.grip;
        let origin = origin as f32;
        let line_x = origin + anchor as f32;

        let max_px = (data_width - 1).max(0);
        let left_px = left.clamp(0, max_px);
        let right_px = right.clamp(0, max_px);

        let rect = Rect::from_coords(
            origin + left_px as f32,
            fft.min.y + 1.0,
            origin + right_px as f32 + 1.0,
            fft.max.y,
        );

        let mut geometry = VfoGeometry {
            rect,
            line: (
                Point::new(line_x, fft.min.y),
                Point::new(line_x, fft.max.y - 1.0),
            ),
            line_visible: (0..data_width).contains(&anchor),
            left_clamped: left_px != left,
            right_clamped: right_px != right,
            lower_grip: Rect::from_coords(rect.min.x - grip, rect.min.y, rect.min.x + grip, rect.max.y),
            upper_grip: Rect::from_coords(rect.max.x - grip, rect.min.y, rect.max.x + grip, rect.max.y),
            notch: Rect::from_coords(
                origin + notch as f32 - grip,
                fft.min.y,
                origin + notch as f32 + grip,
                fft.max.y - 1.0,
            ),
            ..VfoGeometry::default()
        };

        if let Some(wf) = area.waterfall {
            let wf_rect = Rect::from_coords(rect.min.x, wf.min.y, rect.max.x, wf.max.y);
            geometry.wf_rect = wf_rect;
            geometry.wf_line = (
                Point::new(line_x, wf.min.y - 1.0),
                Point::new(line_x, wf.max.y - 1.0),
            );
            geometry.wf_lower_grip =
                Rect::from_coords(wf_rect.min.x - grip, wf_rect.min.y, wf_rect.min.x + grip, wf_rect.max.y);
            geometry.wf_upper_grip =
                Rect::from_coords(wf_rect.max.x - grip, wf_rect.min.y, wf_rect.max.x + grip, wf_rect.max.y);
        }

        self.geometry = geometry;
        self.redraw_required = false;
    }

    /// Pointer is over the channel box in either area.
    pub fn hovered(&self, position: Point) -> bool {
        self.geometry.rect.hovers(position) || self.geometry.wf_rect.hovers(position)
    }

    /// Pointer is on an edge that may be dragged to resize.
    pub fn grip_hit(&self, position: Point) -> bool {
        let geometry = &self.geometry;
        if self.bandwidth_locked || geometry.rect.width() < MIN_RESIZABLE_WIDTH {
            return false;
        }

        let lower = self.reference != Reference::Lower
            && !geometry.left_clamped
            && (geometry.lower_grip.contains(position) || geometry.wf_lower_grip.contains(position));
        let upper = self.reference != Reference::Upper
            && !geometry.right_clamped
            && (geometry.upper_grip.contains(position) || geometry.wf_upper_grip.contains(position));
        lower || upper
    }

    /// Resize drag: converts the pointer distance from the anchor line into a
    /// bandwidth. Returns the new bandwidth when it changed.
    pub fn drag_resize(&mut self, pointer_x: f32, hz_per_pixel: f64) -> Option<f64> {
        let line_x = self.geometry.line.0.x;
        let mut distance = (pointer_x - line_x) as f64;
        match self.reference {
            Reference::Center => distance = distance.abs() * 2.0,
            Reference::Upper => distance = -distance,
            Reference::Lower => {}
        }

        let bandwidth = (distance * hz_per_pixel).clamp(self.min_bandwidth, self.max_bandwidth);
        self.set_bandwidth(bandwidth).then_some(bandwidth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn vfo(reference: Reference) -> Vfo {
        Vfo::new(
            "radio",
            VfoConfig {
                reference,
                offset: 1_000.0,
                bandwidth: 200.0,
                min_bandwidth: 100.0,
                max_bandwidth: 1_000.0,
                ..VfoConfig::default()
            },
        )
    }

    fn assert_consistent(vfo: &Vfo) {
        assert!((vfo.upper_offset() - vfo.lower_offset() - vfo.bandwidth()).abs() < 1e-6);
        assert!(
            (vfo.center_offset() - (vfo.lower_offset() + vfo.upper_offset()) / 2.0).abs() < 1e-6
        );
    }

    #[test]
    fn offset_moves_the_anchor_edge() {
        let lower = vfo(Reference::Lower);
        assert_eq!(lower.lower_offset(), 1_000.0);
        assert_eq!(lower.upper_offset(), 1_200.0);

        let upper = vfo(Reference::Upper);
        assert_eq!(upper.upper_offset(), 1_000.0);
        assert_eq!(upper.center_offset(), 900.0);
    }

    #[test]
    fn bandwidth_holds_anchor() {
        let mut lower = vfo(Reference::Lower);
        assert!(lower.set_bandwidth(400.0));
        assert_eq!(lower.lower_offset(), 1_000.0);
        assert_eq!(lower.upper_offset(), 1_400.0);

        let mut center = vfo(Reference::Center);
        assert!(center.set_bandwidth(400.0));
        assert_eq!(center.center_offset(), 1_000.0);
        assert_eq!(center.lower_offset(), 800.0);
    }

    #[test]
    fn bandwidth_noops_and_clamps() {
        let mut center = vfo(Reference::Center);
        center.take_changes();
        assert!(!center.set_bandwidth(200.0));
        assert!(!center.set_bandwidth(-5.0));
        assert!(!center.take_changes().any());

        assert!(center.set_bandwidth(5_000.0));
        assert_eq!(center.bandwidth(), 1_000.0);
        assert!(center.set_bandwidth(1.0));
        assert_eq!(center.bandwidth(), 100.0);
        assert!(center.take_changes().bandwidth);
    }

    #[test]
    fn reference_change_keeps_position() {
        let mut vfo = vfo(Reference::Center);
        let (lower, upper) = (vfo.lower_offset(), vfo.upper_offset());
        vfo.set_reference(Reference::Upper);
        assert_eq!(vfo.offset(), upper);
        assert_eq!((vfo.lower_offset(), vfo.upper_offset()), (lower, upper));
        vfo.set_reference(Reference::Lower);
        assert_eq!(vfo.offset(), lower);
    }

    #[test]
    fn center_offset_keeps_reference_meaning() {
        let mut vfo = vfo(Reference::Lower);
        vfo.set_center_offset(0.0);
        assert_eq!(vfo.offset(), -100.0);
        assert_eq!(vfo.lower_offset(), -100.0);
    }

    #[test]
    fn snaps_to_interval() {
        let mut vfo = vfo(Reference::Center);
        vfo.set_snap_interval(2_500.0);
        assert_eq!(vfo.snap(101_001_300.0), 101_002_500.0);
        vfo.set_snap_interval(0.0);
        assert_eq!(vfo.snap_interval(), 2_500.0);
    }

    fn area() -> VfoArea {
        VfoArea {
            fft: Rect::from_coords(50.0, 9.0, 1050.0, 260.0),
            waterfall: Some(Rect::from_coords(50.0, 301.0, 1050.0, 600.0)),
            grip: 2.0,
        }
    }

    #[test]
    fn geometry_follows_projection() {
        // 1000 px over 10 kHz centred on 100 MHz.
        let projector = FrequencyProjector::new(50.0, 1000.0, 99_995_000.0, 100_005_000.0);
        let mut vfo = vfo(Reference::Center);
        vfo.set_offset(0.0);
        vfo.set_bandwidth(1_000.0);
        vfo.update_geometry(&projector, 100_000_000.0, &area());

        let geometry = vfo.geometry();
        assert!(geometry.line_visible);
        assert_eq!(geometry.line.0.x, 550.0);
        assert_eq!(geometry.rect.min.x, 500.0);
        assert_eq!(geometry.rect.max.x, 601.0);
        assert_eq!(geometry.wf_rect.min.y, 301.0);
        assert!(!geometry.left_clamped && !geometry.right_clamped);
        assert!(!vfo.redraw_required());

        assert!(vfo.hovered(Point::new(550.0, 100.0)));
        assert!(vfo.hovered(Point::new(550.0, 400.0)));
        assert!(vfo.grip_hit(Point::new(501.0, 100.0)));
        assert!(!vfo.grip_hit(Point::new(550.0, 100.0)));
    }

    #[test]
    fn geometry_clamps_offscreen_edges() {
        let projector = FrequencyProjector::new(50.0, 1000.0, 99_995_000.0, 100_005_000.0);
        let mut vfo = vfo(Reference::Center);
        vfo.set_offset(-5_000.0);
        vfo.update_geometry(&projector, 100_000_000.0, &area());
        let geometry = vfo.geometry();
        assert!(geometry.left_clamped);
        assert!(!geometry.right_clamped);
        assert!(geometry.line_visible);
        assert_eq!(geometry.rect.min.x, 50.0);
    }

    #[test]
    fn drag_resize_doubles_for_center_reference() {
        let projector = FrequencyProjector::new(50.0, 1000.0, 99_995_000.0, 100_005_000.0);
        let mut vfo = vfo(Reference::Center);
        vfo.set_offset(0.0);
        vfo.update_geometry(&projector, 100_000_000.0, &area());

        // 20 px at 10 Hz/px from the centre line widens to 400 Hz.
        assert_eq!(vfo.drag_resize(570.0, 10.0), Some(400.0));
        assert_eq!(vfo.drag_resize(570.0, 10.0), None);

        let mut upper = self::vfo(Reference::Upper);
        upper.set_offset(0.0);
        upper.update_geometry(&projector, 100_000_000.0, &area());
        assert_eq!(upper.drag_resize(520.0, 10.0), Some(300.0));
        assert_eq!(upper.upper_offset(), 0.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Offset(f64),
        Center(f64),
        Bandwidth(f64),
        Reference(u8),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-1e6f64..1e6).prop_map(Op::Offset),
            (-1e6f64..1e6).prop_map(Op::Center),
            (-10.0f64..5_000.0).prop_map(Op::Bandwidth),
            (0u8..3).prop_map(Op::Reference),
        ]
    }

    proptest! {
        #[test]
        fn edges_stay_consistent(ops in prop::collection::vec(op(), 1..40)) {
            let mut vfo = vfo(Reference::Center);
            for op in ops {
                match op {
                    Op::Offset(value) => vfo.set_offset(value),
                    Op::Center(value) => vfo.set_center_offset(value),
                    Op::Bandwidth(value) => {
                        vfo.set_bandwidth(value);
                    }
                    Op::Reference(index) => vfo.set_reference(match index {
                        0 => Reference::Lower,
                        1 => Reference::Center,
                        _ => Reference::Upper,
                    }),
                }
                assert_consistent(&vfo);
                prop_assert!(vfo.bandwidth() >= vfo.min_bandwidth());
                prop_assert!(vfo.bandwidth() <= vfo.max_bandwidth());
            }
        }
    }
}
