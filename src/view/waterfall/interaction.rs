//! Per-frame pointer and keyboard handling.

use super::framebuffer::Framebuffer;
use super::{Drag, ViewCore, ViewEvent};
use crate::dsp::SignalEstimate;
use crate::view::axis::format_frequency;
use crate::view::{InputState, Key, Rect};
use parking_lot::Mutex;
use tracing::debug;

/// Notches and arrow presses pan by this fraction of the view.
const PAN_FRACTION: f64 = 1.0 / 20.0;

/// Data shown while hovering a VFO. The details are filled in when ctrl is
/// held.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub name: String,
    pub details: Option<TooltipDetails>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TooltipDetails {
    /// Absolute frequency of the anchor edge.
    pub frequency: f64,
    pub bandwidth: f64,
    pub bandwidth_locked: bool,
    pub estimate: Option<SignalEstimate>,
}

impl Tooltip {
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.name.clone()];
        let Some(details) = &self.details else {
            return lines;
        };

        lines.push(format!("Frequency: {}Hz", format_frequency(details.frequency)));
        lines.push(format!("Bandwidth: {}Hz", format_frequency(details.bandwidth)));
        lines.push(format!(
            "Bandwidth Locked: {}",
            if details.bandwidth_locked { "Yes" } else { "No" }
        ));
        match details.estimate {
            Some(estimate) => {
                lines.push(format!("Strength: {:.1}dBFS", estimate.strength_db));
                lines.push(format!("SNR: {:.1}dB", estimate.snr_db));
            }
            None => {
                lines.push("Strength: ---.-dBFS".to_owned());
                lines.push("SNR: ---.-dB".to_owned());
            }
        }
        lines
    }
}

impl ViewCore {
    pub(super) fn process_input(
        &mut self,
        input: &InputState,
        fb: &Mutex<Framebuffer>,
    ) -> Option<Tooltip> {
        if !input.left_down {
            if self.drag == Drag::Splitter {
                self.fft_area_height = self.pending_fft_area_height;
                self.relayout(fb);
                self.events
                    .push(ViewEvent::FftAreaResized(self.fft_area_height));
            }
            self.drag = Drag::Idle;
            self.last_drag_x = 0.0;
        }

        let layout = self.layout?;
        let position = input.position;
        let origin = input.drag_origin();
        let moved = self.last_position != Some(position);
        self.last_position = Some(position);

        let in_freq = layout.freq_area.contains(origin);
        let in_fft = layout.fft_area.contains(origin);
        let in_waterfall = layout.waterfall.is_some_and(|area| area.contains(origin));
        let hovered = self.vfos.iter().position(|vfo| vfo.hovered(position));

        let mut target_found = false;
        if input.left_clicked && layout.waterfall.is_some() && layout.on_splitter(origin) {
            self.drag = Drag::Splitter;
            target_found = true;
        }

        let central = Rect::new(
            layout.fft_area.min,
            layout.waterfall.map_or(layout.freq_area.max, |area| area.max),
        );
        if input.left_clicked && !target_found && central.hovers(position) {
            if let Some(vfo) = self.vfos.iter().find(|vfo| vfo.grip_hit(position)) {
                self.drag = Drag::Resize(vfo.name().to_owned());
                target_found = true;
            }

            if !target_found && let Some(index) = hovered {
                let name = self.vfos[index].name().to_owned();
                self.select(Some(name));
                return None;
            }

            if !target_found && in_freq {
                self.drag = Drag::Scale;
            }
        }

        let hz_per_pixel = self.window.view_bandwidth() / layout.data_width as f64;
        match self.drag.clone() {
            Drag::Splitter => {
                self.pending_fft_area_height = layout.splitter_height(position.y);
                return None;
            }
            Drag::Resize(name) => {
                let index = self.vfo_index(&name)?;
                if let Some(bandwidth) = self.vfos[index].drag_resize(position.x, hz_per_pixel) {
                    self.events
                        .push(ViewEvent::VfoBandwidthChangedByUser { name, bandwidth });
                }
                return None;
            }
            Drag::Scale => {
                let dx = input.drag_delta.x - self.last_drag_x;
                self.last_drag_x = input.drag_delta.x;
                if dx != 0.0 {
                    self.pan(-(dx as f64) * hz_per_pixel, fb);
                }
                return None;
            }
            Drag::Idle => {}
        }

        if input.wheel != 0.0 && in_freq {
            let delta = -(input.wheel as f64) * self.window.view_bandwidth() * PAN_FRACTION;
            self.pan(delta, fb);
            return None;
        }

        let left = input.pressed(Key::Left);
        if (left || input.pressed(Key::Right)) && in_freq {
            let step = self.window.view_bandwidth() * PAN_FRACTION;
            self.pan(if left { step } else { -step }, fb);
            return None;
        }

        let trigger = if self.move_single_click {
            input.left_clicked
        } else {
            input.left_down
        };
        let mut tooltip = None;
        if trigger && (in_fft || in_waterfall) && (moved || hovered.is_none()) {
            self.move_selected_to(position.x - layout.fft_area.min.x, layout.data_width);
        } else if !input.left_down {
            tooltip = hovered.map(|index| self.tooltip(index, input.ctrl));
        }

        if input.pressed(Key::PageUp) {
            self.select_neighbour(true);
        }
        if input.pressed(Key::PageDown) {
            self.select_neighbour(false);
        }

        tooltip
    }

    /// Centres the selected VFO's anchor on plot column `x`, snapped.
    fn move_selected_to(&mut self, x: f32, data_width: usize) {
        let Some(index) = self.selected_index() else {
            return;
        };
        let column = x as i64;
        if column < 0 || column >= data_width as i64 {
            return;
        }

        let half_width = data_width as f64 / 2.0;
        let half_view = self.window.view_bandwidth() / 2.0;
        let center = self.window.center_frequency();
        let absolute =
            (column as f64 / half_width - 1.0) * half_view + self.window.view_offset() + center;

        let vfo = &mut self.vfos[index];
        let offset = vfo.snap(absolute) - center;
        vfo.set_offset(offset);
        let name = vfo.name().to_owned();
        debug!("[waterfall] moved {name} to {offset} Hz");
        self.events.push(ViewEvent::VfoMovedByUser { name, offset });
    }

    fn tooltip(&self, index: usize, detailed: bool) -> Tooltip {
        let vfo = &self.vfos[index];
        Tooltip {
            name: vfo.name().to_owned(),
            details: detailed.then(|| TooltipDetails {
                frequency: vfo.offset() + self.window.center_frequency(),
                bandwidth: vfo.bandwidth(),
                bandwidth_locked: vfo.bandwidth_locked(),
                estimate: self.estimate(index),
            }),
        }
    }

    /// Selects the nearest VFO above (or below) the selected one, wrapping
    /// to the lowest (or highest) when none is left in that direction.
    fn select_neighbour(&mut self, upward: bool) {
        let Some(current) = self.selected_index() else {
            return;
        };
        let from = self.vfos[current].offset();

        let mut nearest: Option<(usize, f64)> = None;
        let mut wrap: Option<(usize, f64)> = None;
        for (index, vfo) in self.vfos.iter().enumerate() {
            let offset = vfo.offset();
            let distance = if upward { offset - from } else { from - offset };
            if distance > 0.0 && nearest.is_none_or(|(_, best)| distance < best) {
                nearest = Some((index, distance));
            }
            let extreme = if upward { -offset } else { offset };
            if wrap.is_none_or(|(_, best)| extreme > best) {
                wrap = Some((index, extreme));
            }
        }

        if let Some((index, _)) = nearest.or(wrap) {
            let name = self.vfos[index].name().to_owned();
            self.select(Some(name));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_without_estimate() {
        let tooltip = Tooltip {
            name: "radio".into(),
            details: Some(TooltipDetails {
                frequency: 145_500_000.0,
                bandwidth: 12_500.0,
                bandwidth_locked: true,
                estimate: None,
            }),
        };
        assert_eq!(
            tooltip.lines(),
            vec![
                "radio",
                "Frequency: 145.500.000Hz",
                "Bandwidth: 12.500Hz",
                "Bandwidth Locked: Yes",
                "Strength: ---.-dBFS",
                "SNR: ---.-dB",
            ]
        );
    }

    #[test]
    fn estimate_is_formatted_to_one_decimal() {
        let tooltip = Tooltip {
            name: "radio".into(),
            details: Some(TooltipDetails {
                frequency: 0.0,
                bandwidth: 0.0,
                bandwidth_locked: false,
                estimate: Some(SignalEstimate {
                    strength_db: -42.26,
                    snr_db: 17.04,
                }),
            }),
        };
        let lines = tooltip.lines();
        assert_eq!(lines[4], "Strength: -42.3dBFS");
        assert_eq!(lines[5], "SNR: 17.0dB");
    }
}
