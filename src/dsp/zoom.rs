//! Reduction of a raw spectral line to display resolution.
//!
//! Each output pixel covers a fixed range of raw bins; the bin range per
//! pixel is precomputed whenever the geometry changes so the per-line work is
//! a single pass over the taps.

use super::DB_FLOOR;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tap {
    /// Zoomed out: peak of the inclusive bin range.
    Max { first: usize, last: usize },
    /// Zoomed in: linear blend between two neighbouring bins.
    Lerp { lower: usize, upper: usize, frac: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Geometry {
    raw_width: usize,
    whole_bandwidth: f64,
    view_offset: f64,
    view_bandwidth: f64,
    out_width: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Decimator {
    geometry: Option<Geometry>,
    taps: Vec<Tap>,
}

impl Decimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn out_width(&self) -> usize {
        self.taps.len()
    }

    /// Rebuilds the tap table if the geometry changed. Returns `true` on rebuild.
    ///
    /// The view window `[view_offset - view_bandwidth / 2, view_offset +
    /// view_bandwidth / 2]` is expressed relative to the centre of a raw line
    /// that spans `whole_bandwidth`.
    pub fn configure(
        &mut self,
        raw_width: usize,
        whole_bandwidth: f64,
        view_offset: f64,
        view_bandwidth: f64,
        out_width: usize,
    ) -> bool {
        let geometry = Geometry {
            raw_width,
            whole_bandwidth,
            view_offset,
            view_bandwidth,
            out_width,
        };
        if self.geometry == Some(geometry) {
            return false;
        }

        self.geometry = Some(geometry);
        self.taps = build_taps(&geometry);
        true
    }

    /// Fills `out` from `raw`. Pixels past the tap table are set to the floor.
    pub fn decimate(&self, raw: &[f32], out: &mut [f32]) {
        if raw.is_empty() {
            out.fill(DB_FLOOR);
            return;
        }

        let last_bin = raw.len() - 1;
        for (value, tap) in out.iter_mut().zip(&self.taps) {
            *value = match *tap {
                Tap::Max { first, last } => raw[first.min(last_bin)..=last.min(last_bin)]
                    .iter()
                    .copied()
                    .fold(f32::NEG_INFINITY, f32::max),
                Tap::Lerp { lower, upper, frac } => {
                    let a = raw[lower.min(last_bin)];
                    let b = raw[upper.min(last_bin)];
                    a + (b - a) * frac
                }
            };
        }

        if out.len() > self.taps.len() {
            out[self.taps.len()..].fill(DB_FLOOR);
        }
    }
}

fn build_taps(geometry: &Geometry) -> Vec<Tap> {
    let Geometry {
        raw_width,
        whole_bandwidth,
        view_offset,
        view_bandwidth,
        out_width,
    } = *geometry;

    if raw_width == 0 || out_width == 0 || whole_bandwidth <= 0.0 || view_bandwidth <= 0.0 {
        return Vec::new();
    }

    let bins_per_hz = raw_width as f64 / whole_bandwidth;
    let first_bin_pos = (view_offset - view_bandwidth / 2.0 + whole_bandwidth / 2.0) * bins_per_hz;
    let bins_per_pixel = view_bandwidth * bins_per_hz / out_width as f64;
    let last_bin = raw_width - 1;
    let clamp_bin = |pos: f64| (pos.max(0.0) as usize).min(last_bin);

    (0..out_width)
        .map(|x| {
            let start = first_bin_pos + x as f64 * bins_per_pixel;
            let end = start + bins_per_pixel;
            if bins_per_pixel >= 1.0 {
                let first = clamp_bin(start.floor());
                let last = clamp_bin((end.ceil() - 1.0).max(start.floor()));
                Tap::Max { first, last }
            } else {
                let centre = (start + end) / 2.0 - 0.5;
                let base = centre.floor();
                Tap::Lerp {
                    lower: clamp_bin(base),
                    upper: clamp_bin(base + 1.0),
                    frac: (centre - base).clamp(0.0, 1.0) as f32,
                }
            }
        })
        .collect()
}
