//! In-band signal strength and signal-to-noise estimation for one channel.

use super::{db_to_power, power_to_db};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalEstimate {
    pub strength_db: f32,
    pub snr_db: f32,
}

/// Maps a frequency relative to the band centre onto a raw bin index.
fn bin_index(offset: f64, whole_bandwidth: f64, bins: usize) -> usize {
    let half = bins as f64 / 2.0;
    let position = (offset / (whole_bandwidth / 2.0)) * half + half;
    (position.max(0.0) as usize).min(bins - 1)
}

fn mean_power(bins: &[f32]) -> Option<f64> {
    if bins.is_empty() {
        return None;
    }
    let sum: f64 = bins.iter().map(|&db| db_to_power(db)).sum();
    Some(sum / bins.len() as f64)
}

/// Estimates the channel centred at `center_offset` Hz from the band centre.
///
/// Signal bins cover `[center - bw/2, center + bw/2]`; noise bins cover one
/// extra bandwidth on each side, `[center - bw, center - bw/2)` and
/// `(center + bw/2, center + bw]`. Averaging happens in the power domain.
/// Returns `None` for an empty line, a degenerate bandwidth, or a channel
/// that lies entirely outside the acquired band. When no noise bins remain
/// the SNR is reported as zero.
pub fn estimate_signal(
    line: &[f32],
    whole_bandwidth: f64,
    center_offset: f64,
    bandwidth: f64,
) -> Option<SignalEstimate> {
    if line.is_empty() || !(whole_bandwidth > 0.0) || !(bandwidth > 0.0) {
        return None;
    }

    let half_band = whole_bandwidth / 2.0;
    let lower = center_offset - bandwidth / 2.0;
    let upper = center_offset + bandwidth / 2.0;
    if upper < -half_band || lower > half_band {
        return None;
    }

    let bins = line.len();
    let min_side = bin_index(center_offset - bandwidth, whole_bandwidth, bins);
    let min = bin_index(lower, whole_bandwidth, bins);
    let max = bin_index(upper, whole_bandwidth, bins);
    let max_side = bin_index(center_offset + bandwidth, whole_bandwidth, bins);

    let signal = mean_power(&line[min..=max])?;

    let noise_count = (min - min_side) + (max_side - max);
    let snr_db = if noise_count == 0 {
        0.0
    } else {
        let noise_sum: f64 = line[min_side..min]
            .iter()
            .chain(&line[max + 1..=max_side])
            .map(|&db| db_to_power(db))
            .sum();
        let noise = noise_sum / noise_count as f64;
        power_to_db(signal / noise)
    };

    Some(SignalEstimate {
        strength_db: power_to_db(signal),
        snr_db,
    })
}
