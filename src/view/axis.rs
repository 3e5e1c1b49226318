//! Frequency and level axis helpers: tick spacing, tick placement and labels.

use super::projector::FrequencyProjector;

/// Largest "nice" step (1, 2, 5 times a power of ten) that divides
/// `bandwidth` into at most `max_steps` intervals.
pub fn find_best_range(bandwidth: f64, max_steps: usize) -> f64 {
    let max_steps = max_steps.max(1) as f64;
    if !(bandwidth > 0.0) {
        return 1.0;
    }

    let mut step = 10f64.powi((bandwidth / max_steps).log10().floor() as i32);
    for i in 0..3 {
        if bandwidth / step <= max_steps {
            break;
        }
        step *= if i & 1 == 1 { 2.5 } else { 2.0 };
    }
    step
}

/// Whole Hz with dot-separated thousands groups, e.g. `100.250.000`.
pub fn format_frequency(freq: f64) -> String {
    let hz = freq.abs() as u64;
    if hz < 1_000 {
        return hz.to_string();
    }

    let mut groups = Vec::with_capacity(4);
    let mut rest = hz;
    while rest >= 1_000 {
        groups.push(format!("{:03}", rest % 1_000));
        rest /= 1_000;
    }
    groups.push(rest.to_string());
    groups.reverse();
    groups.join(".")
}

/// Bandwidth with a `k`, `M` or `G` suffix and no trailing zeros.
pub fn format_bandwidth(bandwidth: f64) -> String {
    let bandwidth = bandwidth.floor();
    let (value, suffix) = if bandwidth < 1e3 {
        (bandwidth, "")
    } else if bandwidth < 1e6 {
        (bandwidth / 1e3, "k")
    } else if bandwidth < 1e9 {
        (bandwidth / 1e6, "M")
    } else {
        (bandwidth / 1e9, "G")
    };
    format!("{}{suffix}", format_general(value))
}

/// Six significant digits, trailing zeros removed.
fn format_general(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (5 - magnitude).max(0) as usize;
    let text = format!("{value:.decimals$}");
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickKind {
    /// Labelled multiple of the tick range.
    Major,
    /// Half-way between majors.
    Medium,
    Minor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyTick {
    pub freq: f64,
    pub x: f64,
    pub kind: TickKind,
}

/// Tick marks across the projector's span: a major tick at every multiple of
/// `range` and nine subdivisions in between.
pub fn frequency_ticks(projector: &FrequencyProjector, range: f64) -> Vec<FrequencyTick> {
    let mut ticks = Vec::new();
    if !(range > 0.0) || !(projector.bandwidth() > 0.0) {
        return ticks;
    }

    let (lower, upper) = (projector.lower(), projector.upper());
    let mut index = (lower / range).floor();
    loop {
        let freq = index * range;
        if freq >= upper {
            break;
        }
        index += 1.0;

        if freq >= lower {
            ticks.push(FrequencyTick {
                freq,
                x: projector.to_pixel(freq),
                kind: TickKind::Major,
            });
        }

        for sub in 1..10 {
            let sub_freq = freq + sub as f64 * range / 10.0;
            if sub_freq < lower {
                continue;
            }
            if sub_freq > upper {
                break;
            }
            ticks.push(FrequencyTick {
                freq: sub_freq,
                x: projector.to_pixel(sub_freq),
                kind: if sub == 5 {
                    TickKind::Medium
                } else {
                    TickKind::Minor
                },
            });
        }
    }
    ticks
}

/// Horizontal grid levels from the top of `[min, max]` downward.
pub fn level_grid(min: f32, max: f32, step: f32) -> Vec<f32> {
    if !(step > 0.0) || !(max > min) {
        return Vec::new();
    }
    let mut levels = Vec::new();
    let mut level = (max / step).floor() * step;
    while level > min {
        levels.push(level);
        level -= step;
    }
    levels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_range_picks_nice_steps() {
        assert_eq!(find_best_range(1000.0, 10), 100.0);
        assert_eq!(find_best_range(2_000_000.0, 10), 200_000.0);
        assert_eq!(find_best_range(4_000_000.0, 10), 500_000.0);
        assert_eq!(find_best_range(9_000.0, 10), 1_000.0);
        assert_eq!(find_best_range(70.0, 8), 10.0);
    }

    #[test]
    fn formats_frequency_groups() {
        assert_eq!(format_frequency(999.0), "999");
        assert_eq!(format_frequency(1_000.0), "1.000");
        assert_eq!(format_frequency(100_250_000.0), "100.250.000");
        assert_eq!(format_frequency(-7_050_000.0), "7.050.000");
        assert_eq!(format_frequency(2_400_000_001.0), "2.400.000.001");
    }

    #[test]
    fn formats_bandwidth_suffix() {
        assert_eq!(format_bandwidth(500.0), "500");
        assert_eq!(format_bandwidth(12_500.0), "12.5k");
        assert_eq!(format_bandwidth(200_000.9), "200k");
        assert_eq!(format_bandwidth(2_048_000.0), "2.048M");
        assert_eq!(format_bandwidth(1.5e9), "1.5G");
    }

    #[test]
    fn ticks_cover_span_with_subdivisions() {
        let projector = FrequencyProjector::new(0.0, 1000.0, 95.0, 205.0);
        let ticks = frequency_ticks(&projector, 100.0);
        let majors: Vec<f64> = ticks
            .iter()
            .filter(|t| t.kind == TickKind::Major)
            .map(|t| t.freq)
            .collect();
        assert_eq!(majors, vec![100.0, 200.0]);
        assert!(ticks.iter().all(|t| t.freq >= 95.0 && t.freq <= 205.0));
        assert!(
            ticks
                .iter()
                .any(|t| t.kind == TickKind::Medium && (t.freq - 150.0).abs() < 1e-9)
        );
    }

    #[test]
    fn level_grid_descends_from_top() {
        assert_eq!(level_grid(-70.0, 0.0, 20.0), vec![0.0, -20.0, -40.0, -60.0]);
        assert!(level_grid(0.0, 0.0, 10.0).is_empty());
    }
}
