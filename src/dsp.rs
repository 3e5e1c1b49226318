//! Spectral line storage and the per-frame reductions performed on it.
//!
//! Lines are magnitude spectra in dB, one value per FFT bin, ordered from the
//! lowest to the highest frequency of the acquired band.

pub mod estimate;
pub mod history;
pub mod trace;
pub mod zoom;

pub use estimate::{SignalEstimate, estimate_signal};
pub use history::SpectralRingBuffer;
pub use zoom::Decimator;

/// Floor used when a power value is zero or negative.
pub const DB_FLOOR: f32 = -200.0;

const POWER_EPSILON: f64 = 1.0e-20;

#[inline]
pub fn db_to_power(db: f32) -> f64 {
    10f64.powf(db as f64 / 10.0)
}

#[inline]
pub fn power_to_db(power: f64) -> f32 {
    if power <= 0.0 {
        return DB_FLOOR;
    }
    ((10.0 * power.max(POWER_EPSILON).log10()) as f32).max(DB_FLOOR)
}
