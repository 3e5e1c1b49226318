//! Acquisition side: sources producing spectral lines for the display.

pub mod synthetic;

pub use synthetic::{ProducerHandle, SyntheticConfig, SyntheticSource};

use crate::view::WaterfallView;

/// Consumer of spectral lines, one dB value per FFT bin, lowest frequency
/// first.
pub trait LineSink: Send + Sync {
    fn push_line(&self, line: &[f32]);
}

impl LineSink for WaterfallView {
    fn push_line(&self, line: &[f32]) {
        WaterfallView::push_line(self, line);
    }
}
