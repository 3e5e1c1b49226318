//! Display core of a radio spectrum analyser: spectral history, FFT and
//! waterfall rendering, VFO overlays, band plan rows and signal estimates.

pub mod bandplan;
pub mod dsp;
pub mod settings;
pub mod source;
pub mod util;
pub mod view;
