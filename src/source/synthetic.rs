//! Synthetic IQ generator and the thread that turns it into FFT lines.
//!
//! Each frame synthesises `fft_size` complex samples (a few carriers over
//! white noise), applies a Hann window, transforms them and converts bin
//! power to dBFS with the negative frequencies first.

use super::LineSink;
use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};
use std::f64::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const PRODUCER_THREAD_NAME: &str = "specview-synthetic-source";
const LOG_FACTOR: f32 = 10.0 * core::f32::consts::LOG10_E;
const POWER_EPSILON: f32 = 1.0e-20;
/// Peak amplitude of every carrier, about -12 dBFS after windowing.
const TONE_AMPLITUDE: f32 = 0.25;
const NOISE_SEED: u64 = 0x9e37_79b9_7f4a_7c15;

pub const MIN_FFT_SIZE: usize = 64;
pub const MAX_FFT_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticConfig {
    pub center_frequency: f64,
    pub sample_rate: f64,
    pub fft_size: usize,
    /// Lines produced per second.
    pub frame_rate: f32,
    /// Per-bin noise level in dBFS.
    pub noise_floor_db: f32,
    /// Carrier offsets from the centre in Hz.
    pub tones: Vec<f64>,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            center_frequency: 100_000_000.0,
            sample_rate: 2_048_000.0,
            fft_size: 4096,
            frame_rate: 25.0,
            noise_floor_db: -90.0,
            tones: vec![-300_000.0, 125_000.0, 500_000.0],
        }
    }
}

impl SyntheticConfig {
    pub fn normalize(&mut self) {
        if !self.sample_rate.is_finite() || self.sample_rate < 1.0 {
            self.sample_rate = Self::default().sample_rate;
        }
        self.fft_size = self.fft_size.clamp(MIN_FFT_SIZE, MAX_FFT_SIZE);
        if !self.frame_rate.is_finite() {
            self.frame_rate = Self::default().frame_rate;
        }
        self.frame_rate = self.frame_rate.clamp(1.0, 1_000.0);
        let nyquist = self.sample_rate / 2.0;
        self.tones.retain(|tone| tone.is_finite() && tone.abs() < nyquist);
    }
}

fn hann(len: usize) -> Vec<f32> {
    let denom = len as f64;
    (0..len)
        .map(|i| (0.5 * (1.0 - (TAU * i as f64 / denom).cos())) as f32)
        .collect()
}

pub struct SyntheticSource {
    config: SyntheticConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Squared coherent gain of the window, used to normalise bin power.
    window_power: f32,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
    phases: Vec<f64>,
    /// Per-component Gaussian noise; `None` when the floor is not finite.
    noise: Option<Normal<f32>>,
    rng: StdRng,
}

impl std::fmt::Debug for SyntheticSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntheticSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SyntheticSource {
    pub fn new(mut config: SyntheticConfig) -> Self {
        config.normalize();
        let size = config.fft_size;
        let fft = FftPlanner::<f32>::new().plan_fft_forward(size);
        let scratch = vec![Complex32::default(); fft.get_inplace_scratch_len()];
        let window = hann(size);
        let coherent: f32 = window.iter().sum();
        let incoherent: f32 = window.iter().map(|w| w * w).sum();

        // Complex white noise of variance s^2 lands at s^2 * sum(w^2) / sum(w)^2
        // per bin, split evenly between I and Q.
        let variance = 10f32.powf(config.noise_floor_db / 10.0) * coherent * coherent / incoherent;
        let noise = Normal::new(0.0, (variance / 2.0).sqrt()).ok();
        if noise.is_none() {
            warn!(
                "[source] noise floor {} dBFS is unusable, generating carriers only",
                config.noise_floor_db
            );
        }

        Self {
            phases: vec![0.0; config.tones.len()],
            config,
            fft,
            window,
            window_power: coherent * coherent,
            buffer: vec![Complex32::default(); size],
            scratch,
            noise,
            rng: StdRng::seed_from_u64(NOISE_SEED),
        }
    }

    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// Synthesises one frame and writes its spectrum in dBFS to `out`.
    pub fn fill_line(&mut self, out: &mut Vec<f32>) {
        let size = self.config.fft_size;
        let rate = self.config.sample_rate;
        let Self {
            config,
            fft,
            window,
            window_power,
            buffer,
            scratch,
            phases,
            noise,
            rng,
        } = self;

        for (i, (sample, &weight)) in buffer.iter_mut().zip(window.iter()).enumerate() {
            let mut value = match noise {
                Some(noise) => Complex32::new(noise.sample(&mut *rng), noise.sample(&mut *rng)),
                None => Complex32::default(),
            };
            for (&tone, &phase) in config.tones.iter().zip(phases.iter()) {
                let angle = phase + TAU * tone * i as f64 / rate;
                value += Complex32::from_polar(TONE_AMPLITUDE, angle as f32);
            }
            *sample = value * weight;
        }
        for (phase, &tone) in phases.iter_mut().zip(&config.tones) {
            *phase = (*phase + TAU * tone * size as f64 / rate) % TAU;
        }

        fft.process_with_scratch(buffer, scratch);

        let norm = 1.0 / *window_power;
        let half = size / 2;
        out.clear();
        out.extend((0..size).map(|k| {
            let power = buffer[(k + half) % size].norm_sqr() * norm;
            LOG_FACTOR * power.max(POWER_EPSILON).ln()
        }));
    }

    /// Runs the source on a named thread, pushing lines into `sink` at the
    /// configured frame rate until the handle is stopped or dropped.
    pub fn spawn(self, sink: Arc<dyn LineSink>) -> Result<ProducerHandle> {
        let stop = Arc::new(AtomicBool::new(false));
        let frames = Arc::new(AtomicU64::new(0));
        let thread = thread::Builder::new()
            .name(PRODUCER_THREAD_NAME.into())
            .spawn({
                let stop = Arc::clone(&stop);
                let frames = Arc::clone(&frames);
                move || self.run(sink.as_ref(), &stop, &frames)
            })
            .context("failed to spawn synthetic source thread")?;

        Ok(ProducerHandle {
            stop,
            frames,
            thread: Some(thread),
        })
    }

    fn run(mut self, sink: &dyn LineSink, stop: &AtomicBool, frames: &AtomicU64) {
        let period = Duration::from_secs_f32(1.0 / self.config.frame_rate);
        info!(
            "[source] producing {} bins at {} Hz every {period:?}",
            self.config.fft_size, self.config.sample_rate
        );

        let mut line = Vec::with_capacity(self.config.fft_size);
        let mut deadline = Instant::now();
        while !stop.load(Ordering::Acquire) {
            self.fill_line(&mut line);
            sink.push_line(&line);
            frames.fetch_add(1, Ordering::Relaxed);

            deadline += period;
            let now = Instant::now();
            if deadline > now {
                thread::sleep(deadline - now);
            } else {
                debug!("[source] frame overran by {:?}", now - deadline);
                deadline = now;
            }
        }

        info!(
            "[source] stopped after {} frames",
            frames.load(Ordering::Relaxed)
        );
    }
}

/// Owns the producer thread. Dropping the handle stops and joins it.
#[derive(Debug)]
pub struct ProducerHandle {
    stop: Arc<AtomicBool>,
    frames: Arc<AtomicU64>,
    thread: Option<JoinHandle<()>>,
}

impl ProducerHandle {
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Stops the thread and returns the number of lines produced.
    pub fn stop(mut self) -> u64 {
        self.shutdown();
        self.frames()
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            warn!("[source] producer thread panicked");
        }
    }
}

impl Drop for ProducerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
