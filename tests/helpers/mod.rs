//! Test helpers and fixtures for loopcheck integration tests
//!
//! Signals are generated deterministically so every run analyzes exactly
//! the same samples.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `FLOAT_EPSILON` (1e-6): Exact operations (recording, passthrough)
//! - `CONVERGED_JITTER` (0.01 rad): Jitter of a clean, settled loop
//! - `MAGNITUDE_FRACTION` (0.05): Relative magnitude error of a settled loop

#![allow(dead_code)]

pub mod tolerances;

use loopcheck::prelude::*;
use std::f64::consts::TAU;

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: u32 = 48000;

/// Standard callback size for deterministic testing
pub const TEST_BUFFER_SIZE: usize = 256;

/// Create a test session with default configuration.
pub fn test_session() -> LoopbackSession {
    LoopbackSession::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .build()
        .expect("Failed to create test session")
}

/// Create a reset analyzer for `sample_rate` with a 1 kHz target.
pub fn test_analyzer(sample_rate: u32) -> LoopbackSineAnalyzer {
    let mut analyzer = LoopbackSineAnalyzer::with_config(LoopbackConfig::new(sample_rate))
        .expect("Failed to create test analyzer");
    analyzer.reset();
    analyzer
}

/// Sine at `frequency` with peak `amplitude` and starting `phase` (radians).
pub fn generate_sine(
    frequency: f64,
    sample_rate: u32,
    amplitude: f64,
    phase: f64,
    num_samples: usize,
) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            (amplitude * (TAU * frequency * t + phase).sin()) as f32
        })
        .collect()
}

/// Generate silence (zero samples).
pub fn generate_silence(num_samples: usize) -> Vec<f32> {
    vec![0.0; num_samples]
}

/// Generate white noise in -amplitude..amplitude.
pub fn generate_noise(num_samples: usize, amplitude: f32, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" noise
    let mut rng = seed;
    (0..num_samples)
        .map(|_| {
            rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1);
            (((rng >> 33) as f32 / (u32::MAX >> 1) as f32) * 2.0 - 1.0) * amplitude
        })
        .collect()
}

/// Generate an integer staircase signal [0, 1, 2, ..., n-1] as f32.
///
/// Each sample equals its logical index, so recorder reads can be checked
/// position by position.
pub fn generate_integer_staircase(num_samples: usize) -> Vec<f32> {
    (0..num_samples).map(|i| i as f32).collect()
}

/// Interleave equal-length mono channels into one buffer.
pub fn interleave(channels: &[&[f32]]) -> Vec<f32> {
    let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
    let mut out = Vec::with_capacity(frames * channels.len());
    for frame in 0..frames {
        for channel in channels {
            out.push(channel[frame]);
        }
    }
    out
}

/// Feed `samples` to `analyzer` in callback-sized blocks.
pub fn feed_in_blocks<A: SignalAnalyzer + ?Sized>(
    analyzer: &mut A,
    samples: &[f32],
    num_channels: usize,
    block_frames: usize,
) {
    for block in samples.chunks(block_frames * num_channels) {
        analyzer.analyze_buffer(block, num_channels, block.len() / num_channels);
    }
}

/// Run `session` with its output looped back through `path` for `buffers`
/// callbacks of `TEST_BUFFER_SIZE` frames.
pub fn run_loopback<F>(session: &mut LoopbackSession, num_channels: usize, buffers: usize, mut path: F)
where
    F: FnMut(&mut [f32]),
{
    let mut buffer = vec![0.0f32; TEST_BUFFER_SIZE * num_channels];
    for _ in 0..buffers {
        session.render_output(&mut buffer, num_channels);
        path(&mut buffer);
        session.process_input(&buffer, num_channels, TEST_BUFFER_SIZE);
    }
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}
