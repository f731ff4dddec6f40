//! Output-side test tone.

use core::f64::consts::TAU;
use loopcheck_core::wrap_phase;

/// Sine generator for the speaker side of a loopback run.
///
/// Play it at the analyzer's adjusted frequency so each tone cycle spans an
/// integer number of samples.
#[derive(Debug, Clone)]
pub struct SineTone {
    sample_rate: u32,
    frequency: f64,
    amplitude: f32,
    phase: f64,
    phase_increment: f64,
}

impl SineTone {
    pub fn new(sample_rate: u32, frequency: f64) -> Self {
        let mut tone = Self {
            sample_rate: sample_rate.max(1),
            frequency: 0.0,
            amplitude: 0.5,
            phase: 0.0,
            phase_increment: 0.0,
        };
        tone.set_frequency(frequency);
        tone
    }

    pub fn set_frequency(&mut self, frequency: f64) {
        self.frequency = frequency;
        self.phase_increment = TAU * frequency / self.sample_rate as f64;
    }

    /// Peak amplitude, clamped to [0, 1].
    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = amplitude.clamp(0.0, 1.0);
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let sample = self.amplitude * self.phase.sin() as f32;
        self.phase = wrap_phase(self.phase + self.phase_increment);
        sample
    }

    /// Write the tone to `channel` of an interleaved buffer; other channels
    /// are silenced. Returns the number of frames written.
    pub fn fill_interleaved(&mut self, out: &mut [f32], num_channels: usize, channel: usize) -> usize {
        if num_channels == 0 {
            return 0;
        }
        let mut frames = 0;
        for frame in out.chunks_exact_mut(num_channels) {
            frame.fill(0.0);
            if channel < num_channels {
                frame[channel] = self.next_sample();
            }
            frames += 1;
        }
        frames
    }
}
