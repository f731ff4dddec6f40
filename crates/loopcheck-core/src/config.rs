//! Loopback analysis configuration.

use crate::{Error, Result};
use core::f64::consts::TAU;

/// Default tone frequency for loopback tests.
pub const DEFAULT_TARGET_FREQUENCY: f64 = 1000.0;

/// Default magnitude tolerance, as a fraction of the locked magnitude.
pub const DEFAULT_TOLERANCE_FRACTION: f64 = 0.10;

/// Default phase-lock tolerance: one sample of phase at 1 kHz / 48 kHz.
pub const DEFAULT_PHASE_TOLERANCE: f64 = TAU / 48.0;

/// Configuration for a loopback sine analysis run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LoopbackConfig {
    pub sample_rate: u32,
    /// Nominal tone frequency. The achievable frequency is
    /// [`adjusted_frequency()`](Self::adjusted_frequency).
    pub target_frequency: f64,
    /// Channel of the interleaved input buffer that carries the loopback signal.
    pub input_channel: usize,
    /// Channel of the interleaved output buffer that carries the tone.
    pub output_channel: usize,
    pub tolerance_fraction: f64,
    /// Maximum phase step (radians) between periods still considered locked.
    pub phase_tolerance: f64,
}

impl Default for LoopbackConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            target_frequency: DEFAULT_TARGET_FREQUENCY,
            input_channel: 0,
            output_channel: 0,
            tolerance_fraction: DEFAULT_TOLERANCE_FRACTION,
            phase_tolerance: DEFAULT_PHASE_TOLERANCE,
        }
    }
}

impl LoopbackConfig {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if !self.target_frequency.is_finite() || self.target_frequency <= 0.0 {
            return Err(Error::InvalidFrequency(self.target_frequency));
        }
        let period = self.period_samples();
        if period < 2 {
            return Err(Error::DegeneratePeriod {
                sample_rate: self.sample_rate,
                target_frequency: self.target_frequency,
                period,
            });
        }
        if !self.tolerance_fraction.is_finite() || self.tolerance_fraction <= 0.0 {
            return Err(Error::InvalidTolerance(self.tolerance_fraction));
        }
        if !self.phase_tolerance.is_finite() || self.phase_tolerance <= 0.0 {
            return Err(Error::InvalidTolerance(self.phase_tolerance));
        }
        Ok(())
    }

    /// Samples per tone cycle, truncated to an integer.
    ///
    /// Returns 0 for a configuration that cannot hold a single sample per
    /// cycle; [`validate()`](Self::validate) rejects it.
    pub fn period_samples(&self) -> usize {
        if !self.target_frequency.is_finite() || self.target_frequency <= 0.0 {
            return 0;
        }
        (self.sample_rate as f64 / self.target_frequency) as usize
    }

    /// The tone frequency whose cycle is exactly `period_samples()` long.
    pub fn adjusted_frequency(&self) -> f64 {
        match self.period_samples() {
            0 => 0.0,
            period => self.sample_rate as f64 / period as f64,
        }
    }
}
