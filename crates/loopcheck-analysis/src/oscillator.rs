//! Reference phase for synchronous detection.

use core::f64::consts::{PI, TAU};
use loopcheck_core::{Error, LoopbackConfig, Result};

/// Phase accumulator stepping one integer-length tone cycle per
/// `period_samples` samples.
///
/// The phase stays in (-π, π]: it is pulled back by 2π whenever a step
/// takes it past π.
#[derive(Debug, Clone)]
pub struct ReferenceOscillator {
    sample_rate: u32,
    period_samples: usize,
    phase: f64,
    phase_increment: f64,
}

impl ReferenceOscillator {
    pub fn new(sample_rate: u32, target_frequency: f64) -> Result<Self> {
        let config = LoopbackConfig {
            sample_rate,
            target_frequency,
            ..LoopbackConfig::default()
        };
        Self::from_config(&config)
    }

    pub fn from_config(config: &LoopbackConfig) -> Result<Self> {
        let mut oscillator = Self {
            sample_rate: config.sample_rate,
            period_samples: 0,
            phase: 0.0,
            phase_increment: 0.0,
        };
        oscillator.retune(config)?;
        Ok(oscillator)
    }

    /// Recompute period and increment. The current phase is kept.
    pub fn retune(&mut self, config: &LoopbackConfig) -> Result<()> {
        if config.sample_rate == 0 {
            return Err(Error::InvalidSampleRate(config.sample_rate));
        }
        let period = config.period_samples();
        if period < 2 {
            return Err(Error::DegeneratePeriod {
                sample_rate: config.sample_rate,
                target_frequency: config.target_frequency,
                period,
            });
        }
        self.sample_rate = config.sample_rate;
        self.period_samples = period;
        self.phase_increment = TAU / period as f64;
        Ok(())
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Step one sample forward.
    #[inline]
    pub fn advance(&mut self) {
        self.phase += self.phase_increment;
        if self.phase > PI {
            self.phase -= TAU;
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn period_samples(&self) -> usize {
        self.period_samples
    }

    pub fn phase_increment(&self) -> f64 {
        self.phase_increment
    }

    /// `sample_rate / period_samples`: the tone frequency the output side
    /// must play for the cycle to fit the period exactly.
    pub fn adjusted_frequency(&self) -> f64 {
        self.sample_rate as f64 / self.period_samples as f64
    }
}

impl Default for ReferenceOscillator {
    /// 1 kHz at 48 kHz: 48 samples per cycle.
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            period_samples: 48,
            phase: 0.0,
            phase_increment: TAU / 48.0,
        }
    }
}
