//! Single-bin synchronous sine detection.
//!
//! Correlates the input against sin/cos of a reference phase over exactly one
//! tone cycle, then reports amplitude and phase of the tone relative to the
//! reference. This is a one-bin DFT evaluated once per period, so the result
//! does not depend on where in its cycle the incoming tone started.

use loopcheck_core::{Error, Result};

/// Amplitude and phase of the tone over one completed period.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct DetectionResult {
    /// Peak amplitude of the tone (>= 0).
    pub magnitude: f64,
    /// Phase of the tone relative to the reference, in (-π, π].
    pub phase: f64,
}

/// Running sin/cos correlation over one period.
#[derive(Debug, Clone)]
pub struct SineCorrelationDetector {
    period_samples: usize,
    sin_sum: f64,
    cos_sum: f64,
    count: usize,
}

impl SineCorrelationDetector {
    pub fn new(period_samples: usize) -> Result<Self> {
        if period_samples == 0 {
            return Err(Error::InvalidConfig(
                "detector period must be at least one sample".into(),
            ));
        }
        Ok(Self::with_period(period_samples))
    }

    /// Construct for a period already validated by the oscillator.
    pub(crate) fn with_period(period_samples: usize) -> Self {
        Self {
            period_samples: period_samples.max(1),
            sin_sum: 0.0,
            cos_sum: 0.0,
            count: 0,
        }
    }

    /// Change the period. Any partially accumulated cycle is discarded.
    pub fn set_period(&mut self, period_samples: usize) -> Result<()> {
        if period_samples == 0 {
            return Err(Error::InvalidConfig(
                "detector period must be at least one sample".into(),
            ));
        }
        self.period_samples = period_samples;
        self.reset();
        Ok(())
    }

    pub fn period_samples(&self) -> usize {
        self.period_samples
    }

    /// Samples accumulated in the current, incomplete period.
    pub fn pending(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        self.sin_sum = 0.0;
        self.cos_sum = 0.0;
        self.count = 0;
    }

    /// Accumulate one sample against `reference_phase`.
    ///
    /// Returns a result when this sample completes a period.
    #[inline]
    pub fn consume(&mut self, sample: f32, reference_phase: f64) -> Option<DetectionResult> {
        let sample = sample as f64;
        let (sin, cos) = reference_phase.sin_cos();
        self.sin_sum += sample * sin;
        self.cos_sum += sample * cos;
        self.count += 1;

        if self.count < self.period_samples {
            return None;
        }

        let n = self.count as f64;
        let sin_mean = self.sin_sum / n;
        let cos_mean = self.cos_sum / n;
        self.reset();

        Some(DetectionResult {
            magnitude: 2.0 * (sin_mean * sin_mean + cos_mean * cos_mean).sqrt(),
            phase: cos_mean.atan2(sin_mean),
        })
    }
}
