//! Builder for configuring and constructing a `LoopbackSession`.

use crate::analysis::{
    AtomicLoopbackTelemetry, LoopbackSineAnalyzer, PeakAnalyzer, SineTone,
};
use crate::core::{Arc, CircularSampleBuffer, LoopbackConfig, DEFAULT_RECORDER_CAPACITY};
use crate::verdict::{AnalysisType, PassCriteria};
use crate::{LoopbackSession, Result};

/// Defaults match a 1 kHz tone at 48 kHz, looped from output channel 0
/// back to input channel 0, judged for signal presence.
///
/// # Example
///
/// ```rust
/// use loopcheck::prelude::*;
///
/// let session = LoopbackSession::builder()
///     .sample_rate(44100)
///     .input_channel(1)
///     .build()
///     .unwrap();
///
/// assert_eq!(session.analyzer().period_samples(), 44);
/// ```
pub struct LoopbackSessionBuilder {
    config: LoopbackConfig,
    recorder_capacity: usize,
    criteria: PassCriteria,
    tone_amplitude: f32,
}

impl Default for LoopbackSessionBuilder {
    fn default() -> Self {
        Self {
            config: LoopbackConfig::default(),
            recorder_capacity: DEFAULT_RECORDER_CAPACITY,
            criteria: PassCriteria::default(),
            tone_amplitude: 0.5,
        }
    }
}

impl LoopbackSessionBuilder {
    /// Default: 48000
    pub fn sample_rate(mut self, sample_rate: u32) -> Self {
        self.config.sample_rate = sample_rate;
        self
    }

    /// Default: 1000 Hz. Truncated to a whole number of samples per period.
    pub fn target_frequency(mut self, frequency: f64) -> Self {
        self.config.target_frequency = frequency;
        self
    }

    /// Default: 0
    pub fn input_channel(mut self, channel: usize) -> Self {
        self.config.input_channel = channel;
        self
    }

    /// Default: 0
    pub fn output_channel(mut self, channel: usize) -> Self {
        self.config.output_channel = channel;
        self
    }

    pub fn tolerance_fraction(mut self, fraction: f64) -> Self {
        self.config.tolerance_fraction = fraction;
        self
    }

    /// Maximum phase change between periods that still counts as locked.
    pub fn phase_tolerance(mut self, radians: f64) -> Self {
        self.config.phase_tolerance = radians;
        self
    }

    pub fn config(mut self, config: LoopbackConfig) -> Self {
        self.config = config;
        self
    }

    /// Default: 65536 samples
    pub fn recorder_capacity(mut self, samples: usize) -> Self {
        self.recorder_capacity = samples;
        self
    }

    pub fn criteria(mut self, criteria: PassCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn analysis_type(mut self, analysis_type: AnalysisType) -> Self {
        self.criteria.analysis_type = analysis_type;
        self
    }

    /// Default: 0.5
    pub fn tone_amplitude(mut self, amplitude: f32) -> Self {
        self.tone_amplitude = amplitude;
        self
    }

    pub fn build(self) -> Result<LoopbackSession> {
        let recorder = Arc::new(CircularSampleBuffer::new(self.recorder_capacity));
        let mut analyzer = LoopbackSineAnalyzer::with_recorder(self.config.clone(), recorder)?;

        let telemetry = Arc::new(AtomicLoopbackTelemetry::new());
        analyzer.attach_telemetry(Arc::clone(&telemetry));

        let peak = PeakAnalyzer::new(self.config.input_channel);

        let mut tone = SineTone::new(self.config.sample_rate, analyzer.adjusted_frequency());
        tone.set_amplitude(self.tone_amplitude);

        tracing::debug!(
            sample_rate = self.config.sample_rate,
            frequency = analyzer.adjusted_frequency(),
            period = analyzer.period_samples(),
            recorder_capacity = self.recorder_capacity,
            "loopback session built"
        );

        Ok(LoopbackSession::from_parts(
            analyzer,
            peak,
            tone,
            telemetry,
            self.criteria,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build() {
        let session = LoopbackSessionBuilder::default().build().unwrap();
        assert_eq!(session.analyzer().period_samples(), 48);
        assert_eq!(session.analyzer().adjusted_frequency(), 1000.0);
        assert_eq!(session.recorder().capacity(), DEFAULT_RECORDER_CAPACITY);
        assert_eq!(session.criteria(), &PassCriteria::default());
    }

    #[test]
    fn test_builder_options() {
        let session = LoopbackSessionBuilder::default()
            .sample_rate(44100)
            .target_frequency(1000.0)
            .input_channel(1)
            .output_channel(1)
            .recorder_capacity(1024)
            .analysis_type(AnalysisType::SignalAbsence)
            .build()
            .unwrap();

        assert_eq!(session.analyzer().config().input_channel, 1);
        assert_eq!(session.analyzer().period_samples(), 44);
        assert_eq!(session.recorder().capacity(), 1024);
        assert_eq!(
            session.criteria().analysis_type,
            AnalysisType::SignalAbsence
        );
    }

    /// The analyzer gets its own copy of the config; the tone still follows it.
    #[test]
    fn test_tone_follows_built_config() {
        let session = LoopbackSessionBuilder::default()
            .sample_rate(96000)
            .target_frequency(997.0)
            .build()
            .unwrap();

        assert_eq!(session.analyzer().config().sample_rate, 96000);
        assert_eq!(session.tone().sample_rate(), 96000);
        assert_eq!(session.tone().frequency(), session.analyzer().adjusted_frequency());
        assert_eq!(session.analyzer().period_samples(), 96);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(LoopbackSessionBuilder::default().sample_rate(0).build().is_err());
        assert!(LoopbackSessionBuilder::default()
            .target_frequency(30000.0)
            .build()
            .is_err());
    }
}
