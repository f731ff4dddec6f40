//! `LoopbackSession` that ties the analyzers, test tone and verdict together

use crate::analysis::{
    AtomicLoopbackTelemetry, LoopbackSineAnalyzer, LoopbackSnapshot, PeakAnalyzer,
    SignalAnalyzer, SineTone,
};
use crate::core::{Arc, CircularSampleBuffer, LoopbackConfig};
use crate::verdict::{PassCriteria, TestResults, Verdict};
use crate::{LoopbackSessionBuilder, Result};

/// One loopback test run.
///
/// The audio callback calls [`render_output`](Self::render_output) to play
/// the tone and [`process_input`](Self::process_input) with the captured
/// input. Once the run is over, [`results`](Self::results) and
/// [`verdict`](Self::verdict) summarize it.
///
/// # Example
///
/// ```rust
/// use loopcheck::prelude::*;
///
/// let mut session = LoopbackSession::builder().build().unwrap();
///
/// // Wire the output straight back into the input
/// let mut buffer = vec![0.0f32; 480];
/// for _ in 0..50 {
///     session.render_output(&mut buffer, 1);
///     session.process_input(&buffer, 1, buffer.len());
/// }
///
/// assert_eq!(session.verdict(0), Verdict::Pass);
/// ```
pub struct LoopbackSession {
    analyzer: LoopbackSineAnalyzer,
    peak: PeakAnalyzer,
    tone: SineTone,
    telemetry: Arc<AtomicLoopbackTelemetry>,
    criteria: PassCriteria,
}

impl LoopbackSession {
    pub fn builder() -> LoopbackSessionBuilder {
        LoopbackSessionBuilder::default()
    }

    pub(crate) fn from_parts(
        analyzer: LoopbackSineAnalyzer,
        peak: PeakAnalyzer,
        tone: SineTone,
        telemetry: Arc<AtomicLoopbackTelemetry>,
        criteria: PassCriteria,
    ) -> Self {
        Self {
            analyzer,
            peak,
            tone,
            telemetry,
            criteria,
        }
    }

    /// Feed one interleaved input buffer to every analyzer.
    pub fn process_input(&mut self, samples: &[f32], num_channels: usize, num_frames: usize) {
        let analyzers: [&mut dyn SignalAnalyzer; 2] = [&mut self.analyzer, &mut self.peak];
        for analyzer in analyzers {
            analyzer.analyze_buffer(samples, num_channels, num_frames);
        }
    }

    /// Fill an interleaved output buffer with the test tone on the
    /// configured output channel. Returns the number of frames written.
    pub fn render_output(&mut self, out: &mut [f32], num_channels: usize) -> usize {
        let channel = self.analyzer.config().output_channel;
        self.tone.fill_interleaved(out, num_channels, channel)
    }

    /// Start a new run: analyzers and tone go back to their initial state.
    /// Recorded history is kept.
    pub fn reset(&mut self) {
        let analyzers: [&mut dyn SignalAnalyzer; 2] = [&mut self.analyzer, &mut self.peak];
        for analyzer in analyzers {
            analyzer.reset();
        }
        self.tone.reset();
    }

    /// Reconfigure the analyzer and retune the tone to match.
    pub fn configure(&mut self, config: &LoopbackConfig) -> Result<()> {
        self.analyzer.configure(config)?;
        self.peak.set_input_channel(config.input_channel);
        if config.sample_rate != self.tone.sample_rate() {
            let amplitude = self.tone.amplitude();
            self.tone = SineTone::new(config.sample_rate, self.analyzer.adjusted_frequency());
            self.tone.set_amplitude(amplitude);
        } else {
            self.tone.set_frequency(self.analyzer.adjusted_frequency());
        }
        Ok(())
    }

    pub fn analyzer(&self) -> &LoopbackSineAnalyzer {
        &self.analyzer
    }

    pub fn tone(&self) -> &SineTone {
        &self.tone
    }

    /// Shared telemetry, updated after every input buffer.
    pub fn telemetry(&self) -> Arc<AtomicLoopbackTelemetry> {
        Arc::clone(&self.telemetry)
    }

    pub fn snapshot(&self) -> LoopbackSnapshot {
        self.telemetry.get()
    }

    pub fn recorder(&self) -> Arc<CircularSampleBuffer> {
        self.analyzer.recorder()
    }

    /// Max absolute input level since the last reset.
    pub fn peak_level(&self) -> f32 {
        self.peak.peak_level()
    }

    pub fn criteria(&self) -> &PassCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: PassCriteria) {
        self.criteria = criteria;
    }

    /// Results of the run so far, tagged with the audio API that produced them.
    pub fn results(&self, api: u32) -> TestResults {
        TestResults::from_analyzer(api, &self.analyzer)
    }

    pub fn verdict(&self, api: u32) -> Verdict {
        let results = self.results(api);
        let verdict = self
            .criteria
            .evaluate(&results, self.analyzer.config().tolerance_fraction);

        tracing::info!(
            api = results.api,
            magnitude = results.max_magnitude,
            jitter = results.phase_jitter,
            peak = self.peak_level(),
            "Loopback verdict: {}",
            verdict
        );
        verdict
    }

    /// Up to `max_samples` of the most recent recorded input, oldest first.
    pub fn recorded_samples(&self, max_samples: usize) -> Vec<f32> {
        let mut samples = vec![0.0f32; max_samples];
        let read = self.analyzer.recorder().read_latest(&mut samples);
        samples.truncate(read);
        samples
    }

    /// Dump the whole recorder to a mono float WAV file.
    #[cfg(feature = "wav")]
    pub fn write_recording_wav(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let recorder = self.analyzer.recorder();
        let samples = self.recorded_samples(recorder.capacity());
        tracing::debug!(
            samples = samples.len(),
            path = %path.as_ref().display(),
            "Writing loopback recording"
        );
        crate::recording::write_wav_mono(path.as_ref(), &samples, self.analyzer.sample_rate())
    }
}
