//! Loopback sine analysis.
//!
//! A tone at [`LoopbackSineAnalyzer::adjusted_frequency`] is played out of the
//! device and recorded back. Every tone period the analyzer measures the
//! recorded tone's magnitude and phase against its own reference oscillator
//! and keeps:
//!
//! - **magnitude**: one-pole smoothed (α = 0.1) detected amplitude
//! - **max magnitude**: largest smoothed magnitude seen while phase-locked
//! - **phase jitter**: mean absolute phase step between periods
//!
//! Periods whose smoothed magnitude is below [`MIN_REQUIRED_MAGNITUDE`] are
//! treated as silence and leave lock and jitter state untouched. Pass/fail is
//! left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use loopcheck_analysis::{LoopbackSineAnalyzer, SignalAnalyzer};
//!
//! let mut analyzer = LoopbackSineAnalyzer::new();
//! analyzer.reset();
//!
//! let freq = analyzer.adjusted_frequency(); // 1000.0 at 48 kHz
//! let tone: Vec<f32> = (0..4800)
//!     .map(|i| (0.5 * (std::f64::consts::TAU * freq * i as f64 / 48000.0).sin()) as f32)
//!     .collect();
//! analyzer.analyze_buffer(&tone, 1, tone.len());
//!
//! assert!(analyzer.max_magnitude() > 0.45);
//! assert!(analyzer.is_locked());
//! ```

use crate::analyzer::{usable_frames, SignalAnalyzer};
use crate::detector::{DetectionResult, SineCorrelationDetector};
use crate::oscillator::ReferenceOscillator;
use crate::telemetry::{AtomicLoopbackTelemetry, LockState, LoopbackSnapshot};
use core::f64::consts::{PI, TAU};
use loopcheck_core::{phase_distance, Arc, CircularSampleBuffer, LoopbackConfig, Result};
use tracing::{debug, warn};

/// Smoothed magnitude below which a period counts as silence.
pub const MIN_REQUIRED_MAGNITUDE: f64 = 0.001;

/// Largest mean phase step still considered a clean loopback:
/// two samples of phase at 1 kHz / 48 kHz.
pub const MAX_ALLOWED_JITTER: f64 = 2.0 * TAU * 1000.0 / 48000.0;

/// Jitter reported after [`reset`](LoopbackSineAnalyzer::reset), before any
/// period has been measured.
pub const RESET_PHASE_JITTER: f64 = 2.0 * MAX_ALLOWED_JITTER;

/// Gated periods ignored by the jitter statistics while the smoothing filter settles.
pub const SETTLING_PERIODS: usize = 3;

const MAGNITUDE_DECAY: f64 = 0.9;
const MAGNITUDE_GAIN: f64 = 0.1;

#[derive(Debug, Clone)]
struct SmoothedState {
    magnitude: f64,
    max_magnitude: f64,
    phase_offset: f64,
    previous_phase: f64,
    phase_error_sum: f64,
    phase_error_count: usize,
    phase_jitter: f64,
    gated_periods: usize,
    lock_state: LockState,
}

impl SmoothedState {
    fn new() -> Self {
        Self {
            magnitude: 0.0,
            max_magnitude: 0.0,
            phase_offset: 0.0,
            previous_phase: 0.0,
            phase_error_sum: 0.0,
            phase_error_count: 0,
            phase_jitter: RESET_PHASE_JITTER,
            gated_periods: 0,
            lock_state: LockState::Unlocked,
        }
    }

    fn mean_phase_error(&self) -> f64 {
        if self.phase_error_count == 0 {
            PI
        } else {
            self.phase_error_sum / self.phase_error_count as f64
        }
    }
}

/// Synchronous loopback tone analyzer.
///
/// Owns its reference oscillator and detector; shares its sample recorder
/// through an `Arc` so a diagnostic thread can read history while the audio
/// thread keeps writing.
pub struct LoopbackSineAnalyzer {
    config: LoopbackConfig,
    oscillator: ReferenceOscillator,
    detector: SineCorrelationDetector,
    state: SmoothedState,
    recorder: Arc<CircularSampleBuffer>,
    telemetry: Option<Arc<AtomicLoopbackTelemetry>>,
}

impl LoopbackSineAnalyzer {
    /// Analyzer for a 1 kHz tone at 48 kHz on channel 0, with a default-sized recorder.
    pub fn new() -> Self {
        Self::from_parts(
            LoopbackConfig::default(),
            ReferenceOscillator::default(),
            Arc::new(CircularSampleBuffer::default()),
        )
    }

    pub fn with_config(config: LoopbackConfig) -> Result<Self> {
        Self::with_recorder(config, Arc::new(CircularSampleBuffer::default()))
    }

    pub fn with_recorder(config: LoopbackConfig, recorder: Arc<CircularSampleBuffer>) -> Result<Self> {
        config.validate()?;
        let oscillator = ReferenceOscillator::from_config(&config)?;
        Ok(Self::from_parts(config, oscillator, recorder))
    }

    fn from_parts(
        config: LoopbackConfig,
        oscillator: ReferenceOscillator,
        recorder: Arc<CircularSampleBuffer>,
    ) -> Self {
        let period = oscillator.period_samples();
        Self {
            config,
            detector: SineCorrelationDetector::with_period(period),
            oscillator,
            state: SmoothedState::new(),
            recorder,
            telemetry: None,
        }
    }

    /// Apply a new configuration.
    ///
    /// Recomputes the period and discards any partially accumulated period.
    /// Smoothed state is kept unless the sample rate changed, in which case
    /// everything is reset.
    pub fn configure(&mut self, config: &LoopbackConfig) -> Result<()> {
        if let Err(e) = config.validate() {
            warn!("Rejected loopback config: {}", e);
            return Err(e);
        }

        let rate_changed = config.sample_rate != self.config.sample_rate;
        self.oscillator.retune(config)?;
        self.detector.set_period(self.oscillator.period_samples())?;
        self.config = config.clone();

        debug!(
            "Configured loopback analyzer: {} Hz, period {} samples, tone {:.3} Hz",
            config.sample_rate,
            self.oscillator.period_samples(),
            self.oscillator.adjusted_frequency()
        );

        if rate_changed {
            self.reset();
        }
        Ok(())
    }

    pub fn set_input_channel(&mut self, channel: usize) {
        self.config.input_channel = channel;
    }

    pub fn set_output_channel(&mut self, channel: usize) {
        self.config.output_channel = channel;
    }

    /// Publish telemetry to `telemetry` after every analyzed buffer.
    pub fn attach_telemetry(&mut self, telemetry: Arc<AtomicLoopbackTelemetry>) {
        telemetry.set(&self.snapshot());
        self.telemetry = Some(telemetry);
    }

    pub fn config(&self) -> &LoopbackConfig {
        &self.config
    }

    pub fn recorder(&self) -> Arc<CircularSampleBuffer> {
        Arc::clone(&self.recorder)
    }

    pub fn magnitude(&self) -> f64 {
        self.state.magnitude
    }

    pub fn max_magnitude(&self) -> f64 {
        self.state.max_magnitude
    }

    /// Phase of the last measured period relative to the reference.
    pub fn phase_offset(&self) -> f64 {
        self.state.phase_offset
    }

    pub fn phase_jitter(&self) -> f64 {
        self.state.phase_jitter
    }

    /// Current reference phase, which also drives the output tone.
    pub fn output_phase(&self) -> f64 {
        self.oscillator.phase()
    }

    /// The tone frequency the output must play; see
    /// [`ReferenceOscillator::adjusted_frequency`].
    pub fn adjusted_frequency(&self) -> f64 {
        self.oscillator.adjusted_frequency()
    }

    pub fn period_samples(&self) -> usize {
        self.oscillator.period_samples()
    }

    pub fn sample_rate(&self) -> u32 {
        self.oscillator.sample_rate()
    }

    pub fn lock_state(&self) -> LockState {
        self.state.lock_state
    }

    /// Whether the measured jitter is within [`MAX_ALLOWED_JITTER`].
    pub fn is_locked(&self) -> bool {
        self.state.phase_jitter <= MAX_ALLOWED_JITTER
    }

    pub fn snapshot(&self) -> LoopbackSnapshot {
        LoopbackSnapshot {
            magnitude: self.state.magnitude,
            max_magnitude: self.state.max_magnitude,
            phase_offset: self.state.phase_offset,
            phase_jitter: self.state.phase_jitter,
            output_phase: self.oscillator.phase(),
            lock_state: self.state.lock_state,
        }
    }

    fn on_period(&mut self, result: DetectionResult) {
        let state = &mut self.state;
        state.magnitude = state.magnitude * MAGNITUDE_DECAY + result.magnitude * MAGNITUDE_GAIN;
        state.phase_offset = result.phase;

        if state.magnitude < MIN_REQUIRED_MAGNITUDE {
            return;
        }

        let phase_error = phase_distance(result.phase, state.previous_phase);
        if phase_error < self.config.phase_tolerance {
            state.max_magnitude = state.max_magnitude.max(state.magnitude);
            state.lock_state = LockState::Locked;
        } else {
            state.lock_state = LockState::Candidate;
        }
        state.previous_phase = result.phase;

        state.gated_periods += 1;
        if state.gated_periods > SETTLING_PERIODS {
            state.phase_error_sum += phase_error;
            state.phase_error_count += 1;
            state.phase_jitter = state.mean_phase_error();
        }
    }
}

impl Default for LoopbackSineAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalAnalyzer for LoopbackSineAnalyzer {
    fn reset(&mut self) {
        self.oscillator.reset();
        self.detector.reset();
        self.state = SmoothedState::new();
        if let Some(telemetry) = &self.telemetry {
            telemetry.set(&self.snapshot());
        }
        debug!("Reset loopback analyzer");
    }

    fn analyze_buffer(&mut self, samples: &[f32], num_channels: usize, num_frames: usize) {
        let channel = self.config.input_channel;
        if channel >= num_channels {
            return;
        }
        let frames = usable_frames(samples, num_channels, num_frames);

        for frame in samples.chunks_exact(num_channels).take(frames) {
            let sample = frame[channel];
            self.recorder.write(sample);
            if let Some(result) = self.detector.consume(sample, self.oscillator.phase()) {
                self.on_period(result);
            }
            self.oscillator.advance();
        }

        if let Some(telemetry) = &self.telemetry {
            telemetry.set(&self.snapshot());
        }
    }
}
