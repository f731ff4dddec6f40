//! # Loopcheck Analysis
//!
//! Real-time analyzers for audio loopback tests.
//!
//! - **Loopback sine analysis**: synchronous single-frequency detection of
//!   magnitude, phase offset and phase jitter, once per tone period
//! - **Peak metering**: plain max-abs level of one input channel
//! - **Test tone**: the output-side sine at the analyzer's adjusted frequency
//! - **Telemetry**: lock-free snapshot for UI or reporting threads
//!
//! All analyzers take interleaved `&[f32]` buffers straight from an audio
//! callback and never allocate while analyzing.
//!
//! ## Example
//!
//! ```rust
//! use loopcheck_analysis::{LoopbackSineAnalyzer, SignalAnalyzer, SineTone};
//! use loopcheck_core::LoopbackConfig;
//!
//! let config = LoopbackConfig::new(48000);
//! let mut analyzer = LoopbackSineAnalyzer::with_config(config).unwrap();
//! analyzer.reset();
//!
//! let mut tone = SineTone::new(48000, analyzer.adjusted_frequency());
//! let mut buffer = vec![0.0f32; 480];
//! for _ in 0..20 {
//!     tone.fill_interleaved(&mut buffer, 1, 0);
//!     analyzer.analyze_buffer(&buffer, 1, buffer.len());
//! }
//! assert!(analyzer.is_locked());
//! ```

pub mod analyzer;
pub mod detector;
pub mod loopback;
pub mod oscillator;
pub mod peak;
pub mod telemetry;
pub mod tone;

pub use analyzer::SignalAnalyzer;
pub use detector::{DetectionResult, SineCorrelationDetector};
pub use loopback::{
    LoopbackSineAnalyzer, MAX_ALLOWED_JITTER, MIN_REQUIRED_MAGNITUDE, RESET_PHASE_JITTER,
    SETTLING_PERIODS,
};
pub use oscillator::ReferenceOscillator;
pub use peak::PeakAnalyzer;
pub use telemetry::{AtomicLoopbackTelemetry, LockState, LoopbackSnapshot};
pub use tone::SineTone;
