//! # Loopcheck - Audio Loopback Verification
//!
//! Plays a sine tone out of one channel and checks that it comes back on an
//! input channel, loud enough and with a steady phase.
//!
//! ## Architecture
//!
//! Loopcheck is an umbrella crate that coordinates:
//! - **loopcheck-core** - Config, phase math, lock-free sample recorder
//! - **loopcheck-analysis** - Loopback sine analyzer, peak meter, test tone, telemetry
//!
//! On top of those it adds the test session, pass/fail verdicts and WAV
//! dumps of the recorded input.
//!
//! ## Quick Start
//!
//! ```rust
//! use loopcheck::prelude::*;
//!
//! let mut session = LoopbackSession::builder()
//!     .sample_rate(48000)
//!     .target_frequency(1000.0)
//!     .build()?;
//!
//! // In the audio callback:
//! let mut output = vec![0.0f32; 256 * 2];
//! session.render_output(&mut output, 2);
//! // ... output goes to the speaker, input comes back from the mic ...
//! session.process_input(&output, 2, 256);
//!
//! // After the run:
//! let results = session.results(0);
//! let verdict = session.verdict(0);
//! # let _ = (results, verdict);
//! # Ok::<(), loopcheck::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `default` - Session, verdicts and WAV dumps
//! - `wav` - Write the recorder to a WAV file
//! - `serialization` - Serde support for configs, snapshots and results

/// Re-export of loopcheck-core for direct access
pub use loopcheck_core as core;

/// Re-export of loopcheck-analysis for direct access
pub use loopcheck_analysis as analysis;

// Core types
pub use loopcheck_core::{
    phase_distance, wrap_phase, CircularSampleBuffer, LoopbackConfig, DEFAULT_PHASE_TOLERANCE,
    DEFAULT_RECORDER_CAPACITY, DEFAULT_TARGET_FREQUENCY, DEFAULT_TOLERANCE_FRACTION,
};

// Analysis types
pub use loopcheck_analysis::{
    AtomicLoopbackTelemetry, LockState, LoopbackSineAnalyzer, LoopbackSnapshot, PeakAnalyzer,
    SignalAnalyzer, SineTone, MAX_ALLOWED_JITTER, MIN_REQUIRED_MAGNITUDE, RESET_PHASE_JITTER,
};

pub mod error;
pub use error::{Error, Result};

pub mod verdict;
pub use verdict::{AnalysisType, PassCriteria, TestResults, Verdict};

#[cfg(feature = "wav")]
pub mod recording;

#[cfg(feature = "wav")]
pub use recording::{encode_wav_mono, write_wav_mono};

mod builder;
mod session;

pub use builder::LoopbackSessionBuilder;
pub use session::LoopbackSession;

/// Convenience prelude for common imports
pub mod prelude {
    // Main session
    pub use crate::{LoopbackSession, LoopbackSessionBuilder};

    // Verdicts
    pub use crate::{AnalysisType, PassCriteria, TestResults, Verdict};

    // Analysis
    pub use crate::{
        LockState, LoopbackConfig, LoopbackSineAnalyzer, LoopbackSnapshot, SignalAnalyzer,
        SineTone,
    };

    pub use crate::{Error, Result};
}
