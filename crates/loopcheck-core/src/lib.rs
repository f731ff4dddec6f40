//! Core primitives for loopback tone analysis.
//!
//! # Primary API
//!
//! - [`LoopbackConfig`]: sample rate, tone frequency, channels and tolerances
//! - [`CircularSampleBuffer`]: lock-free single-writer sample recorder
//! - [`wrap_phase`]: angle wrapping into (-π, π]
//! - [`AtomicDouble`]: cache-line aligned atomic for telemetry

pub mod error;
pub use error::{Error, Result};

pub mod config;
pub use config::{
    LoopbackConfig, DEFAULT_PHASE_TOLERANCE, DEFAULT_TARGET_FREQUENCY,
    DEFAULT_TOLERANCE_FRACTION,
};

pub mod circular;
pub use circular::{CircularSampleBuffer, DEFAULT_RECORDER_CAPACITY};

pub mod phase;
pub use phase::{phase_distance, wrap_phase};

pub(crate) mod lockfree;
pub use lockfree::AtomicDouble;

pub use std::sync::atomic::Ordering;
pub use std::sync::Arc;
