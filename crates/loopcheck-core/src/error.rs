//! Error types for loopcheck-core.

use thiserror::Error;

/// Error type for loopcheck-core operations.
///
/// Only configuration can fail. Silence, noise and a missing lock are
/// reported through telemetry, never through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid sample rate: {0} Hz. Must be positive")]
    InvalidSampleRate(u32),

    #[error("Invalid target frequency: {0} Hz. Must be positive and finite")]
    InvalidFrequency(f64),

    #[error(
        "Degenerate period: {sample_rate} Hz / {target_frequency} Hz gives {period} samples per cycle (need at least 2)"
    )]
    DegeneratePeriod {
        sample_rate: u32,
        target_frequency: f64,
        period: usize,
    },

    #[error("Invalid tolerance: {0}. Must be positive and finite")]
    InvalidTolerance(f64),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;
