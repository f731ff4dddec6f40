//! Tolerance constants for loopback testing.

/// Floating point rounding errors (for recording, exact copies).
pub const FLOAT_EPSILON: f32 = 1e-6;

/// Jitter a clean loop must settle below, in radians.
pub const CONVERGED_JITTER: f64 = 0.01;

/// Relative error allowed between the locked magnitude and the tone amplitude.
pub const MAGNITUDE_FRACTION: f64 = 0.05;

/// Periods needed for the 0.9/0.1 magnitude smoothing to get within
/// `MAGNITUDE_FRACTION` of its target (0.9^29 < 0.05), with margin.
pub const SETTLED_PERIODS: usize = 60;
