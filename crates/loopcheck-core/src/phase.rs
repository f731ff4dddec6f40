//! Phase arithmetic on radians.

use core::f64::consts::{PI, TAU};

/// Wrap an angle into (-π, π].
///
/// Periodic in 2π. Non-finite input is returned unchanged.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    if !phase.is_finite() {
        return phase;
    }
    if phase > -PI && phase <= PI {
        return phase;
    }
    // rem_euclid lands in [0, 2π); shift the upper half down.
    let wrapped = phase.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Absolute phase difference between two angles, in [0, π].
#[inline]
pub fn phase_distance(a: f64, b: f64) -> f64 {
    wrap_phase(a - b).abs()
}
