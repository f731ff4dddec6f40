//! Lock-free publication of loopback telemetry.

use core::sync::atomic::{AtomicU8, Ordering};
use loopcheck_core::AtomicDouble;

/// Lock state of the most recent detected period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum LockState {
    /// No period has cleared the magnitude gate since reset.
    #[default]
    Unlocked,
    /// Tone present but phase moved more than the tolerance since the last period.
    Candidate,
    /// Tone present and phase steady; magnitude is trusted.
    Locked,
}

impl LockState {
    fn to_u8(self) -> u8 {
        match self {
            LockState::Unlocked => 0,
            LockState::Candidate => 1,
            LockState::Locked => 2,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            1 => LockState::Candidate,
            2 => LockState::Locked,
            _ => LockState::Unlocked,
        }
    }
}

/// Point-in-time copy of the analyzer's telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LoopbackSnapshot {
    pub magnitude: f64,
    pub max_magnitude: f64,
    pub phase_offset: f64,
    pub phase_jitter: f64,
    pub output_phase: f64,
    pub lock_state: LockState,
}

/// Telemetry written by the audio thread, readable from any thread.
///
/// Fields are updated one by one, so a reader may see values from two
/// consecutive buffers mixed together.
#[derive(Debug, Default)]
pub struct AtomicLoopbackTelemetry {
    magnitude: AtomicDouble,
    max_magnitude: AtomicDouble,
    phase_offset: AtomicDouble,
    phase_jitter: AtomicDouble,
    output_phase: AtomicDouble,
    lock_state: AtomicU8,
}

impl AtomicLoopbackTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self) -> LoopbackSnapshot {
        LoopbackSnapshot {
            magnitude: self.magnitude.get(),
            max_magnitude: self.max_magnitude.get(),
            phase_offset: self.phase_offset.get(),
            phase_jitter: self.phase_jitter.get(),
            output_phase: self.output_phase.get(),
            lock_state: LockState::from_u8(self.lock_state.load(Ordering::Acquire)),
        }
    }

    #[inline]
    pub fn set(&self, snapshot: &LoopbackSnapshot) {
        self.magnitude.set(snapshot.magnitude);
        self.max_magnitude.set(snapshot.max_magnitude);
        self.phase_offset.set(snapshot.phase_offset);
        self.phase_jitter.set(snapshot.phase_jitter);
        self.output_phase.set(snapshot.output_phase);
        self.lock_state
            .store(snapshot.lock_state.to_u8(), Ordering::Release);
    }
}
