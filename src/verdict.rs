//! Pass/fail evaluation for loopback test runs.
//!
//! Verdicts are derived only from analyzer telemetry captured at the end of
//! a run. The analyzer itself never decides pass or fail.

use crate::analysis::{LoopbackSineAnalyzer, LoopbackSnapshot};

/// What a test run expects to hear on the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum AnalysisType {
    /// The tone must come back, loud enough and phase-steady.
    #[default]
    SignalPresence,
    /// The path must be muted: no tone may come back.
    SignalAbsence,
}

/// Thresholds applied to a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct PassCriteria {
    pub analysis_type: AnalysisType,
    pub min_pass_magnitude: f64,
    pub max_pass_jitter: f64,
}

impl Default for PassCriteria {
    fn default() -> Self {
        Self {
            analysis_type: AnalysisType::SignalPresence,
            min_pass_magnitude: 0.01,
            max_pass_jitter: 0.1,
        }
    }
}

/// Outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Verdict {
    Pass,
    /// Expected tone never reached the minimum locked magnitude.
    TooQuiet,
    /// Tone detected on a path that should be silent.
    TooLoud,
    /// Tone present but its phase wandered too much between periods.
    NoLock,
    /// Current magnitude drifted away from the locked magnitude.
    Unstable,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::TooQuiet => "TOO QUIET",
            Verdict::TooLoud => "TOO LOUD",
            Verdict::NoLock => "NO LOCK",
            Verdict::Unstable => "UNSTABLE",
        }
    }
}

impl core::fmt::Display for Verdict {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Telemetry captured at the end of a run, tagged with the audio API used.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct TestResults {
    #[cfg_attr(feature = "serialization", serde(rename = "test_api"))]
    pub api: u32,
    pub magnitude: f64,
    pub max_magnitude: f64,
    pub phase: f64,
    pub phase_jitter: f64,
}

impl TestResults {
    pub fn from_analyzer(api: u32, analyzer: &LoopbackSineAnalyzer) -> Self {
        Self::from_snapshot(api, &analyzer.snapshot())
    }

    pub fn from_snapshot(api: u32, snapshot: &LoopbackSnapshot) -> Self {
        Self {
            api,
            magnitude: snapshot.magnitude,
            max_magnitude: snapshot.max_magnitude,
            phase: snapshot.phase_offset,
            phase_jitter: snapshot.phase_jitter,
        }
    }
}

impl PassCriteria {
    pub fn signal_absence() -> Self {
        Self {
            analysis_type: AnalysisType::SignalAbsence,
            ..Self::default()
        }
    }

    /// Evaluate `results`; `tolerance_fraction` bounds how far the final
    /// magnitude may sit from the locked maximum.
    pub fn evaluate(&self, results: &TestResults, tolerance_fraction: f64) -> Verdict {
        match self.analysis_type {
            AnalysisType::SignalAbsence => {
                if results.max_magnitude <= self.min_pass_magnitude {
                    Verdict::Pass
                } else {
                    Verdict::TooLoud
                }
            }
            AnalysisType::SignalPresence => {
                if results.max_magnitude < self.min_pass_magnitude {
                    Verdict::TooQuiet
                } else if results.phase_jitter > self.max_pass_jitter {
                    Verdict::NoLock
                } else if (results.max_magnitude - results.magnitude).abs()
                    > tolerance_fraction * results.max_magnitude
                {
                    Verdict::Unstable
                } else {
                    Verdict::Pass
                }
            }
        }
    }

    /// Pass/fail on magnitude and jitter alone.
    pub fn passes(&self, results: &TestResults) -> bool {
        match self.analysis_type {
            AnalysisType::SignalPresence => {
                results.max_magnitude >= self.min_pass_magnitude
                    && results.phase_jitter <= self.max_pass_jitter
            }
            AnalysisType::SignalAbsence => results.max_magnitude <= self.min_pass_magnitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results(magnitude: f64, max_magnitude: f64, phase_jitter: f64) -> TestResults {
        TestResults {
            api: 0,
            magnitude,
            max_magnitude,
            phase: 0.0,
            phase_jitter,
        }
    }

    #[test]
    fn test_presence_pass() {
        let criteria = PassCriteria::default();
        let r = results(0.49, 0.5, 0.001);
        assert_eq!(criteria.evaluate(&r, 0.1), Verdict::Pass);
        assert!(criteria.passes(&r));
    }

    #[test]
    fn test_presence_failures() {
        let criteria = PassCriteria::default();
        assert_eq!(criteria.evaluate(&results(0.005, 0.005, 0.0), 0.1), Verdict::TooQuiet);
        assert_eq!(criteria.evaluate(&results(0.5, 0.5, 0.3), 0.1), Verdict::NoLock);
        assert_eq!(criteria.evaluate(&results(0.2, 0.5, 0.01), 0.1), Verdict::Unstable);
        // Unstable still passes the magnitude/jitter criteria.
        assert!(criteria.passes(&results(0.2, 0.5, 0.01)));
        assert!(!criteria.passes(&results(0.5, 0.5, 0.3)));
    }

    #[test]
    fn test_absence() {
        let criteria = PassCriteria::signal_absence();
        assert_eq!(criteria.evaluate(&results(0.0, 0.0, 0.5), 0.1), Verdict::Pass);
        assert_eq!(criteria.evaluate(&results(0.3, 0.3, 0.0), 0.1), Verdict::TooLoud);
        assert!(criteria.passes(&results(0.0, 0.01, 1.0)));
    }

    #[test]
    fn test_from_snapshot() {
        let snapshot = LoopbackSnapshot {
            magnitude: 0.3,
            max_magnitude: 0.31,
            phase_offset: 1.2,
            phase_jitter: 0.02,
            ..LoopbackSnapshot::default()
        };
        let r = TestResults::from_snapshot(2, &snapshot);
        assert_eq!(r.api, 2);
        assert_eq!(r.phase, 1.2);
        assert_eq!(r.max_magnitude, 0.31);
    }

    #[test]
    fn test_verdict_labels() {
        assert_eq!(Verdict::Pass.to_string(), "PASS");
        assert_eq!(Verdict::NoLock.label(), "NO LOCK");
        assert!(!Verdict::TooLoud.is_pass());
    }
}
