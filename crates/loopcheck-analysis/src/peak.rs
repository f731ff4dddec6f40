//! Peak level of one input channel.

use crate::analyzer::{usable_frames, SignalAnalyzer};

/// Tracks the largest absolute sample seen on the input channel since reset.
#[derive(Debug, Clone, Default)]
pub struct PeakAnalyzer {
    input_channel: usize,
    peak_level: f32,
}

impl PeakAnalyzer {
    pub fn new(input_channel: usize) -> Self {
        Self {
            input_channel,
            peak_level: 0.0,
        }
    }

    pub fn set_input_channel(&mut self, channel: usize) {
        self.input_channel = channel;
    }

    pub fn input_channel(&self) -> usize {
        self.input_channel
    }

    pub fn peak_level(&self) -> f32 {
        self.peak_level
    }
}

impl SignalAnalyzer for PeakAnalyzer {
    fn reset(&mut self) {
        self.peak_level = 0.0;
    }

    fn analyze_buffer(&mut self, samples: &[f32], num_channels: usize, num_frames: usize) {
        if self.input_channel >= num_channels {
            return;
        }
        let frames = usable_frames(samples, num_channels, num_frames);
        self.peak_level = samples
            .chunks_exact(num_channels)
            .take(frames)
            .map(|frame| frame[self.input_channel].abs())
            .fold(self.peak_level, f32::max);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak_tracks_input_channel() {
        let mut peak = PeakAnalyzer::new(1);
        // L, R interleaved; only R is analyzed
        let samples = [0.9, 0.1, -0.8, -0.4, 0.7, 0.2];
        peak.analyze_buffer(&samples, 2, 3);
        assert_eq!(peak.peak_level(), 0.4);

        peak.analyze_buffer(&[0.0, 0.3], 2, 1);
        assert_eq!(peak.peak_level(), 0.4, "peak should hold");

        peak.reset();
        assert_eq!(peak.peak_level(), 0.0);
    }

    #[test]
    fn test_peak_ignores_missing_channel() {
        let mut peak = PeakAnalyzer::new(2);
        peak.analyze_buffer(&[1.0, 1.0], 2, 1);
        assert_eq!(peak.peak_level(), 0.0);
    }

    #[test]
    fn test_peak_clamps_frame_count() {
        let mut peak = PeakAnalyzer::new(0);
        peak.analyze_buffer(&[0.25, -0.5], 1, 100);
        assert_eq!(peak.peak_level(), 0.5);
    }
}
