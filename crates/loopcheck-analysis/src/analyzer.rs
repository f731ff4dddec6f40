//! The capability shared by every input analyzer.

/// An analyzer fed interleaved input buffers from the audio callback.
///
/// Implementations must not allocate, lock or block in
/// [`analyze_buffer`](SignalAnalyzer::analyze_buffer).
pub trait SignalAnalyzer: Send {
    /// Clear running state at the start of a test run.
    fn reset(&mut self);

    /// Consume `num_frames` frames of `num_channels` interleaved samples.
    fn analyze_buffer(&mut self, samples: &[f32], num_channels: usize, num_frames: usize);
}

/// Number of whole frames that can actually be read from `samples`.
#[inline]
pub(crate) fn usable_frames(samples: &[f32], num_channels: usize, num_frames: usize) -> usize {
    if num_channels == 0 {
        return 0;
    }
    num_frames.min(samples.len() / num_channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usable_frames() {
        let samples = [0.0f32; 10];
        assert_eq!(usable_frames(&samples, 2, 5), 5);
        assert_eq!(usable_frames(&samples, 2, 8), 5);
        assert_eq!(usable_frames(&samples, 3, 4), 3);
        assert_eq!(usable_frames(&samples, 0, 4), 0);
        assert_eq!(usable_frames(&[], 1, 4), 0);
    }
}
