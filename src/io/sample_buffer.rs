//! Mono sample buffer passed between pipeline stages

/// Mono, unit-normalized audio signal tagged with its sample rate
///
/// Samples are expected in [-1.0, 1.0]. Every pipeline stage consumes a buffer
/// by reference and returns a new one, so a buffer is never mutated once a
/// stage has handed it on. An empty buffer is a valid (degenerate) signal.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Mono samples in temporal order
    pub samples: Vec<f32>,
}

impl SampleBuffer {
    /// Create a new sample buffer
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples,
        }
    }

    /// Derive a buffer at the same rate from new samples
    pub fn with_samples(&self, samples: Vec<f32>) -> Self {
        Self::new(samples, self.sample_rate)
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration_seconds(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Largest absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|&x| x.abs()).fold(0.0f32, f32::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let buffer = SampleBuffer::new(vec![0.0; 16000], 16000);
        assert!((buffer.duration_seconds() - 1.0).abs() < 1e-6);
        assert_eq!(buffer.len(), 16000);
    }

    #[test]
    fn test_with_samples_keeps_rate() {
        let buffer = SampleBuffer::new(vec![0.1, 0.2], 32000);
        let derived = buffer.with_samples(vec![0.5]);
        assert_eq!(derived.sample_rate, 32000);
        assert_eq!(derived.samples, vec![0.5]);
    }

    #[test]
    fn test_peak() {
        let buffer = SampleBuffer::new(vec![0.25, -0.75, 0.5], 8000);
        assert_eq!(buffer.peak(), 0.75);
        assert_eq!(SampleBuffer::new(vec![], 8000).peak(), 0.0);
    }
}
