//! Channel mixing utilities (N channels to mono)

use crate::error::PipelineError;

/// Collapse planar channels into one mono channel by averaging
///
/// # Arguments
///
/// * `channels` - One slice per channel, all of equal length
///
/// # Returns
///
/// Mono samples where each value is the arithmetic mean of the channel values
/// at that index. A single channel is returned unchanged.
///
/// # Errors
///
/// Returns `PipelineError::InvalidInput` if no channel is given or the
/// channels differ in length.
pub fn mix_to_mono<T: AsRef<[f32]>>(channels: &[T]) -> Result<Vec<f32>, PipelineError> {
    let first = channels
        .first()
        .ok_or_else(|| PipelineError::InvalidInput("No channels to mix".to_string()))?
        .as_ref();

    let frames = first.len();
    if channels.iter().any(|ch| ch.as_ref().len() != frames) {
        return Err(PipelineError::InvalidInput(
            "Channels have different lengths".to_string(),
        ));
    }

    if channels.len() == 1 {
        return Ok(first.to_vec());
    }

    log::debug!(
        "Mixing {} channels x {} frames to mono",
        channels.len(),
        frames
    );

    let count = channels.len() as f32;
    Ok((0..frames)
        .map(|i| channels.iter().map(|ch| ch.as_ref()[i]).sum::<f32>() / count)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mono_passthrough() {
        let mono = mix_to_mono(&[vec![0.1f32, -0.2, 0.3]]).unwrap();
        assert_eq!(mono, vec![0.1, -0.2, 0.3]);
    }

    #[test]
    fn test_mean_of_n_channels() {
        for n in 1..=6usize {
            let channels: Vec<Vec<f32>> = (0..n)
                .map(|c| (0..32).map(|i| ((i * (c + 1)) as f32 * 0.01).sin()).collect())
                .collect();
            let mono = mix_to_mono(&channels).unwrap();
            assert_eq!(mono.len(), 32);
            for i in 0..32 {
                let expected = channels.iter().map(|ch| ch[i]).sum::<f32>() / n as f32;
                assert!(
                    (mono[i] - expected).abs() < 1e-6,
                    "channel count {}: index {} expected {} got {}",
                    n,
                    i,
                    expected,
                    mono[i]
                );
            }
        }
    }

    #[test]
    fn test_mismatched_lengths() {
        let result = mix_to_mono(&[vec![0.0f32; 4], vec![0.0f32; 3]]);
        assert!(result.is_err());
        let empty: [Vec<f32>; 0] = [];
        assert!(mix_to_mono(&empty).is_err());
    }
}
