//! Anti-aliasing low-pass filter
//!
//! Designs a digital Butterworth low-pass and runs it over a whole buffer
//! before decimation.
//!
//! Design:
//! 1. Normalize the cutoff to the Nyquist frequency: `wn = fc / (fs / 2)`
//! 2. Place the analog prototype poles `-exp(j*pi*m / (2N))`, `m = -N+1, -N+3, ..., N-1`
//! 3. Pre-warp the cutoff (`tan(pi * wn / 2)`) and scale the poles by it
//! 4. Map poles to the z-plane with the bilinear transform `z = (1 + s) / (1 - s)`;
//!    all N zeros land on `z = -1`
//! 5. Expand poles and zeros into transfer-function polynomials
//!
//! # Example
//!
//! ```
//! use pcm_embed::preprocessing::anti_alias::{apply, design};
//! use pcm_embed::SampleBuffer;
//!
//! let coeffs = design(8000.0, 32000.0, 2)?;
//! let filtered = apply(&coeffs, &SampleBuffer::new(vec![0.0; 64], 32000));
//! assert_eq!(filtered.len(), 64);
//! # Ok::<(), pcm_embed::PipelineError>(())
//! ```

use std::f64::consts::PI;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::PipelineError;
use crate::io::sample_buffer::SampleBuffer;

/// Highest filter order accepted by [`design`]
///
/// Expanded transfer functions lose precision quickly above this.
pub const MAX_ORDER: usize = 16;

/// Rational transfer-function coefficients of a designed filter
///
/// `feedforward` is the numerator `b`, `feedback` the denominator `a`, both in
/// ascending powers of `z^-1`. Designed filters always have `feedback[0] == 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCoefficients {
    /// Numerator coefficients (b)
    pub feedforward: Vec<f64>,
    /// Denominator coefficients (a)
    pub feedback: Vec<f64>,
}

impl FilterCoefficients {
    /// Filter order (number of poles)
    pub fn order(&self) -> usize {
        self.feedback.len().saturating_sub(1)
    }

    /// Evaluate the frequency response `H(e^jw)` on `n_points` frequencies
    ///
    /// Frequencies are `w = pi * k / n_points` for `k = 0..n_points`, i.e. from
    /// DC up to (excluding) Nyquist. Both polynomials are evaluated with one FFT
    /// of length `2 * n_points`; coefficient vectors longer than the FFT are
    /// wrapped, which samples the same DTFT.
    pub fn frequency_response(&self, n_points: usize) -> Vec<Complex<f64>> {
        if n_points == 0 {
            return Vec::new();
        }

        let fft_size = 2 * n_points;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);

        let spectrum = |coeffs: &[f64]| {
            let mut buf = vec![Complex::new(0.0, 0.0); fft_size];
            for (i, &c) in coeffs.iter().enumerate() {
                buf[i % fft_size].re += c;
            }
            fft.process(&mut buf);
            buf
        };

        let num = spectrum(&self.feedforward);
        let den = spectrum(&self.feedback);

        num.iter()
            .zip(den.iter())
            .take(n_points)
            .map(|(&b, &a)| b / a)
            .collect()
    }
}

/// Expand roots into monic polynomial coefficients (highest power first)
fn poly(roots: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut coeffs = vec![Complex::new(1.0, 0.0)];
    for &root in roots {
        let mut next = coeffs.clone();
        next.push(Complex::new(0.0, 0.0));
        for (i, &c) in coeffs.iter().enumerate() {
            next[i + 1] -= root * c;
        }
        coeffs = next;
    }
    coeffs
}

/// Design a Butterworth low-pass filter
///
/// # Arguments
///
/// * `cutoff_hz` - -3 dB cutoff frequency in Hz
/// * `sample_rate_hz` - Sample rate of the signal the filter will run on
/// * `order` - Filter order (1..=[`MAX_ORDER`])
///
/// # Returns
///
/// Transfer-function coefficients with `order + 1` entries each
///
/// # Errors
///
/// - `PipelineError::InvalidCutoff` if `cutoff_hz / (0.5 * sample_rate_hz)` is not in (0, 1)
/// - `PipelineError::InvalidInput` if `order` is 0 or above [`MAX_ORDER`]
pub fn design(
    cutoff_hz: f64,
    sample_rate_hz: f64,
    order: usize,
) -> Result<FilterCoefficients, PipelineError> {
    let wn = cutoff_hz / (0.5 * sample_rate_hz);

    // Also rejects NaN
    if !(wn > 0.0 && wn < 1.0) {
        return Err(PipelineError::InvalidCutoff {
            cutoff_hz,
            sample_rate_hz,
        });
    }

    if order == 0 || order > MAX_ORDER {
        return Err(PipelineError::InvalidInput(format!(
            "Filter order must be in 1..={}, got {}",
            MAX_ORDER, order
        )));
    }

    log::debug!(
        "Designing order-{} Butterworth low-pass: cutoff={:.1} Hz, fs={:.1} Hz (wn={:.4})",
        order,
        cutoff_hz,
        sample_rate_hz,
        wn
    );

    let n = order as f64;
    let warped = (PI * wn / 2.0).tan();
    let one = Complex::new(1.0, 0.0);

    let analog_poles: Vec<Complex<f64>> = (0..order)
        .map(|i| {
            let m = 2.0 * i as f64 - (n - 1.0);
            -Complex::from_polar(1.0, PI * m / (2.0 * n)) * warped
        })
        .collect();

    let digital_poles: Vec<Complex<f64>> = analog_poles
        .iter()
        .map(|&p| (one + p) / (one - p))
        .collect();

    // Conjugate pairs make the product real
    let denom = analog_poles
        .iter()
        .fold(one, |acc, &p| acc * (one - p));
    let gain = warped.powi(order as i32) / denom.re;

    let zeros = vec![Complex::new(-1.0, 0.0); order];
    let feedforward = poly(&zeros).iter().map(|c| c.re * gain).collect();
    let feedback = poly(&digital_poles).iter().map(|c| c.re).collect();

    Ok(FilterCoefficients {
        feedforward,
        feedback,
    })
}

/// Filter a whole buffer with zero initial state
///
/// The output satisfies
/// `a[0]*y[n] = sum(b[k]*x[n-k]) - sum(a[k]*y[n-k], k >= 1)`, evaluated in
/// transposed direct form II with f64 state. Length and sample rate are
/// preserved.
pub fn apply(coeffs: &FilterCoefficients, buffer: &SampleBuffer) -> SampleBuffer {
    let a0 = coeffs.feedback.first().copied().unwrap_or(1.0);
    let taps = coeffs.feedforward.len().max(coeffs.feedback.len()).max(1);

    let mut b = vec![0.0f64; taps];
    let mut a = vec![0.0f64; taps];
    for (dst, &src) in b.iter_mut().zip(coeffs.feedforward.iter()) {
        *dst = src / a0;
    }
    for (dst, &src) in a.iter_mut().zip(coeffs.feedback.iter()) {
        *dst = src / a0;
    }

    log::debug!(
        "Filtering {} samples with {} taps",
        buffer.len(),
        taps
    );

    let mut state = vec![0.0f64; taps - 1];
    let filtered = buffer
        .samples
        .iter()
        .map(|&sample| {
            let x = sample as f64;
            let y = b[0] * x + state.first().copied().unwrap_or(0.0);
            for i in 0..state.len() {
                let carry = state.get(i + 1).copied().unwrap_or(0.0);
                state[i] = b[i + 1] * x - a[i + 1] * y + carry;
            }
            y as f32
        })
        .collect();

    buffer.with_samples(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direct evaluation of the difference equation
    fn reference_filter(coeffs: &FilterCoefficients, x: &[f64]) -> Vec<f64> {
        let (b, a) = (&coeffs.feedforward, &coeffs.feedback);
        let mut y = vec![0.0; x.len()];
        for n in 0..x.len() {
            let mut acc = 0.0;
            for (k, &bk) in b.iter().enumerate() {
                if n >= k {
                    acc += bk * x[n - k];
                }
            }
            for (k, &ak) in a.iter().enumerate().skip(1) {
                if n >= k {
                    acc -= ak * y[n - k];
                }
            }
            y[n] = acc / a[0];
        }
        y
    }

    #[test]
    fn test_second_order_half_band() {
        // fc = fs / 4
        let coeffs = design(8000.0, 32000.0, 2).unwrap();
        let expected_b = [0.292_893_218_8, 0.585_786_437_6, 0.292_893_218_8];
        let expected_a = [1.0, 0.0, 0.171_572_875_3];

        for (got, want) in coeffs.feedforward.iter().zip(expected_b.iter()) {
            assert!((got - want).abs() < 1e-9, "b: expected {}, got {}", want, got);
        }
        for (got, want) in coeffs.feedback.iter().zip(expected_a.iter()) {
            assert!((got - want).abs() < 1e-9, "a: expected {}, got {}", want, got);
        }
    }

    #[test]
    fn test_first_order() {
        let coeffs = design(4000.0, 48000.0, 1).unwrap();
        let wc = (PI * (4000.0 / 24000.0) / 2.0).tan();
        let k = wc / (1.0 + wc);
        assert_eq!(coeffs.order(), 1);
        assert!((coeffs.feedforward[0] - k).abs() < 1e-12);
        assert!((coeffs.feedforward[1] - k).abs() < 1e-12);
        assert!((coeffs.feedback[1] + (1.0 - wc) / (1.0 + wc)).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_cutoff() {
        for cutoff in [0.0, -100.0, 16000.0, 20000.0, f64::NAN] {
            let result = design(cutoff, 32000.0, 2);
            assert!(
                matches!(result, Err(PipelineError::InvalidCutoff { .. })),
                "cutoff {} should be rejected",
                cutoff
            );
        }
    }

    #[test]
    fn test_invalid_order() {
        assert!(matches!(
            design(1000.0, 32000.0, 0),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(design(1000.0, 32000.0, MAX_ORDER + 1).is_err());
    }

    #[test]
    fn test_deterministic() {
        let first = design(8000.0, 44100.0, 4).unwrap();
        let second = design(8000.0, 44100.0, 4).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unity_dc_gain() {
        for order in 1..=8 {
            let coeffs = design(3000.0, 44100.0, order).unwrap();
            let dc = coeffs.feedforward.iter().sum::<f64>() / coeffs.feedback.iter().sum::<f64>();
            assert!((dc - 1.0).abs() < 1e-9, "order {}: DC gain {}", order, dc);
        }
    }

    #[test]
    fn test_frequency_response_at_cutoff() {
        // wn = 0.5 lands exactly on bin 256 of 512
        for order in 1..=6 {
            let coeffs = design(11025.0, 44100.0, order).unwrap();
            let response = coeffs.frequency_response(512);
            assert_eq!(response.len(), 512);
            assert!((response[0].norm() - 1.0).abs() < 1e-9);
            let at_cutoff = response[256].norm();
            assert!(
                (at_cutoff - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-9,
                "order {}: |H(wc)| = {}",
                order,
                at_cutoff
            );
            assert!(response[511].norm() < at_cutoff);
        }
    }

    #[test]
    fn test_zero_in_zero_out() {
        let coeffs = design(8000.0, 48000.0, 4).unwrap();
        for len in [0usize, 1, 7, 1000] {
            let silent = SampleBuffer::new(vec![0.0; len], 48000);
            let out = apply(&coeffs, &silent);
            assert_eq!(out.len(), len);
            assert_eq!(out.sample_rate, 48000);
            assert!(out.samples.iter().all(|&x| x == 0.0));
        }
    }

    #[test]
    fn test_matches_difference_equation() {
        let coeffs = design(5000.0, 44100.0, 3).unwrap();
        let input: Vec<f32> = (0..256)
            .map(|i| ((i as f32) * 0.37).sin() * 0.8)
            .collect();
        let out = apply(&coeffs, &SampleBuffer::new(input.clone(), 44100));
        let reference = reference_filter(
            &coeffs,
            &input.iter().map(|&x| x as f64).collect::<Vec<_>>(),
        );
        for (got, want) in out.samples.iter().zip(reference.iter()) {
            assert!((*got as f64 - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_non_normalized_feedback() {
        // a[0] != 1 must divide through
        let coeffs = FilterCoefficients {
            feedforward: vec![1.0],
            feedback: vec![2.0, -1.0],
        };
        let out = apply(&coeffs, &SampleBuffer::new(vec![1.0, 0.0, 0.0], 8000));
        assert!((out.samples[0] - 0.5).abs() < 1e-7);
        assert!((out.samples[1] - 0.25).abs() < 1e-7);
        assert!((out.samples[2] - 0.125).abs() < 1e-7);
    }

    #[test]
    fn test_attenuates_above_cutoff() {
        let fs = 48000.0;
        let coeffs = design(4000.0, fs, 4).unwrap();
        let tone: Vec<f32> = (0..4800)
            .map(|i| (2.0 * std::f32::consts::PI * 15000.0 * i as f32 / fs as f32).sin())
            .collect();
        let out = apply(&coeffs, &SampleBuffer::new(tone, fs as u32));
        let tail_peak = out.samples[2400..]
            .iter()
            .map(|x| x.abs())
            .fold(0.0f32, f32::max);
        assert!(tail_peak < 0.05, "15 kHz tone should be attenuated, peak {}", tail_peak);
    }
}
