//! Autocorrelation analysis: the shared primitive behind both pitch tracking
//! (autocorrelation of audio blocks) and vibrato-rate estimation
//! (autocorrelation of the F0/RMS contour itself).

/// Compute the non-negative-lag half of a signal's linear autocorrelation.
///
/// The full autocorrelation is symmetric about lag 0, so only lags
/// `0..len(x)` are returned; nothing is lost. Each entry is the sliding inner
/// product of the signal with a copy of itself shifted by that lag,
/// accumulated in f64.
///
/// With `normalize`, every entry is divided by the lag-0 energy
/// `dot(x, x)`, putting the result on a -1..1 scale. A zero-energy input
/// (silence) is defined to yield an all-zero vector rather than NaNs, so
/// downstream peak picking stays well-behaved.
pub fn autocorrelate(x: &[f32], normalize: bool) -> Vec<f32> {
    let n = x.len();

    let energy: f64 = x.iter().map(|&s| s as f64 * s as f64).sum();
    if normalize && energy == 0.0 {
        return vec![0.0; n];
    }

    let mut r = Vec::with_capacity(n);
    for lag in 0..n {
        let mut sum = 0.0f64;
        for i in 0..n - lag {
            sum += x[i] as f64 * x[i + lag] as f64;
        }
        if normalize {
            sum /= energy;
        }
        r.push(sum as f32);
    }

    r
}

/// Estimate the dominant periodicity of an autocorrelation vector, in Hz.
///
/// The lag-0 peak is trivial (every signal correlates perfectly with itself),
/// so the search starts after the initial decaying lobe:
///
///   1. Walk the first differences of `r` and find the first strictly
///      positive one — the end of the initial drop-off.
///   2. If no difference is ever positive the vector is monotonically
///      non-increasing: no periodicity, report 0.
///   3. Take the maximum strictly after that rising point (first maximum wins
///      on ties). Its lag is the period estimate.
///   4. Optionally refine the lag with a three-point parabolic fit; at the
///      right edge the missing neighbor is clamped to the peak value itself.
///
/// Returns `sample_rate / lag`, or 0.0 when no peak exists.
pub fn peak_frequency(r: &[f32], sample_rate: f32, interpolate: bool) -> f32 {
    let mut rising = None;
    for i in 0..r.len().saturating_sub(1) {
        if r[i + 1] - r[i] > 0.0 {
            rising = Some(i);
            break;
        }
    }
    let Some(rising) = rising else {
        return 0.0;
    };

    // Never let the search window reach back to lag 0 itself.
    let cutoff = rising.max(1);
    if cutoff + 1 >= r.len() {
        return 0.0;
    }

    let mut peak = cutoff + 1;
    for i in cutoff + 2..r.len() {
        if r[i] > r[peak] {
            peak = i;
        }
    }

    let mut lag = peak as f32;
    if interpolate {
        let a = r[peak - 1];
        let b = r[peak];
        let c = if peak + 1 == r.len() { r[peak] } else { r[peak + 1] };
        lag += quadratic_interp(a, b, c);
    }

    sample_rate / lag
}

/// Locate the vertex of the parabola through (-1, a), (0, b), (1, c).
///
/// Returns the fractional offset of the extremum from position 0, in the
/// range [-0.5, 0.5] when `b` is a genuine discrete extremum. A degenerate
/// (flat) configuration where the denominator vanishes yields 0 — no
/// refinement rather than a division blow-up.
pub fn quadratic_interp(a: f32, b: f32, c: f32) -> f32 {
    let denominator = a - 2.0 * b + c;
    if denominator == 0.0 {
        return 0.0;
    }
    0.5 * (a - c) / denominator
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn sine_wave(freq: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
        (0..num_samples)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn lag_zero_is_one_when_normalized() {
        let x = sine_wave(220.0, 44100.0, 1024);
        let r = autocorrelate(&x, true);
        assert!((r[0] - 1.0).abs() < 1e-6, "lag 0 should be 1.0, got {}", r[0]);
    }

    #[test]
    fn output_length_equals_input_length() {
        let x = vec![0.3; 77];
        assert_eq!(autocorrelate(&x, true).len(), 77);
        assert_eq!(autocorrelate(&x, false).len(), 77);
    }

    #[test]
    fn matches_full_autocorrelation_right_half() {
        // Build the full (two-sided) autocorrelation by brute force and check
        // that the returned half equals its non-negative-lag side; by symmetry
        // the omitted left half is the mirror of what we return.
        let x = vec![1.0f32, 2.0, 3.0, 4.0];
        let n = x.len() as isize;

        let mut full = Vec::new();
        for lag in -(n - 1)..n {
            let mut sum = 0.0f32;
            for i in 0..n {
                let j = i + lag;
                if j >= 0 && j < n {
                    sum += x[i as usize] * x[j as usize];
                }
            }
            full.push(sum);
        }

        let r = autocorrelate(&x, false);
        let right = &full[(n - 1) as usize..];
        for (lag, (&got, &want)) in r.iter().zip(right.iter()).enumerate() {
            assert!(
                (got - want).abs() < 1e-4,
                "mismatch at lag {lag}: got {got}, want {want}"
            );
        }

        // Symmetry: full[k] == full[2(n-1) - k]
        for k in 0..full.len() {
            let mirror = full[full.len() - 1 - k];
            assert!((full[k] - mirror).abs() < 1e-4);
        }
    }

    #[test]
    fn normalization_is_scale_invariant() {
        let x = sine_wave(150.0, 8000.0, 512);
        let scaled: Vec<f32> = x.iter().map(|&s| s * 7.5).collect();

        let r1 = autocorrelate(&x, true);
        let r2 = autocorrelate(&scaled, true);

        for (lag, (&a, &b)) in r1.iter().zip(r2.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-5,
                "normalized ACF should not depend on amplitude (lag {lag}: {a} vs {b})"
            );
        }
    }

    #[test]
    fn silence_yields_zero_vector_not_nan() {
        let x = vec![0.0f32; 256];

        let r = autocorrelate(&x, true);
        assert!(r.iter().all(|v| *v == 0.0), "normalized silence must be all zeros");

        let r = autocorrelate(&x, false);
        assert!(r.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn silence_has_no_pitch() {
        let r = autocorrelate(&[0.0f32; 256], true);
        assert_eq!(peak_frequency(&r, 44100.0, true), 0.0);
        let r = autocorrelate(&[0.0f32; 256], false);
        assert_eq!(peak_frequency(&r, 44100.0, false), 0.0);
    }

    #[test]
    fn monotone_decreasing_acf_has_no_peak() {
        let r: Vec<f32> = (0..64).map(|i| 1.0 - i as f32 / 64.0).collect();
        assert_eq!(peak_frequency(&r, 44100.0, false), 0.0);
        assert_eq!(peak_frequency(&r, 44100.0, true), 0.0);
    }

    #[test]
    fn constant_block_has_no_peak() {
        // A DC block gives a linearly decaying ACF: no rising edge anywhere.
        let r = autocorrelate(&[1.0f32; 128], true);
        assert_eq!(peak_frequency(&r, 44100.0, true), 0.0);
    }

    #[test]
    fn sine_period_recovered_from_acf() {
        // 100 Hz at 8000 Hz: period is exactly 80 samples.
        let x = sine_wave(100.0, 8000.0, 800);
        let r = autocorrelate(&x, true);

        let f = peak_frequency(&r, 8000.0, false);
        assert!(
            (f - 100.0).abs() < 2.0,
            "expected ~100 Hz from an 80-sample period, got {f:.2} Hz"
        );
    }

    #[test]
    fn interpolation_returns_fractional_lag() {
        // 220 Hz at 44100 Hz has a non-integer period (200.45 samples), so
        // the refined estimate should differ from the integer-lag one.
        let x = sine_wave(220.0, 44100.0, 2048);
        let r = autocorrelate(&x, true);

        let coarse = peak_frequency(&r, 44100.0, false);
        let fine = peak_frequency(&r, 44100.0, true);
        assert_ne!(coarse, fine, "interpolation should shift a non-integer period");
        assert!((fine - 220.0).abs() < 1.5, "refined estimate off: {fine:.2} Hz");
    }

    #[test]
    fn quadratic_interp_flat_is_zero() {
        // a - 2b + c == 0: degenerate parabola, offset must be exactly 0.
        assert_eq!(quadratic_interp(1.0, 2.0, 3.0), 0.0);
        assert_eq!(quadratic_interp(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn quadratic_interp_symmetric_peak_is_zero() {
        assert_eq!(quadratic_interp(1.0, 4.0, 1.0), 0.0);
    }

    #[test]
    fn quadratic_interp_leans_toward_larger_neighbor() {
        let off = quadratic_interp(0.5, 1.0, 0.9);
        assert!(off > 0.0 && off <= 0.5, "offset should lean right, got {off}");

        let off = quadratic_interp(0.9, 1.0, 0.5);
        assert!(off < 0.0 && off >= -0.5, "offset should lean left, got {off}");
    }

    #[test]
    fn tiny_vectors_have_no_pitch() {
        assert_eq!(peak_frequency(&[], 44100.0, true), 0.0);
        assert_eq!(peak_frequency(&[1.0], 44100.0, true), 0.0);
        assert_eq!(peak_frequency(&[1.0, 0.5], 44100.0, true), 0.0);
    }
}
