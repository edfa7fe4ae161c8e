//! Vibrato-rate estimation: autocorrelation applied a second time, to the
//! contour that the first pass produced.
//!
//! A sustained note with vibrato yields an F0 contour that oscillates a few
//! Hz around the note's pitch. Conditioning strips the note itself (the DC
//! part) and everything faster than vibrato can be, leaving an oscillation
//! whose period the same block/ACF/peak machinery can measure — just at the
//! contour's much lower sample rate. The energy contour works the same way,
//! except that energy responds to pitch deviation in both directions, so its
//! oscillation runs at twice the vibrato rate.

use anyhow::Result;
use log::debug;

use super::acf::{autocorrelate, peak_frequency};
use super::blocking::block_signal;
use super::filters::{median_filter, LowPass};
use super::pitch::track_pitch;
use super::rms::track_rms;
use crate::params::TrackerParams;

/// Nominal cutoff of the contour low-pass, Hz. Musical vibrato sits around
/// 4-8 Hz; nothing above 20 Hz on a pitch contour is vibrato.
const CONTOUR_LPF_CUTOFF_HZ: f32 = 20.0;

/// Width of the median filter that strips isolated octave-error spikes.
const MEDIAN_WIDTH: usize = 3;

/// Condition a contour for rate estimation.
///
/// Subtracts the arithmetic mean (the rate estimator assumes oscillation
/// about zero), then — when `filter` is set — applies a width-3 median
/// filter against isolated outlier spikes and a causal Butterworth low-pass
/// that keeps only the sub-20 Hz band. The low-pass runs forward-only and
/// its group delay is left uncompensated; see [`LowPass::apply`].
pub fn condition_contour(contour: &[f32], contour_fs: f32, filter: bool) -> Vec<f32> {
    if contour.is_empty() {
        return Vec::new();
    }

    let mean = (contour.iter().map(|&v| v as f64).sum::<f64>() / contour.len() as f64) as f32;
    let mut out: Vec<f32> = contour.iter().map(|&v| v - mean).collect();

    if filter {
        out = median_filter(&out, MEDIAN_WIDTH);
        out = LowPass::design(CONTOUR_LPF_CUTOFF_HZ, contour_fs).apply(&out);
    }

    out
}

/// Dominant oscillation rate of one contour window, in Hz.
///
/// This is the shared primitive behind both the F0-domain and the
/// RMS-domain estimators: normalized autocorrelation of the window, then
/// the usual peak search. The window is expected to be conditioned already
/// (zero-mean); 0.0 means no discernible oscillation.
pub fn window_rate(window: &[f32], contour_fs: f32, interpolate: bool) -> f32 {
    let r = autocorrelate(window, true);
    peak_frequency(&r, contour_fs, interpolate)
}

/// Slide rate-analysis windows over a conditioned contour and estimate the
/// oscillation rate in each.
///
/// Re-uses the signal blocking machinery at the contour's sample rate. The
/// final `hop_denominator - 1` windows are dropped unconditionally: they
/// are dominated by the blocking zero-padding and are defined to be
/// unreliable, not merely low-confidence.
pub fn windowed_rates(contour: &[f32], params: &TrackerParams) -> Result<(Vec<f32>, Vec<f32>)> {
    let (windows, times) = block_signal(
        contour,
        params.window_size(),
        params.window_hop(),
        params.contour_fs(),
    )?;

    let cut = params.hop_denominator() - 1;
    let keep = windows.len().saturating_sub(cut);
    debug!(
        "rate estimation: {} windows of {} contour samples, keeping {keep}",
        windows.len(),
        params.window_size()
    );

    let rates = windows[..keep]
        .iter()
        .map(|w| window_rate(w, params.contour_fs(), params.interpolate()))
        .collect();

    Ok((rates, times[..keep].to_vec()))
}

/// Track the vibrato rate of a signal over time via its F0 contour.
///
/// Pipeline: autocorrelation pitch tracking per block, contour conditioning,
/// then windowed rate estimation over the conditioned contour. Returns one
/// rate (Hz) and one window start time (seconds) per surviving window.
pub fn track_vibrato(x: &[f32], params: &TrackerParams) -> Result<(Vec<f32>, Vec<f32>)> {
    let (f0, _) = track_pitch(
        x,
        params.block_size(),
        params.hop_size(),
        params.sample_rate(),
        params.interpolate(),
    )?;

    let conditioned = condition_contour(&f0, params.contour_fs(), params.filter());
    windowed_rates(&conditioned, params)
}

/// Track the vibrato rate of a signal over time via its energy contour.
///
/// Same pipeline as [`track_vibrato`] but on the block-RMS contour. The
/// energy envelope rises on both the upward and the downward pitch swing,
/// so the raw windowed rate lands on twice the true vibrato rate; each rate
/// is halved before being returned.
pub fn track_rms_vibrato(x: &[f32], params: &TrackerParams) -> Result<(Vec<f32>, Vec<f32>)> {
    let (rms, _) = track_rms(
        x,
        params.block_size(),
        params.hop_size(),
        params.sample_rate(),
    )?;

    let conditioned = condition_contour(&rms, params.contour_fs(), params.filter());
    let (mut rates, times) = windowed_rates(&conditioned, params)?;
    for rate in &mut rates {
        *rate *= 0.5;
    }

    Ok((rates, times))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::{am_fm_tone, fm_tone};

    #[test]
    fn conditioning_removes_the_mean() {
        let contour = vec![220.0f32; 64];
        let out = condition_contour(&contour, 43.0, false);
        assert!(out.iter().all(|&v| v.abs() < 1e-3));
    }

    #[test]
    fn conditioning_suppresses_an_isolated_spike() {
        // A flat 200 Hz contour with one octave error at index 10.
        let mut contour = vec![200.0f32; 100];
        contour[10] = 400.0;

        let raw = condition_contour(&contour, 43.0, false);
        assert!(raw[10] > 100.0, "unfiltered spike should survive mean removal");

        let filtered = condition_contour(&contour, 43.0, true);
        assert!(
            filtered[10].abs() < 5.0,
            "median + low-pass should flatten the spike, got {}",
            filtered[10]
        );
    }

    #[test]
    fn conditioning_empty_contour() {
        assert!(condition_contour(&[], 43.0, true).is_empty());
    }

    #[test]
    fn window_rate_of_pure_oscillation() {
        // 5 Hz oscillation sampled at 43 Hz over half a second-ish window.
        let fs = 43.0;
        let window: Vec<f32> = (0..22)
            .map(|i| (2.0 * std::f32::consts::PI * 5.0 * i as f32 / fs).sin())
            .collect();

        let rate = window_rate(&window, fs, true);
        assert!(
            (rate - 5.0).abs() < 0.5,
            "expected ~5 Hz oscillation, got {rate:.2} Hz"
        );
    }

    #[test]
    fn window_rate_of_flat_window_is_zero() {
        assert_eq!(window_rate(&[0.0; 22], 43.0, true), 0.0);
    }

    #[test]
    fn tail_windows_are_dropped() {
        let params = TrackerParams::new(2048, 1024, 44100.0).unwrap();
        // 130-sample contour, window hop 5: 26 raw windows, minus
        // (hop_denominator - 1) = 4 unreliable tail windows.
        let contour = vec![0.0f32; 130];
        let (rates, times) = windowed_rates(&contour, &params).unwrap();
        assert_eq!(rates.len(), 22);
        assert_eq!(times.len(), 22);
    }

    #[test]
    fn vibrato_rate_recovered_from_fm_tone() {
        // 440 Hz carrier with 5.5 Hz vibrato, ~3.3 Hz frequency swing.
        let fs = 44100.0;
        let x = fm_tone(fs, 3.0, 440.0, 5.5, 0.6);
        let params = TrackerParams::new(2048, 1024, fs).unwrap();

        let (rates, times) = track_vibrato(&x, &params).unwrap();
        assert_eq!(rates.len(), times.len());
        assert!(rates.len() >= 20, "expected ~22 windows, got {}", rates.len());

        // Skip the filter startup transient at the head and the windows that
        // brush the contour tail; the interior must nail the modulator.
        for (i, &rate) in rates.iter().enumerate().take(18).skip(4) {
            assert!(
                (rate - 5.5).abs() < 0.3,
                "window {i} at t={:.2}s: expected 5.5 Hz, got {rate:.2} Hz",
                times[i]
            );
        }
    }

    #[test]
    fn window_times_follow_the_window_hop() {
        let fs = 44100.0;
        let x = fm_tone(fs, 3.0, 440.0, 5.5, 0.6);
        let params = TrackerParams::new(2048, 1024, fs).unwrap();

        let (_, times) = track_vibrato(&x, &params).unwrap();
        let step = params.window_hop() as f32 / params.contour_fs();
        for (i, &t) in times.iter().enumerate() {
            assert!((t - i as f32 * step).abs() < 1e-4);
        }
    }

    #[test]
    fn rms_contour_oscillates_at_twice_the_rate() {
        // Amplitude modulation crosses zero twice per modulator period, so
        // the conditioned energy contour should measure ~2x the modulator
        // before the documented halving step.
        let fs = 44100.0;
        let x = am_fm_tone(fs, 3.0, 440.0, 5.0, 0.3, 1.0);
        let params = TrackerParams::new(1024, 512, fs).unwrap();

        let (rms, _) = track_rms(&x, 1024, 512, fs).unwrap();
        let conditioned = condition_contour(&rms, params.contour_fs(), params.filter());
        let (raw, _) = windowed_rates(&conditioned, &params).unwrap();

        // The contour low-pass rings for a while at this contour rate; skip
        // the head windows it contaminates along with the tail.
        for (i, &rate) in raw.iter().enumerate().take(19).skip(6) {
            assert!(
                (rate - 10.0).abs() < 0.5,
                "window {i}: raw energy rate should be ~10 Hz, got {rate:.2} Hz"
            );
        }
    }

    #[test]
    fn rms_vibrato_recovers_the_true_rate() {
        let fs = 44100.0;
        let x = am_fm_tone(fs, 3.0, 440.0, 5.0, 0.3, 1.0);
        let params = TrackerParams::new(1024, 512, fs).unwrap();

        let (rates, _) = track_rms_vibrato(&x, &params).unwrap();
        for (i, &rate) in rates.iter().enumerate().take(19).skip(6) {
            assert!(
                (rate - 5.0).abs() < 0.3,
                "window {i}: expected 5.0 Hz after halving, got {rate:.2} Hz"
            );
        }
    }

    #[test]
    fn silence_yields_zero_rates_everywhere() {
        let params = TrackerParams::new(2048, 1024, 44100.0).unwrap();
        let x = vec![0.0f32; 132300];
        let (rates, _) = track_vibrato(&x, &params).unwrap();
        assert!(!rates.is_empty());
        assert!(rates.iter().all(|&r| r == 0.0));
    }

    #[test]
    fn empty_signal_yields_empty_output() {
        let params = TrackerParams::new(2048, 1024, 44100.0).unwrap();
        let (rates, times) = track_vibrato(&[], &params).unwrap();
        assert!(rates.is_empty());
        assert!(times.is_empty());
    }
}
