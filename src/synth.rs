//! Synthetic test tones with known modulation parameters.
//!
//! These are the ground-truth generators used by the unit tests and the
//! `synth` CLI command: if the tracker cannot recover the modulator frequency
//! it was fed here, it cannot be trusted on real recordings.

use std::f32::consts::PI;

/// Generate a frequency-modulated sinusoid (phase modulation, strictly):
///
///   x[t] = cos(2 pi f_carrier t + depth * cos(2 pi f_modulator t))
///
/// The instantaneous frequency swings by up to `depth * f_modulator` Hz
/// around the carrier, which is the synthetic stand-in for vibrato.
pub fn fm_tone(
    sample_rate: f32,
    duration: f32,
    carrier_hz: f32,
    modulator_hz: f32,
    depth: f32,
) -> Vec<f32> {
    let n = (duration * sample_rate) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let phase_mod = depth * (2.0 * PI * modulator_hz * t).cos();
            (2.0 * PI * carrier_hz * t + phase_mod).cos()
        })
        .collect()
}

/// Generate a sinusoid with amplitude and frequency modulation from the same
/// modulator frequency:
///
///   x[t] = am_depth * cos(2 pi f_mod t) * cos(2 pi f_carrier t + fm_depth * cos(2 pi f_mod t))
///
/// The amplitude factor crosses zero twice per modulator cycle, so the
/// energy envelope of this signal repeats at twice `modulator_hz` — exactly
/// the property the amplitude-domain rate estimator has to undo.
pub fn am_fm_tone(
    sample_rate: f32,
    duration: f32,
    carrier_hz: f32,
    modulator_hz: f32,
    fm_depth: f32,
    am_depth: f32,
) -> Vec<f32> {
    let n = (duration * sample_rate) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate;
            let modulator = (2.0 * PI * modulator_hz * t).cos();
            let am = am_depth * modulator;
            let fm = fm_depth * modulator;
            am * (2.0 * PI * carrier_hz * t + fm).cos()
        })
        .collect()
}
