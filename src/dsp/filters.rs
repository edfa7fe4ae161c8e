//! Contour filtering: a small median filter for isolated outlier spikes and a
//! Butterworth low-pass for isolating the vibrato band.
//!
//! The low-pass is built as a cascade of second-order sections rather than a
//! single high-order polynomial; the 100 dB stopband requirement routinely
//! produces orders in the dozens, where direct-form coefficients fall apart
//! numerically but per-section biquads stay stable.

use std::f64::consts::PI;

use log::{debug, warn};

/// Passband edge as a fraction of the nominal cutoff frequency.
const PASSBAND_EDGE_RATIO: f64 = 0.9;

/// Stopband edge as a fraction of the nominal cutoff frequency.
const STOPBAND_EDGE_RATIO: f64 = 1.1;

/// Maximum passband ripple, dB.
const PASSBAND_RIPPLE_DB: f64 = 3.0;

/// Minimum stopband attenuation, dB.
const STOPBAND_ATTEN_DB: f64 = 100.0;

/// Band edges are kept strictly inside (0, Nyquist). At slow contour rates
/// the stopband edge can land past Nyquist (44100 Hz audio with hop 1024
/// puts it at 22 Hz against a 21.5 Hz Nyquist), which would make the order
/// estimate meaningless.
const MAX_NORMALIZED_EDGE: f64 = 0.99;

/// Apply a centered median filter with zero-padded edges.
///
/// Selects the median of a `width`-sample window around each position;
/// positions past either end of the signal count as zero. Effective against
/// isolated spikes (octave errors in a pitch contour) while leaving a smooth
/// oscillation essentially untouched. Does not remove bursts of outliers.
pub fn median_filter(x: &[f32], width: usize) -> Vec<f32> {
    assert!(width % 2 == 1, "median filter width must be odd, got {width}");

    let half = width / 2;
    let mut window = vec![0.0f32; width];
    let mut out = Vec::with_capacity(x.len());

    for i in 0..x.len() {
        for (j, w) in window.iter_mut().enumerate() {
            let idx = i as isize + j as isize - half as isize;
            *w = if idx < 0 || idx >= x.len() as isize {
                0.0
            } else {
                x[idx as usize]
            };
        }
        window.sort_by(|a, b| a.partial_cmp(b).unwrap());
        out.push(window[half]);
    }

    out
}

/// One second-order filter section (transfer function coefficients only;
/// state lives in the filtering pass).
#[derive(Debug, Clone, Copy)]
struct Biquad {
    /// Numerator [b0, b1, b2].
    b: [f64; 3],
    /// Denominator [a1, a2]; a0 is normalized to 1.
    a: [f64; 2],
}

/// A causal Butterworth low-pass filter as a cascade of biquad sections.
#[derive(Debug, Clone)]
pub struct LowPass {
    sections: Vec<Biquad>,
    order: usize,
}

impl LowPass {
    /// Design a low-pass for the given nominal cutoff at the given sample
    /// rate.
    ///
    /// The order and natural frequency come from the classic Butterworth
    /// order estimate: at most 3 dB of ripple up to 0.9x the cutoff, at
    /// least 100 dB of attenuation from 1.1x the cutoff. The passband spec
    /// is met exactly; the stopband spec is met or exceeded. Frequencies are
    /// prewarped for the bilinear transform, and each conjugate pole pair
    /// becomes one unity-DC-gain section.
    pub fn design(cutoff_hz: f32, sample_rate: f32) -> Self {
        assert!(cutoff_hz > 0.0, "cutoff must be positive, got {cutoff_hz}");
        assert!(
            sample_rate > 0.0,
            "sample_rate must be positive, got {sample_rate}"
        );

        let nyquist = sample_rate as f64 / 2.0;
        let mut wp = PASSBAND_EDGE_RATIO * cutoff_hz as f64 / nyquist;
        let mut ws = STOPBAND_EDGE_RATIO * cutoff_hz as f64 / nyquist;

        if ws >= MAX_NORMALIZED_EDGE {
            warn!(
                "stopband edge {:.1} Hz at or past Nyquist {:.1} Hz; clamping band edges",
                STOPBAND_EDGE_RATIO * cutoff_hz as f64,
                nyquist
            );
            ws = MAX_NORMALIZED_EDGE;
        }
        if wp >= ws {
            wp = PASSBAND_EDGE_RATIO * ws;
        }

        // Prewarp the band edges into the analog domain.
        let wp_a = (PI * wp / 2.0).tan();
        let ws_a = (PI * ws / 2.0).tan();

        let gpass = 10.0f64.powf(PASSBAND_RIPPLE_DB / 10.0) - 1.0;
        let gstop = 10.0f64.powf(STOPBAND_ATTEN_DB / 10.0) - 1.0;

        let order = ((gstop / gpass).log10() / (2.0 * (ws_a / wp_a).log10()))
            .ceil()
            .max(1.0) as usize;

        // Natural frequency placed so the passband edge sits exactly at
        // -PASSBAND_RIPPLE_DB.
        let w0 = wp_a / gpass.powf(1.0 / (2.0 * order as f64));

        let mut sections = Vec::with_capacity(order.div_ceil(2));

        // Analog poles sit on the left half-circle of radius w0 at angles
        // pi/2 + (2k+1)pi/2N; each k below N/2 pairs with its conjugate.
        for k in 0..order / 2 {
            let phi = PI / 2.0 + PI * (2 * k + 1) as f64 / (2 * order) as f64;
            let pr = w0 * phi.cos();
            let pim = w0 * phi.sin();

            // Bilinear transform z = (1 + p) / (1 - p).
            let (nr, ni) = (1.0 + pr, pim);
            let (dr, di) = (1.0 - pr, -pim);
            let d2 = dr * dr + di * di;
            let zr = (nr * dr + ni * di) / d2;
            let zi = (ni * dr - nr * di) / d2;

            let a1 = -2.0 * zr;
            let a2 = zr * zr + zi * zi;
            // Both zeros at z = -1; gain chosen for unity DC response.
            let g = (1.0 + a1 + a2) / 4.0;
            sections.push(Biquad {
                b: [g, 2.0 * g, g],
                a: [a1, a2],
            });
        }

        if order % 2 == 1 {
            // The real pole at -w0 becomes a first-order section.
            let zr = (1.0 - w0) / (1.0 + w0);
            let g = (1.0 - zr) / 2.0;
            sections.push(Biquad {
                b: [g, g, 0.0],
                a: [-zr, 0.0],
            });
        }

        debug!(
            "low-pass design: cutoff {cutoff_hz} Hz at fs {sample_rate} Hz -> order {order}"
        );

        Self { sections, order }
    }

    /// The designed filter order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Filter a signal causally (forward only, zero initial state).
    ///
    /// This intentionally runs a single forward pass, like the reference
    /// pipeline: the output carries the filter's group delay, which no later
    /// stage compensates. Rate estimation downstream only cares about the
    /// period of the oscillation, not its absolute alignment.
    pub fn apply(&self, x: &[f32]) -> Vec<f32> {
        let mut buf: Vec<f64> = x.iter().map(|&s| s as f64).collect();

        for s in &self.sections {
            // Direct Form II Transposed, per section.
            let mut z0 = 0.0f64;
            let mut z1 = 0.0f64;
            for v in buf.iter_mut() {
                let input = *v;
                let out = s.b[0] * input + z0;
                z0 = s.b[1] * input - s.a[0] * out + z1;
                z1 = s.b[2] * input - s.a[1] * out;
                *v = out;
            }
        }

        buf.into_iter().map(|v| v as f32).collect()
    }
}
