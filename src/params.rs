use anyhow::{bail, Result};

/// Optional knobs for the vibrato trackers.
///
/// These are the switches a researcher flips between runs. Every field has a
/// default, so `TrackerOptions::default()` reproduces the standard pipeline.
#[derive(Debug, Clone, Copy)]
pub struct TrackerOptions {
    /// Median-filter and low-pass the contour before rate estimation.
    pub filter: bool,

    /// Refine autocorrelation peaks with quadratic interpolation.
    pub interpolate: bool,

    /// The window hop is `window_size / hop_denominator` (rounded up),
    /// so consecutive rate windows overlap by (denominator - 1) / denominator.
    pub hop_denominator: usize,

    /// Duration of one rate-analysis window, in seconds of contour time.
    /// 0.5 s holds a few cycles of musical vibrato (4-8 Hz).
    pub window_duration: f32,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            filter: true,
            interpolate: true,
            hop_denominator: 5,
            window_duration: 0.5,
        }
    }
}

/// Validated, immutable parameter set for one analysis run.
///
/// Built once via [`TrackerParams::new`] or [`TrackerParams::with_options`];
/// the derived quantities (contour sample rate, window sizes) are computed at
/// construction and read through accessors, so every stage of the pipeline
/// shares the same time bookkeeping.
#[derive(Debug, Clone, Copy)]
pub struct TrackerParams {
    block_size: usize,
    hop_size: usize,
    sample_rate: f32,
    options: TrackerOptions,

    // Derived once, never recomputed.
    contour_fs: f32,
    window_size: usize,
    window_hop: usize,
}

impl TrackerParams {
    /// Build a parameter set with default options.
    pub fn new(block_size: usize, hop_size: usize, sample_rate: f32) -> Result<Self> {
        Self::with_options(block_size, hop_size, sample_rate, TrackerOptions::default())
    }

    /// Build a parameter set with explicit options.
    ///
    /// Fails on non-positive primary parameters or on options that resolve to
    /// an empty analysis window. Validation happens here, up front, so the
    /// per-block code never has to re-check.
    pub fn with_options(
        block_size: usize,
        hop_size: usize,
        sample_rate: f32,
        options: TrackerOptions,
    ) -> Result<Self> {
        if block_size == 0 {
            bail!("block_size must be at least 1");
        }
        if hop_size == 0 {
            bail!("hop_size must be at least 1");
        }
        if !(sample_rate > 0.0) {
            bail!("sample_rate must be positive, got {sample_rate}");
        }
        if options.hop_denominator == 0 {
            bail!("hop_denominator must be at least 1");
        }
        if !(options.window_duration > 0.0) {
            bail!(
                "window_duration must be positive, got {}",
                options.window_duration
            );
        }

        // The F0/RMS contour has one sample per hop of the source audio.
        let contour_fs = sample_rate / hop_size as f32;
        let window_size = (contour_fs * options.window_duration).ceil() as usize;
        if window_size == 0 {
            bail!(
                "window_duration {} s is too short for a contour rate of {contour_fs} Hz",
                options.window_duration
            );
        }
        let window_hop = window_size.div_ceil(options.hop_denominator);

        Ok(Self {
            block_size,
            hop_size,
            sample_rate,
            options,
            contour_fs,
            window_size,
            window_hop,
        })
    }

    /// Samples per audio analysis block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Samples between consecutive audio block starts.
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Sample rate of the source audio, in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Whether contour filtering (median + low-pass) is enabled.
    pub fn filter(&self) -> bool {
        self.options.filter
    }

    /// Whether quadratic peak interpolation is enabled.
    pub fn interpolate(&self) -> bool {
        self.options.interpolate
    }

    /// Window-overlap denominator for rate analysis.
    pub fn hop_denominator(&self) -> usize {
        self.options.hop_denominator
    }

    /// Rate-window duration in seconds.
    pub fn window_duration(&self) -> f32 {
        self.options.window_duration
    }

    /// Sample rate of the F0/RMS contour (one value per audio hop), in Hz.
    pub fn contour_fs(&self) -> f32 {
        self.contour_fs
    }

    /// Samples per rate-analysis window over the contour.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Contour samples between consecutive rate-window starts.
    pub fn window_hop(&self) -> usize {
        self.window_hop
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_fields_standard_setup() {
        // 44100 Hz audio, hop 1024: contour runs at ~43.07 Hz, so a 0.5 s
        // window is 22 contour samples and the hop is ceil(22/5) = 5.
        let p = TrackerParams::new(2048, 1024, 44100.0).unwrap();
        assert!((p.contour_fs() - 43.066406).abs() < 1e-3);
        assert_eq!(p.window_size(), 22);
        assert_eq!(p.window_hop(), 5);
    }

    #[test]
    fn default_options() {
        let p = TrackerParams::new(2048, 1024, 44100.0).unwrap();
        assert!(p.filter());
        assert!(p.interpolate());
        assert_eq!(p.hop_denominator(), 5);
        assert!((p.window_duration() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_zero_block_size() {
        assert!(TrackerParams::new(0, 1024, 44100.0).is_err());
    }

    #[test]
    fn rejects_zero_hop_size() {
        assert!(TrackerParams::new(2048, 0, 44100.0).is_err());
    }

    #[test]
    fn rejects_nonpositive_sample_rate() {
        assert!(TrackerParams::new(2048, 1024, 0.0).is_err());
        assert!(TrackerParams::new(2048, 1024, -44100.0).is_err());
        assert!(TrackerParams::new(2048, 1024, f32::NAN).is_err());
    }

    #[test]
    fn rejects_zero_hop_denominator() {
        let opts = TrackerOptions {
            hop_denominator: 0,
            ..TrackerOptions::default()
        };
        assert!(TrackerParams::with_options(2048, 1024, 44100.0, opts).is_err());
    }

    #[test]
    fn rejects_degenerate_window_duration() {
        let opts = TrackerOptions {
            window_duration: 0.0,
            ..TrackerOptions::default()
        };
        assert!(TrackerParams::with_options(2048, 1024, 44100.0, opts).is_err());
    }

    #[test]
    fn window_hop_rounds_up() {
        // window_size 22, denominator 4 -> ceil(22/4) = 6
        let opts = TrackerOptions {
            hop_denominator: 4,
            ..TrackerOptions::default()
        };
        let p = TrackerParams::with_options(2048, 1024, 44100.0, opts).unwrap();
        assert_eq!(p.window_hop(), 6);
    }
}
