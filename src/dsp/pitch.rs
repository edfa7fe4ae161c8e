use anyhow::Result;

use super::acf::{autocorrelate, peak_frequency};
use super::blocking::block_signal;

/// Track the fundamental frequency of a signal over time.
///
/// Splits the signal into overlapping blocks, computes each block's
/// normalized autocorrelation, and reads the F0 off the first genuine
/// autocorrelation peak. Strictly per-block: no smoothing and no continuity
/// constraint between neighbors, so an unpitched block reports 0 on its own.
///
/// Returns one F0 estimate (Hz) and one start time (seconds) per block.
pub fn track_pitch(
    x: &[f32],
    block_size: usize,
    hop_size: usize,
    sample_rate: f32,
    interpolate: bool,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let (blocks, times) = block_signal(x, block_size, hop_size, sample_rate)?;

    let f0 = blocks
        .iter()
        .map(|block| {
            let r = autocorrelate(block, true);
            peak_frequency(&r, sample_rate, interpolate)
        })
        .collect();

    Ok((f0, times))
}
