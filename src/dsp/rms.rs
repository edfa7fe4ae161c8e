use anyhow::Result;

use super::blocking::block_signal;

/// Smallest RMS value ever reported (-100 dB full scale). Silence is floored
/// here instead of reaching 0 so later log/ratio operations stay defined.
const RMS_FLOOR: f32 = 1e-5;

/// Root-mean-square level of one block, in linear units (not dB).
///
/// All-zero input returns exactly [`RMS_FLOOR`].
pub fn block_rms(x: &[f32]) -> f32 {
    let sum_sq: f64 = x.iter().map(|&s| s as f64 * s as f64).sum();
    let rms = (sum_sq / x.len() as f64).sqrt() as f32;
    rms.max(RMS_FLOOR)
}

/// Track the short-term RMS energy of a signal over time.
///
/// Blocks the signal exactly like the pitch tracker does, so the resulting
/// energy contour is sample-aligned with an F0 contour produced from the
/// same parameters. Returns one RMS value and one start time per block.
pub fn track_rms(
    x: &[f32],
    block_size: usize,
    hop_size: usize,
    sample_rate: f32,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let (blocks, times) = block_signal(x, block_size, hop_size, sample_rate)?;
    let rms = blocks.iter().map(|block| block_rms(block)).collect();
    Ok((rms, times))
}
