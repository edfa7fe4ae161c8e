use anyhow::{bail, Result};

/// Split a signal into overlapping fixed-size blocks with start timestamps.
///
/// Returns `ceil(len / hop_size)` blocks of exactly `block_size` samples each.
/// The signal is conceptually zero-padded on the right by one block, so the
/// final blocks read zeros past the end instead of going out of bounds.
/// Block n covers source indices `[n*hop_size, n*hop_size + block_size)` and
/// its timestamp is `n * hop_size / sample_rate` seconds.
///
/// An empty signal yields zero blocks. `block_size` may exceed the signal
/// length, in which case the whole signal lands in one padded block.
pub fn block_signal(
    x: &[f32],
    block_size: usize,
    hop_size: usize,
    sample_rate: f32,
) -> Result<(Vec<Vec<f32>>, Vec<f32>)> {
    if block_size == 0 {
        bail!("block_size must be at least 1");
    }
    if hop_size == 0 {
        bail!("hop_size must be at least 1");
    }
    if !(sample_rate > 0.0) {
        bail!("sample_rate must be positive, got {sample_rate}");
    }

    let num_blocks = x.len().div_ceil(hop_size);

    let mut blocks = Vec::with_capacity(num_blocks);
    let mut times = Vec::with_capacity(num_blocks);

    for n in 0..num_blocks {
        let start = n * hop_size;
        let end = x.len().min(start + block_size);

        let mut block = vec![0.0f32; block_size];
        if start < x.len() {
            block[..end - start].copy_from_slice(&x[start..end]);
        }

        blocks.push(block);
        times.push(n as f32 * hop_size as f32 / sample_rate);
    }

    Ok((blocks, times))
}
