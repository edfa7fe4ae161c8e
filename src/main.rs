mod cli;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::style;
use indicatif::ProgressBar;

use vibrata::audio::wav;
use vibrata::eval::{annotations, scoring, AnalysisReport};
use vibrata::{synth, track_rms_vibrato, track_vibrato, TrackerOptions, TrackerParams};

use cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            file,
            block_size,
            hop_size,
            rms,
            no_filter,
            no_interpolate,
            json,
        } => analyze(&file, block_size, hop_size, rms, no_filter, no_interpolate, json),

        Command::Batch {
            dir,
            annotations,
            block_size,
            hop_size,
            rms,
        } => batch(&dir, &annotations, block_size, hop_size, rms),

        Command::Synth {
            out,
            sample_rate,
            duration,
            carrier,
            modulator,
            fm_depth,
            am_depth,
        } => synth_tone(&out, sample_rate, duration, carrier, modulator, fm_depth, am_depth),
    }
}

fn analyze(
    file: &Path,
    block_size: usize,
    hop_size: usize,
    rms: bool,
    no_filter: bool,
    no_interpolate: bool,
    json: bool,
) -> Result<()> {
    let (samples, sample_rate) = wav::load_mono(file)?;
    let duration = samples.len() as f32 / sample_rate as f32;

    let options = TrackerOptions {
        filter: !no_filter,
        interpolate: !no_interpolate,
        ..TrackerOptions::default()
    };
    let params = TrackerParams::with_options(block_size, hop_size, sample_rate as f32, options)?;

    let domain = if rms { "rms" } else { "f0" };
    let (rates, times) = if rms {
        track_rms_vibrato(&samples, &params)?
    } else {
        track_vibrato(&samples, &params)?
    };

    let report = AnalysisReport::new(
        file.display().to_string(),
        sample_rate,
        duration,
        domain,
        &rates,
        &times,
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} {}", style(">>").cyan(), file.display());
    println!("   Loaded: {duration:.1}s, {sample_rate} Hz, {domain} domain");
    println!();

    for window in &report.windows {
        match window.rate_hz {
            rate if rate > 0.0 => println!("   {:6.2}s  {rate:5.2} Hz", window.time_secs),
            _ => println!("   {:6.2}s  {}", window.time_secs, style("no oscillation").dim()),
        }
    }

    println!();
    match report.mean_rate_hz {
        Some(mean) => println!("   Mean rate: {} Hz", style(format!("{mean:.2}")).green()),
        None => println!("   {}", style("No vibrato-band oscillation found").yellow()),
    }

    Ok(())
}

fn batch(
    dir: &Path,
    annotations_path: &Path,
    block_size: usize,
    hop_size: usize,
    rms: bool,
) -> Result<()> {
    let annotations = annotations::load_annotations(annotations_path)?;

    let mut wav_files: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("wav"))
        })
        .collect();
    wav_files.sort();

    if wav_files.is_empty() {
        bail!("No WAV files found in {}", dir.display());
    }

    println!(
        "Analyzing {} files against {} annotations...",
        style(wav_files.len()).cyan(),
        annotations.len()
    );

    let bar = ProgressBar::new(wav_files.len() as u64);
    let mut results = Vec::with_capacity(wav_files.len());

    for path in &wav_files {
        let (samples, sample_rate) = wav::load_mono(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let params = TrackerParams::new(block_size, hop_size, sample_rate as f32)?;

        let (rates, times) = if rms {
            track_rms_vibrato(&samples, &params)?
        } else {
            track_vibrato(&samples, &params)?
        };

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        results.push(scoring::FileRates { filename, rates, times });
        bar.inc(1);
    }
    bar.finish_and_clear();

    let deviations = scoring::rate_deviations(&results, &annotations);
    if deviations.is_empty() {
        println!("No annotated vibrato spans matched the analyzed files.");
        return Ok(());
    }

    println!();
    for dev in &deviations {
        println!("   {:30} {:6.1}% deviation", dev.filename, dev.percent);
    }

    if let Some(mean) = scoring::mean_percent(&deviations) {
        println!();
        println!(
            "Mean rate deviation: {} across {} annotations",
            style(format!("{mean:.1}%")).green(),
            deviations.len()
        );
    }

    Ok(())
}

fn synth_tone(
    out: &Path,
    sample_rate: u32,
    duration: f32,
    carrier: f32,
    modulator: f32,
    fm_depth: f32,
    am_depth: Option<f32>,
) -> Result<()> {
    let samples = match am_depth {
        Some(am) => synth::am_fm_tone(
            sample_rate as f32,
            duration,
            carrier,
            modulator,
            fm_depth,
            am,
        ),
        None => synth::fm_tone(sample_rate as f32, duration, carrier, modulator, fm_depth),
    };

    wav::write_mono(out, &samples, sample_rate)?;

    println!(
        "Wrote {}: {duration:.1}s, carrier {carrier} Hz, vibrato {modulator} Hz",
        style(out.display()).green()
    );

    Ok(())
}
