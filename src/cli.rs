use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vibrata")]
#[command(about = "Measure vibrato in monophonic recordings via nested autocorrelation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze one WAV file and print per-window vibrato rates
    Analyze {
        /// Path to a WAV file (stereo is downmixed to mono)
        file: PathBuf,

        /// Audio samples per analysis block
        #[arg(long, default_value_t = 2048)]
        block_size: usize,

        /// Audio samples between consecutive block starts
        #[arg(long, default_value_t = 1024)]
        hop_size: usize,

        /// Estimate from the energy contour instead of the F0 contour
        #[arg(long)]
        rms: bool,

        /// Disable contour filtering (median + low-pass)
        #[arg(long)]
        no_filter: bool,

        /// Disable quadratic peak interpolation
        #[arg(long)]
        no_interpolate: bool,

        /// Print the analysis as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Analyze every WAV file in a directory and score against annotations
    Batch {
        /// Directory containing WAV files
        dir: PathBuf,

        /// Ground-truth annotation CSV
        #[arg(long)]
        annotations: PathBuf,

        /// Audio samples per analysis block
        #[arg(long, default_value_t = 2048)]
        block_size: usize,

        /// Audio samples between consecutive block starts
        #[arg(long, default_value_t = 1024)]
        hop_size: usize,

        /// Estimate from the energy contour instead of the F0 contour
        #[arg(long)]
        rms: bool,
    },

    /// Write a synthesized vibrato test tone to a WAV file
    Synth {
        /// Output WAV path
        out: PathBuf,

        /// Sample rate in Hz
        #[arg(long, default_value_t = 44100)]
        sample_rate: u32,

        /// Duration in seconds
        #[arg(long, default_value_t = 3.0)]
        duration: f32,

        /// Carrier frequency in Hz
        #[arg(long, default_value_t = 440.0)]
        carrier: f32,

        /// Modulator (vibrato) frequency in Hz
        #[arg(long, default_value_t = 5.5)]
        modulator: f32,

        /// Frequency-modulation depth (radians of phase swing)
        #[arg(long, default_value_t = 0.6)]
        fm_depth: f32,

        /// Amplitude-modulation depth; when set the tone is AM+FM
        #[arg(long)]
        am_depth: Option<f32>,
    },
}
