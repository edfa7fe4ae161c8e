//! vibrata — vibrato analysis by nested autocorrelation.
//!
//! Estimates the F0 contour of a monophonic signal with block-based
//! autocorrelation pitch tracking, then measures vibrato by autocorrelating
//! the contour itself: the pitch oscillation of a sung or bowed note shows
//! up as a periodicity of the F0 sequence, a few Hz wide, that the same
//! peak-picking machinery can locate at the contour's much lower sample
//! rate. An amplitude-domain variant runs the identical pipeline over the
//! short-term energy contour instead.
//!
//! The typical entry points:
//!
//! - [`track_pitch`] — F0 estimate per analysis block
//! - [`track_vibrato`] — vibrato rate per analysis window, from the F0 contour
//! - [`track_rms_vibrato`] — vibrato rate per window, from the energy contour
//!
//! All analysis is offline and purely functional; configuration lives in the
//! validated [`TrackerParams`] value built once per run.

pub mod audio;
pub mod dsp;
pub mod eval;
pub mod params;
pub mod synth;

pub use dsp::pitch::track_pitch;
pub use dsp::rms::track_rms;
pub use dsp::vibrato::{track_rms_vibrato, track_vibrato};
pub use params::{TrackerOptions, TrackerParams};
