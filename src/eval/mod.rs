pub mod annotations;
pub mod scoring;

use serde::Serialize;

/// One rate-analysis window in a report.
#[derive(Debug, Clone, Serialize)]
pub struct WindowRate {
    /// Window start time, seconds from the start of the recording.
    pub time_secs: f32,
    /// Estimated vibrato rate, Hz; 0 means no discernible oscillation.
    pub rate_hz: f32,
}

/// Serializable summary of one file's vibrato analysis, for `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub file: String,
    pub sample_rate: u32,
    pub duration_secs: f32,
    /// Which contour the rates came from: "f0" or "rms".
    pub domain: String,
    pub windows: Vec<WindowRate>,
    /// Mean rate over windows that found an oscillation, Hz.
    pub mean_rate_hz: Option<f32>,
}

impl AnalysisReport {
    pub fn new(
        file: String,
        sample_rate: u32,
        duration_secs: f32,
        domain: &str,
        rates: &[f32],
        times: &[f32],
    ) -> Self {
        let windows: Vec<WindowRate> = times
            .iter()
            .zip(rates.iter())
            .map(|(&time_secs, &rate_hz)| WindowRate { time_secs, rate_hz })
            .collect();

        let voiced: Vec<f32> = rates.iter().copied().filter(|&r| r > 0.0).collect();
        let mean_rate_hz = if voiced.is_empty() {
            None
        } else {
            Some(voiced.iter().sum::<f32>() / voiced.len() as f32)
        };

        Self {
            file,
            sample_rate,
            duration_secs,
            domain: domain.to_string(),
            windows,
            mean_rate_hz,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_skips_silent_windows() {
        let report = AnalysisReport::new(
            "x.wav".into(),
            44100,
            3.0,
            "f0",
            &[5.0, 0.0, 6.0],
            &[0.0, 0.1, 0.2],
        );
        assert_eq!(report.windows.len(), 3);
        assert_eq!(report.mean_rate_hz, Some(5.5));
    }

    #[test]
    fn all_silent_means_no_rate() {
        let report =
            AnalysisReport::new("x.wav".into(), 44100, 3.0, "rms", &[0.0, 0.0], &[0.0, 0.1]);
        assert_eq!(report.mean_rate_hz, None);
    }

    #[test]
    fn serializes_to_json() {
        let report = AnalysisReport::new("x.wav".into(), 44100, 1.0, "f0", &[5.5], &[0.0]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"domain\":\"f0\""));
        assert!(json.contains("\"rate_hz\":5.5"));
    }
}
