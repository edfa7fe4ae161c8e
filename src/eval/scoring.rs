use super::annotations::Annotation;

/// Per-window rates and times produced for one analyzed file.
#[derive(Debug, Clone)]
pub struct FileRates {
    pub filename: String,
    pub rates: Vec<f32>,
    pub times: Vec<f32>,
}

/// Percent deviation of the estimated rates from one annotation's reference.
#[derive(Debug, Clone)]
pub struct Deviation {
    pub filename: String,
    pub percent: f32,
}

/// Score estimated vibrato rates against annotated references.
///
/// For each annotation carrying a vibrato label, a reference rate, and a
/// time span: find the matching file's rates and average
/// `|estimate - reference|` over the windows that lie inside the span.
/// A window counts when its whole interval `[times[n], times[n+1])` falls
/// within the span and its rate is nonzero (zero means the estimator saw no
/// oscillation there — excluding it keeps the deviation about rate accuracy
/// rather than detection). The average deviation is reported as a
/// percentage of the reference rate, one entry per scorable annotation.
pub fn rate_deviations(results: &[FileRates], annotations: &[Annotation]) -> Vec<Deviation> {
    let mut deviations = Vec::new();

    for ann in annotations {
        if !ann.has_vibrato {
            continue;
        }
        let (Some(reference), Some((start, end))) = (ann.rate_hz, ann.span) else {
            continue;
        };
        let Some(result) = results.iter().find(|r| r.filename == ann.filename) else {
            continue;
        };

        let mut errors = Vec::new();
        for n in 0..result.times.len().saturating_sub(1) {
            let inside = result.times[n] >= start && result.times[n + 1] < end;
            if inside && result.rates[n] > 0.0 {
                errors.push((result.rates[n] - reference).abs());
            }
        }

        if !errors.is_empty() {
            let mean_error = errors.iter().sum::<f32>() / errors.len() as f32;
            deviations.push(Deviation {
                filename: ann.filename.clone(),
                percent: mean_error / reference * 100.0,
            });
        }
    }

    deviations
}

/// Mean percent deviation across annotations, or None when nothing scored.
pub fn mean_percent(deviations: &[Deviation]) -> Option<f32> {
    if deviations.is_empty() {
        return None;
    }
    Some(deviations.iter().map(|d| d.percent).sum::<f32>() / deviations.len() as f32)
}
