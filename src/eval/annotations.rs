use std::path::Path;

use anyhow::{bail, Context, Result};

/// Ground-truth description of one recording's vibrato.
///
/// Parsed from the dataset's annotation CSV. `rate_hz` is the annotated
/// reference rate; `span` is the annotated time range in seconds within
/// which the vibrato is present. Recordings labelled without vibrato keep
/// their row (scoring skips them) so presence statistics stay computable.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub filename: String,
    pub has_vibrato: bool,
    pub rate_hz: Option<f32>,
    pub span: Option<(f32, f32)>,
}

// Column layout of the annotation CSV (0-based). The dataset carries more
// columns than we consume; only these four matter for scoring.
const FILENAME_COL: usize = 1;
const PRESENCE_COL: usize = 2;
const RATE_COL: usize = 5;
const SPAN_COL: usize = 9;
const MIN_COLUMNS: usize = 10;

/// Label used in the presence column for recordings without vibrato.
const NO_VIBRATO_LABEL: &str = "no vibrato";

/// Load and parse an annotation CSV. The first line is a header and is
/// skipped; blank lines are ignored.
pub fn load_annotations(path: &Path) -> Result<Vec<Annotation>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read annotation file: {}", path.display()))?;
    parse_annotations(&contents)
        .with_context(|| format!("Failed to parse annotation file: {}", path.display()))
}

/// Parse annotation CSV contents. Exposed separately so tests can feed
/// strings directly.
pub fn parse_annotations(contents: &str) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        if index == 0 || line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < MIN_COLUMNS {
            bail!(
                "line {}: expected at least {MIN_COLUMNS} columns, got {}",
                index + 1,
                fields.len()
            );
        }

        annotations.push(Annotation {
            filename: fields[FILENAME_COL].to_string(),
            has_vibrato: fields[PRESENCE_COL] != NO_VIBRATO_LABEL,
            rate_hz: fields[RATE_COL].parse::<f32>().ok().filter(|r| r.is_finite()),
            span: parse_span(fields[SPAN_COL]),
        });
    }

    Ok(annotations)
}

/// Parse a `"start:end"` second range. The dataset writes `nan` for rows
/// without a usable range; anything unparseable is treated the same way.
fn parse_span(field: &str) -> Option<(f32, f32)> {
    let (start, end) = field.split_once(':')?;
    let start = start.trim().parse::<f32>().ok()?;
    let end = end.trim().parse::<f32>().ok()?;
    if !start.is_finite() || !end.is_finite() {
        return None;
    }
    Some((start, end))
}
